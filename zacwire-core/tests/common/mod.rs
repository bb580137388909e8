//! Shared helpers for integration tests
//!
//! A pulse-timeline builder that plays the sensor's role: it turns payloads
//! (or target temperatures) into the exact edge sequence a TSIC transmits,
//! including deliberate corruption for negative tests.

#![allow(dead_code)] // not every test file uses every helper

use zacwire_core::{EdgeEvent, EdgeLevel, EdgeSink, EdgeSource, SensorProfile};

/// Nominal bit period at the datasheet 8 kHz baud rate (µs).
pub const BIT_PERIOD_US: u64 = 125;

/// Idle stretch long enough to register as a start condition (µs).
pub const FRAME_GAP_US: u64 = 5_000;

/// Even parity of one byte, as the transmitted parity bit value.
pub fn even_parity(byte: u8) -> u16 {
    (byte.count_ones() & 1) as u16
}

/// Builds an edge-event timeline the way the sensor produces it.
pub struct PulseTimeline {
    events: Vec<EdgeEvent>,
    t: u64,
    bit_period: u64,
}

impl PulseTimeline {
    pub fn new(start_us: u64) -> Self {
        Self::with_bit_period(start_us, BIT_PERIOD_US)
    }

    /// A timeline for a sensor running off-nominal timing.
    pub fn with_bit_period(start_us: u64, bit_period: u64) -> Self {
        Self {
            events: Vec::new(),
            t: start_us,
            bit_period,
        }
    }

    fn low_width(&self, quarters: u64) -> u64 {
        self.bit_period * quarters / 4
    }

    /// One pulse: falling edge, low for `low_us`, rising edge, high for
    /// the rest of the bit period.
    pub fn pulse(&mut self, low_us: u64) {
        self.events
            .push(EdgeEvent::new(self.t, EdgeLevel::Falling));
        self.events
            .push(EdgeEvent::new(self.t + low_us, EdgeLevel::Rising));
        self.t += self.bit_period;
    }

    fn strobe(&mut self) {
        self.pulse(self.low_width(2));
    }

    fn bit(&mut self, one: bool) {
        let low = if one {
            self.low_width(1)
        } else {
            self.low_width(3)
        };
        self.pulse(low);
    }

    /// Let the line idle long enough for the next pulse to be a start
    /// condition.
    pub fn idle(&mut self, us: u64) {
        self.t += us;
    }

    /// A throwaway pulse plus idle time, so the decoder has a falling-edge
    /// reference and the next frame starts cleanly.
    pub fn prime(&mut self) {
        self.strobe();
        self.idle(FRAME_GAP_US);
    }

    /// Transmit a complete frame for `bits` with correct parity.
    pub fn frame(&mut self, bits: u16) {
        let hi = (bits >> 8) as u8;
        let lo = bits as u8;
        self.frame_with_parity(bits, even_parity(hi), even_parity(lo));
    }

    /// Transmit a frame with explicit parity bit values (corruption tests).
    pub fn frame_with_parity(&mut self, bits: u16, parity_hi: u16, parity_lo: u16) {
        let hi = (bits >> 8) as u8;
        let lo = bits as u8;

        self.strobe();
        for i in (0..8).rev() {
            self.bit((hi >> i) & 1 == 1);
        }
        self.bit(parity_hi == 1);
        self.strobe();
        for i in (0..8).rev() {
            self.bit((lo >> i) & 1 == 1);
        }
        self.bit(parity_lo == 1);
        self.idle(FRAME_GAP_US);
    }

    /// Transmit a frame encoding `celsius` for `profile`.
    pub fn frame_for_celsius(&mut self, profile: &SensorProfile, celsius: f32) {
        self.frame(profile.payload_from_celsius(celsius));
    }

    /// Transmit the first `pulses` of a frame, then abandon it.
    pub fn truncated_frame(&mut self, bits: u16, pulses: usize) {
        let hi = (bits >> 8) as u8;
        self.strobe();
        for i in (0..8).rev().take(pulses.saturating_sub(1)) {
            self.bit((hi >> i) & 1 == 1);
        }
        self.idle(FRAME_GAP_US);
    }

    /// Current end-of-timeline timestamp.
    pub fn now(&self) -> u64 {
        self.t
    }

    /// Deliver every event, in order, the way the ISR would.
    pub fn replay(&self, sink: &dyn EdgeSink) {
        for event in &self.events {
            sink.on_edge(*event);
        }
    }
}

/// Edge source whose platform half is the test itself: attach succeeds and
/// the test replays timelines into the context directly.
pub struct ManualSource;

impl EdgeSource for ManualSource {
    type Error = ();

    fn attach(&mut self, _sink: &'static dyn EdgeSink) -> Result<(), ()> {
        Ok(())
    }

    fn detach(&mut self) -> Result<(), ()> {
        Ok(())
    }
}
