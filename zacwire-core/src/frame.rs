//! Per-edge frame assembly state machine
//!
//! ## Overview
//!
//! A frame is twenty timed pulses on one wire. Falling edges are the
//! interval measurement point: the falling-to-falling distance tells the
//! assembler whether the line just sat idle (start condition) or another
//! pulse of the current frame began. Rising edges are the data sample
//! point: the width of the low phase that just ended classifies the pulse
//! as strobe timing, a data bit, or a parity bit.
//!
//! ```text
//! pulse    0    1..8   9    10    11..18  19
//!        strobe data parity strobe data  parity
//!          │                  │
//!          └── calibrates the bit window ──┘
//! ```
//!
//! Data arrives most significant bit first; each half carries even parity
//! over its eight data bits. The assembler publishes into the frame slot
//! exactly twice per lifecycle path: a frame that passes both parity checks
//! is published valid, a frame that fails either check is published invalid
//! so a waiting reader learns of the misreading immediately. A frame cut
//! short by a new start condition is never published at all.
//!
//! Everything here runs in the producer context. No allocation, no locks,
//! no logging — bounded work per edge.

use crate::constants::{
    FINAL_PARITY_POS, FIRST_PARITY_POS, FIRST_STROBE_POS, PULSES_PER_FRAME, SECOND_STROBE_POS,
    START_GAP_US,
};
use crate::edge::{EdgeEvent, EdgeLevel};
use crate::handoff::FrameSlot;
use crate::monitor::ConnectionMonitor;
use crate::time::Timestamp;
use crate::window::BitWindow;

/// Where the assembler is within a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No frame in progress; waiting for inter-frame silence.
    Idle,
    /// Start gap seen; the next pulse is the strobe.
    StartDetected,
    /// Accumulating data bits.
    Receiving,
    /// The pulse in flight is a parity bit.
    ParityCheck,
    /// Frame published valid; waiting for the next gap.
    FrameComplete,
    /// Frame failed; waiting for the next gap.
    FrameError,
}

/// A completed (or failed) frame as it crosses from producer to consumer.
///
/// `bits` holds the sixteen accumulated data bits — both halves, parity
/// excluded. Packs losslessly into a `u32` for the atomic handoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawFrame {
    /// Accumulated data bits, first half in the high byte.
    pub bits: u16,
    /// Whether both parity checks passed.
    pub valid: bool,
}

impl RawFrame {
    /// Pack into one word for atomic storage.
    pub const fn pack(self) -> u32 {
        self.bits as u32 | ((self.valid as u32) << 16)
    }

    /// Inverse of [`pack`](Self::pack).
    pub const fn unpack(raw: u32) -> Self {
        Self {
            bits: raw as u16,
            valid: (raw >> 16) & 1 == 1,
        }
    }
}

/// Reconstructs frames from edge events.
///
/// Single-writer: owned by the producer context, mutated only on edge
/// events, reset by every detected start condition.
pub struct FrameAssembler {
    phase: Phase,
    /// Index of the pulse currently in flight, 0..=19.
    pulse: u8,
    accumulator: u16,
    parity: u16,
    last_falling_us: Option<Timestamp>,
    window: BitWindow,
}

impl FrameAssembler {
    /// Create an idle assembler with the window seeded at `nominal_strobe_us`.
    pub const fn new(nominal_strobe_us: u32) -> Self {
        Self {
            phase: Phase::Idle,
            pulse: 0,
            accumulator: 0,
            parity: 0,
            last_falling_us: None,
            window: BitWindow::new(nominal_strobe_us),
        }
    }

    /// Feed one edge event, publishing into `slot` when a frame completes.
    pub fn on_edge(&mut self, edge: EdgeEvent, slot: &FrameSlot, monitor: &ConnectionMonitor) {
        match edge.level {
            EdgeLevel::Falling => self.on_falling(edge.timestamp_us),
            EdgeLevel::Rising => self.on_rising(edge.timestamp_us, slot, monitor),
        }
    }

    /// Current phase (diagnostics and tests).
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Index of the pulse currently in flight.
    pub fn pulse_index(&self) -> u8 {
        self.pulse
    }

    /// The adaptive bit window.
    pub fn window(&self) -> &BitWindow {
        &self.window
    }

    fn on_falling(&mut self, now_us: Timestamp) {
        let Some(last) = self.last_falling_us else {
            // Very first edge since construction: no interval to measure,
            // so the pulse it belongs to cannot be classified.
            self.last_falling_us = Some(now_us);
            return;
        };
        let interval = now_us.saturating_sub(last);
        self.last_falling_us = Some(now_us);

        if interval > START_GAP_US {
            // Inter-frame silence. Whatever was in progress is abandoned
            // unpublished; the pulse starting now is the strobe.
            self.phase = Phase::StartDetected;
            self.pulse = FIRST_STROBE_POS;
            self.accumulator = 0;
            self.parity = 0;
            return;
        }

        match self.phase {
            Phase::StartDetected | Phase::Receiving | Phase::ParityCheck => {
                self.pulse = self.pulse.saturating_add(1);
                self.phase = match self.pulse {
                    FIRST_PARITY_POS | FINAL_PARITY_POS => Phase::ParityCheck,
                    p if p >= PULSES_PER_FRAME => Phase::FrameError,
                    _ => Phase::Receiving,
                };
            }
            Phase::Idle | Phase::FrameComplete | Phase::FrameError => {}
        }
    }

    fn on_rising(&mut self, now_us: Timestamp, slot: &FrameSlot, monitor: &ConnectionMonitor) {
        let Some(last_falling) = self.last_falling_us else {
            return;
        };
        if matches!(
            self.phase,
            Phase::Idle | Phase::FrameComplete | Phase::FrameError
        ) {
            return;
        }

        let width = now_us.saturating_sub(last_falling);
        match self.pulse {
            FIRST_STROBE_POS | SECOND_STROBE_POS => {
                self.window.observe_start_pulse(width);
                self.phase = Phase::Receiving;
            }
            FIRST_PARITY_POS | FINAL_PARITY_POS => {
                let bit = self.window.classify(width).value();
                if bit != self.parity {
                    slot.publish(RawFrame {
                        bits: self.accumulator,
                        valid: false,
                    });
                    self.phase = Phase::FrameError;
                    return;
                }
                self.parity = 0;
                if self.pulse == FINAL_PARITY_POS {
                    slot.publish(RawFrame {
                        bits: self.accumulator,
                        valid: true,
                    });
                    monitor.record_frame(now_us);
                    self.phase = Phase::FrameComplete;
                } else {
                    self.phase = Phase::Receiving;
                }
            }
            _ => {
                let bit = self.window.classify(width).value();
                self.accumulator = (self.accumulator << 1) | bit;
                self.parity ^= bit;
            }
        }
    }
}
