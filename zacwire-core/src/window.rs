//! Adaptive bit-window threshold
//!
//! Each data bit is a pulse whose low phase is either short (about a quarter
//! of the bit period) or long (about three quarters). The boundary between
//! the two drifts with sensor temperature, so instead of a fixed cutoff the
//! window re-derives its threshold from every strobe pulse — a pulse of
//! known 50 % duty at the head of each frame half.
//!
//! The correction is a fixed linear one: the new threshold is the observed
//! strobe width plus a quarter of the previous threshold. Iterated against a
//! stable strobe width `w` this converges to `4/3 · w`, which sits between
//! the short and long pulse widths with margin on both sides, and it tracks
//! slow drift without the state or latency of a moving-average filter.

use crate::time::Timestamp;

/// A classified data bit.
///
/// Polarity note: a *short* pulse on the wire is a logical **1**. That is
/// how the sensors encode data and it is deliberately counter-intuitive —
/// do not "fix" it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bit {
    /// Long low phase.
    Zero,
    /// Short low phase.
    One,
}

impl Bit {
    /// The bit as 0 or 1.
    pub const fn value(self) -> u16 {
        match self {
            Bit::Zero => 0,
            Bit::One => 1,
        }
    }
}

/// Pulse-width threshold separating logical 0 from logical 1.
#[derive(Debug, Clone)]
pub struct BitWindow {
    threshold_us: u32,
}

impl BitWindow {
    /// Create a window seeded from a nominal strobe width.
    ///
    /// The seed only matters until the first strobe of the first frame is
    /// observed; from then on the threshold is always derived from measured
    /// sensor timing.
    pub const fn new(nominal_strobe_us: u32) -> Self {
        Self {
            threshold_us: nominal_strobe_us + nominal_strobe_us / 4,
        }
    }

    /// Fold one observed strobe width into the threshold.
    pub fn observe_start_pulse(&mut self, width_us: Timestamp) {
        let width = clamp_width(width_us);
        self.threshold_us = width + self.threshold_us / 4;
    }

    /// Classify a data pulse by its low-phase width.
    pub fn classify(&self, width_us: Timestamp) -> Bit {
        if clamp_width(width_us) < self.threshold_us {
            Bit::One
        } else {
            Bit::Zero
        }
    }

    /// Current threshold in microseconds.
    pub fn threshold_us(&self) -> u32 {
        self.threshold_us
    }
}

fn clamp_width(width_us: Timestamp) -> u32 {
    if width_us > u32::MAX as Timestamp {
        u32::MAX
    } else {
        width_us as u32
    }
}
