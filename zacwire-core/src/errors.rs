//! Error types for the read path
//!
//! Kept small and `Copy` — errors are returned from hot consumer loops and
//! carry no heap data. The split mirrors what the caller can act on:
//! `NotConnected` means silence on the wire (check wiring, maybe
//! re-`begin()`), `Misreading` means the wire is alive but this frame was
//! bad (just read again — the decoder keeps listening on its own).
//!
//! The producer path never surfaces errors at all; every anomaly it detects
//! becomes a state-machine transition and, at most, an invalid frame in the
//! handoff slot.

use thiserror_no_std::Error;

/// Result type for temperature reads.
pub type ReadResult<T> = Result<T, ReadError>;

/// Why a temperature read produced no value.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReadError {
    /// No fresh frame arrived before the timeout expired.
    #[error("no frame received before the timeout expired")]
    NotConnected,

    /// A frame arrived but failed validation; the next one may be fine.
    #[error("frame failed validation: {0}")]
    Misreading(Misreading),
}

impl From<Misreading> for ReadError {
    fn from(misreading: Misreading) -> Self {
        ReadError::Misreading(misreading)
    }
}

/// Which validation a received frame failed.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Misreading {
    /// One of the two parity checks failed.
    #[error("parity mismatch")]
    Parity,

    /// Data bits set above the profile's payload width.
    #[error("payload exceeds the profile bit width")]
    Framing,

    /// The decoded value moved implausibly fast against the previous one.
    #[error("rate {rate}°C/s exceeds limit {max_rate}°C/s")]
    ImplausibleRate {
        /// Observed change rate (°C per second).
        rate: f32,
        /// Configured plausibility limit.
        max_rate: f32,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for ReadError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::NotConnected => defmt::write!(fmt, "not connected"),
            Self::Misreading(m) => defmt::write!(fmt, "misreading: {}", m),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Misreading {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Parity => defmt::write!(fmt, "parity mismatch"),
            Self::Framing => defmt::write!(fmt, "payload exceeds bit width"),
            Self::ImplausibleRate { rate, max_rate } => {
                defmt::write!(fmt, "rate {}°C/s exceeds {}°C/s", rate, max_rate)
            }
        }
    }
}
