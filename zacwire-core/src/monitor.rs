//! Connection monitoring
//!
//! Distinguishes "no sensor attached" from "sensor sending bad frames". The
//! producer stamps the time of every valid published frame; the consumer
//! compares that stamp against its own deadline. A reader that sees recent
//! valid frames but keeps getting misreadings knows the wire is alive and
//! the data is the problem — the opposite calls for checking the wiring.

use core::sync::atomic::{AtomicU64, Ordering};

use crate::time::Timestamp;

/// Sentinel for "no valid frame has ever been published".
const NEVER: u64 = u64::MAX;

/// Tracks the timestamp of the last valid published frame.
///
/// Written by the producer, read by the consumer. A consumer read may
/// observe a slightly stale stamp; that only shifts the timeout
/// classification by one frame, never the correctness of a decoded value.
pub struct ConnectionMonitor {
    last_valid_us: AtomicU64,
}

impl ConnectionMonitor {
    /// Create a monitor that has seen nothing yet.
    pub const fn new() -> Self {
        Self {
            last_valid_us: AtomicU64::new(NEVER),
        }
    }

    /// Record a valid published frame (producer side).
    pub fn record_frame(&self, timestamp_us: Timestamp) {
        self.last_valid_us.store(timestamp_us, Ordering::Release);
    }

    /// Whether a valid frame arrived within `timeout_us` of `now_us`.
    pub fn is_connected(&self, now_us: Timestamp, timeout_us: u64) -> bool {
        match self.last_frame_at() {
            Some(last) => now_us.saturating_sub(last) <= timeout_us,
            None => false,
        }
    }

    /// Timestamp of the last valid frame, if any.
    pub fn last_frame_at(&self) -> Option<Timestamp> {
        let last = self.last_valid_us.load(Ordering::Acquire);
        if last == NEVER {
            None
        } else {
            Some(last)
        }
    }
}

impl Default for ConnectionMonitor {
    fn default() -> Self {
        Self::new()
    }
}
