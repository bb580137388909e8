//! Clock abstraction for the decoder
//!
//! The protocol is driven entirely by pulse timing, so the only thing the
//! core needs from the platform is a monotonic microsecond counter. The
//! `Clock` trait abstracts that counter so the decoder runs unchanged on
//! bare metal, an RTOS tick, or a Linux host, and so tests can control time
//! deterministically.

/// Timestamp in microseconds since an arbitrary epoch (typically device boot).
///
/// Must be monotonic: the decoder measures pulse widths as differences
/// between consecutive timestamps and never interprets absolute values.
pub type Timestamp = u64;

/// Source of monotonic time for the decoder.
///
/// ## Implementation Requirements
///
/// - `now_us()` must never go backwards; pulse-width math assumes it.
/// - Microsecond precision is expected. The shortest pulse the protocol
///   produces is roughly a quarter of the bit period (~30 µs at the nominal
///   8 kHz baud rate), so millisecond-grade clocks cannot drive the decoder.
/// - Implementations used from the consumer context only need `&self`
///   access; the producer path never queries the clock (edge timestamps
///   arrive with the events).
pub trait Clock {
    /// Current monotonic time in microseconds.
    fn now_us(&self) -> Timestamp;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_us(&self) -> Timestamp {
        (**self).now_us()
    }
}

/// Monotonic clock backed by [`std::time::Instant`] (requires `std`).
///
/// Measures microseconds since the clock was created.
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct StdClock {
    start: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    /// Create a clock whose epoch is "now".
    pub fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for StdClock {
    fn now_us(&self) -> Timestamp {
        self.start.elapsed().as_micros() as Timestamp
    }
}

/// Controllable clock for deterministic tests.
///
/// Time stands still unless advanced explicitly, or automatically by a fixed
/// step on every query (`auto_tick`). The auto-tick variant lets
/// single-threaded tests run a blocking read loop to its timeout without a
/// second thread driving the clock.
#[derive(Debug)]
pub struct FixedClock {
    now_us: core::cell::Cell<Timestamp>,
    tick_us: core::cell::Cell<u64>,
}

impl FixedClock {
    /// Create a clock frozen at `start_us`.
    pub const fn new(start_us: Timestamp) -> Self {
        Self {
            now_us: core::cell::Cell::new(start_us),
            tick_us: core::cell::Cell::new(0),
        }
    }

    /// Advance time automatically by `step_us` on every `now_us()` call.
    pub fn auto_tick(self, step_us: u64) -> Self {
        self.tick_us.set(step_us);
        self
    }

    /// Jump to an absolute timestamp.
    pub fn set(&self, timestamp_us: Timestamp) {
        self.now_us.set(timestamp_us);
    }

    /// Advance time by `delta_us`.
    pub fn advance(&self, delta_us: u64) {
        self.now_us.set(self.now_us.get().saturating_add(delta_us));
    }
}

impl Clock for FixedClock {
    fn now_us(&self) -> Timestamp {
        let now = self.now_us.get();
        let tick = self.tick_us.get();
        if tick > 0 {
            self.now_us.set(now.saturating_add(tick));
        }
        now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_advances() {
        let clock = FixedClock::new(1_000);
        assert_eq!(clock.now_us(), 1_000);

        clock.advance(500);
        assert_eq!(clock.now_us(), 1_500);

        clock.set(10_000);
        assert_eq!(clock.now_us(), 10_000);
    }

    #[test]
    fn auto_tick_moves_time_per_query() {
        let clock = FixedClock::new(0).auto_tick(250);
        assert_eq!(clock.now_us(), 0);
        assert_eq!(clock.now_us(), 250);
        assert_eq!(clock.now_us(), 500);
    }

    #[cfg(feature = "std")]
    #[test]
    fn std_clock_is_monotonic() {
        let clock = StdClock::new();
        let a = clock.now_us();
        let b = clock.now_us();
        assert!(b >= a);
    }
}
