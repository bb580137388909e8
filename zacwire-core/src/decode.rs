//! Raw frame to calibrated temperature
//!
//! The conversion itself is one linear mapping per sensor profile. The
//! value of this module is in what it refuses to convert: frames that were
//! never marked valid, frames with data bits above the profile width, and
//! frames whose decoded value jumps faster than physics allows against the
//! previously reported reading. Parity catches most single-bit corruption;
//! the rate guard catches the rare multi-bit flip that happens to keep
//! parity intact.

use crate::constants::US_PER_SECOND;
use crate::errors::Misreading;
use crate::frame::RawFrame;
use crate::profile::SensorProfile;
use crate::time::Timestamp;

/// A reported temperature with the time it was decoded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimestampedReading {
    /// Temperature in °C.
    pub celsius: f32,
    /// Consumer-side decode time (monotonic microseconds).
    pub at_us: Timestamp,
}

/// Converts validated frames into Celsius values for one sensor profile.
///
/// Owned by the consumer; remembers the last reported value for the
/// plausibility check.
pub struct TemperatureDecoder {
    profile: SensorProfile,
    max_rate_c_per_s: f32,
    last: Option<TimestampedReading>,
}

impl TemperatureDecoder {
    /// Create a decoder for `profile` with the given plausibility limit.
    pub const fn new(profile: SensorProfile, max_rate_c_per_s: f32) -> Self {
        Self {
            profile,
            max_rate_c_per_s,
            last: None,
        }
    }

    /// The profile this decoder converts against.
    pub fn profile(&self) -> &SensorProfile {
        &self.profile
    }

    /// The last value this decoder reported, if any.
    pub fn last_reading(&self) -> Option<TimestampedReading> {
        self.last
    }

    /// Decode a frame received at `now_us`.
    ///
    /// A rejected frame never updates the comparison baseline, so a real
    /// fast temperature swing is only held back briefly: as time passes the
    /// apparent rate against the old baseline shrinks below the limit and
    /// the new level is accepted.
    pub fn decode(&mut self, frame: RawFrame, now_us: Timestamp) -> Result<f32, Misreading> {
        if !frame.valid {
            return Err(Misreading::Parity);
        }
        if u32::from(frame.bits) > self.profile.bit_width.max_payload() {
            return Err(Misreading::Framing);
        }

        let celsius = self.profile.celsius_from_payload(frame.bits);
        if let Some(last) = self.last {
            let rate = rate_per_second(celsius, last.celsius, now_us.saturating_sub(last.at_us));
            if rate > self.max_rate_c_per_s {
                return Err(Misreading::ImplausibleRate {
                    rate,
                    max_rate: self.max_rate_c_per_s,
                });
            }
        }

        self.last = Some(TimestampedReading {
            celsius,
            at_us: now_us,
        });
        Ok(celsius)
    }
}

/// Absolute rate of change per second.
///
/// A zero time delta reports zero rate: two frames decoded in the same
/// microsecond give no usable rate information, and rejecting them would
/// punish fast consumers.
fn rate_per_second(current: f32, previous: f32, delta_us: u64) -> f32 {
    if delta_us == 0 {
        return 0.0;
    }
    libm::fabsf(current - previous) * US_PER_SECOND as f32 / delta_us as f32
}
