//! Sensor models and their conversion profiles
//!
//! Every supported sensor is an explicit [`SensorModel`] variant carrying a
//! fixed [`SensorProfile`] — payload width plus the temperature span the
//! payload maps onto linearly. Two range families exist (full −50..150 °C
//! and narrow −10..60 °C), each in 11- and 14-bit payload widths; models
//! that share a family and width share the formula, and the enum makes that
//! sharing explicit instead of hiding it behind part-number arithmetic.

/// Payload width of a frame, in temperature-bearing bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BitWidth {
    /// 11-bit payload (0..=2047).
    Eleven,
    /// 14-bit payload (0..=16383).
    Fourteen,
}

impl BitWidth {
    /// Number of payload bits.
    pub const fn payload_bits(self) -> u32 {
        match self {
            BitWidth::Eleven => 11,
            BitWidth::Fourteen => 14,
        }
    }

    /// Largest representable payload value, `2^N - 1`.
    pub const fn max_payload(self) -> u32 {
        (1 << self.payload_bits()) - 1
    }
}

/// Immutable conversion profile: payload width and temperature span.
///
/// `payload * (high - low) / (2^N - 1) + low` maps a raw payload to °C.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorProfile {
    /// Payload width of the frames this sensor transmits.
    pub bit_width: BitWidth,
    /// Temperature at payload 0 (°C).
    pub low_temp_c: f32,
    /// Temperature at the maximum payload (°C).
    pub high_temp_c: f32,
}

impl SensorProfile {
    /// Temperature difference one payload step represents (°C).
    ///
    /// This is the quantization granularity of the sensor: decoded values
    /// are exact multiples of it above `low_temp_c`.
    pub fn quantization_step_c(&self) -> f32 {
        (self.high_temp_c - self.low_temp_c) / self.bit_width.max_payload() as f32
    }

    /// Convert a raw payload to °C.
    ///
    /// Bits above the profile width are masked off; callers that care about
    /// their presence must check before converting.
    pub fn celsius_from_payload(&self, payload: u16) -> f32 {
        let payload = u32::from(payload) & self.bit_width.max_payload();
        payload as f32 * (self.high_temp_c - self.low_temp_c)
            / self.bit_width.max_payload() as f32
            + self.low_temp_c
    }

    /// Inverse of [`celsius_from_payload`](Self::celsius_from_payload):
    /// the payload whose decoded value is nearest to `celsius`.
    ///
    /// Useful for simulators and round-trip tests. Out-of-span temperatures
    /// clamp to the payload range.
    pub fn payload_from_celsius(&self, celsius: f32) -> u16 {
        let max = self.bit_width.max_payload() as f32;
        let scaled = (celsius - self.low_temp_c) * max / (self.high_temp_c - self.low_temp_c);
        let clamped = if scaled < 0.0 {
            0.0
        } else if scaled > max {
            max
        } else {
            scaled
        };
        // round to nearest step
        (clamped + 0.5) as u16
    }
}

/// Supported TSIC sensor models.
///
/// Each variant resolves to exactly one [`SensorProfile`]; the historical
/// numeric part codes remain reachable through [`from_code`](Self::from_code).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SensorModel {
    /// TSIC 206: −50..150 °C, 11-bit payload.
    Tsic206,
    /// TSIC 306: −50..150 °C, 11-bit payload.
    Tsic306,
    /// TSIC 316: −50..150 °C, 14-bit payload.
    Tsic316,
    /// TSIC 506: −10..60 °C, 11-bit payload.
    Tsic506,
    /// TSIC 516: −10..60 °C, 14-bit payload.
    Tsic516,
    /// TSIC 716: −10..60 °C, 14-bit payload.
    Tsic716,
}

impl SensorModel {
    /// The conversion profile for this model.
    pub const fn profile(self) -> SensorProfile {
        match self {
            SensorModel::Tsic206 | SensorModel::Tsic306 => SensorProfile {
                bit_width: BitWidth::Eleven,
                low_temp_c: -50.0,
                high_temp_c: 150.0,
            },
            SensorModel::Tsic316 => SensorProfile {
                bit_width: BitWidth::Fourteen,
                low_temp_c: -50.0,
                high_temp_c: 150.0,
            },
            SensorModel::Tsic506 => SensorProfile {
                bit_width: BitWidth::Eleven,
                low_temp_c: -10.0,
                high_temp_c: 60.0,
            },
            SensorModel::Tsic516 | SensorModel::Tsic716 => SensorProfile {
                bit_width: BitWidth::Fourteen,
                low_temp_c: -10.0,
                high_temp_c: 60.0,
            },
        }
    }

    /// Resolve a numeric part code (206, 306, ...) to a model.
    ///
    /// Returns `None` for unknown codes rather than guessing a formula.
    pub const fn from_code(code: u16) -> Option<Self> {
        match code {
            206 => Some(SensorModel::Tsic206),
            306 => Some(SensorModel::Tsic306),
            316 => Some(SensorModel::Tsic316),
            506 => Some(SensorModel::Tsic506),
            516 => Some(SensorModel::Tsic516),
            716 => Some(SensorModel::Tsic716),
            _ => None,
        }
    }

    /// Human-readable part name.
    pub const fn name(self) -> &'static str {
        match self {
            SensorModel::Tsic206 => "TSIC 206",
            SensorModel::Tsic306 => "TSIC 306",
            SensorModel::Tsic316 => "TSIC 316",
            SensorModel::Tsic506 => "TSIC 506",
            SensorModel::Tsic516 => "TSIC 516",
            SensorModel::Tsic716 => "TSIC 716",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_table_matches_datasheets() {
        let p = SensorModel::Tsic306.profile();
        assert_eq!(p.bit_width, BitWidth::Eleven);
        assert_eq!(p.low_temp_c, -50.0);
        assert_eq!(p.high_temp_c, 150.0);

        let p = SensorModel::Tsic716.profile();
        assert_eq!(p.bit_width, BitWidth::Fourteen);
        assert_eq!(p.low_temp_c, -10.0);
        assert_eq!(p.high_temp_c, 60.0);

        // 306 and 206 share a formula; the enum says so openly
        assert_eq!(
            SensorModel::Tsic206.profile(),
            SensorModel::Tsic306.profile()
        );
    }

    #[test]
    fn code_lookup() {
        assert_eq!(SensorModel::from_code(306), Some(SensorModel::Tsic306));
        assert_eq!(SensorModel::from_code(716), Some(SensorModel::Tsic716));
        assert_eq!(SensorModel::from_code(999), None);
    }

    #[test]
    fn linear_mapping_endpoints() {
        let p = SensorModel::Tsic306.profile();
        assert_eq!(p.celsius_from_payload(0), -50.0);
        assert_eq!(p.celsius_from_payload(2047), 150.0);

        // mid-scale for the 14-bit full-range profile
        let p = SensorModel::Tsic316.profile();
        let t = p.celsius_from_payload(8192);
        assert!((t - (8192.0 * 200.0 / 16383.0 - 50.0)).abs() < 1e-4);
    }

    #[test]
    fn payload_round_trip_is_within_one_step() {
        let p = SensorModel::Tsic506.profile();
        for celsius in [-10.0, 0.0, 21.5, 37.2, 60.0] {
            let payload = p.payload_from_celsius(celsius);
            let back = p.celsius_from_payload(payload);
            assert!(
                (back - celsius).abs() <= p.quantization_step_c(),
                "{celsius} -> {payload} -> {back}"
            );
        }
    }

    #[test]
    fn payload_clamps_out_of_span() {
        let p = SensorModel::Tsic506.profile();
        assert_eq!(p.payload_from_celsius(-40.0), 0);
        assert_eq!(p.payload_from_celsius(100.0), 2047);
    }
}
