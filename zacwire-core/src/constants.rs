//! Protocol timing and conversion constants
//!
//! All magic numbers for the wire protocol live here, with units in the
//! names. Timing values come from the TSIC datasheet family (nominal 8 kHz
//! baud, 50 % duty strobe) and are the same for every supported model; the
//! bit window itself adapts at runtime, these are only the starting points.

// ===== TIME UNIT CONVERSIONS =====

/// Microseconds per millisecond.
pub const US_PER_MS: u64 = 1000;

/// Microseconds per second.
pub const US_PER_SECOND: u64 = 1_000_000;

// ===== WIRE TIMING =====

/// Inter-frame silence threshold (microseconds).
///
/// Any falling-to-falling interval longer than this is idle line, and the
/// pulse that follows it is the start of a new frame. The longest in-frame
/// interval is one bit period (~125 µs), so 1000 µs separates cleanly.
pub const START_GAP_US: u64 = 1000;

/// Nominal strobe (start-bit low phase) width in microseconds.
///
/// Half the 125 µs bit period at the datasheet's 8 kHz baud rate. Seeds the
/// bit-window threshold until the first real strobe is observed.
pub const DEFAULT_STROBE_US: u32 = 62;

/// Nominal interval between two frames (microseconds).
///
/// The sensors transmit continuously at 10 Hz. `begin()` needs at least one
/// of these periods of settling before the first read can see a frame.
pub const NOMINAL_FRAME_PERIOD_US: u64 = 100_000;

// ===== FRAME LAYOUT =====
//
// A frame is 20 timed pulses. Positions 0 and 10 are strobes (window
// calibration), 9 and 19 carry even parity over the preceding data byte,
// everything else is payload, most significant bit first.

/// Total pulses per frame.
pub const PULSES_PER_FRAME: u8 = 20;

/// Pulse position of the first strobe.
pub const FIRST_STROBE_POS: u8 = 0;

/// Pulse position of the first parity bit.
pub const FIRST_PARITY_POS: u8 = 9;

/// Pulse position of the mid-frame strobe.
pub const SECOND_STROBE_POS: u8 = 10;

/// Pulse position of the final parity bit.
pub const FINAL_PARITY_POS: u8 = 19;

/// Data bits accumulated per frame (two 8-bit halves).
///
/// 11-bit models leave the upper five bits zero; 14-bit models the upper
/// two. Nonzero bits above the profile width mark a corrupt frame.
pub const ACCUMULATOR_BITS: u32 = 16;

// ===== CONSUMER DEFAULTS =====

/// Default blocking-read timeout (milliseconds).
///
/// One frame period plus margin: long enough for the next scheduled frame,
/// short enough to flag a dead wire promptly.
pub const DEFAULT_READ_TIMEOUT_MS: u32 = 110;

/// Default plausibility limit for temperature change (°C/s).
///
/// Thermal mass keeps real air/contact readings well under this; a faster
/// apparent change is a corrupt frame that slipped through parity.
pub const DEFAULT_MAX_RATE_C_PER_S: f32 = 10.0;
