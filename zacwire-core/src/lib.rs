//! Core decode engine for the ZACwire single-wire temperature protocol
//!
//! Turns a stream of GPIO edge timestamps from a TSIC-family sensor into
//! calibrated Celsius readings. The platform supplies two small traits —
//! an edge source and a monotonic clock — and the crate does the rest:
//! pulse-width bit reconstruction with an adaptive threshold, frame
//! assembly with double parity, a lock-free latest-value handoff out of
//! interrupt context, and validation before any number reaches the caller.
//!
//! Key constraints:
//! - Producer path runs in interrupt context: bounded time, no allocation,
//!   no locks, no suspension.
//! - `no_std` by default; `std` adds a host clock, `log` output and serde.
//! - One decoder instance per pin, state in an explicit per-instance
//!   context — nothing global.
//!
//! ```no_run
//! use zacwire_core::{DecoderContext, SensorModel, ZacwireSensor};
//! # struct Source;
//! # impl zacwire_core::EdgeSource for Source {
//! #     type Error = ();
//! #     fn attach(&mut self, _: &'static dyn zacwire_core::EdgeSink) -> Result<(), ()> { Ok(()) }
//! #     fn detach(&mut self) -> Result<(), ()> { Ok(()) }
//! # }
//! # let source = Source;
//! # let clock = zacwire_core::FixedClock::new(0);
//!
//! static CTX: DecoderContext = DecoderContext::new();
//!
//! let mut sensor = ZacwireSensor::new(source, clock, SensorModel::Tsic306, &CTX);
//! sensor.begin().expect("edge source unavailable");
//! match sensor.read_celsius(110) {
//!     Ok(celsius) => { let _ = celsius; }
//!     Err(_) => { /* NotConnected or Misreading */ }
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod constants;
pub mod context;
pub mod decode;
pub mod edge;
pub mod errors;
pub mod frame;
pub mod handoff;
pub mod monitor;
pub mod profile;
pub mod sensor;
pub mod time;
pub mod window;

// Public API
pub use context::DecoderContext;
pub use decode::TemperatureDecoder;
pub use edge::{EdgeEvent, EdgeLevel, EdgeSink, EdgeSource};
pub use errors::{Misreading, ReadError, ReadResult};
pub use profile::{BitWidth, SensorModel, SensorProfile};
pub use sensor::ZacwireSensor;
pub use time::{Clock, FixedClock, Timestamp};

#[cfg(feature = "std")]
pub use time::StdClock;

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
