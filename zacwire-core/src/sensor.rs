//! Public read API
//!
//! [`ZacwireSensor`] ties the pieces together for the common case: arm the
//! edge source, block for the next frame, hand back Celsius or a reason.
//! The producer half keeps running between reads — frames stream at 10 Hz
//! whether anyone is listening or not — so a read is "wait for a frame
//! newer than the one I already consumed", not "request a measurement".
//!
//! After `begin()` the sensor needs about one frame period of settling
//! before the first read can succeed; the first frame may also calibrate
//! the bit window and be discarded as a misreading. Both are normal.

use crate::constants::{DEFAULT_MAX_RATE_C_PER_S, US_PER_MS};
use crate::context::DecoderContext;
use crate::decode::TemperatureDecoder;
use crate::edge::EdgeSource;
use crate::errors::{ReadError, ReadResult};
use crate::handoff::relax;
use crate::profile::SensorModel;
use crate::time::Clock;

// Macros for optional logging on the consumer path
#[cfg(feature = "log")]
macro_rules! log_trace {
    ($($arg:tt)*) => { log::trace!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_trace {
    ($($arg:tt)*) => {{}};
}

#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {{}};
}

/// One ZACwire temperature sensor on one data pin.
///
/// ## Example
///
/// ```no_run
/// use zacwire_core::{DecoderContext, SensorModel, ZacwireSensor};
/// # use zacwire_core::{EdgeSink, EdgeSource};
/// # struct MySource;
/// # impl EdgeSource for MySource {
/// #     type Error = ();
/// #     fn attach(&mut self, _: &'static dyn EdgeSink) -> Result<(), ()> { Ok(()) }
/// #     fn detach(&mut self) -> Result<(), ()> { Ok(()) }
/// # }
/// # struct MyClock;
/// # impl zacwire_core::Clock for MyClock {
/// #     fn now_us(&self) -> u64 { 0 }
/// # }
///
/// static CTX: DecoderContext = DecoderContext::new();
///
/// let mut sensor = ZacwireSensor::new(MySource, MyClock, SensorModel::Tsic306, &CTX);
/// sensor.begin().unwrap();
/// // ... let at least one frame period pass ...
/// match sensor.read_celsius(110) {
///     Ok(temp) => { /* use temp */ }
///     Err(e) => { /* NotConnected or Misreading */ }
/// }
/// ```
pub struct ZacwireSensor<E: EdgeSource, C: Clock> {
    source: E,
    clock: C,
    context: &'static DecoderContext,
    decoder: TemperatureDecoder,
    /// Sequence number of the last frame this reader consumed.
    last_seq: u32,
    attached: bool,
}

impl<E: EdgeSource, C: Clock> ZacwireSensor<E, C> {
    /// Build a sensor from its collaborators.
    ///
    /// `context` must be used by this one sensor only; it carries the
    /// producer state the edge source will write into.
    pub fn new(source: E, clock: C, model: SensorModel, context: &'static DecoderContext) -> Self {
        Self {
            source,
            clock,
            context,
            decoder: TemperatureDecoder::new(model.profile(), DEFAULT_MAX_RATE_C_PER_S),
            last_seq: 0,
            attached: false,
        }
    }

    /// Replace the default plausibility limit (°C per second).
    pub fn with_max_rate(mut self, max_rate_c_per_s: f32) -> Self {
        self.decoder = TemperatureDecoder::new(*self.decoder.profile(), max_rate_c_per_s);
        self
    }

    /// Arm the edge source and start decoding.
    ///
    /// Attachment failure is reported here, synchronously — never deferred
    /// to a later read. Allow at least one frame period of settling before
    /// the first `read_celsius`.
    pub fn begin(&mut self) -> Result<(), E::Error> {
        self.source.attach(self.context)?;
        self.attached = true;
        log_trace!("zacwire: edge source attached");
        Ok(())
    }

    /// Detach from the edge source.
    ///
    /// Safe to call at any time, including while an edge interrupt is in
    /// flight; once it returns, no further producer activity occurs.
    pub fn end(&mut self) -> Result<(), E::Error> {
        if self.attached {
            self.source.detach()?;
            self.attached = false;
            log_trace!("zacwire: edge source detached");
        }
        Ok(())
    }

    /// Block up to `timeout_ms` for a fresh frame and decode it.
    ///
    /// - A frame newer than the last consumed one arrives in time: its
    ///   decoded value, or [`ReadError::Misreading`] with the reason. A
    ///   misreading needs no recovery action — the decoder is already
    ///   listening for the next frame.
    /// - Nothing fresh arrives: [`ReadError::NotConnected`]. A stale frame
    ///   still sitting in the handoff slot does not count.
    pub fn read_celsius(&mut self, timeout_ms: u32) -> ReadResult<f32> {
        let deadline = self
            .clock
            .now_us()
            .saturating_add(u64::from(timeout_ms) * US_PER_MS);

        loop {
            if let Some(result) = self.consume_fresh() {
                return result;
            }
            if self.clock.now_us() >= deadline {
                log_trace!("zacwire: no fresh frame within {} ms", timeout_ms);
                return Err(ReadError::NotConnected);
            }
            relax();
        }
    }

    /// Non-blocking read: decode a fresh frame if one is available.
    ///
    /// Returns [`nb::Error::WouldBlock`] when no frame newer than the last
    /// consumed one has been published yet.
    pub fn try_read_celsius(&mut self) -> nb::Result<f32, ReadError> {
        match self.consume_fresh() {
            Some(Ok(celsius)) => Ok(celsius),
            Some(Err(e)) => Err(nb::Error::Other(e)),
            None => Err(nb::Error::WouldBlock),
        }
    }

    /// Whether a valid frame arrived within the last `timeout_ms`.
    pub fn is_connected(&self, timeout_ms: u32) -> bool {
        self.context
            .monitor()
            .is_connected(self.clock.now_us(), u64::from(timeout_ms) * US_PER_MS)
    }

    /// The shared decoder context (for diagnostics).
    pub fn context(&self) -> &'static DecoderContext {
        self.context
    }

    /// Decode the latest frame if this reader has not consumed it yet.
    fn consume_fresh(&mut self) -> Option<ReadResult<f32>> {
        let published = self.context.slot().latest()?;
        if published.seq == self.last_seq {
            return None;
        }
        self.last_seq = published.seq;

        let now = self.clock.now_us();
        match self.decoder.decode(published.frame, now) {
            Ok(celsius) => {
                log_trace!("zacwire: frame #{} -> {}°C", published.seq, celsius);
                Some(Ok(celsius))
            }
            Err(misreading) => {
                log_warn!("zacwire: frame #{} rejected: {}", published.seq, misreading);
                Some(Err(ReadError::Misreading(misreading)))
            }
        }
    }
}
