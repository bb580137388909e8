//! Per-instance decoder context shared between ISR and reader
#![allow(unsafe_code)] // Interior mutability for the single-producer edge path
//!
//! One [`DecoderContext`] bundles everything both sides of the decoder
//! touch: the frame assembler (producer only), the frame slot and the
//! connection monitor (producer writes, consumer reads). It lives in a
//! `static` so the platform's edge interrupt can reach it at any time, and
//! one context owns exactly one edge-source registration — two sensors mean
//! two statics, never shared globals.
//!
//! ```rust
//! use zacwire_core::DecoderContext;
//!
//! static CTX: DecoderContext = DecoderContext::new();
//! ```
//!
//! ## Safety model
//!
//! The assembler sits in an `UnsafeCell` and is mutated through `&self`
//! from [`EdgeSink::on_edge`]. That is sound under the same contract the
//! edge source already guarantees: edges for one pin are delivered from a
//! single execution context, one at a time, in order. The consumer half
//! (`slot()`, `monitor()`) is all atomics and safe to use concurrently.

use core::cell::UnsafeCell;

use crate::constants::DEFAULT_STROBE_US;
use crate::edge::{EdgeEvent, EdgeSink};
use crate::frame::FrameAssembler;
use crate::handoff::FrameSlot;
use crate::monitor::ConnectionMonitor;

/// Shared state for one decoder instance.
pub struct DecoderContext {
    /// Producer-owned; see the module safety model.
    assembler: UnsafeCell<FrameAssembler>,
    slot: FrameSlot,
    monitor: ConnectionMonitor,
}

// The assembler is only touched by the single producer context; everything
// else is atomic.
unsafe impl Sync for DecoderContext {}

impl DecoderContext {
    /// Create a context with the nominal bit-window seed. Usable in
    /// `static` context.
    pub const fn new() -> Self {
        Self::with_nominal_strobe(DEFAULT_STROBE_US)
    }

    /// Create a context seeded for a sensor with a non-standard strobe
    /// width (microseconds).
    pub const fn with_nominal_strobe(nominal_strobe_us: u32) -> Self {
        Self {
            assembler: UnsafeCell::new(FrameAssembler::new(nominal_strobe_us)),
            slot: FrameSlot::new(),
            monitor: ConnectionMonitor::new(),
        }
    }

    /// The frame handoff slot (consumer side).
    pub fn slot(&self) -> &FrameSlot {
        &self.slot
    }

    /// The connection monitor (consumer side).
    pub fn monitor(&self) -> &ConnectionMonitor {
        &self.monitor
    }
}

impl EdgeSink for DecoderContext {
    /// Process one edge in producer context.
    ///
    /// Must only be called from the single context the edge source
    /// delivers from; concurrent calls would alias the assembler.
    fn on_edge(&self, edge: EdgeEvent) {
        // Sound per the module safety model: single producer context.
        let assembler = unsafe { &mut *self.assembler.get() };
        assembler.on_edge(edge, &self.slot, &self.monitor);
    }
}

impl Default for DecoderContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::EdgeLevel;

    #[test]
    fn context_is_usable_from_a_static() {
        static CTX: DecoderContext = DecoderContext::new();

        assert_eq!(CTX.slot().latest(), None);
        assert!(CTX.monitor().last_frame_at().is_none());

        // a lone edge must be harmless (startup discard)
        CTX.on_edge(EdgeEvent::new(0, EdgeLevel::Falling));
        assert_eq!(CTX.slot().latest(), None);
    }
}
