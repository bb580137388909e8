//! Lock-free frame handoff between the edge ISR and the reader
//!
//! ## Overview
//!
//! A completed frame moves from the producer (interrupt context) to the
//! consumer (the blocking read) through a single-slot, overwrite-on-write
//! structure: the freshest frame always wins and history is never queued.
//! The producer must never block, allocate, or touch a lock — a mutex here
//! would hand a priority-inversion risk straight to the timing-critical
//! edge handler.
//!
//! ## Algorithm
//!
//! Two buffers alternate roles, "being written" and "consumer visible":
//!
//! ```text
//!  publish #1        publish #2        publish #3
//! ┌────┬────┐       ┌────┬────┐       ┌────┬────┐
//! │ W  │    │  ──►  │ R  │ W  │  ──►  │ W  │ R  │   W = producer writes
//! └────┴────┘       └────┴────┘       └────┴────┘   R = consumer reads
//!   state: seq=1,idx=0   seq=2,idx=1     seq=3,idx=0
//! ```
//!
//! A [`RawFrame`] packs into a single `u32`, so each buffer is one
//! `AtomicU32` and a read can never tear. The role swap is one release
//! store of the state word (sequence counter + active index); consumers
//! re-check the state word after reading a slot and retry if a publish
//! happened mid-read, so a frame is never paired with the wrong sequence
//! number.
//!
//! ## Memory Ordering
//!
//! - Slot stores happen before the state's **Release** store, so a consumer
//!   that **Acquire**-loads the state sees the frame it points at.
//! - The producer is the only writer of both slots and the state word, so
//!   its own loads can be relaxed.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::frame::RawFrame;
use crate::time::Clock;

/// Sequence numbers occupy the state word above the index bit.
const SEQ_SHIFT: u32 = 1;
const SEQ_MASK: u32 = u32::MAX >> SEQ_SHIFT;

/// A frame together with its publication sequence number.
///
/// Sequence numbers start at 1 and increase with every publish; comparing
/// them is how a reader tells a fresh frame from one it already consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Publication {
    /// The published frame.
    pub frame: RawFrame,
    /// Monotonic (wrapping) publish counter, never 0.
    pub seq: u32,
}

/// The consumer waited past its deadline without any frame appearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeout;

/// Single-producer, single-consumer latest-value frame slot.
///
/// ## Example
///
/// ```rust
/// use zacwire_core::handoff::FrameSlot;
/// use zacwire_core::frame::RawFrame;
///
/// static SLOT: FrameSlot = FrameSlot::new();
///
/// // Producer (interrupt handler):
/// SLOT.publish(RawFrame { bits: 0x0550, valid: true });
///
/// // Consumer (any task):
/// let published = SLOT.latest().unwrap();
/// assert_eq!(published.frame.bits, 0x0550);
/// ```
///
/// ## Producer contract
///
/// [`publish`](Self::publish) takes `&self` but is only correct when called
/// from a single execution context at a time; that is the same contract the
/// edge ISR already operates under.
pub struct FrameSlot {
    slots: [AtomicU32; 2],
    /// `(seq << 1) | active_index`; seq 0 means nothing published yet.
    state: AtomicU32,
}

impl FrameSlot {
    /// Create an empty slot. Usable in `static` context.
    pub const fn new() -> Self {
        Self {
            slots: [AtomicU32::new(0), AtomicU32::new(0)],
            state: AtomicU32::new(0),
        }
    }

    /// Publish a frame, replacing any unread predecessor. O(1), never
    /// blocks, never allocates.
    pub fn publish(&self, frame: RawFrame) {
        // Sole writer of `state`: a relaxed read of our own last store.
        let state = self.state.load(Ordering::Relaxed);
        let seq = state >> SEQ_SHIFT;
        let next_idx = (state & 1) ^ 1;
        let next_seq = (seq + 1) & SEQ_MASK;
        let next_seq = if next_seq == 0 { 1 } else { next_seq };

        self.slots[next_idx as usize].store(frame.pack(), Ordering::Relaxed);
        // Publish the slot write together with the new role assignment.
        self.state
            .store((next_seq << SEQ_SHIFT) | next_idx, Ordering::Release);
    }

    /// The most recently published frame, or `None` if nothing was ever
    /// published.
    ///
    /// Idempotent: repeated calls without an intervening publish return the
    /// same frame with the same sequence number. Nothing is consumed.
    pub fn latest(&self) -> Option<Publication> {
        loop {
            let s1 = self.state.load(Ordering::Acquire);
            if s1 >> SEQ_SHIFT == 0 {
                return None;
            }
            let raw = self.slots[(s1 & 1) as usize].load(Ordering::Acquire);
            // A publish may have raced the slot read; retry until stable.
            if self.state.load(Ordering::Acquire) == s1 {
                return Some(Publication {
                    frame: RawFrame::unpack(raw),
                    seq: s1 >> SEQ_SHIFT,
                });
            }
            core::hint::spin_loop();
        }
    }

    /// Block the *calling* context until a frame is available or the
    /// timeout expires. The producer is never blocked by this.
    pub fn take<C: Clock>(&self, clock: &C, timeout_us: u64) -> Result<RawFrame, Timeout> {
        let deadline = clock.now_us().saturating_add(timeout_us);
        loop {
            if let Some(published) = self.latest() {
                return Ok(published.frame);
            }
            if clock.now_us() >= deadline {
                return Err(Timeout);
            }
            relax();
        }
    }
}

impl Default for FrameSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// Yield politely while waiting on the producer.
pub(crate) fn relax() {
    #[cfg(feature = "std")]
    std::thread::yield_now();
    #[cfg(not(feature = "std"))]
    core::hint::spin_loop();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::FixedClock;

    #[test]
    fn empty_slot_has_no_frame() {
        let slot = FrameSlot::new();
        assert_eq!(slot.latest(), None);
    }

    #[test]
    fn latest_is_idempotent() {
        let slot = FrameSlot::new();
        slot.publish(RawFrame {
            bits: 0x0123,
            valid: true,
        });

        let first = slot.latest().unwrap();
        let second = slot.latest().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.frame.bits, 0x0123);
        assert_eq!(first.seq, 1);
    }

    #[test]
    fn newest_frame_wins() {
        let slot = FrameSlot::new();
        for bits in [1u16, 2, 3] {
            slot.publish(RawFrame { bits, valid: true });
        }

        let published = slot.latest().unwrap();
        assert_eq!(published.frame.bits, 3);
        assert_eq!(published.seq, 3);
    }

    #[test]
    fn take_times_out_on_empty_slot() {
        let slot = FrameSlot::new();
        let clock = FixedClock::new(0).auto_tick(500);
        assert_eq!(slot.take(&clock, 5_000), Err(Timeout));
    }

    #[test]
    fn take_returns_buffered_frame_immediately() {
        let slot = FrameSlot::new();
        slot.publish(RawFrame {
            bits: 42,
            valid: false,
        });

        let clock = FixedClock::new(0);
        let frame = slot.take(&clock, 1_000).unwrap();
        assert_eq!(frame.bits, 42);
        assert!(!frame.valid);
    }

    #[test]
    fn invalid_flag_survives_the_trip() {
        let slot = FrameSlot::new();
        slot.publish(RawFrame {
            bits: 0xFFFF,
            valid: false,
        });
        let published = slot.latest().unwrap();
        assert_eq!(published.frame.bits, 0xFFFF);
        assert!(!published.frame.valid);
    }
}
