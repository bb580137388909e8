//! Benchmark for the per-edge hot path
//!
//! Measures assembling one complete frame (a priming pulse plus the 40
//! frame edges) through the producer path, including the atomic publish.
//! This is the work the edge ISR performs, so per-edge cost is the number
//! that matters for interrupt-time headroom.

use core::cell::Cell;

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use zacwire_core::{DecoderContext, EdgeEvent, EdgeLevel, EdgeSink};

/// Edge timeline for one primed frame of `bits`.
fn edges_for_frame(start_us: u64, bits: u16) -> Vec<EdgeEvent> {
    const PERIOD: u64 = 125;
    let mut events = Vec::with_capacity(42);
    let mut t = start_us;
    let mut pulse = |low: u64, t: &mut u64, events: &mut Vec<EdgeEvent>| {
        events.push(EdgeEvent::new(*t, EdgeLevel::Falling));
        events.push(EdgeEvent::new(*t + low, EdgeLevel::Rising));
        *t += PERIOD;
    };
    let bit_low = |one: bool| if one { 31 } else { 94 };

    // priming pulse + inter-frame gap
    pulse(62, &mut t, &mut events);
    t += 5_000;

    let hi = (bits >> 8) as u8;
    let lo = bits as u8;
    pulse(62, &mut t, &mut events);
    for i in (0..8).rev() {
        pulse(bit_low((hi >> i) & 1 == 1), &mut t, &mut events);
    }
    pulse(bit_low(hi.count_ones() & 1 == 1), &mut t, &mut events);
    pulse(62, &mut t, &mut events);
    for i in (0..8).rev() {
        pulse(bit_low((lo >> i) & 1 == 1), &mut t, &mut events);
    }
    pulse(bit_low(lo.count_ones() & 1 == 1), &mut t, &mut events);

    events
}

fn bench_assemble_frame(c: &mut Criterion) {
    let ctx = DecoderContext::new();
    // wire time must keep moving forward across iterations
    let cursor = Cell::new(1_000u64);

    c.bench_function("assemble_one_frame", |b| {
        b.iter_batched(
            || {
                let start = cursor.get();
                cursor.set(start + 200_000);
                edges_for_frame(start, 0x0555)
            },
            |edges| {
                for edge in edges {
                    ctx.on_edge(black_box(edge));
                }
            },
            BatchSize::SmallInput,
        )
    });

    assert!(ctx.slot().latest().is_some(), "bench never published a frame");
}

criterion_group!(benches, bench_assemble_frame);
criterion_main!(benches);
