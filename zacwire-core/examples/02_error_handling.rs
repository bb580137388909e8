//! Error Handling Example
//!
//! Walks through every failure the read API can report and what each one
//! means for the caller, by feeding hand-crafted frames — good, corrupt,
//! and implausible — straight into the decoder context.
//!
//! ## What You'll Learn
//!
//! - `NotConnected` vs `Misreading`, and why they need different reactions
//! - How parity and the plausibility guard reject corruption
//! - The non-blocking `try_read_celsius` variant
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 02_error_handling
//! ```

use zacwire_core::{
    DecoderContext, EdgeEvent, EdgeLevel, EdgeSink, EdgeSource, FixedClock, SensorModel,
    ZacwireSensor,
};

static CTX: DecoderContext = DecoderContext::new();

/// Edge source whose "platform" is this example: attach succeeds, and the
/// example feeds edges into the context by hand.
struct ManualSource;

impl EdgeSource for ManualSource {
    type Error = ();

    fn attach(&mut self, _sink: &'static dyn EdgeSink) -> Result<(), ()> {
        Ok(())
    }

    fn detach(&mut self) -> Result<(), ()> {
        Ok(())
    }
}

/// Sends one frame; `parity_ok = false` inverts the first parity bit.
fn send_frame(start_us: u64, bits: u16, parity_ok: bool) -> u64 {
    const PERIOD: u64 = 125;
    let mut t = start_us;
    let mut pulse = |low: u64, t: &mut u64| {
        CTX.on_edge(EdgeEvent::new(*t, EdgeLevel::Falling));
        CTX.on_edge(EdgeEvent::new(*t + low, EdgeLevel::Rising));
        *t += PERIOD;
    };
    let bit_low = |one: bool| if one { 31 } else { 94 };

    let hi = (bits >> 8) as u8;
    let lo = bits as u8;
    let p_hi = (hi.count_ones() & 1 == 1) ^ !parity_ok;
    let p_lo = lo.count_ones() & 1 == 1;

    pulse(62, &mut t);
    for i in (0..8).rev() {
        pulse(bit_low((hi >> i) & 1 == 1), &mut t);
    }
    pulse(bit_low(p_hi), &mut t);
    pulse(62, &mut t);
    for i in (0..8).rev() {
        pulse(bit_low((lo >> i) & 1 == 1), &mut t);
    }
    pulse(bit_low(p_lo), &mut t);

    t + 5_000 // leave an inter-frame gap behind
}

fn main() {
    println!("ZACwire Error Handling Example");
    println!("==============================\n");

    let clock = FixedClock::new(0).auto_tick(500);
    let mut sensor = ZacwireSensor::new(ManualSource, clock, SensorModel::Tsic306, &CTX);
    sensor.begin().expect("manual source always attaches");

    let profile = SensorModel::Tsic306.profile();

    // 1. Nothing on the wire yet
    println!("1. Reading before any frame arrives:");
    println!("   -> {:?}\n", sensor.read_celsius(110));

    // 2. A clean frame: prime the line, then ~22 °C
    let mut t = send_frame(1_000, profile.payload_from_celsius(22.0), true);
    // the first frame only gives the decoder its falling-edge reference;
    // repeat it now that the line is primed
    t = send_frame(t, profile.payload_from_celsius(22.0), true);
    println!("2. Clean frame at 22 °C:");
    println!("   -> {:?}\n", sensor.read_celsius(110));

    // 3. Same temperature, corrupted parity
    t = send_frame(t, profile.payload_from_celsius(22.1), false);
    println!("3. Frame with a flipped parity bit:");
    println!("   -> {:?}", sensor.read_celsius(110));
    println!("   (the decoder is already listening again — no recovery call needed)\n");

    // 4. Parity-clean frame, but 25 °C hotter within a fraction of a second
    t = send_frame(t, profile.payload_from_celsius(47.0), true);
    println!("4. Implausible 25 °C jump that passes parity:");
    println!("   -> {:?}\n", sensor.read_celsius(110));

    // 5. Non-blocking variant with nothing fresh
    let _ = t;
    println!("5. try_read_celsius with no fresh frame:");
    match sensor.try_read_celsius() {
        Err(nb::Error::WouldBlock) => println!("   -> WouldBlock (no fresh frame yet)\n"),
        other => println!("   -> {other:?}\n"),
    }

    sensor.end().expect("detach");
}
