//! Simulated Sensor Example
//!
//! Runs the full decoder against a software-simulated TSIC 306: a producer
//! thread plays the sensor's edge waveform into the decoder context the way
//! a GPIO interrupt would, while the main thread reads temperatures through
//! the public API.
//!
//! ## What You'll Learn
//!
//! - Wiring an `EdgeSource` implementation to a static `DecoderContext`
//! - The begin → settle → read lifecycle
//! - Why the first frame after `begin()` may be sacrificed to calibration
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_simulated_sensor
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use zacwire_core::{
    Clock, DecoderContext, EdgeEvent, EdgeLevel, EdgeSink, EdgeSource, SensorModel, SensorProfile,
    StdClock, ZacwireSensor,
};

static CTX: DecoderContext = DecoderContext::new();

/// Plays one frame's worth of edges into the sink.
///
/// Pulse widths follow the nominal 8 kHz timing: 125 µs bit period, 50 %
/// duty strobe, short low for 1, long low for 0.
fn transmit_frame(sink: &dyn EdgeSink, start_us: u64, bits: u16) {
    const PERIOD: u64 = 125;
    let mut t = start_us;
    let mut pulse = |low: u64, t: &mut u64| {
        sink.on_edge(EdgeEvent::new(*t, EdgeLevel::Falling));
        sink.on_edge(EdgeEvent::new(*t + low, EdgeLevel::Rising));
        *t += PERIOD;
    };
    let parity = |byte: u8| -> u64 {
        if byte.count_ones() & 1 == 1 {
            31
        } else {
            94
        }
    };
    let hi = (bits >> 8) as u8;
    let lo = bits as u8;

    pulse(62, &mut t); // strobe
    for i in (0..8).rev() {
        pulse(if (hi >> i) & 1 == 1 { 31 } else { 94 }, &mut t);
    }
    pulse(parity(hi), &mut t);
    pulse(62, &mut t); // second strobe
    for i in (0..8).rev() {
        pulse(if (lo >> i) & 1 == 1 { 31 } else { 94 }, &mut t);
    }
    pulse(parity(lo), &mut t);
}

/// Edge source backed by a thread that simulates the sensor's 10 Hz stream.
struct SimulatedSensor {
    clock: StdClock,
    profile: SensorProfile,
    stop: Arc<AtomicBool>,
    worker: Option<thread::JoinHandle<()>>,
}

impl SimulatedSensor {
    fn new(clock: StdClock, profile: SensorProfile) -> Self {
        Self {
            clock,
            profile,
            stop: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }
}

impl EdgeSource for SimulatedSensor {
    type Error = ();

    fn attach(&mut self, sink: &'static dyn EdgeSink) -> Result<(), ()> {
        let stop = Arc::clone(&self.stop);
        let clock = self.clock.clone();
        let profile = self.profile;

        self.worker = Some(thread::spawn(move || {
            // a slow warm-up ramp around room temperature
            let mut celsius = 21.0f32;
            while !stop.load(Ordering::Relaxed) {
                let payload = profile.payload_from_celsius(celsius);
                transmit_frame(sink, clock.now_us(), payload);
                celsius += 0.05;
                thread::sleep(Duration::from_millis(100));
            }
        }));
        Ok(())
    }

    fn detach(&mut self) -> Result<(), ()> {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
        Ok(())
    }
}

fn main() {
    println!("ZACwire Simulated Sensor Example");
    println!("================================\n");

    let clock = StdClock::new();
    let model = SensorModel::Tsic306;
    let source = SimulatedSensor::new(clock.clone(), model.profile());

    let mut sensor = ZacwireSensor::new(source, clock, model, &CTX);
    sensor.begin().expect("simulated edge source always attaches");
    println!("begin() ok — settling for one frame period...\n");
    thread::sleep(Duration::from_millis(120));

    for i in 1..=8 {
        match sensor.read_celsius(110) {
            Ok(celsius) => println!("reading {i}: {celsius:6.2} °C"),
            Err(e) => println!("reading {i}: {e}"),
        }
    }

    println!(
        "\nconnected within the last 110 ms: {}",
        sensor.is_connected(110)
    );

    sensor.end().expect("detach");
    println!("end() ok — producer stopped");
}
