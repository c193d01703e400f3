//! Simulated board — bridges the host to the domain port traits.
//!
//! Combines a synthetic DHT22, the software RTC and a logging LED strip
//! behind [`SensorPort`], [`ClockPort`] and [`PixelPort`]. This is the
//! only module that stands in for actual peripherals.

use std::time::Instant;

use log::{debug, trace};

use crate::app::ports::{ClockPort, PixelPort, Reading, SensorError, SensorPort};
use crate::drivers::led_bank::{BLACK, NUM_LIGHTS, Rgb};
use crate::drivers::rtc::DateTime;

use super::time::SoftRtc;

/// Generates temperature/humidity that drift slowly across the default
/// alarm bands.
pub struct SimDht {
    start: Instant,
    /// Every n-th read times out; 0 disables failures.
    fail_every: u32,
    reads: u32,
}

impl SimDht {
    pub fn new(fail_every: u32) -> Self {
        Self {
            start: Instant::now(),
            fail_every,
            reads: 0,
        }
    }

    /// Sample at `t` seconds of simulated time.
    pub fn sample_at(t: f64) -> Reading {
        // 18–30 °C, i.e. roughly 64–86 °F.
        let temperature = 24.0 + 5.0 * (t / 120.0).sin() + (t / 37.0).cos();
        // 40–60 %RH with a different period.
        let humidity = 50.0 + 8.0 * (t / 180.0).sin() + 2.0 * (t / 23.0).cos();
        Reading {
            temperature_c: temperature as f32,
            humidity_pct: humidity as f32,
        }
    }
}

impl SensorPort for SimDht {
    fn read(&mut self) -> Result<Reading, SensorError> {
        self.reads = self.reads.wrapping_add(1);
        if self.fail_every != 0 && self.reads % self.fail_every == 0 {
            return Err(SensorError::Timeout);
        }
        let reading = Self::sample_at(self.start.elapsed().as_secs_f64());
        trace!("sim dht: {:?}", reading);
        Ok(reading)
    }
}

/// Concrete adapter that combines all simulated hardware behind port traits.
pub struct SimHardware {
    dht: SimDht,
    rtc: SoftRtc,
    strip: [Rgb; NUM_LIGHTS],
}

impl SimHardware {
    pub fn new(dht: SimDht, rtc: SoftRtc) -> Self {
        Self {
            dht,
            rtc,
            strip: [BLACK; NUM_LIGHTS],
        }
    }

    /// Colours last latched onto the strip.
    pub fn strip(&self) -> &[Rgb; NUM_LIGHTS] {
        &self.strip
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl SensorPort for SimHardware {
    fn read(&mut self) -> Result<Reading, SensorError> {
        self.dht.read()
    }
}

// ── ClockPort implementation ──────────────────────────────────

impl ClockPort for SimHardware {
    fn now(&mut self) -> DateTime {
        self.rtc.now()
    }

    fn set(&mut self, ts: DateTime) {
        self.rtc.set(ts);
    }
}

// ── PixelPort implementation ──────────────────────────────────

impl PixelPort for SimHardware {
    fn show(&mut self, pixels: &[Rgb]) {
        for (slot, px) in self.strip.iter_mut().zip(pixels) {
            *slot = *px;
        }
        debug!("strip: {:?}", self.strip);
    }
}
