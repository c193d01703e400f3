//! DHT22 temperature/humidity state and display formatting.
//!
//! Readings arrive in Celsius through [`SensorPort`](crate::app::ports::SensorPort);
//! the display scale only affects how they are printed. Alarm gates always
//! compare against whole degrees Fahrenheit.

use core::fmt;

use crate::app::ports::Reading;

/// Whole degrees Fahrenheit, truncated toward zero.
pub fn to_fahrenheit(celsius: f32) -> i16 {
    (celsius * 9.0 / 5.0 + 32.0) as i16
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    Celsius,
    Fahrenheit,
}

impl Scale {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Celsius => "Celsius",
            Self::Fahrenheit => "Fahrenheit",
        }
    }
}

/// A temperature rendered in the active scale, e.g. `72°F`.
#[derive(Debug, Clone, Copy)]
pub struct Temperature {
    pub celsius: f32,
    pub scale: Scale,
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scale {
            Scale::Fahrenheit => write!(f, "{}°F", to_fahrenheit(self.celsius)),
            Scale::Celsius => write!(f, "{}°C", self.celsius as i16),
        }
    }
}

/// A full reading line body, e.g. `72°F, 45%RH`.
#[derive(Debug, Clone, Copy)]
pub struct ReadingText {
    pub temperature: Temperature,
    pub humidity_pct: f32,
}

impl fmt::Display for ReadingText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}%RH", self.temperature, self.humidity_pct as i16)
    }
}

#[derive(Debug)]
pub struct DhtState {
    latest: Reading,
    scale: Scale,
    monitor: bool,
}

impl DhtState {
    pub fn new(fahrenheit: bool) -> Self {
        Self {
            latest: Reading::default(),
            scale: if fahrenheit {
                Scale::Fahrenheit
            } else {
                Scale::Celsius
            },
            monitor: false,
        }
    }

    pub fn record(&mut self, reading: Reading) {
        self.latest = reading;
    }

    pub fn latest(&self) -> Reading {
        self.latest
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn set_scale(&mut self, scale: Scale) {
        self.scale = scale;
    }

    pub fn monitoring(&self) -> bool {
        self.monitor
    }

    /// Returns the new monitor state.
    pub fn toggle_monitor(&mut self) -> bool {
        self.monitor = !self.monitor;
        self.monitor
    }

    pub fn temperature(&self, celsius: f32) -> Temperature {
        Temperature {
            celsius,
            scale: self.scale,
        }
    }

    pub fn reading_text(&self, reading: &Reading) -> ReadingText {
        ReadingText {
            temperature: self.temperature(reading.temperature_c),
            humidity_pct: reading.humidity_pct,
        }
    }

    /// Latest reading in the gates' scale.
    pub fn alarm_input(&self) -> i16 {
        to_fahrenheit(self.latest.temperature_c)
    }
}
