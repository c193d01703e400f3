//! System configuration parameters
//!
//! All tunable parameters for the EnvNode appliance. The host binary
//! loads them from a JSON file through the
//! [`ConfigPort`](crate::app::ports::ConfigPort); missing fields take the
//! defaults below.

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Timing ---
    /// DHT sampling and alarm evaluation interval (milliseconds)
    pub sample_interval_ms: u32,
    /// Interval between log appends (milliseconds)
    pub log_interval_ms: u32,
    /// Network link and datagram poll interval (milliseconds)
    pub network_poll_interval_ms: u32,
    /// Initial LED blink half-period (milliseconds)
    pub blink_rate_ms: u16,

    // --- Sensor ---
    /// Display temperatures in Fahrenheit rather than Celsius
    pub fahrenheit: bool,
    /// Alarm thresholds (°F) used when none are stored
    pub default_alarm_gates: [i16; 4],

    // --- Host adapters ---
    /// UDP port the command socket binds to
    pub udp_port: u16,
    /// File backing the emulated EEPROM
    pub eeprom_path: String,

    // --- Interpreter ---
    /// Silently drop malformed operands instead of rejecting the command
    pub lenient_operands: bool,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Timing
            sample_interval_ms: 5_000,
            log_interval_ms: 900_000, // 15 min
            network_poll_interval_ms: 50,
            blink_rate_ms: 500,

            // Sensor
            fahrenheit: true,
            default_alarm_gates: [60, 70, 80, 90],

            // Host adapters
            udp_port: 8888,
            eeprom_path: String::from("envnode.eeprom"),

            // Interpreter
            lenient_operands: false,
        }
    }
}

/// Range checks applied before a config is accepted or persisted.
pub fn validate_config(c: &SystemConfig) -> Result<(), ConfigError> {
    if c.sample_interval_ms == 0 {
        return Err(ConfigError::ValidationFailed("sample_interval_ms must be > 0"));
    }
    if c.log_interval_ms < c.sample_interval_ms {
        return Err(ConfigError::ValidationFailed(
            "log_interval_ms must be >= sample_interval_ms",
        ));
    }
    if c.network_poll_interval_ms == 0 {
        return Err(ConfigError::ValidationFailed(
            "network_poll_interval_ms must be > 0",
        ));
    }
    if c.blink_rate_ms == 0 {
        return Err(ConfigError::ValidationFailed("blink_rate_ms must be > 0"));
    }
    if c.default_alarm_gates.windows(2).any(|w| w[0] > w[1]) {
        return Err(ConfigError::ValidationFailed(
            "default_alarm_gates must be ascending",
        ));
    }
    if c.eeprom_path.is_empty() {
        return Err(ConfigError::ValidationFailed("eeprom_path must not be empty"));
    }
    Ok(())
}
