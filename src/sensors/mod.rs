//! Sensor subsystem.
//!
//! Only the DHT22 temperature/humidity sensor is fitted. Raw samples come
//! in through [`SensorPort`](crate::app::ports::SensorPort); [`dht`] keeps
//! the latest one together with its display settings.

pub mod dht;
