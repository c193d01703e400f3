//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to                  |
//! |----------------|--------------------|------------------------------|
//! | `console`      | ConsolePort        | stdin / stdout               |
//! | `config_store` | ConfigPort         | JSON config file             |
//! | `eeprom`       | PersistentRegion   | EEPROM image file            |
//! | `hardware`     | SensorPort         | synthetic DHT22              |
//! |                | ClockPort          | software RTC                 |
//! |                | PixelPort          | logged LED strip             |
//! | `log_sink`     | EventSink          | `log` facade                 |
//! | `time`         | (loop clock)       | `std::time::Instant`, chrono |
//! | `udp`          | DatagramPort       | non-blocking UDP socket      |

pub mod config_store;
pub mod console;
pub mod eeprom;
pub mod hardware;
pub mod log_sink;
pub mod time;
pub mod udp;
