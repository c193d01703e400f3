//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (console, datagram socket, sensor, clock, LED strip,
//! event sinks, config storage) implement these traits. The
//! [`AppService`](super::service::AppService) consumes them through
//! [`Ports`](super::service::Ports), so the domain core never touches
//! hardware directly. The persistent byte region has its own interface in
//! [`storage::region`](crate::storage::region).

use core::fmt;
use std::net::SocketAddrV4;

use crate::config::SystemConfig;
use crate::drivers::led_bank::Rgb;
use crate::drivers::rtc::DateTime;

// ───────────────────────────────────────────────────────────────
// Output sink (domain → interactive console or datagram reply)
// ───────────────────────────────────────────────────────────────

/// Which channel a command arrived on; replies go back the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Locally typed line on the serial console.
    Interactive,
    /// Datagram payload from the network.
    Message,
}

/// Text destination chosen by the caller for one dispatch.
///
/// The dispatcher only ever writes through this trait, so the same
/// status/help text is produced whatever the channel.
pub trait OutputSink {
    fn channel(&self) -> Channel;

    fn write_str(&mut self, text: &str);

    fn write_line(&mut self, line: &str) {
        self.write_str(line);
        self.write_str("\r\n");
    }

    /// Formatted text without a line ending.
    fn write_fmt(&mut self, args: fmt::Arguments<'_>) {
        struct Adapter<'a, S: ?Sized>(&'a mut S);

        impl<S: OutputSink + ?Sized> fmt::Write for Adapter<'_, S> {
            fn write_str(&mut self, s: &str) -> fmt::Result {
                self.0.write_str(s);
                Ok(())
            }
        }

        let _ = fmt::write(&mut Adapter(self), args);
    }

    /// Formatted text followed by `"\r\n"`.
    fn line_fmt(&mut self, args: fmt::Arguments<'_>) {
        self.write_fmt(args);
        self.write_str("\r\n");
    }
}

// ───────────────────────────────────────────────────────────────
// Console port (driven adapter: serial terminal ↔ domain)
// ───────────────────────────────────────────────────────────────

/// Byte-oriented local terminal.
pub trait ConsolePort {
    /// Next pending input byte, if any. Never blocks.
    fn read_byte(&mut self) -> Option<u8>;

    /// Write raw text (echo, prompts, command output).
    fn write_str(&mut self, text: &str);

    /// `true` when the terminal already echoes typed characters itself.
    fn local_echo(&self) -> bool {
        false
    }
}

// ───────────────────────────────────────────────────────────────
// Datagram port (driven adapter: network ↔ domain)
// ───────────────────────────────────────────────────────────────

/// Connectionless message transport used for remote commands and alarm
/// notifications.
pub trait DatagramPort {
    /// Whether the physical link is currently up.
    fn link_up(&mut self) -> bool;

    /// Receive one pending datagram into `buf`. Never blocks.
    fn recv(&mut self, buf: &mut [u8]) -> Option<(usize, SocketAddrV4)>;

    /// Send one datagram. Returns `false` if it could not be queued.
    fn send_to(&mut self, peer: SocketAddrV4, payload: &[u8]) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: DHT22 → domain)
// ───────────────────────────────────────────────────────────────

/// One temperature/humidity sample, in sensor-native units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Reading {
    pub temperature_c: f32,
    pub humidity_pct: f32,
}

pub trait SensorPort {
    fn read(&mut self) -> Result<Reading, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: RTC chip ↔ domain)
// ───────────────────────────────────────────────────────────────

/// Raw access to the real-time clock. Range checks happen in
/// [`rtc`](crate::drivers::rtc) before anything is written.
pub trait ClockPort {
    fn now(&mut self) -> DateTime;

    fn set(&mut self, ts: DateTime);
}

// ───────────────────────────────────────────────────────────────
// Pixel port (driven adapter: domain → addressable LED strip)
// ───────────────────────────────────────────────────────────────

pub trait PixelPort {
    /// Latch the given colours onto the strip.
    fn show(&mut self, pixels: &[Rgb]);
}

/// Everything the board exposes besides storage and the two input channels.
pub trait Hardware: SensorPort + ClockPort + PixelPort {}

impl<T: SensorPort + ClockPort + PixelPort> Hardware for T {}

// ───────────────────────────────────────────────────────────────
// Alarm notifier (domain → LED / network / log)
// ───────────────────────────────────────────────────────────────

/// Urgency hint that accompanies an alarm notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    /// Steady light.
    Calm,
    /// Blinking light.
    Attention,
}

/// Receives exactly one call per alarm state transition.
pub trait AlarmNotifier {
    fn alarm_changed(&mut self, description: &'static str, colour: Rgb, urgency: Urgency);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST validate config values before persisting.
/// Invalid ranges are rejected with [`ConfigError::ValidationFailed`],
/// not silently clamped.
pub trait ConfigPort {
    /// Returns [`SystemConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No config found in storage (first boot).
    NotFound,
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

/// Errors from [`PersistentRegion`](crate::storage::region::PersistentRegion) access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// The access would cross the end of the region.
    OutOfBounds { offset: usize, len: usize },
    /// The backing medium failed.
    Io,
}

/// Errors from [`SensorPort::read`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The sensor did not answer in time.
    Timeout,
    /// The frame arrived but its checksum did not match.
    Checksum,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::OutOfBounds { offset, len } => {
                write!(f, "access of {} bytes at {} is out of bounds", len, offset)
            }
            Self::Io => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for SensorError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Timeout => write!(f, "sensor timeout"),
            Self::Checksum => write!(f, "checksum mismatch"),
        }
    }
}

impl std::error::Error for ConfigError {}
impl std::error::Error for StorageError {}
impl std::error::Error for SensorError {}
