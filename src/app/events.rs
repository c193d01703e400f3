//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other
//! side decide what to do with them (the host binary logs them).

use std::net::SocketAddrV4;

use crate::alarm::AlarmLevel;
use crate::error::CommandError;

use super::ports::{Channel, SensorError};

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Storage was loaded and the lights are up.
    Started { log_entries: usize, gates: [i16; 4] },

    /// The alarm evaluator moved to a new level.
    AlarmChanged { level: AlarmLevel, fahrenheit: i16 },

    /// A reading was appended to the persistent log.
    LogAppended { count: usize, write_offset: usize },

    /// `DHT LOG CLEAR` completed.
    LogCleared,

    /// An input unit was rejected by the interpreter.
    CommandRejected { channel: Channel, error: CommandError },

    /// The periodic sensor sample failed.
    SampleFailed(SensorError),

    /// The first datagram after boot fixed the notification destination.
    DestinationLearned(SocketAddrV4),

    /// The network link went up (`true`) or down.
    LinkChanged(bool),
}
