//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (stderr through `env_logger` on the host).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { log_entries, gates } => {
                info!("START | log_entries={} gates={:?}", log_entries, gates);
            }
            AppEvent::AlarmChanged { level, fahrenheit } => {
                info!(
                    "ALARM | {} ({}) at {}\u{00b0}F",
                    level.description(),
                    *level as i8,
                    fahrenheit
                );
            }
            AppEvent::LogAppended {
                count,
                write_offset,
            } => {
                info!("LOG   | appended, entries={} next={}", count, write_offset);
            }
            AppEvent::LogCleared => {
                info!("LOG   | cleared");
            }
            AppEvent::CommandRejected { channel, error } => {
                info!("CMD   | rejected on {:?}: {}", channel, error);
            }
            AppEvent::SampleFailed(e) => {
                warn!("DHT   | sample failed: {}", e);
            }
            AppEvent::DestinationLearned(peer) => {
                info!("NET   | destination {}", peer);
            }
            AppEvent::LinkChanged(up) => {
                info!("NET   | link {}", if *up { "up" } else { "down" });
            }
        }
    }
}
