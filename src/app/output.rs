//! The two [`OutputSink`]s a dispatch can write to.
//!
//! A console command writes straight through to the terminal. A datagram
//! command collects its reply in a fixed buffer that is sent back to the
//! peer as one packet once dispatch is done.

use log::warn;

use super::ports::{Channel, ConsolePort, OutputSink};

/// Largest reply datagram. Longer replies are cut at a character boundary.
pub const MAX_REPLY_LEN: usize = 1024;

pub struct ConsoleOut<'a> {
    console: &'a mut dyn ConsolePort,
}

impl<'a> ConsoleOut<'a> {
    pub fn new(console: &'a mut dyn ConsolePort) -> Self {
        Self { console }
    }
}

impl OutputSink for ConsoleOut<'_> {
    fn channel(&self) -> Channel {
        Channel::Interactive
    }

    fn write_str(&mut self, text: &str) {
        self.console.write_str(text);
    }
}

#[derive(Debug, Default)]
pub struct DatagramReply {
    buf: heapless::String<MAX_REPLY_LEN>,
    truncated: bool,
}

impl DatagramReply {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.buf.as_bytes()
    }
}

impl OutputSink for DatagramReply {
    fn channel(&self) -> Channel {
        Channel::Message
    }

    fn write_str(&mut self, text: &str) {
        if self.truncated {
            return;
        }
        if self.buf.push_str(text).is_ok() {
            return;
        }
        for c in text.chars() {
            if self.buf.push(c).is_err() {
                break;
            }
        }
        self.truncated = true;
        warn!("reply: truncated at {} bytes", self.buf.len());
    }
}
