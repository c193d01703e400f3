//! Standard-stream console adapter.
//!
//! Implements [`ConsolePort`] over stdin/stdout. A reader thread forwards
//! raw stdin bytes through a channel so the poll loop never blocks; all
//! editing happens in the core's line editor.

use std::io::{IsTerminal, Read, Write};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use log::{debug, warn};

use crate::app::ports::ConsolePort;

pub struct StdConsole {
    rx: Receiver<u8>,
    /// A cooked-mode terminal echoes typed characters itself.
    echoes: bool,
    closed: bool,
}

impl StdConsole {
    pub fn spawn() -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("stdin".into())
            .spawn(move || {
                let stdin = std::io::stdin();
                for byte in stdin.lock().bytes() {
                    match byte {
                        Ok(b) => {
                            if tx.send(b).is_err() {
                                return;
                            }
                        }
                        Err(e) => {
                            warn!("console: stdin read failed: {}", e);
                            return;
                        }
                    }
                }
                debug!("console: stdin closed");
            })?;
        Ok(Self {
            rx,
            echoes: std::io::stdin().is_terminal(),
            closed: false,
        })
    }

    /// `true` once stdin has reached end of file and every byte was read.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl ConsolePort for StdConsole {
    fn read_byte(&mut self) -> Option<u8> {
        match self.rx.try_recv() {
            Ok(b) => Some(b),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.closed = true;
                None
            }
        }
    }

    fn write_str(&mut self, text: &str) {
        let mut out = std::io::stdout().lock();
        if out.write_all(text.as_bytes()).and_then(|()| out.flush()).is_err() {
            debug!("console: stdout unavailable");
        }
    }

    fn local_echo(&self) -> bool {
        self.echoes
    }
}
