//! Byte-at-a-time line editor for the local console.
//!
//! Captures letters, digits, spaces and hyphens (lower-cased) up to
//! [`MAX_INPUT_LEN`] characters, handles backspace, submits on CR or LF
//! and recalls the previous line on the up-arrow sequence `ESC [ A`.
//! While "press any key" is armed, the next key is swallowed and reported
//! as [`Edit::Dismissed`] instead of being edited.

use crate::app::ports::ConsolePort;
use crate::interpreter::MAX_INPUT_LEN;

const BACKSPACE: u8 = 0x08;
const DELETE: u8 = 0x7F;
const ESC: u8 = 0x1B;
const CSI: u8 = b'[';
const UP_ARROW: u8 = b'A';

/// One captured console line.
pub type Line = heapless::Vec<u8, MAX_INPUT_LEN>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Nothing to act on yet.
    Pending,
    /// Enter was pressed on a non-empty line.
    Submit(Line),
    /// A key was pressed while "press any key" was armed.
    Dismissed,
}

#[derive(Debug, Default)]
pub struct LineEditor {
    buf: Line,
    last: Line,
    escaped: bool,
    after_cr: bool,
    press_any_key: bool,
}

impl LineEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swallow the next key instead of editing with it.
    pub fn arm_press_any_key(&mut self) {
        self.press_any_key = true;
    }

    pub fn is_waiting_for_key(&self) -> bool {
        self.press_any_key
    }

    /// Print the prompt for the next line.
    pub fn prompt(&self, console: &mut dyn ConsolePort) {
        if self.press_any_key {
            console.write_str("Press any key to continue...\r\n");
        } else {
            console.write_str("\r\n>");
        }
    }

    pub fn feed(&mut self, byte: u8, console: &mut dyn ConsolePort) -> Edit {
        let Some(key) = self.decode(byte) else {
            return Edit::Pending;
        };

        if self.press_any_key {
            self.press_any_key = false;
            self.buf.clear();
            return Edit::Dismissed;
        }

        let echo = !console.local_echo();
        match key {
            Key::Up => {
                if echo {
                    for _ in 0..self.buf.len() {
                        console.write_str("\x08 \x08");
                    }
                    console.write_str(as_text(&self.last));
                }
                self.buf.clone_from(&self.last);
                Edit::Pending
            }
            Key::Byte(BACKSPACE | DELETE) => {
                if self.buf.pop().is_some() && echo {
                    console.write_str("\x08 \x08");
                }
                Edit::Pending
            }
            Key::Byte(b'\r' | b'\n') => {
                if echo {
                    console.write_str("\r\n");
                }
                if self.buf.is_empty() {
                    self.prompt(console);
                    return Edit::Pending;
                }
                self.last.clone_from(&self.buf);
                Edit::Submit(core::mem::take(&mut self.buf))
            }
            Key::Byte(b) if capturable(b) => {
                if self.buf.push(b.to_ascii_lowercase()).is_ok() && echo {
                    let ch = [b];
                    console.write_str(as_text(&ch));
                }
                Edit::Pending
            }
            Key::Byte(_) => Edit::Pending,
        }
    }

    /// Collapse escape sequences; a LF straight after CR is dropped.
    fn decode(&mut self, byte: u8) -> Option<Key> {
        let after_cr = core::mem::replace(&mut self.after_cr, byte == b'\r');
        if byte == ESC || (self.escaped && byte == CSI) {
            self.escaped = true;
            return None;
        }
        if self.escaped {
            self.escaped = false;
            return (byte == UP_ARROW).then_some(Key::Up);
        }
        if byte == b'\n' && after_cr {
            return None;
        }
        Some(Key::Byte(byte))
    }
}

#[derive(Debug, Clone, Copy)]
enum Key {
    Byte(u8),
    Up,
}

fn capturable(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b' ' || b == b'\t' || b == b'-'
}

/// Every captured byte is ASCII.
fn as_text(bytes: &[u8]) -> &str {
    core::str::from_utf8(bytes).unwrap_or_default()
}
