//! Tokenizer: raw console line or datagram payload → [`TokenSequence`].
//!
//! ```text
//!  "set blink 500"
//!        │
//!        ▼
//!  [SET, BLINK, WORD, 0x01, 0xF4, EOL]
//! ```
//!
//! Words are separated by ASCII whitespace and compared case-insensitively.
//! Once a token that takes a positional operand has been seen (SET, RGB,
//! LED), unmatched words are parsed as numbers and emitted as
//! `BYTE v` (value < 256) or `WORD hi lo`.

use log::debug;

use super::numeric::parse_number;
use super::token::{Token, lookup};
use crate::error::InputError;

/// Longest accepted input, in significant characters.
pub const MAX_INPUT_LEN: usize = 22;

/// Slots available for tokens and operand bytes, excluding the EOL.
///
/// Sized for the longest grammar, `SET TIME BYTE h BYTE m BYTE s`.
pub const MAX_TOKENS: usize = 8;

/// One fully lexed command: at most eight values followed by EOL.
///
/// Values are raw bytes because operand bytes share the space with token
/// codes; position decides how a byte is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSequence {
    values: heapless::Vec<u8, { MAX_TOKENS + 1 }>,
    fault: Option<InputError>,
}

impl TokenSequence {
    fn new() -> Self {
        Self {
            values: heapless::Vec::new(),
            fault: None,
        }
    }

    /// Build a sequence directly from values; EOL is appended.
    ///
    /// Used by callers that already hold an encoded command (tests, the
    /// fuzz harness). Extra values beyond the capacity fault the sequence.
    pub fn from_values(values: &[u8]) -> Self {
        let mut seq = Self::new();
        for &v in values {
            seq.push(v);
        }
        seq.terminate();
        seq
    }

    /// Every value including the trailing EOL.
    pub fn as_slice(&self) -> &[u8] {
        &self.values
    }

    /// Number of values before the EOL.
    pub fn len(&self) -> usize {
        self.values.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value at `pos`, or `None` past the EOL.
    pub fn at(&self, pos: usize) -> Option<u8> {
        self.values.get(pos).copied()
    }

    /// First problem encountered while lexing, if any.
    pub fn fault(&self) -> Option<InputError> {
        self.fault
    }

    fn push(&mut self, value: u8) {
        if self.values.len() >= MAX_TOKENS {
            self.set_fault(InputError::SequenceFull);
            return;
        }
        // Capacity is MAX_TOKENS + 1, so this cannot fail.
        let _ = self.values.push(value);
    }

    fn push_operand(&mut self, value: u16) {
        let [hi, lo] = value.to_be_bytes();
        if hi == 0 {
            self.push(Token::Byte.code());
            self.push(lo);
        } else {
            self.push(Token::Word.code());
            self.push(hi);
            self.push(lo);
        }
    }

    fn set_fault(&mut self, fault: InputError) {
        if self.fault.is_none() {
            self.fault = Some(fault);
        }
    }

    fn terminate(&mut self) {
        let _ = self.values.push(Token::Eol.code());
    }
}

/// Stateless tokenizer; the only knob is how operand faults are handled.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lexer {
    lenient: bool,
}

impl Lexer {
    /// Strict lexer: bad operands and stray words fault the whole command.
    pub const fn new() -> Self {
        Self { lenient: false }
    }

    /// Legacy behaviour: bad operand words are dropped, over-length input
    /// is cut at [`MAX_INPUT_LEN`] and lexing goes on.
    pub const fn lenient() -> Self {
        Self { lenient: true }
    }

    pub fn tokenize(&self, input: &[u8]) -> TokenSequence {
        let mut seq = TokenSequence::new();

        let end = input.iter().position(|&b| b == 0).unwrap_or(input.len());
        let significant = input[..end].trim_ascii_end();
        if significant.len() > MAX_INPUT_LEN {
            if self.lenient {
                debug!("truncating {} bytes to {}", significant.len(), MAX_INPUT_LEN);
            } else {
                seq.set_fault(InputError::TooLong);
            }
        }

        let mut word: heapless::Vec<u8, MAX_INPUT_LEN> = heapless::Vec::new();
        let mut expect_operand = false;

        let bytes = significant.iter().take(MAX_INPUT_LEN).copied();
        for b in bytes.chain(core::iter::once(b' ')) {
            if !b.is_ascii_whitespace() {
                let _ = word.push(b.to_ascii_lowercase());
                continue;
            }
            if word.is_empty() {
                continue;
            }
            self.close_word(&word, &mut seq, &mut expect_operand);
            word.clear();
        }

        seq.terminate();
        debug!("lexed {:?} -> {:?}", significant, seq.as_slice());
        seq
    }

    fn close_word(&self, word: &[u8], seq: &mut TokenSequence, expect_operand: &mut bool) {
        if let Some(token) = lookup(word) {
            seq.push(token.code());
            if token.takes_operand() {
                *expect_operand = true;
            }
            return;
        }

        if *expect_operand {
            match parse_number(word) {
                Ok(value) => seq.push_operand(value),
                Err(e) if self.lenient => debug!("dropping operand {:?}: {}", word, e),
                Err(e) => seq.set_fault(e.into()),
            }
        } else if !self.lenient {
            seq.set_fault(InputError::UnknownWord);
        }
    }
}
