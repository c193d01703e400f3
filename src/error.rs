//! Unified error types for the EnvNode firmware.
//!
//! [`Error`] is what service start-up returns: a rejected configuration or
//! an unreadable persistent region. Everything after start-up is terminal
//! for the current input unit only, so the interpreter errors below are
//! reported to the active output sink and never propagated.

use core::fmt;

use crate::app::ports::{ConfigError, StorageError};

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Failure bringing the service up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The configuration failed validation.
    Config(ConfigError),
    /// The persistent region rejected a read or write.
    Storage(StorageError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Storage(e) => write!(f, "storage: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Numeric operand errors
// ---------------------------------------------------------------------------

/// Failure modes of the decimal operand parser.
///
/// `NotANumber` and `Overflow` carry whatever was accumulated so that the
/// caller can log it; the value is never committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberError {
    /// More than five digits.
    TooLong,
    /// A non-digit character was found.
    NotANumber { partial: u32 },
    /// The digits describe a value above 65535.
    Overflow { value: u32 },
}

impl fmt::Display for NumberError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLong => write!(f, "Max length of number exceeded."),
            Self::NotANumber { .. } => write!(f, "Non-number entered."),
            Self::Overflow { .. } => write!(f, "Number exceeds limit."),
        }
    }
}

// ---------------------------------------------------------------------------
// Lexing errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputError {
    /// More than 22 significant characters.
    TooLong,
    /// A word matched no token and was not taken as an operand.
    UnknownWord,
    /// An operand word failed numeric parsing.
    Number(NumberError),
    /// The command needs more than eight token slots.
    SequenceFull,
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLong => write!(f, "Input too long."),
            Self::UnknownWord => write!(f, "Unrecognised word."),
            Self::Number(e) => write!(f, "{e}"),
            Self::SequenceFull => write!(f, "Too many arguments."),
        }
    }
}

impl From<NumberError> for InputError {
    fn from(e: NumberError) -> Self {
        Self::Number(e)
    }
}

// ---------------------------------------------------------------------------
// Grammar errors
// ---------------------------------------------------------------------------

/// Why a token sequence was rejected by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// No tokens before EOL.
    Empty,
    /// The leading token does not start any command family.
    UnknownFamily(u8),
    /// The token at `pos` is not valid for the family.
    Unexpected { pos: usize, found: u8 },
    /// The sequence was faulted during lexing.
    Malformed(InputError),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty command"),
            Self::UnknownFamily(t) => write!(f, "unknown leading token {t}"),
            Self::Unexpected { pos, found } => {
                write!(f, "unexpected token {found} at position {pos}")
            }
            Self::Malformed(e) => write!(f, "malformed input: {e}"),
        }
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
