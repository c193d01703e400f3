//! Command interpreter: text → tokens → typed [`Command`].
//!
//! ```text
//!  "set time 12 30 0"
//!        │  lexer (+ numeric)
//!        ▼
//!  [SET, TIME, BYTE 12, BYTE 30, BYTE 0, EOL]
//!        │  dispatch::decode
//!        ▼
//!  Command::SetTime { hour: 12, minute: 30, second: 0 }
//! ```
//!
//! Execution of the decoded command lives in
//! [`AppService`](crate::app::service::AppService).

pub mod dispatch;
pub mod lexer;
pub mod numeric;
pub mod token;

pub use dispatch::{UNKNOWN_COMMAND, decode, report};
pub use lexer::{Lexer, MAX_INPUT_LEN, TokenSequence};
pub use token::Token;

use crate::app::commands::Command;
use crate::error::CommandError;

/// Tokenize and decode one input unit.
pub fn interpret(lexer: &Lexer, input: &[u8]) -> Result<Command, CommandError> {
    decode(&lexer.tokenize(input))
}
