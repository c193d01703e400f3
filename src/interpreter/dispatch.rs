//! Token dispatcher, decode stage: [`TokenSequence`] → [`Command`].
//!
//! The leading token selects a family from [`FAMILIES`]; each family
//! decoder checks its positions and arity and yields a typed command.
//! Every position after the documented arguments must be EOL, so a
//! sequence is either accepted whole or rejected without side effects.
//!
//! ```text
//!  LED|RGB  [EOL | ON|OFF|BLINK | RED|GREEN|YELLOW | BYTE r BYTE g BYTE b]
//!  DHT      [EOL | MONITOR | LOG [EOL | INFO | CLEAR] | ALARM]
//!  TIME|DATE
//!  SET      [TIME|DATE BYTE a BYTE b BYTE c | BLINK n | DHT SCALE BYTE f
//!           | ALARM BYTE i n]
//!  VERSION, HELP
//! ```
//!
//! `n` is either `BYTE v` or `WORD hi lo`.

use super::lexer::TokenSequence;
use super::token::Token;
use crate::app::commands::Command;
use crate::app::ports::OutputSink;
use crate::drivers::led_bank::{GREEN, LightMode, RED, YELLOW};
use crate::error::CommandError;

/// Printed after every rejected command.
pub const UNKNOWN_COMMAND: &str = "Incorrect or unknown commands/options. Run help for details.";

type Decoder = fn(&Args<'_>) -> Result<Command, CommandError>;

/// Command families keyed by their leading token.
const FAMILIES: [(Token, Decoder); 8] = [
    (Token::Led, decode_led),
    (Token::Rgb, decode_led),
    (Token::Dht, decode_dht),
    (Token::Time, decode_clock),
    (Token::Date, decode_clock),
    (Token::Set, decode_set),
    (Token::Version, decode_version),
    (Token::Help, decode_help),
];

/// Validate a token sequence against the family grammars.
pub fn decode(seq: &TokenSequence) -> Result<Command, CommandError> {
    if let Some(fault) = seq.fault() {
        return Err(CommandError::Malformed(fault));
    }
    if seq.is_empty() {
        return Err(CommandError::Empty);
    }

    let args = Args { seq };
    let leading = args.raw(0);
    FAMILIES
        .iter()
        .find(|(token, _)| token.code() == leading)
        .map_or(Err(CommandError::UnknownFamily(leading)), |(_, decoder)| {
            decoder(&args)
        })
}

/// Write the diagnostic for a rejected command.
pub fn report(err: &CommandError, out: &mut dyn OutputSink) {
    if let CommandError::Malformed(fault) = err {
        out.line_fmt(format_args!("{fault}"));
    }
    out.write_line(UNKNOWN_COMMAND);
}

// ---------------------------------------------------------------------------
// Positional access
// ---------------------------------------------------------------------------

struct Args<'a> {
    seq: &'a TokenSequence,
}

impl Args<'_> {
    /// Raw value at `pos`; reading past the sequence yields EOL.
    fn raw(&self, pos: usize) -> u8 {
        self.seq.at(pos).unwrap_or(Token::Eol.code())
    }

    fn unexpected(&self, pos: usize) -> CommandError {
        CommandError::Unexpected {
            pos,
            found: self.raw(pos),
        }
    }

    fn token(&self, pos: usize) -> Result<Token, CommandError> {
        Token::from_code(self.raw(pos)).ok_or_else(|| self.unexpected(pos))
    }

    fn expect(&self, pos: usize, token: Token) -> Result<(), CommandError> {
        if self.raw(pos) == token.code() {
            Ok(())
        } else {
            Err(self.unexpected(pos))
        }
    }

    /// The sequence must end at `pos`.
    fn end(&self, pos: usize) -> Result<(), CommandError> {
        if pos == self.seq.len() {
            Ok(())
        } else {
            Err(self.unexpected(pos))
        }
    }

    /// Operand byte at `pos`; it must sit before the terminating EOL.
    fn operand(&self, pos: usize) -> Result<u8, CommandError> {
        if pos < self.seq.len() {
            Ok(self.raw(pos))
        } else {
            Err(self.unexpected(pos))
        }
    }

    /// `BYTE v` at `pos`.
    fn byte(&self, pos: usize) -> Result<u8, CommandError> {
        self.expect(pos, Token::Byte)?;
        self.operand(pos + 1)
    }

    /// `BYTE v` or `WORD hi lo` at `pos`; returns the value and the next
    /// position.
    fn number(&self, pos: usize) -> Result<(u16, usize), CommandError> {
        match self.token(pos)? {
            Token::Byte => Ok((u16::from(self.operand(pos + 1)?), pos + 2)),
            Token::Word => {
                let hi = self.operand(pos + 1)?;
                let lo = self.operand(pos + 2)?;
                Ok((u16::from_be_bytes([hi, lo]), pos + 3))
            }
            _ => Err(self.unexpected(pos)),
        }
    }

    /// Accept `cmd` only if nothing follows position `pos - 1`.
    fn finish(&self, pos: usize, cmd: Command) -> Result<Command, CommandError> {
        self.end(pos).map(|()| cmd)
    }
}

// ---------------------------------------------------------------------------
// Family decoders
// ---------------------------------------------------------------------------

fn decode_led(a: &Args<'_>) -> Result<Command, CommandError> {
    match a.token(1)? {
        Token::Eol => Ok(Command::LedStatus),
        Token::On => a.finish(2, Command::LedMode(LightMode::On)),
        Token::Off => a.finish(2, Command::LedMode(LightMode::Off)),
        Token::Blink => a.finish(2, Command::LedMode(LightMode::Blink)),
        Token::Red => a.finish(2, Command::LedColour(RED)),
        Token::Green => a.finish(2, Command::LedColour(GREEN)),
        Token::Yellow => a.finish(2, Command::LedColour(YELLOW)),
        Token::Byte => {
            let r = a.byte(1)?;
            let g = a.byte(3)?;
            let b = a.byte(5)?;
            a.finish(7, Command::LedColour((r, g, b)))
        }
        _ => Err(a.unexpected(1)),
    }
}

fn decode_dht(a: &Args<'_>) -> Result<Command, CommandError> {
    match a.token(1)? {
        Token::Eol => Ok(Command::DhtStatus),
        Token::Monitor => a.finish(2, Command::DhtMonitor),
        Token::Alarm => a.finish(2, Command::AlarmStatus),
        Token::Log => match a.token(2)? {
            Token::Eol => Ok(Command::LogDump),
            Token::Info => a.finish(3, Command::LogInfo),
            Token::Clear => a.finish(3, Command::LogClear),
            _ => Err(a.unexpected(2)),
        },
        _ => Err(a.unexpected(1)),
    }
}

fn decode_clock(a: &Args<'_>) -> Result<Command, CommandError> {
    a.finish(1, Command::ClockStatus)
}

fn decode_set(a: &Args<'_>) -> Result<Command, CommandError> {
    match a.token(1)? {
        which @ (Token::Time | Token::Date) => {
            let first = a.byte(2)?;
            let second = a.byte(4)?;
            let third = a.byte(6)?;
            let cmd = if which == Token::Time {
                Command::SetTime {
                    hour: first,
                    minute: second,
                    second: third,
                }
            } else {
                Command::SetDate {
                    year: first,
                    month: second,
                    day: third,
                }
            };
            a.finish(8, cmd)
        }
        Token::Blink => {
            let (rate, next) = a.number(2)?;
            a.finish(next, Command::SetBlinkRate(rate))
        }
        Token::Dht => {
            a.expect(2, Token::Scale)?;
            let scale = a.byte(3)?;
            a.finish(5, Command::SetScale(scale))
        }
        Token::Alarm => {
            let index = a.byte(2)?;
            let (value, next) = a.number(4)?;
            a.finish(next, Command::SetAlarmGate { index, value })
        }
        _ => Err(a.unexpected(1)),
    }
}

fn decode_version(a: &Args<'_>) -> Result<Command, CommandError> {
    a.finish(1, Command::Version)
}

fn decode_help(a: &Args<'_>) -> Result<Command, CommandError> {
    a.finish(1, Command::Help)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{InputError, NumberError};
    use crate::interpreter::lexer::Lexer;

    fn parse(s: &str) -> Result<Command, CommandError> {
        decode(&Lexer::new().tokenize(s.as_bytes()))
    }

    #[test]
    fn led_family() {
        assert_eq!(parse("led"), Ok(Command::LedStatus));
        assert_eq!(parse("rgb"), Ok(Command::LedStatus));
        assert_eq!(parse("led on"), Ok(Command::LedMode(LightMode::On)));
        assert_eq!(parse("led blink"), Ok(Command::LedMode(LightMode::Blink)));
        assert_eq!(parse("led yellow"), Ok(Command::LedColour(YELLOW)));
        assert_eq!(parse("rgb 10 20 30"), Ok(Command::LedColour((10, 20, 30))));
    }

    #[test]
    fn rgb_needs_three_bytes() {
        assert!(matches!(
            parse("rgb 10 20"),
            Err(CommandError::Unexpected { pos: 5, .. })
        ));
        // 300 is lexed as a WORD, which the colour grammar refuses.
        assert!(matches!(
            parse("rgb 10 300 30"),
            Err(CommandError::Unexpected { pos: 3, .. })
        ));
    }

    #[test]
    fn trailing_tokens_rejected() {
        assert!(parse("led on off").is_err());
        assert!(parse("version 1").is_err());
        assert!(parse("time led").is_err());
    }

    #[test]
    fn dht_family() {
        assert_eq!(parse("dht"), Ok(Command::DhtStatus));
        assert_eq!(parse("dht monitor"), Ok(Command::DhtMonitor));
        assert_eq!(parse("dht log"), Ok(Command::LogDump));
        assert_eq!(parse("dht log info"), Ok(Command::LogInfo));
        assert_eq!(parse("dht log clear"), Ok(Command::LogClear));
        assert_eq!(parse("dht alarm"), Ok(Command::AlarmStatus));
        assert!(parse("dht log on").is_err());
    }

    #[test]
    fn set_family() {
        assert_eq!(
            parse("set time 12 30 0"),
            Ok(Command::SetTime {
                hour: 12,
                minute: 30,
                second: 0
            })
        );
        assert_eq!(
            parse("set date 24 2 29"),
            Ok(Command::SetDate {
                year: 24,
                month: 2,
                day: 29
            })
        );
        assert_eq!(parse("set blink 500"), Ok(Command::SetBlinkRate(500)));
        assert_eq!(parse("set blink 90"), Ok(Command::SetBlinkRate(90)));
        assert_eq!(parse("set dht scale 0"), Ok(Command::SetScale(0)));
        assert_eq!(
            parse("set alarm 3 95"),
            Ok(Command::SetAlarmGate { index: 3, value: 95 })
        );
        assert_eq!(
            parse("set alarm 0 1000"),
            Ok(Command::SetAlarmGate {
                index: 0,
                value: 1000
            })
        );
    }

    #[test]
    fn set_scale_reads_operand_position() {
        assert!(parse("set dht scale").is_err());
        assert!(parse("set dht 1").is_err());
    }

    #[test]
    fn clock_and_bare_commands() {
        assert_eq!(parse("time"), Ok(Command::ClockStatus));
        assert_eq!(parse("date"), Ok(Command::ClockStatus));
        assert_eq!(parse("version"), Ok(Command::Version));
        assert_eq!(parse("help"), Ok(Command::Help));
    }

    #[test]
    fn empty_and_unknown() {
        assert_eq!(parse(""), Err(CommandError::Empty));
        assert_eq!(
            parse("on"),
            Err(CommandError::UnknownFamily(Token::On.code()))
        );
    }

    #[test]
    fn lexing_fault_rejects_whole_unit() {
        assert_eq!(
            parse("rgb 10 2x 30"),
            Err(CommandError::Malformed(InputError::Number(
                NumberError::NotANumber { partial: 2 }
            )))
        );
    }

    #[test]
    fn operand_bytes_are_not_mistaken_for_tokens() {
        // 63 is the EOL code but sits in an operand slot here.
        assert_eq!(parse("rgb 63 63 63"), Ok(Command::LedColour((63, 63, 63))));
    }

    #[test]
    fn truncated_word_operand_rejected() {
        let seq = TokenSequence::from_values(&[
            Token::Set.code(),
            Token::Blink.code(),
            Token::Word.code(),
            0x01,
        ]);
        assert!(matches!(
            decode(&seq),
            Err(CommandError::Unexpected { pos: 4, .. })
        ));
    }
}
