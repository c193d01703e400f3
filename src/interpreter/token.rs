//! Command tokens and the static word lookup table.
//!
//! A word is recognised by its first two characters plus its exact length,
//! so `"led"` and `"log"` are told apart by their second character and
//! `"dht"`/`"date"` by their length. Keys are unique across the table.

/// One recognised command word or structural marker.
///
/// The discriminants are the on-the-wire byte values stored in a
/// [`TokenSequence`](super::lexer::TokenSequence).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Token {
    Off = 0,
    On = 1,
    Blink = 2,
    Red = 3,
    Green = 4,
    Yellow = 5,

    Led = 9,
    Dht = 10,
    Rgb = 11,
    Set = 12,
    Version = 14,
    Help = 15,
    Time = 16,
    Date = 17,

    Log = 20,
    Clear = 21,
    Monitor = 22,
    Info = 23,
    Scale = 24,
    Alarm = 25,

    /// Followed by one operand byte.
    Byte = 26,
    /// Followed by two operand bytes, high then low.
    Word = 27,
    /// Terminates every sequence.
    Eol = 63,
}

impl Token {
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => Self::Off,
            1 => Self::On,
            2 => Self::Blink,
            3 => Self::Red,
            4 => Self::Green,
            5 => Self::Yellow,
            9 => Self::Led,
            10 => Self::Dht,
            11 => Self::Rgb,
            12 => Self::Set,
            14 => Self::Version,
            15 => Self::Help,
            16 => Self::Time,
            17 => Self::Date,
            20 => Self::Log,
            21 => Self::Clear,
            22 => Self::Monitor,
            23 => Self::Info,
            24 => Self::Scale,
            25 => Self::Alarm,
            26 => Self::Byte,
            27 => Self::Word,
            63 => Self::Eol,
            _ => return None,
        })
    }

    /// Tokens after which unmatched words are parsed as numbers.
    pub const fn takes_operand(self) -> bool {
        matches!(self, Self::Set | Self::Rgb | Self::Led | Self::Byte | Self::Word)
    }
}

/// A row of the lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupEntry {
    pub char1: u8,
    pub char2: u8,
    pub length: u8,
    pub token: Token,
}

const fn entry(word: &[u8], token: Token) -> LookupEntry {
    LookupEntry {
        char1: word[0],
        char2: word[1],
        length: word.len() as u8,
        token,
    }
}

/// Every word the interpreter understands.
pub const LOOKUP_TABLE: [LookupEntry; 20] = [
    entry(b"alarm", Token::Alarm),
    entry(b"blink", Token::Blink),
    entry(b"clear", Token::Clear),
    entry(b"date", Token::Date),
    entry(b"dht", Token::Dht),
    entry(b"green", Token::Green),
    entry(b"help", Token::Help),
    entry(b"info", Token::Info),
    entry(b"led", Token::Led),
    entry(b"log", Token::Log),
    entry(b"monitor", Token::Monitor),
    entry(b"off", Token::Off),
    entry(b"on", Token::On),
    entry(b"red", Token::Red),
    entry(b"rgb", Token::Rgb),
    entry(b"scale", Token::Scale),
    entry(b"set", Token::Set),
    entry(b"time", Token::Time),
    entry(b"version", Token::Version),
    entry(b"yellow", Token::Yellow),
];

/// Match a lower-cased word against the table. First match wins.
pub fn lookup(word: &[u8]) -> Option<Token> {
    if word.len() < 2 {
        return None;
    }
    LOOKUP_TABLE
        .iter()
        .find(|e| e.char1 == word[0] && e.char2 == word[1] && usize::from(e.length) == word.len())
        .map(|e| e.token)
}
