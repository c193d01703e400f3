//! Decimal operand parser.

use crate::error::NumberError;

/// Longest accepted operand, in digits ("65535").
pub const MAX_DIGITS: usize = 5;

/// Parse an ASCII decimal string into a `u16`.
///
/// The overflow check runs after all digits are accumulated, so
/// `"99999"` reports `Overflow` rather than stopping early.
pub fn parse_number(digits: &[u8]) -> Result<u16, NumberError> {
    if digits.len() > MAX_DIGITS {
        return Err(NumberError::TooLong);
    }

    let mut value: u32 = 0;
    for &c in digits {
        if !c.is_ascii_digit() {
            return Err(NumberError::NotANumber { partial: value });
        }
        value = value * 10 + u32::from(c - b'0');
    }

    u16::try_from(value).map_err(|_| NumberError::Overflow { value })
}
