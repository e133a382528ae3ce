use std::{error::Error, fmt};

/// Byte order shared by the instruction encoding, the call stack and the
/// binary tooling.
pub type Endian = byteorder::LittleEndian;

/// Error returned by [`parse_int`] for a malformed integer literal.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ParseNumberError {
    pub literal: String,
}

impl fmt::Display for ParseNumberError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid integer literal: {}", &self.literal)
    }
}

impl Error for ParseNumberError {}

/// Parses a signed integer literal.
///
/// Accepts decimal (`123`, `-5`) and hexadecimal with a `0x` prefix
/// (`0x10`, `-0x20`).
pub fn parse_int(text: &str) -> Result<i64, ParseNumberError> {
    let s = text.trim();

    let err = || ParseNumberError {
        literal: text.to_string(),
    };

    let (negative, body) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };

    let magnitude = if let Some(digits) = body.strip_prefix("0x") {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err());
        }
        i64::from_str_radix(digits, 16).map_err(|_| err())?
    } else {
        if body.is_empty() || !body.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        body.parse::<i64>().map_err(|_| err())?
    };

    if negative {
        magnitude.checked_neg().ok_or_else(err)
    } else {
        Ok(magnitude)
    }
}
