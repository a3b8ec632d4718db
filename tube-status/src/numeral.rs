//! Compact integer parser for numeric fields of the wire payload.
//!
//! Accepts optional leading spaces, an optional `-`, then one of:
//! a `0x` hex literal, a `0b` binary literal, a leading-zero octal literal,
//! or a decimal literal. Parsing stops at the first space or control
//! character. Callers slice fixed-width fields before parsing; the parser
//! knows nothing about widths.

/// Errors from [`parse_numeral`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NumeralError {
    /// Nothing but whitespace (or nothing at all).
    #[error("empty numeral")]
    Empty,

    /// A character that is not a digit of the selected radix.
    #[error("invalid digit {digit:?} for radix {radix} at offset {offset}")]
    InvalidDigit { digit: char, radix: u32, offset: usize },

    /// The value does not fit in an `i64`.
    #[error("numeral out of range")]
    Overflow,
}

/// A successfully parsed numeral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parsed {
    pub value: i64,
    /// Bytes consumed, including leading spaces and any prefix.
    pub consumed: usize,
}

/// Parse a numeral from the start of `input`.
///
/// # Examples
///
/// ```
/// use tube_status::numeral::parse_numeral;
///
/// assert_eq!(parse_numeral("0x1F").unwrap().value, 31);
/// assert_eq!(parse_numeral("-5").unwrap().value, -5);
/// assert_eq!(parse_numeral("017").unwrap().value, 15);
/// assert!(parse_numeral("09").is_err());
/// ```
pub fn parse_numeral(input: &str) -> Result<Parsed, NumeralError> {
    let bytes = input.as_bytes();
    let mut pos = bytes.iter().take_while(|&&b| b == b' ').count();
    let at = |i: usize| bytes.get(i).copied().unwrap_or(0);

    let negative = at(pos) == b'-';
    if negative {
        pos += 1;
    }

    let radix = if at(pos) == b'0' {
        pos += 1;
        match at(pos) {
            b'x' => {
                pos += 1;
                16
            }
            b'b' => {
                pos += 1;
                2
            }
            // A lone zero.
            c if c <= b' ' => {
                return Ok(Parsed {
                    value: 0,
                    consumed: pos,
                });
            }
            c if c.is_ascii_digit() => 8,
            c => {
                return Err(NumeralError::InvalidDigit {
                    digit: char::from(c),
                    radix: 8,
                    offset: pos,
                });
            }
        }
    } else {
        if at(pos) <= b' ' {
            return Err(NumeralError::Empty);
        }
        10
    };

    let mut value: i64 = 0;
    while at(pos) > b' ' {
        let c = at(pos);
        let digit = char::from(c)
            .to_digit(16)
            .filter(|&d| d < radix)
            .ok_or(NumeralError::InvalidDigit {
                digit: char::from(c),
                radix,
                offset: pos,
            })?;
        value = value
            .checked_mul(i64::from(radix))
            .and_then(|v| v.checked_add(i64::from(digit)))
            .ok_or(NumeralError::Overflow)?;
        pos += 1;
    }

    Ok(Parsed {
        value: if negative { -value } else { value },
        consumed: pos,
    })
}
