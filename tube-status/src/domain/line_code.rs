//! Line code type.

use std::fmt;

/// Error returned when parsing an invalid line code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid line code {input:?}: {reason}")]
pub struct InvalidLineCode {
    input: String,
    reason: &'static str,
}

/// A two-character line code, such as `BL` for Bakerloo.
///
/// Codes are exactly two printable, non-space ASCII characters. The
/// status feed and the local catalog both identify lines by code, so a
/// `LineCode` is the join key between a sync response and the directory.
///
/// # Examples
///
/// ```
/// use tube_status::domain::LineCode;
///
/// let bl = LineCode::parse("BL").unwrap();
/// assert_eq!(bl.as_str(), "BL");
///
/// // Wrong length is rejected
/// assert!(LineCode::parse("B").is_err());
/// assert!(LineCode::parse("BLX").is_err());
///
/// // Spaces are not printable code characters
/// assert!(LineCode::parse("B ").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineCode([u8; 2]);

impl LineCode {
    /// Width of a code on the wire.
    pub const WIDTH: usize = 2;

    /// Parse a line code from a string.
    pub fn parse(s: &str) -> Result<Self, InvalidLineCode> {
        let bytes = s.as_bytes();

        if bytes.len() != Self::WIDTH {
            return Err(InvalidLineCode {
                input: s.to_string(),
                reason: "must be exactly 2 characters",
            });
        }

        if !bytes.iter().all(u8::is_ascii_graphic) {
            return Err(InvalidLineCode {
                input: s.to_string(),
                reason: "must be printable ASCII",
            });
        }

        Ok(LineCode([bytes[0], bytes[1]]))
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        // Only ASCII graphic bytes are ever stored.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl fmt::Debug for LineCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineCode({})", self.as_str())
    }
}

impl fmt::Display for LineCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl serde::Serialize for LineCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_codes() {
        assert!(LineCode::parse("BL").is_ok());
        assert!(LineCode::parse("WC").is_ok());
        assert!(LineCode::parse("a9").is_ok());
        assert!(LineCode::parse("&!").is_ok());
    }

    #[test]
    fn reject_wrong_length() {
        assert!(LineCode::parse("").is_err());
        assert!(LineCode::parse("B").is_err());
        assert!(LineCode::parse("BLC").is_err());
    }

    #[test]
    fn reject_non_printable() {
        assert!(LineCode::parse("B ").is_err());
        assert!(LineCode::parse("\0L").is_err());
        assert!(LineCode::parse("B\n").is_err());
        assert!(LineCode::parse("Ö").is_err());
    }

    #[test]
    fn error_mentions_input() {
        let err = LineCode::parse("BLC").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid line code \"BLC\": must be exactly 2 characters"
        );
    }

    #[test]
    fn display_and_debug() {
        let code = LineCode::parse("JL").unwrap();
        assert_eq!(format!("{}", code), "JL");
        assert_eq!(format!("{:?}", code), "LineCode(JL)");
    }

    #[test]
    fn serializes_as_string() {
        let code = LineCode::parse("NO").unwrap();
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"NO\"");
    }
}
