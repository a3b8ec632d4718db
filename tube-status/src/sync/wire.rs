//! Wire payloads exchanged with the status feed.
//!
//! Both directions are flat key-value dictionaries keyed by field index.
//! Requests carry every line code concatenated in display order plus a
//! protocol marker. Responses carry two parallel positional strings: the
//! line codes (two characters each) and their status numerals (fixed width
//! each). There are no delimiters, so both sides must agree on the widths.

use serde::{Deserialize, Serialize};

use crate::domain::LineCode;
use crate::numeral::parse_numeral;

use super::config::StatusWidth;
use super::error::{FieldError, SlotError};

/// Body of a refresh request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestBody {
    /// All line codes, concatenated in display order.
    #[serde(rename = "0")]
    pub codes: String,
    #[serde(rename = "1")]
    pub protocol_version: i32,
}

/// Body of a successful response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponsePayload {
    /// Line codes, two characters per entry.
    #[serde(rename = "0")]
    pub order: String,
    /// Status numerals, one fixed-width field per entry.
    #[serde(rename = "1")]
    pub statuses: String,
}

impl ResponsePayload {
    pub fn new(order: impl Into<String>, statuses: impl Into<String>) -> Self {
        Self {
            order: order.into(),
            statuses: statuses.into(),
        }
    }

    /// Decode entry `index`: its line code and status bitmask.
    ///
    /// The code is not checked against any directory here; an invalid code
    /// is reported as [`SlotError::UnknownLineCode`].
    pub fn slot(&self, index: usize, width: StatusWidth) -> Result<(LineCode, u32), SlotError> {
        let code_field = field(&self.order, index, LineCode::WIDTH)
            .ok_or(SlotError::Missing { index })?;
        let code = LineCode::parse(code_field).map_err(|_| SlotError::UnknownLineCode {
            index,
            code: code_field.to_string(),
        })?;

        let status_field = field(&self.statuses, index, width.chars())
            .ok_or(SlotError::Missing { index })?;
        let status = parse_status_field(status_field).map_err(|source| {
            SlotError::MalformedNumeral {
                index,
                field: status_field.to_string(),
                source,
            }
        })?;

        Ok((code, status))
    }
}

/// The `index`-th field of `width` bytes, if the string is long enough.
fn field(s: &str, index: usize, width: usize) -> Option<&str> {
    let start = index.checked_mul(width)?;
    s.get(start..start.checked_add(width)?)
}

/// Read a zero-padded decimal status field.
///
/// Padding zeros are dropped before parsing so that `"016"` is sixteen
/// rather than an octal literal. Only decimal digits, optionally surrounded
/// by spaces, are accepted; signs and radix prefixes are rejected. Values
/// wider than 32 bits are out of range.
pub fn parse_status_field(field: &str) -> Result<u32, FieldError> {
    let trimmed = field.trim_matches(' ');

    if let Some(c) = trimmed.chars().find(|c| !c.is_ascii_digit()) {
        return Err(FieldError::NotDecimal(c));
    }

    let bytes = trimmed.as_bytes();
    let mut start = 0;
    while bytes.get(start) == Some(&b'0') && bytes.get(start + 1).is_some() {
        start += 1;
    }

    let parsed = parse_numeral(&trimmed[start..])?;
    u32::try_from(parsed.value).map_err(|_| FieldError::OutOfRange(parsed.value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeral::NumeralError;

    #[test]
    fn request_serializes_with_index_keys() {
        let body = RequestBody {
            codes: "AABB".into(),
            protocol_version: 1,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"0":"AABB","1":1}"#
        );
    }

    #[test]
    fn response_deserializes_from_index_keys() {
        let payload: ResponsePayload =
            serde_json::from_str(r#"{"0":"AABB","1":"001002"}"#).unwrap();
        assert_eq!(payload, ResponsePayload::new("AABB", "001002"));
    }

    #[test]
    fn response_missing_field_is_an_error() {
        assert!(serde_json::from_str::<ResponsePayload>(r#"{"0":"AABB"}"#).is_err());
    }

    #[test]
    fn status_field_is_decimal() {
        assert_eq!(parse_status_field("001"), Ok(1));
        assert_eq!(parse_status_field("016"), Ok(16));
        assert_eq!(parse_status_field("256"), Ok(256));
        assert_eq!(parse_status_field("09"), Ok(9));
        assert_eq!(parse_status_field("000"), Ok(0));
        assert_eq!(parse_status_field("00"), Ok(0));
        assert_eq!(parse_status_field(" 18"), Ok(18));
        assert_eq!(parse_status_field("18 "), Ok(18));
    }

    #[test]
    fn status_field_rejects_radix_prefixes() {
        assert_eq!(parse_status_field("0x1"), Err(FieldError::NotDecimal('x')));
        assert_eq!(parse_status_field("0b1"), Err(FieldError::NotDecimal('b')));
        assert_eq!(parse_status_field("00x"), Err(FieldError::NotDecimal('x')));
        assert_eq!(parse_status_field("0b "), Err(FieldError::NotDecimal('b')));
        assert_eq!(parse_status_field("-0x"), Err(FieldError::NotDecimal('-')));
    }

    #[test]
    fn status_field_rejects_garbage() {
        assert_eq!(
            parse_status_field("   "),
            Err(FieldError::Numeral(NumeralError::Empty))
        );
        assert_eq!(parse_status_field("0?1"), Err(FieldError::NotDecimal('?')));
        assert_eq!(parse_status_field("1 2"), Err(FieldError::NotDecimal(' ')));
        assert_eq!(parse_status_field("-01"), Err(FieldError::NotDecimal('-')));
        assert_eq!(
            parse_status_field("99999999999"),
            Err(FieldError::OutOfRange(99_999_999_999))
        );
    }

    #[test]
    fn slot_slices_parallel_fields() {
        let payload = ResponsePayload::new("AABBCC", "001002004");
        let (code, status) = payload.slot(2, StatusWidth::Three).unwrap();
        assert_eq!(code.as_str(), "CC");
        assert_eq!(status, 4);
    }

    #[test]
    fn slot_with_two_character_statuses() {
        let payload = ResponsePayload::new("AABB", "0118");
        assert_eq!(payload.slot(0, StatusWidth::Two).unwrap().1, 1);
        assert_eq!(payload.slot(1, StatusWidth::Two).unwrap().1, 18);
    }

    #[test]
    fn slot_past_end_is_missing() {
        let payload = ResponsePayload::new("AABB", "001");
        assert_eq!(
            payload.slot(1, StatusWidth::Three),
            Err(SlotError::Missing { index: 1 })
        );
        assert_eq!(
            payload.slot(2, StatusWidth::Three),
            Err(SlotError::Missing { index: 2 })
        );
    }

    #[test]
    fn slot_with_invalid_code() {
        let payload = ResponsePayload::new("A BB", "001002");
        assert_eq!(
            payload.slot(0, StatusWidth::Three),
            Err(SlotError::UnknownLineCode {
                index: 0,
                code: "A ".into()
            })
        );
    }

    #[test]
    fn slot_with_bad_numeral() {
        let payload = ResponsePayload::new("AA", "0z1");
        assert!(matches!(
            payload.slot(0, StatusWidth::Three),
            Err(SlotError::MalformedNumeral { index: 0, .. })
        ));
    }

    #[test]
    fn slot_on_non_ascii_boundary_is_missing() {
        let payload = ResponsePayload::new("AÖ", "001");
        assert_eq!(
            payload.slot(0, StatusWidth::Three),
            Err(SlotError::Missing { index: 0 })
        );
    }
}
