//! Sync error types.

use crate::numeral::NumeralError;

/// A refresh request could not be handed to the transport.
///
/// The request never left the client; the engine moves to `Error`.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// Building the HTTP request failed
    #[error("failed to build request: {0}")]
    Build(#[from] reqwest::Error),

    /// No async runtime to run the request on
    #[error("no async runtime available to send the request")]
    NoRuntime,

    /// The transport refused the request
    #[error("request rejected: {0}")]
    Rejected(String),
}

/// A submitted request failed remotely or in transit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("transport failure (status {status}): {message}")]
pub struct TransportFailure {
    /// HTTP status code, or 0 when no response was received.
    pub status: u16,
    pub message: String,
}

impl TransportFailure {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

/// Why a status field could not be read as a bitmask.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error(transparent)]
    Numeral(#[from] NumeralError),

    #[error("unexpected character {0:?} in decimal field")]
    NotDecimal(char),

    #[error("value {0} is not a valid bitmask")]
    OutOfRange(i64),
}

/// A single entry of a response that was skipped.
///
/// Skipped entries leave the line's previous status in place; the rest of
/// the batch is still applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlotError {
    /// The payload ended before this slot
    #[error("slot {index}: payload too short")]
    Missing { index: usize },

    /// The slot names a code the directory does not know
    #[error("slot {index}: unknown line code {code:?}")]
    UnknownLineCode { index: usize, code: String },

    /// The slot's status field is not a usable numeral
    #[error("slot {index}: malformed status {field:?}: {source}")]
    MalformedNumeral {
        index: usize,
        field: String,
        source: FieldError,
    },
}

impl SlotError {
    /// Position of the slot within the response.
    pub fn index(&self) -> usize {
        match self {
            SlotError::Missing { index }
            | SlotError::UnknownLineCode { index, .. }
            | SlotError::MalformedNumeral { index, .. } => *index,
        }
    }
}
