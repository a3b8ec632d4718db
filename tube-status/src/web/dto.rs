//! Data transfer objects for web responses.

use serde::Serialize;

use crate::sync::RefreshState;

/// Response to a refresh trigger.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// Refresh state once the request has been handled
    pub state: RefreshState,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
