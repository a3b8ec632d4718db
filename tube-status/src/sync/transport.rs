//! The transport seam between the engine and the network.
//!
//! A transport accepts a request synchronously and later reports exactly
//! one [`TransportEvent`] for it. Events are delivered back to the engine on
//! the same event loop that issued the request.

use std::fmt;

use super::error::{SubmitError, TransportFailure};
use super::wire::{RequestBody, ResponsePayload};

/// Identifies one refresh request.
///
/// Ids increase with every request an engine issues, so a response can be
/// matched against the request that is currently outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Completion of a request previously accepted by a [`Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportEvent {
    pub id: RequestId,
    pub outcome: Result<ResponsePayload, TransportFailure>,
}

impl TransportEvent {
    pub fn success(id: RequestId, payload: ResponsePayload) -> Self {
        Self {
            id,
            outcome: Ok(payload),
        }
    }

    pub fn failure(id: RequestId, failure: TransportFailure) -> Self {
        Self {
            id,
            outcome: Err(failure),
        }
    }
}

/// Sends refresh requests to the status feed.
pub trait Transport {
    /// Hand a request to the network.
    ///
    /// Returning `Ok` promises exactly one [`TransportEvent`] with the same
    /// id later. Returning `Err` means the request was never sent and no
    /// event will follow.
    fn send_request(&mut self, id: RequestId, body: RequestBody) -> Result<(), SubmitError>;
}
