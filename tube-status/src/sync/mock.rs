//! Scripted transport for testing and offline runs.
//!
//! Records every request it is given. It can reject the next request, and
//! it can answer each accepted request with a canned response loaded from
//! a JSON file, as if the feed had replied.

use std::path::Path;

use tokio::sync::mpsc::UnboundedSender;

use super::error::{SubmitError, TransportFailure};
use super::transport::{RequestId, Transport, TransportEvent};
use super::wire::{RequestBody, ResponsePayload};

/// Errors loading a canned response.
#[derive(Debug, thiserror::Error)]
pub enum MockError {
    #[error("failed to read mock response {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse mock response {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

/// A request handed to a [`ScriptedTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentRequest {
    pub id: RequestId,
    pub body: RequestBody,
}

/// Transport that records requests instead of sending them.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    sent: Vec<SentRequest>,
    reject_next: Option<String>,
    reply: Option<Reply>,
}

#[derive(Debug)]
struct Reply {
    outcome: Result<ResponsePayload, TransportFailure>,
    events: UnboundedSender<TransportEvent>,
}

impl ScriptedTransport {
    /// A transport that records requests and never answers them.
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport that answers every request with `payload`.
    pub fn replying(payload: ResponsePayload, events: UnboundedSender<TransportEvent>) -> Self {
        Self {
            reply: Some(Reply {
                outcome: Ok(payload),
                events,
            }),
            ..Self::default()
        }
    }

    /// A transport that fails every request with `failure`.
    pub fn failing(failure: TransportFailure, events: UnboundedSender<TransportEvent>) -> Self {
        Self {
            reply: Some(Reply {
                outcome: Err(failure),
                events,
            }),
            ..Self::default()
        }
    }

    /// A transport answering with the response dictionary stored at `path`.
    pub fn from_file(
        path: impl AsRef<Path>,
        events: UnboundedSender<TransportEvent>,
    ) -> Result<Self, MockError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| MockError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let payload = serde_json::from_str(&json).map_err(|source| MockError::Json {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::replying(payload, events))
    }

    /// Refuse the next request with `reason`.
    pub fn reject_next(&mut self, reason: impl Into<String>) {
        self.reject_next = Some(reason.into());
    }

    /// Requests accepted so far, oldest first.
    pub fn sent(&self) -> &[SentRequest] {
        &self.sent
    }

    /// Id of the most recently accepted request.
    pub fn last_id(&self) -> Option<RequestId> {
        self.sent.last().map(|r| r.id)
    }
}

impl Transport for ScriptedTransport {
    fn send_request(&mut self, id: RequestId, body: RequestBody) -> Result<(), SubmitError> {
        if let Some(reason) = self.reject_next.take() {
            return Err(SubmitError::Rejected(reason));
        }

        self.sent.push(SentRequest { id, body });

        if let Some(reply) = &self.reply {
            let event = TransportEvent {
                id,
                outcome: reply.outcome.clone(),
            };
            reply
                .events
                .send(event)
                .map_err(|_| SubmitError::Rejected("event queue closed".to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tokio::sync::mpsc;

    fn body() -> RequestBody {
        RequestBody {
            codes: "AABB".into(),
            protocol_version: 1,
        }
    }

    #[test]
    fn records_requests() {
        let mut transport = ScriptedTransport::new();
        transport.send_request(RequestId(1), body()).unwrap();
        transport.send_request(RequestId(2), body()).unwrap();

        assert_eq!(transport.sent().len(), 2);
        assert_eq!(transport.last_id(), Some(RequestId(2)));
    }

    #[test]
    fn reject_next_only_once() {
        let mut transport = ScriptedTransport::new();
        transport.reject_next("offline");

        let err = transport.send_request(RequestId(1), body()).unwrap_err();
        assert!(matches!(err, SubmitError::Rejected(ref r) if r == "offline"));
        assert!(transport.sent().is_empty());

        assert!(transport.send_request(RequestId(2), body()).is_ok());
    }

    #[test]
    fn replying_queues_event() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let payload = ResponsePayload::new("AA", "001");
        let mut transport = ScriptedTransport::replying(payload.clone(), tx);

        transport.send_request(RequestId(3), body()).unwrap();
        assert_eq!(rx.try_recv().unwrap(), TransportEvent::success(RequestId(3), payload));
    }

    #[test]
    fn failing_queues_failure() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let failure = TransportFailure::new(500, "boom");
        let mut transport = ScriptedTransport::failing(failure.clone(), tx);

        transport.send_request(RequestId(1), body()).unwrap();
        assert_eq!(rx.try_recv().unwrap(), TransportEvent::failure(RequestId(1), failure));
    }

    #[test]
    fn from_file_loads_payload() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"0":"BLCE","1":"001002"}}"#).unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut transport = ScriptedTransport::from_file(file.path(), tx).unwrap();
        transport.send_request(RequestId(1), body()).unwrap();

        let event = rx.try_recv().unwrap();
        assert_eq!(event.outcome.unwrap(), ResponsePayload::new("BLCE", "001002"));
    }

    #[test]
    fn from_file_reports_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let (tx, _rx) = mpsc::unbounded_channel();
        let err = ScriptedTransport::from_file(file.path(), tx).unwrap_err();
        assert!(matches!(err, MockError::Json { .. }));
    }

    #[test]
    fn from_file_reports_missing_file() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let err = ScriptedTransport::from_file("/nonexistent/response.json", tx).unwrap_err();
        assert!(matches!(err, MockError::Io { .. }));
    }
}
