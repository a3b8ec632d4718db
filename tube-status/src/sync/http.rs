//! HTTP transport for the status feed.
//!
//! Posts the request dictionary as JSON and decodes the response
//! dictionary. Each accepted request runs on its own task; its completion
//! is queued on the engine's event channel.

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use super::config::SyncConfig;
use super::error::{SubmitError, TransportFailure};
use super::transport::{RequestId, Transport, TransportEvent};
use super::wire::{RequestBody, ResponsePayload};

/// Maximum number of body characters quoted in a failure message.
const BODY_EXCERPT_CHARS: usize = 200;

/// Status feed transport over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    endpoint: String,
    events: UnboundedSender<TransportEvent>,
}

impl HttpTransport {
    /// Create a transport posting to `config.endpoint`.
    ///
    /// Completions are sent to `events`.
    pub fn new(
        config: &SyncConfig,
        events: UnboundedSender<TransportEvent>,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            events,
        })
    }
}

impl Transport for HttpTransport {
    fn send_request(&mut self, id: RequestId, body: RequestBody) -> Result<(), SubmitError> {
        let request = self.http.post(&self.endpoint).json(&body).build()?;
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| SubmitError::NoRuntime)?;

        let http = self.http.clone();
        let events = self.events.clone();
        runtime.spawn(async move {
            let outcome = fetch(&http, request).await;
            if let Err(failure) = &outcome {
                warn!(%id, status = failure.status, "status request failed: {}", failure.message);
            }
            if events.send(TransportEvent { id, outcome }).is_err() {
                debug!(%id, "engine stopped; dropping status response");
            }
        });

        debug!(%id, endpoint = %self.endpoint, "status request sent");
        Ok(())
    }
}

/// Execute a request and decode its body.
async fn fetch(
    http: &reqwest::Client,
    request: reqwest::Request,
) -> Result<ResponsePayload, TransportFailure> {
    let response = http
        .execute(request)
        .await
        .map_err(|e| TransportFailure::new(e.status().map_or(0, |s| s.as_u16()), e.to_string()))?;

    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(TransportFailure::new(status.as_u16(), excerpt(&body)));
    }

    let body = response
        .text()
        .await
        .map_err(|e| TransportFailure::new(status.as_u16(), e.to_string()))?;

    serde_json::from_str(&body).map_err(|e| {
        TransportFailure::new(
            status.as_u16(),
            format!("malformed response: {e} (body: {})", excerpt(&body)),
        )
    })
}

fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_CHARS).collect()
}
