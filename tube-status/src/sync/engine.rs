//! The sync engine and its refresh state machine.
//!
//! The engine owns the line directory. A refresh moves the state to
//! `Updating` and hands a request to the transport; the transport's single
//! completion event then moves it to `Ok` or `Error`:
//!
//! ```text
//! Updating --success--> Ok
//! Updating --failure--> Error
//! Ok | Error --refresh--> Updating
//! ```
//!
//! Issuing a refresh while one is outstanding supersedes it. Completions
//! carry the [`RequestId`] they answer, and any completion that does not
//! match the outstanding request is dropped so late responses cannot
//! overwrite newer data.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::directory::{Line, LineDirectory, UnknownLineCode};

use super::config::SyncConfig;
use super::error::{SlotError, SubmitError, TransportFailure};
use super::transport::{RequestId, Transport, TransportEvent};
use super::wire::{RequestBody, ResponsePayload};

/// Lifecycle of the most recent refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshState {
    Updating,
    Ok,
    Error,
}

/// Receives the engine's notifications.
pub trait Presenter {
    /// Engine state or directory contents changed; redraw.
    fn data_changed(&mut self);

    /// A response entry was skipped. Unknown codes mean the feed's catalog
    /// and ours have drifted apart.
    fn alert(&mut self, skipped: &SlotError);
}

/// Outcome of applying one response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Entries written to the directory.
    pub applied: usize,
    /// Entries skipped, in response order.
    pub skipped: Vec<SlotError>,
}

/// Keeps a [`LineDirectory`] in sync with the status feed.
pub struct SyncEngine<T, P> {
    directory: LineDirectory,
    config: SyncConfig,
    transport: T,
    presenter: P,
    state: RefreshState,
    last_id: u64,
    outstanding: Option<RequestId>,
    last_updated: Option<DateTime<Utc>>,
}

impl<T: Transport, P: Presenter> SyncEngine<T, P> {
    /// Create an engine. No request is sent until [`Self::request_refresh`].
    pub fn new(directory: LineDirectory, config: SyncConfig, transport: T, presenter: P) -> Self {
        Self {
            directory,
            config,
            transport,
            presenter,
            state: RefreshState::Updating,
            last_id: 0,
            outstanding: None,
            last_updated: None,
        }
    }

    /// Start a refresh, superseding any request still outstanding.
    ///
    /// If the transport refuses the request the engine moves straight to
    /// `Error` and the submit error is returned.
    pub fn request_refresh(&mut self) -> Result<RequestId, SubmitError> {
        self.last_id += 1;
        let id = RequestId(self.last_id);

        if let Some(previous) = self.outstanding.replace(id) {
            debug!(%previous, %id, "superseding outstanding refresh");
        }
        self.set_state(RefreshState::Updating);

        let body = RequestBody {
            codes: self.directory.concatenated_codes(),
            protocol_version: self.config.protocol_version,
        };

        match self.transport.send_request(id, body) {
            Ok(()) => {
                debug!(%id, "refresh requested");
                Ok(id)
            }
            Err(e) => {
                warn!(%id, "failed to submit refresh: {e}");
                self.outstanding = None;
                self.set_state(RefreshState::Error);
                Err(e)
            }
        }
    }

    /// Dispatch a transport completion.
    pub fn handle_event(&mut self, event: TransportEvent) {
        match event.outcome {
            Ok(payload) => {
                self.on_transport_success(event.id, &payload);
            }
            Err(failure) => {
                self.on_transport_failure(event.id, &failure);
            }
        }
    }

    /// Apply a successful response.
    ///
    /// Returns `None` if `id` is not the outstanding request. Otherwise each
    /// entry is applied independently; skipped entries keep their previous
    /// status and are reported to the presenter. The state becomes `Ok`
    /// once every entry has been processed.
    pub fn on_transport_success(
        &mut self,
        id: RequestId,
        payload: &ResponsePayload,
    ) -> Option<ApplyReport> {
        if !self.take_outstanding(id) {
            return None;
        }

        let mut report = ApplyReport::default();
        for index in 0..self.directory.len() {
            let result = payload
                .slot(index, self.config.status_width)
                .and_then(|(code, status)| {
                    self.directory
                        .apply_update(&code, status)
                        .map_err(|UnknownLineCode(code)| SlotError::UnknownLineCode {
                            index,
                            code: code.to_string(),
                        })
                });

            match result {
                Ok(()) => report.applied += 1,
                Err(skipped) => {
                    warn!(%id, "skipping response entry: {skipped}");
                    self.presenter.alert(&skipped);
                    report.skipped.push(skipped);
                }
            }
        }

        info!(
            %id,
            applied = report.applied,
            skipped = report.skipped.len(),
            "line statuses updated"
        );
        self.last_updated = Some(Utc::now());
        self.set_state(RefreshState::Ok);
        Some(report)
    }

    /// Record a failed request.
    ///
    /// Returns `false` if `id` is not the outstanding request.
    pub fn on_transport_failure(&mut self, id: RequestId, failure: &TransportFailure) -> bool {
        if !self.take_outstanding(id) {
            return false;
        }

        warn!(%id, status = failure.status, "refresh failed: {}", failure.message);
        self.set_state(RefreshState::Error);
        true
    }

    pub fn refresh_state(&self) -> RefreshState {
        self.state
    }

    /// When the last response was applied.
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    /// The request awaiting a response, if any.
    pub fn outstanding(&self) -> Option<RequestId> {
        self.outstanding
    }

    pub fn directory(&self) -> &LineDirectory {
        &self.directory
    }

    /// The line shown at `position`.
    pub fn get_line(&self, position: usize) -> Option<&Line> {
        self.directory.lookup_by_position(position)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Clear the outstanding request if it is `id`.
    fn take_outstanding(&mut self, id: RequestId) -> bool {
        if self.outstanding == Some(id) {
            self.outstanding = None;
            true
        } else {
            debug!(%id, outstanding = ?self.outstanding, "ignoring stale response");
            false
        }
    }

    fn set_state(&mut self, state: RefreshState) {
        if self.state != state {
            debug!(from = ?self.state, to = ?state, "refresh state changed");
        }
        self.state = state;
        self.presenter.data_changed();
    }
}
