//! Runs a sync engine on its own task.
//!
//! The task is the engine's single event context: refresh commands,
//! snapshot queries and transport completions are consumed from queues one
//! at a time, so the engine needs no locking. Redraw notifications are
//! published as an increasing revision number on a watch channel.

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, warn};

use crate::directory::{Line, LineDirectory};

use super::config::SyncConfig;
use super::engine::{Presenter, RefreshState, SyncEngine};
use super::error::SlotError;
use super::transport::{Transport, TransportEvent};

/// Capacity of the command queue.
const COMMAND_QUEUE: usize = 32;

/// The engine task has stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("sync engine is not running")]
pub struct EngineStopped;

/// A point-in-time copy of everything the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub state: RefreshState,
    pub last_updated: Option<DateTime<Utc>>,
    /// Lines in display order.
    pub lines: Vec<Line>,
    /// Redraw revision this snapshot was taken at.
    pub revision: u64,
}

enum Command {
    Refresh,
    Snapshot(oneshot::Sender<Snapshot>),
}

/// Presenter publishing redraws on a watch channel.
#[derive(Debug)]
pub struct WatchPresenter {
    revision: watch::Sender<u64>,
    alerts: u64,
}

impl WatchPresenter {
    pub fn new(revision: watch::Sender<u64>) -> Self {
        Self { revision, alerts: 0 }
    }

    /// Number of alerts raised so far.
    pub fn alerts(&self) -> u64 {
        self.alerts
    }

    fn revision(&self) -> u64 {
        *self.revision.borrow()
    }
}

impl Presenter for WatchPresenter {
    fn data_changed(&mut self) {
        self.revision.send_modify(|r| *r += 1);
    }

    fn alert(&mut self, skipped: &SlotError) {
        self.alerts += 1;
        warn!(alerts = self.alerts, "status feed entry skipped: {skipped}");
    }
}

/// Cloneable handle to an engine running on its own task.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    commands: mpsc::Sender<Command>,
    revisions: watch::Receiver<u64>,
}

impl EngineHandle {
    /// Spawn an engine task.
    ///
    /// `events` must be the receiving end of the channel `transport`
    /// reports completions on. Must be called from within a Tokio runtime.
    pub fn spawn<T>(
        directory: LineDirectory,
        config: SyncConfig,
        transport: T,
        events: mpsc::UnboundedReceiver<TransportEvent>,
    ) -> Self
    where
        T: Transport + Send + 'static,
    {
        let (revision_tx, revisions) = watch::channel(0);
        let (commands, command_rx) = mpsc::channel(COMMAND_QUEUE);
        let engine = SyncEngine::new(directory, config, transport, WatchPresenter::new(revision_tx));

        tokio::spawn(run(engine, command_rx, events));

        Self {
            commands,
            revisions,
        }
    }

    /// Ask the engine to refresh. Returns once the request is queued.
    pub async fn trigger_refresh(&self) -> Result<(), EngineStopped> {
        self.commands
            .send(Command::Refresh)
            .await
            .map_err(|_| EngineStopped)
    }

    /// Current state, last update time and lines.
    pub async fn snapshot(&self) -> Result<Snapshot, EngineStopped> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(Command::Snapshot(tx))
            .await
            .map_err(|_| EngineStopped)?;
        rx.await.map_err(|_| EngineStopped)
    }

    /// Receiver that changes every time the engine asks for a redraw.
    pub fn revisions(&self) -> watch::Receiver<u64> {
        self.revisions.clone()
    }
}

/// Engine event loop. Ends when every handle has been dropped.
async fn run<T: Transport>(
    mut engine: SyncEngine<T, WatchPresenter>,
    mut commands: mpsc::Receiver<Command>,
    mut events: mpsc::UnboundedReceiver<TransportEvent>,
) {
    loop {
        tokio::select! {
            // Completions first, so a snapshot queued after a refresh sees
            // any response the transport already delivered.
            biased;

            Some(event) = events.recv() => engine.handle_event(event),

            command = commands.recv() => match command {
                Some(Command::Refresh) => match engine.request_refresh() {
                    Ok(id) => debug!(%id, "refresh queued"),
                    // The engine is already in the Error state.
                    Err(e) => debug!("refresh not submitted: {e}"),
                },
                Some(Command::Snapshot(reply)) => {
                    let snapshot = Snapshot {
                        state: engine.refresh_state(),
                        last_updated: engine.last_updated(),
                        lines: engine.directory().lines().to_vec(),
                        revision: engine.presenter().revision(),
                    };
                    if reply.send(snapshot).is_err() {
                        debug!("snapshot requester went away");
                    }
                }
                None => break,
            },
        }
    }
    debug!("sync engine stopped");
}
