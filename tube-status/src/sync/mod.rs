//! Status feed synchronisation.
//!
//! This module keeps a [`LineDirectory`](crate::directory::LineDirectory)
//! in step with the remote status feed:
//!
//! - [`SyncEngine`] issues refreshes, applies responses and owns the
//!   `Updating` / `Ok` / `Error` refresh state
//! - [`Transport`] is the seam to the network; [`HttpTransport`] talks to
//!   the real feed and [`ScriptedTransport`] stands in for it offline
//! - [`EngineHandle`] runs an engine on its own task and lets other tasks
//!   trigger refreshes and read snapshots

mod config;
mod engine;
mod error;
mod handle;
mod http;
mod mock;
mod transport;
mod wire;


pub use config::{ConfigError, StatusWidth, SyncConfig};
pub use engine::{ApplyReport, Presenter, RefreshState, SyncEngine};
pub use error::{FieldError, SlotError, SubmitError, TransportFailure};
pub use handle::{EngineHandle, EngineStopped, Snapshot, WatchPresenter};
pub use http::HttpTransport;
pub use mock::{MockError, ScriptedTransport, SentRequest};
pub use transport::{RequestId, Transport, TransportEvent};
pub use wire::{RequestBody, ResponsePayload, parse_status_field};
