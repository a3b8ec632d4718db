//! Application state for the web layer.

use crate::board::BoardConfig;
use crate::sync::EngineHandle;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Handle to the running sync engine
    pub engine: EngineHandle,

    /// How the board is presented
    pub board: BoardConfig,
}

impl AppState {
    /// Create a new app state.
    pub fn new(engine: EngineHandle, board: BoardConfig) -> Self {
        Self { engine, board }
    }
}
