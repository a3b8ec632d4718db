//! Web layer for the line status board.
//!
//! Serves the board as JSON and plain text, and lets clients trigger a
//! refresh.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
