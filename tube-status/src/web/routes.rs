//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::error;

use crate::board::Board;
use crate::sync::EngineStopped;

use super::dto::{ErrorResponse, RefreshResponse};
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(board_text))
        .route("/health", get(health))
        .route("/status", get(board_json))
        .route("/refresh", post(refresh))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

async fn current_board(state: &AppState) -> Result<Board, AppError> {
    let snapshot = state.engine.snapshot().await?;
    Ok(Board::from_snapshot(&snapshot, state.board))
}

/// Board as JSON.
async fn board_json(State(state): State<AppState>) -> Result<Json<Board>, AppError> {
    Ok(Json(current_board(&state).await?))
}

/// Board as plain text.
async fn board_text(State(state): State<AppState>) -> Result<String, AppError> {
    Ok(current_board(&state).await?.render_text())
}

/// Queue a refresh and report the resulting state.
async fn refresh(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<RefreshResponse>), AppError> {
    state.engine.trigger_refresh().await?;
    let snapshot = state.engine.snapshot().await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(RefreshResponse {
            state: snapshot.state,
        }),
    ))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    Unavailable { message: String },
}

impl From<EngineStopped> for AppError {
    fn from(e: EngineStopped) -> Self {
        AppError::Unavailable {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Unavailable { message } => (StatusCode::SERVICE_UNAVAILABLE, message),
        };

        error!(%status, "{message}");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardConfig;
    use crate::directory::london;
    use crate::sync::{
        EngineHandle, RefreshState, ResponsePayload, ScriptedTransport, SyncConfig,
    };
    use tokio::sync::mpsc;

    fn app_state(payload: ResponsePayload) -> AppState {
        let (tx, rx) = mpsc::unbounded_channel();
        let transport = ScriptedTransport::replying(payload, tx);
        let engine = EngineHandle::spawn(london().unwrap(), SyncConfig::default(), transport, rx);
        AppState::new(engine, BoardConfig::default())
    }

    #[tokio::test]
    async fn health_is_ok() {
        assert_eq!(health().await, "ok");
    }

    #[tokio::test]
    async fn board_before_refresh() {
        let state = app_state(ResponsePayload::new("BL", "001"));
        let Json(board) = board_json(State(state)).await.unwrap();

        assert_eq!(board.state, RefreshState::Updating);
        assert_eq!(board.header, "Updating...");
        assert!(board.rows.iter().all(|r| r.labels == vec!["Getting Status"]));
    }

    #[tokio::test]
    async fn refresh_then_board() {
        let state = app_state(ResponsePayload::new("CEBL", "004001"));

        let (status, _) = refresh(State(state.clone())).await.unwrap();
        assert_eq!(status, StatusCode::ACCEPTED);

        let Json(board) = board_json(State(state.clone())).await.unwrap();
        assert_eq!(board.state, RefreshState::Ok);
        assert!(board.header.starts_with("Last Updated: "));
        assert_eq!(board.rows[0].labels, vec!["Good Service"]);
        assert_eq!(board.rows[1].labels, vec!["Bus Service"]);

        let text = board_text(State(state)).await.unwrap();
        assert!(text.contains("[!!] Central\n     Bus Service\n"));
    }

    #[test]
    fn error_response_status() {
        let response = AppError::from(EngineStopped).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
