use std::net::SocketAddr;

use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tube_status::board::BoardConfig;
use tube_status::directory::london;
use tube_status::sync::{EngineHandle, HttpTransport, ScriptedTransport, SyncConfig};
use tube_status::web::{AppState, create_router};

/// Address served when `TUBE_STATUS_BIND` is unset.
const DEFAULT_BIND: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tube_status=info")),
        )
        .init();

    let sync_config = SyncConfig::from_env().expect("Invalid sync configuration");
    let board_config = match std::env::var("TUBE_STATUS_CLOCK").as_deref() {
        Ok("12h") => BoardConfig { clock_24h: false },
        Ok("24h") | Err(_) => BoardConfig::default(),
        Ok(other) => {
            warn!("Unknown TUBE_STATUS_CLOCK {other:?}, using 24h");
            BoardConfig::default()
        }
    };
    let directory = london().expect("Invalid line catalog");

    // Serve a canned response instead of calling the feed, if asked to
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let engine = match std::env::var("TUBE_STATUS_MOCK") {
        Ok(path) => {
            info!(path = %path, "Using mock status response");
            let transport = ScriptedTransport::from_file(&path, events_tx)
                .expect("Failed to load mock response");
            EngineHandle::spawn(directory, sync_config, transport, events_rx)
        }
        Err(_) => {
            info!(
                endpoint = %sync_config.endpoint,
                width = %sync_config.status_width,
                "Using live status feed"
            );
            let transport = HttpTransport::new(&sync_config, events_tx)
                .expect("Failed to create HTTP transport");
            EngineHandle::spawn(directory, sync_config, transport, events_rx)
        }
    };

    // Fetch statuses as soon as the board comes up
    engine
        .trigger_refresh()
        .await
        .expect("Sync engine stopped during startup");

    let state = AppState::new(engine, board_config);
    let app = create_router(state);

    let addr: SocketAddr = std::env::var("TUBE_STATUS_BIND")
        .unwrap_or_else(|_| DEFAULT_BIND.to_string())
        .parse()
        .expect("Invalid TUBE_STATUS_BIND address");

    info!("Line status board listening on http://{addr}");
    info!("  GET  /         - Board as text");
    info!("  GET  /status   - Board as JSON");
    info!("  POST /refresh  - Refresh line statuses");
    info!("  GET  /health   - Health check");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
