//! # promptcfg-api: Tool Endpoint for Configuration Validation
//!
//! Exposes the validation engine to editors and agents over HTTP.
//!
//! ## API Surface
//!
//! | Route                | Purpose                                      |
//! |----------------------|----------------------------------------------|
//! | `GET /mcp`           | Server description and tool list             |
//! | `POST /mcp`          | JSON-RPC 2.0 (`initialize`, `tools/*`)       |
//! | `GET /health/*`      | Liveness and readiness probes                |
//!
//! Readiness reports `ready` only once the schema has been loaded and
//! compiled; until then it answers 503 `loading`.

pub mod error;
pub mod mcp;
pub mod state;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::{RpcError, RpcFailure};
pub use state::{AppConfig, AppState};

/// Assemble the application router.
pub fn app(state: AppState) -> Router {
    let api = mcp::router()
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .with_state(state);

    Router::new().merge(health).merge(api)
}

/// Bind `0.0.0.0:{port}` and serve until the process exits.
pub async fn serve(state: AppState, config: &AppConfig) -> std::io::Result<()> {
    state.warm_up();
    let app = app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("promptcfg API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: 200 once the schema is cached.
async fn readiness(State(state): State<AppState>) -> (StatusCode, &'static str) {
    if state.is_ready() {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "loading")
    }
}
