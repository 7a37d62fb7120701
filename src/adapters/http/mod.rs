//! HTTP adapter: REST endpoints plus the alerts WebSocket.

use std::time::Duration;

use axum::http::{HeaderMap, HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::domain::foundation::CommandMetadata;

pub mod admin;
pub mod audio;
pub mod board;
pub mod error;

pub use admin::{admin_routes, AdminHandlers};
pub use audio::{audio_routes, AudioHandlers};
pub use board::{board_routes, BoardHandlers};

/// Command metadata from request headers.
///
/// The display sends the active operator in `x-operator`; commands from a
/// display with no operator configured fall back to a fixed station name so
/// the audit column is never empty.
pub fn operator_metadata(headers: &HeaderMap) -> CommandMetadata {
    let operator = headers
        .get("x-operator")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("kitchen-display");

    let mut metadata = CommandMetadata::new(operator).with_source("api");
    if let Some(request_id) = headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
    {
        metadata = metadata.with_correlation_id(request_id);
    }
    metadata
}

/// Assembles the full application router with its middleware stack.
pub fn app_router(
    board: BoardHandlers,
    audio: AudioHandlers,
    admin: AdminHandlers,
    server: &ServerConfig,
    max_upload_bytes: usize,
) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/board", board_routes(board))
        .nest("/api/sounds", audio_routes(audio, max_upload_bytes))
        .nest("/api/admin", admin_routes(admin))
        .layer(TimeoutLayer::new(Duration::from_secs(
            server.request_timeout_secs,
        )))
        .layer(cors_layer(server))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

async fn health() -> &'static str {
    "ok"
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins = server.cors_origins_list();
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        layer.allow_origin(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        layer.allow_origin(AllowOrigin::list(parsed))
    }
}
