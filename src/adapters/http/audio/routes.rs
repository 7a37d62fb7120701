//! HTTP routes for the audio endpoints.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;

use super::handlers::{
    check_custom, delete_custom, get_settings, serve_sound, toggle_mute, unlock, update_settings,
    upload_custom, AudioHandlers,
};
use super::websocket::alerts_ws;

/// Creates the audio router with all endpoints.
///
/// `max_upload_bytes` raises the body limit on the upload route only; the
/// storage layer still enforces its own cap on the decoded file.
pub fn audio_routes(handlers: AudioHandlers, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/settings", get(get_settings))
        .route("/settings", put(update_settings))
        .route(
            "/custom/:slot",
            get(check_custom)
                .post(upload_custom)
                .delete(delete_custom)
                .layer(DefaultBodyLimit::max(max_upload_bytes + 64 * 1024)),
        )
        .route("/files/:file_name", get(serve_sound))
        .route("/mute/toggle", post(toggle_mute))
        .route("/unlock", post(unlock))
        .route("/stream", get(alerts_ws))
        .with_state(handlers)
}
