//! HTTP routes for the admin endpoints.

use axum::routing::{get, post, put};
use axum::Router;

use super::handlers::{get_categories, get_ping, post_reconnect, put_categories, AdminHandlers};

/// Creates the admin router with all endpoints.
pub fn admin_routes(handlers: AdminHandlers) -> Router {
    Router::new()
        .route("/reconnect", post(post_reconnect))
        .route("/ping", get(get_ping))
        .route("/categories", get(get_categories))
        .route("/categories", put(put_categories))
        .with_state(handlers)
}
