//! HTTP routes for the board endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{finish_order, get_board, BoardHandlers};

/// Creates the board router with all endpoints.
pub fn board_routes(handlers: BoardHandlers) -> Router {
    Router::new()
        .route("/", get(get_board))
        .route("/orders/:order_number/finish", post(finish_order))
        .with_state(handlers)
}
