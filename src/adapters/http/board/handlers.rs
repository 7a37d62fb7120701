//! HTTP handlers for the board endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::adapters::http::error::domain_error_response;
use crate::adapters::http::operator_metadata;
use crate::application::handlers::{FinishOrderHandler, RefreshBoardHandler};
use crate::domain::foundation::OrderNumber;

use super::dto::{BoardResponse, FinishOrderResponse};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct BoardHandlers {
    board: Arc<RefreshBoardHandler>,
    finish: Arc<FinishOrderHandler>,
}

impl BoardHandlers {
    pub fn new(board: Arc<RefreshBoardHandler>, finish: Arc<FinishOrderHandler>) -> Self {
        Self { board, finish }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/board - Current board snapshot
///
/// Runs a full poll cycle, so a display refreshing through HTTP sees the
/// same reconciliation (and triggers the same alerts) as the background
/// poller.
pub async fn get_board(State(handlers): State<BoardHandlers>) -> Response {
    match handlers.board.execute().await {
        Ok(snapshot) => (StatusCode::OK, Json(BoardResponse::from(snapshot))).into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// POST /api/board/orders/:order_number/finish - Mark an order finished
pub async fn finish_order(
    State(handlers): State<BoardHandlers>,
    Path(order_number): Path<String>,
    headers: HeaderMap,
) -> Response {
    let order = match order_number.parse::<OrderNumber>() {
        Ok(order) => order,
        Err(e) => return domain_error_response(e),
    };

    let metadata = operator_metadata(&headers);
    match handlers.finish.execute(order, metadata).await {
        Ok(()) => (
            StatusCode::OK,
            Json(FinishOrderResponse {
                order_number: order.value(),
                message: "Order finished".to_string(),
            }),
        )
            .into_response(),
        Err(e) => domain_error_response(e),
    }
}
