//! HTTP handlers for the admin endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::adapters::http::error::domain_error_response;
use crate::adapters::http::operator_metadata;
use crate::application::handlers::{ListCategoriesHandler, ReconnectHandler};

use super::dto::{
    CategoryListResponse, ReconnectRequest, SelectCategoriesRequest, StatusResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct AdminHandlers {
    reconnect: Arc<ReconnectHandler>,
    categories: Arc<ListCategoriesHandler>,
}

impl AdminHandlers {
    pub fn new(reconnect: Arc<ReconnectHandler>, categories: Arc<ListCategoriesHandler>) -> Self {
        Self {
            reconnect,
            categories,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/admin/reconnect - Swap the POS database connection
pub async fn post_reconnect(
    State(handlers): State<AdminHandlers>,
    headers: HeaderMap,
    Json(req): Json<ReconnectRequest>,
) -> Response {
    let metadata = operator_metadata(&headers);
    match handlers.reconnect.execute(req.into(), metadata).await {
        Ok(()) => (
            StatusCode::OK,
            Json(StatusResponse {
                message: "Reconnected".to_string(),
            }),
        )
            .into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// GET /api/admin/ping - Liveness probe against the POS database
pub async fn get_ping(State(handlers): State<AdminHandlers>) -> Response {
    match handlers.reconnect.ping().await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// GET /api/admin/categories - Categories with the current selection
pub async fn get_categories(State(handlers): State<AdminHandlers>) -> Response {
    match handlers.categories.execute().await {
        Ok(listing) => {
            (StatusCode::OK, Json(CategoryListResponse::from(listing))).into_response()
        }
        Err(e) => domain_error_response(e),
    }
}

/// PUT /api/admin/categories - Set the display's category filter
pub async fn put_categories(
    State(handlers): State<AdminHandlers>,
    Json(req): Json<SelectCategoriesRequest>,
) -> Response {
    match handlers.categories.select(&req.selected).await {
        Ok(()) => match handlers.categories.execute().await {
            Ok(listing) => {
                (StatusCode::OK, Json(CategoryListResponse::from(listing))).into_response()
            }
            Err(e) => domain_error_response(e),
        },
        Err(e) => domain_error_response(e),
    }
}
