//! HTTP error envelope shared by all endpoints.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::collections::HashMap;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Standard error body: `{"error": {"code", "message", "details"}}`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub details: HashMap<String, String>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                code: ErrorCode::ValidationFailed.to_string(),
                message: message.into(),
                details: HashMap::new(),
            },
        }
    }
}

/// Maps a domain error to its HTTP status and JSON envelope.
pub fn domain_error_response(error: DomainError) -> Response {
    let status = match error.code {
        ErrorCode::ValidationFailed | ErrorCode::InvalidOrderNumber => StatusCode::BAD_REQUEST,
        ErrorCode::OrderNotFound | ErrorCode::SoundNotFound => StatusCode::NOT_FOUND,
        ErrorCode::Disconnected => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::QueryTimeout => StatusCode::GATEWAY_TIMEOUT,
        ErrorCode::CommandFailed
        | ErrorCode::DatabaseError
        | ErrorCode::StorageError
        | ErrorCode::AudioError
        | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let body = ErrorResponse {
        error: ErrorBody {
            code: error.code.to_string(),
            message: error.message,
            details: error.details,
        },
    };
    (status, Json(body)).into_response()
}
