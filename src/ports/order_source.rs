//! Read access to the POS order store.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::order::RawOrderRow;

/// Server-side diagnostics attached to a failed query.
///
/// Surfaced to operators on the connection-error screen so a misconfigured
/// view or permission problem can be diagnosed without server access.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct QueryDiagnostics {
    pub message: String,
    pub sqlstate: Option<String>,
    pub line: Option<String>,
    pub routine: Option<String>,
    pub server: Option<String>,
}

#[derive(Debug, Error)]
pub enum OrderSourceError {
    /// The backing database rejected or failed the query.
    #[error("order query failed: {}", .0.message)]
    Query(QueryDiagnostics),

    /// No connection is available at all.
    #[error("order source unavailable: {0}")]
    Unavailable(String),

    #[error("order query timed out")]
    Timeout,
}

/// Fetches unfinished order lines for the board.
///
/// An empty result is a normal outcome (an empty kitchen), distinct from any
/// error variant.
#[async_trait]
pub trait OrderSource: Send + Sync {
    /// Active (unfinished) order lines, ordered by order time ascending.
    /// An empty `categories` slice means no category filter.
    async fn fetch_active_lines(
        &self,
        categories: &[i64],
    ) -> Result<Vec<RawOrderRow>, OrderSourceError>;
}
