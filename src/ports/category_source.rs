//! Read access to the POS category list.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One selectable menu category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub code: i64,
    pub name: String,
}

#[derive(Debug, Error)]
pub enum CategorySourceError {
    #[error("category query failed: {0}")]
    Database(String),

    #[error("category source unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait CategorySource: Send + Sync {
    /// All categories, ordered by name.
    async fn list_categories(&self) -> Result<Vec<Category>, CategorySourceError>;
}
