//! HTTP DTOs for the admin endpoints.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::application::handlers::CategoryListing;
use crate::ports::ConnectionDescriptor;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
pub struct ReconnectRequest {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: SecretString,
}

fn default_port() -> u16 {
    5432
}

impl From<ReconnectRequest> for ConnectionDescriptor {
    fn from(req: ReconnectRequest) -> Self {
        Self {
            host: req.host,
            port: req.port,
            database: req.database,
            user: req.user,
            password: req.password,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SelectCategoriesRequest {
    pub selected: Vec<i64>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct CategoryResponse {
    pub code: i64,
    pub name: String,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryListResponse {
    pub categories: Vec<CategoryResponse>,
}

impl From<CategoryListing> for CategoryListResponse {
    fn from(listing: CategoryListing) -> Self {
        let selected = listing.selected;
        Self {
            categories: listing
                .categories
                .into_iter()
                .map(|c| CategoryResponse {
                    selected: selected.contains(&c.code),
                    code: c.code,
                    name: c.name,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub message: String,
}
