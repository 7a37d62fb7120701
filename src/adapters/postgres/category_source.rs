//! PostgreSQL implementation of the category source.

use async_trait::async_trait;
use sqlx::Row;

use crate::ports::{Category, CategorySource, CategorySourceError};

use super::SharedPool;

pub struct PostgresCategorySource {
    pool: SharedPool,
}

impl PostgresCategorySource {
    pub fn new(pool: SharedPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategorySource for PostgresCategorySource {
    async fn list_categories(&self) -> Result<Vec<Category>, CategorySourceError> {
        let pool = self.pool.read().await.clone();
        let rows = sqlx::query(
            r#"
            SELECT category_code, category_name
            FROM pos_category
            ORDER BY category_name ASC
            "#,
        )
        .fetch_all(&pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::PoolClosed => {
                CategorySourceError::Unavailable("connection pool is closed".to_string())
            }
            other => CategorySourceError::Database(other.to_string()),
        })?;

        let mut categories = Vec::with_capacity(rows.len());
        for row in rows {
            categories.push(Category {
                code: row
                    .try_get("category_code")
                    .map_err(|e| CategorySourceError::Database(e.to_string()))?,
                name: row
                    .try_get::<Option<String>, _>("category_name")
                    .map_err(|e| CategorySourceError::Database(e.to_string()))?
                    .unwrap_or_default(),
            });
        }
        Ok(categories)
    }
}
