//! PostgreSQL implementation of the order source.

use async_trait::async_trait;
use sqlx::postgres::PgDatabaseError;
use sqlx::Row;

use crate::domain::order::RawOrderRow;
use crate::ports::{OrderSource, OrderSourceError, QueryDiagnostics};

use super::SharedPool;

pub struct PostgresOrderSource {
    pool: SharedPool,
    /// Label shown in diagnostics so an operator can tell which server the
    /// display was talking to.
    server_label: String,
}

impl PostgresOrderSource {
    pub fn new(pool: SharedPool, server_label: impl Into<String>) -> Self {
        Self {
            pool,
            server_label: server_label.into(),
        }
    }

    fn map_error(&self, error: sqlx::Error) -> OrderSourceError {
        match error {
            sqlx::Error::PoolTimedOut => OrderSourceError::Timeout,
            sqlx::Error::PoolClosed => {
                OrderSourceError::Unavailable("connection pool is closed".to_string())
            }
            sqlx::Error::Io(e) => OrderSourceError::Unavailable(e.to_string()),
            sqlx::Error::Database(db) => {
                let mut diagnostics = QueryDiagnostics {
                    message: db.message().to_string(),
                    sqlstate: db.code().map(|c| c.to_string()),
                    server: Some(self.server_label.clone()),
                    ..Default::default()
                };
                if let Some(pg) = db.try_downcast_ref::<PgDatabaseError>() {
                    diagnostics.line = pg.line().map(|l| l.to_string());
                    diagnostics.routine = pg.routine().map(str::to_string);
                }
                OrderSourceError::Query(diagnostics)
            }
            other => OrderSourceError::Query(QueryDiagnostics {
                message: other.to_string(),
                server: Some(self.server_label.clone()),
                ..Default::default()
            }),
        }
    }
}

#[async_trait]
impl OrderSource for PostgresOrderSource {
    async fn fetch_active_lines(
        &self,
        categories: &[i64],
    ) -> Result<Vec<RawOrderRow>, OrderSourceError> {
        match self.run_query(categories).await {
            // A broken connection gets one retry on a fresh pool connection
            // before the board reports disconnected.
            Err(OrderSourceError::Unavailable(reason)) => {
                tracing::warn!(%reason, "order query lost its connection, retrying once");
                self.run_query(categories).await
            }
            other => other,
        }
    }
}

impl PostgresOrderSource {
    async fn run_query(&self, categories: &[i64]) -> Result<Vec<RawOrderRow>, OrderSourceError> {
        let pool = self.pool.read().await.clone();
        let rows = sqlx::query(
            r#"
            SELECT
                k.main_order_no,
                k.category_code,
                k.item_code,
                COALESCE(i.item_name, k.item_name) AS item_name,
                i.item_name_2,
                k.quantity,
                k.order_time,
                k.time_to_finish,
                k.finished,
                k.table_id,
                k.table_description,
                k.comments,
                k.item_type,
                d.department_code,
                d.department_name
            FROM pos_order_kds k
            LEFT JOIN item_master i ON i.item_code = k.item_code
            LEFT JOIN pos_departments d ON d.department_code = i.department_code
            WHERE k.finished IS NOT TRUE
              -- An empty selection means no filter: a display with no
              -- categories chosen yet shows the whole kitchen.
              AND (cardinality($1::bigint[]) = 0 OR k.category_code = ANY($1))
            ORDER BY k.order_time ASC
            "#,
        )
        .bind(categories)
        .fetch_all(&pool)
        .await
        .map_err(|e| self.map_error(e))?;

        let mut lines = Vec::with_capacity(rows.len());
        for row in rows {
            lines.push(RawOrderRow {
                order_number: row.try_get("main_order_no").unwrap_or(None),
                category_code: row.try_get("category_code").unwrap_or(None),
                item_code: row.try_get("item_code").unwrap_or(None),
                item_name: row.try_get("item_name").unwrap_or(None),
                item_name_localized: row.try_get("item_name_2").unwrap_or(None),
                quantity: row.try_get("quantity").unwrap_or(None),
                order_time: row.try_get("order_time").unwrap_or(None),
                time_to_finish_minutes: row.try_get("time_to_finish").unwrap_or(None),
                finished: row.try_get("finished").unwrap_or(None),
                table_id: row.try_get("table_id").unwrap_or(None),
                table_description: row.try_get("table_description").unwrap_or(None),
                comments: row.try_get("comments").unwrap_or(None),
                item_type: row.try_get("item_type").unwrap_or(None),
                department_code: row.try_get("department_code").unwrap_or(None),
                department_name: row.try_get("department_name").unwrap_or(None),
            });
        }
        Ok(lines)
    }
}
