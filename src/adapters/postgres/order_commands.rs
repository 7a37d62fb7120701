//! PostgreSQL implementation of the finish-order command.

use async_trait::async_trait;

use crate::domain::foundation::OrderNumber;
use crate::ports::{OrderCommandError, OrderCommands};

use super::SharedPool;

pub struct PostgresOrderCommands {
    pool: SharedPool,
}

impl PostgresOrderCommands {
    pub fn new(pool: SharedPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderCommands for PostgresOrderCommands {
    async fn finish_order(
        &self,
        order: OrderNumber,
        finished_by: &str,
    ) -> Result<(), OrderCommandError> {
        let pool = self.pool.read().await.clone();
        let mut tx = pool
            .begin()
            .await
            .map_err(|e| OrderCommandError::Database(e.to_string()))?;

        // The actual prep duration overwrites the budget, rounded up to
        // whole minutes, so reports show how long the order really took.
        let result = sqlx::query(
            r#"
            UPDATE pos_order_kds
            SET finished = TRUE,
                finish_time = NOW(),
                time_to_finish = CEIL(EXTRACT(EPOCH FROM (NOW() - order_time)) / 60.0),
                finished_by = $2
            WHERE main_order_no = $1
              AND finished IS NOT TRUE
            "#,
        )
        .bind(order.value())
        .bind(finished_by)
        .execute(&mut *tx)
        .await
        .map_err(|e| OrderCommandError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            // Finished from another terminal, or never existed. Roll back
            // rather than stamping the late flag on nothing.
            tx.rollback()
                .await
                .map_err(|e| OrderCommandError::Database(e.to_string()))?;
            return Err(OrderCommandError::NotFound(order));
        }

        // Finishing exactly at the budget counts as late.
        sqlx::query(
            r#"
            UPDATE pos_order_kds k
            SET late = k.time_to_finish >= COALESCE(i.time_to_finish, 0)
            FROM item_master i
            WHERE i.item_code = k.item_code
              AND k.main_order_no = $1
            "#,
        )
        .bind(order.value())
        .execute(&mut *tx)
        .await
        .map_err(|e| OrderCommandError::Database(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| OrderCommandError::Database(e.to_string()))?;

        tracing::info!(%order, finished_by, "order marked finished");
        Ok(())
    }
}
