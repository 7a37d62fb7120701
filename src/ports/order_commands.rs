//! Write access to the POS order store.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::OrderNumber;

#[derive(Debug, Error)]
pub enum OrderCommandError {
    /// No unfinished rows matched the order number.
    #[error("order {0} not found or already finished")]
    NotFound(OrderNumber),

    #[error("finish command failed: {0}")]
    Database(String),

    #[error("finish command timed out")]
    Timeout,
}

#[async_trait]
pub trait OrderCommands: Send + Sync {
    /// Marks every line of the order finished, stamping the finish time, the
    /// actual preparation duration, and the operator who performed it.
    async fn finish_order(
        &self,
        order: OrderNumber,
        finished_by: &str,
    ) -> Result<(), OrderCommandError>;
}
