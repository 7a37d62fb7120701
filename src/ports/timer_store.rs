//! Persistence for per-order countdown records.
//!
//! Countdown state is display-local and small, so the port is synchronous;
//! implementations must not block on anything slower than local disk.

use thiserror::Error;

use crate::domain::countdown::TimerRecord;
use crate::domain::foundation::OrderNumber;

#[derive(Debug, Error)]
pub enum TimerStoreError {
    #[error("failed to read timer state: {0}")]
    ReadFailed(String),

    #[error("failed to write timer state: {0}")]
    WriteFailed(String),

    #[error("corrupt timer record for order {order}: {reason}")]
    Corrupt { order: OrderNumber, reason: String },
}

pub trait TimerStore: Send + Sync {
    /// Loads the record for an order, `None` when the order was never seen.
    fn load(&self, order: OrderNumber) -> Result<Option<TimerRecord>, TimerStoreError>;

    fn store(&self, order: OrderNumber, record: &TimerRecord) -> Result<(), TimerStoreError>;

    /// Removes every key belonging to the order. Idempotent.
    fn remove(&self, order: OrderNumber) -> Result<(), TimerStoreError>;

    /// Order numbers with a persisted record.
    fn orders(&self) -> Result<Vec<OrderNumber>, TimerStoreError>;
}
