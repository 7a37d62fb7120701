//! Marks an order finished, with bounded retries.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::sync::Notify;

use crate::domain::foundation::{CommandMetadata, DomainError, ErrorCode, OrderNumber};
use crate::ports::{OrderCommandError, OrderCommands};

use super::RefreshBoardHandler;

const MAX_ATTEMPTS: u32 = 4;
const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(10);
const BASE_BACKOFF: Duration = Duration::from_millis(250);
const MAX_JITTER_MS: u64 = 100;

/// Handles the finish-order command.
///
/// Transient failures are retried with exponential backoff; a missing order
/// is not retried at all, since another terminal finishing the same order is
/// a normal race, not a fault. On success every piece of local per-order
/// state is dropped immediately and the poller is poked so the board updates
/// without waiting out the poll interval.
pub struct FinishOrderHandler {
    commands: Arc<dyn OrderCommands>,
    board: Arc<RefreshBoardHandler>,
    refresh: Arc<Notify>,
}

impl FinishOrderHandler {
    pub fn new(
        commands: Arc<dyn OrderCommands>,
        board: Arc<RefreshBoardHandler>,
        refresh: Arc<Notify>,
    ) -> Self {
        Self {
            commands,
            board,
            refresh,
        }
    }

    pub async fn execute(
        &self,
        order: OrderNumber,
        metadata: CommandMetadata,
    ) -> Result<(), DomainError> {
        if metadata.performed_by.trim().is_empty() {
            return Err(DomainError::validation(
                "performed_by",
                "Operator name is required to finish an order",
            ));
        }

        let correlation_id = metadata.correlation_id();
        let mut last_error = None;
        for attempt in 1..=MAX_ATTEMPTS {
            let result = tokio::time::timeout(
                ATTEMPT_TIMEOUT,
                self.commands.finish_order(order, &metadata.performed_by),
            )
            .await
            .unwrap_or(Err(OrderCommandError::Timeout));

            match result {
                Ok(()) => {
                    self.board.forget_order(order).await?;
                    self.refresh.notify_one();
                    tracing::info!(
                        %order,
                        performed_by = %metadata.performed_by,
                        correlation_id = %correlation_id,
                        attempt,
                        "order finished"
                    );
                    return Ok(());
                }
                Err(OrderCommandError::NotFound(order)) => {
                    return Err(DomainError::new(
                        ErrorCode::OrderNotFound,
                        format!("Order {order} not found or already finished"),
                    ));
                }
                Err(error) => {
                    tracing::warn!(%order, attempt, %error, "finish attempt failed");
                    last_error = Some(error);
                    if attempt < MAX_ATTEMPTS {
                        tokio::time::sleep(backoff_delay(attempt)).await;
                    }
                }
            }
        }

        // No local state is dropped on failure: the order stays on the
        // board with its countdown intact so the operator can retry.
        Err(match last_error {
            Some(OrderCommandError::Timeout) => DomainError::new(
                ErrorCode::QueryTimeout,
                format!("Finishing order {order} timed out after {MAX_ATTEMPTS} attempts"),
            ),
            Some(error) => DomainError::new(
                ErrorCode::CommandFailed,
                format!("Failed to finish order {order}: {error}"),
            )
            .with_detail("attempts", MAX_ATTEMPTS.to_string()),
            None => DomainError::new(ErrorCode::InternalError, "finish loop ran zero attempts"),
        })
    }
}

fn backoff_delay(attempt: u32) -> Duration {
    let base = BASE_BACKOFF * 2u32.saturating_pow(attempt - 1);
    let jitter = rand::thread_rng().gen_range(0..MAX_JITTER_MS);
    base + Duration::from_millis(jitter)
}
