//! Builds the board snapshot and reconciles it with the previous poll.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::domain::alert::AlertDispatcher;
use crate::domain::board::{reconcile, BoardDelta};
use crate::domain::countdown::{CountdownEngine, CountdownInputs, CountdownStatus, Threshold};
use crate::domain::foundation::{DomainError, ErrorCode, OrderNumber};
use crate::domain::order::{group_order_lines, OrderLine, Ticket};
use crate::ports::{Clock, OrderSource, OrderSourceError, SettingsStore};

/// One order as rendered on the board.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct BoardOrder {
    pub order_number: OrderNumber,
    pub tickets: Vec<Ticket>,
    pub table_id: Option<String>,
    pub table_description: Option<String>,
    pub countdown: Option<CountdownStatus>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct BoardSnapshot {
    pub orders: Vec<BoardOrder>,
    pub generated_at: DateTime<Utc>,
}

/// Fetches active orders, groups them into tickets, diffs against the
/// previous poll, and drives countdown and alert side effects.
///
/// Holds the previous order set across calls; a fetch failure leaves it
/// untouched, so orders that were on the board before an outage are not
/// re-announced as new when the connection comes back.
pub struct RefreshBoardHandler {
    orders: Arc<dyn OrderSource>,
    settings: Arc<dyn SettingsStore>,
    engine: Arc<CountdownEngine>,
    alerts: Arc<AlertDispatcher>,
    clock: Arc<dyn Clock>,
    previous: Mutex<Option<BTreeSet<OrderNumber>>>,
    /// Countdown inputs from the last successful poll, re-evaluated by the
    /// tick loop between polls.
    active_inputs: Mutex<HashMap<OrderNumber, CountdownInputs>>,
}

impl RefreshBoardHandler {
    pub fn new(
        orders: Arc<dyn OrderSource>,
        settings: Arc<dyn SettingsStore>,
        engine: Arc<CountdownEngine>,
        alerts: Arc<AlertDispatcher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            orders,
            settings,
            engine,
            alerts,
            clock,
            previous: Mutex::new(None),
            active_inputs: Mutex::new(HashMap::new()),
        }
    }

    /// One full poll cycle.
    pub async fn execute(&self) -> Result<BoardSnapshot, DomainError> {
        let categories = self
            .settings
            .load_selected_categories()
            .await
            .map_err(|e| DomainError::new(ErrorCode::StorageError, e.to_string()))?;

        let raw = self
            .orders
            .fetch_active_lines(&categories)
            .await
            .map_err(map_source_error)?;

        let lines: Vec<OrderLine> = raw.into_iter().map(OrderLine::from_raw).collect();
        let grouped = group_order_lines(lines);
        let current: BTreeSet<OrderNumber> = grouped.keys().copied().collect();

        let delta = {
            let mut previous = self.previous.lock().await;
            let delta = reconcile(previous.as_ref(), &current);
            *previous = Some(current);
            delta
        };
        self.apply_delta(&delta).await;

        let mut orders = Vec::with_capacity(grouped.len());
        let mut inputs_by_order = HashMap::with_capacity(grouped.len());
        for (order_number, tickets) in grouped {
            let inputs = countdown_inputs(order_number, &tickets);
            let countdown = self.evaluate_and_alert(&inputs).await?;
            inputs_by_order.insert(order_number, inputs);

            let first = &tickets[0].main;
            orders.push(BoardOrder {
                order_number,
                table_id: first.table_id.clone(),
                table_description: first.table_description.clone(),
                tickets,
                countdown,
            });
        }
        *self.active_inputs.lock().await = inputs_by_order;

        Ok(BoardSnapshot {
            orders,
            generated_at: self.clock.now(),
        })
    }

    /// Re-evaluates the countdowns of the last successful poll. Runs every
    /// second so threshold alerts do not wait for the next poll.
    pub async fn tick(&self) -> Result<(), DomainError> {
        let inputs: Vec<CountdownInputs> = {
            let active = self.active_inputs.lock().await;
            active.values().cloned().collect()
        };
        for input in inputs {
            self.evaluate_and_alert(&input).await?;
        }
        Ok(())
    }

    /// Drops all per-order state for an order that left the board through a
    /// local action rather than a poll.
    pub async fn forget_order(&self, order: OrderNumber) -> Result<(), DomainError> {
        if let Some(previous) = self.previous.lock().await.as_mut() {
            previous.remove(&order);
        }
        self.active_inputs.lock().await.remove(&order);
        self.engine
            .teardown(order)
            .map_err(|e| DomainError::new(ErrorCode::StorageError, e.to_string()))?;
        self.alerts.order_cleared(order).await;
        Ok(())
    }

    async fn apply_delta(&self, delta: &BoardDelta) {
        for &order in &delta.removed {
            if let Err(error) = self.engine.teardown(order) {
                tracing::warn!(%order, %error, "failed to clear timer state");
            }
            self.alerts.order_cleared(order).await;
        }
        if !delta.newly_arrived.is_empty() {
            tracing::info!(count = delta.newly_arrived.len(), "new orders arrived");
            self.alerts.notify_new_orders(delta.newly_arrived.len()).await;
        }
    }

    async fn evaluate_and_alert(
        &self,
        inputs: &CountdownInputs,
    ) -> Result<Option<CountdownStatus>, DomainError> {
        let outcome = self
            .engine
            .evaluate(inputs)
            .map_err(|e| DomainError::new(ErrorCode::StorageError, e.to_string()))?;

        let Some(outcome) = outcome else {
            return Ok(None);
        };
        for threshold in &outcome.newly_fired {
            match threshold {
                Threshold::Approaching => self.alerts.notify_approaching().await,
                Threshold::NearFinish => self.alerts.notify_near_finish().await,
                Threshold::Overdue => self.alerts.order_overdue(inputs.order).await,
            }
        }
        Ok(Some(outcome.status))
    }
}

/// The order-level countdown follows the earliest line on the ticket.
fn countdown_inputs(order: OrderNumber, tickets: &[Ticket]) -> CountdownInputs {
    let first = &tickets[0].main;
    CountdownInputs {
        order,
        order_time: first.order_time,
        time_to_finish_minutes: first.time_to_finish_minutes,
    }
}

fn map_source_error(error: OrderSourceError) -> DomainError {
    match error {
        OrderSourceError::Timeout => {
            DomainError::new(ErrorCode::QueryTimeout, "order query timed out")
        }
        OrderSourceError::Unavailable(reason) => {
            DomainError::new(ErrorCode::Disconnected, reason)
        }
        OrderSourceError::Query(diagnostics) => {
            let mut error =
                DomainError::new(ErrorCode::Disconnected, diagnostics.message.clone());
            if let Some(sqlstate) = diagnostics.sqlstate {
                error = error.with_detail("sqlstate", sqlstate);
            }
            if let Some(line) = diagnostics.line {
                error = error.with_detail("line", line);
            }
            if let Some(routine) = diagnostics.routine {
                error = error.with_detail("routine", routine);
            }
            if let Some(server) = diagnostics.server {
                error = error.with_detail("server", server);
            }
            error
        }
    }
}
