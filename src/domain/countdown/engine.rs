//! Deadline computation and per-tick countdown evaluation.

use std::sync::Arc;

use crate::domain::foundation::OrderNumber;
use crate::ports::{Clock, TimerStore, TimerStoreError};

use super::format::format_remaining;
use super::state::{Severity, Threshold, TimerRecord};

const MS_PER_MINUTE: i64 = 60_000;

/// The per-order facts the engine needs to evaluate a countdown.
#[derive(Debug, Clone)]
pub struct CountdownInputs {
    pub order: OrderNumber,
    pub order_time: Option<chrono::DateTime<chrono::Utc>>,
    pub time_to_finish_minutes: u32,
}

/// Snapshot of one order's countdown at a given instant.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CountdownStatus {
    pub order: OrderNumber,
    pub remaining_seconds: u64,
    pub total_seconds: u64,
    /// Elapsed share of the prep budget, clamped to 0..=100.
    pub elapsed_percent: u8,
    pub severity: Severity,
    /// `MM:SS` (or `H:MM:SS`) text for the ticket header.
    pub display: String,
    pub expired: bool,
}

/// Result of one evaluation: the current status plus any thresholds that
/// crossed on this tick and have not fired before.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub status: CountdownStatus,
    pub newly_fired: Vec<Threshold>,
}

/// Drives all per-order countdowns against a persistent record store.
///
/// The deadline for an order is computed exactly once, the first time the
/// order is evaluated, and persisted. Every later evaluation works from the
/// stored deadline, so neither a poll cycle nor a process restart restarts
/// the clock. Expiry is sticky: an expired order stays expired until it is
/// torn down.
pub struct CountdownEngine {
    store: Arc<dyn TimerStore>,
    clock: Arc<dyn Clock>,
}

impl CountdownEngine {
    pub fn new(store: Arc<dyn TimerStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Evaluates one order's countdown at the current instant.
    ///
    /// Returns `None` when the order carries no countdown at all (no order
    /// time, or a zero prep budget). Otherwise persists any state change and
    /// reports the thresholds that fired on this evaluation.
    pub fn evaluate(
        &self,
        inputs: &CountdownInputs,
    ) -> Result<Option<TickOutcome>, TimerStoreError> {
        let Some(order_time) = inputs.order_time else {
            return Ok(None);
        };
        if inputs.time_to_finish_minutes == 0 {
            return Ok(None);
        }

        let now_ms = self.clock.now_ms();
        let total_seconds = u64::from(inputs.time_to_finish_minutes) * 60;

        let mut record = match self.store.load(inputs.order)? {
            Some(record) => record,
            None => {
                // An order stamped in the future (clock skew between the POS
                // terminal and this display) anchors to now instead, so the
                // countdown never exceeds its own budget.
                let anchor_ms = order_time.timestamp_millis().min(now_ms);
                let budget_ms = i64::from(inputs.time_to_finish_minutes) * MS_PER_MINUTE;
                TimerRecord::running(anchor_ms.saturating_add(budget_ms))
            }
        };

        if record.expired {
            let status = self.expired_status(inputs.order, total_seconds);
            return Ok(Some(TickOutcome {
                status,
                newly_fired: Vec::new(),
            }));
        }

        let deadline_ms = match record.deadline_ms {
            Some(deadline) => deadline,
            None => {
                return Err(TimerStoreError::Corrupt {
                    order: inputs.order,
                    reason: "running record without a deadline".to_string(),
                })
            }
        };

        let remaining_ms = deadline_ms.saturating_sub(now_ms).max(0);
        let remaining_seconds = (remaining_ms / 1000) as u64;
        let elapsed_percent = elapsed_percent(remaining_seconds, total_seconds);

        let mut newly_fired = Vec::new();
        if remaining_seconds == 0 {
            // Sticky from here on; the deadline is no longer needed.
            record.expired = true;
            record.deadline_ms = None;
            if record.fired.insert(Threshold::Overdue) {
                newly_fired.push(Threshold::Overdue);
            }
            record.fired.insert(Threshold::Approaching);
            record.fired.insert(Threshold::NearFinish);
        } else {
            for threshold in [Threshold::Approaching, Threshold::NearFinish] {
                if elapsed_percent >= threshold.percent() && record.fired.insert(threshold) {
                    newly_fired.push(threshold);
                }
            }
        }

        self.store.store(inputs.order, &record)?;

        let status = CountdownStatus {
            order: inputs.order,
            remaining_seconds,
            total_seconds,
            elapsed_percent,
            severity: Severity::classify(remaining_seconds, total_seconds),
            display: format_remaining(remaining_seconds),
            expired: record.expired,
        };
        Ok(Some(TickOutcome {
            status,
            newly_fired,
        }))
    }

    /// Removes every persisted key for the order. Called when an order
    /// leaves the board.
    pub fn teardown(&self, order: OrderNumber) -> Result<(), TimerStoreError> {
        self.store.remove(order)
    }

    fn expired_status(&self, order: OrderNumber, total_seconds: u64) -> CountdownStatus {
        CountdownStatus {
            order,
            remaining_seconds: 0,
            total_seconds,
            elapsed_percent: 100,
            severity: Severity::Expired,
            display: format_remaining(0),
            expired: true,
        }
    }
}

fn elapsed_percent(remaining_seconds: u64, total_seconds: u64) -> u8 {
    if total_seconds == 0 {
        return 100;
    }
    let elapsed = total_seconds.saturating_sub(remaining_seconds);
    ((elapsed * 100 / total_seconds).min(100)) as u8
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;

    use crate::adapters::clock::ManualClock;
    use crate::adapters::storage::InMemoryTimerStore;

    use super::*;

    fn engine_at(
        now: chrono::DateTime<Utc>,
    ) -> (CountdownEngine, Arc<InMemoryTimerStore>, Arc<ManualClock>) {
        let store = Arc::new(InMemoryTimerStore::new());
        let clock = Arc::new(ManualClock::new(now));
        let engine = CountdownEngine::new(store.clone(), clock.clone());
        (engine, store, clock)
    }

    fn inputs(order: i64, order_time: chrono::DateTime<Utc>, minutes: u32) -> CountdownInputs {
        CountdownInputs {
            order: OrderNumber::new(order),
            order_time: Some(order_time),
            time_to_finish_minutes: minutes,
        }
    }

    #[test]
    fn first_evaluation_creates_the_deadline() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let (engine, store, _) = engine_at(now);

        let outcome = engine
            .evaluate(&inputs(101, now - Duration::minutes(2), 10))
            .unwrap()
            .unwrap();

        assert_eq!(outcome.status.remaining_seconds, 480);
        assert_eq!(outcome.status.total_seconds, 600);
        assert_eq!(outcome.status.display, "08:00");
        assert_eq!(outcome.status.severity, Severity::Normal);
        assert!(outcome.newly_fired.is_empty());

        let record = store.load(OrderNumber::new(101)).unwrap().unwrap();
        assert!(!record.expired);
        assert!(record.deadline_ms.is_some());
    }

    #[test]
    fn future_order_time_anchors_to_now() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let (engine, _, _) = engine_at(now);

        let outcome = engine
            .evaluate(&inputs(101, now + Duration::minutes(30), 10))
            .unwrap()
            .unwrap();

        // Remaining never exceeds the prep budget.
        assert_eq!(outcome.status.remaining_seconds, 600);
    }

    #[test]
    fn deadline_survives_repeated_evaluation() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let (engine, _, clock) = engine_at(now);
        let order = inputs(101, now, 10);

        engine.evaluate(&order).unwrap().unwrap();
        clock.advance(Duration::seconds(90));
        let outcome = engine.evaluate(&order).unwrap().unwrap();

        assert_eq!(outcome.status.remaining_seconds, 510);
        assert_eq!(outcome.status.display, "08:30");
    }

    #[test]
    fn thresholds_fire_once_each() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let (engine, _, clock) = engine_at(now);
        let order = inputs(101, now, 10);

        engine.evaluate(&order).unwrap().unwrap();

        clock.advance(Duration::minutes(6)); // 60%
        let outcome = engine.evaluate(&order).unwrap().unwrap();
        assert_eq!(outcome.newly_fired, vec![Threshold::Approaching]);
        assert_eq!(outcome.status.severity, Severity::Warning);

        let outcome = engine.evaluate(&order).unwrap().unwrap();
        assert!(outcome.newly_fired.is_empty());

        clock.advance(Duration::minutes(2)); // 80%
        let outcome = engine.evaluate(&order).unwrap().unwrap();
        assert_eq!(outcome.newly_fired, vec![Threshold::NearFinish]);
        assert_eq!(outcome.status.severity, Severity::Urgent);
    }

    #[test]
    fn skipped_ticks_still_fire_each_pending_threshold() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let (engine, _, clock) = engine_at(now);
        let order = inputs(101, now, 10);

        engine.evaluate(&order).unwrap().unwrap();
        clock.advance(Duration::minutes(9)); // past 60% and 80% in one jump
        let outcome = engine.evaluate(&order).unwrap().unwrap();

        assert_eq!(
            outcome.newly_fired,
            vec![Threshold::Approaching, Threshold::NearFinish]
        );
    }

    #[test]
    fn expiry_is_sticky() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let (engine, store, clock) = engine_at(now);
        let order = inputs(101, now, 10);

        engine.evaluate(&order).unwrap().unwrap();
        clock.advance(Duration::minutes(11));
        let outcome = engine.evaluate(&order).unwrap().unwrap();
        assert!(outcome.status.expired);
        assert_eq!(outcome.status.severity, Severity::Expired);
        assert_eq!(outcome.newly_fired, vec![Threshold::Overdue]);

        // Later evaluations stay expired and fire nothing further.
        clock.advance(Duration::minutes(5));
        let outcome = engine.evaluate(&order).unwrap().unwrap();
        assert!(outcome.status.expired);
        assert_eq!(outcome.status.display, "00:00");
        assert!(outcome.newly_fired.is_empty());

        let record = store.load(OrderNumber::new(101)).unwrap().unwrap();
        assert!(record.expired);
        assert_eq!(record.deadline_ms, None);
    }

    #[test]
    fn persisted_past_deadline_goes_straight_to_expired() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let (engine, store, _) = engine_at(now);

        // Simulate a record written before a restart, already past due.
        let stale = TimerRecord::running(
            (now - Duration::minutes(1)).timestamp_millis(),
        );
        store.store(OrderNumber::new(101), &stale).unwrap();

        let outcome = engine.evaluate(&inputs(101, now, 10)).unwrap().unwrap();
        assert!(outcome.status.expired);
        assert_eq!(outcome.newly_fired, vec![Threshold::Overdue]);
    }

    #[test]
    fn orders_without_a_budget_carry_no_countdown() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let (engine, _, _) = engine_at(now);

        assert!(engine.evaluate(&inputs(101, now, 0)).unwrap().is_none());
        assert!(engine
            .evaluate(&CountdownInputs {
                order: OrderNumber::new(102),
                order_time: None,
                time_to_finish_minutes: 10,
            })
            .unwrap()
            .is_none());
    }

    #[test]
    fn teardown_clears_the_record() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let (engine, store, _) = engine_at(now);
        let order = inputs(101, now, 10);

        engine.evaluate(&order).unwrap().unwrap();
        engine.teardown(OrderNumber::new(101)).unwrap();
        assert!(store.load(OrderNumber::new(101)).unwrap().is_none());

        // A re-observed order gets a fresh deadline.
        let outcome = engine.evaluate(&order).unwrap().unwrap();
        assert!(!outcome.status.expired);
    }

    proptest! {
        #[test]
        fn remaining_never_increases_as_time_advances(
            minutes in 1u32..240,
            step_a in 0i64..10_000,
            step_b in 0i64..10_000,
        ) {
            let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
            let (engine, _, clock) = engine_at(now);
            let order = inputs(101, now, minutes);

            let first = engine.evaluate(&order).unwrap().unwrap();
            clock.advance(Duration::seconds(step_a));
            let second = engine.evaluate(&order).unwrap().unwrap();
            clock.advance(Duration::seconds(step_b));
            let third = engine.evaluate(&order).unwrap().unwrap();

            prop_assert!(second.status.remaining_seconds <= first.status.remaining_seconds);
            prop_assert!(third.status.remaining_seconds <= second.status.remaining_seconds);
            prop_assert!(third.status.elapsed_percent <= 100);
        }
    }
}
