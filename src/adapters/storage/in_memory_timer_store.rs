//! Timer store backed by a process-local map.
//!
//! State does not survive a restart; use [`super::FileTimerStore`] in
//! production. This implementation backs unit and integration tests.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::countdown::TimerRecord;
use crate::domain::foundation::OrderNumber;
use crate::ports::{TimerStore, TimerStoreError};

#[derive(Debug, Default)]
pub struct InMemoryTimerStore {
    records: Mutex<HashMap<OrderNumber, TimerRecord>>,
}

impl InMemoryTimerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TimerStore for InMemoryTimerStore {
    fn load(&self, order: OrderNumber) -> Result<Option<TimerRecord>, TimerStoreError> {
        let records = self.records.lock().expect("timer store lock poisoned");
        Ok(records.get(&order).cloned())
    }

    fn store(&self, order: OrderNumber, record: &TimerRecord) -> Result<(), TimerStoreError> {
        let mut records = self.records.lock().expect("timer store lock poisoned");
        records.insert(order, record.clone());
        Ok(())
    }

    fn remove(&self, order: OrderNumber) -> Result<(), TimerStoreError> {
        let mut records = self.records.lock().expect("timer store lock poisoned");
        records.remove(&order);
        Ok(())
    }

    fn orders(&self) -> Result<Vec<OrderNumber>, TimerStoreError> {
        let records = self.records.lock().expect("timer store lock poisoned");
        let mut orders: Vec<_> = records.keys().copied().collect();
        orders.sort();
        Ok(orders)
    }
}
