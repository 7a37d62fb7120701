//! Timer store persisted as a JSON file.
//!
//! All countdown records live in one `timers.json` under the configured
//! state directory. Writes go through a temp file and rename so a crash
//! mid-write never leaves a truncated file behind.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::domain::countdown::TimerRecord;
use crate::domain::foundation::OrderNumber;
use crate::ports::{TimerStore, TimerStoreError};

const FILE_NAME: &str = "timers.json";

pub struct FileTimerStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles.
    guard: Mutex<()>,
}

impl FileTimerStore {
    /// Creates the store, creating the state directory if needed.
    pub fn new(state_dir: impl AsRef<Path>) -> Result<Self, TimerStoreError> {
        let state_dir = state_dir.as_ref();
        fs::create_dir_all(state_dir)
            .map_err(|e| TimerStoreError::WriteFailed(e.to_string()))?;
        Ok(Self {
            path: state_dir.join(FILE_NAME),
            guard: Mutex::new(()),
        })
    }

    fn read_all(&self) -> Result<BTreeMap<String, TimerRecord>, TimerStoreError> {
        match fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| TimerStoreError::ReadFailed(format!("corrupt {FILE_NAME}: {e}"))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(TimerStoreError::ReadFailed(e.to_string())),
        }
    }

    fn write_all(&self, records: &BTreeMap<String, TimerRecord>) -> Result<(), TimerStoreError> {
        let bytes = serde_json::to_vec_pretty(records)
            .map_err(|e| TimerStoreError::WriteFailed(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, bytes).map_err(|e| TimerStoreError::WriteFailed(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| TimerStoreError::WriteFailed(e.to_string()))
    }
}

impl TimerStore for FileTimerStore {
    fn load(&self, order: OrderNumber) -> Result<Option<TimerRecord>, TimerStoreError> {
        let _guard = self.guard.lock().expect("timer store lock poisoned");
        Ok(self.read_all()?.remove(&order.storage_key()))
    }

    fn store(&self, order: OrderNumber, record: &TimerRecord) -> Result<(), TimerStoreError> {
        let _guard = self.guard.lock().expect("timer store lock poisoned");
        let mut records = self.read_all()?;
        records.insert(order.storage_key(), record.clone());
        self.write_all(&records)
    }

    fn remove(&self, order: OrderNumber) -> Result<(), TimerStoreError> {
        let _guard = self.guard.lock().expect("timer store lock poisoned");
        let mut records = self.read_all()?;
        if records.remove(&order.storage_key()).is_some() {
            self.write_all(&records)?;
        }
        Ok(())
    }

    fn orders(&self) -> Result<Vec<OrderNumber>, TimerStoreError> {
        let _guard = self.guard.lock().expect("timer store lock poisoned");
        let mut orders = Vec::new();
        for key in self.read_all()?.keys() {
            match key.parse::<i64>() {
                Ok(value) => orders.push(OrderNumber::new(value)),
                Err(_) => {
                    tracing::warn!(key, "skipping timer record with non-numeric key");
                }
            }
        }
        orders.sort();
        Ok(orders)
    }
}
