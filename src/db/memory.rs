use std::sync::{Mutex, MutexGuard};

use crate::db::TwinStore;
use crate::error::StorageResult;
use crate::models::{Report, Snapshot, TwinState};

#[derive(Debug, Default)]
struct MemoryRecords {
    history: Vec<Snapshot>,
    current: Option<TwinState>,
    report: Option<Report>,
}

/// Process-local store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<MemoryRecords>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> MutexGuard<'_, MemoryRecords> {
        match self.records.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl TwinStore for MemoryStore {
    fn load_history(&self, limit: usize) -> StorageResult<Vec<Snapshot>> {
        let records = self.records();
        let start = records.history.len().saturating_sub(limit);
        Ok(records.history[start..].to_vec())
    }

    fn append_snapshot(&self, snapshot: &Snapshot, capacity: usize) -> StorageResult<()> {
        let mut records = self.records();
        records.history.push(snapshot.clone());
        let excess = records.history.len().saturating_sub(capacity);
        if excess > 0 {
            records.history.drain(..excess);
        }
        Ok(())
    }

    fn load_current(&self) -> StorageResult<Option<TwinState>> {
        Ok(self.records().current.clone())
    }

    fn save_current(&self, state: &TwinState) -> StorageResult<()> {
        self.records().current = Some(state.clone());
        Ok(())
    }

    fn load_report(&self) -> StorageResult<Option<Report>> {
        Ok(self.records().report.clone())
    }

    fn save_report(&self, report: &Report) -> StorageResult<()> {
        self.records().report = Some(report.clone());
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        *self.records() = MemoryRecords::default();
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".into()
    }
}
