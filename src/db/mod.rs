//! Persistence for the twin: the storage seam and the history façade.
//!
//! Three records are kept per twin (current state, history log, report).
//! A [`TwinStore`] backend owns the medium; [`HistoryStore`] owns the policy
//! on top of it (capacity, degrade-to-empty on unreadable history, reset).

pub mod connection;
pub mod helpers;
pub mod json_file;
pub mod memory;
mod migrations;
pub mod repositories;
pub mod sqlite;

use std::sync::Arc;

pub use connection::Database;
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::StorageResult;
use crate::models::{Report, Snapshot, TwinState};
use crate::log_warn;

const ENABLE_LOGS: bool = true;

/// Most recent snapshots retained in the history log.
pub const HISTORY_CAPACITY: usize = 200;

/// A storage medium for the three twin records.
///
/// Implementations must make `append_snapshot` exclusive: the
/// read-modify-truncate of the history log runs under a lock or an atomic
/// replace so concurrent appends neither lose updates nor leave a partial log.
pub trait TwinStore: Send + Sync {
    /// The most recent `limit` snapshots, oldest first.
    fn load_history(&self, limit: usize) -> StorageResult<Vec<Snapshot>>;

    /// Append to the log, then drop the oldest entries beyond `capacity`.
    fn append_snapshot(&self, snapshot: &Snapshot, capacity: usize) -> StorageResult<()>;

    fn load_current(&self) -> StorageResult<Option<TwinState>>;

    fn save_current(&self, state: &TwinState) -> StorageResult<()>;

    fn load_report(&self) -> StorageResult<Option<Report>>;

    fn save_report(&self, report: &Report) -> StorageResult<()>;

    /// Remove all three records.
    fn clear(&self) -> StorageResult<()>;

    /// Make everything written so far durable. Called on teardown.
    fn flush(&self) -> StorageResult<()> {
        Ok(())
    }

    fn describe(&self) -> String;
}

/// Bounded, append-only history plus the single current-state slot.
#[derive(Clone)]
pub struct HistoryStore {
    backend: Arc<dyn TwinStore>,
    capacity: usize,
}

impl HistoryStore {
    pub fn new(backend: Arc<dyn TwinStore>) -> Self {
        Self::with_capacity(backend, HISTORY_CAPACITY)
    }

    /// `capacity` is clamped to `1..=HISTORY_CAPACITY`.
    pub fn with_capacity(backend: Arc<dyn TwinStore>, capacity: usize) -> Self {
        let clamped = capacity.clamp(1, HISTORY_CAPACITY);
        if clamped != capacity {
            log_warn!("history capacity {capacity} out of range, using {clamped}");
        }
        Self {
            backend,
            capacity: clamped,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn backend(&self) -> &dyn TwinStore {
        self.backend.as_ref()
    }

    pub fn append(&self, snapshot: &Snapshot) -> StorageResult<()> {
        self.backend.append_snapshot(snapshot, self.capacity)
    }

    /// Up to `limit` most recent snapshots, surfacing read failures.
    pub fn try_load(&self, limit: usize) -> StorageResult<Vec<Snapshot>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        self.backend.load_history(limit)
    }

    /// Up to `limit` most recent snapshots. An unreadable or corrupt log
    /// reads as empty history.
    pub fn load(&self, limit: usize) -> Vec<Snapshot> {
        self.try_load(limit).unwrap_or_else(|err| {
            log_warn!("history unavailable, treating as empty: {err}");
            Vec::new()
        })
    }

    pub fn current(&self) -> StorageResult<Option<TwinState>> {
        self.backend.load_current()
    }

    pub fn set_current(&self, state: &TwinState) -> StorageResult<()> {
        self.backend.save_current(state)
    }

    pub fn report(&self) -> StorageResult<Option<Report>> {
        self.backend.load_report()
    }

    pub fn save_report(&self, report: &Report) -> StorageResult<()> {
        self.backend.save_report(report)
    }

    /// Clear current state, history and report.
    pub fn reset(&self) -> StorageResult<()> {
        self.backend.clear()
    }

    pub fn teardown(&self) -> StorageResult<()> {
        self.backend.flush()
    }
}

impl std::fmt::Debug for HistoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryStore")
            .field("backend", &self.backend.describe())
            .field("capacity", &self.capacity)
            .finish()
    }
}
