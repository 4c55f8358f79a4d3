//! Directory of three JSON files, one per record.
//!
//! Every write goes to a temporary file in the same directory and is then
//! renamed over the target, so readers see either the old or the new file
//! and never a partial one. History appends and resets additionally hold an
//! exclusive advisory lock on `digital_twin_history.lock` across the
//! read-modify-truncate, which serializes writers across handles and
//! processes sharing the directory.

use std::{
    fs::{self, OpenOptions},
    io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::Utc;
use fd_lock::RwLock;
use serde::{de::DeserializeOwned, Serialize};
use tempfile::NamedTempFile;

use crate::db::TwinStore;
use crate::error::{Record, StorageError, StorageResult};
use crate::models::{Report, Snapshot, TwinState};
use crate::{log_info, log_warn};

const ENABLE_LOGS: bool = true;

pub const STATE_FILE: &str = "digital_twin_state.json";
pub const HISTORY_FILE: &str = "digital_twin_history.json";
pub const REPORT_FILE: &str = "digital_twin_report.json";
pub const HISTORY_LOCK_FILE: &str = "digital_twin_history.lock";

#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create twin directory {}", dir.display()))?;

        log_info!("JSON twin store at {}", dir.display());

        Ok(Self { dir })
    }

    pub fn path_for(&self, record: Record) -> PathBuf {
        self.dir.join(match record {
            Record::CurrentState => STATE_FILE,
            Record::History => HISTORY_FILE,
            Record::Report => REPORT_FILE,
        })
    }

    /// Run `action` while holding the exclusive history lock.
    fn with_history_lock<T>(&self, action: impl FnOnce() -> StorageResult<T>) -> StorageResult<T> {
        let lock_path = self.dir.join(HISTORY_LOCK_FILE);
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|err| StorageError::write(Record::History, err))?;

        let mut lock = RwLock::new(file);
        let _guard = lock
            .write()
            .map_err(|err| StorageError::write(Record::History, err))?;
        action()
    }

    /// Move an undecodable history log aside so a fresh log never
    /// overwrites it.
    fn quarantine_history(&self, detail: &str) -> StorageResult<()> {
        let source = self.path_for(Record::History);
        let target = self.dir.join(format!(
            "{HISTORY_FILE}.corrupt-{}",
            Utc::now().format("%Y%m%dT%H%M%S%.6fZ")
        ));
        fs::rename(&source, &target).map_err(|err| StorageError::write(Record::History, err))?;
        log_warn!(
            "history log is corrupt ({detail}), moved to {} and starting fresh",
            target.display()
        );
        Ok(())
    }

    fn read_raw(&self, record: Record) -> StorageResult<Option<String>> {
        let path = self.path_for(record);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::read(record, err)),
        }
    }

    fn read_json<T: DeserializeOwned>(&self, record: Record) -> StorageResult<Option<T>> {
        let Some(contents) = self.read_raw(record)? else {
            return Ok(None);
        };
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|err| StorageError::Corrupt {
                record,
                detail: err.to_string(),
            })
    }

    fn read_history(&self) -> StorageResult<Vec<Snapshot>> {
        let Some(value) = self.read_json::<serde_json::Value>(Record::History)? else {
            return Ok(Vec::new());
        };
        if !value.is_array() {
            return Err(StorageError::Corrupt {
                record: Record::History,
                detail: "expected a JSON array of snapshots".into(),
            });
        }
        serde_json::from_value(value).map_err(|err| StorageError::Corrupt {
            record: Record::History,
            detail: err.to_string(),
        })
    }

    fn write_json<T: Serialize>(&self, record: Record, value: &T) -> StorageResult<()> {
        self.replace_file(&self.path_for(record), value)
            .map_err(|err| StorageError::write(record, err))
    }

    fn replace_file<T: Serialize>(&self, target: &Path, value: &T) -> Result<()> {
        let mut staged = NamedTempFile::new_in(&self.dir)
            .with_context(|| format!("failed to stage write in {}", self.dir.display()))?;
        serde_json::to_writer_pretty(&mut staged, value).context("failed to serialize record")?;
        staged
            .as_file()
            .sync_all()
            .context("failed to sync staged record")?;
        staged
            .persist(target)
            .map_err(|err| err.error)
            .with_context(|| format!("failed to replace {}", target.display()))?;
        Ok(())
    }

    fn remove(&self, record: Record) -> StorageResult<()> {
        match fs::remove_file(self.path_for(record)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StorageError::write(record, err)),
        }
    }
}

impl TwinStore for JsonFileStore {
    fn load_history(&self, limit: usize) -> StorageResult<Vec<Snapshot>> {
        let mut history = self.read_history()?;
        let start = history.len().saturating_sub(limit);
        Ok(history.split_off(start))
    }

    fn append_snapshot(&self, snapshot: &Snapshot, capacity: usize) -> StorageResult<()> {
        self.with_history_lock(|| {
            let mut history = match self.read_history() {
                Ok(history) => history,
                Err(StorageError::Corrupt { detail, .. }) => {
                    self.quarantine_history(&detail)?;
                    Vec::new()
                }
                Err(err) => return Err(err),
            };
            history.push(snapshot.clone());
            let excess = history.len().saturating_sub(capacity);
            history.drain(..excess);

            self.write_json(Record::History, &history)
        })
    }

    fn load_current(&self) -> StorageResult<Option<TwinState>> {
        self.read_json(Record::CurrentState)
    }

    fn save_current(&self, state: &TwinState) -> StorageResult<()> {
        self.write_json(Record::CurrentState, state)
    }

    fn load_report(&self) -> StorageResult<Option<Report>> {
        self.read_json(Record::Report)
    }

    fn save_report(&self, report: &Report) -> StorageResult<()> {
        self.write_json(Record::Report, report)
    }

    fn clear(&self) -> StorageResult<()> {
        self.with_history_lock(|| {
            for record in [Record::CurrentState, Record::History, Record::Report] {
                self.remove(record)?;
            }
            Ok(())
        })
    }

    fn describe(&self) -> String {
        format!("json:{}", self.dir.display())
    }
}
