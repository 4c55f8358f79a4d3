use serde::{de::DeserializeOwned, Serialize};

use crate::db::repositories::records::{CURRENT_STATE_KEY, REPORT_KEY};
use crate::db::{Database, TwinStore};
use crate::error::{Record, StorageError, StorageResult};
use crate::models::{Report, Snapshot, TwinState};

impl Database {
    fn load_json_record<T: DeserializeOwned>(
        &self,
        key: &'static str,
        record: Record,
    ) -> StorageResult<Option<T>> {
        let Some(body) = self
            .get_record(key)
            .map_err(|err| StorageError::read(record, err))?
        else {
            return Ok(None);
        };
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|err| StorageError::Corrupt {
                record,
                detail: err.to_string(),
            })
    }

    fn save_json_record<T: Serialize>(
        &self,
        key: &'static str,
        record: Record,
        value: &T,
    ) -> StorageResult<()> {
        let body = serde_json::to_string(value).map_err(|err| StorageError::write(record, err))?;
        self.put_record(key, body)
            .map_err(|err| StorageError::write(record, err))
    }
}

impl TwinStore for Database {
    fn load_history(&self, limit: usize) -> StorageResult<Vec<Snapshot>> {
        self.recent_snapshots(limit)
            .map_err(|err| StorageError::read(Record::History, err))
    }

    fn append_snapshot(&self, snapshot: &Snapshot, capacity: usize) -> StorageResult<()> {
        self.insert_snapshot(snapshot, capacity)
            .map_err(|err| StorageError::write(Record::History, err))
    }

    fn load_current(&self) -> StorageResult<Option<TwinState>> {
        self.load_json_record(CURRENT_STATE_KEY, Record::CurrentState)
    }

    fn save_current(&self, state: &TwinState) -> StorageResult<()> {
        self.save_json_record(CURRENT_STATE_KEY, Record::CurrentState, state)
    }

    fn load_report(&self) -> StorageResult<Option<Report>> {
        self.load_json_record(REPORT_KEY, Record::Report)
    }

    fn save_report(&self, report: &Report) -> StorageResult<()> {
        self.save_json_record(REPORT_KEY, Record::Report, report)
    }

    fn clear(&self) -> StorageResult<()> {
        self.clear_all()
            .map_err(|err| StorageError::write(Record::History, err))
    }

    fn flush(&self) -> StorageResult<()> {
        self.checkpoint()
            .map_err(|err| StorageError::Unavailable(format!("{err:#}")))
    }

    fn describe(&self) -> String {
        format!("sqlite:{}", self.path().display())
    }
}
