//! Error types at the library boundary.
//!
//! Backends use `anyhow` internally and convert into [`StorageError`] at the
//! [`TwinStore`](crate::db::TwinStore) seam, naming the record that failed.

use std::fmt;

use thiserror::Error;

use crate::models::TwinState;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The three independently persisted records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Record {
    CurrentState,
    History,
    Report,
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Record::CurrentState => "current state",
            Record::History => "history log",
            Record::Report => "report",
        })
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read {record}: {source}")]
    Read {
        record: Record,
        #[source]
        source: BoxError,
    },

    #[error("{record} is corrupt: {detail}")]
    Corrupt { record: Record, detail: String },

    #[error("failed to write {record}: {source}")]
    Write {
        record: Record,
        #[source]
        source: BoxError,
    },

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub fn read(record: Record, source: impl Into<BoxError>) -> Self {
        StorageError::Read {
            record,
            source: source.into(),
        }
    }

    pub fn write(record: Record, source: impl Into<BoxError>) -> Self {
        StorageError::Write {
            record,
            source: source.into(),
        }
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum TwinError {
    /// The state was computed but could not be made durable. The assembled
    /// state is still available to the caller.
    #[error("twin state computed but not persisted: {source}")]
    StorageWrite {
        state: Box<TwinState>,
        #[source]
        source: StorageError,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl TwinError {
    /// The in-memory state carried by a write failure, if any.
    pub fn into_state(self) -> Option<TwinState> {
        match self {
            TwinError::StorageWrite { state, .. } => Some(*state),
            TwinError::Storage(_) => None,
        }
    }
}

pub type TwinResult<T> = Result<T, TwinError>;
