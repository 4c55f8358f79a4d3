//! Single-slot JSON records (current state, report) keyed by name.

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use crate::db::connection::Database;

pub const CURRENT_STATE_KEY: &str = "current_state";
pub const REPORT_KEY: &str = "report";

impl Database {
    pub fn put_record(&self, key: &'static str, body: String) -> Result<()> {
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO twin_records (key, body, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET
                     body = excluded.body,
                     updated_at = excluded.updated_at",
                params![key, body, Utc::now().to_rfc3339()],
            )
            .with_context(|| format!("failed to write record {key}"))?;
            Ok(())
        })
    }

    pub fn get_record(&self, key: &'static str) -> Result<Option<String>> {
        self.execute(move |conn| {
            conn.query_row(
                "SELECT body FROM twin_records WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .with_context(|| format!("failed to read record {key}"))
        })
    }

    /// Drop every snapshot and record in one transaction.
    pub fn clear_all(&self) -> Result<()> {
        self.execute(|conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM snapshots", [])?;
            tx.execute("DELETE FROM twin_records", [])?;
            tx.commit().context("failed to commit reset")?;
            Ok(())
        })
    }

    pub fn checkpoint(&self) -> Result<()> {
        self.execute(|conn| {
            conn.query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))
                .context("failed to checkpoint WAL")
        })
    }
}
