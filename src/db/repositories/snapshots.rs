use anyhow::{Context, Result};
use rusqlite::params;

use crate::db::{
    connection::Database,
    helpers::{parse_datetime, parse_status, to_i64},
};
use crate::models::{Indicators, Snapshot};

impl Database {
    /// Insert a snapshot and trim the table to the newest `capacity` rows in
    /// one transaction.
    pub fn insert_snapshot(&self, snapshot: &Snapshot, capacity: usize) -> Result<()> {
        let record = snapshot.clone();
        let keep = to_i64(capacity)?;
        self.execute(move |conn| {
            let tx = conn
                .transaction()
                .context("failed to open snapshot transaction")?;

            tx.execute(
                "INSERT INTO snapshots (
                    timestamp,
                    status,
                    reason,
                    hr,
                    rr,
                    temp,
                    face_emotion,
                    cry_emotion,
                    sleep_state
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    record.timestamp.to_rfc3339(),
                    record.status.as_str(),
                    record.reason,
                    record.indicators.hr,
                    record.indicators.rr,
                    record.indicators.temp,
                    record.indicators.face_emotion,
                    record.indicators.cry_emotion,
                    record.indicators.sleep_state,
                ],
            )
            .with_context(|| "failed to insert snapshot")?;

            tx.execute(
                "DELETE FROM snapshots
                 WHERE id NOT IN (
                     SELECT id FROM snapshots ORDER BY id DESC LIMIT ?1
                 )",
                params![keep],
            )
            .with_context(|| "failed to trim snapshot history")?;

            tx.commit().context("failed to commit snapshot")?;
            Ok(())
        })
    }

    /// Newest `limit` snapshots, oldest first.
    pub fn recent_snapshots(&self, limit: usize) -> Result<Vec<Snapshot>> {
        let limit = to_i64(limit)?;
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT timestamp, status, reason, hr, rr, temp, face_emotion, cry_emotion, sleep_state
                 FROM (
                     SELECT * FROM snapshots ORDER BY id DESC LIMIT ?1
                 )
                 ORDER BY id ASC",
            )?;

            let mut rows = stmt.query(params![limit])?;
            let mut snapshots = Vec::new();
            while let Some(row) = rows.next()? {
                snapshots.push(Snapshot {
                    timestamp: parse_datetime(&row.get::<_, String>(0)?, "timestamp")?,
                    status: parse_status(&row.get::<_, String>(1)?)?,
                    reason: row.get(2)?,
                    indicators: Indicators {
                        hr: row.get(3)?,
                        rr: row.get(4)?,
                        temp: row.get(5)?,
                        face_emotion: row.get(6)?,
                        cry_emotion: row.get(7)?,
                        sleep_state: row.get(8)?,
                    },
                });
            }

            Ok(snapshots)
        })
    }

    pub fn count_snapshots(&self) -> Result<usize> {
        self.execute(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM snapshots", [], |row| row.get(0))?;
            Ok(usize::try_from(count)?)
        })
    }
}
