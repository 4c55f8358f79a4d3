use std::convert::TryFrom;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};

use crate::models::{timestamp, TwinStatus};

pub fn to_i64(value: usize) -> Result<i64> {
    i64::try_from(value).map_err(|_| anyhow!("value {value} exceeds SQLite INTEGER range"))
}

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    timestamp::parse(value).with_context(|| format!("failed to parse {field}"))
}

pub fn parse_status(value: &str) -> Result<TwinStatus> {
    TwinStatus::parse(value).ok_or_else(|| anyhow!("unknown twin status {value}"))
}
