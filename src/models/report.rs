use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TwinStatus;

/// Aggregate summary over the retained history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub generated_at: DateTime<Utc>,
    pub total_records: usize,
    pub avg_hr: Option<f64>,
    pub avg_rr: Option<f64>,
    pub avg_temp: Option<f64>,
    pub most_common_status: Option<TwinStatus>,
    pub dominant_reason: Option<String>,
}
