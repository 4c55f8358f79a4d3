//! Persisted history record.
//!
//! A snapshot is written once per update and never modified afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::{Reading, TwinStatus};

/// Raw indicators echoed back with every state and snapshot.
///
/// Numeric vitals decode leniently: anything that is not a JSON number
/// (a string, a bool, an object) is read back as absent so one bad value in
/// the history file never poisons the whole log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Indicators {
    #[serde(default, deserialize_with = "lenient_number")]
    pub hr: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub rr: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub temp: Option<f64>,
    #[serde(default)]
    pub face_emotion: Option<String>,
    #[serde(default)]
    pub cry_emotion: Option<String>,
    #[serde(default)]
    pub sleep_state: Option<String>,
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_f64()))
}

impl From<&Reading> for Indicators {
    fn from(reading: &Reading) -> Self {
        Self {
            hr: reading.hr,
            rr: reading.rr,
            temp: reading.temp,
            face_emotion: reading.face_emotion.clone(),
            cry_emotion: reading.cry_emotion.clone(),
            sleep_state: reading.sleep_state.clone(),
        }
    }
}

/// Which numeric vital a series is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vital {
    HeartRate,
    RespirationRate,
    Temperature,
}

impl Indicators {
    pub fn vital(&self, vital: Vital) -> Option<f64> {
        match vital {
            Vital::HeartRate => self.hr,
            Vital::RespirationRate => self.rr,
            Vital::Temperature => self.temp,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub timestamp: DateTime<Utc>,
    pub status: TwinStatus,
    pub reason: String,
    #[serde(default)]
    pub indicators: Indicators,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_numeric_vitals_decode_as_absent() {
        let indicators: Indicators = serde_json::from_str(
            r#"{"hr": "fast", "rr": 30, "temp": true, "face_emotion": "happy"}"#,
        )
        .unwrap();

        assert!(indicators.hr.is_none());
        assert_eq!(indicators.rr, Some(30.0));
        assert!(indicators.temp.is_none());
        assert_eq!(indicators.face_emotion.as_deref(), Some("happy"));
    }

    #[test]
    fn offsetless_timestamp_decodes() {
        let snapshot: Snapshot = serde_json::from_str(
            r#"{"timestamp": "2025-11-02T10:00:00.123456", "status": "alert", "reason": "Cry indicates pain"}"#,
        )
        .unwrap();

        assert_eq!(snapshot.timestamp.to_rfc3339(), "2025-11-02T10:00:00.123456+00:00");
        assert_eq!(snapshot.status, TwinStatus::Alert);
    }

    #[test]
    fn snapshot_without_indicators_decodes() {
        let snapshot: Snapshot = serde_json::from_str(
            r#"{"timestamp": "2025-01-01T10:00:00Z", "status": "warning", "reason": "Mild fever"}"#,
        )
        .unwrap();

        assert_eq!(snapshot.status, TwinStatus::Warning);
        assert_eq!(snapshot.indicators, Indicators::default());
    }
}
