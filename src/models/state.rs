//! Classification results and the live twin state.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Indicators, Snapshot};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TwinStatus {
    Normal,
    Warning,
    Alert,
    Sleeping,
}

impl TwinStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TwinStatus::Normal => "normal",
            TwinStatus::Warning => "warning",
            TwinStatus::Alert => "alert",
            TwinStatus::Sleeping => "sleeping",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "normal" => Some(TwinStatus::Normal),
            "warning" => Some(TwinStatus::Warning),
            "alert" => Some(TwinStatus::Alert),
            "sleeping" => Some(TwinStatus::Sleeping),
            _ => None,
        }
    }
}

impl fmt::Display for TwinStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Coarse short-horizon outlook derived from recent history.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Prediction {
    Stable,
    MonitorClosely,
    RiskOfAlert,
    LikelyRecovering,
    LikelyResting,
}

impl Prediction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Prediction::Stable => "stable",
            Prediction::MonitorClosely => "monitor_closely",
            Prediction::RiskOfAlert => "risk_of_alert",
            Prediction::LikelyRecovering => "likely_recovering",
            Prediction::LikelyResting => "likely_resting",
        }
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub status: TwinStatus,
    pub reason: String,
    /// In `[0, 1]`, rounded to two decimals.
    pub confidence: f64,
}

/// The current combined state; also the response payload of an update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwinState {
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub timestamp: DateTime<Utc>,
    pub status: TwinStatus,
    pub reason: String,
    pub confidence: f64,
    pub prediction: Prediction,
    pub indicators: Indicators,
}

impl TwinState {
    pub fn assemble(
        timestamp: DateTime<Utc>,
        classification: Classification,
        prediction: Prediction,
        indicators: Indicators,
    ) -> Self {
        Self {
            timestamp,
            status: classification.status,
            reason: classification.reason,
            confidence: classification.confidence,
            prediction,
            indicators,
        }
    }

    /// The history record for this state. Confidence and prediction are
    /// live-only and not part of it.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            timestamp: self.timestamp,
            status: self.status,
            reason: self.reason.clone(),
            indicators: self.indicators.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names() {
        assert_eq!(
            serde_json::to_string(&Prediction::MonitorClosely).unwrap(),
            "\"monitor_closely\""
        );
        assert_eq!(serde_json::to_string(&TwinStatus::Sleeping).unwrap(), "\"sleeping\"");
        for status in [
            TwinStatus::Normal,
            TwinStatus::Warning,
            TwinStatus::Alert,
            TwinStatus::Sleeping,
        ] {
            assert_eq!(TwinStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TwinStatus::parse("asleep"), None);
    }

    #[test]
    fn snapshot_drops_live_fields() {
        let state = TwinState::assemble(
            Utc::now(),
            Classification {
                status: TwinStatus::Alert,
                reason: "Cry indicates pain".into(),
                confidence: 0.85,
            },
            Prediction::MonitorClosely,
            Indicators::default(),
        );

        let value = serde_json::to_value(state.snapshot()).unwrap();
        assert!(value.get("confidence").is_none());
        assert!(value.get("prediction").is_none());
        assert_eq!(value["status"], "alert");
    }
}
