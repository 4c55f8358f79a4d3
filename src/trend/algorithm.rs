use crate::db::HistoryStore;
use crate::models::snapshot::Vital;
use crate::models::{Classification, Prediction, Snapshot, TwinStatus};
use crate::trend::config::TrendConfig;
use crate::trend::series::{extract_series, status_ratio, trend_last};
use crate::log_warn;

const ENABLE_LOGS: bool = true;

/// Directional trends and recent status ratios behind a warm prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendSummary {
    pub trend_hr: f64,
    pub trend_rr: f64,
    pub trend_temp: f64,
    pub alert_ratio: f64,
    pub warning_ratio: f64,
    pub sleeping_ratio: f64,
}

#[derive(Debug, Clone, Default)]
pub struct TrendEngine {
    config: TrendConfig,
}

impl TrendEngine {
    pub fn new(config: TrendConfig) -> Self {
        Self { config }
    }

    /// Predict from the stored history. An unreadable history is treated as
    /// empty, which lands on the status-only fallback.
    pub fn predict(&self, current: &Classification, store: &HistoryStore) -> Prediction {
        let history = match store.try_load(self.config.history_window) {
            Ok(history) => history,
            Err(err) => {
                log_warn!("predicting without history: {err}");
                Vec::new()
            }
        };
        self.predict_from_history(current.status, &history)
    }

    pub fn predict_from_history(&self, status: TwinStatus, history: &[Snapshot]) -> Prediction {
        if history.len() < self.config.min_history {
            return cold_start(status);
        }
        self.decide(&self.summarize(history))
    }

    pub fn summarize(&self, history: &[Snapshot]) -> TrendSummary {
        let start = history.len().saturating_sub(self.config.history_window);
        let history = &history[start..];

        let tail = self.config.trend_tail;
        let trend_of = |vital| trend_last(&extract_series(history, vital), tail);

        let recent = &history[history.len().saturating_sub(self.config.recent_window)..];

        TrendSummary {
            trend_hr: trend_of(Vital::HeartRate),
            trend_rr: trend_of(Vital::RespirationRate),
            trend_temp: trend_of(Vital::Temperature),
            alert_ratio: status_ratio(recent, TwinStatus::Alert),
            warning_ratio: status_ratio(recent, TwinStatus::Warning),
            sleeping_ratio: status_ratio(recent, TwinStatus::Sleeping),
        }
    }

    /// First matching rule wins.
    pub fn decide(&self, summary: &TrendSummary) -> Prediction {
        let c = &self.config;
        let t = c.trend_threshold;

        let any_rising = summary.trend_hr > t || summary.trend_rr > t || summary.trend_temp > t;
        if summary.alert_ratio >= c.risk_alert_ratio && any_rising {
            return Prediction::RiskOfAlert;
        }

        if summary.alert_ratio < c.recovering_alert_ratio
            && summary.trend_hr < -t
            && summary.trend_rr < -t
        {
            return Prediction::LikelyRecovering;
        }

        if summary.sleeping_ratio > c.resting_sleep_ratio
            && summary.trend_hr <= 0.0
            && summary.trend_rr <= 0.0
        {
            return Prediction::LikelyResting;
        }

        if summary.alert_ratio + summary.warning_ratio >= c.monitor_ratio {
            return Prediction::MonitorClosely;
        }

        Prediction::Stable
    }
}

/// Status-only prediction used when history is too short.
pub fn cold_start(status: TwinStatus) -> Prediction {
    match status {
        TwinStatus::Alert => Prediction::MonitorClosely,
        TwinStatus::Sleeping => Prediction::LikelyResting,
        TwinStatus::Normal | TwinStatus::Warning => Prediction::Stable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::numbered_snapshot;

    fn history_of(entries: &[(TwinStatus, f64, f64)]) -> Vec<Snapshot> {
        entries
            .iter()
            .enumerate()
            .map(|(i, (status, hr, rr))| {
                let mut snapshot = numbered_snapshot(i);
                snapshot.status = *status;
                snapshot.indicators.hr = Some(*hr);
                snapshot.indicators.rr = Some(*rr);
                snapshot
            })
            .collect()
    }

    #[test]
    fn cold_start_by_status() {
        let engine = TrendEngine::default();
        let short = history_of(&[(TwinStatus::Alert, 150.0, 50.0); 4]);

        assert_eq!(engine.predict_from_history(TwinStatus::Alert, &short), Prediction::MonitorClosely);
        assert_eq!(engine.predict_from_history(TwinStatus::Sleeping, &short), Prediction::LikelyResting);
        assert_eq!(engine.predict_from_history(TwinStatus::Warning, &short), Prediction::Stable);
        assert_eq!(engine.predict_from_history(TwinStatus::Normal, &[]), Prediction::Stable);
    }

    #[test]
    fn rising_alerts_predict_risk() {
        let engine = TrendEngine::default();
        let history: Vec<_> = (0..10)
            .map(|i| (TwinStatus::Alert, 130.0 + i as f64, 40.0))
            .collect();

        let prediction = engine.predict_from_history(TwinStatus::Alert, &history_of(&history));
        assert_eq!(prediction, Prediction::RiskOfAlert);
    }

    #[test]
    fn falling_vitals_predict_recovery() {
        let engine = TrendEngine::default();
        let history: Vec<_> = (0..8)
            .map(|i| (TwinStatus::Normal, 140.0 - 2.0 * i as f64, 40.0 - i as f64))
            .collect();

        let prediction = engine.predict_from_history(TwinStatus::Normal, &history_of(&history));
        assert_eq!(prediction, Prediction::LikelyRecovering);
    }

    #[test]
    fn flat_sleep_predicts_resting() {
        let engine = TrendEngine::default();
        let history: Vec<_> = (0..6).map(|_| (TwinStatus::Sleeping, 100.0, 25.0)).collect();

        let prediction = engine.predict_from_history(TwinStatus::Normal, &history_of(&history));
        assert_eq!(prediction, Prediction::LikelyResting);
    }

    #[test]
    fn mixed_warnings_predict_monitoring() {
        let engine = TrendEngine::default();
        let mut history = vec![(TwinStatus::Normal, 120.0, 30.0); 6];
        history.extend([(TwinStatus::Warning, 120.0, 30.0); 2]);
        history.extend([(TwinStatus::Alert, 120.0, 30.0); 2]);

        let summary = engine.summarize(&history_of(&history));
        assert!((summary.alert_ratio - 0.2).abs() < 1e-9);
        assert!((summary.warning_ratio - 0.2).abs() < 1e-9);
        assert_eq!(engine.decide(&summary), Prediction::MonitorClosely);
    }

    #[test]
    fn quiet_history_is_stable() {
        let engine = TrendEngine::default();
        let history = vec![(TwinStatus::Normal, 120.0, 30.0); 20];

        let prediction = engine.predict_from_history(TwinStatus::Alert, &history_of(&history));
        assert_eq!(prediction, Prediction::Stable);
    }

    #[test]
    fn ratios_use_only_recent_window() {
        let engine = TrendEngine::default();
        let mut history = vec![(TwinStatus::Alert, 120.0, 30.0); 20];
        history.extend([(TwinStatus::Normal, 120.0, 30.0); 10]);

        let summary = engine.summarize(&history_of(&history));
        assert_eq!(summary.alert_ratio, 0.0);
    }

    #[test]
    fn empty_store_uses_cold_start() {
        let store = HistoryStore::in_memory();
        let engine = TrendEngine::default();
        let current = Classification {
            status: TwinStatus::Sleeping,
            reason: "Eyes closed, calm expression".into(),
            confidence: 0.8,
        };
        assert_eq!(engine.predict(&current, &store), Prediction::LikelyResting);
    }
}
