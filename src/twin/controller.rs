use chrono::Utc;

use crate::classifier::Classifier;
use crate::db::HistoryStore;
use crate::error::{TwinError, TwinResult};
use crate::models::{Indicators, Reading, Report, Snapshot, TwinState};
use crate::report;
use crate::trend::TrendEngine;
use crate::{log_error, log_info};

const ENABLE_LOGS: bool = true;

/// Orchestrates one update: classify, predict, persist.
///
/// The store is bound at construction and released with
/// [`shutdown`](DigitalTwin::shutdown).
#[derive(Debug, Clone)]
pub struct DigitalTwin {
    store: HistoryStore,
    classifier: Classifier,
    trend: TrendEngine,
}

impl DigitalTwin {
    pub fn new(store: HistoryStore) -> Self {
        Self::with_engines(store, Classifier::default(), TrendEngine::default())
    }

    pub fn with_engines(store: HistoryStore, classifier: Classifier, trend: TrendEngine) -> Self {
        Self {
            store,
            classifier,
            trend,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(HistoryStore::in_memory())
    }

    pub fn store(&self) -> &HistoryStore {
        &self.store
    }

    /// Process one reading to completion.
    ///
    /// The prediction is taken from history before this reading's snapshot
    /// is appended. If persisting fails the assembled state is returned
    /// inside [`TwinError::StorageWrite`].
    pub fn update(&self, reading: &Reading) -> TwinResult<TwinState> {
        let classification = self.classifier.classify(reading);
        let prediction = self.trend.predict(&classification, &self.store);

        let state = TwinState::assemble(
            Utc::now(),
            classification,
            prediction,
            Indicators::from(reading),
        );

        if let Err(source) = self.persist(&state) {
            log_error!("twin state not persisted: {source}");
            return Err(TwinError::StorageWrite {
                state: Box::new(state),
                source,
            });
        }

        log_info!(
            "twin updated: status={} prediction={} confidence={:.2} ({})",
            state.status,
            state.prediction,
            state.confidence,
            state.reason
        );

        Ok(state)
    }

    fn persist(&self, state: &TwinState) -> Result<(), crate::error::StorageError> {
        let current = self.store.set_current(state);
        let appended = self.store.append(&state.snapshot());
        current.and(appended)
    }

    pub fn current(&self) -> TwinResult<Option<TwinState>> {
        Ok(self.store.current()?)
    }

    pub fn history(&self, limit: usize) -> Vec<Snapshot> {
        self.store.load(limit)
    }

    pub fn generate_report(&self) -> TwinResult<Option<Report>> {
        report::generate_report(&self.store)
    }

    pub fn last_report(&self) -> TwinResult<Option<Report>> {
        Ok(self.store.report()?)
    }

    /// Clear current state, history and report.
    pub fn reset(&self) -> TwinResult<()> {
        self.store.reset()?;
        log_info!("twin reset ({})", self.store.backend().describe());
        Ok(())
    }

    pub fn shutdown(self) -> TwinResult<()> {
        self.store.teardown()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::numbered_snapshot;
    use crate::db::TwinStore;
    use crate::error::{Record, StorageError, StorageResult};
    use crate::models::{Prediction, TwinStatus};
    use std::sync::Arc;

    /// Reads fine (empty), fails every write.
    struct ReadOnlyStore;

    impl TwinStore for ReadOnlyStore {
        fn load_history(&self, _limit: usize) -> StorageResult<Vec<Snapshot>> {
            Ok(Vec::new())
        }
        fn append_snapshot(&self, _snapshot: &Snapshot, _capacity: usize) -> StorageResult<()> {
            Err(StorageError::write(Record::History, "disk full"))
        }
        fn load_current(&self) -> StorageResult<Option<TwinState>> {
            Ok(None)
        }
        fn save_current(&self, _state: &TwinState) -> StorageResult<()> {
            Err(StorageError::write(Record::CurrentState, "disk full"))
        }
        fn load_report(&self) -> StorageResult<Option<Report>> {
            Ok(None)
        }
        fn save_report(&self, _report: &Report) -> StorageResult<()> {
            Err(StorageError::write(Record::Report, "disk full"))
        }
        fn clear(&self) -> StorageResult<()> {
            Ok(())
        }
        fn describe(&self) -> String {
            "read-only".into()
        }
    }

    /// History is always corrupt; writes succeed and are dropped.
    struct CorruptHistoryStore;

    impl TwinStore for CorruptHistoryStore {
        fn load_history(&self, _limit: usize) -> StorageResult<Vec<Snapshot>> {
            Err(StorageError::Corrupt {
                record: Record::History,
                detail: "truncated".into(),
            })
        }
        fn append_snapshot(&self, _snapshot: &Snapshot, _capacity: usize) -> StorageResult<()> {
            Ok(())
        }
        fn load_current(&self) -> StorageResult<Option<TwinState>> {
            Ok(None)
        }
        fn save_current(&self, _state: &TwinState) -> StorageResult<()> {
            Ok(())
        }
        fn load_report(&self) -> StorageResult<Option<Report>> {
            Ok(None)
        }
        fn save_report(&self, _report: &Report) -> StorageResult<()> {
            Ok(())
        }
        fn clear(&self) -> StorageResult<()> {
            Ok(())
        }
        fn describe(&self) -> String {
            "corrupt".into()
        }
    }

    fn alert_reading(hr: f64) -> Reading {
        Reading {
            hr: Some(hr),
            rr: Some(50.0),
            ..Reading::default()
        }
    }

    #[test]
    fn update_then_current_round_trips() {
        let twin = DigitalTwin::in_memory();
        let state = twin
            .update(&Reading {
                hr: Some(118.0),
                rr: Some(32.0),
                temp: Some(36.9),
                face_emotion: Some("happy".into()),
                cry_emotion: Some("laugh".into()),
                sleep_state: Some("awake".into()),
            })
            .unwrap();

        assert_eq!(state.status, TwinStatus::Normal);
        assert_eq!(state.reason, "Baby laughing → positive mood");
        assert_eq!(state.prediction, Prediction::Stable);
        assert_eq!(state.indicators.sleep_state.as_deref(), Some("awake"));
        assert_eq!(twin.current().unwrap(), Some(state.clone()));
        assert_eq!(twin.history(10), vec![state.snapshot()]);
    }

    #[test]
    fn prediction_ignores_the_reading_itself() {
        let twin = DigitalTwin::in_memory();
        // Four alerts in history is still a cold start for the fifth.
        for i in 0..4 {
            twin.update(&alert_reading(150.0 + i as f64)).unwrap();
        }
        let fifth = twin.update(&alert_reading(160.0)).unwrap();
        assert_eq!(fifth.prediction, Prediction::MonitorClosely);
        assert_eq!(twin.history(50).len(), 5);
    }

    #[test]
    fn rising_alerts_reach_risk_on_eleventh_update() {
        let twin = DigitalTwin::in_memory();
        for i in 0..10 {
            twin.update(&alert_reading(141.0 + i as f64)).unwrap();
        }
        let eleventh = twin.update(&alert_reading(151.0)).unwrap();
        assert_eq!(eleventh.prediction, Prediction::RiskOfAlert);
    }

    #[test]
    fn write_failure_carries_the_state() {
        let twin = DigitalTwin::new(HistoryStore::new(Arc::new(ReadOnlyStore)));
        let err = twin.update(&alert_reading(150.0)).unwrap_err();

        assert!(matches!(err, TwinError::StorageWrite { .. }));
        let state = err.into_state().unwrap();
        assert_eq!(state.status, TwinStatus::Alert);
        assert_eq!(state.prediction, Prediction::MonitorClosely);
    }

    #[test]
    fn corrupt_history_still_produces_a_state() {
        let twin = DigitalTwin::new(HistoryStore::new(Arc::new(CorruptHistoryStore)));
        let state = twin
            .update(&Reading {
                face_emotion: Some("sleep".into()),
                ..Reading::default()
            })
            .unwrap();
        assert_eq!(state.prediction, Prediction::LikelyResting);
        assert!(twin.generate_report().unwrap().is_none());
    }

    #[test]
    fn reset_forgets_history() {
        let twin = DigitalTwin::in_memory();
        twin.store().append(&numbered_snapshot(1)).unwrap();
        twin.update(&Reading::default()).unwrap();
        assert!(twin.generate_report().unwrap().is_some());

        twin.reset().unwrap();
        assert!(twin.current().unwrap().is_none());
        assert!(twin.history(50).is_empty());
        assert!(twin.last_report().unwrap().is_none());
    }
}
