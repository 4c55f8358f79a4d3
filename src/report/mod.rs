//! Offline aggregate report over the retained history.

use std::collections::HashMap;
use std::hash::Hash;

use chrono::{DateTime, Utc};

use crate::db::HistoryStore;
use crate::error::TwinResult;
use crate::models::snapshot::Vital;
use crate::models::{Report, Snapshot};
use crate::trend::series::{extract_series, mean};
use crate::{log_info, log_warn};

const ENABLE_LOGS: bool = true;

/// Snapshots read per report. The history cap keeps the real number lower.
pub const REPORT_WINDOW: usize = 1000;

/// Build and persist a report. `Ok(None)` when there is no history.
pub fn generate_report(store: &HistoryStore) -> TwinResult<Option<Report>> {
    let history = match store.try_load(REPORT_WINDOW) {
        Ok(history) => history,
        Err(err) => {
            log_warn!("report over unreadable history: {err}");
            Vec::new()
        }
    };

    let Some(report) = summarize(&history, Utc::now()) else {
        return Ok(None);
    };

    store.save_report(&report)?;
    log_info!(
        "report generated over {} records (dominant status: {:?})",
        report.total_records,
        report.most_common_status
    );

    Ok(Some(report))
}

/// Aggregate `history` without touching storage.
pub fn summarize(history: &[Snapshot], generated_at: DateTime<Utc>) -> Option<Report> {
    if history.is_empty() {
        return None;
    }

    let average = |vital| {
        let values = extract_series(history, vital);
        (!values.is_empty()).then(|| round2(mean(&values)))
    };

    Some(Report {
        generated_at,
        total_records: history.len(),
        avg_hr: average(Vital::HeartRate),
        avg_rr: average(Vital::RespirationRate),
        avg_temp: average(Vital::Temperature),
        most_common_status: most_common(history.iter().map(|s| s.status)),
        dominant_reason: most_common(history.iter().map(|s| s.reason.clone())),
    })
}

/// Most frequent item; ties go to the one seen first.
pub fn most_common<T, I>(items: I) -> Option<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut counts: HashMap<T, (usize, usize)> = HashMap::new();
    for (position, item) in items.into_iter().enumerate() {
        counts.entry(item).or_insert((0, position)).0 += 1;
    }

    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(item, _)| item)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::numbered_snapshot;
    use crate::models::TwinStatus;

    #[test]
    fn empty_history_has_no_report() {
        let store = HistoryStore::in_memory();
        assert!(generate_report(&store).unwrap().is_none());
        assert!(store.report().unwrap().is_none());
    }

    #[test]
    fn ties_go_to_first_seen() {
        assert_eq!(most_common(["b", "a", "a", "b"]), Some("b"));
        assert_eq!(most_common(["b", "a", "a"]), Some("a"));
        assert_eq!(most_common(Vec::<&str>::new()), None);
    }

    #[test]
    fn averages_skip_missing_values() {
        let mut history: Vec<_> = (1..=3).map(numbered_snapshot).collect();
        history[0].indicators.temp = Some(37.0);
        history[2].indicators.temp = Some(38.25);
        history[1].indicators.hr = None;

        let report = summarize(&history, Utc::now()).unwrap();
        assert_eq!(report.total_records, 3);
        assert_eq!(report.avg_hr, Some(2.0));
        assert_eq!(report.avg_rr, None);
        assert_eq!(report.avg_temp, Some(37.63));
    }

    #[test]
    fn report_is_persisted() {
        let store = HistoryStore::in_memory();
        for i in 0..4 {
            let mut snapshot = numbered_snapshot(i);
            if i > 0 {
                snapshot.status = TwinStatus::Warning;
                snapshot.reason = "Mild fever".into();
            }
            store.append(&snapshot).unwrap();
        }

        let report = generate_report(&store).unwrap().unwrap();
        assert_eq!(report.most_common_status, Some(TwinStatus::Warning));
        assert_eq!(report.dominant_reason.as_deref(), Some("Mild fever"));
        assert_eq!(store.report().unwrap(), Some(report));
    }
}
