//! Numeric helpers over snapshot history.

use crate::models::{Snapshot, TwinStatus};
use crate::models::snapshot::Vital;

/// Values of one vital across `history`, skipping snapshots without it.
pub fn extract_series(history: &[Snapshot], vital: Vital) -> Vec<f64> {
    history
        .iter()
        .filter_map(|snapshot| snapshot.indicators.vital(vital))
        .collect()
}

/// Second-half mean minus first-half mean over the last `tail` values.
///
/// At least two values are always taken when available. The split point is
/// the floor of half the window, so an odd window puts the extra value in
/// the second half. Returns 0 with fewer than two values.
pub fn trend_last(values: &[f64], tail: usize) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }

    let n = values.len().min(tail.max(2));
    let window = &values[values.len() - n..];
    let (first, second) = window.split_at(window.len() / 2);
    if first.is_empty() || second.is_empty() {
        return 0.0;
    }

    mean(second) - mean(first)
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Fraction of `snapshots` with the given status; 0 for an empty slice.
pub fn status_ratio(snapshots: &[Snapshot], status: TwinStatus) -> f64 {
    if snapshots.is_empty() {
        return 0.0;
    }
    let matching = snapshots.iter().filter(|s| s.status == status).count();
    matching as f64 / snapshots.len() as f64
}
