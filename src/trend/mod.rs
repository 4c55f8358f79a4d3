//! Trend engine: short-horizon prediction from recent history.
//!
//! With fewer than `min_history` snapshots the prediction follows the
//! current status alone. Otherwise the last `trend_tail` values of each vital
//! give a direction (second-half mean minus first-half mean) and the last
//! `recent_window` snapshots give alert/warning/sleeping ratios, which feed an
//! ordered rule list.

pub mod algorithm;
pub mod config;
pub mod series;

pub use algorithm::{cold_start, TrendEngine, TrendSummary};
pub use config::TrendConfig;
