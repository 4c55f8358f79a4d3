/// Windows and thresholds for the prediction rules.
#[derive(Debug, Clone)]
pub struct TrendConfig {
    /// Snapshots consulted per prediction.
    pub history_window: usize,
    /// Below this many snapshots the status-only fallback is used.
    pub min_history: usize,
    /// Values per series fed to the half-split trend.
    pub trend_tail: usize,
    /// Snapshots used for the status ratios.
    pub recent_window: usize,

    /// A trend beyond this magnitude counts as rising or falling.
    pub trend_threshold: f64,
    /// `risk_of_alert` needs at least this alert ratio.
    pub risk_alert_ratio: f64,
    /// `likely_recovering` needs an alert ratio strictly below this.
    pub recovering_alert_ratio: f64,
    /// `likely_resting` needs a sleeping ratio strictly above this.
    pub resting_sleep_ratio: f64,
    /// `monitor_closely` needs alert + warning ratios of at least this.
    pub monitor_ratio: f64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            history_window: 50,
            min_history: 5,
            trend_tail: 8,
            recent_window: 10,
            trend_threshold: 0.3,
            risk_alert_ratio: 0.3,
            recovering_alert_ratio: 0.2,
            resting_sleep_ratio: 0.4,
            monitor_ratio: 0.4,
        }
    }
}
