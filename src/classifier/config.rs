/// Thresholds for the rule cascade and the confidence score.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// At or above: alert.
    pub high_fever_c: f64,
    /// At or above (and below `high_fever_c`): warning.
    pub mild_fever_c: f64,
    /// Strictly below: warning.
    pub low_temp_c: f64,

    /// HR/RR strictly above these: alert.
    pub hr_high_bpm: f64,
    pub rr_high_bpm: f64,
    /// HR/RR strictly below these: warning.
    pub hr_low_bpm: f64,
    pub rr_low_bpm: f64,

    /// Confidence when at least one rule fired.
    pub base_confidence: f64,
    /// Confidence when no rule fired at all.
    pub quiet_confidence: f64,
    /// Added per corroborating signal pair.
    pub match_bonus: f64,
    pub max_confidence: f64,
    /// Temperature above which a fever reason counts as corroborated.
    pub fever_match_c: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            high_fever_c: 39.0,
            mild_fever_c: 38.0,
            low_temp_c: 36.0,
            hr_high_bpm: 140.0,
            rr_high_bpm: 45.0,
            hr_low_bpm: 90.0,
            rr_low_bpm: 20.0,
            base_confidence: 0.80,
            quiet_confidence: 0.90,
            match_bonus: 0.05,
            max_confidence: 0.99,
            fever_match_c: 38.0,
        }
    }
}
