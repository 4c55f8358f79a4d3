//! Rule-based state classifier.
//!
//! Maps one [`Reading`] to a [`Classification`]. Total and deterministic:
//! absent fields never fire a rule.

pub mod config;
pub mod rules;
pub mod scoring;

pub use config::ClassifierConfig;
pub use rules::{Override, Rule};

use crate::models::{Classification, Reading, TwinStatus};

#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: ClassifierConfig,
}

impl Classifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn classify(&self, reading: &Reading) -> Classification {
        let mut status = TwinStatus::Normal;
        let mut reason = rules::DEFAULT_REASON;
        let mut fired = false;

        for rule in Rule::ORDER {
            if let Some(found) = rule.evaluate(reading, &self.config) {
                fired = true;
                if let Some(next) = found.status {
                    status = next;
                }
                reason = found.reason;
            }
        }

        let confidence = scoring::compute_confidence(reading, reason, fired, &self.config);

        Classification {
            status,
            reason: reason.to_string(),
            confidence,
        }
    }
}

/// Classify with the default thresholds.
pub fn classify(reading: &Reading) -> Classification {
    Classifier::default().classify(reading)
}
