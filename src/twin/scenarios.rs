//! Canned readings for demos and smoke checks.

use crate::error::TwinResult;
use crate::models::{Prediction, Reading, TwinStatus};
use crate::twin::DigitalTwin;

#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: &'static str,
    pub reading: Reading,
}

#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    pub name: &'static str,
    pub status: TwinStatus,
    pub prediction: Prediction,
    pub confidence: f64,
    pub reason: String,
}

fn reading(face: &str, cry: &str, hr: f64, rr: f64, temp: f64, sleep: &str) -> Reading {
    Reading {
        hr: Some(hr),
        rr: Some(rr),
        temp: Some(temp),
        face_emotion: Some(face.into()),
        cry_emotion: Some(cry.into()),
        sleep_state: Some(sleep.into()),
    }
}

/// Happy and laughing, tired and dozing off, feverish and crying in pain.
pub fn canonical() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "happy child",
            reading: reading("happy", "laugh", 118.0, 32.0, 36.9, "awake"),
        },
        Scenario {
            name: "sleepy child",
            reading: reading("sleep", "tired", 95.0, 24.0, 36.6, "deep_sleep"),
        },
        Scenario {
            name: "feverish child",
            reading: reading("cry", "pain", 140.0, 42.0, 38.7, "awake"),
        },
    ]
}

/// Feed each scenario through `twin` in order.
pub fn run(twin: &DigitalTwin, scenarios: &[Scenario]) -> TwinResult<Vec<ScenarioOutcome>> {
    scenarios
        .iter()
        .map(|scenario| {
            let state = twin.update(&scenario.reading)?;
            Ok(ScenarioOutcome {
                name: scenario.name,
                status: state.status,
                prediction: state.prediction,
                confidence: state.confidence,
                reason: state.reason,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_outcomes_on_fresh_twin() {
        let twin = DigitalTwin::in_memory();
        let outcomes = run(&twin, &canonical()).unwrap();

        assert_eq!(outcomes[0].status, TwinStatus::Normal);
        assert_eq!(outcomes[0].prediction, Prediction::Stable);

        assert_eq!(outcomes[1].status, TwinStatus::Sleeping);
        assert_eq!(outcomes[1].prediction, Prediction::LikelyResting);

        assert_eq!(outcomes[2].status, TwinStatus::Alert);
        assert_eq!(outcomes[2].reason, "Cry indicates pain");
        assert_eq!(outcomes[2].prediction, Prediction::MonitorClosely);
        assert!(outcomes[2].confidence >= 0.85 && outcomes[2].confidence <= 0.99);
    }
}
