use crate::classifier::config::ClassifierConfig;
use crate::models::Reading;

/// Confidence for a finished classification.
///
/// A quiet reading (no rule fired) scores `quiet_confidence`. Otherwise the
/// base score gains a bonus per corroborating pair: crying face with a pain
/// cry, and a temperature above `fever_match_c` whose final reason still
/// mentions fever.
pub fn compute_confidence(
    reading: &Reading,
    final_reason: &str,
    any_rule_fired: bool,
    config: &ClassifierConfig,
) -> f64 {
    if !any_rule_fired {
        return round2(config.quiet_confidence);
    }

    let mut matches = 0_u32;
    if reading.face_emotion.as_deref() == Some("cry") && reading.cry_emotion.as_deref() == Some("pain")
    {
        matches += 1;
    }
    if reading.temp.is_some_and(|t| t > config.fever_match_c) && final_reason.contains("fever") {
        matches += 1;
    }

    let confidence = config.base_confidence + f64::from(matches) * config.match_bonus;
    round2(confidence.min(config.max_confidence))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
