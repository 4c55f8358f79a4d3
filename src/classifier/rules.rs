//! Independent rule evaluators.
//!
//! Each rule looks at one aspect of a reading and may produce an override.
//! Rules are folded in [`Rule::ORDER`]; a later override replaces the reason
//! of an earlier one and, when it carries a status, the status too.

use crate::classifier::config::ClassifierConfig;
use crate::models::{Reading, TwinStatus};

pub const HIGH_FEVER: &str = "High fever (>39°C)";
pub const MILD_FEVER: &str = "Mild fever";
pub const LOW_TEMPERATURE: &str = "Low body temperature";
pub const HIGH_HR_RR: &str = "High HR/RR → stress or pain";
pub const LOW_HR_RR: &str = "Low HR/RR → deep sleep";
pub const FACE_CRYING: &str = "Face shows crying/distress";
pub const FACE_ASLEEP: &str = "Eyes closed, calm expression";
pub const CRY_PAIN: &str = "Cry indicates pain";
pub const CRY_HUNGER: &str = "Cry indicates hunger";
pub const LAUGHING: &str = "Baby laughing → positive mood";
pub const DEFAULT_REASON: &str = "stable and healthy";

/// Output of a single rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Override {
    /// `None` leaves the status as the earlier rules set it.
    pub status: Option<TwinStatus>,
    pub reason: &'static str,
}

impl Override {
    fn set(status: TwinStatus, reason: &'static str) -> Option<Self> {
        Some(Self {
            status: Some(status),
            reason,
        })
    }

    fn reason_only(reason: &'static str) -> Option<Self> {
        Some(Self {
            status: None,
            reason,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Temperature,
    HeartRespiration,
    FaceEmotion,
    CryEmotion,
}

impl Rule {
    /// Fixed priority order, lowest first. Later rules win.
    pub const ORDER: [Rule; 4] = [
        Rule::Temperature,
        Rule::HeartRespiration,
        Rule::FaceEmotion,
        Rule::CryEmotion,
    ];

    pub fn evaluate(self, reading: &Reading, config: &ClassifierConfig) -> Option<Override> {
        match self {
            Rule::Temperature => temperature(reading, config),
            Rule::HeartRespiration => heart_respiration(reading, config),
            Rule::FaceEmotion => face_emotion(reading),
            Rule::CryEmotion => cry_emotion(reading),
        }
    }
}

fn temperature(reading: &Reading, config: &ClassifierConfig) -> Option<Override> {
    let temp = reading.temp?;
    if temp >= config.high_fever_c {
        Override::set(TwinStatus::Alert, HIGH_FEVER)
    } else if temp >= config.mild_fever_c {
        Override::set(TwinStatus::Warning, MILD_FEVER)
    } else if temp < config.low_temp_c {
        Override::set(TwinStatus::Warning, LOW_TEMPERATURE)
    } else {
        None
    }
}

/// Needs both vitals; a zero reading counts as no signal.
fn heart_respiration(reading: &Reading, config: &ClassifierConfig) -> Option<Override> {
    let hr = reading.hr.filter(|v| *v != 0.0)?;
    let rr = reading.rr.filter(|v| *v != 0.0)?;

    if hr > config.hr_high_bpm || rr > config.rr_high_bpm {
        Override::set(TwinStatus::Alert, HIGH_HR_RR)
    } else if hr < config.hr_low_bpm || rr < config.rr_low_bpm {
        Override::set(TwinStatus::Warning, LOW_HR_RR)
    } else {
        None
    }
}

fn face_emotion(reading: &Reading) -> Option<Override> {
    match reading.face_emotion.as_deref()? {
        "cry" => Override::set(TwinStatus::Alert, FACE_CRYING),
        "sleep" => Override::set(TwinStatus::Sleeping, FACE_ASLEEP),
        _ => None,
    }
}

fn cry_emotion(reading: &Reading) -> Option<Override> {
    match reading.cry_emotion.as_deref()? {
        "pain" | "discomfort" => Override::set(TwinStatus::Alert, CRY_PAIN),
        "hungry" => Override::set(TwinStatus::Warning, CRY_HUNGER),
        // Reason only; the status from earlier rules stands.
        "laugh" => Override::reason_only(LAUGHING),
        _ => None,
    }
}
