//! Inbound reading shapes.
//!
//! A `Reading` is one synchronous sample handed to the twin: vitals from the
//! monitor plus labels already produced by the face and cry classifiers.
//! Every field is optional and absent fields carry no evidence.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Heart rate (beats per minute).
    #[serde(default, alias = "heart_rate")]
    pub hr: Option<f64>,
    /// Respiration rate (breaths per minute).
    #[serde(default, alias = "resp_rate")]
    pub rr: Option<f64>,
    /// Body temperature in °C.
    #[serde(default, alias = "temperature")]
    pub temp: Option<f64>,
    #[serde(default, alias = "emotion", alias = "emotion_status")]
    pub face_emotion: Option<String>,
    #[serde(default, alias = "cry_type", alias = "cry_classification")]
    pub cry_emotion: Option<String>,
    /// Passed through to the indicators; no rule reads it.
    #[serde(default)]
    pub sleep_state: Option<String>,
}

/// Payload posted by the bedside device.
///
/// The device always reports a cry and face label, falling back to
/// `silence` / `neutral` when the classifiers have nothing to say.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VitalsPayload {
    #[serde(default = "default_child_id")]
    pub child_id: u32,
    #[serde(default)]
    pub heart_rate: Option<f64>,
    #[serde(default)]
    pub resp_rate: Option<f64>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default = "default_cry_type")]
    pub cry_type: String,
    #[serde(default = "default_emotion")]
    pub emotion: String,
}

fn default_child_id() -> u32 {
    1
}

fn default_cry_type() -> String {
    "silence".into()
}

fn default_emotion() -> String {
    "neutral".into()
}

impl From<VitalsPayload> for Reading {
    fn from(payload: VitalsPayload) -> Self {
        Self {
            hr: payload.heart_rate,
            rr: payload.resp_rate,
            temp: payload.temperature,
            face_emotion: Some(payload.emotion),
            cry_emotion: Some(payload.cry_type),
            sleep_state: None,
        }
    }
}
