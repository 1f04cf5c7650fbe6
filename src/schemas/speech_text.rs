//! Speech transcription schema.
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validation::{Violation, ViolationKind};

use super::features::{Feature, Features};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Audio {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sampling_rate: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array: Option<Vec<f32>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpeakerMetadata {
    pub speaker_age: Option<i64>,
    pub speaker_gender: Option<String>,
}

/// Audio clip with its transcription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpeechText {
    pub id: String,
    pub path: String,
    pub audio: Audio,
    pub text: String,
    pub speaker_id: Option<String>,
    pub metadata: SpeakerMetadata,
}

pub fn features() -> Features {
    Features::new([
        ("id", Feature::string()),
        ("path", Feature::string()),
        ("audio", Feature::Audio),
        ("text", Feature::string()),
        ("speaker_id", Feature::optional(Feature::string())),
        (
            "metadata",
            Feature::structure([
                ("speaker_age", Feature::optional(Feature::int64())),
                ("speaker_gender", Feature::optional(Feature::string())),
            ]),
        ),
    ])
}

pub(crate) fn check(value: &Value, out: &mut Vec<Violation>) {
    if value.get("path").and_then(Value::as_str) == Some("") {
        out.push(Violation::new("/path", ViolationKind::Empty, "empty path"));
    }
    if let Some(age) = value.pointer("/metadata/speaker_age").and_then(Value::as_i64) {
        if age < 0 {
            out.push(Violation::new(
                "/metadata/speaker_age",
                ViolationKind::WrongType,
                format!("negative speaker age {}", age),
            ));
        }
    }
}
