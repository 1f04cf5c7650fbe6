//! Two-text schemas: entailment-style pairs, scored pairs and text-to-text (translation, summarization).
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validation::{Violation, ViolationKind};

use super::features::{Feature, Features};
use super::label::ClassLabel;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Pairs {
    pub id: String,
    pub text_1: String,
    pub text_2: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PairsScore {
    pub id: String,
    pub text_1: String,
    pub text_2: String,
    pub label: f64,
}

/// Text-to-text record.
///
/// `text_1_name` and `text_2_name` name the sides, usually with a language code (`ind`, `jav`)
/// or a role (`document`, `summary`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct T2T {
    pub id: String,
    pub text_1: String,
    pub text_2: String,
    pub text_1_name: String,
    pub text_2_name: String,
}

pub fn pairs_features(labels: &ClassLabel) -> Features {
    Features::new([
        ("id", Feature::string()),
        ("text_1", Feature::string()),
        ("text_2", Feature::string()),
        ("label", Feature::ClassLabel(labels.clone())),
    ])
}

pub fn pairs_score_features() -> Features {
    Features::new([
        ("id", Feature::string()),
        ("text_1", Feature::string()),
        ("text_2", Feature::string()),
        ("label", Feature::float64()),
    ])
}

pub fn t2t_features() -> Features {
    Features::new([
        ("id", Feature::string()),
        ("text_1", Feature::string()),
        ("text_2", Feature::string()),
        ("text_1_name", Feature::string()),
        ("text_2_name", Feature::string()),
    ])
}

/// Scores have to be finite numbers.
pub(crate) fn check_score(value: &Value, out: &mut Vec<Violation>) {
    if let Some(score) = value.get("label").and_then(Value::as_f64) {
        if !score.is_finite() {
            out.push(Violation::new(
                "/label",
                ViolationKind::NotFinite,
                format!("score {} is not finite", score),
            ));
        }
    }
}
