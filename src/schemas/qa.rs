//! Question answering schema.
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validation::{child, Violation, ViolationKind};

use super::features::{Feature, Features};

/// Question answering record.
///
/// `type` holds the QA flavour (`extractive`, `abstractive`, `multiple_choice`, ...).
/// For multiple choice questions `choices` is non-empty and every answer is one of the choices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Qa {
    pub id: String,
    pub question_id: String,
    pub document_id: String,
    pub question: String,
    #[serde(rename = "type")]
    pub qa_type: String,
    pub choices: Vec<String>,
    pub context: String,
    pub answer: Vec<String>,
    pub meta: Option<Value>,
}

pub fn features() -> Features {
    Features::new([
        ("id", Feature::string()),
        ("question_id", Feature::string()),
        ("document_id", Feature::string()),
        ("question", Feature::string()),
        ("type", Feature::string()),
        ("choices", Feature::sequence(Feature::string())),
        ("context", Feature::string()),
        ("answer", Feature::sequence(Feature::string())),
        ("meta", Feature::optional(Feature::Any)),
    ])
}

pub(crate) fn check(value: &Value, out: &mut Vec<Violation>) {
    let choices: Vec<&str> = value
        .get("choices")
        .and_then(Value::as_array)
        .map(|c| c.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    if choices.is_empty() {
        return;
    }

    let answers = value.get("answer").and_then(Value::as_array);
    for (idx, answer) in answers.into_iter().flatten().enumerate() {
        if let Some(answer) = answer.as_str() {
            if !choices.contains(&answer) {
                out.push(Violation::new(
                    child("/answer", idx),
                    ViolationKind::AnswerNotInChoices,
                    format!("answer {:?} is not one of the choices", answer),
                ));
            }
        }
    }
}
