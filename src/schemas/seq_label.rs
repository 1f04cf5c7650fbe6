//! Sequence labeling (token classification) schema.
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::formats::bio::{self, BioPolicy};
use crate::validation::{child, Violation, ViolationKind};

use super::features::{Feature, Features};
use super::label::ClassLabel;

/// Token sequence with one label per token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SeqLabel {
    pub id: String,
    pub tokens: Vec<String>,
    pub labels: Vec<String>,
}

pub fn features(labels: &ClassLabel) -> Features {
    Features::new([
        ("id", Feature::string()),
        ("tokens", Feature::sequence(Feature::string())),
        (
            "labels",
            Feature::sequence(Feature::ClassLabel(labels.clone())),
        ),
    ])
}

fn strings(value: &Value, field: &str) -> Vec<String> {
    value
        .get(field)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Cross-field checks on an already feature-checked record.
///
/// With [BioPolicy::Repair], stray `I-` labels are rewritten in place.
pub(crate) fn check(
    value: &mut Value,
    labels: &ClassLabel,
    policy: BioPolicy,
    out: &mut Vec<Violation>,
) {
    let tokens = strings(value, "tokens");
    let mut tags = strings(value, "labels");

    if tokens.is_empty() {
        out.push(Violation::new(
            "/tokens",
            ViolationKind::Empty,
            "token sequence is empty",
        ));
    }
    for (idx, token) in tokens.iter().enumerate() {
        if token.is_empty() {
            out.push(Violation::new(
                child("/tokens", idx),
                ViolationKind::Empty,
                "empty token",
            ));
        }
    }
    if tokens.len() != tags.len() {
        out.push(Violation::new(
            "/labels",
            ViolationKind::LengthMismatch,
            format!("{} tokens but {} labels", tokens.len(), tags.len()),
        ));
        return;
    }

    if policy == BioPolicy::Ignore || !bio::is_bio_label_set(labels.names().iter().map(String::as_str))
    {
        return;
    }

    match policy {
        BioPolicy::Reject => {
            for idx in bio::stray_inside(&tags) {
                out.push(Violation::new(
                    child("/labels", idx),
                    ViolationKind::IllFormedBio,
                    format!("{:?} does not continue a span", tags[idx]),
                ));
            }
        }
        BioPolicy::Repair => {
            let stray = bio::stray_inside(&tags);
            if stray.is_empty() {
                return;
            }
            bio::repair(&mut tags);
            for idx in stray {
                if !labels.contains(&tags[idx]) {
                    out.push(Violation::new(
                        child("/labels", idx),
                        ViolationKind::UnknownLabel,
                        format!("repaired label {:?} is not in the label set", tags[idx]),
                    ));
                }
            }
            value["labels"] = Value::Array(tags.into_iter().map(Value::String).collect());
        }
        BioPolicy::Ignore => (),
    }
}
