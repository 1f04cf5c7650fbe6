//! Single-text schemas: classification, multi-label classification and self-supervised pretraining.
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::features::{Feature, Features};
use super::label::ClassLabel;

/// Text classification record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Text {
    pub id: String,
    pub text: String,
    pub label: String,
}

/// Multi-label text classification record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TextMulti {
    pub id: String,
    pub text: String,
    pub labels: Vec<String>,
}

/// Raw text for self-supervised pretraining.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Ssp {
    pub id: String,
    pub text: String,
}

pub fn text_features(labels: &ClassLabel) -> Features {
    Features::new([
        ("id", Feature::string()),
        ("text", Feature::string()),
        ("label", Feature::ClassLabel(labels.clone())),
    ])
}

pub fn text_multi_features(labels: &ClassLabel) -> Features {
    Features::new([
        ("id", Feature::string()),
        ("text", Feature::string()),
        (
            "labels",
            Feature::sequence(Feature::ClassLabel(labels.clone())),
        ),
    ])
}

pub fn ssp_features() -> Features {
    Features::new([("id", Feature::string()), ("text", Feature::string())])
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn text_roundtrip_through_features() {
        let labels = ClassLabel::new(["negative", "neutral", "positive"]);
        let f = text_features(&labels);
        let (canonical, v) = f.check(&json!({"id": "1", "text": "enak banget", "label": 2}));
        assert!(v.is_empty());
        let record: Text = serde_json::from_value(canonical).unwrap();
        assert_eq!(record.label, "positive");
    }

    #[test]
    fn text_multi_rejects_scalar_labels() {
        let labels = ClassLabel::new(["joy", "anger"]);
        let f = text_multi_features(&labels);
        let (_, v) = f.check(&json!({"id": "1", "text": "x", "labels": "joy"}));
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].path, "/labels");
    }
}
