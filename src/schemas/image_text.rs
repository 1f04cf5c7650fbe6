//! Image-text schema (captioning, image classification with optional text).
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validation::{Violation, ViolationKind};

use super::features::{Feature, Features};
use super::label::ClassLabel;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ImageTextMetadata {
    pub context: Option<String>,
    pub labels: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ImageText {
    pub id: String,
    pub image_paths: Vec<String>,
    pub texts: Option<String>,
    pub metadata: ImageTextMetadata,
}

/// With a label set, `metadata.labels` is closed over it. Without, labels are free strings.
pub fn features(labels: Option<&ClassLabel>) -> Features {
    let label = match labels {
        Some(l) => Feature::ClassLabel(l.clone()),
        None => Feature::string(),
    };
    Features::new([
        ("id", Feature::string()),
        ("image_paths", Feature::sequence(Feature::Image)),
        ("texts", Feature::optional(Feature::string())),
        (
            "metadata",
            Feature::structure([
                ("context", Feature::optional(Feature::string())),
                ("labels", Feature::optional(Feature::sequence(label))),
            ]),
        ),
    ])
}

pub(crate) fn check(value: &Value, out: &mut Vec<Violation>) {
    let paths = value.get("image_paths").and_then(Value::as_array);
    if paths.map_or(true, Vec::is_empty) {
        out.push(Violation::new(
            "/image_paths",
            ViolationKind::Empty,
            "a record needs at least one image",
        ));
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn label_only_record() {
        let labels = ClassLabel::zero_padded(78, 2);
        let candidate = json!({
            "id": "0",
            "image_paths": ["character/train/05-a/1.png"],
            "texts": null,
            "metadata": {"context": null, "labels": [5]},
        });
        let (canonical, v) = features(Some(&labels)).check(&candidate);
        assert!(v.is_empty());
        assert_eq!(canonical["metadata"]["labels"], json!(["05"]));

        let mut out = Vec::new();
        check(&canonical, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn needs_an_image() {
        let mut out = Vec::new();
        check(
            &json!({"id": "0", "image_paths": [], "texts": null, "metadata": {"context": null, "labels": null}}),
            &mut out,
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].path, "/image_paths");
    }

    #[test]
    fn text_and_labels_are_optional() {
        let candidate = json!({
            "id": "0",
            "image_paths": ["a.jpg"],
            "texts": null,
            "metadata": {"context": null, "labels": null},
        });
        let (canonical, v) = features(None).check(&candidate);
        assert!(v.is_empty());
        let mut out = Vec::new();
        check(&canonical, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn free_labels_without_label_set() {
        let candidate = json!({
            "id": "0",
            "image_paths": ["a.jpg"],
            "texts": "burung",
            "metadata": {"context": "bird", "labels": ["001.Black_footed_Albatross"]},
        });
        let (_, v) = features(None).check(&candidate);
        assert!(v.is_empty());
    }
}
