/*! Schema registry

Builds [Contract]s: a [Features] declaration plus the cross-field invariants of a canonical schema.
A contract validates candidate records and returns their canonical form.

Source contracts (the dataset's own record shape) only check features.
!*/
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;
use crate::formats::bio::BioPolicy;
use crate::schemas::{
    image_text, pairs, qa, seq_label, speech_text, CanonicalRecord, ClassLabel, Features, SchemaKind,
};
use crate::tasks::Tasks;
use crate::validation::{Violation, ViolationKind};

/// Options that change how invariants are checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOptions {
    pub bio_policy: BioPolicy,
}

#[derive(Debug, Clone)]
pub struct Contract {
    kind: Option<SchemaKind>,
    features: Features,
    labels: Option<ClassLabel>,
    options: CheckOptions,
}

impl Contract {
    /// Canonical schema of this contract, [None] for source contracts.
    pub fn kind(&self) -> Option<SchemaKind> {
        self.kind
    }

    pub fn features(&self) -> &Features {
        &self.features
    }

    pub fn labels(&self) -> Option<&ClassLabel> {
        self.labels.as_ref()
    }

    /// Validate a candidate, returning its canonical form or every violation found.
    pub fn validate(&self, candidate: &Value) -> Result<Value, Vec<Violation>> {
        let kind = match self.kind {
            Some(kind) => kind,
            None => {
                let (canonical, violations) = self.features.check(candidate);
                return if violations.is_empty() {
                    Ok(canonical)
                } else {
                    Err(violations)
                };
            }
        };

        let candidate = coerce_id(candidate);
        let (mut canonical, mut violations) = self.features.check(&candidate);
        if !violations.is_empty() {
            return Err(violations);
        }

        match CanonicalRecord::from_value(kind, canonical.clone()) {
            Ok(record) if record.id().is_empty() => {
                violations.push(Violation::new("/id", ViolationKind::Empty, "empty id"))
            }
            Ok(_) => (),
            Err(e) => return Err(vec![Violation::new("", ViolationKind::Malformed, e.to_string())]),
        }

        match kind {
            SchemaKind::SeqLabel => {
                if let Some(labels) = &self.labels {
                    seq_label::check(&mut canonical, labels, self.options.bio_policy, &mut violations)
                }
            }
            SchemaKind::PairsScore => pairs::check_score(&canonical, &mut violations),
            SchemaKind::Qa => qa::check(&canonical, &mut violations),
            SchemaKind::SpeechText => speech_text::check(&canonical, &mut violations),
            SchemaKind::ImageText => image_text::check(&canonical, &mut violations),
            SchemaKind::Text
            | SchemaKind::TextMulti
            | SchemaKind::Pairs
            | SchemaKind::T2T
            | SchemaKind::Ssp => (),
        }

        if violations.is_empty() {
            Ok(canonical)
        } else {
            Err(violations)
        }
    }
}

/// Integer ids are turned into strings, other values are left for the features check to reject.
fn coerce_id(candidate: &Value) -> Value {
    let mut candidate = candidate.clone();
    if let Some(obj) = candidate.as_object_mut() {
        if let Some(id) = obj.get_mut("id") {
            if id.is_i64() || id.is_u64() {
                *id = Value::String(id.to_string());
            }
        }
    }
    candidate
}

/// Entry of [SchemaRegistry::describe].
#[derive(Debug, Clone, Serialize)]
pub struct SchemaEntry {
    pub schema: SchemaKind,
    pub requires_labels: bool,
    pub tasks: Vec<Tasks>,
}

#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    options: CheckOptions,
}

impl SchemaRegistry {
    pub fn new(options: CheckOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> CheckOptions {
        self.options
    }

    /// Contract of a canonical schema, closed over `labels` when the schema is labelled.
    pub fn contract(&self, kind: SchemaKind, labels: Option<ClassLabel>) -> Result<Contract, Error> {
        let features = kind.features(labels.as_ref())?;
        Ok(Contract {
            kind: Some(kind),
            features,
            labels,
            options: self.options,
        })
    }

    /// Contract for a dataset-specific source schema.
    pub fn source_contract(&self, features: Features) -> Contract {
        Contract {
            kind: None,
            features,
            labels: None,
            options: self.options,
        }
    }

    /// Every canonical schema along with the tasks that map to it.
    pub fn describe(&self) -> Vec<SchemaEntry> {
        SchemaKind::all()
            .iter()
            .map(|kind| SchemaEntry {
                schema: *kind,
                requires_labels: kind.requires_labels(),
                tasks: Tasks::all()
                    .iter()
                    .copied()
                    .filter(|t| t.schema() == *kind)
                    .collect(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::schemas::Feature;

    #[test]
    fn integer_ids_become_strings() {
        let registry = SchemaRegistry::default();
        let contract = registry.contract(SchemaKind::Ssp, None).unwrap();
        let canonical = contract.validate(&json!({"id": 12, "text": "halo"})).unwrap();
        assert_eq!(canonical["id"], json!("12"));
    }

    #[test]
    fn empty_id_rejected() {
        let registry = SchemaRegistry::default();
        let contract = registry.contract(SchemaKind::Ssp, None).unwrap();
        let violations = contract.validate(&json!({"id": "", "text": "halo"})).unwrap_err();
        assert_eq!(violations[0].kind, ViolationKind::Empty);
    }

    #[test]
    fn features_fail_before_invariants() {
        let registry = SchemaRegistry::default();
        let labels = ClassLabel::new(["O", "B-PER"]);
        let contract = registry.contract(SchemaKind::SeqLabel, Some(labels)).unwrap();
        let violations = contract
            .validate(&json!({"id": "0", "tokens": ["a", "b"], "labels": ["O", "B-ORG"]}))
            .unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::UnknownLabel);
    }

    #[test]
    fn bio_policy_is_applied() {
        let registry = SchemaRegistry::new(CheckOptions {
            bio_policy: BioPolicy::Repair,
        });
        let labels = ClassLabel::new(["O", "B-PER", "I-PER"]);
        let contract = registry.contract(SchemaKind::SeqLabel, Some(labels)).unwrap();
        let canonical = contract
            .validate(&json!({"id": 0, "tokens": ["Pak", "Harto"], "labels": [2, 2]}))
            .unwrap();
        assert_eq!(canonical["labels"], json!(["B-PER", "I-PER"]));
    }

    #[test]
    fn source_contract_keeps_integer_ids() {
        let registry = SchemaRegistry::default();
        let contract = registry.source_contract(Features::new([("image_id", Feature::int64())]));
        assert!(contract.kind().is_none());
        let canonical = contract.validate(&json!({"image_id": 3})).unwrap();
        assert_eq!(canonical["image_id"], json!(3));
    }

    #[test]
    fn describe_maps_tasks() {
        let entries = SchemaRegistry::default().describe();
        assert_eq!(entries.len(), SchemaKind::all().len());
        let t2t = entries
            .iter()
            .find(|e| e.schema == SchemaKind::T2T)
            .unwrap();
        assert!(t2t.tasks.contains(&Tasks::MachineTranslation));
        assert!(t2t.tasks.contains(&Tasks::Summarization));
    }

    /// A well-formed record of each schema, along with one of its required string fields.
    fn well_formed(kind: SchemaKind) -> (Value, &'static str) {
        match kind {
            SchemaKind::Text => (json!({"id": "0", "text": "bagus", "label": "pos"}), "text"),
            SchemaKind::TextMulti => (
                json!({"id": "0", "text": "bagus", "labels": ["pos", "neg"]}),
                "text",
            ),
            SchemaKind::SeqLabel => (
                json!({"id": "0", "tokens": ["Joko", "pulang"], "labels": ["pos", "neg"]}),
                "tokens",
            ),
            SchemaKind::Pairs => (
                json!({"id": "0", "text_1": "a", "text_2": "b", "label": 1}),
                "text_1",
            ),
            SchemaKind::PairsScore => (
                json!({"id": "0", "text_1": "a", "text_2": "b", "label": 0.5}),
                "text_2",
            ),
            SchemaKind::T2T => (
                json!({"id": "0", "text_1": "pagi", "text_2": "isuk", "text_1_name": "ind", "text_2_name": "jav"}),
                "text_1_name",
            ),
            SchemaKind::Qa => (
                json!({
                    "id": "0",
                    "question_id": "q0",
                    "document_id": "d0",
                    "question": "Ibu kota?",
                    "type": "extractive",
                    "choices": [],
                    "context": "Jakarta adalah ibu kota.",
                    "answer": ["Jakarta"],
                    "meta": null,
                }),
                "question",
            ),
            SchemaKind::SpeechText => (
                json!({
                    "id": "0",
                    "path": "clips/a.opus",
                    "audio": {"path": "clips/a.opus"},
                    "text": "halo",
                    "speaker_id": null,
                    "metadata": {"speaker_age": null, "speaker_gender": null},
                }),
                "text",
            ),
            SchemaKind::ImageText => (
                json!({
                    "id": "0",
                    "image_paths": ["a.jpg"],
                    "texts": null,
                    "metadata": {"context": null, "labels": ["pos"]},
                }),
                "image_paths",
            ),
            SchemaKind::Ssp => (json!({"id": "0", "text": "halo"}), "text"),
        }
    }

    #[test]
    fn every_schema_contract() {
        let registry = SchemaRegistry::default();
        for kind in SchemaKind::all() {
            let contract = registry
                .contract(*kind, Some(ClassLabel::new(["pos", "neg"])))
                .unwrap();
            let (record, field) = well_formed(*kind);
            assert!(contract.validate(&record).is_ok(), "{}: {:?}", kind, contract.validate(&record));

            let mut missing = record.clone();
            missing.as_object_mut().unwrap().remove(field);
            let violations = contract.validate(&missing).unwrap_err();
            assert_eq!(violations[0].kind, ViolationKind::MissingField, "{}", kind);
            assert_eq!(violations[0].path, format!("/{}", field));

            let mut wrong = record.clone();
            wrong[field] = json!({"value": 1});
            let violations = contract.validate(&wrong).unwrap_err();
            assert_eq!(violations[0].kind, ViolationKind::WrongType, "{}", kind);

            let mut unknown = record.clone();
            unknown["source"] = json!("web");
            let violations = contract.validate(&unknown).unwrap_err();
            assert_eq!(violations[0].kind, ViolationKind::UnexpectedField, "{}", kind);
            assert_eq!(violations[0].path, "/source");
        }
    }

    #[test]
    fn optional_content_is_accepted() {
        let registry = SchemaRegistry::default();
        let imtext = registry.contract(SchemaKind::ImageText, None).unwrap();
        assert!(imtext
            .validate(&json!({"id": "0", "image_paths": ["a.jpg"], "texts": null, "metadata": {"context": null, "labels": null}}))
            .is_ok());

        let t2t = registry.contract(SchemaKind::T2T, None).unwrap();
        assert!(t2t
            .validate(&json!({"id": "0", "text_1": "pagi", "text_2": "", "text_1_name": "ind", "text_2_name": "jav"}))
            .is_ok());
    }
}
