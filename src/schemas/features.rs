/*! Feature declarations

A [Features] tree describes the shape a record must have: which fields exist, what type each one holds,
and which label set closes a categorical field.

Checking a JSON value against a [Feature] yields a canonical value along with every [Violation] found.
Checking does not stop at the first problem, so that reports list everything wrong with a record.
!*/
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::validation::{child, Violation, ViolationKind};

use super::label::{ClassLabel, LabelError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dtype {
    String,
    Int64,
    Float64,
    Bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_type", rename_all = "snake_case")]
pub enum Feature {
    Value { dtype: Dtype },
    ClassLabel(ClassLabel),
    Sequence { feature: Box<Feature> },
    Struct { fields: Vec<Field> },
    Optional { feature: Box<Feature> },
    Audio,
    Image,
    /// Free-form JSON, used for dataset-specific metadata.
    Any,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub feature: Feature,
}

impl Feature {
    pub fn string() -> Self {
        Feature::Value {
            dtype: Dtype::String,
        }
    }

    pub fn int64() -> Self {
        Feature::Value {
            dtype: Dtype::Int64,
        }
    }

    pub fn float64() -> Self {
        Feature::Value {
            dtype: Dtype::Float64,
        }
    }

    pub fn bool() -> Self {
        Feature::Value { dtype: Dtype::Bool }
    }

    pub fn sequence(feature: Feature) -> Self {
        Feature::Sequence {
            feature: Box::new(feature),
        }
    }

    pub fn optional(feature: Feature) -> Self {
        Feature::Optional {
            feature: Box::new(feature),
        }
    }

    pub fn structure<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, Feature)>,
        S: Into<String>,
    {
        Feature::Struct {
            fields: fields
                .into_iter()
                .map(|(name, feature)| Field {
                    name: name.into(),
                    feature,
                })
                .collect(),
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, Feature::Optional { .. })
    }

    /// Check `value` against this feature, pushing violations into `out`.
    ///
    /// The returned value is the canonical form of `value`: labels become names, audio becomes an object.
    /// When violations are found the returned value is best-effort and should not be used.
    pub fn check(&self, value: &Value, path: &str, out: &mut Vec<Violation>) -> Value {
        match self {
            Feature::Value { dtype } => check_dtype(*dtype, value, path, out),
            Feature::ClassLabel(labels) => match labels.resolve(value) {
                Ok(name) => Value::String(name),
                Err(e) => {
                    let (kind, message) = match e {
                        LabelError::Unknown(name) => {
                            (ViolationKind::UnknownLabel, format!("unknown label {:?}", name))
                        }
                        LabelError::OutOfRange(idx) => (
                            ViolationKind::UnknownLabel,
                            format!(
                                "label index {} out of range (0..{})",
                                idx,
                                labels.num_classes()
                            ),
                        ),
                        LabelError::WrongType => (
                            ViolationKind::WrongType,
                            format!("expected label name or index, got {}", type_name(value)),
                        ),
                    };
                    out.push(Violation::new(path, kind, message));
                    value.clone()
                }
            },
            Feature::Sequence { feature } => match value {
                Value::Array(items) => Value::Array(
                    items
                        .iter()
                        .enumerate()
                        .map(|(idx, item)| feature.check(item, &child(path, idx), out))
                        .collect(),
                ),
                other => {
                    out.push(wrong_type(path, "array", other));
                    other.clone()
                }
            },
            Feature::Struct { fields } => check_struct(fields, value, path, out),
            Feature::Optional { feature } => match value {
                Value::Null => Value::Null,
                other => feature.check(other, path, out),
            },
            Feature::Audio => check_audio(value, path, out),
            Feature::Any => value.clone(),
            Feature::Image => match value {
                Value::String(s) if !s.is_empty() => value.clone(),
                Value::String(_) => {
                    out.push(Violation::new(path, ViolationKind::Empty, "empty image path"));
                    value.clone()
                }
                other => {
                    out.push(wrong_type(path, "image path", other));
                    other.clone()
                }
            },
        }
    }
}

/// Root of a record declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Features {
    fields: Vec<Field>,
}

impl Features {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, Feature)>,
        S: Into<String>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(name, feature)| Field {
                    name: name.into(),
                    feature,
                })
                .collect(),
        }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&Feature> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| &f.feature)
    }

    /// Check a whole record.
    pub fn check(&self, value: &Value) -> (Value, Vec<Violation>) {
        let mut violations = Vec::new();
        let canonical = check_struct(&self.fields, value, "", &mut violations);
        (canonical, violations)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn wrong_type(path: &str, expected: &str, got: &Value) -> Violation {
    Violation::new(
        path,
        ViolationKind::WrongType,
        format!("expected {}, got {}", expected, type_name(got)),
    )
}

fn check_dtype(dtype: Dtype, value: &Value, path: &str, out: &mut Vec<Violation>) -> Value {
    let ok = match (dtype, value) {
        (Dtype::String, Value::String(_)) => true,
        (Dtype::Bool, Value::Bool(_)) => true,
        (Dtype::Int64, Value::Number(n)) => n.is_i64(),
        (Dtype::Float64, Value::Number(_)) => true,
        _ => false,
    };
    if !ok {
        let expected = match dtype {
            Dtype::String => "string",
            Dtype::Int64 => "int64",
            Dtype::Float64 => "float64",
            Dtype::Bool => "bool",
        };
        out.push(wrong_type(path, expected, value));
        return value.clone();
    }

    match (dtype, value) {
        (Dtype::Float64, Value::Number(n)) => n
            .as_f64()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| value.clone()),
        _ => value.clone(),
    }
}

fn check_struct(fields: &[Field], value: &Value, path: &str, out: &mut Vec<Violation>) -> Value {
    let obj = match value {
        Value::Object(obj) => obj,
        other => {
            out.push(wrong_type(path, "object", other));
            return other.clone();
        }
    };

    let mut canonical = Map::new();
    for field in fields {
        let field_path = child(path, &field.name);
        match obj.get(&field.name) {
            Some(v) => {
                let v = field.feature.check(v, &field_path, out);
                canonical.insert(field.name.clone(), v);
            }
            None if field.feature.is_optional() => {
                canonical.insert(field.name.clone(), Value::Null);
            }
            None => out.push(Violation::new(
                field_path,
                ViolationKind::MissingField,
                format!("missing field {:?}", field.name),
            )),
        }
    }

    for key in obj.keys() {
        if !fields.iter().any(|f| &f.name == key) {
            out.push(Violation::new(
                child(path, key),
                ViolationKind::UnexpectedField,
                format!("unexpected field {:?}", key),
            ));
        }
    }

    Value::Object(canonical)
}

fn check_audio(value: &Value, path: &str, out: &mut Vec<Violation>) -> Value {
    match value {
        Value::String(s) if s.is_empty() => {
            out.push(Violation::new(path, ViolationKind::Empty, "empty audio path"));
            value.clone()
        }
        Value::String(s) => {
            let mut m = Map::new();
            m.insert("path".to_string(), Value::String(s.clone()));
            Value::Object(m)
        }
        Value::Object(obj) => {
            let before = out.len();
            match obj.get("path") {
                Some(Value::String(s)) if !s.is_empty() => (),
                Some(Value::String(_)) => out.push(Violation::new(
                    child(path, "path"),
                    ViolationKind::Empty,
                    "empty audio path",
                )),
                Some(other) => out.push(wrong_type(&child(path, "path"), "string", other)),
                None => out.push(Violation::new(
                    child(path, "path"),
                    ViolationKind::MissingField,
                    "missing field \"path\"",
                )),
            }
            if let Some(rate) = obj.get("sampling_rate") {
                let valid = rate.is_null() || rate.as_u64().map_or(false, |r| r > 0);
                if !valid {
                    out.push(wrong_type(
                        &child(path, "sampling_rate"),
                        "positive integer",
                        rate,
                    ));
                }
            }
            if let Some(array) = obj.get("array") {
                match array {
                    Value::Array(samples) if samples.iter().all(Value::is_number) => (),
                    Value::Null => (),
                    other => out.push(wrong_type(&child(path, "array"), "array of numbers", other)),
                }
            }
            for key in obj.keys() {
                if !matches!(key.as_str(), "path" | "sampling_rate" | "array") {
                    out.push(Violation::new(
                        child(path, key),
                        ViolationKind::UnexpectedField,
                        format!("unexpected field {:?}", key),
                    ));
                }
            }
            if out.len() == before {
                value.clone()
            } else {
                Value::Null
            }
        }
        other => {
            out.push(wrong_type(path, "audio path or object", other));
            other.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn kinds(v: &[Violation]) -> Vec<ViolationKind> {
        v.iter().map(|v| v.kind).collect()
    }

    #[test]
    fn struct_missing_and_unexpected() {
        let f = Features::new([("id", Feature::string()), ("text", Feature::string())]);
        let (_, v) = f.check(&json!({"id": "0", "txt": "hello"}));
        assert_eq!(
            kinds(&v),
            vec![ViolationKind::MissingField, ViolationKind::UnexpectedField]
        );
        assert_eq!(v[0].path, "/text");
        assert_eq!(v[1].path, "/txt");
    }

    #[test]
    fn optional_absent_becomes_null() {
        let f = Features::new([
            ("id", Feature::string()),
            ("texts", Feature::optional(Feature::string())),
        ]);
        let (canonical, v) = f.check(&json!({"id": "0"}));
        assert!(v.is_empty());
        assert_eq!(canonical, json!({"id": "0", "texts": null}));
    }

    #[test]
    fn labels_are_canonicalized_to_names() {
        let labels = ClassLabel::new(["O", "B-PER", "I-PER"]);
        let f = Features::new([(
            "labels",
            Feature::sequence(Feature::ClassLabel(labels)),
        )]);
        let (canonical, v) = f.check(&json!({"labels": [1, "I-PER", 0]}));
        assert!(v.is_empty());
        assert_eq!(canonical, json!({"labels": ["B-PER", "I-PER", "O"]}));

        let (_, v) = f.check(&json!({"labels": [1, "B-LOC", 7]}));
        assert_eq!(v.len(), 2);
        assert_eq!(v[0].path, "/labels/1");
        assert_eq!(v[1].path, "/labels/2");
    }

    #[test]
    fn int64_rejects_fractional() {
        let f = Features::new([("n", Feature::int64())]);
        assert!(f.check(&json!({"n": 3})).1.is_empty());
        assert_eq!(kinds(&f.check(&json!({"n": 3.5})).1), vec![ViolationKind::WrongType]);
        assert_eq!(kinds(&f.check(&json!({"n": "3"})).1), vec![ViolationKind::WrongType]);
    }

    #[test]
    fn float64_accepts_integers() {
        let f = Features::new([("score", Feature::float64())]);
        let (canonical, v) = f.check(&json!({"score": 4}));
        assert!(v.is_empty());
        assert_eq!(canonical["score"].as_f64(), Some(4.0));
    }

    #[test]
    fn audio_forms() {
        let f = Features::new([("audio", Feature::Audio)]);
        let (canonical, v) = f.check(&json!({"audio": "clips/a.opus"}));
        assert!(v.is_empty());
        assert_eq!(canonical, json!({"audio": {"path": "clips/a.opus"}}));

        let (_, v) = f.check(&json!({"audio": {"path": "a.wav", "sampling_rate": 16000}}));
        assert!(v.is_empty());

        let (_, v) = f.check(&json!({"audio": {"sampling_rate": -1, "bytes": []}}));
        assert_eq!(
            kinds(&v),
            vec![
                ViolationKind::MissingField,
                ViolationKind::WrongType,
                ViolationKind::UnexpectedField
            ]
        );
    }

    #[test]
    fn zero_sampling_rate() {
        let f = Features::new([("audio", Feature::Audio)]);
        let (_, v) = f.check(&json!({"audio": {"path": "a.wav", "sampling_rate": 0}}));
        assert_eq!(kinds(&v), vec![ViolationKind::WrongType]);
        assert_eq!(v[0].path, "/audio/sampling_rate");
        let (_, v) = f.check(&json!({"audio": {"path": "a.wav", "sampling_rate": null}}));
        assert!(v.is_empty());
    }

    #[test]
    fn nested_struct_paths() {
        let f = Features::new([(
            "metadata",
            Feature::structure([("speaker_age", Feature::optional(Feature::int64()))]),
        )]);
        let (_, v) = f.check(&json!({"metadata": {"speaker_age": "old"}}));
        assert_eq!(v[0].path, "/metadata/speaker_age");
    }

    #[test]
    fn features_serialize_with_type_tag() {
        let f = Feature::sequence(Feature::string());
        let s = serde_json::to_value(&f).unwrap();
        assert_eq!(
            s,
            json!({"_type": "sequence", "feature": {"_type": "value", "dtype": "string"}})
        );
        let labels = Feature::ClassLabel(ClassLabel::new(["a"]));
        let s = serde_json::to_value(&labels).unwrap();
        assert_eq!(s, json!({"_type": "class_label", "names": ["a"]}));
    }
}
