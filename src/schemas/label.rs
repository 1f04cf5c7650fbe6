//! Closed label sets.
use std::collections::HashMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A label set closed over a dataset.
///
/// Labels can be referred to by name or by index. The canonical form of a label is its name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ClassLabelSer", into = "ClassLabelSer")]
pub struct ClassLabel {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

#[derive(Serialize, Deserialize)]
/// Serializable version of [ClassLabel].
struct ClassLabelSer {
    names: Vec<String>,
}

impl From<ClassLabelSer> for ClassLabel {
    fn from(c: ClassLabelSer) -> Self {
        ClassLabel::new(c.names)
    }
}

impl From<ClassLabel> for ClassLabelSer {
    fn from(c: ClassLabel) -> Self {
        Self { names: c.names }
    }
}

/// Why a value could not be resolved to a label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelError {
    Unknown(String),
    OutOfRange(i64),
    WrongType,
}

impl ClassLabel {
    /// Build a label set from names. Duplicates are dropped, first occurrence wins.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).unique().collect();
        let index = names
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), idx))
            .collect();
        Self { names, index }
    }

    /// Label set whose names are `"0"` to `"n-1"`.
    pub fn with_num_classes(n: usize) -> Self {
        Self::new((0..n).map(|i| i.to_string()))
    }

    /// Label set whose names are the zero-padded indices `0..n`, padded to `width` digits.
    pub fn zero_padded(n: usize, width: usize) -> Self {
        Self::new((0..n).map(|i| format!("{:0width$}", i, width = width)))
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn num_classes(&self) -> usize {
        self.names.len()
    }

    pub fn str2int(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn int2str(&self, idx: usize) -> Option<&str> {
        self.names.get(idx).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Resolve a JSON value (name or index) to a canonical label name.
    pub fn resolve(&self, value: &Value) -> Result<String, LabelError> {
        match value {
            Value::String(s) => {
                if self.contains(s) {
                    Ok(s.clone())
                } else {
                    Err(LabelError::Unknown(s.clone()))
                }
            }
            Value::Number(n) => match n.as_i64() {
                Some(i) if i >= 0 => self
                    .int2str(i as usize)
                    .map(str::to_string)
                    .ok_or(LabelError::OutOfRange(i)),
                Some(i) => Err(LabelError::OutOfRange(i)),
                None => Err(LabelError::WrongType),
            },
            _ => Err(LabelError::WrongType),
        }
    }
}
