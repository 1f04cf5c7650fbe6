/*! Contract violations

A [Violation] is one reason why a candidate record does not fit its contract.
Violations carry a path into the record (`/metadata/labels/0`) so that reports point at the offending value.
!*/
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    MissingField,
    UnexpectedField,
    WrongType,
    UnknownLabel,
    LengthMismatch,
    Empty,
    IllFormedBio,
    AnswerNotInChoices,
    NotFinite,
    DuplicateId,
    Malformed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub path: String,
    pub kind: ViolationKind,
    pub message: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        write!(f, "{} ({:?}): {}", path, self.kind, self.message)
    }
}

/// Join a parent path and a child segment.
pub(crate) fn child(path: &str, segment: impl fmt::Display) -> String {
    format!("{}/{}", path, segment)
}
