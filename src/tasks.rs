//! Tasks and licenses.
//!
//! Each task maps to exactly one canonical schema. Several tasks can share a schema
//! (machine translation and summarization are both text-to-text).
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::schemas::SchemaKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tasks {
    SentimentAnalysis,
    TopicModeling,
    EmotionClassification,
    NamedEntityRecognition,
    PosTagging,
    TextualEntailment,
    SemanticSimilarity,
    MachineTranslation,
    Summarization,
    QuestionAnswering,
    SpeechRecognition,
    ImageCaptioning,
    SelfSupervisedPretraining,
}

impl Tasks {
    pub fn all() -> &'static [Tasks] {
        &[
            Tasks::SentimentAnalysis,
            Tasks::TopicModeling,
            Tasks::EmotionClassification,
            Tasks::NamedEntityRecognition,
            Tasks::PosTagging,
            Tasks::TextualEntailment,
            Tasks::SemanticSimilarity,
            Tasks::MachineTranslation,
            Tasks::Summarization,
            Tasks::QuestionAnswering,
            Tasks::SpeechRecognition,
            Tasks::ImageCaptioning,
            Tasks::SelfSupervisedPretraining,
        ]
    }

    /// Canonical schema records of this task are normalized into.
    pub fn schema(&self) -> SchemaKind {
        match self {
            Tasks::SentimentAnalysis | Tasks::TopicModeling => SchemaKind::Text,
            Tasks::EmotionClassification => SchemaKind::TextMulti,
            Tasks::NamedEntityRecognition | Tasks::PosTagging => SchemaKind::SeqLabel,
            Tasks::TextualEntailment => SchemaKind::Pairs,
            Tasks::SemanticSimilarity => SchemaKind::PairsScore,
            Tasks::MachineTranslation | Tasks::Summarization => SchemaKind::T2T,
            Tasks::QuestionAnswering => SchemaKind::Qa,
            Tasks::SpeechRecognition => SchemaKind::SpeechText,
            Tasks::ImageCaptioning => SchemaKind::ImageText,
            Tasks::SelfSupervisedPretraining => SchemaKind::Ssp,
        }
    }
}

impl fmt::Display for Tasks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Licenses {
    #[serde(rename = "unknown")]
    Unknown,
    #[serde(rename = "cc-by-4.0")]
    CcBy4_0,
    #[serde(rename = "cc-by-sa-4.0")]
    CcBySa4_0,
    #[serde(rename = "cc-by-nc-4.0")]
    CcByNc4_0,
    #[serde(rename = "cc-by-nc-sa-4.0")]
    CcByNcSa4_0,
    #[serde(rename = "cc0-1.0")]
    Cc0_1_0,
    #[serde(rename = "mit")]
    Mit,
    #[serde(rename = "apache-2.0")]
    Apache2_0,
    #[serde(rename = "others")]
    Others,
}

impl Licenses {
    pub fn as_str(&self) -> &'static str {
        match self {
            Licenses::Unknown => "unknown",
            Licenses::CcBy4_0 => "cc-by-4.0",
            Licenses::CcBySa4_0 => "cc-by-sa-4.0",
            Licenses::CcByNc4_0 => "cc-by-nc-4.0",
            Licenses::CcByNcSa4_0 => "cc-by-nc-sa-4.0",
            Licenses::Cc0_1_0 => "cc0-1.0",
            Licenses::Mit => "mit",
            Licenses::Apache2_0 => "apache-2.0",
            Licenses::Others => "others",
        }
    }
}

impl FromStr for Licenses {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.to_lowercase()))
            .map_err(|_| format!("unknown license {:?}", s))
    }
}
