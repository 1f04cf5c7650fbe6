/*! Canonical schemas

Every dataset, whatever its raw format, is normalized into one of a fixed set of record shapes, one per task family.
[SchemaKind] names these shapes, builds their [Features] declaration and exposes a JSON Schema of the typed record.

| kind | config schema | record |
|------|---------------|--------|
| [SchemaKind::Text] | `seacrowd_text` | [Text] |
| [SchemaKind::TextMulti] | `seacrowd_text_multi` | [TextMulti] |
| [SchemaKind::SeqLabel] | `seacrowd_seq_label` | [SeqLabel] |
| [SchemaKind::Pairs] | `seacrowd_pairs` | [Pairs] |
| [SchemaKind::PairsScore] | `seacrowd_pairs_score` | [PairsScore] |
| [SchemaKind::T2T] | `seacrowd_t2t` | [T2T] |
| [SchemaKind::Qa] | `seacrowd_qa` | [Qa] |
| [SchemaKind::SpeechText] | `seacrowd_sptext` | [SpeechText] |
| [SchemaKind::ImageText] | `seacrowd_imtext` | [ImageText] |
| [SchemaKind::Ssp] | `seacrowd_ssp` | [Ssp] |
!*/
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

pub mod features;
pub mod image_text;
pub mod label;
pub mod pairs;
pub mod qa;
pub mod seq_label;
pub mod speech_text;
pub mod text;

pub use features::{Dtype, Feature, Features, Field};
pub use image_text::ImageText;
pub use label::ClassLabel;
pub use pairs::{Pairs, PairsScore, T2T};
pub use qa::Qa;
pub use seq_label::SeqLabel;
pub use speech_text::SpeechText;
pub use text::{Ssp, Text, TextMulti};

/// Prefix of every canonical config schema string.
pub const CANONICAL_PREFIX: &str = "seacrowd_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum SchemaKind {
    Text,
    TextMulti,
    SeqLabel,
    Pairs,
    PairsScore,
    T2T,
    Qa,
    SpeechText,
    ImageText,
    Ssp,
}

impl SchemaKind {
    pub fn all() -> &'static [SchemaKind] {
        &[
            SchemaKind::Text,
            SchemaKind::TextMulti,
            SchemaKind::SeqLabel,
            SchemaKind::Pairs,
            SchemaKind::PairsScore,
            SchemaKind::T2T,
            SchemaKind::Qa,
            SchemaKind::SpeechText,
            SchemaKind::ImageText,
            SchemaKind::Ssp,
        ]
    }

    /// Short name, as found after the `seacrowd_` prefix.
    pub fn short(&self) -> &'static str {
        match self {
            SchemaKind::Text => "text",
            SchemaKind::TextMulti => "text_multi",
            SchemaKind::SeqLabel => "seq_label",
            SchemaKind::Pairs => "pairs",
            SchemaKind::PairsScore => "pairs_score",
            SchemaKind::T2T => "t2t",
            SchemaKind::Qa => "qa",
            SchemaKind::SpeechText => "sptext",
            SchemaKind::ImageText => "imtext",
            SchemaKind::Ssp => "ssp",
        }
    }

    pub fn from_short(short: &str) -> Option<Self> {
        Self::all().iter().copied().find(|k| k.short() == short)
    }

    /// Schema string used in dataset configs (`seacrowd_imtext`).
    pub fn config_schema(&self) -> String {
        format!("{}{}", CANONICAL_PREFIX, self.short())
    }

    /// Whether the schema cannot be built without a label set.
    pub fn requires_labels(&self) -> bool {
        matches!(
            self,
            SchemaKind::Text | SchemaKind::TextMulti | SchemaKind::SeqLabel | SchemaKind::Pairs
        )
    }

    /// Build the features declaration of this schema.
    ///
    /// Fails when the schema needs a label set and none is given.
    pub fn features(&self, labels: Option<&ClassLabel>) -> Result<Features, Error> {
        let need = |labels: Option<&ClassLabel>| -> Result<ClassLabel, Error> {
            labels.cloned().ok_or_else(|| {
                Error::InvalidConfig(format!("schema {} requires a label set", self))
            })
        };
        let features = match self {
            SchemaKind::Text => text::text_features(&need(labels)?),
            SchemaKind::TextMulti => text::text_multi_features(&need(labels)?),
            SchemaKind::SeqLabel => seq_label::features(&need(labels)?),
            SchemaKind::Pairs => pairs::pairs_features(&need(labels)?),
            SchemaKind::PairsScore => pairs::pairs_score_features(),
            SchemaKind::T2T => pairs::t2t_features(),
            SchemaKind::Qa => qa::features(),
            SchemaKind::SpeechText => speech_text::features(),
            SchemaKind::ImageText => image_text::features(labels),
            SchemaKind::Ssp => text::ssp_features(),
        };
        Ok(features)
    }

    /// Pretty-printed JSON Schema of the typed record.
    pub fn json_schema(&self) -> Result<String, Error> {
        let schema = match self {
            SchemaKind::Text => schemars::schema_for!(Text),
            SchemaKind::TextMulti => schemars::schema_for!(TextMulti),
            SchemaKind::SeqLabel => schemars::schema_for!(SeqLabel),
            SchemaKind::Pairs => schemars::schema_for!(Pairs),
            SchemaKind::PairsScore => schemars::schema_for!(PairsScore),
            SchemaKind::T2T => schemars::schema_for!(T2T),
            SchemaKind::Qa => schemars::schema_for!(Qa),
            SchemaKind::SpeechText => schemars::schema_for!(SpeechText),
            SchemaKind::ImageText => schemars::schema_for!(ImageText),
            SchemaKind::Ssp => schemars::schema_for!(Ssp),
        };
        serde_json::to_string_pretty(&schema).map_err(Error::Serde)
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.config_schema())
    }
}

/// Accepts both the short name (`imtext`) and the config schema string (`seacrowd_imtext`).
impl FromStr for SchemaKind {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let short = s.strip_prefix(CANONICAL_PREFIX).unwrap_or(s);
        Self::from_short(short).ok_or_else(|| Error::InvalidConfig(format!("unknown schema {:?}", s)))
    }
}

impl From<SchemaKind> for String {
    fn from(k: SchemaKind) -> Self {
        k.config_schema()
    }
}

impl TryFrom<String> for SchemaKind {
    type Error = Error;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// A validated record of any canonical schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CanonicalRecord {
    Text(Text),
    TextMulti(TextMulti),
    SeqLabel(SeqLabel),
    Pairs(Pairs),
    PairsScore(PairsScore),
    T2T(T2T),
    Qa(Qa),
    SpeechText(SpeechText),
    ImageText(ImageText),
    Ssp(Ssp),
}

impl CanonicalRecord {
    /// Deserialize a canonical value into the typed record of `kind`.
    pub fn from_value(kind: SchemaKind, value: Value) -> Result<Self, Error> {
        let record = match kind {
            SchemaKind::Text => Self::Text(serde_json::from_value(value)?),
            SchemaKind::TextMulti => Self::TextMulti(serde_json::from_value(value)?),
            SchemaKind::SeqLabel => Self::SeqLabel(serde_json::from_value(value)?),
            SchemaKind::Pairs => Self::Pairs(serde_json::from_value(value)?),
            SchemaKind::PairsScore => Self::PairsScore(serde_json::from_value(value)?),
            SchemaKind::T2T => Self::T2T(serde_json::from_value(value)?),
            SchemaKind::Qa => Self::Qa(serde_json::from_value(value)?),
            SchemaKind::SpeechText => Self::SpeechText(serde_json::from_value(value)?),
            SchemaKind::ImageText => Self::ImageText(serde_json::from_value(value)?),
            SchemaKind::Ssp => Self::Ssp(serde_json::from_value(value)?),
        };
        Ok(record)
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Text(r) => &r.id,
            Self::TextMulti(r) => &r.id,
            Self::SeqLabel(r) => &r.id,
            Self::Pairs(r) => &r.id,
            Self::PairsScore(r) => &r.id,
            Self::T2T(r) => &r.id,
            Self::Qa(r) => &r.id,
            Self::SpeechText(r) => &r.id,
            Self::ImageText(r) => &r.id,
            Self::Ssp(r) => &r.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn short_names_roundtrip() {
        for kind in SchemaKind::all() {
            assert_eq!(SchemaKind::from_short(kind.short()), Some(*kind));
            assert_eq!(kind.config_schema().parse::<SchemaKind>().unwrap(), *kind);
        }
        assert_eq!("sptext".parse::<SchemaKind>().unwrap(), SchemaKind::SpeechText);
        assert!("seacrowd_kb".parse::<SchemaKind>().is_err());
    }

    #[test]
    fn labelled_schemas_need_labels() {
        assert!(SchemaKind::SeqLabel.features(None).is_err());
        assert!(SchemaKind::ImageText.features(None).is_ok());
        assert!(SchemaKind::T2T.features(None).is_ok());
    }

    #[test]
    fn json_schema_names_fields() {
        let schema = SchemaKind::SeqLabel.json_schema().unwrap();
        assert!(schema.contains("\"tokens\""));
        assert!(schema.contains("\"labels\""));
        let schema = SchemaKind::Qa.json_schema().unwrap();
        assert!(schema.contains("\"type\""));
    }

    #[test]
    fn record_from_value() {
        let r = CanonicalRecord::from_value(
            SchemaKind::T2T,
            json!({"id": "7", "text_1": "a", "text_2": "b", "text_1_name": "ind", "text_2_name": "sun"}),
        )
        .unwrap();
        assert_eq!(r.id(), "7");
        assert!(matches!(r, CanonicalRecord::T2T(_)));
        let back = serde_json::to_value(&r).unwrap();
        assert_eq!(back["text_2_name"], "sun");
    }

    #[test]
    fn kind_serializes_as_config_schema() {
        assert_eq!(serde_json::to_value(SchemaKind::ImageText).unwrap(), json!("seacrowd_imtext"));
        let k: SchemaKind = serde_json::from_value(json!("seacrowd_t2t")).unwrap();
        assert_eq!(k, SchemaKind::T2T);
    }
}
