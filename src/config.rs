/*! Dataset configs and cards

A [DatasetCard] holds the static description of a dataset (homepage, license, languages, tasks).
Cards are bundled as JSON next to their loader and checked when parsed.

A [DatasetConfig] selects one subset of a dataset in one schema.
Config names follow `<dataset>[_<subset>]_<schema>`, where schema is either `source` or `seacrowd_<short>`.
!*/
use std::fmt;
use std::str::FromStr;

use oxilangtag::LanguageTag;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Error;
use crate::lang;
use crate::schemas::{SchemaKind, CANONICAL_PREFIX};
use crate::tasks::{Licenses, Tasks};

/// Schema a config emits records in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ConfigSchema {
    /// The dataset's own record shape.
    Source,
    Canonical(SchemaKind),
}

impl ConfigSchema {
    pub fn canonical(&self) -> Option<SchemaKind> {
        match self {
            ConfigSchema::Source => None,
            ConfigSchema::Canonical(kind) => Some(*kind),
        }
    }
}

impl fmt::Display for ConfigSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSchema::Source => write!(f, "source"),
            ConfigSchema::Canonical(kind) => write!(f, "{}", kind),
        }
    }
}

impl FromStr for ConfigSchema {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "source" {
            return Ok(ConfigSchema::Source);
        }
        match s.strip_prefix(CANONICAL_PREFIX) {
            Some(short) => SchemaKind::from_short(short)
                .map(ConfigSchema::Canonical)
                .ok_or_else(|| Error::InvalidConfig(format!("unknown schema {:?}", s))),
            None => Err(Error::InvalidConfig(format!(
                "schema {:?} is neither source nor {}*",
                s, CANONICAL_PREFIX
            ))),
        }
    }
}

impl From<ConfigSchema> for String {
    fn from(s: ConfigSchema) -> Self {
        s.to_string()
    }
}

impl TryFrom<String> for ConfigSchema {
    type Error = Error;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub name: String,
    pub version: String,
    pub description: String,
    pub schema: ConfigSchema,
    pub subset_id: String,
}

impl DatasetConfig {
    /// Build the config of `dataset` (optionally restricted to `subset`) in `schema`.
    ///
    /// The subset id defaults to the dataset name.
    pub fn new(dataset: &str, subset: Option<&str>, schema: ConfigSchema, version: &str) -> Self {
        let subset_id = match subset {
            Some(subset) => format!("{}_{}", dataset, subset),
            None => dataset.to_string(),
        };
        let kind = match schema {
            ConfigSchema::Source => "source",
            ConfigSchema::Canonical(_) => "SEACrowd",
        };
        Self {
            name: format!("{}_{}", subset_id, schema),
            version: version.to_string(),
            description: format!("{} {} schema", subset_id, kind),
            schema,
            subset_id,
        }
    }

    /// The subset part of the subset id, if any.
    pub fn subset<'a>(&'a self, dataset: &str) -> Option<&'a str> {
        self.subset_id
            .strip_prefix(dataset)
            .and_then(|rest| rest.strip_prefix('_'))
    }
}

/// Static description of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetCard {
    pub name: String,
    pub description: String,
    pub homepage: String,
    pub license: Licenses,
    pub citation: String,
    pub languages: Vec<String>,
    pub tasks: Vec<Tasks>,
    #[serde(default)]
    pub local: bool,
    pub source_version: String,
    pub seacrowd_version: String,
}

impl DatasetCard {
    /// Parse a card from its JSON representation, checking homepage and languages.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let card: DatasetCard = serde_json::from_str(json)?;
        card.check()?;
        Ok(card)
    }

    fn check(&self) -> Result<(), Error> {
        if self.name.is_empty() {
            return Err(Error::InvalidConfig("dataset card has no name".to_string()));
        }
        Url::parse(&self.homepage)?;
        for language in &self.languages {
            lang::check(language)?;
        }
        if self.tasks.is_empty() {
            return Err(Error::InvalidConfig(format!("{} declares no task", self.name)));
        }
        Ok(())
    }

    /// Languages of the card as BCP47 tags.
    pub fn language_tags(&self) -> Result<Vec<LanguageTag<String>>, Error> {
        self.languages.iter().map(|l| lang::to_bcp47(l)).collect()
    }

    /// Canonical schemas reachable from the card's tasks, without duplicates.
    pub fn schemas(&self) -> Vec<SchemaKind> {
        let mut schemas: Vec<SchemaKind> = Vec::new();
        for task in &self.tasks {
            let kind = task.schema();
            if !schemas.contains(&kind) {
                schemas.push(kind);
            }
        }
        schemas
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARD: &str = r#"{
        "name": "toy",
        "description": "a toy dataset",
        "homepage": "https://example.org/toy",
        "license": "cc-by-4.0",
        "citation": "",
        "languages": ["ind", "sun"],
        "tasks": ["MACHINE_TRANSLATION", "SUMMARIZATION"],
        "source_version": "1.0.0",
        "seacrowd_version": "2024.06.20"
    }"#;

    #[test]
    fn config_schema_parse() {
        assert_eq!("source".parse::<ConfigSchema>().unwrap(), ConfigSchema::Source);
        assert_eq!(
            "seacrowd_imtext".parse::<ConfigSchema>().unwrap(),
            ConfigSchema::Canonical(SchemaKind::ImageText)
        );
        assert!("imtext".parse::<ConfigSchema>().is_err());
        assert!("seacrowd_nope".parse::<ConfigSchema>().is_err());
    }

    #[test]
    fn config_names() {
        let c = DatasetConfig::new(
            "burapha_th",
            Some("digit"),
            ConfigSchema::Canonical(SchemaKind::ImageText),
            "2024.06.20",
        );
        assert_eq!(c.name, "burapha_th_digit_seacrowd_imtext");
        assert_eq!(c.subset_id, "burapha_th_digit");
        assert_eq!(c.subset("burapha_th"), Some("digit"));

        let c = DatasetConfig::new("cub_bahasa", None, ConfigSchema::Source, "1.0.0");
        assert_eq!(c.name, "cub_bahasa_source");
        assert_eq!(c.subset("cub_bahasa"), None);
    }

    #[test]
    fn card_parse() {
        let card = DatasetCard::from_json(CARD).unwrap();
        assert_eq!(card.license, Licenses::CcBy4_0);
        assert!(!card.local);
        assert_eq!(card.schemas(), vec![SchemaKind::T2T]);
        let tags: Vec<String> = card
            .language_tags()
            .unwrap()
            .into_iter()
            .map(|t| t.as_str().to_string())
            .collect();
        assert_eq!(tags, vec!["id", "su"]);
    }

    #[test]
    fn card_rejects_unknown_language() {
        let json = CARD.replace("\"sun\"", "\"fra\"");
        assert!(matches!(DatasetCard::from_json(&json), Err(Error::UnknownLang(_))));
    }

    #[test]
    fn card_rejects_bad_homepage() {
        let json = CARD.replace("https://example.org/toy", "not a url");
        assert!(matches!(DatasetCard::from_json(&json), Err(Error::Url(_))));
    }
}
