/*! Multilingual Spoken Words Corpus, Southeast Asian languages.

Each language comes as an extracted folder holding the split table and the keyword clips:

```text
<lang>/<lang>_splits.csv     SET,LINK,WORD,VALID,SPEAKER,GENDER
<lang>/clips/<LINK>
```

`SET` is one of `TRAIN`, `DEV` or `TEST`.

Configs either cover every language (`mswc_source`) or a single one (`mswc_ind_source`).
!*/
use std::path::{Path, PathBuf};

use log::warn;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::{ConfigSchema, DatasetCard, DatasetConfig};
use crate::error::Error;
use crate::formats::table::{TableOptions, TableReader};
use crate::loader::{Example, ExampleIter, Loader, Split, SplitGenerator};
use crate::schemas::{ClassLabel, Feature, Features, SchemaKind};

pub const NAME: &str = "mswc";
const CARD: &str = include_str!("cards/mswc.json");
const GENDERS: [&str; 3] = ["MALE", "FEMALE", "OTHER"];

#[derive(Debug, Deserialize)]
struct SplitRow {
    #[serde(rename = "SET")]
    set: String,
    #[serde(rename = "LINK")]
    link: String,
    #[serde(rename = "WORD")]
    word: String,
    #[serde(rename = "VALID")]
    valid: String,
    #[serde(rename = "SPEAKER")]
    speaker: String,
    #[serde(rename = "GENDER")]
    gender: String,
}

impl SplitRow {
    fn split(&self) -> Option<Split> {
        match self.set.to_uppercase().as_str() {
            "TRAIN" => Some(Split::Train),
            "DEV" => Some(Split::Validation),
            "TEST" => Some(Split::Test),
            _ => None,
        }
    }

    fn is_valid(&self) -> bool {
        matches!(self.valid.to_lowercase().as_str(), "true" | "1")
    }

    /// Gender as one of [GENDERS], or [None] when unknown (`NAN` or empty).
    fn gender(&self) -> Option<String> {
        let gender = self.gender.to_uppercase();
        match gender.as_str() {
            "" | "NAN" => None,
            _ => Some(gender),
        }
    }
}

pub struct Mswc {
    card: DatasetCard,
}

impl Mswc {
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            card: DatasetCard::from_json(CARD)?,
        })
    }

    fn check_schema(&self, config: &DatasetConfig) -> Result<(), Error> {
        match config.schema {
            ConfigSchema::Source | ConfigSchema::Canonical(SchemaKind::SpeechText) => Ok(()),
            other => Err(Error::InvalidConfig(format!("{} has no {} schema", NAME, other))),
        }
    }

    /// Languages covered by a config.
    fn languages(&self, config: &DatasetConfig) -> Result<Vec<String>, Error> {
        match config.subset(NAME) {
            None => Ok(self.card.languages.clone()),
            Some(lang) if self.card.languages.iter().any(|l| l == lang) => Ok(vec![lang.to_string()]),
            Some(lang) => Err(Error::InvalidConfig(format!("{} has no language {:?}", NAME, lang))),
        }
    }

    fn splits_csv(root: &Path, lang: &str) -> PathBuf {
        root.join(lang).join(format!("{}_splits.csv", lang))
    }
}

fn to_value(schema: ConfigSchema, key: usize, lang: &str, csv: &Path, row: SplitRow) -> Value {
    let clip = csv
        .parent()
        .map(|p| p.join("clips").join(&row.link))
        .unwrap_or_else(|| PathBuf::from(&row.link))
        .to_string_lossy()
        .into_owned();
    match schema {
        ConfigSchema::Source => json!({
            "file": row.link,
            "is_valid": row.is_valid(),
            "language": lang,
            "speaker_id": row.speaker,
            "gender": row.gender().unwrap_or_else(|| "OTHER".to_string()),
            "keyword": row.word,
            "audio": {"path": clip},
        }),
        ConfigSchema::Canonical(_) => {
            let speaker_id = if row.speaker.is_empty() {
                Value::Null
            } else {
                Value::String(row.speaker.clone())
            };
            json!({
                "id": key.to_string(),
                "path": clip,
                "audio": {"path": clip},
                "text": row.word,
                "speaker_id": speaker_id,
                "metadata": {
                    "speaker_age": null,
                    "speaker_gender": row.gender().map(|g| g.to_lowercase()),
                },
            })
        }
    }
}

impl Loader for Mswc {
    fn card(&self) -> &DatasetCard {
        &self.card
    }

    fn configs(&self) -> Vec<DatasetConfig> {
        let subsets = std::iter::once(None).chain(self.card.languages.iter().map(|l| Some(l.as_str())));
        let mut configs = Vec::new();
        for subset in subsets {
            configs.push(DatasetConfig::new(NAME, subset, ConfigSchema::Source, &self.card.source_version));
            configs.push(DatasetConfig::new(
                NAME,
                subset,
                ConfigSchema::Canonical(SchemaKind::SpeechText),
                &self.card.seacrowd_version,
            ));
        }
        configs
    }

    fn default_config_name(&self) -> String {
        format!("{}_source", NAME)
    }

    fn source_features(&self, config: &DatasetConfig) -> Result<Features, Error> {
        self.check_schema(config)?;
        Ok(Features::new([
            ("file", Feature::string()),
            ("is_valid", Feature::bool()),
            (
                "language",
                Feature::ClassLabel(ClassLabel::new(self.card.languages.iter().map(String::as_str))),
            ),
            ("speaker_id", Feature::string()),
            ("gender", Feature::ClassLabel(ClassLabel::new(GENDERS))),
            ("keyword", Feature::string()),
            ("audio", Feature::Audio),
        ]))
    }

    /// Keywords are open vocabulary.
    fn label_names(&self, config: &DatasetConfig) -> Result<Option<ClassLabel>, Error> {
        self.check_schema(config)?;
        Ok(None)
    }

    fn split_generators(&self, config: &DatasetConfig, root: &Path) -> Result<Vec<SplitGenerator>, Error> {
        self.check_schema(config)?;
        let languages = self.languages(config)?;
        let single = languages.len() == 1;

        let mut found = Vec::new();
        for lang in languages {
            let csv = Self::splits_csv(root, &lang);
            if csv.exists() {
                found.push((lang, csv));
            } else if single {
                return Err(Error::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("missing input {:?}", csv),
                )));
            } else {
                warn!("{}: no {:?}, skipping {}", NAME, csv, lang);
            }
        }
        if found.is_empty() {
            return Err(Error::Custom(format!("{}: no language found under {:?}", NAME, root)));
        }

        Ok([Split::Train, Split::Validation, Split::Test]
            .into_iter()
            .map(|split| {
                found
                    .iter()
                    .fold(SplitGenerator::new(split), |gen, (lang, csv)| gen.with_input(lang, csv))
            })
            .collect())
    }

    fn generate(&self, config: &DatasetConfig, split: &SplitGenerator) -> Result<ExampleIter, Error> {
        self.check_schema(config)?;
        let readers = split
            .inputs
            .iter()
            .map(|(lang, csv)| {
                let reader: TableReader<_, SplitRow> = TableReader::open(csv, TableOptions::default())?;
                Ok((lang.clone(), csv.clone(), reader))
            })
            .collect::<Result<Vec<_>, Error>>()?;

        let wanted = split.split;
        let schema = config.schema;
        let rows = readers.into_iter().flat_map(move |(lang, csv, reader)| {
            reader.filter_map(move |row| match row {
                Err(e) => Some(Err(e)),
                Ok(row) => match row.split() {
                    Some(s) if s == wanted => Some(Ok((lang.clone(), csv.clone(), row))),
                    Some(_) => None,
                    // reported once, in the train split
                    None if wanted == Split::Train => Some(Err(Error::malformed(
                        csv.clone(),
                        None,
                        format!("unknown SET {:?} for {}", row.set, row.link),
                    ))),
                    None => None,
                },
            })
        });

        let iter = rows.enumerate().map(move |(key, row)| {
            let (lang, csv, row) = row?;
            Ok(Example::new(key, to_value(schema, key, &lang, &csv, row)))
        });
        Ok(Box::new(iter))
    }
}
