/*! Burapha-TH: Thai handwritten characters, digits and syllables.

Extracted archives are expected under `<root>/<subset>/`:

```text
character/train/00-ก/<image>.png
character/test/00-ก/<image>.png
syllable/train-ori/000-กา/<image>.png
syllable/test-ori/000-กา/<image>.png
```

The label of an image is the prefix of its folder name, before the first `-`.
!*/
use std::path::{Path, PathBuf};

use serde_json::json;

use crate::config::{ConfigSchema, DatasetCard, DatasetConfig};
use crate::error::Error;
use crate::loader::{require, Example, ExampleIter, Loader, Split, SplitGenerator};
use crate::schemas::{ClassLabel, Feature, Features, SchemaKind};

pub const NAME: &str = "burapha_th";
const CARD: &str = include_str!("cards/burapha_th.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Subset {
    Character,
    Digit,
    Syllable,
}

impl Subset {
    const ALL: [Subset; 3] = [Subset::Character, Subset::Digit, Subset::Syllable];

    fn as_str(&self) -> &'static str {
        match self {
            Subset::Character => "character",
            Subset::Digit => "digit",
            Subset::Syllable => "syllable",
        }
    }

    fn from_config(config: &DatasetConfig) -> Result<Self, Error> {
        let subset = config.subset(NAME);
        Self::ALL
            .iter()
            .copied()
            .find(|s| Some(s.as_str()) == subset)
            .ok_or_else(|| Error::InvalidConfig(format!("{}: no subset in {}", NAME, config.name)))
    }

    /// Character and digit share the same 78 two-digit labels.
    fn labels(&self) -> ClassLabel {
        match self {
            Subset::Character | Subset::Digit => ClassLabel::zero_padded(78, 2),
            Subset::Syllable => ClassLabel::zero_padded(320, 3),
        }
    }

    fn split_dirs(&self) -> [(Split, &'static str); 2] {
        match self {
            Subset::Character | Subset::Digit => [(Split::Train, "train"), (Split::Test, "test")],
            Subset::Syllable => [(Split::Train, "train-ori"), (Split::Test, "test-ori")],
        }
    }
}

pub struct BuraphaTh {
    card: DatasetCard,
}

impl BuraphaTh {
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            card: DatasetCard::from_json(CARD)?,
        })
    }

    fn check_schema(&self, config: &DatasetConfig) -> Result<(), Error> {
        match config.schema {
            ConfigSchema::Source | ConfigSchema::Canonical(SchemaKind::ImageText) => Ok(()),
            other => Err(Error::InvalidConfig(format!("{} has no {} schema", NAME, other))),
        }
    }
}

/// Images of a split folder, sorted, along with their label.
fn list_images(dir: &Path) -> Result<Vec<(String, PathBuf)>, Error> {
    let dir_str = dir
        .to_str()
        .ok_or_else(|| Error::Custom(format!("non UTF-8 path {:?}", dir)))?;
    let pattern = format!("{}/*/*", glob::Pattern::escape(dir_str));
    let mut images = Vec::new();
    for path in glob::glob(&pattern)? {
        let path = path?;
        if !path.is_file() {
            continue;
        }
        let label = path
            .parent()
            .and_then(Path::file_name)
            .and_then(|n| n.to_str())
            .and_then(|n| n.split('-').next())
            .unwrap_or_default()
            .to_string();
        images.push((label, path));
    }
    Ok(images)
}

impl Loader for BuraphaTh {
    fn card(&self) -> &DatasetCard {
        &self.card
    }

    fn configs(&self) -> Vec<DatasetConfig> {
        let source = Subset::ALL.iter().map(|s| {
            DatasetConfig::new(NAME, Some(s.as_str()), ConfigSchema::Source, &self.card.source_version)
        });
        let imtext = Subset::ALL.iter().map(|s| {
            DatasetConfig::new(
                NAME,
                Some(s.as_str()),
                ConfigSchema::Canonical(SchemaKind::ImageText),
                &self.card.seacrowd_version,
            )
        });
        source.chain(imtext).collect()
    }

    fn default_config_name(&self) -> String {
        format!("{}_digit_source", NAME)
    }

    fn source_features(&self, config: &DatasetConfig) -> Result<Features, Error> {
        self.check_schema(config)?;
        let labels = Subset::from_config(config)?.labels();
        Ok(Features::new([
            ("id", Feature::string()),
            ("image_paths", Feature::string()),
            ("label", Feature::sequence(Feature::ClassLabel(labels))),
        ]))
    }

    fn label_names(&self, config: &DatasetConfig) -> Result<Option<ClassLabel>, Error> {
        self.check_schema(config)?;
        Ok(Some(Subset::from_config(config)?.labels()))
    }

    fn split_generators(&self, config: &DatasetConfig, root: &Path) -> Result<Vec<SplitGenerator>, Error> {
        self.check_schema(config)?;
        let subset = Subset::from_config(config)?;
        subset
            .split_dirs()
            .iter()
            .map(|(split, dir)| {
                let path = require(root.join(subset.as_str()).join(dir))?;
                Ok(SplitGenerator::new(*split).with_input("images", path))
            })
            .collect()
    }

    fn generate(&self, config: &DatasetConfig, split: &SplitGenerator) -> Result<ExampleIter, Error> {
        self.check_schema(config)?;
        let labels = Subset::from_config(config)?.labels();
        let images = list_images(split.input("images")?)?;
        let schema = config.schema;

        let iter = images.into_iter().enumerate().map(move |(counter, (label, path))| {
            let idx = labels.str2int(&label).ok_or_else(|| {
                Error::malformed(path.clone(), None, format!("unknown label folder {:?}", label))
            })?;
            let path = path.to_string_lossy().into_owned();
            let value = match schema {
                ConfigSchema::Source => json!({
                    "id": counter.to_string(),
                    "image_paths": path,
                    "label": [idx],
                }),
                ConfigSchema::Canonical(_) => json!({
                    "id": counter.to_string(),
                    "image_paths": [path],
                    "texts": null,
                    "metadata": {
                        "context": null,
                        "labels": [idx],
                    },
                }),
            };
            Ok(Example::new(counter, value))
        });
        Ok(Box::new(iter))
    }
}

#[cfg(test)]
mod tests {
    use std::fs::{create_dir_all, File};

    use super::*;

    fn fixture(root: &Path) {
        for (dir, files) in [
            ("digit/train/00-ศูนย์", vec!["a.png", "b.png"]),
            ("digit/train/01-หนึ่ง", vec!["c.png"]),
            ("digit/test/01-หนึ่ง", vec!["d.png"]),
            ("digit/test/99-oops", vec!["e.png"]),
        ] {
            let dir = root.join(dir);
            create_dir_all(&dir).unwrap();
            for f in files {
                File::create(dir.join(f)).unwrap();
            }
        }
    }

    #[test]
    fn configs() {
        let loader = BuraphaTh::new().unwrap();
        let names: Vec<String> = loader.configs().into_iter().map(|c| c.name).collect();
        assert_eq!(names.len(), 6);
        assert!(names.contains(&"burapha_th_syllable_seacrowd_imtext".to_string()));
        assert!(names.contains(&loader.default_config_name()));
    }

    #[test]
    fn labels_per_subset() {
        let loader = BuraphaTh::new().unwrap();
        let digit = loader.config("burapha_th_digit_source").unwrap();
        let syllable = loader.config("burapha_th_syllable_seacrowd_imtext").unwrap();
        assert_eq!(loader.label_names(&digit).unwrap().unwrap().num_classes(), 78);
        let labels = loader.label_names(&syllable).unwrap().unwrap();
        assert_eq!(labels.num_classes(), 320);
        assert_eq!(labels.int2str(319), Some("319"));
    }

    #[test]
    fn splits_read_their_own_folder() {
        let dir = tempfile::tempdir().unwrap();
        fixture(dir.path());
        let loader = BuraphaTh::new().unwrap();
        let config = loader.config("burapha_th_digit_seacrowd_imtext").unwrap();
        let gens = loader.split_generators(&config, dir.path()).unwrap();
        assert_eq!(gens.len(), 2);

        let train: Vec<Example> = loader
            .generate(&config, &gens[0])
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(train.len(), 3);
        assert_eq!(train[0].value["metadata"]["labels"], json!([0]));
        assert_eq!(train[2].value["metadata"]["labels"], json!([1]));
        assert_eq!(train[2].value["id"], "2");

        let test: Vec<Result<Example, Error>> = loader.generate(&config, &gens[1]).unwrap().collect();
        assert_eq!(test.len(), 2);
        assert!(test[0].is_ok());
        assert!(matches!(test[1], Err(Error::Malformed { .. })));
    }

    #[test]
    fn missing_split_folder() {
        let dir = tempfile::tempdir().unwrap();
        let loader = BuraphaTh::new().unwrap();
        let config = loader.config("burapha_th_character_source").unwrap();
        assert!(loader.split_generators(&config, dir.path()).is_err());
    }

    #[test]
    fn unsupported_schema() {
        let loader = BuraphaTh::new().unwrap();
        let config = DatasetConfig::new(
            NAME,
            Some("digit"),
            ConfigSchema::Canonical(SchemaKind::Text),
            "1.0.0",
        );
        assert!(matches!(loader.label_names(&config), Err(Error::InvalidConfig(_))));
        assert!(matches!(loader.source_features(&config), Err(Error::InvalidConfig(_))));
    }
}
