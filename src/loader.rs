/*! Loader plugins

A [Loader] knows one dataset: its configs, the shape of its source records, its label space and its raw layout.
Given the root of the extracted files, it describes each split as a [SplitGenerator] and turns it into a stream of candidate [Example]s.

Loaders never validate: candidates are checked against their contract by the [crate::normalize::Normalizer].
Raw records that cannot be read are yielded as errors so that the rest of the split goes on.
!*/
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{DatasetCard, DatasetConfig};
use crate::error::Error;
use crate::schemas::{ClassLabel, Features};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Train,
    Validation,
    Test,
}

impl Split {
    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Validation => "validation",
            Split::Test => "test",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Split {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "train" => Ok(Split::Train),
            "validation" | "dev" => Ok(Split::Validation),
            "test" => Ok(Split::Test),
            other => Err(Error::Custom(format!("unknown split {:?}", other))),
        }
    }
}

/// Everything a loader needs to read one split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitGenerator {
    pub split: Split,
    pub inputs: BTreeMap<String, PathBuf>,
}

impl SplitGenerator {
    pub fn new(split: Split) -> Self {
        Self {
            split,
            inputs: BTreeMap::new(),
        }
    }

    pub fn with_input(mut self, name: &str, path: impl Into<PathBuf>) -> Self {
        self.inputs.insert(name.to_string(), path.into());
        self
    }

    /// Get a named input, failing if the loader did not declare it.
    pub fn input(&self, name: &str) -> Result<&Path, Error> {
        self.inputs
            .get(name)
            .map(PathBuf::as_path)
            .ok_or_else(|| Error::Custom(format!("split {} has no input {:?}", self.split, name)))
    }
}

/// A candidate record, identified by a key unique within its split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    pub key: String,
    pub value: Value,
}

impl Example {
    pub fn new(key: impl ToString, value: Value) -> Self {
        Self {
            key: key.to_string(),
            value,
        }
    }
}

pub type ExampleIter = Box<dyn Iterator<Item = Result<Example, Error>> + Send>;

pub trait Loader: Send + Sync {
    fn card(&self) -> &DatasetCard;

    fn configs(&self) -> Vec<DatasetConfig>;

    fn default_config_name(&self) -> String;

    /// Features of the records emitted under a `source` config.
    fn source_features(&self, config: &DatasetConfig) -> Result<Features, Error>;

    /// Label set of the config, if its records are labelled.
    fn label_names(&self, config: &DatasetConfig) -> Result<Option<ClassLabel>, Error>;

    /// Describe the splits found under `root`.
    ///
    /// Fails if an input the loader needs is missing.
    fn split_generators(&self, config: &DatasetConfig, root: &Path)
        -> Result<Vec<SplitGenerator>, Error>;

    fn generate(&self, config: &DatasetConfig, split: &SplitGenerator) -> Result<ExampleIter, Error>;

    fn name(&self) -> &str {
        &self.card().name
    }

    /// Find one of the loader's configs by name.
    fn config(&self, name: &str) -> Result<DatasetConfig, Error> {
        self.configs()
            .into_iter()
            .find(|c| c.name == name)
            .ok_or_else(|| {
                Error::InvalidConfig(format!("{} has no config {:?}", self.name(), name))
            })
    }
}

/// Return `path` if it exists.
pub(crate) fn require(path: PathBuf) -> Result<PathBuf, Error> {
    if path.exists() {
        Ok(path)
    } else {
        Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("missing input {:?}", path),
        )))
    }
}
