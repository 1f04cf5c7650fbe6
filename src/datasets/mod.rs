/*! Built-in dataset loaders

| dataset | subsets | schemas |
|---------|---------|---------|
| [burapha_th] | `character`, `digit`, `syllable` | `source`, `seacrowd_imtext` |
| [cub_bahasa] | | `source`, `seacrowd_imtext` |
| [mswc] | `cnh`, `ind`, `vie` | `source`, `seacrowd_sptext` |

[DatasetRegistry] holds loaders by dataset name and resolves config names back to their loader.
!*/
use std::collections::BTreeMap;

use crate::config::DatasetConfig;
use crate::error::Error;
use crate::loader::Loader;

pub mod burapha_th;
pub mod cub_bahasa;
pub mod mswc;

pub struct DatasetRegistry {
    loaders: BTreeMap<String, Box<dyn Loader>>,
}

impl DatasetRegistry {
    pub fn empty() -> Self {
        Self {
            loaders: BTreeMap::new(),
        }
    }

    /// Registry with every built-in loader.
    ///
    /// Fails if a bundled dataset card is invalid.
    pub fn new() -> Result<Self, Error> {
        let mut registry = Self::empty();
        registry.register(Box::new(burapha_th::BuraphaTh::new()?));
        registry.register(Box::new(cub_bahasa::CubBahasa::new()?));
        registry.register(Box::new(mswc::Mswc::new()?));
        Ok(registry)
    }

    /// Register a loader under its dataset name, replacing any previous one.
    pub fn register(&mut self, loader: Box<dyn Loader>) {
        self.loaders.insert(loader.name().to_string(), loader);
    }

    pub fn get(&self, dataset: &str) -> Option<&dyn Loader> {
        self.loaders.get(dataset).map(|l| l.as_ref())
    }

    /// Dataset names, sorted.
    pub fn list(&self) -> Vec<&str> {
        self.loaders.keys().map(String::as_str).collect()
    }

    /// Find the loader owning a config name.
    pub fn find_config(&self, config_name: &str) -> Result<(&dyn Loader, DatasetConfig), Error> {
        self.loaders
            .values()
            .filter(|l| config_name.starts_with(l.name()))
            .find_map(|l| l.config(config_name).ok().map(|c| (l.as_ref(), c)))
            .ok_or_else(|| Error::UnknownDataset(config_name.to_string()))
    }
}
