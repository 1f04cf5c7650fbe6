/*! # seacrowd

Normalization of heterogeneous Southeast-Asian NLP, speech and vision datasets into canonical schemas.

- [schemas] and [registry]: canonical record shapes and the contracts records are checked against.
- [loader] and [datasets]: per-dataset plugins reading raw, already extracted files.
- [formats]: parsers for the raw formats loaders consume.
- [normalize]: drives loaders, validates and writes records.
- [io] and [processing]: JSON Lines files, checksums and statistics.

```no_run
use std::path::Path;

use seacrowd::datasets::DatasetRegistry;
use seacrowd::io::{split_path, JsonlWriter};
use seacrowd::normalize::{NormalizeOptions, Normalizer};
use seacrowd::registry::SchemaRegistry;

let registry = DatasetRegistry::new()?;
let (loader, config) = registry.find_config("burapha_th_digit_seacrowd_imtext")?;
let normalizer = Normalizer::new(SchemaRegistry::default(), NormalizeOptions::default());
let dst = Path::new("out");
let report = normalizer.normalize(loader, &config, Path::new("raw/burapha_th"), |split| {
    JsonlWriter::create(&split_path(dst, &config.name, split, false), false)
})?;
println!("{} records", report.accepted());
# Ok::<(), seacrowd::error::Error>(())
```
!*/
pub mod config;
pub mod datasets;
pub mod error;
pub mod formats;
pub mod io;
pub mod lang;
pub mod loader;
pub mod normalize;
pub mod processing;
pub mod registry;
pub mod schemas;
pub mod tasks;
pub mod validation;

/// Version of the crate, as declared in Cargo metadata.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
