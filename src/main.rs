//! # seacrowd
//!
//! Normalizes Southeast-Asian NLP, speech and vision datasets into a fixed set of canonical schemas.
//!
//! ## Getting started
//!
//! ```sh
//! seacrowd 0.1.0
//! Southeast-Asian dataset schema normalization.
//!
//! USAGE:
//!     seacrowd <SUBCOMMAND>
//!
//! SUBCOMMANDS:
//!     datasets     List datasets and their configs
//!     help         Prints this message or the help of the given subcommand(s)
//!     info         Print the card and features of a config
//!     normalize    Normalize a dataset config
//!     package      Compute checksums of normalized configs
//!     schemas      List canonical schemas, or print the JSON Schema of one
//!     stats        Label and word statistics of a normalized split
//!     validate     Validate JSON Lines records against a canonical schema
//! ```
//!
//! Logging is controlled with `RUST_LOG` (e.g. `RUST_LOG=seacrowd=info`).
use serde_json::json;
use structopt::StructOpt;

use seacrowd::datasets::DatasetRegistry;
use seacrowd::error::Error;
use seacrowd::io::{self, Discard, JsonlReader, JsonlWriter};
use seacrowd::normalize::{NormalizeOptions, Normalizer};
use seacrowd::processing::{package, stats};
use seacrowd::registry::{CheckOptions, SchemaRegistry};
use seacrowd::schemas::{ClassLabel, SchemaKind};

#[macro_use]
extern crate log;

mod cli;

fn schemas(s: cli::Schemas) -> Result<(), Error> {
    match s.show {
        Some(schema) => {
            let kind: SchemaKind = schema.parse()?;
            println!("{}", kind.json_schema()?);
        }
        None => {
            for entry in SchemaRegistry::default().describe() {
                let tasks: Vec<String> = entry.tasks.iter().map(ToString::to_string).collect();
                println!(
                    "{}\tlabels: {}\t{}",
                    entry.schema,
                    if entry.requires_labels { "required" } else { "optional" },
                    tasks.join(", ")
                );
            }
        }
    }
    Ok(())
}

fn datasets(registry: &DatasetRegistry) {
    for name in registry.list() {
        if let Some(loader) = registry.get(name) {
            println!("{} ({})", name, loader.card().license.as_str());
            for config in loader.configs() {
                println!("\t{}", config.name);
            }
        }
    }
}

fn info(registry: &DatasetRegistry, i: cli::Info) -> Result<(), Error> {
    let (loader, config) = registry.find_config(&i.config)?;
    let contract = Normalizer::new(SchemaRegistry::default(), NormalizeOptions::default())
        .contract(loader, &config)?;
    let info = json!({
        "card": loader.card(),
        "language_tags": loader.card().language_tags()?,
        "config": config,
        "features": contract.features(),
    });
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}

fn normalize(registry: &DatasetRegistry, n: cli::Normalize) -> Result<(), Error> {
    let (loader, config) = registry.find_config(&n.config)?;
    let normalizer = Normalizer::new(SchemaRegistry::default(), NormalizeOptions::from(&n));

    let report = normalizer.normalize(loader, &config, &n.src, |split| {
        JsonlWriter::create(&io::split_path(&n.dst, &config.name, split, n.compress), n.compress)
    })?;

    let report_path = n.dst.join(&config.name).join(io::REPORT_FILE);
    report.write(&report_path)?;
    info!(
        "{}: {} records accepted, {} rejected. Report written to {:?}",
        config.name,
        report.accepted(),
        report.rejected(),
        report_path
    );
    Ok(())
}

fn validate(v: cli::Validate) -> Result<(), Error> {
    let kind: SchemaKind = v.schema.parse()?;
    let labels = v
        .labels
        .as_ref()
        .map(|l| ClassLabel::new(l.split(',').map(str::trim).filter(|l| !l.is_empty())));
    let registry = SchemaRegistry::new(CheckOptions { bio_policy: v.bio });
    let contract = registry.contract(kind, labels)?;
    let normalizer = Normalizer::new(
        registry,
        NormalizeOptions {
            bio_policy: v.bio,
            ..Default::default()
        },
    );

    let mut rejected = 0;
    for file in &v.files {
        let reader = JsonlReader::from_path(file)?;
        let mut sink = Discard::default();
        let name = file.to_string_lossy();
        let report = normalizer.validate_stream(&contract, &name, reader, &mut sink)?;
        rejected += report.rejected;
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    if rejected > 0 {
        Err(Error::Custom(format!("{} records failed validation", rejected)))
    } else {
        Ok(())
    }
}

fn main() -> Result<(), Error> {
    env_logger::init();

    let opt = cli::Seacrowd::from_args();
    debug!("cli args\n{:#?}", opt);

    match opt {
        cli::Seacrowd::Schemas(s) => schemas(s)?,
        cli::Seacrowd::Datasets(_) => datasets(&DatasetRegistry::new()?),
        cli::Seacrowd::Info(i) => info(&DatasetRegistry::new()?, i)?,
        cli::Seacrowd::Normalize(n) => normalize(&DatasetRegistry::new()?, n)?,
        cli::Seacrowd::Validate(v) => validate(v)?,
        cli::Seacrowd::Stats(s) => {
            stats::stats(&s.src, &s.dst)?;
        }
        cli::Seacrowd::Package(p) => {
            for checksum in package::package(&p.dst)? {
                info!("wrote {:?}", checksum);
            }
        }
    };
    Ok(())
}
