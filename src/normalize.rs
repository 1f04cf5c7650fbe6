/*! Normalization

The [Normalizer] drives a [Loader] over the splits of a config, checks every candidate against the config's [Contract]
and hands accepted records, in their canonical form, to a [WriterTrait] sink.

Candidates are pulled from the loader in chunks, each chunk being validated in parallel on rayon's global pool.
Output order is the order in which the loader emitted candidates.

Failures are handled depending on [NormalizeOptions]:
- in strict mode, the first failure aborts with [Error::Validation],
- otherwise failures are collected in the [SplitReport], and the split only fails with [Error::RejectRatio]
  when the share of rejected candidates goes over `max_reject_ratio`.
!*/
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

use log::{debug, error, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{ConfigSchema, DatasetConfig};
use crate::error::Error;
use crate::formats::bio::BioPolicy;
use crate::io::WriterTrait;
use crate::loader::{Example, Loader, Split, SplitGenerator};
use crate::registry::{CheckOptions, Contract, SchemaRegistry};
use crate::validation::{Violation, ViolationKind};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizeOptions {
    pub strict: bool,
    /// Highest tolerated `rejected / seen` ratio of a split.
    pub max_reject_ratio: f64,
    pub bio_policy: BioPolicy,
    /// Number of failures kept in a report. Rejected records are counted regardless.
    pub max_reported_failures: usize,
    /// Number of candidates validated at once.
    pub chunk_size: usize,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            strict: false,
            max_reject_ratio: 1.0,
            bio_policy: BioPolicy::default(),
            max_reported_failures: 100,
            chunk_size: 1000,
        }
    }
}

/// A rejected candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordFailure {
    pub key: String,
    pub violations: Vec<Violation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitReport {
    pub split: String,
    pub seen: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub failures: Vec<RecordFailure>,
}

impl SplitReport {
    fn new(split: &str) -> Self {
        Self {
            split: split.to_string(),
            seen: 0,
            accepted: 0,
            rejected: 0,
            failures: Vec::new(),
        }
    }

    pub fn reject_ratio(&self) -> f64 {
        if self.seen == 0 {
            0.0
        } else {
            self.rejected as f64 / self.seen as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationReport {
    pub dataset: String,
    pub config: String,
    pub schema: ConfigSchema,
    pub splits: Vec<SplitReport>,
}

impl NormalizationReport {
    pub fn accepted(&self) -> usize {
        self.splits.iter().map(|s| s.accepted).sum()
    }

    pub fn rejected(&self) -> usize {
        self.splits.iter().map(|s| s.rejected).sum()
    }

    /// Write the report as pretty-printed JSON.
    pub fn write(&self, dst: &Path) -> Result<(), Error> {
        let f = File::create(dst)?;
        serde_json::to_writer_pretty(f, self)?;
        Ok(())
    }
}

pub struct Normalizer {
    registry: SchemaRegistry,
    options: NormalizeOptions,
}

impl Normalizer {
    /// The BIO policy of `options` takes precedence over the one of `registry`.
    pub fn new(registry: SchemaRegistry, options: NormalizeOptions) -> Self {
        let registry = SchemaRegistry::new(CheckOptions {
            bio_policy: options.bio_policy,
            ..registry.options()
        });
        Self { registry, options }
    }

    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Contract records of `config` are checked against.
    pub fn contract(&self, loader: &dyn Loader, config: &DatasetConfig) -> Result<Contract, Error> {
        match config.schema {
            ConfigSchema::Source => Ok(self.registry.source_contract(loader.source_features(config)?)),
            ConfigSchema::Canonical(kind) => self.registry.contract(kind, loader.label_names(config)?),
        }
    }

    /// Normalize a single split into `sink`. The sink is closed once the split is done.
    pub fn normalize_split<W>(
        &self,
        loader: &dyn Loader,
        config: &DatasetConfig,
        split: &SplitGenerator,
        sink: &mut W,
    ) -> Result<SplitReport, Error>
    where
        W: WriterTrait<Item = Value> + ?Sized,
    {
        let contract = self.contract(loader, config)?;
        let examples = loader.generate(config, split)?;
        let name = format!("{}/{}", config.name, split.split);
        info!("[{}] normalizing", name);
        let report = self.run(&contract, &name, examples, sink)?;
        info!(
            "[{}] {} records seen, {} accepted, {} rejected",
            name, report.seen, report.accepted, report.rejected
        );
        Ok(report)
    }

    /// Normalize every split of `config`, found under `root`.
    ///
    /// `sink_factory` gives the sink of each split.
    pub fn normalize<W, F>(
        &self,
        loader: &dyn Loader,
        config: &DatasetConfig,
        root: &Path,
        mut sink_factory: F,
    ) -> Result<NormalizationReport, Error>
    where
        W: WriterTrait<Item = Value>,
        F: FnMut(Split) -> Result<W, Error>,
    {
        let generators = loader.split_generators(config, root)?;
        let mut splits = Vec::with_capacity(generators.len());
        for gen in &generators {
            let mut sink = sink_factory(gen.split)?;
            let report = self.normalize_split(loader, config, gen, &mut sink).map_err(|e| {
                error!("[{}/{}] aborted: {}", config.name, gen.split, e);
                e
            })?;
            splits.push(report);
        }
        Ok(NormalizationReport {
            dataset: loader.name().to_string(),
            config: config.name.clone(),
            schema: config.schema,
            splits,
        })
    }

    /// Validate already extracted candidates (e.g. from a JSON Lines file) against `contract`.
    pub fn validate_stream<I, W>(
        &self,
        contract: &Contract,
        name: &str,
        examples: I,
        sink: &mut W,
    ) -> Result<SplitReport, Error>
    where
        I: Iterator<Item = Result<Example, Error>>,
        W: WriterTrait<Item = Value> + ?Sized,
    {
        self.run(contract, name, examples, sink)
    }

    fn run<I, W>(&self, contract: &Contract, name: &str, mut examples: I, sink: &mut W) -> Result<SplitReport, Error>
    where
        I: Iterator<Item = Result<Example, Error>>,
        W: WriterTrait<Item = Value> + ?Sized,
    {
        let mut report = SplitReport::new(name);
        let mut ids: HashSet<String> = HashSet::new();
        let chunk_size = self.options.chunk_size.max(1);

        loop {
            let chunk: Vec<Result<Example, Error>> = examples.by_ref().take(chunk_size).collect();
            if chunk.is_empty() {
                break;
            }
            let offset = report.seen;
            let results: Vec<(String, Result<Value, Vec<Violation>>)> = chunk
                .into_par_iter()
                .enumerate()
                .map(|(idx, example)| match example {
                    Ok(example) => {
                        let res = contract.validate(&example.value);
                        (example.key, res)
                    }
                    Err(e) => (
                        format!("#{}", offset + idx),
                        Err(vec![Violation::new("", ViolationKind::Malformed, e.to_string())]),
                    ),
                })
                .collect();

            let mut accepted = Vec::with_capacity(results.len());
            for (key, result) in results {
                report.seen += 1;
                let result = result.and_then(|value| {
                    // canonical records are identified by their id, source records by their key
                    let id = match (contract.kind(), value.get("id").and_then(Value::as_str)) {
                        (Some(_), Some(id)) => id.to_string(),
                        _ => key.clone(),
                    };
                    if ids.insert(id.clone()) {
                        Ok(value)
                    } else {
                        Err(vec![Violation::new(
                            "/id",
                            ViolationKind::DuplicateId,
                            format!("id {:?} already seen in split", id),
                        )])
                    }
                });

                match result {
                    Ok(value) => accepted.push(value),
                    Err(violations) => {
                        if self.options.strict {
                            sink.write(accepted)?;
                            sink.close()?;
                            error!("[{}] record {} rejected in strict mode", name, key);
                            return Err(Error::Validation { key, violations });
                        }
                        debug!("[{}] record {} rejected: {:?}", name, key, violations);
                        report.rejected += 1;
                        if report.failures.len() < self.options.max_reported_failures {
                            report.failures.push(RecordFailure { key, violations });
                        }
                    }
                }
            }
            report.accepted += accepted.len();
            sink.write(accepted)?;
        }
        sink.close()?;

        if report.rejected > 0 {
            warn!("[{}] {}/{} records rejected", name, report.rejected, report.seen);
        }
        if report.reject_ratio() > self.options.max_reject_ratio {
            error!(
                "[{}] reject ratio {:.3} is over {:.3}",
                name,
                report.reject_ratio(),
                self.options.max_reject_ratio
            );
            return Err(Error::RejectRatio {
                split: name.to_string(),
                rejected: report.rejected,
                seen: report.seen,
            });
        }
        Ok(report)
    }
}
