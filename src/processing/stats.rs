//! Statistics of normalized splits.
//!
//! Counts label occurrences, BIO spans of sequence labelling records and words (unicode word boundaries, lowercased) over the records of a JSON Lines file,
//! and writes them as a frequency table.
use std::collections::HashMap;
use std::path::Path;

use itertools::Itertools;
use log::{info, warn};
use serde::Serialize;
use serde_json::Value;
use unicode_segmentation::UnicodeSegmentation;

use crate::error::Error;
use crate::formats::bio;
use crate::io::JsonlReader;

/// Fields holding free text.
const TEXT_FIELDS: [&str; 6] = ["text", "texts", "text_1", "text_2", "question", "context"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Label,
    Span,
    Word,
}

/// A serializable entry: kind, value, count and frequency within its kind.
#[derive(Debug, Serialize)]
pub struct StatEntry {
    kind: EntryKind,
    value: String,
    count: u64,
    freq: f64,
}

#[derive(Debug, Default)]
pub struct Stats {
    nb_records: u64,
    nb_tokens: u64,
    nb_words: u64,
    words: HashMap<String, u64>,
    labels: HashMap<String, u64>,
    spans: HashMap<String, u64>,
}

impl Stats {
    pub fn nb_records(&self) -> u64 {
        self.nb_records
    }

    pub fn nb_words(&self) -> u64 {
        self.nb_words
    }

    pub fn label_count(&self, label: &str) -> u64 {
        self.labels.get(label).copied().unwrap_or(0)
    }

    /// Number of BIO spans of type `kind` (`PER`, `LOC`...).
    pub fn span_count(&self, kind: &str) -> u64 {
        self.spans.get(kind).copied().unwrap_or(0)
    }

    /// Mean number of tokens of sequence labelling records.
    pub fn mean_tokens(&self) -> f64 {
        if self.nb_records == 0 {
            0.0
        } else {
            self.nb_tokens as f64 / self.nb_records as f64
        }
    }

    fn add_label(&mut self, label: &Value) {
        if let Some(label) = label.as_str() {
            *self.labels.entry(label.to_string()).or_insert(0) += 1;
        }
    }

    fn add_text(&mut self, text: &str) {
        for word in text.unicode_words() {
            *self.words.entry(word.to_lowercase()).or_insert(0) += 1;
            self.nb_words += 1;
        }
    }

    /// Add a record of any canonical schema.
    pub fn add(&mut self, record: &Value) {
        self.nb_records += 1;

        for field in TEXT_FIELDS {
            if let Some(text) = record.get(field).and_then(Value::as_str) {
                self.add_text(text);
            }
        }
        if let Some(tokens) = record.get("tokens").and_then(Value::as_array) {
            self.nb_tokens += tokens.len() as u64;
            for token in tokens.iter().filter_map(Value::as_str) {
                self.add_text(token);
            }
            if let Some(tags) = record.get("labels").and_then(Value::as_array) {
                let tags: Vec<&str> = tags.iter().filter_map(Value::as_str).collect();
                for span in bio::spans(&tags) {
                    *self.spans.entry(span.kind).or_insert(0) += 1;
                }
            }
        }

        if let Some(label) = record.get("label") {
            self.add_label(label);
        }
        let labels = record
            .get("labels")
            .or_else(|| record.pointer("/metadata/labels"))
            .and_then(Value::as_array);
        for label in labels.into_iter().flatten() {
            self.add_label(label);
        }
    }

    /// Labels, spans then words, each sorted by decreasing count.
    pub fn entries(&self) -> Vec<StatEntry> {
        let total_labels: u64 = self.labels.values().sum();
        let labels = self
            .labels
            .iter()
            .sorted_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)))
            .map(|(value, count)| StatEntry {
                kind: EntryKind::Label,
                value: value.clone(),
                count: *count,
                freq: *count as f64 / total_labels as f64,
            });
        let total_spans: u64 = self.spans.values().sum();
        let spans = self
            .spans
            .iter()
            .sorted_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)))
            .map(|(value, count)| StatEntry {
                kind: EntryKind::Span,
                value: value.clone(),
                count: *count,
                freq: *count as f64 / total_spans as f64,
            });
        let words = self
            .words
            .iter()
            .sorted_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)))
            .map(|(value, count)| StatEntry {
                kind: EntryKind::Word,
                value: value.clone(),
                count: *count,
                freq: *count as f64 / self.nb_words as f64,
            });
        labels.chain(spans).chain(words).collect()
    }
}

/// Compute statistics of a normalized JSON Lines file (optionally gzipped), outputting entries in a csv located at `dst`.
pub fn stats(src: &Path, dst: &Path) -> Result<Stats, Error> {
    let mut stats = Stats::default();
    for record in JsonlReader::from_path(src)? {
        match record {
            Ok(record) => stats.add(&record.value),
            Err(e) => warn!("skipping record: {}", e),
        }
    }

    let mut out = csv::WriterBuilder::new().from_path(dst)?;
    for entry in stats.entries() {
        out.serialize(entry)?;
    }
    out.flush()?;

    info!(
        "{:?}: {} records, {} words ({} distinct), {} distinct labels",
        src,
        stats.nb_records,
        stats.nb_words,
        stats.words.len(),
        stats.labels.len()
    );
    Ok(stats)
}
