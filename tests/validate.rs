use std::fs::File;
use std::io::{Cursor, Write};

use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::{json, Value};

use seacrowd::formats::conll::{Columns, ConllReader};
use seacrowd::formats::BioPolicy;
use seacrowd::io::{Discard, JsonlReader};
use seacrowd::loader::Example;
use seacrowd::normalize::{NormalizeOptions, Normalizer};
use seacrowd::registry::{CheckOptions, SchemaRegistry};
use seacrowd::schemas::{ClassLabel, SchemaKind};
use seacrowd::validation::ViolationKind;

fn normalizer(bio_policy: BioPolicy) -> Normalizer {
    Normalizer::new(
        SchemaRegistry::new(CheckOptions { bio_policy }),
        NormalizeOptions {
            bio_policy,
            ..Default::default()
        },
    )
}

fn ner_labels() -> ClassLabel {
    ClassLabel::new(["O", "B-PER", "I-PER", "B-LOC", "I-LOC"])
}

const CONLL: &str = "-DOCSTART- O\n\nJoko B-PER\nWidodo I-PER\ndari O\nSolo B-LOC\n\nIa O\nke O\nJakarta I-LOC\n";

#[test_log::test]
fn conll_into_seq_label() {
    let sentences = ConllReader::new(Cursor::new(CONLL), Columns::default(), "ner.conll");
    let examples = sentences.enumerate().map(|(idx, s)| {
        s.map(|s| Example::new(idx, json!({"id": idx, "tokens": s.tokens, "labels": s.tags})))
    });

    let normalizer = normalizer(BioPolicy::Repair);
    let contract = normalizer
        .registry()
        .contract(SchemaKind::SeqLabel, Some(ner_labels()))
        .unwrap();
    let mut out: Vec<Value> = Vec::new();
    let report = normalizer
        .validate_stream(&contract, "ner", examples, &mut out)
        .unwrap();

    assert_eq!(report.accepted, 2);
    assert_eq!(out[0]["id"], "0");
    assert_eq!(out[0]["labels"], json!(["B-PER", "I-PER", "O", "B-LOC"]));
    // stray I- tag after O
    assert_eq!(out[1]["labels"], json!(["O", "O", "B-LOC"]));
}

#[test_log::test]
fn stray_inside_tag_rejected() {
    let sentences = ConllReader::new(Cursor::new(CONLL), Columns::default(), "ner.conll");
    let examples = sentences.enumerate().map(|(idx, s)| {
        s.map(|s| Example::new(idx, json!({"id": idx, "tokens": s.tokens, "labels": s.tags})))
    });

    let normalizer = normalizer(BioPolicy::Reject);
    let contract = normalizer
        .registry()
        .contract(SchemaKind::SeqLabel, Some(ner_labels()))
        .unwrap();
    let report = normalizer
        .validate_stream(&contract, "ner", examples, &mut Discard::default())
        .unwrap();
    assert_eq!(report.accepted, 1);
    assert_eq!(report.rejected, 1);
    assert_eq!(report.failures[0].key, "1");
    assert_eq!(report.failures[0].violations[0].kind, ViolationKind::IllFormedBio);
}

#[test_log::test]
fn jsonl_gz_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pairs.jsonl.gz");
    let mut gz = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
    for line in [
        json!({"id": "1", "text_1": "saya lapar", "text_2": "aku lapar", "label": "entailment"}),
        json!({"id": "2", "text_1": "hujan", "text_2": "cerah", "label": 2}),
        json!({"id": "3", "text_1": "hujan", "text_2": "cerah", "label": "maybe"}),
        json!({"id": "1", "text_1": "lagi", "text_2": "lagi", "label": 0}),
    ] {
        writeln!(gz, "{}", line).unwrap();
    }
    writeln!(gz).unwrap();
    writeln!(gz, "{{not json").unwrap();
    gz.finish().unwrap();

    let normalizer = normalizer(BioPolicy::Ignore);
    let labels = ClassLabel::new(["entailment", "neutral", "contradiction"]);
    let contract = normalizer
        .registry()
        .contract(SchemaKind::Pairs, Some(labels))
        .unwrap();
    let mut out: Vec<Value> = Vec::new();
    let reader = JsonlReader::from_path(&path).unwrap();
    let report = normalizer
        .validate_stream(&contract, "pairs", reader, &mut out)
        .unwrap();

    assert_eq!(report.seen, 5);
    assert_eq!(report.accepted, 2);
    assert_eq!(out[1]["label"], "contradiction");

    let kinds: Vec<ViolationKind> = report
        .failures
        .iter()
        .map(|f| f.violations[0].kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            ViolationKind::UnknownLabel,
            ViolationKind::DuplicateId,
            ViolationKind::Malformed
        ]
    );
}

#[test]
fn labelled_schema_needs_labels() {
    let registry = SchemaRegistry::default();
    assert!(registry.contract(SchemaKind::SeqLabel, None).is_err());
    assert!(registry.contract(SchemaKind::Qa, None).is_ok());
}

#[test]
fn every_schema_has_a_json_schema() {
    for kind in SchemaKind::all() {
        let schema: Value = serde_json::from_str(&kind.json_schema().unwrap()).unwrap();
        assert!(schema.get("properties").is_some(), "{}", kind);
    }
}

#[test]
fn unknown_schema_name() {
    assert!("seacrowd_kb".parse::<SchemaKind>().is_err());
    assert!(matches!("seq_label".parse::<SchemaKind>(), Ok(SchemaKind::SeqLabel)));
    assert!(matches!("seacrowd_seq_label".parse::<SchemaKind>(), Ok(SchemaKind::SeqLabel)));
}
