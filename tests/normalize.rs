use std::fs::{create_dir_all, write, File};
use std::path::Path;

use serde_json::Value;

use seacrowd::datasets::DatasetRegistry;
use seacrowd::error::Error;
use seacrowd::io::{split_path, JsonlReader, JsonlWriter, REPORT_FILE};
use seacrowd::loader::Split;
use seacrowd::normalize::{NormalizeOptions, Normalizer};
use seacrowd::processing::{package, stats};
use seacrowd::registry::SchemaRegistry;

fn burapha_fixture(root: &Path) {
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

fn mswc_fixture(root: &Path) {
    let dir = root.join("ind");
    create_dir_all(dir.join("clips")).unwrap();
    write(
        dir.join("ind_splits.csv"),
        "SET,LINK,WORD,VALID,SPEAKER,GENDER\n\
         TRAIN,halo/common_voice_id_1.opus,halo,True,abc,FEMALE\n\
         TRAIN,makan/common_voice_id_3.opus,makan,False,,MALE\n\
         DEV,apa/common_voice_id_2.opus,apa,True,def,NAN\n\
         TEST,minum/common_voice_id_4.opus,minum,True,ghi,OTHER\n",
    )
    .unwrap();
}

fn read_split(path: &Path) -> Vec<Value> {
    JsonlReader::from_path(path)
        .unwrap()
        .map(|e| e.unwrap().value)
        .collect()
}

fn run(
    config_name: &str,
    src: &Path,
    dst: &Path,
    options: NormalizeOptions,
    compress: bool,
) -> Result<seacrowd::normalize::NormalizationReport, Error> {
    let registry = DatasetRegistry::new()?;
    let (loader, config) = registry.find_config(config_name)?;
    let normalizer = Normalizer::new(SchemaRegistry::default(), options);
    let report = normalizer.normalize(loader, &config, src, |split| {
        JsonlWriter::create(&split_path(dst, &config.name, split, compress), compress)
    })?;
    report.write(&dst.join(&config.name).join(REPORT_FILE))?;
    Ok(report)
}

#[test_log::test]
fn burapha_imtext() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    burapha_fixture(src.path());

    let config = "burapha_th_digit_seacrowd_imtext";
    let report = run(config, src.path(), dst.path(), NormalizeOptions::default(), false).unwrap();
    assert_eq!(report.splits.len(), 2);
    assert_eq!(report.accepted(), 4);
    // unknown label folder
    assert_eq!(report.rejected(), 1);
    assert_eq!(report.splits[1].failures[0].key, "#1");

    let train = read_split(&split_path(dst.path(), config, Split::Train, false));
    assert_eq!(train.len(), 3);
    assert_eq!(train[0]["id"], "0");
    assert_eq!(train[0]["metadata"]["labels"][0], "00");
    assert_eq!(train[2]["metadata"]["labels"][0], "01");
    assert!(train[2]["image_paths"][0].as_str().unwrap().ends_with("c.png"));

    let written: Value =
        serde_json::from_reader(File::open(dst.path().join(config).join(REPORT_FILE)).unwrap()).unwrap();
    assert_eq!(written["schema"], "seacrowd_imtext");
    assert_eq!(written["splits"][1]["rejected"], 1);
}

#[test_log::test]
fn burapha_source_keeps_label_names() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    burapha_fixture(src.path());

    let config = "burapha_th_digit_source";
    run(config, src.path(), dst.path(), NormalizeOptions::default(), false).unwrap();
    let test = read_split(&split_path(dst.path(), config, Split::Test, false));
    assert_eq!(test.len(), 1);
    assert_eq!(test[0]["label"][0], "01");
}

#[test_log::test]
fn strict_mode_aborts() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    burapha_fixture(src.path());

    let options = NormalizeOptions {
        strict: true,
        ..Default::default()
    };
    let config = "burapha_th_digit_seacrowd_imtext";
    match run(config, src.path(), dst.path(), options, false) {
        Err(Error::Validation { key, .. }) => assert_eq!(key, "#1"),
        other => panic!("expected a validation error, got {:?}", other.map(|r| r.rejected())),
    }

    // splits done before the failure stay written
    let train = read_split(&split_path(dst.path(), config, Split::Train, false));
    assert_eq!(train.len(), 3);
    let test = read_split(&split_path(dst.path(), config, Split::Test, false));
    assert_eq!(test.len(), 1);
}

#[test_log::test]
fn reject_ratio_threshold() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    burapha_fixture(src.path());

    let options = NormalizeOptions {
        max_reject_ratio: 0.25,
        ..Default::default()
    };
    let result = run("burapha_th_digit_seacrowd_imtext", src.path(), dst.path(), options, false);
    assert!(matches!(
        result,
        Err(Error::RejectRatio {
            rejected: 1,
            seen: 2,
            ..
        })
    ));
}

#[test_log::test]
fn missing_split_folder() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    burapha_fixture(src.path());

    let result = run(
        "burapha_th_character_seacrowd_imtext",
        src.path(),
        dst.path(),
        NormalizeOptions::default(),
        false,
    );
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test_log::test]
fn mswc_package_and_stats() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    mswc_fixture(src.path());

    // cnh and vie are missing and get skipped
    let config = "mswc_seacrowd_sptext";
    let report = run(config, src.path(), dst.path(), NormalizeOptions::default(), true).unwrap();
    let seen: Vec<usize> = report.splits.iter().map(|s| s.seen).collect();
    assert_eq!(seen, vec![2, 1, 1]);
    assert_eq!(report.rejected(), 0);

    let train_path = split_path(dst.path(), config, Split::Train, true);
    assert!(train_path.to_string_lossy().ends_with("train.jsonl.gz"));
    let train = read_split(&train_path);
    assert_eq!(train[0]["text"], "halo");
    assert_eq!(train[0]["metadata"]["speaker_gender"], "female");
    assert_eq!(train[1]["speaker_id"], Value::Null);

    let validation = read_split(&split_path(dst.path(), config, Split::Validation, true));
    assert_eq!(validation[0]["metadata"]["speaker_gender"], Value::Null);

    let checksums = package::package(dst.path()).unwrap();
    assert_eq!(checksums.len(), 1);
    let content = std::fs::read_to_string(&checksums[0]).unwrap();
    let names: Vec<&str> = content
        .lines()
        .filter_map(|l| l.split_whitespace().nth(1))
        .collect();
    assert_eq!(
        names,
        vec![REPORT_FILE, "test.jsonl.gz", "train.jsonl.gz", "validation.jsonl.gz"]
    );

    let csv = dst.path().join("train_stats.csv");
    let s = stats::stats(&train_path, &csv).unwrap();
    assert_eq!(s.nb_records(), 2);
    assert_eq!(s.nb_words(), 2);
    let table = std::fs::read_to_string(&csv).unwrap();
    assert!(table.contains("word,halo,1"));
}

#[test_log::test]
fn unknown_config() {
    let registry = DatasetRegistry::new().unwrap();
    assert!(matches!(
        registry.find_config("nusax_senti_ind_source"),
        Err(Error::UnknownDataset(_))
    ));
}
