//! Language codes.
//!
//! Dataset cards declare their languages in ISO 639-3.
//! This module holds the set of codes that are known in the Southeast Asian region,
//! and converts them to BCP47 tags (using ISO 639-1 codes when they exist).
use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;
use oxilangtag::LanguageTag;

use crate::error::Error;

lazy_static! {

    /// ISO 639-3 codes of languages spoken in Southeast Asia
    /// (plus a handful of widely paired languages found in translation datasets).
    pub static ref LANG: HashSet<&'static str> = {
        let mut m = HashSet::new();
        m.insert("ace");
        m.insert("ban");
        m.insert("bbc");
        m.insert("bew");
        m.insert("bjn");
        m.insert("bug");
        m.insert("ceb");
        m.insert("cnh");
        m.insert("eng");
        m.insert("fil");
        m.insert("gor");
        m.insert("hil");
        m.insert("hmn");
        m.insert("iba");
        m.insert("ilo");
        m.insert("ind");
        m.insert("jav");
        m.insert("kac");
        m.insert("khm");
        m.insert("lao");
        m.insert("mad");
        m.insert("mak");
        m.insert("min");
        m.insert("mnw");
        m.insert("msa");
        m.insert("mya");
        m.insert("nij");
        m.insert("pag");
        m.insert("pam");
        m.insert("shn");
        m.insert("sun");
        m.insert("tdt");
        m.insert("tet");
        m.insert("tgl");
        m.insert("tha");
        m.insert("vie");
        m.insert("war");
        m.insert("zlm");
        m.insert("zho");
        m
    };

    /// ISO 639-3 codes that have an ISO 639-1 equivalent.
    static ref TO_BCP47: HashMap<&'static str, &'static str> = [
        ("eng", "en"),
        ("ind", "id"),
        ("jav", "jv"),
        ("khm", "km"),
        ("lao", "lo"),
        ("msa", "ms"),
        ("mya", "my"),
        ("sun", "su"),
        ("tgl", "tl"),
        ("tha", "th"),
        ("vie", "vi"),
        ("zho", "zh"),
    ]
    .into_iter()
    .collect();
}

/// Check that `code` is a known ISO 639-3 code.
pub fn check(code: &str) -> Result<&'static str, Error> {
    LANG.get(code)
        .copied()
        .ok_or_else(|| Error::UnknownLang(code.to_string()))
}

/// Convert an ISO 639-3 code into a BCP47 tag.
pub fn to_bcp47(code: &str) -> Result<LanguageTag<String>, Error> {
    let code = check(code)?;
    let standard = TO_BCP47.get(code).unwrap_or(&code);
    Ok(LanguageTag::parse(standard.to_string())?)
}
