/*! BIO tagging scheme

Tags are either `O`, `B-<TYPE>` or `I-<TYPE>`.
An `I-<TYPE>` tag has to follow a `B-<TYPE>` or an `I-<TYPE>` tag of the same type (IOB2).
IOB1 data, where `I-` may open a span, can be repaired into IOB2.
!*/
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bio<'a> {
    Begin(&'a str),
    Inside(&'a str),
    Outside,
}

impl<'a> Bio<'a> {
    /// Parse a tag. Returns [None] for tags outside of the scheme.
    ///
    /// Both `-` and `_` separators are accepted (`B-PER`, `B_PER`).
    pub fn parse(tag: &'a str) -> Option<Self> {
        if tag == "O" {
            return Some(Bio::Outside);
        }
        let (prefix, kind) = match tag.split_once('-') {
            Some(parts) => parts,
            None => tag.split_once('_')?,
        };
        if kind.is_empty() {
            return None;
        }
        match prefix {
            "B" => Some(Bio::Begin(kind)),
            "I" => Some(Bio::Inside(kind)),
            _ => None,
        }
    }

    pub fn kind(&self) -> Option<&'a str> {
        match self {
            Bio::Begin(k) | Bio::Inside(k) => Some(k),
            Bio::Outside => None,
        }
    }
}

/// What to do with ill-formed BIO sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BioPolicy {
    /// Do not look at tag transitions.
    #[default]
    Ignore,
    /// Reject sequences with a stray `I-` tag.
    Reject,
    /// Turn stray `I-<TYPE>` tags into `B-<TYPE>`.
    Repair,
}

impl FromStr for BioPolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ignore" => Ok(BioPolicy::Ignore),
            "reject" => Ok(BioPolicy::Reject),
            "repair" => Ok(BioPolicy::Repair),
            other => Err(format!(
                "unknown bio policy {:?} (expected ignore, reject or repair)",
                other
            )),
        }
    }
}

/// Whether every tag of a label set belongs to the BIO scheme.
pub fn is_bio_label_set<'a, I>(tags: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    let mut any = false;
    for tag in tags {
        if Bio::parse(tag).is_none() {
            return false;
        }
        any = true;
    }
    any
}

/// Positions of `I-` tags that do not continue a span of the same type.
pub fn stray_inside<S: AsRef<str>>(tags: &[S]) -> Vec<usize> {
    let mut stray = Vec::new();
    let mut prev: Option<Bio> = Some(Bio::Outside);
    for (idx, tag) in tags.iter().enumerate() {
        let cur = Bio::parse(tag.as_ref());
        if let Some(Bio::Inside(kind)) = cur {
            let continues = matches!(prev, Some(Bio::Begin(k)) | Some(Bio::Inside(k)) if k == kind);
            if !continues {
                stray.push(idx);
            }
        }
        prev = cur;
    }
    stray
}

/// Rewrite stray `I-` tags into `B-` tags. Returns the number of rewritten tags.
pub fn repair(tags: &mut [String]) -> usize {
    let stray = stray_inside(&*tags);
    for idx in stray.iter() {
        let fixed = match Bio::parse(&tags[*idx]) {
            Some(Bio::Inside(kind)) => format!("B-{}", kind),
            _ => continue,
        };
        tags[*idx] = fixed;
    }
    stray.len()
}

/// A labelled span over token indices (`end` excluded).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub kind: String,
    pub start: usize,
    pub end: usize,
}

/// Extract spans, treating stray `I-` tags as span openers.
pub fn spans<S: AsRef<str>>(tags: &[S]) -> Vec<Span> {
    let mut spans: Vec<Span> = Vec::new();
    let mut open: Option<Span> = None;
    for (idx, tag) in tags.iter().enumerate() {
        match Bio::parse(tag.as_ref()) {
            Some(Bio::Begin(kind)) => {
                spans.extend(open.take());
                open = Some(Span {
                    kind: kind.to_string(),
                    start: idx,
                    end: idx + 1,
                });
            }
            Some(Bio::Inside(kind)) => match open.as_mut() {
                Some(span) if span.kind == kind => span.end = idx + 1,
                _ => {
                    spans.extend(open.take());
                    open = Some(Span {
                        kind: kind.to_string(),
                        start: idx,
                        end: idx + 1,
                    });
                }
            },
            Some(Bio::Outside) | None => spans.extend(open.take()),
        }
    }
    spans.extend(open);
    spans
}
