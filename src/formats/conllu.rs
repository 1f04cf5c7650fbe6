/*! CoNLL-U

Universal Dependencies treebank format.
A sentence is a block of comment lines (`# key = value`) followed by one node per line,
with ten tab-separated columns:

`ID FORM LEMMA UPOS XPOS FEATS HEAD DEPREL DEPS MISC`

`_` marks an empty field. Ids are either word ids (`3`), multiword token ranges (`3-4`) or empty nodes (`3.1`).
Word ids must run consecutively from 1.
!*/
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::Error;

const COLUMNS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeId {
    Word(usize),
    Range(usize, usize),
    Empty(usize, usize),
}

impl NodeId {
    fn parse(s: &str) -> Option<Self> {
        if let Some((start, end)) = s.split_once('-') {
            let (start, end) = (start.parse().ok()?, end.parse().ok()?);
            return if start < end {
                Some(NodeId::Range(start, end))
            } else {
                None
            };
        }
        if let Some((word, sub)) = s.split_once('.') {
            return Some(NodeId::Empty(word.parse().ok()?, sub.parse().ok()?));
        }
        match s.parse() {
            Ok(0) | Err(_) => None,
            Ok(id) => Some(NodeId::Word(id)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub form: String,
    pub lemma: Option<String>,
    pub upos: Option<String>,
    pub xpos: Option<String>,
    pub feats: BTreeMap<String, String>,
    pub head: Option<usize>,
    pub deprel: Option<String>,
    pub deps: Option<String>,
    pub misc: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sentence {
    /// 1-based line number of the first line of the block.
    pub line: usize,
    pub comments: BTreeMap<String, String>,
    pub nodes: Vec<Node>,
}

impl Sentence {
    /// Forms of the syntactic words, skipping multiword tokens and empty nodes.
    pub fn tokens(&self) -> Vec<&str> {
        self.words().map(|n| n.form.as_str()).collect()
    }

    pub fn upos(&self) -> Vec<&str> {
        self.words()
            .map(|n| n.upos.as_deref().unwrap_or("_"))
            .collect()
    }

    pub fn sent_id(&self) -> Option<&str> {
        self.comments.get("sent_id").map(String::as_str)
    }

    pub fn text(&self) -> Option<&str> {
        self.comments.get("text").map(String::as_str)
    }

    fn words(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| matches!(n.id, NodeId::Word(_)))
    }
}

fn field(s: &str) -> Option<String> {
    match s {
        "_" => None,
        s => Some(s.to_string()),
    }
}

/// Parse `A=B|C=D` features. `_` gives no feature.
pub fn parse_feats(s: &str) -> Result<BTreeMap<String, String>, String> {
    if s == "_" {
        return Ok(BTreeMap::new());
    }
    s.split('|')
        .map(|kv| {
            kv.split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .ok_or_else(|| format!("invalid feature {:?}", kv))
        })
        .collect()
}

fn parse_node(line: &str) -> Result<Node, String> {
    let cols: Vec<&str> = line.split('\t').collect();
    if cols.len() != COLUMNS {
        return Err(format!("expected {} columns, got {}", COLUMNS, cols.len()));
    }
    let id = NodeId::parse(cols[0]).ok_or_else(|| format!("invalid id {:?}", cols[0]))?;
    let head = match cols[6] {
        "_" => None,
        h => Some(h.parse().map_err(|_| format!("invalid head {:?}", h))?),
    };
    Ok(Node {
        id,
        form: cols[1].to_string(),
        lemma: field(cols[2]),
        upos: field(cols[3]),
        xpos: field(cols[4]),
        feats: parse_feats(cols[5])?,
        head,
        deprel: field(cols[7]),
        deps: field(cols[8]),
        misc: field(cols[9]),
    })
}

pub struct ConlluReader<R> {
    lines: std::iter::Enumerate<std::io::Lines<R>>,
    source: PathBuf,
    done: bool,
}

impl ConlluReader<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self, Error> {
        let f = File::open(path)?;
        Ok(Self::new(BufReader::new(f), path))
    }
}

impl<R: BufRead> ConlluReader<R> {
    pub fn new(reader: R, source: impl Into<PathBuf>) -> Self {
        Self {
            lines: reader.lines().enumerate(),
            source: source.into(),
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for ConlluReader<R> {
    type Item = Result<Sentence, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut sentence = Sentence::default();
        let mut error: Option<(usize, String)> = None;
        let mut next_word = 1;

        loop {
            let (idx, line) = match self.lines.next() {
                Some((idx, Ok(line))) => (idx, line),
                Some((_, Err(e))) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
                None => {
                    self.done = true;
                    break;
                }
            };
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                if sentence.line == 0 {
                    continue;
                }
                break;
            }
            if sentence.line == 0 {
                sentence.line = idx + 1;
            }
            if error.is_some() {
                continue;
            }

            if let Some(comment) = line.strip_prefix('#') {
                if let Some((k, v)) = comment.split_once('=') {
                    sentence
                        .comments
                        .insert(k.trim().to_string(), v.trim().to_string());
                }
                continue;
            }

            match parse_node(line) {
                Ok(node) => {
                    if let NodeId::Word(id) = node.id {
                        if id != next_word {
                            error = Some((idx + 1, format!("expected word id {}, got {}", next_word, id)));
                            continue;
                        }
                        next_word += 1;
                    }
                    sentence.nodes.push(node);
                }
                Err(reason) => error = Some((idx + 1, reason)),
            }
        }

        if let Some((line, reason)) = error {
            return Some(Err(Error::malformed(self.source.clone(), Some(line), reason)));
        }
        if sentence.line == 0 {
            None
        } else {
            Some(Ok(sentence))
        }
    }
}
