/*! CoNLL column files

One token per line, whitespace-separated columns, blank lines between sentences.
`-DOCSTART-` lines are document markers and are skipped.

```text
-DOCSTART- -X- O

Joko NNP B-PER
tinggal VB O
di IN O
Solo NNP B-LOC
```

[ConllReader] streams [Sentence]s out of any [BufRead].
A line that lacks the requested columns makes its whole sentence an error (carrying its 1-based line number),
and reading resumes at the next sentence.
!*/
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::Error;

const DOCSTART: &str = "-DOCSTART-";

/// Column positions of token and tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Columns {
    pub token: usize,
    /// [None] means the last column of the line.
    pub tag: Option<usize>,
}

impl Default for Columns {
    fn default() -> Self {
        Self { token: 0, tag: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    /// 1-based line number of the first token.
    pub line: usize,
    pub tokens: Vec<String>,
    pub tags: Vec<String>,
}

pub struct ConllReader<R> {
    lines: std::iter::Enumerate<std::io::Lines<R>>,
    columns: Columns,
    source: PathBuf,
    done: bool,
}

impl ConllReader<BufReader<File>> {
    pub fn open(path: &Path, columns: Columns) -> Result<Self, Error> {
        let f = File::open(path)?;
        Ok(Self::new(BufReader::new(f), columns, path))
    }
}

impl<R: BufRead> ConllReader<R> {
    /// `source` is only used in error messages.
    pub fn new(reader: R, columns: Columns, source: impl Into<PathBuf>) -> Self {
        Self {
            lines: reader.lines().enumerate(),
            columns,
            source: source.into(),
            done: false,
        }
    }

    fn split_line<'a>(&self, line: &'a str) -> Option<(&'a str, &'a str)> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let token = parts.get(self.columns.token)?;
        let tag = match self.columns.tag {
            Some(idx) => parts.get(idx)?,
            None if parts.len() > 1 => parts.last()?,
            None => return None,
        };
        Some((token, tag))
    }
}

impl<R: BufRead> Iterator for ConllReader<R> {
    type Item = Result<Sentence, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut sentence = Sentence {
            line: 0,
            tokens: Vec::new(),
            tags: Vec::new(),
        };
        let mut bad_line = None;

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
            let line = line.trim();
            if line.is_empty() {
                if sentence.tokens.is_empty() && bad_line.is_none() {
                    continue;
                }
                break;
            }
            if line.starts_with(DOCSTART) {
                continue;
            }

            match self.split_line(line) {
                Some((token, tag)) => {
                    if sentence.tokens.is_empty() {
                        sentence.line = idx + 1;
                    }
                    sentence.tokens.push(token.to_string());
                    sentence.tags.push(tag.to_string());
                }
                None => {
                    bad_line.get_or_insert(idx + 1);
                }
            }
        }

        if let Some(line) = bad_line {
            return Some(Err(Error::malformed(
                self.source.clone(),
                Some(line),
                "missing token or tag column",
            )));
        }
        if sentence.tokens.is_empty() {
            None
        } else {
            Some(Ok(sentence))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    const SAMPLE: &str = "-DOCSTART- -X- O

Joko NNP B-PER
tinggal VB O
di IN O
Solo NNP B-LOC

Ia PRP O
pulang VB O
";

    fn read(text: &str, columns: Columns) -> Vec<Result<Sentence, Error>> {
        ConllReader::new(Cursor::new(text.to_string()), columns, "sample.conll").collect()
    }

    #[test]
    fn sentences_and_docstart() {
        let sentences: Vec<Sentence> = read(SAMPLE, Columns::default())
            .into_iter()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].tokens, vec!["Joko", "tinggal", "di", "Solo"]);
        assert_eq!(sentences[0].tags, vec!["B-PER", "O", "O", "B-LOC"]);
        assert_eq!(sentences[0].line, 3);
        assert_eq!(sentences[1].line, 8);
    }

    #[test]
    fn explicit_columns() {
        let sentences: Vec<Sentence> = read(SAMPLE, Columns { token: 0, tag: Some(1) })
            .into_iter()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(sentences[0].tags[0], "NNP");
    }

    #[test]
    fn bad_line_fails_only_its_sentence() {
        let text = "a O\nb\nc O\n\nd O\n";
        let results = read(text, Columns::default());
        assert_eq!(results.len(), 2);
        match &results[0] {
            Err(Error::Malformed { line, .. }) => assert_eq!(*line, Some(2)),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(results[1].as_ref().unwrap().tokens, vec!["d"]);
    }

    #[test]
    fn no_trailing_newline() {
        let results = read("a O\nb O", Columns::default());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].as_ref().unwrap().tokens.len(), 2);
    }
}
