/*! JSON Lines reader.

Each non-empty line holds one JSON value.
Records are yielded as [Example]s keyed by their 1-based line number, so that reports can point back into the file.
!*/
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;

use crate::error::Error;
use crate::io::is_gz;
use crate::loader::Example;

pub struct JsonlReader<R: BufRead> {
    lines: std::iter::Enumerate<Lines<R>>,
    source: PathBuf,
}

impl JsonlReader<Box<dyn BufRead + Send>> {
    /// Open a `.jsonl` or a `.jsonl.gz` file.
    pub fn from_path(src: &Path) -> Result<Self, Error> {
        let f = File::open(src)?;
        let br: Box<dyn BufRead + Send> = if is_gz(src) {
            Box::new(BufReader::new(MultiGzDecoder::new(f)))
        } else {
            Box::new(BufReader::new(f))
        };
        Ok(Self::new(br, src))
    }
}

impl<R: BufRead> JsonlReader<R> {
    pub fn new(reader: R, source: impl Into<PathBuf>) -> Self {
        Self {
            lines: reader.lines().enumerate(),
            source: source.into(),
        }
    }
}

impl<R: BufRead> Iterator for JsonlReader<R> {
    type Item = Result<Example, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (idx, line) = match self.lines.next()? {
                (idx, Ok(line)) => (idx, line),
                (_, Err(e)) => return Some(Err(Error::Io(e))),
            };
            if line.trim().is_empty() {
                continue;
            }
            let line_nb = idx + 1;
            return Some(
                serde_json::from_str(&line)
                    .map(|value| Example::new(line_nb, value))
                    .map_err(|e| Error::malformed(self.source.clone(), Some(line_nb), e.to_string())),
            );
        }
    }
}
