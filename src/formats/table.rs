/*! Delimited tables

Thin layer over [csv] for the metadata tables datasets ship with
(comma-separated manifests, space-separated `id value` listings...).
Rows are deserialized into any [serde::de::DeserializeOwned] type.
!*/
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableOptions {
    pub delimiter: u8,
    pub has_headers: bool,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_headers: true,
        }
    }
}

impl TableOptions {
    /// Space-separated, headerless (`1 001.Black_footed_Albatross/xxx.jpg`).
    pub fn space_separated() -> Self {
        Self {
            delimiter: b' ',
            has_headers: false,
        }
    }
}

/// Iterator over deserialized rows.
///
/// Errors carry the source path and the 1-based line of the faulty row.
pub struct TableReader<R: Read, T> {
    rows: csv::DeserializeRecordsIntoIter<R, T>,
    source: PathBuf,
}

impl<T: DeserializeOwned> TableReader<File, T> {
    pub fn open(path: &Path, options: TableOptions) -> Result<Self, Error> {
        let f = File::open(path)?;
        Ok(Self::new(f, options, path))
    }
}

impl<R: Read, T: DeserializeOwned> TableReader<R, T> {
    pub fn new(reader: R, options: TableOptions, source: impl Into<PathBuf>) -> Self {
        let rows = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .has_headers(options.has_headers)
            .trim(csv::Trim::All)
            .from_reader(reader)
            .into_deserialize();
        Self {
            rows,
            source: source.into(),
        }
    }
}

impl<R: Read, T: DeserializeOwned> Iterator for TableReader<R, T> {
    type Item = Result<T, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.next()?;
        Some(row.map_err(|e| {
            let line = e.position().map(|p| p.line() as usize);
            Error::malformed(self.source.clone(), line, e.to_string())
        }))
    }
}

/// Read a whole table. Bad rows do not stop reading, their errors are returned next to the good rows.
pub fn read_partitioned<T: DeserializeOwned>(
    path: &Path,
    options: TableOptions,
) -> Result<(Vec<T>, Vec<Error>), Error> {
    let mut rows = Vec::new();
    let mut errors = Vec::new();
    for row in TableReader::open(path, options)? {
        match row {
            Ok(row) => rows.push(row),
            Err(e) => errors.push(e),
        }
    }
    Ok((rows, errors))
}
