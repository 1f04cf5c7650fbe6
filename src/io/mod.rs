/*!
# IO utilities

Reading and writing of JSON Lines record files, optionally gzip-compressed.

Normalized splits are laid out as `<dst>/<config name>/<split>.jsonl[.gz]`, next to a `report.json`.
!*/
use std::path::{Path, PathBuf};

use crate::loader::Split;

pub mod reader;
pub mod writer;

pub use reader::JsonlReader;
pub use writer::{Discard, JsonlWriter, WriterTrait};

/// Name of the report file written next to the splits of a config.
pub const REPORT_FILE: &str = "report.json";

/// Path of the output file of `split` for a config.
pub fn split_path(dst: &Path, config_name: &str, split: Split, compress: bool) -> PathBuf {
    let ext = if compress { "jsonl.gz" } else { "jsonl" };
    dst.join(config_name).join(format!("{}.{}", split, ext))
}

/// Whether a path points to a gzip file, judging by its extension.
pub fn is_gz(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == "gz")
}
