/*! JSON Lines split writer.

One record per line. The file is created on construction (with its parent folders), so that empty splits still produce an (empty) file.
!*/
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use log::debug;
use serde_json::Value;

use crate::error::Error;

use super::WriterTrait;

enum Handle {
    Plain(BufWriter<File>),
    Gz(GzEncoder<BufWriter<File>>),
}

impl Write for Handle {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            Handle::Plain(w) => w.write(buf),
            Handle::Gz(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            Handle::Plain(w) => w.flush(),
            Handle::Gz(w) => w.flush(),
        }
    }
}

pub struct JsonlWriter {
    handle: Handle,
    path: PathBuf,
    nb_records: usize,
}

impl JsonlWriter {
    /// Create a writer at `path`. Compression is done with gzip if `compress` is set.
    pub fn create(path: &Path, compress: bool) -> Result<Self, Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        debug!("creating {:?}", path);
        let f = BufWriter::new(File::create(path)?);
        let handle = if compress {
            Handle::Gz(GzEncoder::new(f, Compression::default()))
        } else {
            Handle::Plain(f)
        };
        Ok(Self {
            handle,
            path: path.to_path_buf(),
            nb_records: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn nb_records(&self) -> usize {
        self.nb_records
    }
}

impl WriterTrait for JsonlWriter {
    type Item = Value;

    fn write(&mut self, vals: Vec<Value>) -> Result<(), Error> {
        let mut buf = String::new();
        for val in &vals {
            buf += &serde_json::to_string(val)?;
            buf.push('\n');
        }
        self.handle.write_all(buf.as_bytes())?;
        self.nb_records += vals.len();
        Ok(())
    }

    fn write_single(&mut self, val: &Value) -> Result<(), Error> {
        serde_json::to_writer(&mut self.handle, val)?;
        self.handle.write_all(b"\n")?;
        self.nb_records += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Error> {
        match &mut self.handle {
            Handle::Plain(w) => w.flush()?,
            Handle::Gz(w) => {
                w.try_finish()?;
                w.get_mut().flush()?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::io::JsonlReader;

    #[test]
    fn write_then_read() {
        for compress in [false, true] {
            let dst = tempfile::tempdir().unwrap();
            let path = dst
                .path()
                .join("cfg")
                .join(if compress { "train.jsonl.gz" } else { "train.jsonl" });
            let mut wr = JsonlWriter::create(&path, compress).unwrap();
            wr.write(vec![json!({"id": "0"}), json!({"id": "1"})]).unwrap();
            wr.write_single(&json!({"id": "2"})).unwrap();
            wr.close().unwrap();
            assert_eq!(wr.nb_records(), 3);

            let ids: Vec<Value> = JsonlReader::from_path(&path)
                .unwrap()
                .map(|r| r.unwrap().value["id"].clone())
                .collect();
            assert_eq!(ids, vec![json!("0"), json!("1"), json!("2")]);
        }
    }

    #[test]
    fn empty_split_creates_file() {
        let dst = tempfile::tempdir().unwrap();
        let path = dst.path().join("test.jsonl");
        let mut wr = JsonlWriter::create(&path, false).unwrap();
        wr.close().unwrap();
        assert!(path.exists());
    }
}
