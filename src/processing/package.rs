/*! Packaging (prepping for distribution) utilities

Each config folder of a normalized output (`<dst>/<config name>/`) gets a `<config name>_sha384.txt` file,
holding a sha384sum of each of its files, in a format _usually_ compatible with `sha384sum -c` implementations.
!*/
use std::fs::File;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};
use rayon::prelude::*;
use sha2::Digest;
use sha2::Sha384;

use crate::error::Error;

fn checksum_filename(config: &str) -> String {
    format!("{}_sha384.txt", config)
}

/// Create the checksum file of a config folder.
///
/// Files are hashed in name order. A previous checksum file is not hashed, and gets overwritten.
pub fn gen_checksum_file(config_dir: &Path) -> Result<PathBuf, Error> {
    let config = config_dir
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::Custom(format!("invalid config folder: {:?}", config_dir)))?
        .to_string();
    let checksum_name = checksum_filename(&config);

    debug!("gen checksum on folder {:?}", config_dir);
    let mut files: Vec<PathBuf> = std::fs::read_dir(config_dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<_, _>>()?;
    files.retain(|f| f.is_file() && f.file_name().map_or(true, |n| n != checksum_name.as_str()));
    files.sort();

    let mut hasher = Sha384::new();
    let mut lines = Vec::with_capacity(files.len());
    for f in &files {
        info!("[{}] hashing {:?}", config, f.file_name());
        let hash = get_hash(f, &mut hasher)?;
        let filename = f
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        lines.push((hash, filename));
    }

    let checksum_filepath = config_dir.join(checksum_name);
    debug!("writing hashes to: {:?}", checksum_filepath);
    let mut checksum_file = File::create(&checksum_filepath)?;

    // sha384sum -c compatible format.
    for (hash, filename) in lines {
        writeln!(&mut checksum_file, "{} {}", hash, filename)?;
    }

    Ok(checksum_filepath)
}

/// compute the hash of the file pointed by the filepath by using [io::copy] between a file handler and the hasher.
#[inline]
fn get_hash(filepath: &Path, hasher: &mut Sha384) -> Result<String, Error> {
    let mut f = File::open(filepath)?;
    io::copy(&mut f, hasher)?;
    let result = format!("{:x}", hasher.finalize_reset());
    Ok(result)
}

/// Concurrently generate checksum files for every config folder in `dst`.
pub fn package(dst: &Path) -> Result<Vec<PathBuf>, Error> {
    let mut config_dirs: Vec<PathBuf> = std::fs::read_dir(dst)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<_, _>>()?;
    config_dirs.retain(|d| d.is_dir());
    if config_dirs.is_empty() {
        warn!("no config folder found in {:?}", dst);
    }

    let (written, errors): (Vec<_>, Vec<_>) = config_dirs
        .par_iter()
        .map(|dir| gen_checksum_file(dir))
        .partition(Result::is_ok);

    if !errors.is_empty() {
        for error in errors.into_iter().filter_map(Result::err) {
            error!("{:?}", error);
        }
        return Err(Error::Custom(
            "Errors occurred during packaging: see previous messages.".to_string(),
        ));
    }
    let mut written: Vec<PathBuf> = written.into_iter().filter_map(Result::ok).collect();
    written.sort();
    Ok(written)
}

#[cfg(test)]
mod tests {
    use std::fs::{create_dir, read_to_string, write};

    use super::*;

    #[test]
    fn checksums() {
        let dst = tempfile::tempdir().unwrap();
        let config = dst.path().join("cub_bahasa_seacrowd_imtext");
        create_dir(&config).unwrap();
        write(config.join("train.jsonl"), "{}\n").unwrap();
        write(config.join("report.json"), "{}").unwrap();
        // stray files at the root are not packaged
        write(dst.path().join("notes.txt"), "hello").unwrap();

        let written = package(dst.path()).unwrap();
        assert_eq!(written, vec![config.join("cub_bahasa_seacrowd_imtext_sha384.txt")]);

        let content = read_to_string(&written[0]).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" report.json"));
        assert!(lines[1].ends_with(" train.jsonl"));
        // sha384 is 96 hex chars
        assert_eq!(lines[1].split(' ').next().unwrap().len(), 96);

        // running again does not hash the checksum file itself
        package(dst.path()).unwrap();
        assert_eq!(read_to_string(&written[0]).unwrap(), content);
    }
}
