//! Helpers for inspecting a bog's on-disk layout.
//!
//! These walk the directory tree directly, without going through a
//! `FragmentStore`, so tests can check what actually landed on disk.

use bogdb_core::{Fragment, ParseError};
use bogdb_storage::SHARD_DEPTH;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A record file found under a bog root.
#[derive(Debug, Clone)]
pub struct BuriedRecord {
    /// Path relative to the root.
    pub relative: PathBuf,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
}

impl BuriedRecord {
    /// Parses the record into a fragment.
    pub fn parse(&self) -> Result<Fragment, ParseError> {
        Fragment::parse(&self.bytes)
    }

    /// Returns the path components relative to the root.
    pub fn components(&self) -> Vec<String> {
        self.relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect()
    }
}

/// Returns every regular file under `root`, sorted by relative path.
pub fn buried_records(root: &Path) -> io::Result<Vec<BuriedRecord>> {
    let mut records = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type()?.is_dir() {
                stack.push(path);
            } else {
                let relative = path
                    .strip_prefix(root)
                    .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?
                    .to_path_buf();
                records.push(BuriedRecord {
                    relative,
                    bytes: fs::read(&path)?,
                });
            }
        }
    }

    records.sort_by(|a, b| a.relative.cmp(&b.relative));
    Ok(records)
}

/// Returns every directory under `root` (excluding `root`) with no entries.
pub fn empty_dirs(root: &Path) -> io::Result<Vec<PathBuf>> {
    let mut empty = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let mut has_entries = false;
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            has_entries = true;
            if entry.file_type()?.is_dir() {
                stack.push(entry.path());
            }
        }
        if !has_entries && dir != root {
            empty.push(dir);
        }
    }

    empty.sort();
    Ok(empty)
}

/// Checks that a record sits at `d0/d1/d2/<name>`, where `name` is a
/// decimal identifier and each `dN` is its Nth digit.
pub fn check_record_shape(record: &BuriedRecord) -> Result<(), String> {
    let components = record.components();
    if components.len() != SHARD_DEPTH + 1 {
        return Err(format!(
            "{} is at depth {}, expected {}",
            record.relative.display(),
            components.len(),
            SHARD_DEPTH + 1
        ));
    }

    let name = &components[SHARD_DEPTH];
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("{name} is not a decimal identifier"));
    }

    let shards = components.iter().zip(name.chars()).take(SHARD_DEPTH);
    for (depth, (shard, digit)) in shards.enumerate() {
        if shard.chars().count() != 1 || !shard.starts_with(digit) {
            return Err(format!("shard {shard} at depth {depth} does not match {name}"));
        }
    }

    Ok(())
}

/// Checks every record under `root` for shape and a parseable header.
pub fn check_layout(root: &Path) -> Result<Vec<Fragment>, String> {
    let records = buried_records(root).map_err(|e| e.to_string())?;
    records
        .iter()
        .map(|record| {
            check_record_shape(record)?;
            record
                .parse()
                .map_err(|e| format!("{}: {e}", record.relative.display()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn finds_nested_records() {
        let dir = tempdir().unwrap();
        let shard = dir.path().join("1").join("2").join("3");
        fs::create_dir_all(&shard).unwrap();
        fs::write(shard.join("12345"), b"2020-02-29T12:00:00Z\nabc").unwrap();

        let records = buried_records(dir.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].components(), vec!["1", "2", "3", "12345"]);
        check_record_shape(&records[0]).unwrap();
        assert_eq!(records[0].parse().unwrap().contents, b"abc");
    }

    #[test]
    fn rejects_mismatched_shard() {
        let dir = tempdir().unwrap();
        let shard = dir.path().join("9").join("2").join("3");
        fs::create_dir_all(&shard).unwrap();
        fs::write(shard.join("12345"), b"").unwrap();

        let records = buried_records(dir.path()).unwrap();
        assert!(check_record_shape(&records[0]).is_err());
    }

    #[test]
    fn rejects_shallow_record() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("12345"), b"").unwrap();

        let records = buried_records(dir.path()).unwrap();
        assert!(check_record_shape(&records[0]).is_err());
    }

    #[test]
    fn reports_empty_dirs() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("4").join("5")).unwrap();

        let empty = empty_dirs(dir.path()).unwrap();
        assert_eq!(empty, vec![dir.path().join("4").join("5")]);
    }
}
