//! Filesystem hierarchy store.

use crate::error::{StorageError, StorageResult};
use crate::id::{FragmentId, FragmentPath};
use crate::store::FragmentStore;
use rand::{Rng, RngCore};
use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{trace, warn};

/// A fragment store backed by a directory tree.
///
/// Records live at `<root>/<d0>/<d1>/<d2>/<id>`. The directory tree is the
/// only index: lookups list a directory, pick an entry, and descend.
///
/// # Durability
///
/// None. Records are written with plain file I/O and never synced.
///
/// # Example
///
/// ```no_run
/// use bogdb_storage::{FileStore, FragmentStore};
/// use rand::{rngs::StdRng, SeedableRng};
/// use std::path::Path;
///
/// let mut rng = StdRng::seed_from_u64(1);
/// let mut store = FileStore::open(Path::new("/tmp/bog")).unwrap();
/// let path = store.write(&mut rng, b"sphagnum").unwrap();
/// store.delete(&path).unwrap();
/// ```
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    prune_empty_dirs: bool,
}

impl FileStore {
    /// Opens the store rooted at `root`, creating the directory if needed.
    ///
    /// Pruning of emptied shard directories is on by default.
    ///
    /// # Errors
    ///
    /// Returns an error if the root cannot be created.
    pub fn open(root: &Path) -> StorageResult<Self> {
        fs::create_dir_all(root).map_err(|source| StorageError::CreateDir {
            path: root.to_path_buf(),
            source,
        })?;

        Ok(Self {
            root: root.to_path_buf(),
            prune_empty_dirs: true,
        })
    }

    /// Sets whether `delete` removes shard directories it leaves empty.
    #[must_use]
    pub fn with_pruning(mut self, prune: bool) -> Self {
        self.prune_empty_dirs = prune;
        self
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a store-relative path against the root.
    #[must_use]
    pub fn resolve(&self, path: &FragmentPath) -> PathBuf {
        self.root.join(path.as_path())
    }

    /// Removes emptied shard directories from `start` up to, not including,
    /// the root. Stops quietly at the first directory that cannot be listed
    /// or removed: the record is already gone by then.
    fn prune_from(&self, start: Option<&Path>) {
        let mut dir = start;
        while let Some(current) = dir {
            if current == self.root.as_path() || !current.starts_with(&self.root) {
                break;
            }
            let is_empty = match fs::read_dir(current) {
                Ok(mut entries) => entries.next().is_none(),
                Err(err) => {
                    prune_stopped(current, &err);
                    break;
                }
            };
            if !is_empty {
                break;
            }
            if let Err(err) = fs::remove_dir(current) {
                prune_stopped(current, &err);
                break;
            }
            trace!(dir = %current.display(), "pruned empty shard directory");
            dir = current.parent();
        }
    }
}

fn prune_stopped(dir: &Path, err: &io::Error) {
    if err.kind() == io::ErrorKind::NotFound {
        trace!(dir = %dir.display(), "shard directory already gone");
    } else {
        warn!(dir = %dir.display(), error = %err, "could not prune shard directory");
    }
}

/// Lists `dir` as `(name, is_dir)` pairs sorted by name.
fn list_sorted(dir: &Path) -> StorageResult<Vec<(OsString, bool)>> {
    let list_err = |source: io::Error| StorageError::ListDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(list_err)? {
        let entry = entry.map_err(list_err)?;
        let is_dir = entry.file_type().map_err(list_err)?.is_dir();
        entries.push((entry.file_name(), is_dir));
    }
    entries.sort();
    Ok(entries)
}

impl FragmentStore for FileStore {
    fn write(&mut self, rng: &mut dyn RngCore, record: &[u8]) -> StorageResult<FragmentPath> {
        let relative = FragmentId::generate(rng).path();
        let path = self.resolve(&relative);

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|source| StorageError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let write_err = |source: io::Error| StorageError::Write {
            path: path.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(write_err)?;
        file.write_all(record).map_err(write_err)?;

        trace!(fragment = %relative, bytes = record.len(), "wrote fragment");
        Ok(relative)
    }

    fn pick_random(
        &self,
        rng: &mut dyn RngCore,
    ) -> StorageResult<Option<(FragmentPath, Vec<u8>)>> {
        let mut dir = self.root.clone();
        let mut relative = PathBuf::new();

        loop {
            let mut entries = list_sorted(&dir)?;
            if entries.is_empty() {
                trace!(dir = %dir.display(), "descent reached an empty directory");
                return Ok(None);
            }

            let selected = rng.gen_range(0..entries.len());
            let (name, is_dir) = entries.swap_remove(selected);
            dir.push(&name);
            relative.push(&name);

            if is_dir {
                continue;
            }

            let bytes = fs::read(&dir).map_err(|source| StorageError::Read {
                path: dir.clone(),
                source,
            })?;
            return Ok(Some((FragmentPath::from_relative(relative), bytes)));
        }
    }

    fn delete(&mut self, path: &FragmentPath) -> StorageResult<()> {
        let absolute = self.resolve(path);
        fs::remove_file(&absolute).map_err(|source| StorageError::Delete {
            path: absolute.clone(),
            source,
        })?;
        trace!(fragment = %path, "deleted fragment");

        if self.prune_empty_dirs {
            self.prune_from(absolute.parent());
        }
        Ok(())
    }

    fn fragment_count(&self) -> StorageResult<usize> {
        let mut count = 0;
        let mut pending = vec![self.root.clone()];

        while let Some(dir) = pending.pop() {
            for (name, is_dir) in list_sorted(&dir)? {
                if is_dir {
                    pending.push(dir.join(name));
                } else {
                    count += 1;
                }
            }
        }
        Ok(count)
    }
}
