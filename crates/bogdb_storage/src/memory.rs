//! In-memory fragment store for testing.

use crate::error::{StorageError, StorageResult};
use crate::id::{FragmentId, FragmentPath};
use crate::store::FragmentStore;
use rand::{Rng, RngCore};
use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

#[derive(Debug)]
enum Node {
    Dir(BTreeMap<String, Node>),
    Record(Vec<u8>),
}

/// An in-memory fragment store.
///
/// Models the same shard tree as [`super::FileStore`] with nested sorted
/// maps, so a seeded generator makes the same choices against either store
/// given the same contents. Suitable for:
/// - Unit tests
/// - Engine tests that should not touch the filesystem
///
/// # Example
///
/// ```rust
/// use bogdb_storage::{FragmentStore, InMemoryStore};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut rng = StdRng::seed_from_u64(0);
/// let mut store = InMemoryStore::new();
/// let path = store.write(&mut rng, b"bog body").unwrap();
/// assert_eq!(store.fragment_count().unwrap(), 1);
///
/// store.delete(&path).unwrap();
/// assert!(store.is_empty());
/// ```
#[derive(Debug)]
pub struct InMemoryStore {
    root: BTreeMap<String, Node>,
    prune_empty_dirs: bool,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Creates a new empty store with pruning enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: BTreeMap::new(),
            prune_empty_dirs: true,
        }
    }

    /// Sets whether `delete` removes shard directories it leaves empty.
    #[must_use]
    pub fn with_pruning(mut self, prune: bool) -> Self {
        self.prune_empty_dirs = prune;
        self
    }

    /// Returns true if the root holds nothing at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Places raw bytes at an explicit relative path, bypassing identifier
    /// generation.
    ///
    /// Useful for seeding malformed or stray records in tests. Intermediate
    /// directories are created as needed; an existing record is replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is empty or an intermediate component is
    /// already a record.
    pub fn insert_raw(&mut self, path: &FragmentPath, bytes: Vec<u8>) -> StorageResult<()> {
        let segments: Vec<&str> = path.segments().collect();
        let Some((leaf, dirs)) = segments.split_last() else {
            return Err(StorageError::Write {
                path: path.as_path().to_path_buf(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "empty fragment path"),
            });
        };

        let level = descend_creating(&mut self.root, dirs, path)?;
        level.insert((*leaf).to_string(), Node::Record(bytes));
        Ok(())
    }
}

/// Walks `dirs` from `level`, creating directories along the way.
fn descend_creating<'a>(
    mut level: &'a mut BTreeMap<String, Node>,
    dirs: &[&str],
    path: &FragmentPath,
) -> StorageResult<&'a mut BTreeMap<String, Node>> {
    for dir in dirs {
        let node = level
            .entry((*dir).to_string())
            .or_insert_with(|| Node::Dir(BTreeMap::new()));
        level = match node {
            Node::Dir(children) => children,
            Node::Record(_) => {
                return Err(StorageError::CreateDir {
                    path: path.as_path().to_path_buf(),
                    source: io::Error::new(
                        io::ErrorKind::AlreadyExists,
                        format!("'{dir}' is a fragment, not a directory"),
                    ),
                });
            }
        };
    }
    Ok(level)
}

/// Removes the record at `segments`, pruning emptied directories if asked.
///
/// Returns false if no record exists there.
fn remove_record(level: &mut BTreeMap<String, Node>, segments: &[&str], prune: bool) -> bool {
    match segments {
        [] => false,
        [leaf] => {
            if matches!(level.get(*leaf), Some(Node::Record(_))) {
                level.remove(*leaf);
                true
            } else {
                false
            }
        }
        [head, rest @ ..] => {
            let Some(Node::Dir(children)) = level.get_mut(*head) else {
                return false;
            };
            let removed = remove_record(children, rest, prune);
            if removed && prune && children.is_empty() {
                level.remove(*head);
            }
            removed
        }
    }
}

fn count_records(level: &BTreeMap<String, Node>) -> usize {
    level
        .values()
        .map(|node| match node {
            Node::Dir(children) => count_records(children),
            Node::Record(_) => 1,
        })
        .sum()
}

impl FragmentStore for InMemoryStore {
    fn write(&mut self, rng: &mut dyn RngCore, record: &[u8]) -> StorageResult<FragmentPath> {
        let relative = FragmentId::generate(rng).path();
        let segments: Vec<&str> = relative.segments().collect();
        let Some((leaf, dirs)) = segments.split_last() else {
            return Err(StorageError::NotFound(relative.clone()));
        };

        let level = descend_creating(&mut self.root, dirs, &relative)?;
        if level.contains_key(*leaf) {
            return Err(StorageError::Write {
                path: relative.as_path().to_path_buf(),
                source: io::Error::new(io::ErrorKind::AlreadyExists, "fragment exists"),
            });
        }
        level.insert((*leaf).to_string(), Node::Record(record.to_vec()));
        Ok(relative)
    }

    fn pick_random(
        &self,
        rng: &mut dyn RngCore,
    ) -> StorageResult<Option<(FragmentPath, Vec<u8>)>> {
        let mut level = &self.root;
        let mut relative = PathBuf::new();

        loop {
            if level.is_empty() {
                return Ok(None);
            }

            let selected = rng.gen_range(0..level.len());
            let Some((name, node)) = level.iter().nth(selected) else {
                return Ok(None);
            };
            relative.push(name);

            match node {
                Node::Dir(children) => level = children,
                Node::Record(bytes) => {
                    return Ok(Some((FragmentPath::from_relative(relative), bytes.clone())));
                }
            }
        }
    }

    fn delete(&mut self, path: &FragmentPath) -> StorageResult<()> {
        let segments: Vec<&str> = path.segments().collect();
        if remove_record(&mut self.root, &segments, self.prune_empty_dirs) {
            Ok(())
        } else {
            Err(StorageError::NotFound(path.clone()))
        }
    }

    fn fragment_count(&self) -> StorageResult<usize> {
        Ok(count_records(&self.root))
    }
}
