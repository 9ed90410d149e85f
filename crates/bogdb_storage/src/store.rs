//! Fragment store trait definition.

use crate::error::StorageResult;
use crate::id::FragmentPath;
use rand::RngCore;

/// A randomly keyed hierarchy of opaque fragment records.
///
/// Stores do not understand fragment headers or contents. BogDB core owns
/// the record format; a store only places, finds, and removes bytes.
///
/// # Invariants
///
/// - `write` always places a record at a freshly generated identifier
/// - `pick_random` never returns a record by key, only by random descent
/// - all randomness comes from the generator passed in by the caller
/// - `delete` removes exactly the record at `path`
///
/// # Implementors
///
/// - [`super::FileStore`] - The on-disk hierarchy
/// - [`super::InMemoryStore`] - For testing
pub trait FragmentStore: Send {
    /// Stores `record` under a fresh random identifier.
    ///
    /// Shard directories are created as needed. Returns the record's
    /// store-relative path.
    ///
    /// # Errors
    ///
    /// Returns an error if a shard directory cannot be created or the record
    /// cannot be written. An identifier collision is an error; existing
    /// records are never overwritten.
    fn write(&mut self, rng: &mut dyn RngCore, record: &[u8]) -> StorageResult<FragmentPath>;

    /// Descends from the root, choosing uniformly among the entries at each
    /// level, until a record is reached, then reads it in full.
    ///
    /// Returns `None` as soon as the descent reaches an empty directory.
    /// That is usually the root of an empty store, but may also be a shard
    /// directory left empty partway down.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be listed or the record
    /// cannot be read.
    fn pick_random(
        &self,
        rng: &mut dyn RngCore,
    ) -> StorageResult<Option<(FragmentPath, Vec<u8>)>>;

    /// Removes the record at `path`.
    ///
    /// Stores that prune also remove shard directories left empty by the
    /// removal, stopping at the first non-empty one. The root is never
    /// removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the record does not exist or cannot be removed,
    /// or if an emptied shard directory cannot be removed.
    fn delete(&mut self, path: &FragmentPath) -> StorageResult<()>;

    /// Counts the records currently in the store.
    ///
    /// This walks the whole tree and is meant for diagnostics and tests.
    ///
    /// # Errors
    ///
    /// Returns an error if any directory cannot be listed.
    fn fragment_count(&self) -> StorageResult<usize>;
}
