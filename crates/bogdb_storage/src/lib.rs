//! # BogDB Storage
//!
//! The fragment store for BogDB.
//!
//! A store holds **opaque fragment records** in a shallow, randomly keyed
//! hierarchy. Every record gets a fresh random numeric [`FragmentId`]; the
//! first three digits of its decimal form become three nested directories
//! and the full string is the leaf name:
//!
//! ```text
//! <root>/
//! ├─ 4/
//! │  └─ 7/
//! │     └─ 1/
//! │        └─ 4719220368547758071
//! └─ 9/
//!    └─ ...
//! ```
//!
//! There is no index. A record can only be found again by a random descent
//! through the tree, so nobody (the store included) can target a specific
//! record.
//!
//! ## Design Principles
//!
//! - Stores are opaque: they never interpret record bytes
//! - All randomness is supplied by the caller's generator
//! - Stores are single-actor; every mutating call takes `&mut self`
//!
//! ## Available Stores
//!
//! - [`FileStore`] - The on-disk directory hierarchy
//! - [`InMemoryStore`] - The same tree held in memory, for tests
//!
//! ## Example
//!
//! ```rust
//! use bogdb_storage::{FragmentStore, InMemoryStore};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let mut store = InMemoryStore::new();
//! let path = store.write(&mut rng, b"peat").unwrap();
//!
//! let (picked, bytes) = store.pick_random(&mut rng).unwrap().unwrap();
//! assert_eq!(picked, path);
//! assert_eq!(bytes, b"peat");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod file;
mod id;
mod memory;
mod store;

pub use error::{StorageError, StorageResult};
pub use file::FileStore;
pub use id::{FragmentId, FragmentPath, MIN_FRAGMENT_ID, SHARD_DEPTH};
pub use memory::InMemoryStore;
pub use store::FragmentStore;
