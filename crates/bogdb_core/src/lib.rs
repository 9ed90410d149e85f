//! # BogDB Core
//!
//! The interment and exhumation engine for BogDB.
//!
//! BogDB is a store that forgets. Data handed to [`Bog::inter`] is split
//! into randomly sized fragments and buried separately. [`Bog::exhume`]
//! digs up one fragment at random, splits it again, hands back one corroded
//! piece, and buries the rest. The older a fragment is, the more it
//! corrodes. Nothing links fragments together, so nothing can be
//! reassembled.
//!
//! This crate provides:
//! - [`Bog`], the engine, with injectable store, clock, and seed
//! - [`fragmenter`], random contiguous splitting
//! - [`corrosion`], age-driven code point mutation
//! - [`Fragment`] and its on-disk record format

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod bog;
mod clock;
mod config;
pub mod corrosion;
mod error;
mod fragment;
pub mod fragmenter;

pub use bog::Bog;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Config, DEFAULT_ROOT};
pub use error::{CoreError, CoreResult, ParseError};
pub use fragment::{encode_record, format_timestamp, Fragment};

/// Re-exported storage types.
pub use bogdb_storage::{FragmentPath, FragmentStore, StorageError};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
