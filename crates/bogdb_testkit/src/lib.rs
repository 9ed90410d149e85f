//! # BogDB Testkit
//!
//! Test utilities for BogDB.
//!
//! This crate provides:
//! - Bogs on temporary directories or in memory, with a manual clock
//! - Property-based test generators using proptest
//! - Helpers for walking a bog's on-disk layout
//!
//! ## Usage
//!
//! ```rust
//! use bogdb_testkit::prelude::*;
//!
//! let mut bog = TestBog::file(7);
//! bog.inter(b"hello world").unwrap();
//!
//! let records = buried_records(bog.root().unwrap()).unwrap();
//! assert!(!records.is_empty());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod layout;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::layout::*;
}

pub use fixtures::*;
pub use generators::*;
pub use layout::*;
