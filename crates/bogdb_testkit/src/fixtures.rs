//! Test fixtures and bog helpers.
//!
//! Provides bogs with a fixed seed and a stopped clock, so tests control
//! every random choice and every second of fragment age.

use bogdb_core::{Bog, Config, ManualClock};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::path::Path;
use tempfile::TempDir;

/// The instant every test clock starts at.
pub fn test_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 2, 29, 12, 0, 0)
        .single()
        .expect("valid epoch")
}

/// A test bog with a manual clock and automatic cleanup.
pub struct TestBog {
    /// The bog instance.
    pub bog: Bog,
    /// Handle on the bog's clock.
    pub clock: ManualClock,
    /// The temporary directory (kept alive to prevent cleanup).
    _temp_dir: Option<TempDir>,
}

impl TestBog {
    /// Creates an in-memory bog seeded with `seed`.
    pub fn memory(seed: u64) -> Self {
        let clock = ManualClock::new(test_epoch());
        Self {
            bog: Bog::open_in_memory(Config::new().seed(seed), clock.clone()),
            clock,
            _temp_dir: None,
        }
    }

    /// Creates a bog in a fresh temporary directory, seeded with `seed`.
    pub fn file(seed: u64) -> Self {
        Self::file_with_config(Config::new().seed(seed))
    }

    /// Creates a bog in a fresh temporary directory with `config`.
    ///
    /// `config.root` is replaced with the temporary directory.
    pub fn file_with_config(config: Config) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let clock = ManualClock::new(test_epoch());
        let bog = Bog::open_with_clock(config.root(temp_dir.path()), clock.clone())
            .expect("Failed to open file bog");

        Self {
            bog,
            clock,
            _temp_dir: Some(temp_dir),
        }
    }

    /// Returns the bog root if file-based, None if in-memory.
    pub fn root(&self) -> Option<&Path> {
        self._temp_dir.as_ref().map(TempDir::path)
    }

    /// Moves the bog's clock forward by `seconds`.
    pub fn advance_secs(&self, seconds: i64) {
        self.clock.advance(Duration::seconds(seconds));
    }

    /// Exhumes until the bog reports empty, returning every fragment's
    /// contents in order.
    ///
    /// Panics if any exhumation fails or more than `limit` fragments come
    /// up.
    pub fn drain(&mut self, limit: usize) -> Vec<Vec<u8>> {
        let mut out = Vec::new();
        while let Some(fragment) = self.bog.exhume().expect("Failed to exhume") {
            out.push(fragment.contents);
            assert!(out.len() <= limit, "bog did not drain within {limit} exhumations");
        }
        out
    }
}

impl std::ops::Deref for TestBog {
    type Target = Bog;

    fn deref(&self) -> &Self::Target {
        &self.bog
    }
}

impl std::ops::DerefMut for TestBog {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.bog
    }
}

/// Runs a test with a temporary in-memory bog.
///
/// # Example
///
/// ```rust
/// use bogdb_testkit::with_memory_bog;
///
/// with_memory_bog(1, |bog| {
///     bog.inter(b"peat").unwrap();
///     assert!(bog.exhume().unwrap().is_some());
/// });
/// ```
pub fn with_memory_bog<F, R>(seed: u64, f: F) -> R
where
    F: FnOnce(&mut TestBog) -> R,
{
    let mut test_bog = TestBog::memory(seed);
    f(&mut test_bog)
}

/// Runs a test with a bog in a temporary directory.
pub fn with_file_bog<F, R>(seed: u64, f: F) -> R
where
    F: FnOnce(&mut TestBog, &Path) -> R,
{
    let mut test_bog = TestBog::file(seed);
    let root = test_bog
        .root()
        .expect("File bog should have a root")
        .to_path_buf();
    f(&mut test_bog, &root)
}
