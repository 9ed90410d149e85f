//! Bog configuration.

use std::path::PathBuf;

/// Default location of the bog.
pub const DEFAULT_ROOT: &str = "/tmp/bog";

/// Configuration for opening a bog.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory of the fragment hierarchy.
    pub root: PathBuf,

    /// Seed for the random source. `None` seeds from OS entropy.
    ///
    /// A fixed seed fixes every choice the bog makes: identifiers, split
    /// points, descent choices, and corrosion targets.
    pub seed: Option<u64>,

    /// Whether deleting a fragment removes shard directories it empties.
    pub prune_empty_dirs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
            seed: None,
            prune_empty_dirs: true,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory.
    #[must_use]
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Sets a fixed random seed.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets whether emptied shard directories are pruned.
    #[must_use]
    pub fn prune_empty_dirs(mut self, value: bool) -> Self {
        self.prune_empty_dirs = value;
        self
    }
}
