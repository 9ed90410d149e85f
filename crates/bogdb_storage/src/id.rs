//! Fragment identifiers and store-relative paths.

use rand::{Rng, RngCore};
use std::fmt;
use std::path::{Path, PathBuf};

/// Smallest identifier ever generated.
///
/// Keeps every decimal rendering at least [`SHARD_DEPTH`] digits long.
pub const MIN_FRAGMENT_ID: u64 = 100;

/// Number of single-character shard directories above each record.
pub const SHARD_DEPTH: usize = 3;

/// Random numeric identity of a stored fragment.
///
/// Identifiers are positional, not content-addressed: they decide where a
/// record lands in the hierarchy and nothing else.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FragmentId(u64);

impl FragmentId {
    /// Draws a fresh identifier uniformly from `[MIN_FRAGMENT_ID, u64::MAX)`.
    pub fn generate(rng: &mut dyn RngCore) -> Self {
        Self(rng.gen_range(MIN_FRAGMENT_ID..u64::MAX))
    }

    /// Creates an identifier from a raw value.
    ///
    /// Returns `None` for values below [`MIN_FRAGMENT_ID`].
    #[must_use]
    pub const fn from_u64(value: u64) -> Option<Self> {
        if value < MIN_FRAGMENT_ID {
            None
        } else {
            Some(Self(value))
        }
    }

    /// Returns the raw value.
    #[inline]
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Returns the decimal leaf name.
    #[must_use]
    pub fn name(&self) -> String {
        self.0.to_string()
    }

    /// Returns the store-relative path `d0/d1/d2/<name>`.
    #[must_use]
    pub fn path(&self) -> FragmentPath {
        let name = self.name();
        let mut path = PathBuf::new();
        for digit in name.chars().take(SHARD_DEPTH) {
            path.push(digit.to_string());
        }
        path.push(&name);
        FragmentPath(path)
    }
}

impl fmt::Debug for FragmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FragmentId({})", self.0)
    }
}

impl fmt::Display for FragmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Location of a record relative to the store root.
///
/// Paths produced by [`FragmentId::path`] always have the shape
/// `d0/d1/d2/<id>`, but a random descent reports whatever the tree actually
/// contains, so a path found on disk need not parse as an identifier.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FragmentPath(PathBuf);

impl FragmentPath {
    /// Wraps a store-relative path.
    #[must_use]
    pub fn from_relative(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// Returns the relative path.
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Returns the path components as strings, skipping non-UTF-8 ones.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0
            .components()
            .filter_map(|component| component.as_os_str().to_str())
    }

    /// Parses the leaf name back into an identifier, if it is one.
    #[must_use]
    pub fn fragment_id(&self) -> Option<FragmentId> {
        let leaf = self.0.file_name()?.to_str()?;
        leaf.parse::<u64>().ok().and_then(FragmentId::from_u64)
    }
}

impl fmt::Debug for FragmentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FragmentPath({})", self.0.display())
    }
}

impl fmt::Display for FragmentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn generated_ids_are_at_least_three_digits() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1000 {
            let id = FragmentId::generate(&mut rng);
            assert!(id.as_u64() >= MIN_FRAGMENT_ID);
            assert!(id.name().len() >= SHARD_DEPTH);
        }
    }

    #[test]
    fn same_seed_same_ids() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        for _ in 0..16 {
            assert_eq!(FragmentId::generate(&mut a), FragmentId::generate(&mut b));
        }
    }

    #[test]
    fn path_shards_on_leading_digits() {
        let id = FragmentId::from_u64(4_719_220_368).unwrap();
        let path = id.path();
        let segments: Vec<&str> = path.segments().collect();
        assert_eq!(segments, vec!["4", "7", "1", "4719220368"]);
    }

    #[test]
    fn small_values_rejected() {
        assert!(FragmentId::from_u64(99).is_none());
        assert!(FragmentId::from_u64(100).is_some());
    }

    #[test]
    fn path_parses_back_to_id() {
        let id = FragmentId::from_u64(123_456).unwrap();
        assert_eq!(id.path().fragment_id(), Some(id));
    }

    #[test]
    fn stray_leaf_is_not_an_id() {
        let path = FragmentPath::from_relative("1/2/3/notes.txt");
        assert_eq!(path.fragment_id(), None);
    }

    #[test]
    fn display_shows_relative_path() {
        let id = FragmentId::from_u64(987).unwrap();
        let expected = Path::new("9").join("8").join("7").join("987");
        assert_eq!(id.path().to_string(), expected.display().to_string());
    }

    proptest! {
        #[test]
        fn every_path_has_shard_depth_plus_leaf(value in MIN_FRAGMENT_ID..u64::MAX) {
            let id = FragmentId::from_u64(value).unwrap();
            let path = id.path();
            let segments: Vec<&str> = path.segments().collect();
            prop_assert_eq!(segments.len(), SHARD_DEPTH + 1);
            let name = id.name();
            prop_assert_eq!(segments[SHARD_DEPTH], name.as_str());
            for (depth, segment) in segments[..SHARD_DEPTH].iter().enumerate() {
                prop_assert_eq!(segment.len(), 1);
                prop_assert_eq!(segment.chars().next(), name.chars().nth(depth));
            }
        }
    }
}
