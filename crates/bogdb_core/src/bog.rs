//! The bog: interment and exhumation.

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::corrosion::{corrode, intensity_for};
use crate::error::{CoreError, CoreResult};
use crate::fragment::{encode_record, Fragment};
use crate::fragmenter;
use bogdb_storage::{FileStore, FragmentPath, FragmentStore, InMemoryStore};
use chrono::{DateTime, SubsecRound, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace, warn};

/// A lossy, decaying fragment store.
///
/// `Bog` owns its fragment store, its clock, and its random source. Every
/// operation takes `&mut self`; one bog instance is one actor.
///
/// # Opening a Bog
///
/// ```rust,no_run
/// use bogdb_core::{Bog, Config};
///
/// let mut bog = Bog::open(Config::new().root("/tmp/bog"))?;
/// bog.inter(b"dear diary")?;
///
/// if let Some(fragment) = bog.exhume()? {
///     println!("{}", String::from_utf8_lossy(&fragment.contents));
/// }
/// # Ok::<(), bogdb_core::CoreError>(())
/// ```
///
/// # In-Memory Bogs
///
/// For testing, use [`Bog::open_in_memory`] with a
/// [`ManualClock`](crate::ManualClock).
pub struct Bog {
    config: Config,
    store: Box<dyn FragmentStore>,
    clock: Box<dyn Clock>,
    rng: StdRng,
}

impl Bog {
    /// Opens a bog on disk at `config.root`, using the system clock.
    ///
    /// # Errors
    ///
    /// Returns an error if the root exists but is not a directory, or
    /// cannot be created.
    pub fn open(config: Config) -> CoreResult<Self> {
        Self::open_with_clock(config, SystemClock)
    }

    /// Opens a bog on disk at `config.root` with the given clock.
    ///
    /// # Errors
    ///
    /// Returns an error if the root exists but is not a directory, or
    /// cannot be created.
    pub fn open_with_clock(config: Config, clock: impl Clock + 'static) -> CoreResult<Self> {
        if config.root.exists() && !config.root.is_dir() {
            return Err(CoreError::invalid_config(format!(
                "bog root is not a directory: {}",
                config.root.display()
            )));
        }

        let store = FileStore::open(&config.root)?.with_pruning(config.prune_empty_dirs);
        debug!(root = %config.root.display(), "opened bog");
        Ok(Self::open_with_store(config, Box::new(store), Box::new(clock)))
    }

    /// Opens a bog held entirely in memory.
    #[must_use]
    pub fn open_in_memory(config: Config, clock: impl Clock + 'static) -> Self {
        let store = InMemoryStore::new().with_pruning(config.prune_empty_dirs);
        Self::open_with_store(config, Box::new(store), Box::new(clock))
    }

    /// Opens a bog over an arbitrary store and clock.
    ///
    /// `config.root` is not consulted; the store decides where records live.
    #[must_use]
    pub fn open_with_store(
        config: Config,
        store: Box<dyn FragmentStore>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            store,
            clock,
            rng,
        }
    }

    /// Returns the configuration the bog was opened with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Counts the fragments currently buried.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be walked.
    pub fn fragment_count(&self) -> CoreResult<usize> {
        Ok(self.store.fragment_count()?)
    }

    /// Breaks `data` into fragments and buries each one separately.
    ///
    /// Every fragment is stamped with the current time. Empty input is a
    /// no-op, and empty pieces are never written.
    ///
    /// # Errors
    ///
    /// Returns the first storage failure. Fragments buried before it stay
    /// buried.
    pub fn inter(&mut self, data: &[u8]) -> CoreResult<()> {
        if data.is_empty() {
            trace!("nothing to inter");
            return Ok(());
        }

        let interred_at = self.now();
        let pieces = fragmenter::split(data, &mut self.rng);
        let mut buried = 0;
        for piece in pieces.iter().filter(|piece| !piece.is_empty()) {
            self.bury(piece, interred_at)?;
            buried += 1;
        }

        debug!(bytes = data.len(), pieces = pieces.len(), buried, "interred");
        Ok(())
    }

    /// Digs up one fragment at random.
    ///
    /// The fragment's record is removed and its contents split again. One
    /// piece, chosen at random and corroded according to the fragment's
    /// age, is returned; the others are buried again under the original
    /// timestamp, so their age keeps accumulating.
    ///
    /// Returns `Ok(None)` when the descent finds nothing to dig up. The
    /// store is not touched in that case.
    ///
    /// # Errors
    ///
    /// - [`CoreError::Storage`] if the store fails to list, read, or write
    /// - [`CoreError::Parse`] if the record's header is malformed; the
    ///   record is left where it was
    /// - [`CoreError::Unburied`] if the record cannot be removed; the error
    ///   carries the fragment as read
    pub fn exhume(&mut self) -> CoreResult<Option<Fragment>> {
        let Some((path, record)) = self.store.pick_random(&mut self.rng)? else {
            debug!("nothing to exhume");
            return Ok(None);
        };

        let fragment = Fragment::parse(&record).map_err(|source| CoreError::Parse {
            path: path.clone(),
            source,
        })?;

        if let Err(source) = self.store.delete(&path) {
            warn!(fragment = %path, error = %source, "exhumed fragment could not be removed");
            return Err(CoreError::Unburied {
                path,
                fragment: Box::new(fragment),
                source,
            });
        }

        if fragment.contents.is_empty() {
            debug!(fragment = %path, "exhumed an empty fragment");
            return Ok(Some(fragment));
        }

        let Fragment {
            interred_at,
            contents,
        } = fragment;
        let pieces = fragmenter::split(&contents, &mut self.rng);
        let kept = self.rng.gen_range(0..pieces.len());

        for (index, piece) in pieces.iter().enumerate() {
            if index != kept && !piece.is_empty() {
                self.bury(piece, interred_at)?;
            }
        }

        let intensity = intensity_for(interred_at, self.clock.now());
        let corroded = corrode(pieces[kept], intensity, &mut self.rng);

        debug!(
            fragment = %path,
            pieces = pieces.len(),
            kept = pieces[kept].len(),
            intensity,
            "exhumed"
        );
        Ok(Some(Fragment::new(interred_at, corroded)))
    }

    fn bury(&mut self, contents: &[u8], interred_at: DateTime<Utc>) -> CoreResult<FragmentPath> {
        let record = encode_record(interred_at, contents);
        let path = self.store.write(&mut self.rng, &record)?;
        trace!(fragment = %path, bytes = contents.len(), "buried");
        Ok(path)
    }

    /// The current time, cut to the whole seconds a record header can hold.
    fn now(&self) -> DateTime<Utc> {
        self.clock.now().trunc_subsecs(0)
    }
}

impl std::fmt::Debug for Bog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bog").field("config", &self.config).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use bogdb_storage::StorageError;
    use chrono::{Duration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 4, 1, 9, 30, 0).unwrap()
    }

    fn memory_bog(seed: u64) -> (Bog, ManualClock) {
        let clock = ManualClock::new(start());
        let bog = Bog::open_in_memory(Config::new().seed(seed), clock.clone());
        (bog, clock)
    }

    /// A store whose deletes always fail.
    struct StuckStore(InMemoryStore);

    impl FragmentStore for StuckStore {
        fn write(
            &mut self,
            rng: &mut dyn rand::RngCore,
            record: &[u8],
        ) -> bogdb_storage::StorageResult<FragmentPath> {
            self.0.write(rng, record)
        }

        fn pick_random(
            &self,
            rng: &mut dyn rand::RngCore,
        ) -> bogdb_storage::StorageResult<Option<(FragmentPath, Vec<u8>)>> {
            self.0.pick_random(rng)
        }

        fn delete(&mut self, path: &FragmentPath) -> bogdb_storage::StorageResult<()> {
            Err(StorageError::NotFound(path.clone()))
        }

        fn fragment_count(&self) -> bogdb_storage::StorageResult<usize> {
            self.0.fragment_count()
        }
    }

    #[test]
    fn inter_empty_writes_nothing() {
        let (mut bog, _) = memory_bog(1);
        bog.inter(b"").unwrap();
        assert_eq!(bog.fragment_count().unwrap(), 0);
    }

    #[test]
    fn inter_buries_at_least_one_fragment() {
        let (mut bog, _) = memory_bog(1);
        bog.inter(b"hello world").unwrap();
        assert!(bog.fragment_count().unwrap() >= 1);
    }

    #[test]
    fn exhume_empty_is_none() {
        let (mut bog, _) = memory_bog(1);
        assert!(bog.exhume().unwrap().is_none());
        assert_eq!(bog.fragment_count().unwrap(), 0);
    }

    #[test]
    fn fresh_exhume_is_uncorroded_slice() {
        let data = b"a long enough sentence to be split into several pieces";
        for seed in 0..32 {
            let (mut bog, _) = memory_bog(seed);
            bog.inter(data).unwrap();

            let fragment = bog.exhume().unwrap().unwrap();
            assert_eq!(fragment.interred_at, start());
            let contents = fragment.contents.as_slice();
            assert!(
                contents.is_empty() || data.windows(contents.len()).any(|window| window == contents)
            );
        }
    }

    #[test]
    fn sub_second_clock_is_truncated() {
        let clock = ManualClock::new(start() + Duration::milliseconds(400));
        let mut bog = Bog::open_in_memory(Config::new().seed(3), clock);
        bog.inter(b"tannin").unwrap();

        let fragment = bog.exhume().unwrap().unwrap();
        assert_eq!(fragment.interred_at, start());
    }

    #[test]
    fn reburied_pieces_keep_original_stamp() {
        let (mut bog, clock) = memory_bog(5);
        bog.inter(&[b'x'; 400]).unwrap();
        clock.advance(Duration::days(3));

        while let Some(fragment) = bog.exhume().unwrap() {
            assert_eq!(fragment.interred_at, start());
        }
    }

    #[test]
    fn exhuming_never_grows_the_total() {
        let (mut bog, _) = memory_bog(9);
        let data = vec![b'q'; 300];
        bog.inter(&data).unwrap();

        let mut returned = 0;
        while let Some(fragment) = bog.exhume().unwrap() {
            returned += fragment.contents.len();
        }
        assert_eq!(returned, data.len());
        assert_eq!(bog.fragment_count().unwrap(), 0);
    }

    /// Runs the same seed through a bare store, the fragmenter, and
    /// `corrode` in the order `inter` then `exhume` draw from the RNG.
    fn replay_inter_then_exhume(seed: u64, data: &[u8], intensity: u32) -> Vec<u8> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut store = InMemoryStore::new();

        for piece in fragmenter::split(data, &mut rng) {
            if !piece.is_empty() {
                store.write(&mut rng, &encode_record(start(), piece)).unwrap();
            }
        }

        let (path, record) = store.pick_random(&mut rng).unwrap().unwrap();
        let fragment = Fragment::parse(&record).unwrap();
        store.delete(&path).unwrap();

        let pieces = fragmenter::split(&fragment.contents, &mut rng);
        let kept = rng.gen_range(0..pieces.len());
        for (index, piece) in pieces.iter().enumerate() {
            if index != kept && !piece.is_empty() {
                store.write(&mut rng, &encode_record(start(), piece)).unwrap();
            }
        }

        corrode(pieces[kept], intensity, &mut rng)
    }

    #[test]
    fn aged_exhume_matches_replayed_corrosion() {
        let data = b"the peat keeps what it is given, more or less";
        for seed in 0..16 {
            let (mut bog, clock) = memory_bog(seed);
            bog.inter(data).unwrap();
            clock.advance(Duration::seconds(10_000));

            let fragment = bog.exhume().unwrap().unwrap();
            assert_eq!(
                fragment.contents,
                replay_inter_then_exhume(seed, data, 5),
                "seed {seed}"
            );
        }
    }

    #[test]
    fn aged_exhume_mutates_some_fragment() {
        let data = b"the peat keeps what it is given, more or less";
        let mutated = (0..16)
            .filter(|&seed| {
                let (mut bog, clock) = memory_bog(seed);
                bog.inter(data).unwrap();
                clock.advance(Duration::seconds(10_000));

                let contents = bog.exhume().unwrap().unwrap().contents;
                !contents.is_empty() && !data.windows(contents.len()).any(|w| w == contents)
            })
            .count();
        assert!(mutated > 0);
    }

    #[test]
    fn malformed_record_is_parse_error_and_stays() {
        let mut store = InMemoryStore::new();
        let path = FragmentPath::from_relative("1/2/3/123");
        store.insert_raw(&path, b"not a timestamp\nbody".to_vec()).unwrap();
        let mut bog = Bog::open_with_store(
            Config::new().seed(1),
            Box::new(store),
            Box::new(ManualClock::new(start())),
        );

        let err = bog.exhume().unwrap_err();
        assert!(matches!(err, CoreError::Parse { path: ref p, .. } if *p == path));
        assert_eq!(bog.fragment_count().unwrap(), 1);
    }

    #[test]
    fn headerless_record_is_parse_error() {
        let mut store = InMemoryStore::new();
        store
            .insert_raw(&FragmentPath::from_relative("stray"), b"no newline".to_vec())
            .unwrap();
        let mut bog = Bog::open_with_store(
            Config::new().seed(1),
            Box::new(store),
            Box::new(ManualClock::new(start())),
        );

        assert!(matches!(bog.exhume(), Err(CoreError::Parse { .. })));
    }

    #[test]
    fn failed_delete_hands_back_the_fragment() {
        let mut store = StuckStore(InMemoryStore::new());
        store
            .0
            .insert_raw(
                &FragmentPath::from_relative("4/5/6/456"),
                encode_record(start(), b"keep me"),
            )
            .unwrap();
        let mut bog = Bog::open_with_store(
            Config::new().seed(1),
            Box::new(store),
            Box::new(ManualClock::new(start())),
        );

        let err = bog.exhume().unwrap_err();
        assert!(matches!(err, CoreError::Unburied { .. }));
        let fragment = err.into_fragment().unwrap();
        assert_eq!(fragment.contents, b"keep me");
        assert_eq!(fragment.interred_at, start());
    }

    #[test]
    fn empty_fragment_comes_back_empty() {
        let mut store = InMemoryStore::new();
        store
            .insert_raw(
                &FragmentPath::from_relative("7/7/7/777"),
                encode_record(start(), b""),
            )
            .unwrap();
        let clock = ManualClock::new(start() + Duration::days(400));
        let mut bog =
            Bog::open_with_store(Config::new().seed(1), Box::new(store), Box::new(clock));

        let fragment = bog.exhume().unwrap().unwrap();
        assert!(fragment.contents.is_empty());
        assert_eq!(bog.fragment_count().unwrap(), 0);
    }

    #[test]
    fn same_seed_same_history() {
        let run = |seed| {
            let (mut bog, clock) = memory_bog(seed);
            bog.inter(b"it was a dark and stormy night in the fens").unwrap();
            clock.advance(Duration::seconds(12_345));
            let mut out = Vec::new();
            while let Some(fragment) = bog.exhume().unwrap() {
                out.push(fragment.contents);
            }
            out
        };
        assert_eq!(run(77), run(77));
    }

    #[test]
    fn open_rejects_file_root() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        std::fs::write(&file, b"x").unwrap();

        let result = Bog::open(Config::new().root(&file));
        assert!(matches!(result, Err(CoreError::InvalidConfig { .. })));
    }

    #[test]
    fn open_creates_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("bog");
        let bog = Bog::open(Config::new().root(&root).seed(1)).unwrap();
        assert!(root.is_dir());
        assert_eq!(bog.config().root, root);
    }
}
