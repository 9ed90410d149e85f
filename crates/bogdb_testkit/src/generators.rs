//! Property-based test generators using proptest.

use proptest::prelude::*;

/// Strategy for arbitrary non-empty payloads up to `max_len` bytes.
pub fn arb_payload(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 1..=max_len.max(1))
}

/// Strategy for printable ASCII text, so every byte is one character.
pub fn arb_ascii_text(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(0x20u8..0x7f, 1..=max_len.max(1))
}

/// Strategy for seeds.
pub fn arb_seed() -> impl Strategy<Value = u64> {
    any::<u64>()
}

/// An operation against a bog.
#[derive(Debug, Clone)]
pub enum BogOperation {
    /// Inter a payload.
    Inter(Vec<u8>),
    /// Exhume one fragment.
    Exhume,
    /// Move the clock forward by some seconds.
    Advance(i64),
}

/// Strategy for a single bog operation.
pub fn arb_operation() -> impl Strategy<Value = BogOperation> {
    prop_oneof![
        2 => arb_payload(64).prop_map(BogOperation::Inter),
        3 => Just(BogOperation::Exhume),
        1 => (1i64..1_000_000).prop_map(BogOperation::Advance),
    ]
}

/// Strategy for a sequence of bog operations.
pub fn arb_operations(max_len: usize) -> impl Strategy<Value = Vec<BogOperation>> {
    prop::collection::vec(arb_operation(), 0..=max_len)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Quick configuration for fast tests.
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Thorough configuration for comprehensive testing.
    pub fn thorough() -> Self {
        Self {
            cases: 1000,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
