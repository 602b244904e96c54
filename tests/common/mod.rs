//! Shared helpers for the integration tests.

#![allow(dead_code)]

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Install a test logger once; later calls are no-ops.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Deterministic RNG for test data and channel losses.
pub fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// `symbols` random buffers of `symbol_size` bytes.
pub fn random_symbols(rng: &mut ChaCha8Rng, symbols: usize, symbol_size: usize) -> Vec<Vec<u8>> {
    (0..symbols)
        .map(|_| (0..symbol_size).map(|_| rng.gen()).collect())
        .collect()
}

/// Upper bound on payloads a test will generate before giving up.
pub fn payload_budget(symbols: usize) -> usize {
    symbols * 40 + 100
}
