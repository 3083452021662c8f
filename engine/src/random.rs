// ═══════════════════════════════════════════════════════════════════════
// Deterministic random source
//
// A small linear-congruential generator. Every shuffle and role
// assignment in a game derives from one of these, so a whole game is
// reproducible from its seed.
// ═══════════════════════════════════════════════════════════════════════

use serde::{Deserialize, Serialize};

const MULTIPLIER: u64 = 9301;
const INCREMENT: u64 = 49297;
const MODULUS: u64 = 233_280;

/// Upper bound (exclusive) for seeds derived from a parent generator.
pub const DERIVED_SEED_RANGE: u64 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeededRandom {
    state: u64,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        // (a*s + c) mod m only depends on s mod m.
        SeededRandom { state: seed % MODULUS }
    }

    /// Seed from the thread RNG, for games created without a seed.
    pub fn from_entropy() -> Self {
        Self::new(rand::random::<u32>() as u64)
    }

    /// Next value in [0, 1).
    pub fn random(&mut self) -> f64 {
        self.state = (self.state * MULTIPLIER + INCREMENT) % MODULUS;
        self.state as f64 / MODULUS as f64
    }

    /// Integer in [min, max).
    pub fn random_int(&mut self, min: u64, max: u64) -> u64 {
        debug_assert!(max > min);
        (self.random() * (max - min) as f64).floor() as u64 + min
    }

    /// Seed for a child generator.
    pub fn derive_seed(&mut self) -> u64 {
        self.random_int(0, DERIVED_SEED_RANGE)
    }
}

/// In-place Fisher–Yates pass, walking from the tail.
pub fn shuffle<T>(items: &mut [T], rng: &mut SeededRandom) {
    for i in (1..items.len()).rev() {
        let j = rng.random_int(0, i as u64 + 1) as usize;
        items.swap(i, j);
    }
}

/// Shuffle with a fresh generator seeded from `seed`.
pub fn shuffle_seeded<T>(items: &mut [T], seed: u64) {
    let mut rng = SeededRandom::new(seed);
    shuffle(items, &mut rng);
}
