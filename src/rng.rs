//! Seedable randomness for question generation and cosmetic effects.
//!
//! Tests pin the seed so every question sequence is reproducible; the browser
//! build seeds from `crypto.getRandomValues` through `getrandom`.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::round::RandomSource;

/// ChaCha8-backed RNG that remembers its seed for logging and replay.
#[derive(Clone, Debug)]
pub struct SeededRandom {
    inner: ChaCha8Rng,
    seed: u64,
}

impl SeededRandom {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed from the platform entropy source. Falls back to a fixed seed when
    /// entropy is unavailable so the game still runs.
    #[must_use]
    pub fn from_entropy() -> Self {
        let mut buf = [0u8; 8];
        match getrandom::getrandom(&mut buf) {
            Ok(()) => Self::new(u64::from_le_bytes(buf)),
            Err(e) => {
                log::warn!("entropy unavailable ({e}), using fixed seed");
                Self::new(0x5EED_CAFE)
            }
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform float in `[0, 1)`.
    pub fn unit(&mut self) -> f64 {
        self.inner.gen_range(0.0..1.0)
    }

    /// Uniform float in `[low, high)`.
    pub fn range_f64(&mut self, low: f64, high: f64) -> f64 {
        low + self.unit() * (high - low)
    }

    /// Uniform index in `0..len`; 0 for an empty range.
    pub fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.inner.gen_range(0..len)
    }
}

impl RandomSource for SeededRandom {
    fn next_int(&mut self, min_inclusive: i64, max_inclusive: i64) -> i64 {
        if max_inclusive <= min_inclusive {
            return min_inclusive;
        }
        self.inner.gen_range(min_inclusive..=max_inclusive)
    }
}
