//! Injectable randomness.
//!
//! Match setup draws every random choice through [`Randomizer`], so tests can
//! swap in deterministic fakes and replays can reseed the production PRNG.

// Randomizer math uses intentional integer/float casts
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]

/// Source of random choices for match setup.
pub trait Randomizer {
    /// Return a permutation of `items`. The input slice is left untouched.
    fn shuffle<T: Clone>(&mut self, items: &[T]) -> Vec<T>;

    /// Uniform float in `[0, 1)`.
    fn random(&mut self) -> f64;

    /// Uniform integer in `[min, max]`, inclusive on both ends.
    ///
    /// A reversed range is treated as `[max, min]`.
    fn random_int(&mut self, min: i64, max: i64) -> i64;
}

/// Deterministic PRNG using xorshift64.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeededRandomizer {
    state: u64,
}

impl SeededRandomizer {
    /// Create a new randomizer with the given seed.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        // Ensure non-zero state
        let state = if seed == 0 { 0x5555_5555_5555_5555 } else { seed };
        Self { state }
    }

    /// Generate next random u64.
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

impl Randomizer for SeededRandomizer {
    fn shuffle<T: Clone>(&mut self, items: &[T]) -> Vec<T> {
        let mut shuffled = items.to_vec();
        // Fisher-Yates, walking down from the last slot
        for i in (1..shuffled.len()).rev() {
            let j = self.random_int(0, i as i64) as usize;
            shuffled.swap(i, j);
        }
        shuffled
    }

    fn random(&mut self) -> f64 {
        // Top 53 bits fill the f64 mantissa exactly
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn random_int(&mut self, min: i64, max: i64) -> i64 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        let span = (i128::from(hi) - i128::from(lo) + 1) as u128;
        let offset = u128::from(self.next_u64()) % span;
        (i128::from(lo) + offset as i128) as i64
    }
}
