//! # Random Sources
//!
//! Work item durations are jittered. The randomness is injected through
//! [`RandomSource`] so replays and tests can run on a deterministic sequence.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniformly distributed integers
pub trait RandomSource: Send {
    /// Uniform value in `[0, bound)`. Returns 0 when `bound` is 0.
    fn next_below(&mut self, bound: u64) -> u64;
}

/// Per-call `thread_rng()`; the default outside of tests
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_below(&mut self, bound: u64) -> u64 {
        if bound == 0 {
            return 0;
        }
        rand::thread_rng().gen_range(0..bound)
    }
}

/// Reproducible source seeded from configuration
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_below(&mut self, bound: u64) -> u64 {
        if bound == 0 {
            return 0;
        }
        self.rng.gen_range(0..bound)
    }
}

/// Cycles through a fixed list of values, each reduced modulo the bound
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    values: Vec<u64>,
    position: usize,
}

impl SequenceRandom {
    pub fn new(values: impl Into<Vec<u64>>) -> Self {
        Self {
            values: values.into(),
            position: 0,
        }
    }
}

impl RandomSource for SequenceRandom {
    fn next_below(&mut self, bound: u64) -> u64 {
        if bound == 0 || self.values.is_empty() {
            return 0;
        }
        let value = self.values[self.position % self.values.len()];
        self.position = self.position.wrapping_add(1);
        value % bound
    }
}

/// Jittered duration, uniform over `[mean / 2, mean / 2 + mean)`
pub fn jittered_duration<R: RandomSource + ?Sized>(mean_duration_ms: u64, random: &mut R) -> u64 {
    (mean_duration_ms / 2).saturating_add(random.next_below(mean_duration_ms))
}
