//! Injectable random source
//!
//! The sequencer never touches a global RNG; it asks a `RandomSource`
//! so tests can script exact draws.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
#[cfg(any(test, feature = "test-util"))]
use std::collections::VecDeque;

/// Uniform index source
pub trait RandomSource {
    /// Uniform value in `[0, upper)`; 0 when `upper` is 0
    fn below(&mut self, upper: usize) -> usize;
}

/// `StdRng`-backed source
#[derive(Debug, Clone)]
pub struct EntropyRandom {
    rng: StdRng,
}

impl EntropyRandom {
    /// Seed from operating system entropy
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for EntropyRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for EntropyRandom {
    fn below(&mut self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        self.rng.gen_range(0..upper)
    }
}

/// Replays a fixed list of draws, each reduced modulo `upper`
///
/// Once the script runs out every draw is 0. Only built for tests and
/// the `test-util` feature.
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    draws: VecDeque<usize>,
}

#[cfg(any(test, feature = "test-util"))]
impl ScriptedRandom {
    pub fn new(draws: impl IntoIterator<Item = usize>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
        }
    }

    /// Draws not yet consumed
    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

#[cfg(any(test, feature = "test-util"))]
impl RandomSource for ScriptedRandom {
    fn below(&mut self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        self.draws.pop_front().unwrap_or(0) % upper
    }
}
