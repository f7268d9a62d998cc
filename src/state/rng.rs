//! Injectable randomness.
//!
//! Prefix selection draws twice from a [`RandomSource`]: once per candidate suffix
//! (acceptance draw) and once for the fallback letter. Production code uses the
//! seedable [`GameRng`]; tests replay exact draws with [`ScriptedRng`].

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Source of uniform random values.
pub trait RandomSource {
    /// Uniform value in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Uniform index in `[0, len)`. `len` must be non-zero.
    fn pick_index(&mut self, len: usize) -> usize {
        let idx = (self.next_f64() * len as f64).floor() as usize;
        idx.min(len.saturating_sub(1))
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }

    fn pick_index(&mut self, len: usize) -> usize {
        (**self).pick_index(len)
    }
}

/// Seedable ChaCha8 generator.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an RNG seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng().gen())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

impl RandomSource for GameRng {
    fn next_f64(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    fn pick_index(&mut self, len: usize) -> usize {
        self.inner.gen_range(0..len)
    }
}

/// Serializable RNG state, so a session can be replayed from a checkpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}

/// Replays queued values.
///
/// When the draw queue runs dry `next_f64` returns a value just below 1.0, which
/// rejects every candidate suffix whose probability is below 1. An empty pick
/// queue yields index 0.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRng {
    draws: VecDeque<f64>,
    picks: VecDeque<usize>,
}

impl ScriptedRng {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue acceptance draws.
    pub fn with_draws(mut self, draws: impl IntoIterator<Item = f64>) -> Self {
        self.draws.extend(draws);
        self
    }

    /// Queue fallback indices.
    pub fn with_picks(mut self, picks: impl IntoIterator<Item = usize>) -> Self {
        self.picks.extend(picks);
        self
    }

    /// Draws not yet consumed.
    pub fn remaining_draws(&self) -> usize {
        self.draws.len()
    }
}

impl RandomSource for ScriptedRng {
    fn next_f64(&mut self) -> f64 {
        self.draws.pop_front().unwrap_or(1.0 - f64::EPSILON)
    }

    fn pick_index(&mut self, len: usize) -> usize {
        self.picks
            .pop_front()
            .unwrap_or(0)
            .min(len.saturating_sub(1))
    }
}
