//! RNG module - uniform random piece generation
//!
//! Each spawn is an independent, uniform draw over the seven kinds. There is
//! no bag memory, so streaks and droughts are possible.
//!
//! Generators can be seeded for deterministic games (tests, replays) or seeded
//! from OS entropy for normal play.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::PieceKind;

/// Uniform piece generator
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    rng: StdRng,
    seed: Option<u64>,
}

impl PieceGenerator {
    /// Create a deterministic generator with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Create a generator seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            seed: None,
        }
    }

    /// Draw the next piece kind
    pub fn draw(&mut self) -> PieceKind {
        PieceKind::ALL[self.rng.gen_range(0..PieceKind::ALL.len())]
    }

    /// Seed this generator was created with, if any
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self::from_entropy()
    }
}
