//! Injectable random sources
//!
//! Every random decision of a run (Bernoulli transmission draws, resensing
//! delays, backoff slots) goes through [`RandomSource`], so a run is a pure
//! function of its configuration and the source it is handed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Fresh 32-byte seed drawn from OS-backed entropy
pub fn entropy_seed() -> [u8; 32] {
    let mut seed = [0u8; 32];
    rand::thread_rng().fill(&mut seed);
    seed
}

/// Source of uniform values in `[0, 1)`
pub trait RandomSource {
    /// Next uniform value in `[0, 1)`
    fn next_uniform(&mut self) -> f64;

    /// True with probability `p`
    fn bernoulli(&mut self, p: f64) -> bool {
        self.next_uniform() < p
    }

    /// Uniform integer in `[lo, hi]`
    fn uniform_int(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        let span = (hi - lo) as f64 + 1.0;
        let offset = (self.next_uniform() * span) as u32;
        lo + offset.min(hi - lo)
    }
}

/// [`RandomSource`] backed by a seeded `StdRng`
pub struct StdRandomSource {
    rng: StdRng,
    seed: [u8; 32],
}

impl StdRandomSource {
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            rng: StdRng::from_seed(seed),
            seed,
        }
    }

    /// Fresh source with a seed drawn from entropy
    pub fn from_entropy() -> Self {
        Self::from_seed(entropy_seed())
    }

    pub fn seed(&self) -> [u8; 32] {
        self.seed
    }
}

impl RandomSource for StdRandomSource {
    fn next_uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Replays a fixed list of values, cycling when exhausted
///
/// Values are clamped into `[0, 1)`. An empty list always yields `0.0`.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<f64>,
    position: usize,
}

impl SequenceSource {
    pub fn new(values: Vec<f64>) -> Self {
        let values = values
            .into_iter()
            .map(|v| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0 - f64::EPSILON) })
            .collect();
        Self {
            values,
            position: 0,
        }
    }

    /// Source that always yields the same value
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// Number of values consumed so far
    pub fn consumed(&self) -> usize {
        self.position
    }
}

impl RandomSource for SequenceSource {
    fn next_uniform(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.position % self.values.len()];
        self.position += 1;
        value
    }
}
