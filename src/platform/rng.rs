//! Random generators
//!
//! `PcgGenerator` is the production source: seeded, so a run can be replayed.
//! `SequenceGenerator` plays back fixed draws for tests.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::sim::RandomGenerator;

/// Seeded PCG generator
#[derive(Debug, Clone)]
pub struct PcgGenerator {
    seed: u64,
    rng: Pcg32,
}

impl PcgGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomGenerator for PcgGenerator {
    fn generate_probability(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Replays a fixed list of probabilities, cycling when exhausted
#[derive(Debug, Clone)]
pub struct SequenceGenerator {
    values: Vec<f64>,
    index: usize,
}

impl SequenceGenerator {
    /// Values are clamped into `[0, 1)`; an empty list always yields 0
    pub fn new(values: Vec<f64>) -> Self {
        let values = values
            .into_iter()
            .map(|v| v.clamp(0.0, 1.0 - f64::EPSILON))
            .collect();
        Self { values, index: 0 }
    }

    /// Number of draws taken so far
    pub fn draws(&self) -> usize {
        self.index
    }
}

impl RandomGenerator for SequenceGenerator {
    fn generate_probability(&mut self) -> f64 {
        if self.values.is_empty() {
            self.index += 1;
            return 0.0;
        }
        let value = self.values[self.index % self.values.len()];
        self.index += 1;
        value
    }
}
