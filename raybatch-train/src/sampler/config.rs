//! Sampling configuration.

use serde::{Deserialize, Serialize};

/// Rays drawn per batch when no size is given.
pub const DEFAULT_BATCH_SIZE: usize = 4096;

/// Configuration for a [`RayGenerator`](crate::sampler::RayGenerator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Seed for the generator-owned rng. `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// Batch size used by [`RayGenerator::next_batch`](crate::sampler::RayGenerator::next_batch).
    pub batch_size: usize,
}

impl GeneratorConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: None,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}
