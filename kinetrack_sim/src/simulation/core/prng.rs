// kinetrack_sim/src/simulation/core/prng.rs

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;

/// A newtype wrapper around `ChaCha8Rng`.
/// This is the central, deterministic pseudo-random number generator for a run.
/// It is created once and only ever touched by the Gaussian sampler.
#[derive(Debug, Clone)]
pub struct SimulationRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl SimulationRng {
    /// Seeds the generator. Without an explicit seed one is derived from the
    /// wall clock; the chosen value is kept so the run can be replayed.
    pub fn from_seed(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| {
            let seed = wall_clock_seed();
            warn!(seed, "no seed configured, using wall-clock seed");
            seed
        });
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }
}

fn wall_clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}
