//! Pseudo-random distances for automatic mode.
//!
//! Most readings are drawn uniformly from the base range. With
//! `obstacle_probability` a reading is instead drawn from the (closer)
//! obstacle range to simulate something approaching the bumper.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::AutomaticConfig;

/// Owned, explicitly seeded distance source.
#[derive(Debug, Clone)]
pub struct DistanceGenerator {
    rng: StdRng,
    base: (u32, u32),
    obstacle: (u32, u32),
    obstacle_probability: f64,
}

impl DistanceGenerator {
    /// Creates a generator; the same `seed` and config yield the same sequence.
    ///
    /// `config` is expected to have passed [`AutomaticConfig::validate`].
    pub fn from_seed(seed: u64, config: &AutomaticConfig) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            base: (config.base_min_cm, config.base_max_cm),
            obstacle: (config.obstacle_min_cm, config.obstacle_max_cm),
            obstacle_probability: config.obstacle_probability.clamp(0.0, 1.0),
        }
    }

    /// Draws the next distance in centimeters.
    pub fn next_distance(&mut self) -> f64 {
        let base = self.rng.gen_range(self.base.0..=self.base.1);
        // Independent draw, taken even when the base value ends up discarded.
        let distance = if self.rng.gen_bool(self.obstacle_probability) {
            self.rng.gen_range(self.obstacle.0..=self.obstacle.1)
        } else {
            base
        };
        f64::from(distance)
    }
}

impl Iterator for DistanceGenerator {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        Some(self.next_distance())
    }
}
