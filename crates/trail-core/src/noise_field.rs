//! Seeded coherent noise used as the particle flow field.

use crate::constants::{NOISE_SPATIAL_FREQUENCY, NOISE_TEMPORAL_FREQUENCY};
use crate::vector::Vector2;
use noise::{NoiseFn, Simplex};

/// Deterministic 3D simplex sampler returning a steering value in `[-1, 1]`.
///
/// Two fields built from the same seed return identical samples for the same
/// `(position, elapsed)` pair.
#[derive(Clone, Debug)]
pub struct NoiseField {
    noise: Simplex,
    seed: u32,
}

impl NoiseField {
    pub fn new(seed: u32) -> Self {
        Self {
            noise: Simplex::new(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Raw noise at an already-scaled coordinate triple.
    #[inline]
    pub fn noise3(&self, x: f64, y: f64, t: f64) -> f32 {
        self.noise.get([x, y, t]).clamp(-1.0, 1.0) as f32
    }

    /// Steering value for a particle at `position` after `elapsed_sec` seconds.
    #[inline]
    pub fn sample(&self, position: Vector2, elapsed_sec: f64) -> f32 {
        self.noise3(
            position.x as f64 * NOISE_SPATIAL_FREQUENCY,
            position.y as f64 * NOISE_SPATIAL_FREQUENCY,
            elapsed_sec * NOISE_TEMPORAL_FREQUENCY,
        )
    }
}

impl Default for NoiseField {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_samples() {
        let a = NoiseField::new(11);
        let b = NoiseField::new(11);
        for i in 0..64 {
            let p = Vector2::new(i as f32 * 13.7, i as f32 * -5.1);
            let t = i as f64 * 0.37;
            assert_eq!(a.sample(p, t), b.sample(p, t));
        }
    }

    #[test]
    fn samples_stay_in_unit_range() {
        let field = NoiseField::new(3);
        for i in 0..500 {
            let v = field.noise3(i as f64 * 0.173, i as f64 * 0.071, i as f64 * 0.013);
            assert!((-1.0..=1.0).contains(&v), "sample {v} out of range");
        }
    }

    #[test]
    fn field_varies_over_space() {
        let field = NoiseField::new(5);
        let first = field.sample(Vector2::new(10.0, 10.0), 0.0);
        let differs = (1..50).any(|i| {
            let p = Vector2::new(10.0 + i as f32 * 40.0, 10.0 + i as f32 * 25.0);
            (field.sample(p, 0.0) - first).abs() > 1e-4
        });
        assert!(differs);
    }
}
