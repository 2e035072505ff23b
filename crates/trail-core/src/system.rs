//! The particle pool.

use crate::config::EffectConfig;
use crate::noise_field::NoiseField;
use crate::particle::Particle;
use crate::vector::{random_unit_square, Vector2, VectorOps};
use rand::prelude::*;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Owns every live particle. Insertion order is paint order.
pub struct ParticleSystem {
    particles: Vec<Particle>,
    rng: StdRng,
}

impl ParticleSystem {
    pub fn new(seed: u64) -> Self {
        Self {
            particles: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Append `count` particles scattered around `origin`.
    ///
    /// Offsets are unit-square samples scaled by `spread`, so the cloud sits
    /// to the lower-right of `origin` rather than centred on it.
    pub fn spawn(&mut self, count: usize, origin: Vector2, cfg: &EffectConfig) {
        self.particles.reserve(count);
        for _ in 0..count {
            let mut position = random_unit_square(&mut self.rng);
            position.multiply_in_place(cfg.spread).add_in_place(origin);
            let base_velocity = random_unit_square(&mut self.rng);
            let p = Particle::spawn(position, base_velocity, cfg, &mut self.rng);
            self.particles.push(p);
        }
    }

    /// Prune particles that died on the previous pass, then update the rest.
    pub fn step(&mut self, field: &NoiseField, elapsed_sec: f64, cfg: &EffectConfig) {
        self.particles.retain(|p| !p.is_dead());
        #[cfg(feature = "parallel")]
        self.particles
            .par_iter_mut()
            .for_each(|p| p.update(field, elapsed_sec, cfg));
        #[cfg(not(feature = "parallel"))]
        for p in &mut self.particles {
            p.update(field, elapsed_sec, cfg);
        }
    }

    /// Visit particles in insertion order.
    pub fn for_each_alive(&self, mut visit: impl FnMut(&Particle)) {
        for p in &self.particles {
            visit(p);
        }
    }
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_adds_exactly_count() {
        let mut sys = ParticleSystem::new(1);
        let cfg = EffectConfig::default();
        sys.spawn(7, Vector2::new(50.0, 50.0), &cfg);
        assert_eq!(sys.len(), 7);
        sys.spawn(3, Vector2::new(50.0, 50.0), &cfg);
        assert_eq!(sys.len(), 10);
    }

    #[test]
    fn spawn_positions_lie_in_spread_square() {
        let mut sys = ParticleSystem::new(2);
        let cfg = EffectConfig {
            spread: 20.0,
            ..Default::default()
        };
        let origin = Vector2::new(300.0, 200.0);
        sys.spawn(200, origin, &cfg);
        sys.for_each_alive(|p| {
            let off = p.position - origin;
            assert!(off.x >= 0.0 && off.x <= 20.0);
            assert!(off.y >= 0.0 && off.y <= 20.0);
        });
    }

    #[test]
    fn first_step_keeps_fresh_particles() {
        let mut sys = ParticleSystem::new(3);
        let cfg = EffectConfig::default().sanitized();
        let field = NoiseField::new(3);
        sys.spawn(10, Vector2::ZERO, &cfg);
        sys.step(&field, 0.0, &cfg);
        assert_eq!(sys.len(), 10);
        sys.for_each_alive(|p| assert_eq!(p.age(), 1));
    }

    #[test]
    fn visit_order_is_insertion_order() {
        let mut sys = ParticleSystem::new(4);
        let cfg = EffectConfig::default();
        sys.spawn(1, Vector2::new(0.0, 0.0), &cfg);
        sys.spawn(1, Vector2::new(1000.0, 0.0), &cfg);
        let mut xs = Vec::new();
        sys.for_each_alive(|p| xs.push(p.position.x));
        assert!(xs[0] < xs[1]);
    }
}
