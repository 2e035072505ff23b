//! A single flow-field particle and its draw contract.

use crate::color::{hsl_to_rgb, Rgb};
use crate::config::{EffectConfig, Shape};
use crate::constants::{
    DECAY_MAX, DECAY_MIN, INHERITED_VELOCITY_SCALE, JITTER_SPEED_MAX, JITTER_SPEED_MIN,
    LIGHTNESS_MAX, LIGHTNESS_SPAN, ROTATION_SCALE, STEERING_FORCE,
};
use crate::noise_field::NoiseField;
use crate::raster::Raster;
use crate::vector::{random_unit_square, Vector2, VectorOps};
use rand::Rng;
use smallvec::{smallvec, SmallVec};

/// Simulated entity with an age-driven lifecycle.
///
/// `Alive -> Dead` is one-way: once `age > life_span` the particle ignores
/// further updates and waits for the pool to prune it.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub position: Vector2,
    pub velocity: Vector2,
    age: u32,
    life_span: u32,
    decay: f32,
    hue: f32,
    radius: f32,
    rotation: f32,
    is_dead: bool,
}

impl Particle {
    /// Particle with fully specified parameters; `life_span` is raised to 1.
    pub fn new(
        position: Vector2,
        velocity: Vector2,
        life_span: u32,
        decay: f32,
        hue: f32,
        size: f32,
    ) -> Self {
        Self {
            position,
            velocity,
            age: 0,
            life_span: life_span.max(1),
            decay,
            hue,
            radius: size.max(0.0),
            rotation: 0.0,
            is_dead: false,
        }
    }

    /// Randomized particle as spawned by the pool.
    ///
    /// - life span: integer uniform in `[min_life_span, max_life_span]`
    /// - velocity: `base_velocity * 0.25` plus a unit-square jitter scaled by `[1, 3)`
    /// - decay: uniform in `[0.95, 0.99)`
    /// - hue: integer uniform in `base ± hue_variation`
    pub fn spawn<R: Rng + ?Sized>(
        position: Vector2,
        base_velocity: Vector2,
        cfg: &EffectConfig,
        rng: &mut R,
    ) -> Self {
        let min = cfg.min_life_span;
        let max = cfg.max_life_span.max(min);
        let life_span = rng.gen_range(min..=max);

        let mut jitter = random_unit_square(rng);
        jitter.multiply_in_place(rng.gen_range(JITTER_SPEED_MIN..JITTER_SPEED_MAX));
        let mut velocity = base_velocity;
        velocity
            .multiply_in_place(INHERITED_VELOCITY_SCALE)
            .add_in_place(jitter);

        let decay = rng.gen_range(DECAY_MIN..DECAY_MAX);

        let hue_lo = (cfg.color.h - cfg.hue_variation).ceil() as i32;
        let hue_hi = ((cfg.color.h + cfg.hue_variation).floor() as i32).max(hue_lo);
        let hue = rng.gen_range(hue_lo..=hue_hi) as f32;

        Self::new(position, velocity, life_span, decay, hue, cfg.size)
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn life_span(&self) -> u32 {
        self.life_span
    }

    pub fn decay(&self) -> f32 {
        self.decay
    }

    pub fn hue(&self) -> f32 {
        self.hue
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn is_dead(&self) -> bool {
        self.is_dead
    }

    /// `1 - age / life_span`: ~1 at birth, 0 at end of life, negative once dead.
    #[inline]
    pub fn age_percent(&self) -> f32 {
        1.0 - self.age as f32 / self.life_span as f32
    }

    /// Advance one fixed simulation step.
    pub fn update(&mut self, field: &NoiseField, elapsed_sec: f64, cfg: &EffectConfig) {
        if self.is_dead {
            return;
        }
        self.age += 1;
        let n = field.sample(self.position, elapsed_sec);
        let steering = n * cfg.randomness;
        let age_percent = self.age_percent();
        if self.age > self.life_span {
            self.is_dead = true;
        }

        // steering grows as the particle ages
        let mut perturbation = Vector2::new(steering.cos(), steering.sin());
        perturbation
            .multiply_in_place(STEERING_FORCE)
            .multiply_in_place(1.0 - age_percent);
        self.velocity.add_in_place(perturbation);
        self.position.add_in_place(self.velocity);
        self.velocity.multiply_in_place(self.decay);

        self.radius = (cfg.size * age_percent).max(0.0);
        self.rotation = n * ROTATION_SCALE;
    }

    /// Fill lightness in percent. Young particles are dark, old ones light.
    #[inline]
    pub fn lightness(&self) -> f32 {
        LIGHTNESS_MAX - self.age_percent() * LIGHTNESS_SPAN
    }

    pub fn fill_color(&self, cfg: &EffectConfig) -> Rgb {
        hsl_to_rgb(self.hue, cfg.color.s * 100.0, self.lightness())
    }

    /// Outline vertices in raster space; empty for circles.
    pub fn outline(&self, shape: Shape) -> SmallVec<[Vector2; 4]> {
        let h = self.radius / 2.0;
        let local: SmallVec<[Vector2; 4]> = match shape {
            Shape::Circle => SmallVec::new(),
            Shape::Square => smallvec![
                Vector2::new(-h, -h),
                Vector2::new(h, -h),
                Vector2::new(h, h),
                Vector2::new(-h, h),
            ],
            // apex up
            Shape::Triangle => smallvec![
                Vector2::new(0.0, -h),
                Vector2::new(h, h),
                Vector2::new(-h, h),
            ],
        };
        let rot = Vector2::from_angle(self.rotation);
        local
            .into_iter()
            .map(|p| self.position + rot.rotate(p))
            .collect()
    }

    /// Draw into `target`. Does not mutate the particle.
    pub fn draw(&self, target: &mut Raster, cfg: &EffectConfig) {
        if self.radius <= 0.0 {
            return;
        }
        let color = self.fill_color(cfg);
        match cfg.shape {
            Shape::Circle => target.fill_circle(self.position, self.radius, color),
            shape => target.fill_convex_polygon(&self.outline(shape), color),
        }
    }
}
