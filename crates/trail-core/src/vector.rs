//! 2D vector helpers on top of [`glam::Vec2`].
//!
//! `Vec2` is `Copy`, so every particle owns its position and velocity by value
//! and no two particles can ever share one. The chainable in-place operations
//! below mirror the arithmetic the simulation needs; pure forms come from
//! glam's operator impls.

use glam::Vec2;
use rand::Rng;

pub type Vector2 = Vec2;

/// In-place, chainable arithmetic for [`Vector2`].
pub trait VectorOps {
    fn add_in_place(&mut self, other: Vector2) -> &mut Self;
    fn subtract_in_place(&mut self, other: Vector2) -> &mut Self;
    fn multiply_in_place(&mut self, scalar: f32) -> &mut Self;
    fn divide_in_place(&mut self, scalar: f32) -> &mut Self;
    /// Divide by the magnitude; leaves a zero-length vector untouched.
    fn normalize_in_place(&mut self) -> &mut Self;
    fn magnitude(&self) -> f32;
}

impl VectorOps for Vector2 {
    #[inline]
    fn add_in_place(&mut self, other: Vector2) -> &mut Self {
        self.x += other.x;
        self.y += other.y;
        self
    }

    #[inline]
    fn subtract_in_place(&mut self, other: Vector2) -> &mut Self {
        self.x -= other.x;
        self.y -= other.y;
        self
    }

    #[inline]
    fn multiply_in_place(&mut self, scalar: f32) -> &mut Self {
        self.x *= scalar;
        self.y *= scalar;
        self
    }

    #[inline]
    fn divide_in_place(&mut self, scalar: f32) -> &mut Self {
        self.x /= scalar;
        self.y /= scalar;
        self
    }

    fn normalize_in_place(&mut self) -> &mut Self {
        let m = VectorOps::magnitude(self);
        if m == 0.0 {
            return self;
        }
        self.divide_in_place(m)
    }

    #[inline]
    fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

/// Pure normalize with the same zero guard as [`VectorOps::normalize_in_place`].
#[inline]
pub fn normalized(v: Vector2) -> Vector2 {
    let mut out = v;
    out.normalize_in_place();
    out
}

/// Each component uniform in `[0, 1)`.
///
/// Not a uniform direction: every sample lies in the positive quadrant, which
/// skews spawn offsets and inherited velocities toward +x/+y.
#[inline]
pub fn random_unit_square<R: Rng + ?Sized>(rng: &mut R) -> Vector2 {
    Vector2::new(rng.gen::<f32>(), rng.gen::<f32>())
}
