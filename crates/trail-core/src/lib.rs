//! Flow-field particle trails.
//!
//! Particles spawn around an orbiting anchor, drift along a seeded noise
//! field and are composited frame over frame into a fading, blurred,
//! blend-moded image. Hosts drive everything through [`Engine`]:
//! `tick` once per frame, `resize` on viewport changes, `stop` to release.

pub mod audio;
pub mod blend;
pub mod color;
pub mod compositor;
pub mod config;
pub mod constants;
pub mod controls;
pub mod emitter;
pub mod engine;
pub mod error;
pub mod noise_field;
pub mod particle;
pub mod raster;
pub mod system;
pub mod vector;

pub use audio::*;
pub use compositor::Compositor;
pub use config::*;
pub use controls::{action_for_key, apply_action, ControlAction};
pub use emitter::*;
pub use engine::Engine;
pub use error::ConfigError;
pub use noise_field::NoiseField;
pub use particle::Particle;
pub use raster::Raster;
pub use system::ParticleSystem;
pub use vector::*;
