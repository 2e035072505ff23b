//! Two-buffer trail compositor.
//!
//! The ephemeral buffer holds only the current frame's particles. The
//! persistent buffer is what the viewer sees: each frame it is partially
//! faded toward the background, then the ephemeral buffer is blurred,
//! brightened and blended on top. Fading before compositing is what leaves
//! the trail; reversing the order would erase the new frame instead.

use crate::color::Rgb;
use crate::config::EffectConfig;
use crate::constants::COMPOSITE_BRIGHTNESS;
use crate::raster::Raster;
use crate::system::ParticleSystem;

pub struct Compositor {
    ephemeral: Raster,
    persistent: Raster,
}

impl Compositor {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            ephemeral: Raster::new(width, height),
            persistent: Raster::new(width, height),
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.persistent.width(), self.persistent.height())
    }

    /// Reallocate and clear both buffers.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.ephemeral.resize(width, height);
        self.persistent.resize(width, height);
    }

    /// Free both buffers.
    pub fn release(&mut self) {
        self.ephemeral.release();
        self.persistent.release();
    }

    /// The visible image.
    pub fn frame(&self) -> &Raster {
        &self.persistent
    }

    /// Current frame's particles; blurred and brightened once composited.
    pub fn ephemeral(&self) -> &Raster {
        &self.ephemeral
    }

    /// Step 1: background at `trail_alpha` with trails on, opaque otherwise.
    pub fn fade(&mut self, cfg: &EffectConfig) {
        let alpha = if cfg.trail_enabled {
            cfg.trail_alpha
        } else {
            1.0
        };
        self.persistent.fill(Rgb::from(cfg.background), alpha);
    }

    /// Step 2: clear the ephemeral buffer and paint every live particle.
    pub fn redraw(&mut self, system: &ParticleSystem, cfg: &EffectConfig) {
        self.ephemeral.clear();
        let target = &mut self.ephemeral;
        system.for_each_alive(|p| p.draw(target, cfg));
    }

    /// Step 3: blur, brighten and blend the ephemeral buffer onto the screen.
    pub fn composite(&mut self, cfg: &EffectConfig) {
        self.ephemeral.blur(cfg.blur);
        self.ephemeral.brighten(COMPOSITE_BRIGHTNESS);
        self.ephemeral.draw_onto(&mut self.persistent, cfg.blend_mode);
    }

    /// All three steps in their required order.
    pub fn render(&mut self, system: &ParticleSystem, cfg: &EffectConfig) {
        self.fade(cfg);
        self.redraw(system, cfg);
        self.composite(cfg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BlendMode, Rgb8};
    use crate::noise_field::NoiseField;
    use crate::vector::Vector2;

    fn populated(seed: u64) -> ParticleSystem {
        let cfg = EffectConfig::default();
        let mut sys = ParticleSystem::new(seed);
        sys.spawn(20, Vector2::new(40.0, 40.0), &cfg);
        sys.step(&NoiseField::new(1), 0.0, &cfg);
        sys
    }

    #[test]
    fn resize_reallocates_and_clears() {
        let mut c = Compositor::new(10, 10);
        c.fade(&EffectConfig::default());
        c.resize(20, 5);
        assert_eq!(c.size(), (20, 5));
        assert!(c.frame().pixels().iter().all(|p| *p == [0.0; 4]));
        assert_eq!(c.ephemeral().width(), 20);
    }

    #[test]
    fn trails_disabled_leaves_no_residue() {
        let cfg = EffectConfig {
            trail_enabled: false,
            ..Default::default()
        };
        let sys = populated(5);

        let mut dirty = Compositor::new(100, 100);
        dirty.fade(&EffectConfig {
            background: Rgb8 { r: 250, g: 10, b: 90 },
            ..cfg.clone()
        });
        dirty.render(&populated(77), &cfg);
        dirty.render(&sys, &cfg);

        let mut fresh = Compositor::new(100, 100);
        fresh.render(&sys, &cfg);

        assert_eq!(dirty.frame(), fresh.frame());
    }

    #[test]
    fn trails_enabled_keep_a_ghost() {
        let cfg = EffectConfig::default();
        let mut c = Compositor::new(100, 100);
        c.render(&populated(5), &cfg);
        let lit: Vec<usize> = c
            .frame()
            .pixels()
            .iter()
            .enumerate()
            .filter(|(_, p)| p[0] > 0.3)
            .map(|(i, _)| i)
            .collect();
        assert!(!lit.is_empty());

        c.render(&ParticleSystem::new(0), &cfg);
        let bg = Rgb::from(cfg.background);
        let ghost = lit
            .iter()
            .any(|&i| c.frame().pixels()[i][0] > bg.r + 0.05);
        assert!(ghost, "previous frame vanished despite trails");
    }

    #[test]
    fn empty_frame_converges_to_background() {
        let cfg = EffectConfig {
            trail_alpha: 0.9,
            ..Default::default()
        };
        let mut c = Compositor::new(8, 8);
        let empty = ParticleSystem::new(0);
        for _ in 0..20 {
            c.render(&empty, &cfg);
        }
        let bg = Rgb::from(cfg.background);
        for p in c.frame().pixels() {
            assert!((p[0] - bg.r).abs() < 1e-4);
            assert!((p[3] - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn blend_mode_changes_result() {
        let sys = populated(9);
        let mut normal = Compositor::new(100, 100);
        let mut diff = Compositor::new(100, 100);
        normal.render(&sys, &EffectConfig::default());
        diff.render(
            &sys,
            &EffectConfig {
                blend_mode: BlendMode::Difference,
                ..Default::default()
            },
        );
        assert_ne!(normal.frame(), diff.frame());
    }
}
