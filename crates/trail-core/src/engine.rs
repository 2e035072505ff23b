//! Frame driver hosts call once per display refresh.

use crate::audio::{AudioLevels, LevelSource};
use crate::compositor::Compositor;
use crate::config::EffectConfig;
use crate::emitter::Emitter;
use crate::noise_field::NoiseField;
use crate::raster::Raster;
use crate::system::ParticleSystem;
use std::time::Duration;

/// Per-frame driver tying emitter, particle pool and compositor together.
///
/// The host owns the loop and calls [`Engine::tick`] once per display
/// refresh with the time since the previous call. Simulation advances one
/// fixed step per tick; `dt` only moves the emitter and the flow field.
pub struct Engine {
    system: ParticleSystem,
    field: NoiseField,
    emitter: Emitter,
    compositor: Compositor,
    elapsed: Duration,
    frame_index: u64,
    running: bool,
    warned_config: bool,
}

impl Engine {
    pub fn new(width: u32, height: u32, seed: u64) -> Self {
        let (width, height) = clamp_viewport(width, height);
        // separate streams for spawning and the flow field
        let noise_seed = (seed ^ 0x9E37_79B9_7F4A_7C15).wrapping_mul(0xBF58_476D_1CE4_E5B9) >> 32;
        Self {
            system: ParticleSystem::new(seed),
            field: NoiseField::new(noise_seed as u32),
            emitter: Emitter,
            compositor: Compositor::new(width, height),
            elapsed: Duration::ZERO,
            frame_index: 0,
            running: true,
            warned_config: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn particle_count(&self) -> usize {
        self.system.len()
    }

    pub fn system(&self) -> &ParticleSystem {
        &self.system
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.compositor.size()
    }

    /// The composited image shown to the viewer.
    pub fn frame(&self) -> &Raster {
        self.compositor.frame()
    }

    /// Reallocate both buffers; also re-arms an engine that was stopped.
    pub fn resize(&mut self, width: u32, height: u32) {
        let (width, height) = clamp_viewport(width, height);
        log::debug!("[engine] resize {}x{}", width, height);
        self.compositor.resize(width, height);
        self.running = true;
    }

    /// Release buffers and particles. Ticks are ignored until `resize`.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        log::debug!(
            "[engine] stop after {} frames ({} particles dropped)",
            self.frame_index,
            self.system.len()
        );
        self.system.clear();
        self.compositor.release();
        self.running = false;
    }

    /// Advance one frame and redraw. Returns `false` when stopped.
    pub fn tick(&mut self, dt: Duration, config: &EffectConfig, levels: Option<AudioLevels>) -> bool {
        if !self.running {
            return false;
        }
        let cfg = config.sanitized();
        if cfg != *config && !self.warned_config {
            log::warn!("[engine] config out of range; clamped values are used");
            self.warned_config = true;
        }

        self.elapsed += dt;
        self.frame_index += 1;
        let elapsed_sec = self.elapsed.as_secs_f64();

        let anchor = self
            .emitter
            .anchor(elapsed_sec, self.compositor.size(), &cfg, levels);
        self.system
            .spawn(cfg.particles_per_frame as usize, anchor, &cfg);
        self.system.step(&self.field, elapsed_sec, &cfg);
        self.compositor.render(&self.system, &cfg);
        true
    }

    /// [`Engine::tick`] with levels polled from `source`.
    pub fn tick_with_source(
        &mut self,
        dt: Duration,
        config: &EffectConfig,
        source: &mut dyn LevelSource,
    ) -> bool {
        let levels = source.poll_levels();
        self.tick(dt, config, levels)
    }
}

fn clamp_viewport(width: u32, height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        log::warn!("[engine] zero-sized viewport {}x{}; using 1x1 minimum", width, height);
    }
    (width.max(1), height.max(1))
}
