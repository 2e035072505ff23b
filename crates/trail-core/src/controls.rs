//! Keyboard controls shared by the front-ends.
//!
//! Hosts translate their native key events into a key string, look up the
//! action here and apply it to their own mutable config copy. The engine
//! never sees these edits until the next `tick` snapshot.

use crate::config::{EffectConfig, BLUR_RANGE, PARTICLES_PER_FRAME_RANGE};

pub const BLUR_STEP: f32 = 1.0;
pub const PARTICLES_STEP: u32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlAction {
    ToggleTrail,
    CycleShape,
    CycleBlendMode,
    BlurDown,
    BlurUp,
    FewerParticles,
    MoreParticles,
    TogglePause,
    ToggleAudio,
}

#[inline]
pub fn action_for_key(key: &str) -> Option<ControlAction> {
    match key {
        "t" | "T" => Some(ControlAction::ToggleTrail),
        "s" | "S" => Some(ControlAction::CycleShape),
        "b" | "B" => Some(ControlAction::CycleBlendMode),
        "[" => Some(ControlAction::BlurDown),
        "]" => Some(ControlAction::BlurUp),
        "-" => Some(ControlAction::FewerParticles),
        "=" | "+" => Some(ControlAction::MoreParticles),
        "p" | "P" | " " => Some(ControlAction::TogglePause),
        "a" | "A" => Some(ControlAction::ToggleAudio),
        _ => None,
    }
}

/// Apply `action` to the host-owned config and pause flag.
pub fn apply_action(action: ControlAction, cfg: &mut EffectConfig, paused: &mut bool) {
    match action {
        ControlAction::ToggleTrail => cfg.trail_enabled = !cfg.trail_enabled,
        ControlAction::CycleShape => cfg.shape = cfg.shape.cycled(),
        ControlAction::CycleBlendMode => cfg.blend_mode = cfg.blend_mode.cycled(),
        ControlAction::BlurDown => {
            cfg.blur = (cfg.blur - BLUR_STEP).max(*BLUR_RANGE.start());
        }
        ControlAction::BlurUp => {
            cfg.blur = (cfg.blur + BLUR_STEP).min(*BLUR_RANGE.end());
        }
        ControlAction::FewerParticles => {
            cfg.particles_per_frame = cfg
                .particles_per_frame
                .saturating_sub(PARTICLES_STEP)
                .max(*PARTICLES_PER_FRAME_RANGE.start());
        }
        ControlAction::MoreParticles => {
            cfg.particles_per_frame = (cfg.particles_per_frame + PARTICLES_STEP)
                .min(*PARTICLES_PER_FRAME_RANGE.end());
        }
        ControlAction::TogglePause => *paused = !*paused,
        ControlAction::ToggleAudio => cfg.audio_enabled = !cfg.audio_enabled,
    }
    log::info!(
        "[controls] {:?}: trail={} shape={} blend={} blur={} ppf={} audio={} paused={}",
        action,
        cfg.trail_enabled,
        cfg.shape,
        cfg.blend_mode,
        cfg.blur,
        cfg.particles_per_frame,
        cfg.audio_enabled,
        paused
    );
}
