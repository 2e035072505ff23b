//! Orbiting spawn anchor.

use crate::audio::AudioLevels;
use crate::config::EffectConfig;
use crate::vector::Vector2;

/// `1 + (bass·bass_influence + treble·treble_influence)·reactivity`, or 1
/// when there is no signal or audio is switched off.
pub fn audio_multiplier(levels: Option<AudioLevels>, cfg: &EffectConfig) -> f32 {
    match levels {
        Some(l) if cfg.audio_enabled => {
            1.0 + (l.bass * cfg.bass_influence + l.treble * cfg.treble_influence) * cfg.reactivity
        }
        _ => 1.0,
    }
}

/// Stateless emitter: the anchor is a pure function of elapsed time, the
/// orbit settings and the current audio levels.
#[derive(Clone, Copy, Debug, Default)]
pub struct Emitter;

impl Emitter {
    /// Anchor on a circle of radius `orbit_radius · multiplier` around the
    /// viewport center, at angle `elapsed_sec · orbit_speed`.
    pub fn anchor(
        &self,
        elapsed_sec: f64,
        viewport: (u32, u32),
        cfg: &EffectConfig,
        levels: Option<AudioLevels>,
    ) -> Vector2 {
        let center = Vector2::new(viewport.0 as f32 / 2.0, viewport.1 as f32 / 2.0);
        // reduce in f64 so long sessions keep full f32 precision
        let angle = (elapsed_sec * cfg.orbit_speed as f64).rem_euclid(std::f64::consts::TAU) as f32;
        let radius = cfg.orbit_radius * audio_multiplier(levels, cfg);
        center + Vector2::new(angle.cos(), angle.sin()) * radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_anchor_starts_to_the_right_of_center() {
        let cfg = EffectConfig::default();
        let a = Emitter.anchor(0.0, (800, 600), &cfg, None);
        assert!((a.x - (400.0 + cfg.orbit_radius)).abs() < 1e-4);
        assert!((a.y - 300.0).abs() < 1e-4);
    }

    #[test]
    fn quarter_turn_after_half_pi_seconds() {
        let cfg = EffectConfig::default();
        let a = Emitter.anchor(std::f64::consts::FRAC_PI_2, (800, 600), &cfg, None);
        assert!((a.x - 400.0).abs() < 1e-3);
        assert!((a.y - (300.0 + cfg.orbit_radius)).abs() < 1e-3);
    }

    #[test]
    fn multiplier_weights_bands() {
        let cfg = EffectConfig {
            reactivity: 2.0,
            bass_influence: 0.5,
            treble_influence: 1.5,
            ..Default::default()
        };
        let m = audio_multiplier(
            Some(AudioLevels {
                bass: 0.4,
                treble: 0.2,
            }),
            &cfg,
        );
        assert!((m - (1.0 + (0.2 + 0.3) * 2.0)).abs() < 1e-6);
        assert_eq!(audio_multiplier(None, &cfg), 1.0);
    }

    #[test]
    fn disabled_audio_ignores_levels() {
        let cfg = EffectConfig {
            audio_enabled: false,
            reactivity: 2.0,
            ..Default::default()
        };
        let loud = Some(AudioLevels {
            bass: 1.0,
            treble: 1.0,
        });
        assert_eq!(audio_multiplier(loud, &cfg), 1.0);
        assert_eq!(
            Emitter.anchor(3.0, (640, 480), &cfg, loud),
            Emitter.anchor(3.0, (640, 480), &cfg, None)
        );
    }

    #[test]
    fn long_sessions_stay_on_the_orbit_phase() {
        let cfg = EffectConfig::default();
        let turns = 40_000.0 * std::f64::consts::TAU;
        let late = Emitter.anchor(turns + 0.5, (800, 600), &cfg, None);
        let early = Emitter.anchor(0.5, (800, 600), &cfg, None);
        assert!((late - early).length() < 1e-2, "{late} vs {early}");
    }
}
