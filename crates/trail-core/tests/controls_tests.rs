// Host-side tests for keyboard controls applied to the host config store.

use trail_core::*;

#[test]
fn action_for_key_known_keys() {
    assert_eq!(action_for_key("t"), Some(ControlAction::ToggleTrail));
    assert_eq!(action_for_key("T"), Some(ControlAction::ToggleTrail));
    assert_eq!(action_for_key("s"), Some(ControlAction::CycleShape));
    assert_eq!(action_for_key("b"), Some(ControlAction::CycleBlendMode));
    assert_eq!(action_for_key("["), Some(ControlAction::BlurDown));
    assert_eq!(action_for_key("]"), Some(ControlAction::BlurUp));
    assert_eq!(action_for_key("-"), Some(ControlAction::FewerParticles));
    assert_eq!(action_for_key("="), Some(ControlAction::MoreParticles));
    assert_eq!(action_for_key("+"), Some(ControlAction::MoreParticles));
    assert_eq!(action_for_key(" "), Some(ControlAction::TogglePause));
    assert_eq!(action_for_key("a"), Some(ControlAction::ToggleAudio));
}

#[test]
fn action_for_key_unknown_keys() {
    for key in ["x", "Escape", "1", "", "tt"] {
        assert_eq!(action_for_key(key), None, "key {key:?}");
    }
}

#[test]
fn toggles_flip_back_and_forth() {
    let mut cfg = EffectConfig::default();
    let mut paused = false;
    apply_action(ControlAction::ToggleTrail, &mut cfg, &mut paused);
    assert!(!cfg.trail_enabled);
    apply_action(ControlAction::ToggleTrail, &mut cfg, &mut paused);
    assert!(cfg.trail_enabled);
    apply_action(ControlAction::TogglePause, &mut cfg, &mut paused);
    assert!(paused);
}

#[test]
fn muting_audio_pins_the_orbit_radius() {
    let mut cfg = EffectConfig::default();
    let mut paused = false;
    let loud = Some(AudioLevels { bass: 1.0, treble: 0.5 });
    assert!(audio_multiplier(loud, &cfg) > 1.0);

    apply_action(ControlAction::ToggleAudio, &mut cfg, &mut paused);
    assert!(!cfg.audio_enabled);
    assert_eq!(audio_multiplier(loud, &cfg), 1.0);
    assert!(!cfg.sanitized().audio_enabled);

    apply_action(ControlAction::ToggleAudio, &mut cfg, &mut paused);
    assert!(audio_multiplier(loud, &cfg) > 1.0);
}

#[test]
fn blur_and_particle_steps_stay_in_range() {
    let mut cfg = EffectConfig::default();
    let mut paused = false;
    for _ in 0..30 {
        apply_action(ControlAction::BlurUp, &mut cfg, &mut paused);
        apply_action(ControlAction::MoreParticles, &mut cfg, &mut paused);
    }
    assert_eq!(cfg.blur, 20.0);
    assert_eq!(cfg.particles_per_frame, 40);
    for _ in 0..30 {
        apply_action(ControlAction::BlurDown, &mut cfg, &mut paused);
        apply_action(ControlAction::FewerParticles, &mut cfg, &mut paused);
    }
    assert_eq!(cfg.blur, 0.0);
    assert_eq!(cfg.particles_per_frame, 1);
    assert_eq!(cfg.sanitized(), cfg);
}

#[test]
fn cycling_changes_shape_and_blend() {
    let mut cfg = EffectConfig::default();
    let mut paused = false;
    apply_action(ControlAction::CycleShape, &mut cfg, &mut paused);
    assert_eq!(cfg.shape, Shape::Square);
    apply_action(ControlAction::CycleBlendMode, &mut cfg, &mut paused);
    assert_eq!(cfg.blend_mode, BlendMode::Lighter);
}
