// Host-side tests for the emitter orbit and the full frame pipeline.

use std::time::Duration;
use trail_core::constants::SPECTRUM_BINS;
use trail_core::*;

#[test]
fn anchor_distance_matches_orbit_radius_times_multiplier() {
    let viewport = (1024, 768);
    let center = Vector2::new(512.0, 384.0);
    let cfg = EffectConfig {
        orbit_speed: 1.7,
        orbit_radius: 220.0,
        reactivity: 0.8,
        ..Default::default()
    };
    let levels = [
        None,
        Some(AudioLevels { bass: 0.0, treble: 0.0 }),
        Some(AudioLevels { bass: 0.5, treble: 0.1 }),
        Some(AudioLevels { bass: 1.0, treble: 1.0 }),
    ];
    for lv in levels {
        let expected = cfg.orbit_radius * audio_multiplier(lv, &cfg);
        for i in 0..200 {
            let t = i as f64 * 0.137;
            let anchor = Emitter.anchor(t, viewport, &cfg, lv);
            let dist = (anchor - center).length();
            assert!(
                (dist - expected).abs() < 1e-3,
                "t={t}: distance {dist} expected {expected}"
            );
        }
    }
}

#[test]
fn spectrum_levels_push_the_orbit_outward() {
    let cfg = EffectConfig::default();
    let mut spectrum = [0u8; SPECTRUM_BINS];
    spectrum[..10].fill(255);
    let levels = AudioLevels::from_spectrum(&spectrum, cfg.bass_band, cfg.treble_band);
    assert_eq!(levels.bass, 1.0);
    assert_eq!(levels.treble, 0.0);
    assert!((audio_multiplier(Some(levels), &cfg) - 2.0).abs() < 1e-6);
}

#[test]
fn disabled_trails_frame_equals_fresh_opaque_redraw() {
    let trails = EffectConfig::default();
    let no_trails = EffectConfig {
        trail_enabled: false,
        ..Default::default()
    };
    let mut engine = Engine::new(160, 120, 11);
    for _ in 0..6 {
        engine.tick(Duration::from_millis(16), &trails, None);
    }
    engine.tick(Duration::from_millis(16), &no_trails, None);

    let mut fresh = Compositor::new(160, 120);
    fresh.render(engine.system(), &no_trails);
    assert_eq!(engine.frame(), fresh.frame());
}

#[test]
fn inverted_life_span_config_still_renders() {
    let cfg = EffectConfig {
        min_life_span: 90,
        max_life_span: 10,
        spread: -5.0,
        ..Default::default()
    };
    let mut engine = Engine::new(200, 200, 5);
    for _ in 0..3 {
        assert!(engine.tick(Duration::from_millis(16), &cfg, None));
    }
    for p in engine.system().particles() {
        assert_eq!(p.life_span(), 90);
    }
}

#[test]
fn exported_frame_is_opaque_after_trails_settle() {
    let cfg = EffectConfig {
        trail_alpha: 0.9,
        ..Default::default()
    };
    let mut engine = Engine::new(64, 48, 3);
    for _ in 0..30 {
        engine.tick(Duration::from_millis(16), &cfg, None);
    }
    let img = engine.frame().to_rgba8();
    assert_eq!(img.dimensions(), (64, 48));
    assert!(img.pixels().all(|p| p.0[3] == 255));
}
