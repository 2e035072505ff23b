//! Live-tunable effect configuration.
//!
//! The simulation only ever sees an immutable [`EffectConfig`] snapshot per
//! frame. Hosts keep their own mutable copy (edited by keyboard or a control
//! panel) and pass `&config` into [`crate::Engine::tick`].

use crate::constants::{DEFAULT_BASS_BAND, DEFAULT_TREBLE_BAND};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Particle outline drawn into the ephemeral buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    #[default]
    Circle,
    Square,
    Triangle,
}

impl Shape {
    pub const ALL: [Shape; 3] = [Shape::Circle, Shape::Square, Shape::Triangle];

    pub fn name(self) -> &'static str {
        match self {
            Shape::Circle => "circle",
            Shape::Square => "square",
            Shape::Triangle => "triangle",
        }
    }

    /// Next shape in [`Shape::ALL`], wrapping around.
    pub fn cycled(self) -> Self {
        let i = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }
}

impl FromStr for Shape {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|shape| shape.name() == lower)
            .ok_or_else(|| ConfigError::UnknownShape(s.to_string()))
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Operator used when the ephemeral buffer is drawn onto the persistent one.
///
/// Names follow the CSS `mix-blend-mode` / canvas `globalCompositeOperation`
/// spelling. `Normal` is plain source-over; `Lighter` is additive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    #[default]
    Normal,
    Lighter,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
}

impl BlendMode {
    pub const ALL: [BlendMode; 17] = [
        BlendMode::Normal,
        BlendMode::Lighter,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::Overlay,
        BlendMode::Darken,
        BlendMode::Lighten,
        BlendMode::ColorDodge,
        BlendMode::ColorBurn,
        BlendMode::HardLight,
        BlendMode::SoftLight,
        BlendMode::Difference,
        BlendMode::Exclusion,
        BlendMode::Hue,
        BlendMode::Saturation,
        BlendMode::Color,
        BlendMode::Luminosity,
    ];

    pub fn css_name(self) -> &'static str {
        match self {
            BlendMode::Normal => "normal",
            BlendMode::Lighter => "lighter",
            BlendMode::Multiply => "multiply",
            BlendMode::Screen => "screen",
            BlendMode::Overlay => "overlay",
            BlendMode::Darken => "darken",
            BlendMode::Lighten => "lighten",
            BlendMode::ColorDodge => "color-dodge",
            BlendMode::ColorBurn => "color-burn",
            BlendMode::HardLight => "hard-light",
            BlendMode::SoftLight => "soft-light",
            BlendMode::Difference => "difference",
            BlendMode::Exclusion => "exclusion",
            BlendMode::Hue => "hue",
            BlendMode::Saturation => "saturation",
            BlendMode::Color => "color",
            BlendMode::Luminosity => "luminosity",
        }
    }

    pub fn cycled(self) -> Self {
        let i = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }
}

impl FromStr for BlendMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        // canvas calls plain alpha compositing "source-over"
        if lower == "source-over" {
            return Ok(BlendMode::Normal);
        }
        Self::ALL
            .into_iter()
            .find(|mode| mode.css_name() == lower)
            .ok_or_else(|| ConfigError::UnknownBlendMode(s.to_string()))
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_name())
    }
}

/// Base particle color. `v` is carried for control surfaces; drawing uses
/// only hue and saturation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hsv {
    pub h: f32,
    pub s: f32,
    pub v: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Half-open bin range `[start, end)` of the frequency spectrum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandRange {
    pub start: usize,
    pub end: usize,
}

impl BandRange {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Every host-tunable value consumed by the core.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
    /// Gaussian blur radius (px) applied to the ephemeral buffer on composite.
    pub blur: f32,
    pub trail_enabled: bool,
    /// Opacity of the background fade painted over the persistent buffer.
    pub trail_alpha: f32,
    pub color: Hsv,
    pub hue_variation: f32,
    pub min_life_span: u32,
    pub max_life_span: u32,
    pub shape: Shape,
    pub blend_mode: BlendMode,
    pub background: Rgb8,
    pub spread: f32,
    pub randomness: f32,
    pub particles_per_frame: u32,
    pub size: f32,
    pub orbit_speed: f32,
    pub orbit_radius: f32,
    /// When off the emitter ignores any audio levels the host supplies.
    pub audio_enabled: bool,
    pub reactivity: f32,
    pub bass_influence: f32,
    pub treble_influence: f32,
    pub bass_band: BandRange,
    pub treble_band: BandRange,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            blur: 0.0,
            trail_enabled: true,
            trail_alpha: 0.2,
            color: Hsv {
                h: 360.0,
                s: 1.0,
                v: 0.5,
            },
            hue_variation: 20.0,
            min_life_span: 50,
            max_life_span: 100,
            shape: Shape::Circle,
            blend_mode: BlendMode::Normal,
            background: Rgb8 {
                r: 15,
                g: 15,
                b: 15,
            },
            spread: 30.0,
            randomness: 30.0,
            particles_per_frame: 10,
            size: 7.0,
            orbit_speed: 1.0,
            orbit_radius: 150.0,
            audio_enabled: true,
            reactivity: 1.0,
            bass_influence: 1.0,
            treble_influence: 1.0,
            bass_band: BandRange::new(DEFAULT_BASS_BAND.0, DEFAULT_BASS_BAND.1),
            treble_band: BandRange::new(DEFAULT_TREBLE_BAND.0, DEFAULT_TREBLE_BAND.1),
        }
    }
}

// Accepted ranges; values outside are clamped by `sanitized`.
pub const BLUR_RANGE: RangeInclusive<f32> = 0.0..=20.0;
pub const TRAIL_ALPHA_RANGE: RangeInclusive<f32> = 0.2..=0.9;
pub const HUE_RANGE: RangeInclusive<f32> = 0.0..=360.0;
pub const UNIT_RANGE: RangeInclusive<f32> = 0.0..=1.0;
pub const HUE_VARIATION_RANGE: RangeInclusive<f32> = 0.0..=100.0;
pub const LIFE_SPAN_RANGE: RangeInclusive<u32> = 1..=200;
pub const SPREAD_RANGE: RangeInclusive<f32> = 1.0..=50.0;
pub const RANDOMNESS_RANGE: RangeInclusive<f32> = 5.0..=200.0;
pub const PARTICLES_PER_FRAME_RANGE: RangeInclusive<u32> = 1..=40;
pub const SIZE_RANGE: RangeInclusive<f32> = 1.0..=30.0;
pub const ORBIT_SPEED_RANGE: RangeInclusive<f32> = 0.1..=3.0;
pub const ORBIT_RADIUS_RANGE: RangeInclusive<f32> = 50.0..=300.0;
pub const INFLUENCE_RANGE: RangeInclusive<f32> = 0.0..=2.0;

fn clamp_f32(value: f32, range: &RangeInclusive<f32>, fallback: f32) -> f32 {
    if !value.is_finite() {
        return fallback;
    }
    value.clamp(*range.start(), *range.end())
}

fn clamp_u32(value: u32, range: &RangeInclusive<u32>) -> u32 {
    value.clamp(*range.start(), *range.end())
}

impl EffectConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: EffectConfig = toml::from_str(text)?;
        Ok(cfg)
    }

    /// Copy with every field forced into its documented range.
    ///
    /// Clamps applied:
    /// - numeric fields are clamped to their `*_RANGE`; NaN/inf take the default
    /// - `min_life_span` is at least 1 so every particle has `life_span > 0`
    /// - `max_life_span < min_life_span` collapses to a fixed `min_life_span`
    /// - band ranges with `end < start` become empty (and average to 0)
    pub fn sanitized(&self) -> Self {
        let d = Self::default();
        let min_life_span = clamp_u32(self.min_life_span, &LIFE_SPAN_RANGE);
        let max_life_span = clamp_u32(self.max_life_span, &LIFE_SPAN_RANGE).max(min_life_span);
        let band = |b: BandRange| BandRange::new(b.start, b.end.max(b.start));
        Self {
            blur: clamp_f32(self.blur, &BLUR_RANGE, d.blur),
            trail_enabled: self.trail_enabled,
            trail_alpha: clamp_f32(self.trail_alpha, &TRAIL_ALPHA_RANGE, d.trail_alpha),
            color: Hsv {
                h: clamp_f32(self.color.h, &HUE_RANGE, d.color.h),
                s: clamp_f32(self.color.s, &UNIT_RANGE, d.color.s),
                v: clamp_f32(self.color.v, &UNIT_RANGE, d.color.v),
            },
            hue_variation: clamp_f32(self.hue_variation, &HUE_VARIATION_RANGE, d.hue_variation),
            min_life_span,
            max_life_span,
            shape: self.shape,
            blend_mode: self.blend_mode,
            background: self.background,
            spread: clamp_f32(self.spread, &SPREAD_RANGE, d.spread),
            randomness: clamp_f32(self.randomness, &RANDOMNESS_RANGE, d.randomness),
            particles_per_frame: clamp_u32(self.particles_per_frame, &PARTICLES_PER_FRAME_RANGE),
            size: clamp_f32(self.size, &SIZE_RANGE, d.size),
            orbit_speed: clamp_f32(self.orbit_speed, &ORBIT_SPEED_RANGE, d.orbit_speed),
            orbit_radius: clamp_f32(self.orbit_radius, &ORBIT_RADIUS_RANGE, d.orbit_radius),
            audio_enabled: self.audio_enabled,
            reactivity: clamp_f32(self.reactivity, &INFLUENCE_RANGE, d.reactivity),
            bass_influence: clamp_f32(self.bass_influence, &INFLUENCE_RANGE, d.bass_influence),
            treble_influence: clamp_f32(
                self.treble_influence,
                &INFLUENCE_RANGE,
                d.treble_influence,
            ),
            bass_band: band(self.bass_band),
            treble_band: band(self.treble_band),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_already_sane() {
        let d = EffectConfig::default();
        assert_eq!(d.sanitized(), d);
    }

    #[test]
    fn inverted_life_span_collapses_to_min() {
        let cfg = EffectConfig {
            min_life_span: 80,
            max_life_span: 20,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(cfg.min_life_span, 80);
        assert_eq!(cfg.max_life_span, 80);
    }

    #[test]
    fn zero_life_span_is_raised_to_one() {
        let cfg = EffectConfig {
            min_life_span: 0,
            max_life_span: 0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(cfg.min_life_span, 1);
        assert_eq!(cfg.max_life_span, 1);
    }

    #[test]
    fn out_of_range_and_nan_values_are_clamped() {
        let cfg = EffectConfig {
            spread: -4.0,
            blur: f32::NAN,
            trail_alpha: 1.5,
            particles_per_frame: 500,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(cfg.spread, 1.0);
        assert_eq!(cfg.blur, 0.0);
        assert_eq!(cfg.trail_alpha, 0.9);
        assert_eq!(cfg.particles_per_frame, 40);
    }

    #[test]
    fn blend_modes_parse_css_names() {
        for mode in BlendMode::ALL {
            assert_eq!(mode.css_name().parse::<BlendMode>().ok(), Some(mode));
        }
        assert_eq!("source-over".parse::<BlendMode>().ok(), Some(BlendMode::Normal));
        assert!(matches!(
            "plasma".parse::<BlendMode>(),
            Err(ConfigError::UnknownBlendMode(_))
        ));
    }

    #[test]
    fn shapes_parse_case_insensitively() {
        assert_eq!("Triangle".parse::<Shape>().ok(), Some(Shape::Triangle));
        assert!(matches!("hex".parse::<Shape>(), Err(ConfigError::UnknownShape(_))));
    }

    #[test]
    fn cycling_visits_every_variant() {
        let mut mode = BlendMode::Normal;
        for _ in 0..BlendMode::ALL.len() {
            mode = mode.cycled();
        }
        assert_eq!(mode, BlendMode::Normal);
        assert_eq!(Shape::Triangle.cycled(), Shape::Circle);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = EffectConfig::from_toml_str(
            r#"
            blend_mode = "color-burn"
            shape = "square"
            particles_per_frame = 25

            [background]
            r = 0
            g = 0
            b = 40
            "#,
        )
        .expect("valid toml");
        assert_eq!(cfg.blend_mode, BlendMode::ColorBurn);
        assert_eq!(cfg.shape, Shape::Square);
        assert_eq!(cfg.particles_per_frame, 25);
        assert_eq!(cfg.background, Rgb8 { r: 0, g: 0, b: 40 });
        assert_eq!(cfg.orbit_radius, EffectConfig::default().orbit_radius);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(
            EffectConfig::from_toml_str("blur = \"lots\""),
            Err(ConfigError::Parse(_))
        ));
    }
}
