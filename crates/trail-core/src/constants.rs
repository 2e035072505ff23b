// Fixed simulation and compositing constants shared by every front-end.

// Flow field sampling
pub const NOISE_SPATIAL_FREQUENCY: f64 = 0.005; // world px -> noise units
pub const NOISE_TEMPORAL_FREQUENCY: f64 = 0.001; // elapsed seconds -> noise units

// Particle motion
pub const INHERITED_VELOCITY_SCALE: f32 = 0.25; // share of the base velocity a particle keeps
pub const JITTER_SPEED_MIN: f32 = 1.0;
pub const JITTER_SPEED_MAX: f32 = 3.0;
pub const DECAY_MIN: f32 = 0.95;
pub const DECAY_MAX: f32 = 0.99;
pub const STEERING_FORCE: f32 = 0.15; // perturbation at full age
pub const ROTATION_SCALE: f32 = 30.0 * 0.25; // noise -> radians

// Lightness ramp: 100% at age_percent 0, 20% at age_percent 1
pub const LIGHTNESS_MAX: f32 = 100.0;
pub const LIGHTNESS_SPAN: f32 = 80.0;

// Compositing
pub const COMPOSITE_BRIGHTNESS: f32 = 1.15;
pub const SHAPE_SUPERSAMPLE: usize = 2; // per-axis samples for shape coverage

// Audio spectrum layout
pub const SPECTRUM_BINS: usize = 256;
pub const DEFAULT_BASS_BAND: (usize, usize) = (0, 10);
pub const DEFAULT_TREBLE_BAND: (usize, usize) = (100, 150);
