//! Audio levels as seen by the core.
//!
//! Acquiring a microphone and running the frequency analysis belong to the
//! host. The core only polls a [`LevelSource`] once per tick; a pending or
//! denied capture is simply `None`.

use crate::config::BandRange;

/// Normalized band energies, each in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AudioLevels {
    pub bass: f32,
    pub treble: f32,
}

impl AudioLevels {
    /// Average two bands of an 8-bit magnitude spectrum (255 = full scale).
    pub fn from_spectrum(spectrum: &[u8], bass: BandRange, treble: BandRange) -> Self {
        Self {
            bass: band_average(spectrum, bass),
            treble: band_average(spectrum, treble),
        }
    }
}

/// Mean of `spectrum[band]` scaled to `[0, 1]`.
///
/// The band is clipped to the spectrum; an empty band averages to 0.
pub fn band_average(spectrum: &[u8], band: BandRange) -> f32 {
    let end = band.end.min(spectrum.len());
    let start = band.start.min(end);
    let slice = &spectrum[start..end];
    if slice.is_empty() {
        return 0.0;
    }
    let sum: u32 = slice.iter().map(|&v| v as u32).sum();
    sum as f32 / slice.len() as f32 / 255.0
}

/// Non-blocking provider of audio levels.
pub trait LevelSource {
    /// Latest levels, or `None` while no signal is available.
    fn poll_levels(&mut self) -> Option<AudioLevels>;
}

/// A source that never has a signal.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silence;

impl LevelSource for Silence {
    fn poll_levels(&mut self) -> Option<AudioLevels> {
        None
    }
}

/// Fixed levels, handy for hosts that feed values from elsewhere.
impl LevelSource for Option<AudioLevels> {
    fn poll_levels(&mut self) -> Option<AudioLevels> {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_scale_band_is_one() {
        let spectrum = [255u8; 256];
        let lv = AudioLevels::from_spectrum(&spectrum, BandRange::new(0, 10), BandRange::new(100, 150));
        assert_eq!(lv.bass, 1.0);
        assert_eq!(lv.treble, 1.0);
    }

    #[test]
    fn bands_only_read_their_bins() {
        let mut spectrum = [0u8; 256];
        spectrum[..10].fill(51);
        spectrum[10..100].fill(255);
        let lv = AudioLevels::from_spectrum(&spectrum, BandRange::new(0, 10), BandRange::new(100, 150));
        assert!((lv.bass - 0.2).abs() < 1e-6);
        assert_eq!(lv.treble, 0.0);
    }

    #[test]
    fn short_or_empty_spectrum_is_safe() {
        assert_eq!(band_average(&[], BandRange::new(0, 10)), 0.0);
        assert_eq!(band_average(&[255; 20], BandRange::new(100, 150)), 0.0);
        assert_eq!(band_average(&[255; 20], BandRange::new(15, 150)), 1.0);
        assert_eq!(band_average(&[255; 20], BandRange::new(8, 4)), 0.0);
    }

    #[test]
    fn silence_has_no_signal() {
        assert_eq!(Silence.poll_levels(), None);
    }
}
