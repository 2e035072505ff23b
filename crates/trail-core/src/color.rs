use crate::config::Rgb8;

/// Straight (non-premultiplied) RGB color with channels in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    #[inline]
    pub fn from_array(c: [f32; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

impl From<Rgb8> for Rgb {
    fn from(c: Rgb8) -> Self {
        Self::new(c.r as f32 / 255.0, c.g as f32 / 255.0, c.b as f32 / 255.0)
    }
}

/// CSS `hsl()` conversion.
///
/// `hue` is in degrees and wraps; `saturation` and `lightness` are percentages
/// and are clamped to `[0, 100]` the way a browser clamps them.
pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> Rgb {
    let h = hue.rem_euclid(360.0);
    let s = (saturation / 100.0).clamp(0.0, 1.0);
    let l = (lightness / 100.0).clamp(0.0, 1.0);
    let a = s * l.min(1.0 - l);
    let f = |n: f32| {
        let k = (n + h / 30.0) % 12.0;
        l - a * (k - 3.0).min(9.0 - k).min(1.0).max(-1.0)
    };
    Rgb::new(f(0.0), f(8.0), f(4.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Rgb, b: Rgb) -> bool {
        (a.r - b.r).abs() < 1e-5 && (a.g - b.g).abs() < 1e-5 && (a.b - b.b).abs() < 1e-5
    }

    #[test]
    fn primaries() {
        assert!(close(hsl_to_rgb(0.0, 100.0, 50.0), Rgb::new(1.0, 0.0, 0.0)));
        assert!(close(hsl_to_rgb(120.0, 100.0, 50.0), Rgb::new(0.0, 1.0, 0.0)));
        assert!(close(hsl_to_rgb(240.0, 100.0, 50.0), Rgb::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn hue_wraps_and_lightness_clamps() {
        assert!(close(hsl_to_rgb(360.0, 100.0, 50.0), hsl_to_rgb(0.0, 100.0, 50.0)));
        assert!(close(hsl_to_rgb(-120.0, 100.0, 50.0), hsl_to_rgb(240.0, 100.0, 50.0)));
        assert!(close(hsl_to_rgb(30.0, 100.0, 130.0), Rgb::new(1.0, 1.0, 1.0)));
        assert!(close(hsl_to_rgb(30.0, 100.0, -5.0), Rgb::new(0.0, 0.0, 0.0)));
    }

    #[test]
    fn zero_saturation_is_grey() {
        let c = hsl_to_rgb(200.0, 0.0, 40.0);
        assert!(close(c, Rgb::new(0.4, 0.4, 0.4)));
    }
}
