//! Canvas sizing.
//!
//! Orbit radius, spread and particle size are all in CSS pixels, so the
//! drawing buffer follows the canvas's CSS box and the browser scales it up
//! on high-density displays.

/// Engine viewport for a canvas laid out at `css_width × css_height`.
/// Degenerate or non-finite sizes become 1.
pub fn css_viewport(css_width: f64, css_height: f64) -> (u32, u32) {
    let px = |v: f64| {
        if v.is_finite() && v >= 1.0 {
            v.round() as u32
        } else {
            1
        }
    };
    (px(css_width), px(css_height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_is_the_css_box() {
        assert_eq!(css_viewport(1280.0, 720.0), (1280, 720));
        assert_eq!(css_viewport(1279.6, 719.4), (1280, 719));
    }

    #[test]
    fn degenerate_boxes_become_one_pixel() {
        assert_eq!(css_viewport(0.0, 0.0), (1, 1));
        assert_eq!(css_viewport(f64::NAN, -3.0), (1, 1));
        assert_eq!(css_viewport(f64::INFINITY, 300.0), (1, 300));
    }
}
