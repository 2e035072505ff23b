//! Per-pixel compositing following the W3C Compositing and Blending model.
//!
//! Pixels are premultiplied `[r, g, b, a]`. Every mode except `Lighter` uses
//! source-over with the blend function mixed in:
//!
//! `co = cs·(1 − αb) + cb·(1 − αs) + αs·αb·B(Cb, Cs)`, `αo = αs + αb·(1 − αs)`

use crate::config::BlendMode;

pub type Pixel = [f32; 4];

#[inline]
fn unpremultiply(p: Pixel) -> [f32; 3] {
    if p[3] <= 0.0 {
        [0.0; 3]
    } else {
        [p[0] / p[3], p[1] / p[3], p[2] / p[3]]
    }
}

fn separable(mode: BlendMode, cb: f32, cs: f32) -> f32 {
    match mode {
        BlendMode::Multiply => cb * cs,
        BlendMode::Screen => cb + cs - cb * cs,
        BlendMode::Overlay => hard_light(cs, cb),
        BlendMode::Darken => cb.min(cs),
        BlendMode::Lighten => cb.max(cs),
        BlendMode::ColorDodge => {
            if cb == 0.0 {
                0.0
            } else if cs >= 1.0 {
                1.0
            } else {
                (cb / (1.0 - cs)).min(1.0)
            }
        }
        BlendMode::ColorBurn => {
            if cb >= 1.0 {
                1.0
            } else if cs <= 0.0 {
                0.0
            } else {
                1.0 - ((1.0 - cb) / cs).min(1.0)
            }
        }
        BlendMode::HardLight => hard_light(cb, cs),
        BlendMode::SoftLight => {
            if cs <= 0.5 {
                cb - (1.0 - 2.0 * cs) * cb * (1.0 - cb)
            } else {
                let d = if cb <= 0.25 {
                    ((16.0 * cb - 12.0) * cb + 4.0) * cb
                } else {
                    cb.sqrt()
                };
                cb + (2.0 * cs - 1.0) * (d - cb)
            }
        }
        BlendMode::Difference => (cb - cs).abs(),
        BlendMode::Exclusion => cb + cs - 2.0 * cb * cs,
        _ => cs,
    }
}

#[inline]
fn hard_light(cb: f32, cs: f32) -> f32 {
    if cs <= 0.5 {
        cb * 2.0 * cs
    } else {
        let s = 2.0 * cs - 1.0;
        cb + s - cb * s
    }
}

#[inline]
fn lum(c: [f32; 3]) -> f32 {
    0.3 * c[0] + 0.59 * c[1] + 0.11 * c[2]
}

fn clip_color(c: [f32; 3]) -> [f32; 3] {
    let l = lum(c);
    let n = c[0].min(c[1]).min(c[2]);
    let x = c[0].max(c[1]).max(c[2]);
    let mut out = c;
    if n < 0.0 && l - n > 0.0 {
        for ch in &mut out {
            *ch = l + (*ch - l) * l / (l - n);
        }
    }
    if x > 1.0 && x - l > 0.0 {
        for ch in &mut out {
            *ch = l + (*ch - l) * (1.0 - l) / (x - l);
        }
    }
    out
}

fn set_lum(c: [f32; 3], l: f32) -> [f32; 3] {
    let d = l - lum(c);
    clip_color([c[0] + d, c[1] + d, c[2] + d])
}

#[inline]
fn sat(c: [f32; 3]) -> f32 {
    c[0].max(c[1]).max(c[2]) - c[0].min(c[1]).min(c[2])
}

fn set_sat(c: [f32; 3], s: f32) -> [f32; 3] {
    let max = c[0].max(c[1]).max(c[2]);
    let min = c[0].min(c[1]).min(c[2]);
    let range = max - min;
    if range <= 0.0 {
        return [0.0; 3];
    }
    let mut out = [0.0; 3];
    for i in 0..3 {
        out[i] = if c[i] == max {
            s
        } else if c[i] == min {
            0.0
        } else {
            (c[i] - min) * s / range
        };
    }
    out
}

/// Blend function `B(Cb, Cs)` on straight colors.
pub fn blend_color(mode: BlendMode, cb: [f32; 3], cs: [f32; 3]) -> [f32; 3] {
    match mode {
        BlendMode::Hue => set_lum(set_sat(cs, sat(cb)), lum(cb)),
        BlendMode::Saturation => set_lum(set_sat(cb, sat(cs)), lum(cb)),
        BlendMode::Color => set_lum(cs, lum(cb)),
        BlendMode::Luminosity => set_lum(cb, lum(cs)),
        _ => [
            separable(mode, cb[0], cs[0]),
            separable(mode, cb[1], cs[1]),
            separable(mode, cb[2], cs[2]),
        ],
    }
}

/// Composite premultiplied `src` over premultiplied `dst` with `mode`.
pub fn composite_pixel(mode: BlendMode, dst: Pixel, src: Pixel) -> Pixel {
    let a_s = src[3];
    let a_b = dst[3];
    if a_s <= 0.0 {
        return dst;
    }
    if mode == BlendMode::Lighter {
        return [
            (src[0] + dst[0]).min(1.0),
            (src[1] + dst[1]).min(1.0),
            (src[2] + dst[2]).min(1.0),
            (a_s + a_b).min(1.0),
        ];
    }
    let a_o = a_s + a_b * (1.0 - a_s);
    if mode == BlendMode::Normal || a_b <= 0.0 {
        return [
            src[0] + dst[0] * (1.0 - a_s),
            src[1] + dst[1] * (1.0 - a_s),
            src[2] + dst[2] * (1.0 - a_s),
            a_o,
        ];
    }
    let b = blend_color(mode, unpremultiply(dst), unpremultiply(src));
    let mut out = [0.0; 4];
    for i in 0..3 {
        out[i] = (src[i] * (1.0 - a_b) + dst[i] * (1.0 - a_s) + a_s * a_b * b[i]).clamp(0.0, a_o);
    }
    out[3] = a_o;
    out
}
