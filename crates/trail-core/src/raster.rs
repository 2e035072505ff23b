//! CPU raster used for both compositor buffers.
//!
//! Pixels are premultiplied RGBA in `[0, 1]`, row-major, origin top-left.
//! Shape fills are antialiased by supersampling; blur is a separable Gaussian
//! that treats everything outside the raster as transparent.

use crate::blend::{composite_pixel, Pixel};
use crate::color::Rgb;
use crate::config::BlendMode;
use crate::constants::SHAPE_SUPERSAMPLE;
use crate::vector::Vector2;
use image::{Rgba, RgbaImage};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Clone, Debug, PartialEq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
}

impl Raster {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0.0; 4]; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Reallocate to the new size; content is discarded.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels = vec![[0.0; 4]; width as usize * height as usize];
    }

    /// Drop the pixel storage entirely.
    pub fn release(&mut self) {
        self.width = 0;
        self.height = 0;
        self.pixels = Vec::new();
    }

    /// Reset every pixel to transparent black.
    pub fn clear(&mut self) {
        self.pixels.fill([0.0; 4]);
    }

    /// Paint `color` at `alpha` over the whole raster (source-over).
    pub fn fill(&mut self, color: Rgb, alpha: f32) {
        let a = alpha.clamp(0.0, 1.0);
        let src = [color.r * a, color.g * a, color.b * a, a];
        for p in &mut self.pixels {
            *p = composite_pixel(BlendMode::Normal, *p, src);
        }
    }

    fn blend_coverage(&mut self, x: u32, y: u32, color: Rgb, coverage: f32) {
        if coverage <= 0.0 {
            return;
        }
        let idx = y as usize * self.width as usize + x as usize;
        let src = [
            color.r * coverage,
            color.g * coverage,
            color.b * coverage,
            coverage,
        ];
        self.pixels[idx] = composite_pixel(BlendMode::Normal, self.pixels[idx], src);
    }

    /// Pixel range covering `[min, max]` clipped to the raster, or `None`.
    fn clip_bounds(&self, min: Vector2, max: Vector2) -> Option<(u32, u32, u32, u32)> {
        if !(min.is_finite() && max.is_finite()) || self.is_empty() {
            return None;
        }
        let x0 = min.x.floor().max(0.0);
        let y0 = min.y.floor().max(0.0);
        let x1 = max.x.ceil().min(self.width as f32);
        let y1 = max.y.ceil().min(self.height as f32);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }

    fn fill_by_coverage(
        &mut self,
        min: Vector2,
        max: Vector2,
        color: Rgb,
        inside: impl Fn(f32, f32) -> bool,
    ) {
        let Some((x0, y0, x1, y1)) = self.clip_bounds(min, max) else {
            return;
        };
        let n = SHAPE_SUPERSAMPLE;
        let step = 1.0 / n as f32;
        let total = (n * n) as f32;
        for y in y0..y1 {
            for x in x0..x1 {
                let mut hits = 0usize;
                for sy in 0..n {
                    for sx in 0..n {
                        let px = x as f32 + (sx as f32 + 0.5) * step;
                        let py = y as f32 + (sy as f32 + 0.5) * step;
                        if inside(px, py) {
                            hits += 1;
                        }
                    }
                }
                self.blend_coverage(x, y, color, hits as f32 / total);
            }
        }
    }

    pub fn fill_circle(&mut self, center: Vector2, radius: f32, color: Rgb) {
        if radius <= 0.0 {
            return;
        }
        let r2 = radius * radius;
        let extent = Vector2::splat(radius);
        self.fill_by_coverage(center - extent, center + extent, color, |px, py| {
            let dx = px - center.x;
            let dy = py - center.y;
            dx * dx + dy * dy <= r2
        });
    }

    /// Fill a convex polygon given in either winding order.
    pub fn fill_convex_polygon(&mut self, points: &[Vector2], color: Rgb) {
        if points.len() < 3 {
            return;
        }
        let min = points.iter().copied().fold(Vector2::splat(f32::INFINITY), Vector2::min);
        let max = points
            .iter()
            .copied()
            .fold(Vector2::splat(f32::NEG_INFINITY), Vector2::max);
        self.fill_by_coverage(min, max, color, |px, py| {
            let mut sign = 0.0f32;
            for i in 0..points.len() {
                let a = points[i];
                let b = points[(i + 1) % points.len()];
                let cross = (b.x - a.x) * (py - a.y) - (b.y - a.y) * (px - a.x);
                if cross != 0.0 {
                    if sign == 0.0 {
                        sign = cross.signum();
                    } else if cross.signum() != sign {
                        return false;
                    }
                }
            }
            true
        });
    }

    /// Separable Gaussian blur with standard deviation `sigma` px.
    pub fn blur(&mut self, sigma: f32) {
        if sigma <= 0.0 || self.is_empty() {
            return;
        }
        let kernel = gaussian_kernel(sigma);
        let w = self.width as usize;
        let h = self.height as usize;
        let mut scratch = vec![[0.0f32; 4]; self.pixels.len()];
        blur_rows(&self.pixels, &mut scratch, w, &kernel);
        blur_columns(&scratch, &mut self.pixels, w, h, &kernel);
    }

    /// Multiply color by `factor`, clamped so no channel exceeds its alpha.
    pub fn brighten(&mut self, factor: f32) {
        for p in &mut self.pixels {
            for ch in 0..3 {
                p[ch] = (p[ch] * factor).min(p[3]);
            }
        }
    }

    /// Composite this raster onto `dst` at the origin using `mode`.
    pub fn draw_onto(&self, dst: &mut Raster, mode: BlendMode) {
        let w = self.width.min(dst.width) as usize;
        let h = self.height.min(dst.height) as usize;
        for y in 0..h {
            let src_row = &self.pixels[y * self.width as usize..][..w];
            let dst_row = &mut dst.pixels[y * dst.width as usize..][..w];
            for (d, s) in dst_row.iter_mut().zip(src_row) {
                *d = composite_pixel(mode, *d, *s);
            }
        }
    }

    /// Straight-alpha 8-bit copy for presentation or export.
    pub fn to_rgba8(&self) -> RgbaImage {
        let mut img = RgbaImage::new(self.width, self.height);
        for (dst, p) in img.pixels_mut().zip(&self.pixels) {
            let a = p[3].clamp(0.0, 1.0);
            let un = |c: f32| {
                if a <= 0.0 {
                    0
                } else {
                    ((c / a).clamp(0.0, 1.0) * 255.0).round() as u8
                }
            };
            *dst = Rgba([un(p[0]), un(p[1]), un(p[2]), (a * 255.0).round() as u8]);
        }
        img
    }
}

/// Normalized kernel spanning ±3σ.
fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    let half = (sigma * 3.0).ceil().max(1.0) as i32;
    let mut kernel: Vec<f32> = (-half..=half)
        .map(|i| {
            let x = i as f32;
            (-x * x / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f32 = kernel.iter().sum();
    for k in &mut kernel {
        *k /= sum;
    }
    kernel
}

// Taps outside the raster read as transparent, so light can leave at the
// border but never accumulate there.
fn blur_row(src: &[Pixel], dst: &mut [Pixel], kernel: &[f32]) {
    let half = (kernel.len() / 2) as i32;
    let len = src.len() as i32;
    for (x, out) in dst.iter_mut().enumerate() {
        let mut acc = [0.0f32; 4];
        for (ki, kv) in kernel.iter().enumerate() {
            let sx = x as i32 + ki as i32 - half;
            if sx < 0 || sx >= len {
                continue;
            }
            let p = src[sx as usize];
            for ch in 0..4 {
                acc[ch] += p[ch] * kv;
            }
        }
        *out = acc;
    }
}

fn blur_rows(src: &[Pixel], dst: &mut [Pixel], width: usize, kernel: &[f32]) {
    #[cfg(feature = "parallel")]
    dst.par_chunks_mut(width)
        .zip(src.par_chunks(width))
        .for_each(|(d, s)| blur_row(s, d, kernel));
    #[cfg(not(feature = "parallel"))]
    dst.chunks_mut(width)
        .zip(src.chunks(width))
        .for_each(|(d, s)| blur_row(s, d, kernel));
}

fn blur_columns(src: &[Pixel], dst: &mut [Pixel], width: usize, height: usize, kernel: &[f32]) {
    let half = (kernel.len() / 2) as i32;
    let rows = height as i32;
    let column_pass = |y: usize, row: &mut [Pixel]| {
        for (x, out) in row.iter_mut().enumerate() {
            let mut acc = [0.0f32; 4];
            for (ki, kv) in kernel.iter().enumerate() {
                let sy = y as i32 + ki as i32 - half;
                if sy < 0 || sy >= rows {
                    continue;
                }
                let p = src[sy as usize * width + x];
                for ch in 0..4 {
                    acc[ch] += p[ch] * kv;
                }
            }
            *out = acc;
        }
    };
    #[cfg(feature = "parallel")]
    dst.par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| column_pass(y, row));
    #[cfg(not(feature = "parallel"))]
    dst.chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| column_pass(y, row));
}
