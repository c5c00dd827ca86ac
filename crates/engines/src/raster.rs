//! Software painter that rasterizes [`Frame`] draw lists into an RGBA buffer.
//!
//! This module is always available (no feature gate) so that both the `png`
//! snapshot path and headless tests can share the same compositing. Pixels are
//! stored as straight (non-premultiplied) RGBA in [0, 1] and composited with
//! the canvas "source-over" operator.

use motes_core::error::SimError;
use motes_core::{Backdrop, Frame, Painter, Primitive, Shape, Srgb};

/// An RGBA surface that implements [`Painter`].
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<[f64; 4]>,
}

impl Raster {
    /// Creates a fully transparent surface.
    ///
    /// Returns `SimError::InvalidDimensions` if either side is zero or the
    /// byte size overflows.
    pub fn new(width: usize, height: usize) -> Result<Self, SimError> {
        if width == 0 || height == 0 {
            return Err(SimError::InvalidDimensions);
        }
        let len = width
            .checked_mul(height)
            .filter(|n| n.checked_mul(4).is_some())
            .ok_or(SimError::InvalidDimensions)?;
        Ok(Self {
            width,
            height,
            pixels: vec![[0.0; 4]; len],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Straight RGBA at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[f64; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    /// Resets every pixel to transparent black.
    pub fn clear(&mut self) {
        self.pixels.fill([0.0; 4]);
    }

    /// Composites `color` at `alpha` over the whole surface.
    pub fn fill(&mut self, color: Srgb, alpha: f64) {
        let alpha = alpha.clamp(0.0, 1.0);
        for px in &mut self.pixels {
            *px = source_over(*px, color, alpha);
        }
    }

    /// Composites a filled circle. A pixel is covered when its center lies
    /// within `radius` of `(cx, cy)`.
    pub fn fill_disc(&mut self, cx: f64, cy: f64, radius: f64, color: Srgb, alpha: f64) {
        if radius <= 0.0 || !cx.is_finite() || !cy.is_finite() {
            return;
        }
        let Some((x0, x1)) = span(cx - radius, cx + radius, self.width) else {
            return;
        };
        let Some((y0, y1)) = span(cy - radius, cy + radius, self.height) else {
            return;
        };
        let r2 = radius * radius;
        for y in y0..y1 {
            let dy = y as f64 + 0.5 - cy;
            for x in x0..x1 {
                let dx = x as f64 + 0.5 - cx;
                if dx * dx + dy * dy <= r2 {
                    self.blend(x, y, color, alpha);
                }
            }
        }
    }

    /// Composites an axis-aligned square whose top-left corner is `(x, y)`.
    /// A pixel is covered when its center lies inside the square.
    pub fn fill_square(&mut self, x: f64, y: f64, side: f64, color: Srgb, alpha: f64) {
        if side <= 0.0 || !x.is_finite() || !y.is_finite() {
            return;
        }
        let Some((x0, x1)) = span(x, x + side, self.width) else {
            return;
        };
        let Some((y0, y1)) = span(y, y + side, self.height) else {
            return;
        };
        for py in y0..y1 {
            let cy = py as f64 + 0.5;
            if cy < y || cy >= y + side {
                continue;
            }
            for px in x0..x1 {
                let cx = px as f64 + 0.5;
                if cx >= x && cx < x + side {
                    self.blend(px, py, color, alpha);
                }
            }
        }
    }

    /// Converts the surface to an RGBA8 buffer of `width * height * 4` bytes.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|&[r, g, b, a]| {
                [
                    (r.clamp(0.0, 1.0) * 255.0).round() as u8,
                    (g.clamp(0.0, 1.0) * 255.0).round() as u8,
                    (b.clamp(0.0, 1.0) * 255.0).round() as u8,
                    (a.clamp(0.0, 1.0) * 255.0).round() as u8,
                ]
            })
            .collect()
    }

    fn blend(&mut self, x: usize, y: usize, color: Srgb, alpha: f64) {
        let i = y * self.width + x;
        self.pixels[i] = source_over(self.pixels[i], color, alpha.clamp(0.0, 1.0));
    }

    fn draw(&mut self, p: &Primitive) {
        if p.opacity <= 0.0 {
            return;
        }
        match p.shape {
            Shape::Disc => self.fill_disc(p.x, p.y, p.size, p.color, p.opacity),
            Shape::Point => self.fill_square(p.x, p.y, p.size, p.color, p.opacity),
        }
    }
}

impl Painter for Raster {
    fn paint(&mut self, frame: &Frame) {
        match frame.backdrop {
            Backdrop::Clear => self.clear(),
            Backdrop::Fade { color, alpha } => self.fill(color, alpha),
        }
        for p in &frame.primitives {
            self.draw(p);
        }
    }
}

/// Pixel index range `[lo, hi)` that may intersect `[min, max]`, clipped to
/// `0..extent`. `None` when the interval misses the surface entirely.
fn span(min: f64, max: f64, extent: usize) -> Option<(usize, usize)> {
    if max < 0.0 || min >= extent as f64 {
        return None;
    }
    let lo = min.floor().max(0.0) as usize;
    let hi = (max.ceil().max(0.0) as usize).min(extent);
    (lo < hi).then_some((lo, hi))
}

fn source_over(dst: [f64; 4], src: Srgb, sa: f64) -> [f64; 4] {
    let [dr, dg, db, da] = dst;
    let keep = da * (1.0 - sa);
    let out_a = sa + keep;
    if out_a <= 0.0 {
        return [0.0; 4];
    }
    [
        (src.r * sa + dr * keep) / out_a,
        (src.g * sa + dg * keep) / out_a,
        (src.b * sa + db * keep) / out_a,
        out_a,
    ]
}
