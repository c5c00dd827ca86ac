#![deny(unsafe_code)]
//! Image-to-particle reveal effect.
//!
//! A decoded image is sampled on a regular grid; every sufficiently opaque
//! sample becomes one particle that remembers the pixel's position and
//! color. Particles start scattered over the image bounds and, frame by
//! frame, close a fixed fraction of the remaining gap to their target. Their
//! opacity grows faster the closer they are, so the picture appears to
//! condense out of noise. Transparent regions are never reconstructed, which
//! keeps silhouettes sharp.
//!
//! Nothing animates on load. The owning [`Animator`](motes_core::Animator)
//! is started by the caller, usually after [`DEFAULT_WARMUP`].

use std::time::Duration;

use glam::DVec2;
use motes_core::params::param_usize;
use motes_core::prng::{RandomSource, Xorshift64};
use motes_core::{Backdrop, Frame, Primitive, RasterImage, Shape, Simulation, Srgb};
use serde_json::{json, Value};
use tracing::{debug, warn};

/// Only every `SAMPLE_STEP`-th row and column is sampled.
pub const SAMPLE_STEP: usize = 2;
/// Samples with alpha at or below this value produce no particle.
pub const ALPHA_THRESHOLD: u8 = 128;
/// Distance at which the fade-in factor drops to zero.
pub const MAX_FADE_DISTANCE: f64 = 100.0;
/// Fraction of the remaining gap closed per frame.
pub const EASE_FACTOR: f64 = 0.1;
/// Opacity gained per frame at zero distance.
pub const OPACITY_STEP: f64 = 0.05;
/// Edge length of the square drawn for each particle.
pub const POINT_SIZE: f64 = 1.0;
/// Delay callers apply before the first frame.
pub const DEFAULT_WARMUP: Duration = Duration::from_millis(7000);

/// One particle of the reconstructed image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageParticle {
    pub position: DVec2,
    /// Sampled pixel coordinate; fixed for the particle's lifetime.
    pub target: DVec2,
    /// Sampled pixel color; fixed for the particle's lifetime.
    pub color: Srgb,
    /// Never decreases; saturates at 1.
    pub opacity: f64,
}

impl ImageParticle {
    pub fn distance_to_target(&self) -> f64 {
        (self.target - self.position).length()
    }

    /// Advances the particle one frame toward its target.
    ///
    /// The fade factor uses the distance measured before the move.
    pub fn advance(&mut self) {
        let delta = self.target - self.position;
        let distance = delta.length();
        self.position += delta * EASE_FACTOR;
        let fade = 1.0 - (distance / MAX_FADE_DISTANCE).min(1.0);
        self.opacity = (self.opacity + fade * OPACITY_STEP).min(1.0);
    }
}

/// Samples `image` into `(target, color)` pairs in row-major order.
pub fn sample_targets(image: &RasterImage) -> Vec<(DVec2, Srgb)> {
    let mut targets = Vec::new();
    for y in (0..image.height()).step_by(SAMPLE_STEP) {
        for x in (0..image.width()).step_by(SAMPLE_STEP) {
            let Some([r, g, b, a]) = image.pixel(x, y) else {
                continue;
            };
            if a > ALPHA_THRESHOLD {
                targets.push((DVec2::new(x as f64, y as f64), Srgb::from_rgb8(r, g, b)));
            }
        }
    }
    targets
}

/// The reveal simulation.
///
/// Starts empty and not ready; [`load`](Reveal::load) builds the particle
/// set. Generic over its random stream so tests can pin start positions.
pub struct Reveal<R: RandomSource = Xorshift64> {
    width: usize,
    height: usize,
    particles: Vec<ImageParticle>,
    loaded: bool,
    warmup: Duration,
    rng: R,
}

impl Reveal<Xorshift64> {
    /// Creates an empty reveal seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self::with_rng(Xorshift64::new(seed))
    }

    /// Creates an empty reveal, reading `warmup_ms` from `params`.
    pub fn from_json(seed: u64, params: &Value) -> Self {
        let mut reveal = Self::new(seed);
        let default_ms = DEFAULT_WARMUP.as_millis() as usize;
        reveal.warmup = Duration::from_millis(param_usize(params, "warmup_ms", default_ms) as u64);
        reveal
    }
}

impl<R: RandomSource> Reveal<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            width: 0,
            height: 0,
            particles: Vec::new(),
            loaded: false,
            warmup: DEFAULT_WARMUP,
            rng,
        }
    }

    /// Replaces the particle set with one sampled from `image`.
    ///
    /// Any previous set is discarded. Every particle starts at a uniformly
    /// random point inside the image bounds with zero opacity.
    pub fn load(&mut self, image: &RasterImage) {
        let (w, h) = (image.width() as f64, image.height() as f64);
        let rng = &mut self.rng;
        self.particles = sample_targets(image)
            .into_iter()
            .map(|(target, color)| ImageParticle {
                position: DVec2::new(rng.next_range(0.0, w), rng.next_range(0.0, h)),
                target,
                color,
                opacity: 0.0,
            })
            .collect();
        self.width = image.width();
        self.height = image.height();
        self.loaded = true;

        if self.particles.is_empty() {
            warn!(
                width = self.width,
                height = self.height,
                "image has no visible samples; reveal will draw nothing"
            );
        } else {
            debug!(
                width = self.width,
                height = self.height,
                particles = self.particles.len(),
                "image sampled"
            );
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Surface width, equal to the loaded image's width.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Warm-up delay the caller should apply before starting.
    pub fn warmup(&self) -> Duration {
        self.warmup
    }

    pub fn particles(&self) -> &[ImageParticle] {
        &self.particles
    }

    /// True once every particle is within `tolerance` of its target and fully opaque.
    pub fn is_settled(&self, tolerance: f64) -> bool {
        self.particles
            .iter()
            .all(|p| p.opacity >= 1.0 && p.distance_to_target() <= tolerance)
    }
}

impl<R: RandomSource> Simulation for Reveal<R> {
    fn step(&mut self) {
        self.particles.iter_mut().for_each(ImageParticle::advance);
    }

    fn frame(&self) -> Frame {
        Frame {
            backdrop: Backdrop::Clear,
            primitives: self
                .particles
                .iter()
                .map(|p| Primitive {
                    x: p.position.x,
                    y: p.position.y,
                    size: POINT_SIZE,
                    color: p.color,
                    opacity: p.opacity,
                    shape: Shape::Point,
                })
                .collect(),
        }
    }

    fn particle_count(&self) -> usize {
        self.particles.len()
    }

    fn is_ready(&self) -> bool {
        self.loaded
    }

    fn params(&self) -> Value {
        json!({
            "warmup_ms": self.warmup.as_millis() as u64,
            "sample_step": SAMPLE_STEP,
            "alpha_threshold": ALPHA_THRESHOLD,
            "max_fade_distance": MAX_FADE_DISTANCE,
            "ease_factor": EASE_FACTOR,
            "opacity_step": OPACITY_STEP,
        })
    }

    fn param_schema(&self) -> Value {
        json!({
            "warmup_ms": {
                "type": "integer",
                "default": DEFAULT_WARMUP.as_millis() as u64,
                "min": 0,
                "description": "Delay before the first frame, applied by the caller"
            }
        })
    }
}
