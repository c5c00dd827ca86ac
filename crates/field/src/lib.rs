#![deny(unsafe_code)]
//! Ambient drifting-particle field.
//!
//! A fixed number of particles drift with constant velocity across a
//! toroidal surface. Each particle has a finite life counted in frames; when
//! it runs out, the particle's slot is refilled with a freshly spawned one.
//! The slot array never grows or shrinks after construction.
//!
//! Frames use a translucent black backdrop so that earlier positions fade
//! out gradually and the particles leave short trails.

use glam::DVec2;
use motes_core::params::{param_color, param_f64, param_string, param_usize};
use motes_core::prng::{RandomSource, Xorshift64};
use motes_core::{Backdrop, DeviceClass, Frame, Primitive, Shape, Simulation, Srgb};
use serde_json::{json, Value};
use tracing::debug;

/// Particle count on constrained devices.
const CONSTRAINED_COUNT: usize = 40;
/// Particle count on standard devices.
const STANDARD_COUNT: usize = 100;
/// Speed scale on constrained devices for the background preset.
const BACKGROUND_CONSTRAINED_SPEED: f64 = 0.2;
/// Speed scale on constrained devices for the loading-screen preset.
const LOADING_CONSTRAINED_SPEED: f64 = 0.5;
/// Speed scale on standard devices (both presets).
const STANDARD_SPEED: f64 = 0.5;
/// Alpha of the black fill composited before each frame.
const DEFAULT_TRAIL_ALPHA: f64 = 0.05;
/// Particle fill color.
const DEFAULT_COLOR: Srgb = Srgb {
    r: 0x60 as f64 / 255.0,
    g: 0xa5 as f64 / 255.0,
    b: 0xfa as f64 / 255.0,
};

/// Upper bound on slots per tier; larger requested counts are clamped.
pub const MAX_COUNT: usize = 10_000;

/// Spawned radius range, half-open.
pub const SIZE_RANGE: (f64, f64) = (1.0, 3.0);
/// Spawned opacity range, half-open.
pub const OPACITY_RANGE: (f64, f64) = (0.2, 0.7);
/// Spawned life range in frames, half-open.
pub const LIFE_RANGE: (u32, u32) = (100, 300);

/// Density and speed for one device tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierConfig {
    /// Number of particle slots.
    pub count: usize,
    /// Velocity components are drawn from `[-speed / 2, speed / 2)`.
    pub speed: f64,
}

/// Call-site configuration for a field.
///
/// The two presets reproduce the two places the field is used: the page
/// background slows particles down on constrained devices, the loading
/// screen does not.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldConfig {
    pub constrained: TierConfig,
    pub standard: TierConfig,
    pub color: Srgb,
    pub trail_alpha: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self::background()
    }
}

impl FieldConfig {
    /// Page background: slower particles on constrained devices.
    pub fn background() -> Self {
        Self {
            constrained: TierConfig {
                count: CONSTRAINED_COUNT,
                speed: BACKGROUND_CONSTRAINED_SPEED,
            },
            standard: TierConfig {
                count: STANDARD_COUNT,
                speed: STANDARD_SPEED,
            },
            color: DEFAULT_COLOR,
            trail_alpha: DEFAULT_TRAIL_ALPHA,
        }
    }

    /// Loading screen underlay: same speed on every tier.
    pub fn loading_screen() -> Self {
        Self {
            constrained: TierConfig {
                count: CONSTRAINED_COUNT,
                speed: LOADING_CONSTRAINED_SPEED,
            },
            ..Self::background()
        }
    }

    /// Names accepted by [`FieldConfig::preset`].
    pub fn preset_names() -> &'static [&'static str] {
        &["background", "loading"]
    }

    /// Looks up a preset by name.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "background" => Some(Self::background()),
            "loading" | "loading_screen" => Some(Self::loading_screen()),
            _ => None,
        }
    }

    /// The tier settings that apply to `device`.
    pub fn tier(&self, device: DeviceClass) -> TierConfig {
        match device {
            DeviceClass::Constrained => self.constrained,
            DeviceClass::Standard => self.standard,
        }
    }

    /// Reads a config from JSON: `preset` picks the base, individual keys
    /// override it. Unknown presets fall back to `background`.
    pub fn from_json(params: &Value) -> Self {
        let preset = param_string(params, "preset", "background");
        let base = Self::preset(&preset).unwrap_or_else(|| {
            debug!(preset = %preset, "unknown field preset, using background");
            Self::background()
        });
        Self {
            constrained: TierConfig {
                count: param_usize(params, "constrained_count", base.constrained.count)
                    .min(MAX_COUNT),
                speed: param_f64(params, "constrained_speed", base.constrained.speed),
            },
            standard: TierConfig {
                count: param_usize(params, "standard_count", base.standard.count)
                    .min(MAX_COUNT),
                speed: param_f64(params, "standard_speed", base.standard.speed),
            },
            color: param_color(params, "color", base.color),
            trail_alpha: param_f64(params, "trail_alpha", base.trail_alpha).clamp(0.0, 1.0),
        }
    }
}

/// One drifting particle. Identity is its slot index in the field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldParticle {
    pub position: DVec2,
    /// Displacement per frame.
    pub velocity: DVec2,
    /// Draw radius.
    pub size: f64,
    pub opacity: f64,
    /// Frames left before the slot is respawned.
    pub life: u32,
}

impl FieldParticle {
    /// Draws a new particle anywhere on a `width` x `height` surface.
    ///
    /// Degenerate dimensions are allowed; a zero extent pins that axis to 0.
    pub fn spawn<R: RandomSource + ?Sized>(
        rng: &mut R,
        width: f64,
        height: f64,
        speed: f64,
    ) -> Self {
        let x = rng.next_range(0.0, width);
        let y = rng.next_range(0.0, height);
        let vx = rng.next_range(-0.5, 0.5) * speed;
        let vy = rng.next_range(-0.5, 0.5) * speed;
        Self {
            position: DVec2::new(x, y),
            velocity: DVec2::new(vx, vy),
            size: rng.next_range(SIZE_RANGE.0, SIZE_RANGE.1),
            opacity: rng.next_range(OPACITY_RANGE.0, OPACITY_RANGE.1),
            life: rng.next_u32_range(LIFE_RANGE.0, LIFE_RANGE.1),
        }
    }
}

/// Wraps one coordinate onto `[0, extent]`: below 0 lands on `extent`,
/// above `extent` lands on 0.
pub fn wrap_axis(value: f64, extent: f64) -> f64 {
    if value < 0.0 {
        extent
    } else if value > extent {
        0.0
    } else {
        value
    }
}

/// The ambient particle field.
///
/// Generic over its random stream so tests can script spawns; production
/// code uses the seeded [`Xorshift64`] default.
pub struct FieldSim<R: RandomSource = Xorshift64> {
    width: f64,
    height: f64,
    device: DeviceClass,
    config: FieldConfig,
    particles: Vec<FieldParticle>,
    rng: R,
}

impl FieldSim<Xorshift64> {
    /// Creates a field seeded with `seed`.
    pub fn new(
        width: f64,
        height: f64,
        device: DeviceClass,
        config: FieldConfig,
        seed: u64,
    ) -> Self {
        Self::with_rng(width, height, device, config, Xorshift64::new(seed))
    }

    /// Creates a field from a JSON params object (see [`FieldConfig::from_json`]).
    pub fn from_json(
        width: f64,
        height: f64,
        device: DeviceClass,
        seed: u64,
        params: &Value,
    ) -> Self {
        Self::new(width, height, device, FieldConfig::from_json(params), seed)
    }
}

impl<R: RandomSource> FieldSim<R> {
    /// Creates a field drawing from an arbitrary random stream.
    ///
    /// The slot count and speed come from the tier for `device` and stay
    /// fixed for the lifetime of the field. The count is capped at
    /// [`MAX_COUNT`].
    pub fn with_rng(
        width: f64,
        height: f64,
        device: DeviceClass,
        config: FieldConfig,
        mut rng: R,
    ) -> Self {
        let mut config = config;
        config.constrained.count = config.constrained.count.min(MAX_COUNT);
        config.standard.count = config.standard.count.min(MAX_COUNT);
        let tier = config.tier(device);
        let particles = (0..tier.count)
            .map(|_| FieldParticle::spawn(&mut rng, width, height, tier.speed))
            .collect();
        debug!(
            width,
            height,
            device = device.name(),
            count = tier.count,
            speed = tier.speed,
            "field initialized"
        );
        Self {
            width,
            height,
            device,
            config,
            particles,
            rng,
        }
    }

    /// Updates the surface bounds. Existing particles are left in place and
    /// wrap against the new bounds on their next out-of-range step.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn device(&self) -> DeviceClass {
        self.device
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Particle slots in index order.
    pub fn particles(&self) -> &[FieldParticle] {
        &self.particles
    }

    /// Spawns a particle against the current bounds and tier.
    pub fn spawn(&mut self) -> FieldParticle {
        let speed = self.config.tier(self.device).speed;
        FieldParticle::spawn(&mut self.rng, self.width, self.height, speed)
    }
}

impl<R: RandomSource> Simulation for FieldSim<R> {
    fn step(&mut self) {
        let speed = self.config.tier(self.device).speed;
        let Self {
            width,
            height,
            particles,
            rng,
            ..
        } = self;

        for slot in particles.iter_mut() {
            slot.position += slot.velocity;
            slot.life = slot.life.saturating_sub(1);
            slot.position.x = wrap_axis(slot.position.x, *width);
            slot.position.y = wrap_axis(slot.position.y, *height);
            if slot.life == 0 {
                *slot = FieldParticle::spawn(rng, *width, *height, speed);
            }
        }
    }

    fn frame(&self) -> Frame {
        Frame {
            backdrop: Backdrop::Fade {
                color: Srgb::BLACK,
                alpha: self.config.trail_alpha,
            },
            primitives: self
                .particles
                .iter()
                .map(|p| Primitive {
                    x: p.position.x,
                    y: p.position.y,
                    size: p.size,
                    color: self.config.color,
                    opacity: p.opacity,
                    shape: Shape::Disc,
                })
                .collect(),
        }
    }

    fn particle_count(&self) -> usize {
        self.particles.len()
    }

    fn params(&self) -> Value {
        json!({
            "device": self.device.name(),
            "constrained_count": self.config.constrained.count,
            "standard_count": self.config.standard.count,
            "constrained_speed": self.config.constrained.speed,
            "standard_speed": self.config.standard.speed,
            "color": self.config.color.to_hex(),
            "trail_alpha": self.config.trail_alpha,
        })
    }

    fn param_schema(&self) -> Value {
        json!({
            "preset": {
                "type": "string",
                "default": "background",
                "enum": FieldConfig::preset_names(),
                "description": "Base configuration; other keys override it"
            },
            "constrained_count": {
                "type": "integer",
                "default": CONSTRAINED_COUNT,
                "min": 0,
                "max": MAX_COUNT,
                "description": "Particle slots on constrained devices"
            },
            "standard_count": {
                "type": "integer",
                "default": STANDARD_COUNT,
                "min": 0,
                "max": MAX_COUNT,
                "description": "Particle slots on standard devices"
            },
            "constrained_speed": {
                "type": "number",
                "default": BACKGROUND_CONSTRAINED_SPEED,
                "min": 0.0,
                "max": 5.0,
                "description": "Velocity scale on constrained devices"
            },
            "standard_speed": {
                "type": "number",
                "default": STANDARD_SPEED,
                "min": 0.0,
                "max": 5.0,
                "description": "Velocity scale on standard devices"
            },
            "color": {
                "type": "string",
                "default": DEFAULT_COLOR.to_hex(),
                "description": "Particle fill color as #rrggbb"
            },
            "trail_alpha": {
                "type": "number",
                "default": DEFAULT_TRAIL_ALPHA,
                "min": 0.0,
                "max": 1.0,
                "description": "Alpha of the black fill drawn before each frame"
            }
        })
    }
}
