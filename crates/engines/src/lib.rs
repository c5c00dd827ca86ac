#![deny(unsafe_code)]
//! Effect registry: maps effect names to implementations, plus the CPU-side
//! raster painter and PNG snapshot I/O.
//!
//! This crate sits between `motes-core` (which defines the `Simulation`
//! trait) and the individual effect crates (`motes-field`, `motes-reveal`).
//! The CLI depends on it to avoid duplicating dispatch logic.

pub mod raster;

#[cfg(feature = "png")]
pub mod snapshot;

use std::time::Duration;

use motes_core::error::SimError;
use motes_core::{DeviceClass, Frame, Seed, Simulation};
use motes_field::FieldSim;
use motes_reveal::Reveal;
use serde_json::Value;

/// All available effect names.
const EFFECT_NAMES: &[&str] = &["field", "reveal"];

/// Enumeration of all available effects.
///
/// Wraps each implementation and delegates `Simulation` trait methods.
/// Use [`EffectKind::from_name`] for string-based construction.
pub enum EffectKind {
    /// Drifting toroidal field (background and loading screen).
    Field(FieldSim),
    /// Image-to-particle reveal.
    Reveal(Reveal),
}

impl EffectKind {
    /// Constructs an effect by name.
    ///
    /// The reveal effect starts empty; feed it an image through
    /// [`EffectKind::as_reveal_mut`] before starting its animator.
    /// Returns `SimError::UnknownEffect` if the name is not recognized.
    pub fn from_name(
        name: &str,
        width: f64,
        height: f64,
        device: DeviceClass,
        seed: u64,
        params: &Value,
    ) -> Result<Self, SimError> {
        match name {
            "field" => Ok(EffectKind::Field(FieldSim::from_json(
                width, height, device, seed, params,
            ))),
            "reveal" => Ok(EffectKind::Reveal(Reveal::from_json(seed, params))),
            _ => Err(SimError::UnknownEffect(name.to_string())),
        }
    }

    /// Constructs the effect a [`Seed`] describes.
    pub fn from_seed(seed: &Seed) -> Result<Self, SimError> {
        Self::from_name(
            &seed.effect,
            seed.width as f64,
            seed.height as f64,
            seed.device_class(),
            seed.seed,
            &seed.params,
        )
    }

    /// Returns a slice of all recognized effect names.
    pub fn list_effects() -> &'static [&'static str] {
        EFFECT_NAMES
    }

    pub fn name(&self) -> &'static str {
        match self {
            EffectKind::Field(_) => "field",
            EffectKind::Reveal(_) => "reveal",
        }
    }

    /// Delay the caller should wait before starting the frame loop.
    pub fn warmup(&self) -> Duration {
        match self {
            EffectKind::Field(_) => Duration::ZERO,
            EffectKind::Reveal(r) => r.warmup(),
        }
    }

    /// Propagates a viewport resize. The reveal surface follows its image
    /// and ignores viewport changes.
    pub fn resize(&mut self, width: f64, height: f64) {
        if let EffectKind::Field(f) = self {
            f.resize(width, height);
        }
    }

    pub fn as_field_mut(&mut self) -> Option<&mut FieldSim> {
        match self {
            EffectKind::Field(f) => Some(f),
            EffectKind::Reveal(_) => None,
        }
    }

    pub fn as_reveal_mut(&mut self) -> Option<&mut Reveal> {
        match self {
            EffectKind::Reveal(r) => Some(r),
            EffectKind::Field(_) => None,
        }
    }
}

impl Simulation for EffectKind {
    fn step(&mut self) {
        match self {
            EffectKind::Field(e) => e.step(),
            EffectKind::Reveal(e) => e.step(),
        }
    }

    fn frame(&self) -> Frame {
        match self {
            EffectKind::Field(e) => e.frame(),
            EffectKind::Reveal(e) => e.frame(),
        }
    }

    fn particle_count(&self) -> usize {
        match self {
            EffectKind::Field(e) => e.particle_count(),
            EffectKind::Reveal(e) => e.particle_count(),
        }
    }

    fn is_ready(&self) -> bool {
        match self {
            EffectKind::Field(e) => e.is_ready(),
            EffectKind::Reveal(e) => e.is_ready(),
        }
    }

    fn params(&self) -> Value {
        match self {
            EffectKind::Field(e) => e.params(),
            EffectKind::Reveal(e) => e.params(),
        }
    }

    fn param_schema(&self) -> Value {
        match self {
            EffectKind::Field(e) => e.param_schema(),
            EffectKind::Reveal(e) => e.param_schema(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use motes_core::{Animator, Lifecycle, ManualScheduler, RasterImage};
    use serde_json::json;

    fn field() -> EffectKind {
        EffectKind::from_name("field", 320.0, 240.0, DeviceClass::Standard, 42, &json!({}))
            .unwrap()
    }

    #[test]
    fn from_name_field_succeeds() {
        let e = field();
        assert_eq!(e.name(), "field");
        assert_eq!(e.particle_count(), 100);
        assert!(e.is_ready());
    }

    #[test]
    fn from_name_reveal_starts_empty_and_not_ready() {
        let e = EffectKind::from_name("reveal", 0.0, 0.0, DeviceClass::Standard, 1, &json!({}))
            .unwrap();
        assert_eq!(e.name(), "reveal");
        assert_eq!(e.particle_count(), 0);
        assert!(!e.is_ready());
        assert_eq!(e.warmup(), Duration::from_millis(7000));
    }

    #[test]
    fn from_name_unknown_returns_error() {
        let result =
            EffectKind::from_name("sparkle", 32.0, 32.0, DeviceClass::Standard, 42, &json!({}));
        assert!(matches!(result, Err(SimError::UnknownEffect(_))));
    }

    #[test]
    fn list_effects_includes_both() {
        let names = EffectKind::list_effects();
        assert!(names.contains(&"field"));
        assert!(names.contains(&"reveal"));
    }

    #[test]
    fn from_seed_uses_derived_device() {
        let seed = Seed::new("field", 500, 900, 3);
        let e = EffectKind::from_seed(&seed).unwrap();
        assert_eq!(e.particle_count(), 40);
        assert_eq!(e.params()["device"], "constrained");
    }

    #[test]
    fn resize_reaches_field_only() {
        let mut e = field();
        e.resize(10.0, 20.0);
        let f = e.as_field_mut().unwrap();
        assert_eq!((f.width(), f.height()), (10.0, 20.0));

        let mut r = EffectKind::from_name("reveal", 0.0, 0.0, DeviceClass::Standard, 1, &json!({}))
            .unwrap();
        r.resize(10.0, 20.0);
        assert_eq!(r.as_reveal_mut().unwrap().width(), 0);
        assert!(r.as_field_mut().is_none());
    }

    #[test]
    fn reveal_through_registry_loads_and_animates() {
        let mut e = EffectKind::from_name("reveal", 0.0, 0.0, DeviceClass::Standard, 1, &json!({}))
            .unwrap();
        let img = RasterImage::filled(6, 6, [200, 10, 10, 255]).unwrap();
        e.as_reveal_mut().unwrap().load(&img);
        assert_eq!(e.particle_count(), 9);

        let clock = ManualScheduler::new();
        let mut anim = Animator::new(e, clock.clone());
        anim.start().unwrap();
        let h = clock.fire_next().unwrap();
        assert!(anim.tick(h).unwrap());
        assert_eq!(anim.state(), Lifecycle::Running);
    }

    #[test]
    fn determinism_same_seed() {
        let mut a = field();
        let mut b = field();
        for _ in 0..50 {
            a.step();
            b.step();
        }
        assert_eq!(a.frame(), b.frame());
    }

    #[test]
    fn object_safety() {
        let boxed: Box<dyn Simulation> = Box::new(field());
        assert_eq!(boxed.frame().len(), 100);
    }
}
