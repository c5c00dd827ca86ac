//! Reproducible description of a rendered effect.
//!
//! A [`Seed`] captures everything needed to replay a run: effect name,
//! surface dimensions, parameter overrides, PRNG seed, device tier and frame
//! count. The CLI reads and prints seeds as JSON.

use crate::device::DeviceClass;
use crate::error::SimError;
use serde::{Deserialize, Serialize};

/// Reproducible description of one effect run.
///
/// Two identical seeds fed to the same binary produce bit-identical frames
/// (for the reveal effect, given the same source image).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Seed {
    pub effect: String,
    pub width: usize,
    pub height: usize,
    #[serde(default = "empty_params")]
    pub params: serde_json::Value,
    pub seed: u64,
    #[serde(default)]
    pub frames: usize,
    /// Explicit device tier; derived from `width` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<DeviceClass>,
}

fn empty_params() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl Seed {
    /// Creates a seed with empty params, zero frames and a derived device tier.
    pub fn new(effect: &str, width: usize, height: usize, seed: u64) -> Self {
        Self {
            effect: effect.to_string(),
            width,
            height,
            params: empty_params(),
            seed,
            frames: 0,
            device: None,
        }
    }

    /// The device tier to simulate: explicit, or classified from `width`.
    pub fn device_class(&self) -> DeviceClass {
        self.device
            .unwrap_or_else(|| DeviceClass::from_viewport_width(self.width as f64))
    }

    /// Validates that the seed describes a paintable surface.
    ///
    /// Simulations tolerate degenerate sizes, but a raster output needs
    /// non-zero dimensions whose product does not overflow.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.width == 0 || self.height == 0 {
            return Err(SimError::InvalidDimensions);
        }
        self.width
            .checked_mul(self.height)
            .and_then(|n| n.checked_mul(4))
            .ok_or(SimError::InvalidDimensions)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_creates_seed_with_defaults() {
        let s = Seed::new("field", 1280, 720, 42);
        assert_eq!(s.effect, "field");
        assert_eq!(s.frames, 0);
        assert_eq!(s.params, serde_json::json!({}));
        assert_eq!(s.device, None);
    }

    #[test]
    fn device_class_derives_from_width() {
        assert_eq!(
            Seed::new("field", 400, 800, 1).device_class(),
            DeviceClass::Constrained
        );
        assert_eq!(
            Seed::new("field", 1920, 1080, 1).device_class(),
            DeviceClass::Standard
        );
    }

    #[test]
    fn explicit_device_overrides_width() {
        let mut s = Seed::new("field", 1920, 1080, 1);
        s.device = Some(DeviceClass::Constrained);
        assert_eq!(s.device_class(), DeviceClass::Constrained);
    }

    #[test]
    fn json_round_trip_with_custom_params() {
        let mut s = Seed::new("field", 256, 256, 99);
        s.params = serde_json::json!({"preset": "loading", "trail_alpha": 0.1});
        s.frames = 300;
        s.device = Some(DeviceClass::Standard);
        let json = serde_json::to_string_pretty(&s).unwrap();
        let restored: Seed = serde_json::from_str(&json).unwrap();
        assert_eq!(s, restored);
    }

    #[test]
    fn minimal_json_fills_defaults() {
        let s: Seed =
            serde_json::from_str(r#"{"effect":"reveal","width":64,"height":32,"seed":7}"#)
                .unwrap();
        assert_eq!(s.frames, 0);
        assert_eq!(s.params, serde_json::json!({}));
        assert_eq!(s.device, None);
    }

    #[test]
    fn absent_device_is_not_serialized() {
        let v = serde_json::to_value(Seed::new("field", 8, 8, 1)).unwrap();
        assert!(v.get("device").is_none());
    }

    #[test]
    fn validate_succeeds_for_valid_seed() {
        assert!(Seed::new("field", 512, 512, 42).validate().is_ok());
    }

    #[test]
    fn validate_fails_for_zero_dimension() {
        assert!(Seed::new("field", 0, 512, 42).validate().is_err());
        assert!(Seed::new("field", 512, 0, 42).validate().is_err());
    }

    #[test]
    fn validate_fails_for_overflow() {
        assert!(Seed::new("field", usize::MAX, 2, 42).validate().is_err());
    }
}
