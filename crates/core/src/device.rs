//! Device tier used to scale particle density and speed.

use serde::{Deserialize, Serialize};

/// Viewports narrower than this many pixels count as constrained devices.
pub const CONSTRAINED_BREAKPOINT: f64 = 768.0;

/// Coarse device classification, evaluated once when a simulation is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    /// Small or low-power viewport: fewer, optionally slower particles.
    Constrained,
    #[default]
    Standard,
}

impl DeviceClass {
    /// Classifies a viewport by its width in pixels.
    pub fn from_viewport_width(width: f64) -> Self {
        if width < CONSTRAINED_BREAKPOINT {
            DeviceClass::Constrained
        } else {
            DeviceClass::Standard
        }
    }

    /// Parses `"constrained"` / `"mobile"` or `"standard"` / `"desktop"`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "constrained" | "mobile" => Some(DeviceClass::Constrained),
            "standard" | "desktop" => Some(DeviceClass::Standard),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DeviceClass::Constrained => "constrained",
            DeviceClass::Standard => "standard",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoint_is_exclusive() {
        assert_eq!(
            DeviceClass::from_viewport_width(767.0),
            DeviceClass::Constrained
        );
        assert_eq!(
            DeviceClass::from_viewport_width(768.0),
            DeviceClass::Standard
        );
    }

    #[test]
    fn degenerate_widths_are_constrained() {
        assert_eq!(DeviceClass::from_viewport_width(0.0), DeviceClass::Constrained);
        assert_eq!(
            DeviceClass::from_viewport_width(-10.0),
            DeviceClass::Constrained
        );
    }

    #[test]
    fn from_name_accepts_aliases() {
        assert_eq!(DeviceClass::from_name("mobile"), Some(DeviceClass::Constrained));
        assert_eq!(DeviceClass::from_name("desktop"), Some(DeviceClass::Standard));
        assert_eq!(DeviceClass::from_name("tablet"), None);
    }

    #[test]
    fn name_round_trips_through_from_name() {
        for class in [DeviceClass::Constrained, DeviceClass::Standard] {
            assert_eq!(DeviceClass::from_name(class.name()), Some(class));
        }
    }
}
