//! sRGB color type shared by draw primitives and sampled image pixels.
//!
//! Components are `f64` in [0, 1]. Hex strings are the human-readable form
//! (params, serialized seeds); 8-bit triples are the pixel-buffer form.

use crate::error::SimError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// sRGB color with components in [0, 1].
///
/// Serializes as a hex string `"#rrggbb"`. The hex round-trip has 8-bit
/// quantization, which is fine because every color in this crate either
/// comes from a hex literal or from an 8-bit pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Srgb {
    pub const BLACK: Srgb = Srgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    pub const WHITE: Srgb = Srgb {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    /// Builds a color from an 8-bit RGB triple.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }

    /// Quantizes to an 8-bit RGB triple with rounding.
    pub fn to_rgb8(self) -> [u8; 3] {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    /// Parses a hex color string like "#60a5fa" or "60A5FA".
    ///
    /// Returns `SimError::InvalidColor` if the input is not 6 hex digits.
    pub fn from_hex(hex: &str) -> Result<Srgb, SimError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(SimError::InvalidColor(format!(
                "expected 6 hex digits, got '{hex}'"
            )));
        }
        let channel = |range: std::ops::Range<usize>, name: &str| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|e| SimError::InvalidColor(format!("invalid {name} component: {e}")))
        };
        Ok(Srgb::from_rgb8(
            channel(0..2, "red")?,
            channel(2..4, "green")?,
            channel(4..6, "blue")?,
        ))
    }

    /// Converts the color to a hex string like `"#rrggbb"`.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// CSS `rgba(...)` string with the given alpha, as canvas fill styles expect.
    pub fn to_css_rgba(self, alpha: f64) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("rgba({r}, {g}, {b}, {:.2})", alpha.clamp(0.0, 1.0))
    }
}

impl Serialize for Srgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Srgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Srgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_hex_parses_with_and_without_hash() {
        let a = Srgb::from_hex("#60a5fa").unwrap();
        let b = Srgb::from_hex("60A5FA").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_rgb8(), [0x60, 0xa5, 0xfa]);
    }

    #[test]
    fn from_hex_rejects_wrong_length() {
        assert!(matches!(
            Srgb::from_hex("#fff"),
            Err(SimError::InvalidColor(_))
        ));
    }

    #[test]
    fn from_hex_rejects_non_hex_digits() {
        assert!(Srgb::from_hex("#gg0000").is_err());
    }

    #[test]
    fn from_hex_rejects_multibyte_input_without_panicking() {
        assert!(Srgb::from_hex("ééé").is_err());
    }

    #[test]
    fn hex_round_trip_is_exact_for_8bit_colors() {
        for hex in ["#000000", "#ffffff", "#60a5fa", "#123456"] {
            assert_eq!(Srgb::from_hex(hex).unwrap().to_hex(), hex);
        }
    }

    #[test]
    fn rgb8_round_trip() {
        assert_eq!(Srgb::from_rgb8(12, 200, 255).to_rgb8(), [12, 200, 255]);
    }

    #[test]
    fn to_rgb8_clamps_out_of_range_components() {
        let c = Srgb {
            r: -0.5,
            g: 2.0,
            b: 0.5,
        };
        assert_eq!(c.to_rgb8(), [0, 255, 128]);
    }

    #[test]
    fn css_rgba_formats_two_decimal_alpha() {
        let c = Srgb::from_rgb8(96, 165, 250);
        assert_eq!(c.to_css_rgba(0.456), "rgba(96, 165, 250, 0.46)");
        assert_eq!(c.to_css_rgba(3.0), "rgba(96, 165, 250, 1.00)");
    }

    #[test]
    fn serde_uses_hex_string() {
        let c = Srgb::from_hex("#60a5fa").unwrap();
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "\"#60a5fa\"");
        let back: Srgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn deserialize_rejects_bad_hex() {
        assert!(serde_json::from_str::<Srgb>("\"nope\"").is_err());
    }
}
