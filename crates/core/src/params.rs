//! Tolerant extraction of typed parameters from a `serde_json::Value` object.
//!
//! Each helper takes a JSON value, a key name, and a default. If the key is
//! missing or the value has the wrong type, the default is returned. These
//! never fail: a cosmetic effect should fall back, not refuse to draw.

use serde_json::Value;
use tracing::warn;

use crate::color::Srgb;

/// Extracts an `f64` from `params[name]`, accepting integers too.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Extracts a non-negative integer from `params[name]` as `usize`.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

/// Extracts a `String` from `params[name]`.
pub fn param_string(params: &Value, name: &str, default: &str) -> String {
    params
        .get(name)
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| default.to_owned())
}

/// Extracts a hex color from `params[name]`.
///
/// An unparseable color is logged and replaced by `default`.
pub fn param_color(params: &Value, name: &str, default: Srgb) -> Srgb {
    match params.get(name).and_then(Value::as_str) {
        Some(hex) => Srgb::from_hex(hex).unwrap_or_else(|e| {
            warn!(param = name, error = %e, "ignoring invalid color parameter");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn param_f64_extracts_existing_float() {
        let params = json!({"trail_alpha": 0.1});
        assert!((param_f64(&params, "trail_alpha", 0.05) - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_extracts_integer_as_float() {
        let params = json!({"standard_speed": 1});
        assert!((param_f64(&params, "standard_speed", 0.5) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_returns_default_when_wrong_type() {
        let params = json!({"standard_speed": "fast"});
        assert!((param_f64(&params, "standard_speed", 0.5) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_returns_default_for_non_object() {
        let params = json!("not an object");
        assert!((param_f64(&params, "speed", 7.0) - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_usize_extracts_existing_integer() {
        let params = json!({"standard_count": 250});
        assert_eq!(param_usize(&params, "standard_count", 100), 250);
    }

    #[test]
    fn param_usize_returns_default_for_float_value() {
        let params = json!({"standard_count": 2.5});
        assert_eq!(param_usize(&params, "standard_count", 100), 100);
    }

    #[test]
    fn param_usize_returns_default_for_negative_integer() {
        let params = json!({"warmup_ms": -1});
        assert_eq!(param_usize(&params, "warmup_ms", 7000), 7000);
    }

    #[test]
    fn param_string_extracts_existing_string() {
        let params = json!({"preset": "loading"});
        assert_eq!(param_string(&params, "preset", "background"), "loading");
    }

    #[test]
    fn param_string_returns_default_for_wrong_type() {
        let params = json!({"preset": 42});
        assert_eq!(param_string(&params, "preset", "background"), "background");
    }

    #[test]
    fn param_color_parses_hex() {
        let params = json!({"color": "#ff0000"});
        assert_eq!(
            param_color(&params, "color", Srgb::BLACK),
            Srgb::from_rgb8(255, 0, 0)
        );
    }

    #[test]
    fn param_color_falls_back_on_bad_hex() {
        let params = json!({"color": "red"});
        assert_eq!(param_color(&params, "color", Srgb::WHITE), Srgb::WHITE);
    }

    #[test]
    fn param_color_falls_back_when_missing() {
        assert_eq!(param_color(&json!({}), "color", Srgb::BLACK), Srgb::BLACK);
    }
}
