//! Generation parameters and lenient JSON extraction helpers.
//!
//! The `param_*` helpers take a JSON value, a key name, and a default. If the
//! key is missing or the value is not the expected type, the default is
//! returned. They never fail. [`GenerationParameters::from_json`] builds on
//! them and then validates the result.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::color::{normalize_hue, Lch};
use crate::error::PaletteError;
use crate::interpolate::Method;

/// Extracts an `f64` from `params[name]`, returning `default` if missing or wrong type.
///
/// JSON integers are accepted and converted.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Extracts an optional `f64`. Missing, `null` and non-numeric values all give `None`.
pub fn param_opt_f64(params: &Value, name: &str) -> Option<f64> {
    params.get(name).and_then(Value::as_f64)
}

/// Extracts a `usize` from `params[name]`, returning `default` if missing or wrong type.
///
/// Only non-negative integers are accepted.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

pub fn param_bool(params: &Value, name: &str, default: bool) -> bool {
    params.get(name).and_then(Value::as_bool).unwrap_or(default)
}

pub fn param_string(params: &Value, name: &str, default: &str) -> String {
    params
        .get(name)
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| default.to_owned())
}

/// Background variant a palette is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Base lightness, chroma and hue used when no seed color is given.
    pub const fn defaults(self) -> Lch {
        match self {
            Theme::Dark => Lch::new(58.0, 73.0, 37.0),
            Theme::Light => Lch::new(65.0, 71.0, 53.0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Theme {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            _ => Err(PaletteError::InvalidParameter(format!(
                "theme must be 'dark' or 'light', got '{s}'"
            ))),
        }
    }
}

/// Configuration for one call to [`crate::generate::generate_theme_colors`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParameters {
    pub theme: Theme,
    /// Hue of the first color in degrees; `None` uses the theme default.
    pub start_hue: Option<f64>,
    pub num_colors: usize,
    /// Target CIEDE2000 distance between consecutive colors in perceptual mode.
    pub target_delta_e: f64,
    /// Use equal hue steps instead of the Delta E search.
    pub uniform: bool,
    pub method: Method,
    /// Exponent for [`Method::Exponential`].
    pub exponent: f64,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            start_hue: None,
            num_colors: 12,
            target_delta_e: 25.0,
            uniform: false,
            method: Method::Linear,
            exponent: 2.0,
        }
    }
}

impl GenerationParameters {
    /// Builds parameters from a loosely typed JSON object.
    ///
    /// Missing or mistyped keys fall back to [`Default`]. Unknown theme or
    /// method names are errors, as is anything [`validate`](Self::validate) rejects.
    pub fn from_json(params: &Value) -> Result<Self, PaletteError> {
        let defaults = Self::default();
        let built = Self {
            theme: param_string(params, "theme", defaults.theme.name()).parse()?,
            start_hue: param_opt_f64(params, "start_hue"),
            num_colors: param_usize(params, "num_colors", defaults.num_colors),
            target_delta_e: param_f64(params, "target_delta_e", defaults.target_delta_e),
            uniform: param_bool(params, "uniform", defaults.uniform),
            method: param_string(params, "method", defaults.method.name()).parse()?,
            exponent: param_f64(params, "exponent", defaults.exponent),
        };
        built.validate()?;
        Ok(built)
    }

    /// Checks every numeric field.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` for `num_colors == 0`, a non-positive
    /// `target_delta_e` or `exponent`, or any non-finite number.
    pub fn validate(&self) -> Result<(), PaletteError> {
        if self.num_colors < 1 {
            return Err(PaletteError::InvalidParameter(format!(
                "num_colors must be >= 1, got {}",
                self.num_colors
            )));
        }
        if !(self.target_delta_e.is_finite() && self.target_delta_e > 0.0) {
            return Err(PaletteError::InvalidParameter(format!(
                "target_delta_e must be > 0, got {}",
                self.target_delta_e
            )));
        }
        if !(self.exponent.is_finite() && self.exponent > 0.0) {
            return Err(PaletteError::InvalidParameter(format!(
                "exponent must be > 0, got {}",
                self.exponent
            )));
        }
        if let Some(hue) = self.start_hue {
            if !hue.is_finite() {
                return Err(PaletteError::InvalidParameter(format!(
                    "start_hue must be finite, got {hue}"
                )));
            }
        }
        Ok(())
    }

    /// Start hue normalized into `[0, 360)`, or the theme default.
    pub fn effective_start_hue(&self) -> f64 {
        normalize_hue(self.start_hue.unwrap_or(self.theme.defaults().h))
    }

    /// The theme's base color with the effective start hue.
    pub fn base_color(&self) -> Lch {
        let base = self.theme.defaults();
        Lch::new(base.l, base.c, self.effective_start_hue())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // -- param helpers --

    #[test]
    fn param_f64_extracts_integer_as_float() {
        let params = json!({"count": 10});
        assert!((param_f64(&params, "count", 0.0) - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_returns_default_when_wrong_type() {
        let params = json!({"target_delta_e": "far"});
        assert!((param_f64(&params, "target_delta_e", 1.0) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_returns_default_for_non_object() {
        let params = json!("not an object");
        assert!((param_f64(&params, "exponent", 7.0) - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_opt_f64_treats_null_as_missing() {
        assert_eq!(param_opt_f64(&json!({"start_hue": null}), "start_hue"), None);
        assert_eq!(param_opt_f64(&json!({"start_hue": 90}), "start_hue"), Some(90.0));
    }

    #[test]
    fn param_usize_rejects_float_and_negative() {
        assert_eq!(param_usize(&json!({"n": 2.5}), "n", 99), 99);
        assert_eq!(param_usize(&json!({"n": -1}), "n", 5), 5);
        assert_eq!(param_usize(&json!({"n": 42}), "n", 0), 42);
    }

    #[test]
    fn param_bool_returns_default_for_wrong_type() {
        assert!(!param_bool(&json!({"uniform": 1}), "uniform", false));
        assert!(param_bool(&json!({"uniform": true}), "uniform", false));
    }

    #[test]
    fn param_string_returns_default_for_wrong_type() {
        assert_eq!(param_string(&json!({"theme": 42}), "theme", "dark"), "dark");
        assert_eq!(param_string(&json!({"theme": ""}), "theme", "dark"), "");
    }

    // -- Theme --

    #[test]
    fn theme_defaults_match_base_colors() {
        assert_eq!(Theme::Dark.defaults(), Lch::new(58.0, 73.0, 37.0));
        assert_eq!(Theme::Light.defaults(), Lch::new(65.0, 71.0, 53.0));
    }

    #[test]
    fn theme_parses_case_insensitively() {
        assert_eq!("Light".parse::<Theme>().unwrap(), Theme::Light);
        assert!(matches!(
            "sepia".parse::<Theme>(),
            Err(PaletteError::InvalidParameter(_))
        ));
    }

    // -- GenerationParameters --

    #[test]
    fn defaults_are_valid() {
        let p = GenerationParameters::default();
        assert!(p.validate().is_ok());
        assert_eq!(p.num_colors, 12);
        assert_eq!(p.effective_start_hue(), 37.0);
    }

    #[test]
    fn from_json_fills_missing_keys() {
        let p = GenerationParameters::from_json(&json!({"theme": "light", "num_colors": 5}))
            .unwrap();
        assert_eq!(p.theme, Theme::Light);
        assert_eq!(p.num_colors, 5);
        assert_eq!(p.target_delta_e, 25.0);
        assert_eq!(p.method, Method::Linear);
        assert_eq!(p.effective_start_hue(), 53.0);
    }

    #[test]
    fn from_json_reads_every_field() {
        let p = GenerationParameters::from_json(&json!({
            "theme": "dark",
            "start_hue": 400,
            "num_colors": 8,
            "target_delta_e": 18.5,
            "uniform": true,
            "method": "exponential",
            "exponent": 3,
        }))
        .unwrap();
        assert_eq!(p.start_hue, Some(400.0));
        assert!((p.effective_start_hue() - 40.0).abs() < 1e-9);
        assert!(p.uniform);
        assert_eq!(p.method, Method::Exponential);
        assert_eq!(p.exponent, 3.0);
    }

    #[test]
    fn from_json_rejects_unknown_method() {
        let err = GenerationParameters::from_json(&json!({"method": "bezier"})).unwrap_err();
        assert_eq!(err, PaletteError::UnsupportedMethod("bezier".into()));
    }

    #[test]
    fn from_json_rejects_zero_colors() {
        assert!(matches!(
            GenerationParameters::from_json(&json!({"num_colors": 0})),
            Err(PaletteError::InvalidParameter(_))
        ));
    }

    #[test]
    fn validate_rejects_bad_numbers() {
        let bad = [
            GenerationParameters {
                target_delta_e: 0.0,
                ..Default::default()
            },
            GenerationParameters {
                target_delta_e: f64::NAN,
                ..Default::default()
            },
            GenerationParameters {
                exponent: -2.0,
                ..Default::default()
            },
            GenerationParameters {
                start_hue: Some(f64::INFINITY),
                ..Default::default()
            },
        ];
        for params in bad {
            assert!(
                matches!(params.validate(), Err(PaletteError::InvalidParameter(_))),
                "{params:?} accepted"
            );
        }
    }

    #[test]
    fn negative_start_hue_is_normalized() {
        let p = GenerationParameters {
            start_hue: Some(-30.0),
            ..Default::default()
        };
        assert_eq!(p.base_color(), Lch::new(58.0, 73.0, 330.0));
    }

    #[test]
    fn deserializes_partial_document() {
        let p: GenerationParameters =
            serde_json::from_value(json!({"uniform": true, "method": "lch"})).unwrap();
        assert!(p.uniform);
        assert_eq!(p.method, Method::Lch);
        assert_eq!(p.num_colors, 12);
        assert_eq!(p.theme, Theme::Dark);
    }

    #[test]
    fn serde_round_trip() {
        let original = GenerationParameters {
            theme: Theme::Light,
            start_hue: Some(120.0),
            ..Default::default()
        };
        let json = serde_json::to_string(&original).unwrap();
        let restored: GenerationParameters = serde_json::from_str(&json).unwrap();
        assert_eq!(original, restored);
    }
}
