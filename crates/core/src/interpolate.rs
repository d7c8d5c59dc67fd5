//! Scalar easing functions and color-level interpolation.
//!
//! Every scalar function maps `(start, end, t)` with `t` in `[0, 1]` and
//! returns `start` at `t = 0` and `end` at `t = 1`. [`interpolate_colors`]
//! threads a [`Method`] through RGB, HSV or LCH space.

use std::collections::HashMap;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::analysis::{classify_color_lightness, Lightness, DARK_THRESHOLD, LIGHT_THRESHOLD};
use crate::color::{
    hsv_to_rgb, lch_to_hex, normalize_hue, rgb_to_hsv, rgb_to_lch, Hsv, Lch, Rgb,
};
use crate::error::PaletteError;
use crate::params::GenerationParameters;

/// Number of colors between black and white in a Spyder-style gradient.
const SPYDER_INNER_STEPS: usize = 14;

// ---------------------------------------------------------------------------
// Scalar interpolation
// ---------------------------------------------------------------------------

pub fn linear(start: f64, end: f64, t: f64) -> f64 {
    start + (end - start) * t
}

/// Smoothstep (`3t² - 2t³`) applied before a linear blend.
pub fn cubic(start: f64, end: f64, t: f64) -> f64 {
    linear(start, end, t * t * (3.0 - 2.0 * t))
}

/// `t^exponent` applied before a linear blend.
///
/// Fails with `InvalidParameter` unless `exponent` is finite and positive.
pub fn exponential(start: f64, end: f64, t: f64, exponent: f64) -> Result<f64, PaletteError> {
    check_exponent(exponent)?;
    Ok(linear(start, end, t.powf(exponent)))
}

/// Half-cosine ease: `(1 - cos(tπ)) / 2`.
pub fn sine(start: f64, end: f64, t: f64) -> f64 {
    linear(start, end, (1.0 - (t * PI).cos()) / 2.0)
}

/// Same curve as [`sine`]. Both names are kept for callers that select
/// either one by name.
pub fn cosine(start: f64, end: f64, t: f64) -> f64 {
    sine(start, end, t)
}

/// Cubic Hermite basis with zero tangents at both ends.
pub fn hermite(start: f64, end: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    let h1 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h2 = -2.0 * t3 + 3.0 * t2;
    h1 * start + h2 * end
}

/// Quintic smootherstep (`6t⁵ - 15t⁴ + 10t³`) applied before a linear blend.
pub fn quintic(start: f64, end: f64, t: f64) -> f64 {
    linear(start, end, t * t * t * (t * (t * 6.0 - 15.0) + 10.0))
}

/// Interpolates between two angles in degrees along the shorter arc.
///
/// Both inputs are normalized into `[0, 360)` first and so is the result.
/// When the two arcs are equal (exactly 180° apart) the positive direction is taken.
pub fn circular(start_angle: f64, end_angle: f64, t: f64) -> f64 {
    let start = normalize_hue(start_angle);
    let end = normalize_hue(end_angle);
    let delta = match end - start {
        d if d > 180.0 => d - 360.0,
        d if d < -180.0 => d + 360.0,
        d => d,
    };
    normalize_hue(start + delta * t)
}

fn check_exponent(exponent: f64) -> Result<(), PaletteError> {
    if exponent.is_finite() && exponent > 0.0 {
        Ok(())
    } else {
        Err(PaletteError::InvalidParameter(format!(
            "exponent must be > 0, got {exponent}"
        )))
    }
}

// ---------------------------------------------------------------------------
// Method
// ---------------------------------------------------------------------------

/// Interpolation method for [`interpolate_colors`].
///
/// The first seven ease each RGB channel independently. `Hsv` and `Lch`
/// interpolate in those spaces instead, with circular hue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    #[default]
    Linear,
    Cubic,
    Exponential,
    Sine,
    Cosine,
    Hermite,
    Quintic,
    Hsv,
    Lch,
}

impl Method {
    pub const ALL: [Method; 9] = [
        Method::Linear,
        Method::Cubic,
        Method::Exponential,
        Method::Sine,
        Method::Cosine,
        Method::Hermite,
        Method::Quintic,
        Method::Hsv,
        Method::Lch,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Method::Linear => "linear",
            Method::Cubic => "cubic",
            Method::Exponential => "exponential",
            Method::Sine => "sine",
            Method::Cosine => "cosine",
            Method::Hermite => "hermite",
            Method::Quintic => "quintic",
            Method::Hsv => "hsv",
            Method::Lch => "lch",
        }
    }

    /// Whether this method interpolates in a cylindrical color space rather than RGB.
    pub fn is_color_space(self) -> bool {
        matches!(self, Method::Hsv | Method::Lch)
    }

    /// Applies the scalar curve of this method to `(start, end, t)`.
    ///
    /// Color-space methods blend linearly here; their hue handling lives in
    /// [`interpolate_colors`].
    pub fn apply(self, start: f64, end: f64, t: f64, exponent: f64) -> Result<f64, PaletteError> {
        Ok(match self {
            Method::Linear | Method::Hsv | Method::Lch => linear(start, end, t),
            Method::Cubic => cubic(start, end, t),
            Method::Exponential => exponential(start, end, t, exponent)?,
            Method::Sine => sine(start, end, t),
            Method::Cosine => cosine(start, end, t),
            Method::Hermite => hermite(start, end, t),
            Method::Quintic => quintic(start, end, t),
        })
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PaletteError::UnsupportedMethod(s.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Color interpolation
// ---------------------------------------------------------------------------

/// Interpolates `steps` colors from `start_hex` to `end_hex`, both included.
///
/// Factors are `i / (steps - 1)`; a single step yields only the start color.
/// RGB methods truncate each channel. The LCH path goes straight through
/// [`lch_to_hex`] without gamut correction, so an out-of-gamut midpoint
/// comes back as neutral gray.
///
/// # Errors
///
/// `InvalidFormat` for a malformed color, `InvalidParameter` for `steps == 0`
/// or a non-positive exponent with [`Method::Exponential`].
pub fn interpolate_colors(
    start_hex: &str,
    end_hex: &str,
    steps: usize,
    method: Method,
    exponent: f64,
) -> Result<Vec<String>, PaletteError> {
    let start = Rgb::from_hex(start_hex)?;
    let end = Rgb::from_hex(end_hex)?;
    if steps < 1 {
        return Err(PaletteError::InvalidParameter(format!(
            "steps must be >= 1, got {steps}"
        )));
    }
    if method == Method::Exponential {
        check_exponent(exponent)?;
    }

    let factors = (0..steps).map(|i| {
        if steps > 1 {
            i as f64 / (steps - 1) as f64
        } else {
            0.0
        }
    });

    match method {
        Method::Hsv => {
            let a = rgb_to_hsv(start);
            let b = rgb_to_hsv(end);
            Ok(factors
                .map(|t| {
                    let hsv = Hsv {
                        h: circular(a.h * 360.0, b.h * 360.0, t) / 360.0,
                        s: linear(a.s, b.s, t),
                        v: linear(a.v, b.v, t),
                    };
                    hsv_to_rgb(hsv).to_hex()
                })
                .collect())
        }
        Method::Lch => {
            let a = rgb_to_lch(start);
            let b = rgb_to_lch(end);
            Ok(factors
                .map(|t| {
                    lch_to_hex(Lch::new(
                        linear(a.l, b.l, t),
                        linear(a.c, b.c, t),
                        circular(a.h, b.h, t),
                    ))
                })
                .collect())
        }
        _ => factors
            .map(|t| {
                let f = method.apply(0.0, 1.0, t, exponent)?;
                let rgb = Rgb::from_channels(
                    linear(f64::from(start.r), f64::from(end.r), f),
                    linear(f64::from(start.g), f64::from(end.g), f),
                    linear(f64::from(start.b), f64::from(end.b), f),
                );
                Ok(rgb.to_hex())
            })
            .collect(),
    }
}

/// [`interpolate_colors`] driven by `params`: `num_colors` steps with the
/// configured method and exponent.
pub fn interpolate_with_params(
    start_hex: &str,
    end_hex: &str,
    params: &GenerationParameters,
) -> Result<Vec<String>, PaletteError> {
    params.validate()?;
    interpolate_colors(start_hex, end_hex, params.num_colors, params.method, params.exponent)
}

/// Builds a 16-color Spyder-style gradient: `#000000`, fourteen colors
/// interpolated from `dark` to `light` (both included), then `#FFFFFF`.
pub fn interpolate_spyder_palette(
    dark: &str,
    light: &str,
    method: Method,
    exponent: f64,
) -> Result<Vec<String>, PaletteError> {
    let inner = interpolate_colors(dark, light, SPYDER_INNER_STEPS, method, exponent)?;
    let mut colors = Vec::with_capacity(SPYDER_INNER_STEPS + 2);
    colors.push(Rgb::BLACK.to_hex());
    colors.extend(inner);
    colors.push(Rgb::WHITE.to_hex());
    Ok(colors)
}

/// Checks that `dark` is clearly dark and `light` clearly light before
/// building a Spyder-style gradient from them.
///
/// Returns `InvalidFormat` for malformed colors and `InvalidParameter`
/// naming the problem (swapped inputs, ambiguous medium lightness, or a
/// color in the wrong role).
pub fn validate_spyder_colors(dark: &str, light: &str) -> Result<(), PaletteError> {
    let dark_class = classify_color_lightness(dark, DARK_THRESHOLD, LIGHT_THRESHOLD)?;
    let light_class = classify_color_lightness(light, DARK_THRESHOLD, LIGHT_THRESHOLD)?;

    let problem = match (dark_class, light_class) {
        (Lightness::Light, Lightness::Dark) => Some(format!(
            "colors appear to be swapped: '{dark}' is light and '{light}' is dark"
        )),
        (Lightness::Medium, _) => Some(format!(
            "dark color '{dark}' is too ambiguous (medium lightness), use L < 35"
        )),
        (Lightness::Light, _) => Some(format!(
            "dark color '{dark}' is actually light, use L < 35"
        )),
        (_, Lightness::Medium) => Some(format!(
            "light color '{light}' is too ambiguous (medium lightness), use L > 65"
        )),
        (_, Lightness::Dark) => Some(format!(
            "light color '{light}' is actually dark, use L > 65"
        )),
        (Lightness::Dark, Lightness::Light) => None,
    };
    match problem {
        Some(msg) => Err(PaletteError::InvalidParameter(msg)),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Uniqueness diagnostics
// ---------------------------------------------------------------------------

/// Result of [`validate_gradient_uniqueness`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct GradientReport {
    pub total: usize,
    pub unique: usize,
    /// `(first occurrence, later occurrence)` for every repeated entry.
    pub duplicates: Vec<(usize, usize)>,
}

/// Reports exact-string duplicates in a gradient. Diagnostic only: the
/// colors are not modified.
///
/// The flag is `true` when every entry is distinct.
pub fn validate_gradient_uniqueness<S: AsRef<str>>(colors: &[S]) -> (bool, GradientReport) {
    let mut first_seen: HashMap<&str, usize> = HashMap::with_capacity(colors.len());
    let mut duplicates = Vec::new();
    for (index, color) in colors.iter().enumerate() {
        let color = color.as_ref();
        match first_seen.get(color) {
            Some(&first) => duplicates.push((first, index)),
            None => {
                first_seen.insert(color, index);
            }
        }
    }
    let report = GradientReport {
        total: colors.len(),
        unique: first_seen.len(),
        duplicates,
    };
    (report.duplicates.is_empty(), report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::hex_to_lch;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    // -- Scalar methods --

    #[test]
    fn linear_midpoint() {
        assert!(approx_eq(linear(10.0, 20.0, 0.5), 15.0));
    }

    #[test]
    fn cubic_midpoint_is_halfway_and_ends_flat() {
        assert!(approx_eq(cubic(0.0, 1.0, 0.5), 0.5));
        assert!(cubic(0.0, 1.0, 0.1) < 0.1);
        assert!(cubic(0.0, 1.0, 0.9) > 0.9);
    }

    #[test]
    fn exponential_squares_factor() {
        assert!(approx_eq(exponential(0.0, 100.0, 0.5, 2.0).unwrap(), 25.0));
        assert!(approx_eq(exponential(0.0, 100.0, 0.5, 1.0).unwrap(), 50.0));
    }

    #[test]
    fn exponential_rejects_non_positive_exponent() {
        for exponent in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(
                    exponential(0.0, 1.0, 0.5, exponent),
                    Err(PaletteError::InvalidParameter(_))
                ),
                "exponent {exponent} accepted"
            );
        }
    }

    #[test]
    fn sine_and_cosine_agree() {
        for i in 0..=20 {
            let t = f64::from(i) / 20.0;
            assert!(approx_eq(sine(3.0, 9.0, t), cosine(3.0, 9.0, t)));
        }
        assert!(approx_eq(sine(0.0, 1.0, 0.5), 0.5));
    }

    #[test]
    fn hermite_matches_smoothstep() {
        for i in 0..=20 {
            let t = f64::from(i) / 20.0;
            assert!(approx_eq(hermite(2.0, 8.0, t), cubic(2.0, 8.0, t)));
        }
    }

    #[test]
    fn quintic_is_flatter_than_cubic_near_ends() {
        assert!(quintic(0.0, 1.0, 0.1) < cubic(0.0, 1.0, 0.1));
        assert!(approx_eq(quintic(0.0, 1.0, 0.5), 0.5));
    }

    // -- Circular hue --

    #[test]
    fn circular_crosses_zero_on_short_arc() {
        assert!(approx_eq(circular(350.0, 10.0, 0.5), 0.0));
        assert!(approx_eq(circular(10.0, 350.0, 0.5), 0.0));
    }

    #[test]
    fn circular_normalizes_inputs() {
        assert!(approx_eq(circular(-30.0, 390.0, 0.5), 0.0));
        assert!(approx_eq(circular(720.0, 90.0, 1.0), 90.0));
    }

    #[test]
    fn circular_plain_arc() {
        assert!(approx_eq(circular(30.0, 90.0, 0.5), 60.0));
    }

    // -- Method parsing --

    #[test]
    fn method_round_trips_through_name() {
        for method in Method::ALL {
            assert_eq!(method.to_string().parse::<Method>().unwrap(), method);
        }
    }

    #[test]
    fn method_parse_is_case_insensitive() {
        assert_eq!("LCH".parse::<Method>().unwrap(), Method::Lch);
    }

    #[test]
    fn unknown_method_is_unsupported() {
        let err = "bezier".parse::<Method>().unwrap_err();
        assert_eq!(err, PaletteError::UnsupportedMethod("bezier".into()));
    }

    #[test]
    fn method_deserializes_from_lowercase() {
        let m: Method = serde_json::from_str("\"quintic\"").unwrap();
        assert_eq!(m, Method::Quintic);
        assert!(serde_json::from_str::<Method>("\"bezier\"").is_err());
    }

    // -- interpolate_colors --

    #[test]
    fn linear_black_to_white_in_three_steps() {
        let colors = interpolate_colors("#000000", "#FFFFFF", 3, Method::Linear, 2.0).unwrap();
        assert_eq!(colors, vec!["#000000", "#7F7F7F", "#FFFFFF"]);
    }

    #[test]
    fn single_step_yields_start_only() {
        let colors = interpolate_colors("#123456", "#FFFFFF", 1, Method::Lch, 2.0).unwrap();
        assert_eq!(colors, vec!["#123456"]);
    }

    #[test]
    fn zero_steps_is_invalid() {
        assert!(matches!(
            interpolate_colors("#000000", "#FFFFFF", 0, Method::Linear, 2.0),
            Err(PaletteError::InvalidParameter(_))
        ));
    }

    #[test]
    fn exponent_only_checked_for_exponential() {
        assert!(interpolate_colors("#000000", "#FFFFFF", 4, Method::Linear, 0.0).is_ok());
        assert!(matches!(
            interpolate_colors("#000000", "#FFFFFF", 4, Method::Exponential, 0.0),
            Err(PaletteError::InvalidParameter(_))
        ));
    }

    #[test]
    fn malformed_color_is_invalid_format() {
        assert!(matches!(
            interpolate_colors("#GG0000", "#FFFFFF", 4, Method::Linear, 2.0),
            Err(PaletteError::InvalidFormat(_))
        ));
    }

    #[test]
    fn every_method_hits_both_endpoints() {
        for method in Method::ALL {
            let colors = interpolate_colors("#002B36", "#EEE8D5", 8, method, 2.0).unwrap();
            assert_eq!(colors.len(), 8, "{method}");
            assert_eq!(colors[0], "#002B36", "{method}");
            assert_eq!(colors[7], "#EEE8D5", "{method}");
        }
    }

    #[test]
    fn hsv_interpolation_takes_short_hue_arc() {
        // Red to magenta should pass through hues near 330°, not through green.
        let colors = interpolate_colors("#FF0000", "#FF00FF", 5, Method::Hsv, 2.0).unwrap();
        assert_eq!(colors[1], "#FF0040");
        assert!(colors.iter().all(|c| &c[3..5] == "00"), "{colors:?}");
    }

    #[test]
    fn lch_interpolation_keeps_lightness_monotonic() {
        let colors = interpolate_colors("#1A1A1A", "#E0E0E0", 6, Method::Lch, 2.0).unwrap();
        let lightness: Vec<f64> = colors.iter().map(|c| hex_to_lch(c).unwrap().l).collect();
        assert!(lightness.windows(2).all(|w| w[0] < w[1]), "{lightness:?}");
    }

    #[test]
    fn params_select_method_and_count() {
        let params = GenerationParameters {
            num_colors: 5,
            method: Method::Exponential,
            exponent: 3.0,
            ..Default::default()
        };
        let colors = interpolate_with_params("#000000", "#FFFFFF", &params).unwrap();
        assert_eq!(
            colors,
            interpolate_colors("#000000", "#FFFFFF", 5, Method::Exponential, 3.0).unwrap()
        );
        // 255 × 0.5³ = 31.875
        assert_eq!(colors[2], "#1F1F1F");
    }

    // -- Spyder palette --

    #[test]
    fn spyder_palette_has_fixed_endpoints() {
        let colors = interpolate_spyder_palette("#002B36", "#EEE8D5", Method::Lch, 2.0).unwrap();
        assert_eq!(colors.len(), 16);
        assert_eq!(colors[0], "#000000");
        assert_eq!(colors[1], "#002B36");
        assert_eq!(colors[14], "#EEE8D5");
        assert_eq!(colors[15], "#FFFFFF");
    }

    #[test]
    fn spyder_colors_accept_clear_dark_and_light() {
        assert!(validate_spyder_colors("#002B36", "#EEE8D5").is_ok());
    }

    #[test]
    fn spyder_colors_detect_swap() {
        let err = validate_spyder_colors("#EEE8D5", "#002B36").unwrap_err();
        assert!(err.to_string().contains("swapped"), "{err}");
    }

    #[test]
    fn spyder_colors_reject_medium_dark() {
        let err = validate_spyder_colors("#808080", "#EEE8D5").unwrap_err();
        assert!(err.to_string().contains("ambiguous"), "{err}");
    }

    #[test]
    fn spyder_colors_reject_dark_light_color() {
        let err = validate_spyder_colors("#002B36", "#101010").unwrap_err();
        assert!(err.to_string().contains("actually dark"), "{err}");
    }

    #[test]
    fn spyder_colors_require_hash_prefix() {
        assert!(matches!(
            validate_spyder_colors("002B36", "#EEE8D5"),
            Err(PaletteError::InvalidFormat(_))
        ));
    }

    // -- Uniqueness --

    #[test]
    fn uniqueness_reports_duplicate_pair() {
        let (ok, report) = validate_gradient_uniqueness(&["#FF0000", "#FF0000", "#0000FF"]);
        assert!(!ok);
        assert_eq!(
            report,
            GradientReport {
                total: 3,
                unique: 2,
                duplicates: vec![(0, 1)],
            }
        );
    }

    #[test]
    fn uniqueness_accepts_distinct_colors() {
        let (ok, report) = validate_gradient_uniqueness(&["#000000", "#FFFFFF"]);
        assert!(ok);
        assert_eq!(report.unique, 2);
        assert!(report.duplicates.is_empty());
    }

    #[test]
    fn uniqueness_pairs_each_repeat_with_first_occurrence() {
        let colors = vec!["#AAAAAA".to_string(); 3];
        let (_, report) = validate_gradient_uniqueness(&colors);
        assert_eq!(report.duplicates, vec![(0, 1), (0, 2)]);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn scalar_methods_hit_boundaries(start in -500.0_f64..500.0, end in -500.0_f64..500.0) {
                for method in Method::ALL {
                    let at0 = method.apply(start, end, 0.0, 2.5).unwrap();
                    let at1 = method.apply(start, end, 1.0, 2.5).unwrap();
                    prop_assert!((at0 - start).abs() < 1e-9, "{method} at 0: {at0}");
                    prop_assert!((at1 - end).abs() < 1e-9, "{method} at 1: {at1}");
                }
            }

            #[test]
            fn circular_always_in_range(
                a in -1000.0_f64..1000.0,
                b in -1000.0_f64..1000.0,
                t in 0.0_f64..=1.0,
            ) {
                let h = circular(a, b, t);
                prop_assert!((0.0..360.0).contains(&h), "circular({a}, {b}, {t}) = {h}");
            }

            #[test]
            fn circular_never_travels_more_than_half_turn(
                a in 0.0_f64..360.0,
                b in 0.0_f64..360.0,
            ) {
                let mid = circular(a, b, 0.5);
                let to_start = (mid - a).rem_euclid(360.0).min((a - mid).rem_euclid(360.0));
                prop_assert!(to_start <= 90.0 + 1e-9, "{a} -> {b} mid {mid}");
            }
        }
    }
}
