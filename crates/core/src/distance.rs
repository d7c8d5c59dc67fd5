//! Perceptual color difference (Delta E).
//!
//! [`ciede2000`] is the metric used throughout the engine, both to analyze
//! finished palettes and to steer the perceptual search in
//! [`crate::generate`]. CIE76 is kept for comparison.
//!
//! Rough reading of CIEDE2000 values:
//! - below 1: not perceptible
//! - 1-2: perceptible on close inspection
//! - 2-10: perceptible at a glance
//! - 11-49: more similar than opposite
//! - above 50: opposite colors

use std::f64::consts::PI;

use serde::Serialize;

use crate::color::{rgb_to_lab, Lab, Rgb};
use crate::error::PaletteError;

/// 25^7, the chroma normalization constant in CIEDE2000.
const POW25_7: f64 = 6_103_515_625.0;

/// CIEDE2000 color difference between two Lab colors.
///
/// Implements CIE Technical Report 142-2001 with unit parametric factors
/// (kL = kC = kH = 1). Symmetric in its arguments and zero for identical inputs.
pub fn ciede2000(lab1: Lab, lab2: Lab) -> f64 {
    let c1_ab = lab1.a.hypot(lab1.b);
    let c2_ab = lab2.a.hypot(lab2.b);
    let c_ab_mean_pow7 = ((c1_ab + c2_ab) / 2.0).powi(7);
    let g = 0.5 * (1.0 - (c_ab_mean_pow7 / (c_ab_mean_pow7 + POW25_7)).sqrt());

    let a1_prime = lab1.a * (1.0 + g);
    let a2_prime = lab2.a * (1.0 + g);
    let c1_prime = a1_prime.hypot(lab1.b);
    let c2_prime = a2_prime.hypot(lab2.b);
    let h1_prime = hue_angle(a1_prime, lab1.b);
    let h2_prime = hue_angle(a2_prime, lab2.b);

    let delta_l_prime = lab2.l - lab1.l;
    let delta_c_prime = c2_prime - c1_prime;
    let delta_h_prime = if c1_prime * c2_prime == 0.0 {
        0.0
    } else {
        match h2_prime - h1_prime {
            d if d > 180.0 => d - 360.0,
            d if d < -180.0 => d + 360.0,
            d => d,
        }
    };
    let delta_big_h_prime =
        2.0 * (c1_prime * c2_prime).sqrt() * (delta_h_prime.to_radians() / 2.0).sin();

    let l_prime_mean = (lab1.l + lab2.l) / 2.0;
    let c_prime_mean = (c1_prime + c2_prime) / 2.0;
    let h_prime_mean = if c1_prime * c2_prime == 0.0 {
        h1_prime + h2_prime
    } else if (h1_prime - h2_prime).abs() <= 180.0 {
        (h1_prime + h2_prime) / 2.0
    } else if h1_prime + h2_prime < 360.0 {
        (h1_prime + h2_prime + 360.0) / 2.0
    } else {
        (h1_prime + h2_prime - 360.0) / 2.0
    };

    let h_rad = h_prime_mean.to_radians();
    let t = 1.0 - 0.17 * (h_rad - PI / 6.0).cos()
        + 0.24 * (2.0 * h_rad).cos()
        + 0.32 * (3.0 * h_rad + PI / 30.0).cos()
        - 0.20 * (4.0 * h_rad - 63.0_f64.to_radians()).cos();

    let l_offset_sq = (l_prime_mean - 50.0).powi(2);
    let sl = 1.0 + (0.015 * l_offset_sq) / (20.0 + l_offset_sq).sqrt();
    let sc = 1.0 + 0.045 * c_prime_mean;
    let sh = 1.0 + 0.015 * c_prime_mean * t;

    let delta_theta = 30.0 * (-((h_prime_mean - 275.0) / 25.0).powi(2)).exp();
    let c_prime_mean_pow7 = c_prime_mean.powi(7);
    let rc = 2.0 * (c_prime_mean_pow7 / (c_prime_mean_pow7 + POW25_7)).sqrt();
    let rt = -(2.0 * delta_theta).to_radians().sin() * rc;

    let term_l = delta_l_prime / sl;
    let term_c = delta_c_prime / sc;
    let term_h = delta_big_h_prime / sh;

    (term_l * term_l + term_c * term_c + term_h * term_h + rt * term_c * term_h)
        .max(0.0)
        .sqrt()
}

/// Hue angle in degrees in `[0, 360)`, 0 for the achromatic axis.
fn hue_angle(a: f64, b: f64) -> f64 {
    if a == 0.0 && b == 0.0 {
        0.0
    } else {
        b.atan2(a).to_degrees().rem_euclid(360.0)
    }
}

/// CIE76 color difference: Euclidean distance in Lab.
pub fn delta_e_76(lab1: Lab, lab2: Lab) -> f64 {
    let dl = lab1.l - lab2.l;
    let da = lab1.a - lab2.a;
    let db = lab1.b - lab2.b;
    (dl * dl + da * da + db * db).sqrt()
}

/// CIEDE2000 difference between two RGB colors.
pub fn delta_e_rgb(color1: Rgb, color2: Rgb) -> f64 {
    ciede2000(rgb_to_lab(color1), rgb_to_lab(color2))
}

/// CIEDE2000 difference between two hex colors.
///
/// Fails with `PaletteError::InvalidFormat` if either string is not a valid hex color.
pub fn delta_e(color1: &str, color2: &str) -> Result<f64, PaletteError> {
    Ok(delta_e_rgb(Rgb::from_hex(color1)?, Rgb::from_hex(color2)?))
}

/// Distance between one palette entry and the next.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistanceStep {
    pub from: Rgb,
    pub to: Rgb,
    pub delta_e: f64,
}

/// CIEDE2000 distances between each pair of consecutive colors.
///
/// Returns an empty series for fewer than two colors.
pub fn distance_series(colors: &[Rgb]) -> Vec<DistanceStep> {
    colors
        .windows(2)
        .map(|pair| DistanceStep {
            from: pair[0],
            to: pair[1],
            delta_e: delta_e_rgb(pair[0], pair[1]),
        })
        .collect()
}

/// How evenly a palette is spaced, judged by the spread of its step distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Spacing {
    /// Standard deviation below 3.
    VeryUniform,
    /// Standard deviation below 5.
    Good,
    Uneven,
}

/// Whether the average step reads as too subtle, comfortable or jarring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Contrast {
    /// Average step below 10.
    TooSimilar,
    Good,
    /// Average step above 50.
    TooDifferent,
}

/// Widest gap between the largest and smallest step of a consistent palette.
pub const MAX_CONSISTENT_RANGE: f64 = 20.0;

/// Summary statistics over a [`distance_series`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistanceStats {
    pub average: f64,
    pub min: f64,
    pub max: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub spacing: Spacing,
    pub contrast: Contrast,
    /// `max - min` is at most [`MAX_CONSISTENT_RANGE`].
    pub consistent: bool,
}

impl DistanceStats {
    /// Summarizes a distance series. Returns `None` for an empty series.
    pub fn from_series(series: &[DistanceStep]) -> Option<Self> {
        if series.is_empty() {
            return None;
        }
        let n = series.len() as f64;
        let values = || series.iter().map(|step| step.delta_e);
        let average = values().sum::<f64>() / n;
        let min = values().fold(f64::INFINITY, f64::min);
        let max = values().fold(f64::NEG_INFINITY, f64::max);
        let std_dev = (values().map(|d| (d - average).powi(2)).sum::<f64>() / n).sqrt();
        let spacing = if std_dev < 3.0 {
            Spacing::VeryUniform
        } else if std_dev < 5.0 {
            Spacing::Good
        } else {
            Spacing::Uneven
        };
        let contrast = if average < 10.0 {
            Contrast::TooSimilar
        } else if average > 50.0 {
            Contrast::TooDifferent
        } else {
            Contrast::Good
        };
        Some(Self {
            average,
            min,
            max,
            std_dev,
            spacing,
            contrast,
            consistent: max - min <= MAX_CONSISTENT_RANGE,
        })
    }

    /// Convenience: statistics over the consecutive distances of `colors`.
    pub fn for_colors(colors: &[Rgb]) -> Option<Self> {
        Self::from_series(&distance_series(colors))
    }
}
