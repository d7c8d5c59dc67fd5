//! Per-hue lightness and chroma bias for generated colors.
//!
//! The hue circle is split into six 60° sectors. Each sector carries a
//! `(lightness delta, chroma delta)` pair per theme, tuned so that colors
//! stay legible on a dark or a light background: yellows and greens are
//! darkened on light backgrounds, blues and purples are lifted on dark ones.

use crate::color::normalize_hue;
use crate::params::Theme;

/// Lightness and chroma offsets applied to a base color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HueAdjustment {
    pub lightness: f64,
    pub chroma: f64,
}

impl HueAdjustment {
    const fn new(lightness: f64, chroma: f64) -> Self {
        Self { lightness, chroma }
    }
}

/// Sectors: red-orange, yellow, green, cyan, blue, magenta.
const DARK: [HueAdjustment; 6] = [
    HueAdjustment::new(2.0, 0.0),
    HueAdjustment::new(-8.0, -5.0),
    HueAdjustment::new(-3.0, 5.0),
    HueAdjustment::new(5.0, 5.0),
    HueAdjustment::new(8.0, 8.0),
    HueAdjustment::new(3.0, 0.0),
];

const LIGHT: [HueAdjustment; 6] = [
    HueAdjustment::new(-3.0, 0.0),
    HueAdjustment::new(-12.0, 5.0),
    HueAdjustment::new(-8.0, 3.0),
    HueAdjustment::new(-3.0, 0.0),
    HueAdjustment::new(2.0, -3.0),
    HueAdjustment::new(-2.0, 0.0),
];

/// Index of the 60° sector containing `hue` (any real angle, normalized first).
pub fn sector(hue: f64) -> usize {
    ((normalize_hue(hue) / 60.0) as usize).min(5)
}

/// Bias for `hue` under `theme`.
pub fn hue_adjustment(theme: Theme, hue: f64) -> HueAdjustment {
    let table = match theme {
        Theme::Dark => &DARK,
        Theme::Light => &LIGHT,
    };
    table[sector(hue)]
}

/// Applies the bias for `hue` to a base lightness and chroma.
///
/// Returns `(lightness, chroma)`; chroma is floored at zero and lightness
/// clamped into `[0, 100]`.
pub fn adjusted_base(theme: Theme, hue: f64, lightness: f64, chroma: f64) -> (f64, f64) {
    let adj = hue_adjustment(theme, hue);
    (
        (lightness + adj.lightness).clamp(0.0, 100.0),
        (chroma + adj.chroma).max(0.0),
    )
}

/// Chroma multiplier for hues that read as under-saturated at equal chroma:
/// greens and cyans (60-180°), blues (180-240°), magentas (240-300°).
pub fn chroma_boost(hue: f64) -> f64 {
    match normalize_hue(hue) {
        h if (60.0..=180.0).contains(&h) => 1.3,
        h if (180.0..=240.0).contains(&h) => 1.2,
        h if (240.0..=300.0).contains(&h) => 1.1,
        _ => 1.0,
    }
}
