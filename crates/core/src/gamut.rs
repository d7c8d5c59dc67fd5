//! sRGB gamut detection and mapping for LCh colors.
//!
//! Most LCh triples with high chroma have no sRGB equivalent. These helpers
//! decide whether a triple is displayable and, when it is not, pull it back
//! into gamut by reducing chroma, moving lightness, or both.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::{lch_to_srgb_unclamped, normalize_hue, Lch};
use crate::error::PaletteError;

/// Slack allowed on each sRGB channel before a color counts as out of gamut.
///
/// The forward and inverse XYZ matrices are only inverse to about seven
/// digits, so pure white lands a hair above 1.0.
const CHANNEL_TOLERANCE: f64 = 1e-5;

/// Slack on the `[0, 100]` lightness range. The Y row of the forward matrix
/// sums to 1.0000001, which puts pure white at L = 100.000004.
const LIGHTNESS_TOLERANCE: f64 = 1e-4;

/// Upper bound the chroma search starts from. sRGB peaks near 134 (pure blue),
/// so the search extends past this bound when needed.
pub const MAX_SEARCH_CHROMA: f64 = 130.0;

/// Width of the final bracket in [`find_max_in_gamut_chroma`].
const CHROMA_PRECISION: f64 = 0.5;

/// Largest lightness offset scanned when preserving chroma.
const CHROMA_PRESERVING_SCAN: u32 = 49;

/// Largest lightness offset scanned when minimizing joint deviation.
const JOINT_SCAN: u32 = 25;

/// Which component [`adjust_lch_to_gamut`] keeps fixed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preserve {
    /// Keep lightness, reduce chroma.
    #[default]
    Lightness,
    /// Keep chroma, move lightness; falls back to `Lightness` when no lightness admits it.
    Chroma,
    /// Move both, minimizing the combined deviation.
    Both,
}

impl fmt::Display for Preserve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Preserve::Lightness => "lightness",
            Preserve::Chroma => "chroma",
            Preserve::Both => "both",
        })
    }
}

impl FromStr for Preserve {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lightness" => Ok(Preserve::Lightness),
            "chroma" => Ok(Preserve::Chroma),
            "both" => Ok(Preserve::Both),
            other => Err(PaletteError::UnsupportedMethod(format!(
                "unknown gamut preservation strategy '{other}'"
            ))),
        }
    }
}

/// Returns true if all three unit sRGB channels are within `[0, 1]`.
pub fn srgb_in_gamut(r: f64, g: f64, b: f64) -> bool {
    [r, g, b]
        .iter()
        .all(|c| (-CHANNEL_TOLERANCE..=1.0 + CHANNEL_TOLERANCE).contains(c))
}

fn lightness_in_range(l: f64) -> bool {
    (-LIGHTNESS_TOLERANCE..=100.0 + LIGHTNESS_TOLERANCE).contains(&l)
}

/// Returns true if the LCh color maps to a displayable sRGB color.
///
/// Lightness must lie in `[0, 100]` and the unclamped sRGB channels in
/// `[0, 1]`. Non-finite inputs are never in gamut.
pub fn is_in_gamut(lch: Lch) -> bool {
    if !(lch.l.is_finite() && lch.c.is_finite() && lch.h.is_finite()) {
        return false;
    }
    if !lightness_in_range(lch.l) {
        return false;
    }
    let [r, g, b] = lch_to_srgb_unclamped(lch);
    srgb_in_gamut(r, g, b)
}

/// Finds the largest chroma that keeps `(lightness, chroma, hue)` in gamut.
///
/// Binary search to within half a chroma unit. The result is always in gamut
/// and `result + 1.0` never is. Lightness outside `[0, 100]` has no in-gamut
/// chroma and yields 0.
pub fn find_max_in_gamut_chroma(lightness: f64, hue: f64) -> f64 {
    if !is_in_gamut(Lch::new(lightness, 0.0, hue)) {
        return 0.0;
    }
    let mut low = 0.0;
    let mut high = MAX_SEARCH_CHROMA;
    while is_in_gamut(Lch::new(lightness, high, hue)) {
        low = high;
        high *= 2.0;
    }
    while high - low > CHROMA_PRECISION {
        let mid = (low + high) / 2.0;
        if is_in_gamut(Lch::new(lightness, mid, hue)) {
            low = mid;
        } else {
            high = mid;
        }
    }
    low
}

/// Maps an LCh color into the sRGB gamut.
///
/// In-gamut inputs are returned unchanged. Otherwise lightness is first
/// clamped into `[0, 100]` (non-finite components are replaced by neutral
/// values) and the chosen [`Preserve`] strategy is applied. The result always
/// satisfies [`is_in_gamut`].
pub fn adjust_lch_to_gamut(lch: Lch, preserve: Preserve) -> Lch {
    if is_in_gamut(lch) {
        return lch;
    }
    let l = if lch.l.is_finite() {
        lch.l.clamp(0.0, 100.0)
    } else {
        50.0
    };
    let c = if lch.c.is_finite() { lch.c.max(0.0) } else { 0.0 };
    let h = if lch.h.is_finite() {
        normalize_hue(lch.h)
    } else {
        0.0
    };
    let sanitized = Lch::new(l, c, h);
    if is_in_gamut(sanitized) {
        return sanitized;
    }

    let adjusted = match preserve {
        Preserve::Lightness => preserve_lightness(sanitized),
        Preserve::Chroma => preserve_chroma(sanitized).unwrap_or_else(|| preserve_lightness(sanitized)),
        Preserve::Both => minimize_deviation(sanitized),
    };
    tracing::trace!(
        from_l = lch.l,
        from_c = lch.c,
        to_l = adjusted.l,
        to_c = adjusted.c,
        h = adjusted.h,
        %preserve,
        "mapped LCh into sRGB gamut"
    );
    adjusted
}

fn preserve_lightness(lch: Lch) -> Lch {
    Lch::new(lch.l, find_max_in_gamut_chroma(lch.l, lch.h), lch.h)
}

/// Scans lightness outward from the original, nearest first, brighter before darker.
fn preserve_chroma(lch: Lch) -> Option<Lch> {
    (1..=CHROMA_PRESERVING_SCAN)
        .flat_map(|offset| [f64::from(offset), -f64::from(offset)])
        .map(|offset| Lch::new(lch.l + offset, lch.c, lch.h))
        .find(|candidate| (0.0..=100.0).contains(&candidate.l) && is_in_gamut(*candidate))
}

/// Tries lightness offsets around the original and keeps the candidate whose
/// summed lightness and chroma deviation is smallest. Offset zero is the
/// lightness-preserving answer, so the result is never worse than it.
fn minimize_deviation(lch: Lch) -> Lch {
    let mut best = preserve_lightness(lch);
    let mut best_cost = (lch.c - best.c).abs();
    for offset in 1..=JOINT_SCAN {
        for signed in [f64::from(offset), -f64::from(offset)] {
            let l = lch.l + signed;
            if !(0.0..=100.0).contains(&l) || signed.abs() >= best_cost {
                continue;
            }
            let c = lch.c.min(find_max_in_gamut_chroma(l, lch.h));
            let cost = signed.abs() + (lch.c - c).abs();
            if cost < best_cost {
                best = Lch::new(l, c, lch.h);
                best_cost = cost;
            }
        }
    }
    best
}
