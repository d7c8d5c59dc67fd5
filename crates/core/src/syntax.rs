//! Sixteen-color syntax highlighting palettes from one seed color.

use crate::color::{lch_to_hex, rgb_to_lch, Lch, Rgb};
use crate::error::PaletteError;
use crate::gamut::{adjust_lch_to_gamut, Preserve};
use crate::generate::golden_hue;
use crate::hue_table::chroma_boost;

/// Number of colors in a syntax palette (`B10`..`B160`).
pub const SYNTAX_SIZE: usize = 16;

const LIGHTNESS_RANGE: (f64, f64) = (40.0, 80.0);
const CHROMA_RANGE: (f64, f64) = (40.0, 90.0);

/// Target LCh for entry `index` of a syntax palette built around `seed`.
///
/// Hue advances by golden-ratio steps from the seed's hue. Lightness swings
/// ±15 around the seed's on a `sin(1.8 i)` wave, chroma scales the seed's by
/// `0.8 + 0.4 cos(0.9 i)` and the hue boost; both are clamped to legible
/// ranges. No gamut mapping yet.
pub fn syntax_target(seed: Lch, index: usize) -> Lch {
    let i = index as f64;
    let hue = golden_hue(seed.h, index);
    let lightness =
        (seed.l + 15.0 * (i * 1.8).sin()).clamp(LIGHTNESS_RANGE.0, LIGHTNESS_RANGE.1);
    let chroma = (seed.c * chroma_boost(hue) * (0.8 + 0.4 * (i * 0.9).cos()))
        .clamp(CHROMA_RANGE.0, CHROMA_RANGE.1);
    Lch::new(lightness, chroma, hue)
}

/// Builds a 16-color syntax palette whose first hue is the seed's own.
pub fn generate_syntax_palette(seed_hex: &str) -> Result<Vec<String>, PaletteError> {
    let seed = rgb_to_lch(Rgb::from_hex(seed_hex)?);
    Ok((0..SYNTAX_SIZE)
        .map(|i| lch_to_hex(adjust_lch_to_gamut(syntax_target(seed, i), Preserve::Lightness)))
        .collect())
}
