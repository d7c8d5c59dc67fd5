#![deny(unsafe_code)]
//! Perceptual color palette engine.
//!
//! Converts between hex, RGB, HSV and CIE LCh (`color`), keeps LCh values
//! inside the sRGB gamut (`gamut`), measures CIEDE2000 distance (`distance`),
//! interpolates scalars and colors (`interpolate`), and builds palettes:
//! lightness gradients (`gradient`), theme, group and optimal palettes
//! (`generate`) and syntax palettes (`syntax`). Everything is pure and
//! synchronous; no function keeps state between calls.

pub mod analysis;
pub mod color;
pub mod distance;
pub mod error;
pub mod gamut;
pub mod generate;
pub mod gradient;
pub mod hue_table;
pub mod interpolate;
pub mod palette;
pub mod params;
pub mod syntax;

pub use analysis::{BrightnessInfo, ColorInfo, Lightness, PaletteCharacteristics};
pub use color::{hex_to_rgb, lch_to_hex, rgb_to_hex, rgb_to_lch, Hsv, Lab, Lch, Rgb};
pub use distance::{delta_e, Contrast, DistanceStats, DistanceStep, Spacing};
pub use error::PaletteError;
pub use gamut::{adjust_lch_to_gamut, find_max_in_gamut_chroma, is_in_gamut, Preserve};
pub use generate::{
    find_optimal_parameters, generate_group_palettes_from_color, generate_inspired_palette,
    generate_optimal_colors, generate_palettes_from_color, generate_perceptual_colors,
    generate_theme_colors, generate_uniform_colors, ParameterFit,
};
pub use gradient::generate_lightness_gradient_from_color;
pub use interpolate::{interpolate_colors, validate_gradient_uniqueness, GradientReport, Method};
pub use palette::{Palette, PaletteKind};
pub use params::{GenerationParameters, Theme};
pub use syntax::generate_syntax_palette;
