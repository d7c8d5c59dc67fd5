//! Lightness classification, per-color reports and whole-palette summaries.
//!
//! Classification uses LCh lightness, which tracks perceived brightness far
//! better than HSV value or raw channel averages.

use serde::Serialize;

use crate::color::{rgb_to_hsv, rgb_to_lch, Hsv, Lch, Rgb};
use crate::error::PaletteError;
use crate::params::Theme;

/// Default upper bound for a "dark" color.
pub const DARK_THRESHOLD: f64 = 35.0;
/// Default lower bound for a "light" color.
pub const LIGHT_THRESHOLD: f64 = 65.0;

/// Three-way lightness class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Lightness {
    Dark,
    Medium,
    Light,
}

/// Parses a color that must carry a leading `#`.
fn parse_prefixed(hex: &str) -> Result<Rgb, PaletteError> {
    if !hex.starts_with('#') {
        return Err(PaletteError::InvalidFormat(format!(
            "hex color must start with '#', got '{hex}'"
        )));
    }
    Rgb::from_hex(hex)
}

/// Whether the color's LCh lightness is below `threshold`.
///
/// The string must start with `#`.
pub fn is_color_dark(hex: &str, threshold: f64) -> Result<bool, PaletteError> {
    Ok(rgb_to_lch(parse_prefixed(hex)?).l < threshold)
}

/// Classifies a color as dark (`L < dark_threshold`), light
/// (`L > light_threshold`) or medium.
///
/// # Errors
///
/// `InvalidParameter` unless both thresholds lie in `[0, 100]` with
/// `dark_threshold < light_threshold`; `InvalidFormat` for a malformed color
/// or one without a leading `#`.
pub fn classify_color_lightness(
    hex: &str,
    dark_threshold: f64,
    light_threshold: f64,
) -> Result<Lightness, PaletteError> {
    for (name, value) in [("dark_threshold", dark_threshold), ("light_threshold", light_threshold)] {
        if !(0.0..=100.0).contains(&value) {
            return Err(PaletteError::InvalidParameter(format!(
                "{name} must be within 0-100, got {value}"
            )));
        }
    }
    if dark_threshold >= light_threshold {
        return Err(PaletteError::InvalidParameter(format!(
            "dark_threshold ({dark_threshold}) must be < light_threshold ({light_threshold})"
        )));
    }
    let l = rgb_to_lch(parse_prefixed(hex)?).l;
    Ok(if l < dark_threshold {
        Lightness::Dark
    } else if l > light_threshold {
        Lightness::Light
    } else {
        Lightness::Medium
    })
}

/// Whether the color clearly belongs to `theme`'s role: dark colors for
/// [`Theme::Dark`], light colors for [`Theme::Light`]. Medium colors suit neither.
pub fn is_color_suitable_for_theme(hex: &str, theme: Theme) -> Result<bool, PaletteError> {
    let class = classify_color_lightness(hex, DARK_THRESHOLD, LIGHT_THRESHOLD)?;
    Ok(matches!(
        (theme, class),
        (Theme::Dark, Lightness::Dark) | (Theme::Light, Lightness::Light)
    ))
}

/// One color in every representation the engine uses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorInfo {
    pub hex: Rgb,
    pub rgb: (u8, u8, u8),
    /// Hue in turns.
    pub hsv: (f64, f64, f64),
    /// Hue in degrees.
    pub hsv_degrees: (f64, f64, f64),
    pub lch: (f64, f64, f64),
}

impl ColorInfo {
    pub fn from_rgb(rgb: Rgb) -> Self {
        let Hsv { h, s, v } = rgb_to_hsv(rgb);
        let Lch { l, c, h: lch_h } = rgb_to_lch(rgb);
        Self {
            hex: rgb,
            rgb: (rgb.r, rgb.g, rgb.b),
            hsv: (h, s, v),
            hsv_degrees: (h * 360.0, s, v),
            lch: (l, c, lch_h),
        }
    }

    pub fn from_hex(hex: &str) -> Result<Self, PaletteError> {
        Rgb::from_hex(hex).map(Self::from_rgb)
    }
}

/// Brightness of one color measured three ways.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BrightnessInfo {
    pub hex: Rgb,
    pub lch_lightness: f64,
    /// BT.709 weights over the gamma-encoded channels.
    pub rgb_luminance: f64,
    pub hsv_value: f64,
    pub is_dark_lch: bool,
    pub is_dark_luminance: bool,
    pub is_dark_hsv: bool,
}

impl BrightnessInfo {
    pub fn from_rgb(rgb: Rgb) -> Self {
        let lch_lightness = rgb_to_lch(rgb).l;
        let hsv_value = rgb_to_hsv(rgb).v;
        let rgb_luminance = 0.2126 * f64::from(rgb.r) / 255.0
            + 0.7152 * f64::from(rgb.g) / 255.0
            + 0.0722 * f64::from(rgb.b) / 255.0;
        Self {
            hex: rgb,
            lch_lightness,
            rgb_luminance,
            hsv_value,
            is_dark_lch: lch_lightness < 50.0,
            is_dark_luminance: rgb_luminance < 0.5,
            is_dark_hsv: hsv_value < 0.5,
        }
    }

    pub fn from_hex(hex: &str) -> Result<Self, PaletteError> {
        Rgb::from_hex(hex).map(Self::from_rgb)
    }
}

/// Minimum, maximum and mean of one channel across a palette.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChannelSummary {
    pub min: f64,
    pub max: f64,
    pub average: f64,
}

impl ChannelSummary {
    /// `None` for an empty sequence.
    fn of(values: impl Iterator<Item = f64> + Clone) -> Option<Self> {
        let count = values.clone().count();
        if count == 0 {
            return None;
        }
        Some(Self {
            min: values.clone().fold(f64::INFINITY, f64::min),
            max: values.clone().fold(f64::NEG_INFINITY, f64::max),
            average: values.sum::<f64>() / count as f64,
        })
    }
}

/// One palette entry in the hue-sorted progression.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HueEntry {
    /// Position in the input palette.
    pub index: usize,
    pub hex: Rgb,
    pub lightness: f64,
    pub chroma: f64,
    pub hue: f64,
}

/// Overall LCh and HSV character of a palette.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaletteCharacteristics {
    pub count: usize,
    pub lightness: ChannelSummary,
    pub chroma: ChannelSummary,
    /// Lowest and highest LCh hue, in degrees.
    pub hue_range: (f64, f64),
    /// Entries sorted by LCh hue; ties keep input order.
    pub hue_progression: Vec<HueEntry>,
    pub average_saturation: f64,
    pub average_brightness: f64,
}

impl PaletteCharacteristics {
    /// Summarizes `colors`. Returns `None` for an empty palette.
    pub fn from_colors(colors: &[Rgb]) -> Option<Self> {
        let mut entries: Vec<HueEntry> = colors
            .iter()
            .enumerate()
            .map(|(index, &hex)| {
                let Lch { l, c, h } = rgb_to_lch(hex);
                HueEntry {
                    index,
                    hex,
                    lightness: l,
                    chroma: c,
                    hue: h,
                }
            })
            .collect();
        let lightness = ChannelSummary::of(entries.iter().map(|e| e.lightness))?;
        let chroma = ChannelSummary::of(entries.iter().map(|e| e.chroma))?;
        let hue = ChannelSummary::of(entries.iter().map(|e| e.hue))?;
        entries.sort_by(|a, b| a.hue.total_cmp(&b.hue));

        let n = colors.len() as f64;
        let hsv: Vec<Hsv> = colors.iter().map(|&rgb| rgb_to_hsv(rgb)).collect();
        Some(Self {
            count: colors.len(),
            lightness,
            chroma,
            hue_range: (hue.min, hue.max),
            hue_progression: entries,
            average_saturation: hsv.iter().map(|c| c.s).sum::<f64>() / n,
            average_brightness: hsv.iter().map(|c| c.v).sum::<f64>() / n,
        })
    }

    /// Parses and summarizes hex colors.
    ///
    /// # Errors
    ///
    /// `InvalidFormat` for any malformed color, `InvalidParameter` for an
    /// empty palette.
    pub fn from_hex<S: AsRef<str>>(colors: &[S]) -> Result<Self, PaletteError> {
        let parsed = colors
            .iter()
            .map(|c| Rgb::from_hex(c.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_colors(&parsed)
            .ok_or_else(|| PaletteError::InvalidParameter("palette has no colors".into()))
    }

    /// Lowest LCh hue, the natural starting hue for a palette that mimics this one.
    pub fn start_hue(&self) -> f64 {
        self.hue_range.0
    }
}
