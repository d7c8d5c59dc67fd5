//! Color types and conversion functions for the palette engine.
//!
//! Provides four color types (`Rgb`, `Hsv`, `Lab`, `Lch`) and pure conversion
//! functions between them. `Rgb` holds 8-bit channels and is the canonical
//! external form (`#RRGGBB`); the floating-point spaces use `f64` throughout.
//!
//! CIE Lab and LCh are computed against the D65 white point via CIE XYZ, so
//! lightness runs 0-100 and chroma of sRGB colors tops out around 134.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PaletteError;
use crate::gamut::is_in_gamut;

/// Fallback emitted by [`lch_to_hex`] when an LCh value has no sRGB equivalent.
pub const NEUTRAL_GRAY: Rgb = Rgb::new(0x80, 0x80, 0x80);

/// sRGB color with 8-bit channels.
///
/// Serializes as an uppercase hex string `"#RRGGBB"` and deserializes from a
/// hex string with or without the leading `#`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// HSV color. Hue is measured in turns (`[0, 1)`), saturation and value in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

/// CIE L*a*b* (D65).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

/// CIE L*C*h (cylindrical form of [`Lab`]). Hue is in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lch {
    pub l: f64,
    pub c: f64,
    pub h: f64,
}

impl Lch {
    pub const fn new(l: f64, c: f64, h: f64) -> Self {
        Self { l, c, h }
    }
}

impl Lab {
    pub const fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses a hex color string like "#FF00AA" or "ff00aa" (case insensitive).
    ///
    /// Returns `PaletteError::InvalidFormat` unless the input is exactly six
    /// hexadecimal digits after an optional leading `#`.
    pub fn from_hex(hex: &str) -> Result<Rgb, PaletteError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 {
            return Err(PaletteError::InvalidFormat(format!(
                "'{hex}': expected 6 hex digits, got {}",
                digits.len()
            )));
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(PaletteError::InvalidFormat(format!(
                "'{hex}': must contain only hex digits"
            )));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|e| PaletteError::InvalidFormat(format!("'{hex}': {e}")))
        };
        Ok(Rgb {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// Formats the color as an uppercase `"#RRGGBB"` string.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Builds a color from floating-point channels on the 0-255 scale.
    ///
    /// Channels are clamped to `[0, 255]` and then truncated, so `127.9`
    /// becomes `127`. NaN maps to 0.
    pub fn from_channels(r: f64, g: f64, b: f64) -> Rgb {
        let quantize = |c: f64| c.clamp(0.0, 255.0) as u8;
        Rgb {
            r: quantize(r),
            g: quantize(g),
            b: quantize(b),
        }
    }

    /// Builds a color from unit-range channels, rounding to the nearest 8-bit value.
    fn from_unit_rounded(r: f64, g: f64, b: f64) -> Rgb {
        let quantize = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgb {
            r: quantize(r),
            g: quantize(g),
            b: quantize(b),
        }
    }

    fn to_unit(self) -> (f64, f64, f64) {
        (
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgb::from_hex(s)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Normalizes a hue angle to `[0, 360)`.
///
/// `rem_euclid` can round tiny negative inputs up to exactly 360.0; those
/// are folded back to 0.
pub fn normalize_hue(h: f64) -> f64 {
    let h = h.rem_euclid(360.0);
    if h >= 360.0 {
        0.0
    } else {
        h
    }
}

/// Parses a hex string into [`Rgb`]. See [`Rgb::from_hex`].
pub fn hex_to_rgb(hex: &str) -> Result<Rgb, PaletteError> {
    Rgb::from_hex(hex)
}

/// Formats [`Rgb`] as uppercase `#RRGGBB`. Never fails.
pub fn rgb_to_hex(rgb: Rgb) -> String {
    rgb.to_hex()
}

/// Converts RGB to HSV with hue in turns.
pub fn rgb_to_hsv(rgb: Rgb) -> Hsv {
    let (r, g, b) = rgb.to_unit();
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let v = max;
    if max == min {
        return Hsv { h: 0.0, s: 0.0, v };
    }
    let range = max - min;
    let s = range / max;
    let rc = (max - r) / range;
    let gc = (max - g) / range;
    let bc = (max - b) / range;
    let h = if r == max {
        bc - gc
    } else if g == max {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };
    let h = (h / 6.0).rem_euclid(1.0);
    Hsv {
        h: if h >= 1.0 { 0.0 } else { h },
        s,
        v,
    }
}

/// Converts HSV (hue in turns) to RGB, rounding each channel.
///
/// Hue outside `[0, 1)` wraps; saturation and value are clamped to `[0, 1]`.
pub fn hsv_to_rgb(hsv: Hsv) -> Rgb {
    let s = hsv.s.clamp(0.0, 1.0);
    let v = hsv.v.clamp(0.0, 1.0);
    if s == 0.0 {
        return Rgb::from_unit_rounded(v, v, v);
    }
    let h = hsv.h.rem_euclid(1.0) * 6.0;
    let sector = h.floor();
    let f = h - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    let (r, g, b) = match sector as u8 % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    Rgb::from_unit_rounded(r, g, b)
}

/// Converts HSV (hue in turns) to an uppercase hex string.
pub fn hsv_to_hex(hsv: Hsv) -> String {
    hsv_to_rgb(hsv).to_hex()
}

// D65 reference white, XYZ scaled so that Y = 1.
const D65_XN: f64 = 0.95047;
const D65_YN: f64 = 1.0;
const D65_ZN: f64 = 1.08883;

const LAB_DELTA: f64 = 6.0 / 29.0;

/// Applies inverse sRGB gamma to convert a single sRGB component to linear.
fn srgb_component_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Applies sRGB gamma to convert a single linear component to sRGB.
///
/// Negative inputs stay negative so that gamut checks can see them.
fn linear_component_to_srgb(c: f64) -> f64 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

fn lab_f(t: f64) -> f64 {
    if t > LAB_DELTA * LAB_DELTA * LAB_DELTA {
        t.cbrt()
    } else {
        t / (3.0 * LAB_DELTA * LAB_DELTA) + 4.0 / 29.0
    }
}

fn lab_f_inv(t: f64) -> f64 {
    if t > LAB_DELTA {
        t * t * t
    } else {
        3.0 * LAB_DELTA * LAB_DELTA * (t - 4.0 / 29.0)
    }
}

/// Converts RGB to CIE Lab via linear RGB and XYZ.
pub fn rgb_to_lab(rgb: Rgb) -> Lab {
    let (r, g, b) = rgb.to_unit();
    let r = srgb_component_to_linear(r);
    let g = srgb_component_to_linear(g);
    let b = srgb_component_to_linear(b);

    let x = 0.4124564 * r + 0.3575761 * g + 0.1804375 * b;
    let y = 0.2126729 * r + 0.7151522 * g + 0.0721750 * b;
    let z = 0.0193339 * r + 0.1191920 * g + 0.9503041 * b;

    let fx = lab_f(x / D65_XN);
    let fy = lab_f(y / D65_YN);
    let fz = lab_f(z / D65_ZN);

    Lab {
        l: 116.0 * fy - 16.0,
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

/// Converts CIE Lab to sRGB components in unit scale, without clamping.
///
/// Values outside `[0, 1]` mean the color is outside the sRGB gamut.
pub fn lab_to_srgb_unclamped(lab: Lab) -> [f64; 3] {
    let fy = (lab.l + 16.0) / 116.0;
    let fx = fy + lab.a / 500.0;
    let fz = fy - lab.b / 200.0;

    let x = D65_XN * lab_f_inv(fx);
    let y = D65_YN * lab_f_inv(fy);
    let z = D65_ZN * lab_f_inv(fz);

    let r = 3.2404542 * x - 1.5371385 * y - 0.4985314 * z;
    let g = -0.9692660 * x + 1.8760108 * y + 0.0415560 * z;
    let b = 0.0556434 * x - 0.2040259 * y + 1.0572252 * z;

    [
        linear_component_to_srgb(r),
        linear_component_to_srgb(g),
        linear_component_to_srgb(b),
    ]
}

/// Converts Lab to LCh.
///
/// NaN guard: if chroma is less than 1e-10, hue is set to 0.0 to avoid
/// indeterminate `atan2(0, 0)` results.
pub fn lab_to_lch(lab: Lab) -> Lch {
    let c = lab.a.hypot(lab.b);
    let h = if c < 1e-10 {
        0.0
    } else {
        normalize_hue(lab.b.atan2(lab.a).to_degrees())
    };
    Lch { l: lab.l, c, h }
}

/// Converts LCh to Lab.
pub fn lch_to_lab(lch: Lch) -> Lab {
    let h_rad = lch.h.to_radians();
    Lab {
        l: lch.l,
        a: lch.c * h_rad.cos(),
        b: lch.c * h_rad.sin(),
    }
}

/// Convenience: RGB to LCh via the chain RGB -> linear -> XYZ -> Lab -> LCh.
pub fn rgb_to_lch(rgb: Rgb) -> Lch {
    lab_to_lch(rgb_to_lab(rgb))
}

/// Parses a hex string and converts it to LCh.
pub fn hex_to_lch(hex: &str) -> Result<Lch, PaletteError> {
    Rgb::from_hex(hex).map(rgb_to_lch)
}

/// Converts LCh to sRGB unit components without clamping.
pub fn lch_to_srgb_unclamped(lch: Lch) -> [f64; 3] {
    lab_to_srgb_unclamped(lch_to_lab(lch))
}

/// Converts LCh to RGB, returning `None` when the color is outside the sRGB gamut.
pub fn lch_to_rgb(lch: Lch) -> Option<Rgb> {
    if !is_in_gamut(lch) {
        return None;
    }
    let [r, g, b] = lch_to_srgb_unclamped(lch);
    Some(Rgb::from_unit_rounded(r, g, b))
}

/// Converts LCh to an uppercase hex string.
///
/// Never fails: an LCh value outside the sRGB gamut (or with lightness outside
/// `[0, 100]`) yields [`NEUTRAL_GRAY`]. Callers that need a faithful color
/// must map it into gamut first with [`crate::gamut::adjust_lch_to_gamut`].
pub fn lch_to_hex(lch: Lch) -> String {
    match lch_to_rgb(lch) {
        Some(rgb) => rgb.to_hex(),
        None => {
            tracing::warn!(
                l = lch.l,
                c = lch.c,
                h = lch.h,
                "LCh value outside sRGB gamut, falling back to neutral gray"
            );
            NEUTRAL_GRAY.to_hex()
        }
    }
}
