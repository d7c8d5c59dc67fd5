//! Multi-color palette generation.
//!
//! Two families live here. Theme palettes start from the theme's base color
//! and walk the hue circle, either in equal steps or by a Delta E targeted
//! search. Seed palettes (group, optimal) spread golden-ratio hues around a
//! starting hue with sinusoidal lightness and chroma variation.
//!
//! Every color is passed through [`adjust_lch_to_gamut`] before it is
//! formatted, so no generator ever emits the neutral-gray fallback.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::color::{lch_to_hex, lch_to_lab, normalize_hue, rgb_to_lch, Lab, Lch, Rgb};
use crate::analysis::PaletteCharacteristics;
use crate::distance::{ciede2000, delta_e_rgb};
use crate::error::PaletteError;
use crate::gamut::{adjust_lch_to_gamut, Preserve};
use crate::gradient::generate_lightness_gradient_from_color;
use crate::hue_table::{adjusted_base, chroma_boost};
use crate::palette::{Palette, PaletteKind};
use crate::params::{GenerationParameters, Theme};
use crate::syntax::generate_syntax_palette;

/// `1 / φ`. Repeated steps of this fraction of a turn never revisit a hue.
pub const GOLDEN_RATIO_CONJUGATE: f64 = 0.618033988749895;

/// Number of colors in a group palette (`B10`..`B120`).
pub const GROUP_SIZE: usize = 12;

/// Delta E above which the winning hue is refined by nudging lightness and chroma.
const FINE_TUNE_THRESHOLD: f64 = 20.0;

/// Lightness and chroma nudges tried during fine tuning.
const FINE_TUNE_OFFSETS: [(f64, f64); 4] = [(3.0, 0.0), (-3.0, 0.0), (0.0, 5.0), (0.0, -5.0)];

/// Hue of the `index`-th golden-ratio step from `start`.
pub fn golden_hue(start: f64, index: usize) -> f64 {
    normalize_hue(start + index as f64 * 360.0 * GOLDEN_RATIO_CONJUGATE)
}

fn check_count(num_colors: usize) -> Result<(), PaletteError> {
    if num_colors < 1 {
        return Err(PaletteError::InvalidParameter(format!(
            "num_colors must be >= 1, got {num_colors}"
        )));
    }
    Ok(())
}

fn check_finite(name: &str, value: f64) -> Result<(), PaletteError> {
    if !value.is_finite() {
        return Err(PaletteError::InvalidParameter(format!(
            "{name} must be a finite number, got {value}"
        )));
    }
    Ok(())
}

fn in_gamut_hex(lch: Lch) -> String {
    lch_to_hex(adjust_lch_to_gamut(lch, Preserve::Lightness))
}

/// Sinusoidal position inside a lightness range, shared by the seed palettes.
fn wave_lightness(range: (f64, f64), index: usize) -> f64 {
    range.0 + (range.1 - range.0) * (0.5 + 0.4 * (index as f64 * 1.8).sin())
}

// ---------------------------------------------------------------------------
// Theme palettes
// ---------------------------------------------------------------------------

/// Hue increments scanned per step: narrow and fine for small targets, wide
/// and coarse for large ones. Returns `(first, last, step)` in degrees.
fn hue_search_range(target_delta_e: f64) -> (u32, u32, usize) {
    if target_delta_e < 15.0 {
        (10, 60, 2)
    } else if target_delta_e <= 30.0 {
        (15, 90, 3)
    } else {
        (20, 150, 5)
    }
}

/// Candidate closest to the target distance so far.
struct Best {
    lch: Lch,
    delta_e: f64,
    error: f64,
}

/// Replaces `best` with `candidate` if it lands closer to `target`.
fn consider(best: &mut Option<Best>, from: Lab, candidate: Lch, target: f64) {
    let delta_e = ciede2000(from, lch_to_lab(candidate));
    let error = (delta_e - target).abs();
    if best.as_ref().map_or(true, |b| error < b.error) {
        *best = Some(Best {
            lch: candidate,
            delta_e,
            error,
        });
    }
}

/// One step of the perceptual search.
///
/// Candidates whose hex was already emitted are ranked separately and only
/// win when every candidate repeats an earlier color.
struct StepSearch<'a> {
    from: Lab,
    target: f64,
    emitted: &'a HashSet<String>,
    fresh: Option<Best>,
    any: Option<Best>,
}

impl<'a> StepSearch<'a> {
    fn new(from: Lch, target: f64, emitted: &'a HashSet<String>) -> Self {
        Self {
            from: lch_to_lab(from),
            target,
            emitted,
            fresh: None,
            any: None,
        }
    }

    fn consider(&mut self, candidate: Lch) {
        if !self.emitted.contains(&lch_to_hex(candidate)) {
            consider(&mut self.fresh, self.from, candidate, self.target);
        }
        consider(&mut self.any, self.from, candidate, self.target);
    }

    fn leader(&self) -> Option<Lch> {
        self.fresh.as_ref().or(self.any.as_ref()).map(|b| b.lch)
    }

    fn finish(self) -> Option<Best> {
        self.fresh.or(self.any)
    }
}

/// Builds `num_colors` colors where each is roughly `target_delta_e`
/// (CIEDE2000) away from the previous one.
///
/// The first color is the theme base at `start_hue` (theme default when
/// `None`), biased by the hue table and mapped into gamut. Each following
/// color is the best hue step found in a bounded scan; the target is not
/// guaranteed to be hit exactly. Colors already in the palette are skipped
/// while any other candidate remains.
pub fn generate_perceptual_colors(
    num_colors: usize,
    theme: Theme,
    start_hue: Option<f64>,
    target_delta_e: f64,
) -> Result<Vec<String>, PaletteError> {
    check_count(num_colors)?;
    if !(target_delta_e.is_finite() && target_delta_e > 0.0) {
        return Err(PaletteError::InvalidParameter(format!(
            "target_delta_e must be > 0, got {target_delta_e}"
        )));
    }
    if let Some(hue) = start_hue {
        check_finite("start_hue", hue)?;
    }

    let base = theme.defaults();
    let start_hue = normalize_hue(start_hue.unwrap_or(base.h));
    let candidate_at = |hue: f64| {
        let (l, c) = adjusted_base(theme, hue, base.l, base.c);
        adjust_lch_to_gamut(Lch::new(l, c, hue), Preserve::Lightness)
    };

    let mut current = candidate_at(start_hue);
    let mut colors = Vec::with_capacity(num_colors);
    let mut emitted = HashSet::with_capacity(num_colors);
    colors.push(lch_to_hex(current));
    emitted.insert(lch_to_hex(current));

    let (first, last, step_by) = hue_search_range(target_delta_e);
    for step in 1..num_colors {
        let mut search = StepSearch::new(current, target_delta_e, &emitted);
        for increment in (first..=last).step_by(step_by) {
            let hue = normalize_hue(current.h + f64::from(increment));
            search.consider(candidate_at(hue));
        }

        if target_delta_e > FINE_TUNE_THRESHOLD {
            if let Some(winner) = search.leader() {
                for (dl, dc) in FINE_TUNE_OFFSETS {
                    let nudged = Lch::new(
                        (winner.l + dl).clamp(0.0, 100.0),
                        (winner.c + dc).max(0.0),
                        winner.h,
                    );
                    search.consider(adjust_lch_to_gamut(nudged, Preserve::Lightness));
                }
            }
        }

        let Some(best) = search.finish() else {
            break;
        };
        debug!(
            step,
            hue = best.lch.h,
            delta_e = best.delta_e,
            target = target_delta_e,
            "perceptual step"
        );
        current = best.lch;
        let hex = lch_to_hex(current);
        emitted.insert(hex.clone());
        colors.push(hex);
    }
    Ok(colors)
}

/// Builds `num_colors` colors at equal hue steps of `360 / num_colors`
/// starting from `start_hue`, each biased by the hue table for `theme`.
pub fn generate_uniform_colors(
    num_colors: usize,
    start_hue: f64,
    base_lightness: f64,
    base_chroma: f64,
    theme: Theme,
) -> Result<Vec<String>, PaletteError> {
    check_count(num_colors)?;
    check_finite("start_hue", start_hue)?;
    check_finite("base_lightness", base_lightness)?;
    check_finite("base_chroma", base_chroma)?;
    let hue_step = 360.0 / num_colors as f64;
    Ok((0..num_colors)
        .map(|i| {
            let hue = normalize_hue(start_hue + i as f64 * hue_step);
            let (l, c) = adjusted_base(theme, hue, base_lightness, base_chroma);
            in_gamut_hex(Lch::new(l, c, hue))
        })
        .collect())
}

/// Generates theme colors as configured by `params`: uniform hue steps when
/// `params.uniform` is set, the perceptual search otherwise.
pub fn generate_theme_colors(params: &GenerationParameters) -> Result<Vec<String>, PaletteError> {
    params.validate()?;
    let base = params.base_color();
    if params.uniform {
        generate_uniform_colors(params.num_colors, base.h, base.l, base.c, params.theme)
    } else {
        generate_perceptual_colors(
            params.num_colors,
            params.theme,
            Some(base.h),
            params.target_delta_e,
        )
    }
}

// ---------------------------------------------------------------------------
// Fitting to an existing palette
// ---------------------------------------------------------------------------

/// Target distances tried by [`find_optimal_parameters`].
pub const CANDIDATE_DELTA_E: [f64; 5] = [15.0, 20.0, 25.0, 30.0, 35.0];

/// Target distance used by [`generate_inspired_palette`].
const INSPIRED_DELTA_E: f64 = 25.0;

/// Perceptual parameters that best reproduce an existing palette.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParameterFit {
    pub target_delta_e: f64,
    pub start_hue: f64,
    /// Mean CIEDE2000 distance between generated and target colors, index by index.
    pub average_distance: f64,
}

/// Whole-degree start hue of a palette: its lowest LCh hue, truncated.
fn palette_start_hue(target: &[Rgb]) -> Result<(f64, usize), PaletteError> {
    let report = PaletteCharacteristics::from_colors(target).ok_or_else(|| {
        PaletteError::InvalidParameter("target palette has no colors".into())
    })?;
    Ok((report.start_hue().trunc(), report.count))
}

/// Tries each of [`CANDIDATE_DELTA_E`] in perceptual mode from the target's
/// lowest hue and keeps the one whose output lies closest to `target`.
///
/// `num_colors` defaults to the target's length; when it differs, only the
/// overlapping positions are compared. Ties keep the smaller distance.
pub fn find_optimal_parameters(
    target: &[Rgb],
    theme: Theme,
    num_colors: Option<usize>,
) -> Result<ParameterFit, PaletteError> {
    let (start_hue, count) = palette_start_hue(target)?;
    let num_colors = num_colors.unwrap_or(count);
    check_count(num_colors)?;

    let mut best: Option<ParameterFit> = None;
    for target_delta_e in CANDIDATE_DELTA_E {
        let generated =
            generate_perceptual_colors(num_colors, theme, Some(start_hue), target_delta_e)?;
        let distances = generated
            .iter()
            .zip(target)
            .map(|(hex, &want)| Rgb::from_hex(hex).map(|got| delta_e_rgb(got, want)))
            .collect::<Result<Vec<_>, _>>()?;
        let average_distance = distances.iter().sum::<f64>() / distances.len() as f64;
        debug!(target_delta_e, start_hue, average_distance, "parameter candidate");
        if best.map_or(true, |b| average_distance < b.average_distance) {
            best = Some(ParameterFit {
                target_delta_e,
                start_hue,
                average_distance,
            });
        }
    }
    best.ok_or_else(|| PaletteError::InvalidParameter("no candidate parameters".into()))
}

/// A perceptual palette with as many colors as `target`, starting from its
/// lowest hue at a comfortable spacing.
pub fn generate_inspired_palette(target: &[Rgb], theme: Theme) -> Result<Vec<String>, PaletteError> {
    let (start_hue, count) = palette_start_hue(target)?;
    generate_perceptual_colors(count, theme, Some(start_hue), INSPIRED_DELTA_E)
}

// ---------------------------------------------------------------------------
// Seed palettes
// ---------------------------------------------------------------------------

/// Colors tuned for telling many items apart at a glance.
///
/// Hues follow golden-ratio steps (from `start_hue` when given, so the first
/// color sits exactly on it, otherwise from 0°). Lightness waves inside a
/// theme range (dark 40-75, light 60-90); chroma starts at 85, is boosted for
/// under-saturated hues and capped at 120 before gamut mapping.
pub fn generate_optimal_colors(
    num_colors: usize,
    theme: Theme,
    start_hue: Option<f64>,
) -> Result<Vec<String>, PaletteError> {
    check_count(num_colors)?;
    if let Some(hue) = start_hue {
        check_finite("start_hue", hue)?;
    }
    let range = match theme {
        Theme::Dark => (40.0, 75.0),
        Theme::Light => (60.0, 90.0),
    };
    let start = start_hue.unwrap_or(0.0);
    Ok((0..num_colors)
        .map(|i| {
            let hue = golden_hue(start, i);
            let lightness = wave_lightness(range, i);
            let variation = 0.8 + 0.4 * (i as f64 * 0.9).cos();
            let chroma = (85.0 * chroma_boost(hue) * variation).min(120.0);
            in_gamut_hex(Lch::new(lightness, chroma, hue))
        })
        .collect())
}

/// Group palettes use a milder boost than [`chroma_boost`] and leave magentas alone.
fn group_chroma_factor(hue: f64) -> f64 {
    if (60.0..=180.0).contains(&hue) {
        1.2
    } else if (180.0..=240.0).contains(&hue) {
        1.1
    } else {
        1.0
    }
}

/// Builds matching dark and light group palettes around a seed color.
///
/// The dark palette starts with the seed itself; the light one starts with
/// the seed lifted by 20 lightness units (kept within 60-95). The remaining
/// colors take golden-ratio hues from the seed, sinusoidal lightness inside
/// 40-75 (dark) or 60-95 (light), and chroma scaled from the seed's own.
pub fn generate_group_palettes_from_color(
    seed_hex: &str,
    num_colors: usize,
) -> Result<(Vec<String>, Vec<String>), PaletteError> {
    let seed_rgb = Rgb::from_hex(seed_hex)?;
    check_count(num_colors)?;
    let seed = rgb_to_lch(seed_rgb);

    let dark_range = (40.0, 75.0);
    let light_range = (60.0, 95.0);

    let mut dark = Vec::with_capacity(num_colors);
    let mut light = Vec::with_capacity(num_colors);
    dark.push(seed_rgb.to_hex());
    let lifted = (seed.l + 20.0).clamp(light_range.0, light_range.1);
    light.push(in_gamut_hex(Lch::new(lifted, seed.c, seed.h)));

    for i in 1..num_colors {
        let hue = golden_hue(seed.h, i);
        let factor = group_chroma_factor(hue);
        let wave = (i as f64 * 0.9).cos();
        let dark_c = (seed.c * factor * (0.8 + 0.4 * wave)).min(100.0);
        let light_c = (seed.c * factor * (0.7 + 0.5 * wave)).min(100.0);
        dark.push(in_gamut_hex(Lch::new(wave_lightness(dark_range, i), dark_c, hue)));
        light.push(in_gamut_hex(Lch::new(wave_lightness(light_range, i), light_c, hue)));
    }
    Ok((dark, light))
}

/// Builds a labelled palette of the given kind from one seed color.
///
/// `Gradient` is the 16-step lightness gradient, `Group` the dark group
/// palette, `Syntax` the 16-color syntax palette. `Steps` has no seed-based
/// generator and is rejected with `InvalidParameter`; build it from
/// [`crate::interpolate::interpolate_colors`] output instead.
pub fn generate_palettes_from_color(
    seed_hex: &str,
    kind: PaletteKind,
) -> Result<Palette, PaletteError> {
    let colors = match kind {
        PaletteKind::Gradient => generate_lightness_gradient_from_color(seed_hex)?,
        PaletteKind::Group => generate_group_palettes_from_color(seed_hex, GROUP_SIZE)?.0,
        PaletteKind::Syntax => generate_syntax_palette(seed_hex)?,
        PaletteKind::Steps(n) => {
            return Err(PaletteError::InvalidParameter(format!(
                "no seed generator for a {n}-step palette"
            )))
        }
    };
    Palette::from_hex(kind, &colors)
}
