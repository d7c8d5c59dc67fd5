//! Sixteen-step black → seed → white lightness gradients.
//!
//! The seed is placed at the index matching its own LCh lightness, lightness
//! is spread linearly on either side, and chroma tapers toward both ends so
//! near-black and near-white steps stay close to neutral.

use tracing::debug;

use crate::color::{lch_to_hex, rgb_to_lch, Lch, Rgb};
use crate::error::PaletteError;
use crate::gamut::{adjust_lch_to_gamut, Preserve};

/// Number of colors in a lightness gradient (`B0`..`B150`).
pub const GRADIENT_STEPS: usize = 16;

const LAST: usize = GRADIENT_STEPS - 1;

/// Index a color of the given lightness occupies in a 16-step gradient.
///
/// Never 0 or 15: those are reserved for pure black and white.
pub fn natural_position(lightness: f64) -> usize {
    let raw = (lightness / 100.0 * LAST as f64).round();
    if raw.is_nan() {
        return LAST / 2;
    }
    (raw.max(0.0) as usize).clamp(1, LAST - 1)
}

/// Target LCh values for every step around a seed placed at `position`.
///
/// The seed's own values are used unchanged at `position`. No gamut
/// correction is applied here.
pub fn gradient_targets(seed: Lch, position: usize) -> Vec<Lch> {
    let Lch { l, c, h } = seed;
    (0..GRADIENT_STEPS)
        .map(|i| {
            if i < position {
                let li = l * i as f64 / position as f64;
                let ci = if l > 0.0 { c * li / l } else { 0.0 };
                Lch::new(li, ci, h)
            } else if i > position {
                let t = (i - position) as f64 / (LAST - position) as f64;
                let li = l + (100.0 - l) * t;
                let ci = if l < 100.0 {
                    c * (1.0 - (li - l) / (100.0 - l))
                } else {
                    0.0
                };
                Lch::new(li, ci, h)
            } else {
                seed
            }
        })
        .collect()
}

/// Builds a 16-color gradient from black through `seed_hex` to white.
///
/// Index 0 is always `#000000`, index 15 `#FFFFFF`, and the seed itself
/// (canonical uppercase) sits at [`natural_position`] of its lightness.
pub fn generate_lightness_gradient_from_color(seed_hex: &str) -> Result<Vec<String>, PaletteError> {
    let seed_rgb = Rgb::from_hex(seed_hex)?;
    let seed = adjust_lch_to_gamut(rgb_to_lch(seed_rgb), Preserve::Lightness);
    let position = natural_position(seed.l);
    debug!(seed = %seed_rgb, lightness = seed.l, position, "placing seed in gradient");

    let mut colors: Vec<String> = gradient_targets(seed, position)
        .into_iter()
        .map(|target| lch_to_hex(adjust_lch_to_gamut(target, Preserve::Lightness)))
        .collect();

    colors[0] = Rgb::BLACK.to_hex();
    colors[LAST] = Rgb::WHITE.to_hex();
    colors[position] = seed_rgb.to_hex();
    Ok(colors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::hex_to_lch;
    use crate::interpolate::validate_gradient_uniqueness;

    fn lightness_of(colors: &[String]) -> Vec<f64> {
        colors.iter().map(|c| hex_to_lch(c).unwrap().l).collect()
    }

    // -- natural_position --

    #[test]
    fn natural_position_is_never_an_endpoint() {
        assert_eq!(natural_position(0.0), 1);
        assert_eq!(natural_position(100.0), 14);
        assert_eq!(natural_position(50.0), 8);
        assert_eq!(natural_position(f64::NAN), 7);
    }

    #[test]
    fn targets_taper_chroma_to_both_ends() {
        let seed = Lch::new(50.0, 60.0, 250.0);
        let targets = gradient_targets(seed, 8);
        assert_eq!(targets[0].c, 0.0);
        assert!(targets[15].c.abs() < 1e-9);
        assert_eq!(targets[8], seed);
        assert!(targets[4].c < seed.c && targets[12].c < seed.c);
    }

    // -- generate_lightness_gradient_from_color --

    #[test]
    fn gradient_from_blue_seed() {
        let colors = generate_lightness_gradient_from_color("#1A72BB").unwrap();
        assert_eq!(colors.len(), GRADIENT_STEPS);
        assert_eq!(colors[0], "#000000");
        assert_eq!(colors[15], "#FFFFFF");
        assert_eq!(colors.iter().filter(|c| *c == "#1A72BB").count(), 1);
    }

    #[test]
    fn gradient_places_seed_at_natural_position() {
        let colors = generate_lightness_gradient_from_color("#1a72bb").unwrap();
        let position = natural_position(hex_to_lch("#1A72BB").unwrap().l);
        assert_eq!(colors[position], "#1A72BB");
    }

    #[test]
    fn gradient_lightness_is_monotonic() {
        for seed in ["#1A72BB", "#C0392B", "#F1C40F", "#2ECC71", "#8E44AD"] {
            let lightness = lightness_of(&generate_lightness_gradient_from_color(seed).unwrap());
            assert!(
                lightness.windows(2).all(|w| w[0] <= w[1] + 1e-9),
                "{seed}: {lightness:?}"
            );
        }
    }

    #[test]
    fn gradient_has_no_duplicates_for_mid_seed() {
        let colors = generate_lightness_gradient_from_color("#1A72BB").unwrap();
        let (unique, report) = validate_gradient_uniqueness(&colors);
        assert!(unique, "{report:?}");
    }

    #[test]
    fn dark_seed_sits_near_start() {
        let colors = generate_lightness_gradient_from_color("#1A1A1A").unwrap();
        let index = colors.iter().position(|c| c == "#1A1A1A").unwrap();
        assert!((1..=4).contains(&index), "index {index}");
    }

    #[test]
    fn light_seed_sits_near_end() {
        let colors = generate_lightness_gradient_from_color("#E0E0E0").unwrap();
        let index = colors.iter().position(|c| c == "#E0E0E0").unwrap();
        assert!((11..=14).contains(&index), "index {index}");
    }

    #[test]
    fn black_and_white_seeds_keep_endpoints() {
        let from_black = generate_lightness_gradient_from_color("#000000").unwrap();
        assert_eq!(from_black[0], "#000000");
        assert_eq!(from_black[15], "#FFFFFF");
        let from_white = generate_lightness_gradient_from_color("#FFFFFF").unwrap();
        assert_eq!(from_white[14], "#FFFFFF");
        assert_eq!(from_white[0], "#000000");
    }

    #[test]
    fn malformed_seed_is_rejected() {
        assert!(matches!(
            generate_lightness_gradient_from_color("#1A72B"),
            Err(PaletteError::InvalidFormat(_))
        ));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            #[test]
            fn endpoints_and_seed_always_present(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
                let seed = Rgb::new(r, g, b);
                let colors = generate_lightness_gradient_from_color(&seed.to_hex()).unwrap();
                prop_assert_eq!(colors.len(), GRADIENT_STEPS);
                prop_assert_eq!(colors[0].as_str(), "#000000");
                prop_assert_eq!(colors[15].as_str(), "#FFFFFF");
                let position = natural_position(rgb_to_lch(seed).l);
                prop_assert_eq!(&colors[position], &seed.to_hex());
            }

            #[test]
            fn lightness_never_decreases(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
                let hex = Rgb::new(r, g, b).to_hex();
                let lightness = lightness_of(&generate_lightness_gradient_from_color(&hex).unwrap());
                prop_assert!(
                    lightness.windows(2).all(|w| w[0] <= w[1] + 1e-9),
                    "{}: {:?}", hex, lightness
                );
            }
        }
    }
}
