//! Monochrome silhouette filter for notification small icons.
//!
//! The filter runs in three steps:
//!
//! 1. [`luminance_threshold`] derives a brightness threshold from the opaque pixels.
//! 2. [`EdgeProfile::classify`] samples four edge offsets to tell whether the
//!    glyph sits on a light or dark plate.
//! 3. The mapper walks the pixels in raster order. The first opaque pixel fixes
//!    a baseline class (dark or bright); every opaque pixel of the same class
//!    becomes white, everything else stays unset.
//!
//! # Example
//!
//! ```
//! use image::{Rgba, RgbaImage};
//! use notif_icon_fixer::silhouette;
//!
//! let mut icon = RgbaImage::new(4, 4);
//! icon.put_pixel(1, 1, Rgba([200, 40, 40, 255]));
//!
//! let out = silhouette(&icon).unwrap();
//! assert_eq!(out.get_pixel(1, 1).0, [255, 255, 255, 255]);
//! assert_eq!(out.get_pixel(0, 0).0, [0, 0, 0, 0]);
//! ```

pub mod edges;
pub mod threshold;

pub use edges::{EdgeProfile, EdgeSamples};
pub use threshold::{DEFAULT_THRESHOLD_RATIO, luminance_threshold, luminance_threshold_with_ratio};

use image::RgbaImage;
use log::debug;

use crate::error::IconFixError;
use crate::icon::{UNSET, WHITE, channel_sum, is_transparent};

/// Luminance class of an opaque pixel relative to the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Dark,
    Bright,
}

impl Tone {
    fn of(sum: u32, threshold: u32) -> Self {
        if sum <= 3 * threshold {
            Self::Dark
        } else {
            Self::Bright
        }
    }
}

/// Configuration for the silhouette filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SilhouetteConfig {
    /// Fraction of the mean brightness used as threshold (0.0-1.0).
    pub threshold_ratio: f32,
}

impl SilhouetteConfig {
    /// Creates a config with the given threshold ratio, clamped to 0.0-1.0.
    pub fn new(threshold_ratio: f32) -> Self {
        Self {
            threshold_ratio: threshold_ratio.clamp(0.0, 1.0),
        }
    }
}

impl Default for SilhouetteConfig {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD_RATIO)
    }
}

/// Runs the filter with the default configuration.
pub fn silhouette(image: &RgbaImage) -> Result<RgbaImage, IconFixError> {
    silhouette_with(image, &SilhouetteConfig::default())
}

/// Converts `image` into a white-on-transparent silhouette.
///
/// The output has the same dimensions as the input. Transparent input pixels
/// are always unset in the output.
///
/// Plated icons (see [`EdgeProfile::is_plated`]) go through the same predicate
/// as unplated ones: both keep the pixels that share the first opaque pixel's
/// tone.
///
/// # Errors
///
/// [`IconFixError::SampleOutOfBounds`] when the bitmap is too small for the
/// edge samples.
pub fn silhouette_with(
    image: &RgbaImage,
    config: &SilhouetteConfig,
) -> Result<RgbaImage, IconFixError> {
    let threshold = luminance_threshold_with_ratio(image, config.threshold_ratio);
    let profile = EdgeProfile::classify(image, threshold)?;
    debug!(
        "silhouette {}x{}: threshold={threshold} {profile:?}",
        image.width(),
        image.height()
    );

    let mut output = RgbaImage::from_pixel(image.width(), image.height(), UNSET);
    let mut baseline: Option<Tone> = None;

    for (x, y, pixel) in image.enumerate_pixels() {
        if is_transparent(pixel) {
            continue;
        }

        let tone = Tone::of(channel_sum(pixel), threshold);
        let first = *baseline.get_or_insert(tone);

        // Plated icons currently share the unplated rule.
        #[allow(clippy::if_same_then_else)]
        let keep = if profile.is_plated() {
            tone == first
        } else {
            tone == first
        };
        if keep {
            output.put_pixel(x, y, WHITE);
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use proptest::prelude::*;

    const BLACK: [u8; 4] = [0, 0, 0, 255];

    fn white_count(img: &RgbaImage) -> usize {
        img.pixels().filter(|p| p.0 == WHITE.0).count()
    }

    #[test]
    fn all_transparent_stays_unset() {
        let img = RgbaImage::new(8, 8);
        let out = silhouette(&img).unwrap();
        assert_eq!(out.dimensions(), (8, 8));
        assert!(out.pixels().all(|p| p.0 == UNSET.0));
    }

    #[test]
    fn uniform_opaque_icon_is_all_white() {
        let img = RgbaImage::from_pixel(4, 4, Rgba([10, 10, 10, 255]));
        let out = silhouette(&img).unwrap();
        assert_eq!(white_count(&out), 16);
    }

    #[test]
    fn dark_pixels_matching_dark_baseline_become_white() {
        // First pixel and most others are dark; the bright ones raise the
        // threshold so every dark pixel is below it.
        let mut img = RgbaImage::from_pixel(4, 4, Rgba([10, 10, 10, 255]));
        img.put_pixel(3, 3, Rgba([255, 255, 255, 255]));
        img.put_pixel(2, 3, Rgba([255, 255, 255, 255]));

        let out = silhouette(&img).unwrap();
        assert_eq!(white_count(&out), 14);
        assert_eq!(out.get_pixel(0, 0).0, WHITE.0);
        assert_eq!(out.get_pixel(3, 3).0, UNSET.0);
        assert_eq!(out.get_pixel(2, 3).0, UNSET.0);
    }

    #[test]
    fn bright_baseline_drops_dark_pixels() {
        let mut img = RgbaImage::new(4, 4);
        img.put_pixel(0, 0, Rgba([240, 240, 240, 255]));
        img.put_pixel(1, 0, Rgba(BLACK));
        img.put_pixel(2, 2, Rgba([230, 200, 250, 255]));

        let out = silhouette(&img).unwrap();
        assert_eq!(out.get_pixel(0, 0).0, WHITE.0);
        assert_eq!(out.get_pixel(1, 0).0, UNSET.0);
        assert_eq!(out.get_pixel(2, 2).0, WHITE.0);
        assert_eq!(white_count(&out), 2);
    }

    #[test]
    fn single_bright_pixel_becomes_white() {
        let mut img = RgbaImage::new(4, 4);
        img.put_pixel(1, 2, Rgba([200, 200, 200, 255]));

        let out = silhouette(&img).unwrap();
        assert_eq!(out.get_pixel(1, 2).0, WHITE.0);
        assert_eq!(white_count(&out), 1);
    }

    #[test]
    fn coloured_transparent_canvas_stays_unset() {
        // Straight-alpha PNGs often carry white in fully transparent pixels.
        let mut img = RgbaImage::from_pixel(8, 8, Rgba([255, 255, 255, 0]));
        for (x, y) in [(3, 3), (4, 3), (3, 4), (4, 4)] {
            img.put_pixel(x, y, Rgba([220, 20, 20, 255]));
        }

        let out = silhouette(&img).unwrap();
        assert_eq!(white_count(&out), 4);
        assert_eq!(out.get_pixel(0, 0).0, UNSET.0);
        assert_eq!(out.get_pixel(3, 3).0, WHITE.0);
        assert_eq!(out.get_pixel(4, 4).0, WHITE.0);
    }

    #[test]
    fn plated_and_unplated_icons_use_the_same_rule() {
        // White plate with a dark glyph: color_reversal holds.
        let mut plated = RgbaImage::from_pixel(6, 6, Rgba([255, 255, 255, 255]));
        plated.put_pixel(0, 0, Rgba(BLACK));
        plated.put_pixel(1, 0, Rgba(BLACK));
        let threshold = luminance_threshold(&plated);
        assert!(EdgeProfile::classify(&plated, threshold).unwrap().is_plated());

        // Same glyph on a transparent background.
        let mut bare = RgbaImage::new(6, 6);
        bare.put_pixel(0, 0, Rgba(BLACK));
        bare.put_pixel(1, 0, Rgba(BLACK));
        bare.put_pixel(5, 5, Rgba([255, 255, 255, 255]));
        let threshold = luminance_threshold(&bare);
        assert!(!EdgeProfile::classify(&bare, threshold).unwrap().is_plated());

        // Both keep the baseline (dark) pixels only.
        let plated_out = silhouette(&plated).unwrap();
        assert_eq!(white_count(&plated_out), 2);
        assert_eq!(plated_out.get_pixel(0, 0).0, WHITE.0);
        assert_eq!(plated_out.get_pixel(3, 3).0, UNSET.0);

        let bare_out = silhouette(&bare).unwrap();
        assert_eq!(white_count(&bare_out), 2);
        assert_eq!(bare_out.get_pixel(5, 5).0, UNSET.0);
    }

    #[test]
    fn too_small_bitmap_is_an_error() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([200, 0, 0, 255]));
        assert!(matches!(
            silhouette(&img),
            Err(IconFixError::SampleOutOfBounds { .. })
        ));
    }

    #[test]
    fn ratio_is_clamped() {
        assert_eq!(SilhouetteConfig::new(3.0).threshold_ratio, 1.0);
        assert_eq!(SilhouetteConfig::new(-1.0).threshold_ratio, 0.0);
        assert_eq!(SilhouetteConfig::default().threshold_ratio, 0.8);
    }

    fn arb_icon() -> impl Strategy<Value = RgbaImage> {
        (2u32..12, 2u32..12).prop_flat_map(|(w, h)| {
            prop::collection::vec(
                prop_oneof![Just([0u8, 0, 0, 0]), any::<[u8; 4]>()],
                (w * h) as usize,
            )
            .prop_map(move |pixels| {
                let raw: Vec<u8> = pixels.into_iter().flatten().collect();
                RgbaImage::from_raw(w, h, raw).unwrap()
            })
        })
    }

    proptest! {
        #[test]
        fn output_matches_input_shape(img in arb_icon()) {
            let out = silhouette(&img).unwrap();
            prop_assert_eq!(out.dimensions(), img.dimensions());
            for (x, y, pixel) in img.enumerate_pixels() {
                let mapped = out.get_pixel(x, y).0;
                if pixel[3] == 0 {
                    prop_assert_eq!(mapped, UNSET.0);
                } else {
                    prop_assert!(mapped == UNSET.0 || mapped == WHITE.0);
                }
            }
        }

        #[test]
        fn filter_is_deterministic(img in arb_icon()) {
            prop_assert_eq!(silhouette(&img).unwrap(), silhouette(&img).unwrap());
        }
    }
}
