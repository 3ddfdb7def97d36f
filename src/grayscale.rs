//! Detection of icons that are already monochrome.
//!
//! Grayscale icons are left as they are; only colourful bitmaps are turned
//! into silhouettes.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::icon::SizePx;

/// Tuning for [`is_grayscale`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrayscaleConfig {
    /// Maximum pairwise channel difference (exclusive) of a gray pixel.
    pub tolerance: u8,

    /// Pixels with alpha below this are ignored.
    pub alpha_tolerance: u8,

    /// Larger bitmaps are resampled to this square size before scanning.
    pub compact_size: u32,
}

impl Default for GrayscaleConfig {
    fn default() -> Self {
        Self {
            tolerance: 20,
            alpha_tolerance: 50,
            compact_size: 64,
        }
    }
}

/// Returns true when every visible pixel of `image` is (nearly) gray.
pub fn is_grayscale(image: &RgbaImage, config: &GrayscaleConfig) -> bool {
    let size = SizePx::of(image);
    if size.exceeds(config.compact_size) && config.compact_size > 0 {
        let compact = imageops::resize(
            image,
            config.compact_size,
            config.compact_size,
            FilterType::Triangle,
        );
        return all_gray(&compact, config);
    }
    all_gray(image, config)
}

fn all_gray(image: &RgbaImage, config: &GrayscaleConfig) -> bool {
    image.pixels().all(|pixel| is_gray_pixel(pixel, config))
}

fn is_gray_pixel(pixel: &Rgba<u8>, config: &GrayscaleConfig) -> bool {
    let [r, g, b, a] = pixel.0;
    if a < config.alpha_tolerance {
        return true;
    }
    r.abs_diff(g) < config.tolerance
        && r.abs_diff(b) < config.tolerance
        && g.abs_diff(b) < config.tolerance
}
