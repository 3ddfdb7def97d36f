//! Luminance threshold over the opaque pixels of a bitmap.

use image::RgbaImage;

use crate::icon::{channel_sum, is_transparent};

/// Ratio applied to the mean brightness to obtain the threshold.
pub const DEFAULT_THRESHOLD_RATIO: f32 = 0.8;

/// Computes the luminance threshold with the default ratio.
///
/// See [`luminance_threshold_with_ratio`].
pub fn luminance_threshold(image: &RgbaImage) -> u32 {
    luminance_threshold_with_ratio(image, DEFAULT_THRESHOLD_RATIO)
}

/// Computes `ratio` times the mean per-pixel brightness of all
/// non-transparent pixels.
///
/// Per-pixel brightness is `(r + g + b) / 3` and the mean are both integer
/// divisions; the scaled result is truncated. Returns 0 when the bitmap has no
/// non-transparent pixels.
pub fn luminance_threshold_with_ratio(image: &RgbaImage, ratio: f32) -> u32 {
    let (total, count) = image
        .pixels()
        .filter(|pixel| !is_transparent(pixel))
        .fold((0u64, 0u64), |(total, count), pixel| {
            (total + (channel_sum(pixel) / 3) as u64, count + 1)
        });

    if count == 0 {
        return 0;
    }

    ((total / count) as f64 * ratio as f64) as u32
}
