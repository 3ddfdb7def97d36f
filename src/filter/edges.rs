//! Edge sampling: classifies whether an icon sits on a light or dark plate.
//!
//! Four fixed offsets into the row-major pixel buffer are sampled. The
//! offsets are approximations of the edge midpoints and are reproduced
//! exactly, including the fact that they can fall outside tiny bitmaps.

use image::{Rgba, RgbaImage};

use crate::error::IconFixError;
use crate::icon::{channel_sum, is_transparent};

/// Flattened offsets of the four edge samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeSamples {
    pub top: usize,
    pub bottom: usize,
    pub left: usize,
    pub right: usize,
}

impl EdgeSamples {
    /// Computes the sample offsets for a `width` x `height` bitmap.
    ///
    /// | sample | offset                  |
    /// |--------|-------------------------|
    /// | top    | `w * 3 / 2`             |
    /// | bottom | `w * h - w * 3 / 2`     |
    /// | left   | `(h / 2) * w - w + 2`   |
    /// | right  | `(h / 2) * w - 1`       |
    ///
    /// Fails with [`IconFixError::SampleOutOfBounds`] if any offset is
    /// negative or not below `w * h`.
    pub fn locate(width: u32, height: u32) -> Result<Self, IconFixError> {
        let w = width as i64;
        let h = height as i64;
        let len = w * h;

        let check = |name: &'static str, offset: i64| {
            if (0..len).contains(&offset) {
                Ok(offset as usize)
            } else {
                Err(IconFixError::SampleOutOfBounds {
                    name,
                    offset,
                    width,
                    height,
                })
            }
        };

        Ok(Self {
            top: check("top", w * 3 / 2)?,
            bottom: check("bottom", len - w * 3 / 2)?,
            left: check("left", (h / 2) * w - w + 2)?,
            right: check("right", (h / 2) * w - 1)?,
        })
    }

    fn offsets(&self) -> [usize; 4] {
        [self.top, self.bottom, self.left, self.right]
    }
}

/// What the edge samples say about the icon's background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EdgeProfile {
    /// All samples are opaque and bright: a light plate behind the glyph.
    pub color_reversal: bool,

    /// All samples are opaque and dark: a dark plate around the glyph.
    pub has_padding: bool,

    /// All samples are transparent. Has no effect on the silhouette.
    pub transparent: bool,
}

impl EdgeProfile {
    /// Samples `image` at [`EdgeSamples::locate`] and classifies it against `threshold`.
    pub fn classify(image: &RgbaImage, threshold: u32) -> Result<Self, IconFixError> {
        let samples = EdgeSamples::locate(image.width(), image.height())?;
        let pixels = samples.offsets().map(|offset| pixel_at(image, offset));

        Ok(Self {
            color_reversal: pixels.iter().all(|p| is_bright(p, threshold)),
            has_padding: pixels.iter().all(|p| is_dark(p, threshold)),
            transparent: pixels.iter().all(|p| is_transparent(p)),
        })
    }

    /// True when the icon sits on a plate, light or dark.
    pub fn is_plated(&self) -> bool {
        self.has_padding || self.color_reversal
    }
}

fn pixel_at(image: &RgbaImage, offset: usize) -> &Rgba<u8> {
    let width = image.width() as usize;
    image.get_pixel((offset % width) as u32, (offset / width) as u32)
}

/// Opaque with a channel-sum above three times the threshold.
pub(crate) fn is_bright(pixel: &Rgba<u8>, threshold: u32) -> bool {
    !is_transparent(pixel) && channel_sum(pixel) > 3 * threshold
}

/// Opaque with a channel-sum at or below three times the threshold.
pub(crate) fn is_dark(pixel: &Rgba<u8>, threshold: u32) -> bool {
    !is_transparent(pixel) && channel_sum(pixel) <= 3 * threshold
}
