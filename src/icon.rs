//! Icon types for notification small icons.
//!
//! A notification carries a small icon that the host framework may or may not
//! be able to load as a bitmap. This module models that icon, the entry it
//! belongs to, and a few pixel helpers shared by the filters.

use image::{Rgba, RgbaImage};

/// Solid white, the colour of silhouette pixels.
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// The packed-zero pixel. Output pixels that are not white stay at this value.
pub const UNSET: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// A 2D size in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizePx {
    pub width: u32,
    pub height: u32,
}

impl SizePx {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns the size of an image.
    pub fn of(image: &RgbaImage) -> Self {
        Self::new(image.width(), image.height())
    }

    /// Total number of pixels.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Returns true if either side is larger than `limit`.
    pub fn exceeds(&self, limit: u32) -> bool {
        self.width > limit || self.height > limit
    }
}

/// A loaded small icon.
///
/// Only [`SmallIcon::Bitmap`] icons are candidates for automatic silhouette
/// generation. Anything the host renders itself (vector drawables, adaptive
/// icons, ...) is carried as [`SmallIcon::Drawable`] and passed through.
#[derive(Debug, Clone, PartialEq)]
pub enum SmallIcon {
    /// A decoded RGBA bitmap.
    Bitmap(RgbaImage),

    /// A non-bitmap drawable, identified by its kind (e.g. `"vector"`).
    Drawable(String),
}

impl SmallIcon {
    /// Returns the bitmap if this icon is one.
    pub fn as_bitmap(&self) -> Option<&RgbaImage> {
        match self {
            Self::Bitmap(bitmap) => Some(bitmap),
            Self::Drawable(_) => None,
        }
    }

    /// Returns the pixel dimensions for bitmap icons.
    pub fn dimensions(&self) -> Option<SizePx> {
        self.as_bitmap().map(SizePx::of)
    }
}

/// A posted notification, reduced to what icon fixing needs.
#[derive(Debug, Clone, PartialEq)]
pub struct IconEntry {
    /// Package that posted the notification; the override lookup key.
    pub package_name: String,

    /// The small icon, or `None` when the drawable could not be loaded.
    pub small_icon: Option<SmallIcon>,
}

impl IconEntry {
    /// Creates an entry with a loaded small icon.
    pub fn new(package_name: impl Into<String>, small_icon: SmallIcon) -> Self {
        Self {
            package_name: package_name.into(),
            small_icon: Some(small_icon),
        }
    }

    /// Creates an entry whose bitmap small icon is `bitmap`.
    pub fn with_bitmap(package_name: impl Into<String>, bitmap: RgbaImage) -> Self {
        Self::new(package_name, SmallIcon::Bitmap(bitmap))
    }

    /// Creates an entry whose small icon failed to load.
    pub fn without_icon(package_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            small_icon: None,
        }
    }

    /// Replaces the small icon with a bitmap.
    pub fn set_small_icon(&mut self, bitmap: RgbaImage) {
        self.small_icon = Some(SmallIcon::Bitmap(bitmap));
    }
}

/// True for fully transparent pixels, whatever their colour channels hold.
pub(crate) fn is_transparent(pixel: &Rgba<u8>) -> bool {
    pixel[3] == 0
}

/// `r + g + b`, the luminance proxy used throughout.
pub(crate) fn channel_sum(pixel: &Rgba<u8>) -> u32 {
    let [r, g, b, _] = pixel.0;
    r as u32 + g as u32 + b as u32
}
