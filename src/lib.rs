//! notif-icon-fixer: monochrome small icons for notifications
//!
//! Status-bar small icons are drawn as white masks, so a colourful bitmap
//! icon turns into an unreadable blob. This crate rewrites such icons: either
//! with a replacement the user registered for the posting package, or with a
//! white silhouette derived from the icon's own pixels.
//!
//! # Example
//!
//! ```
//! use image::{Rgba, RgbaImage};
//! use notif_icon_fixer::{FixerConfig, IconEntry, IconFixer, MemoryOverrides};
//!
//! let mut overrides = MemoryOverrides::new();
//! overrides
//!     .insert_icon("com.example.mail", &RgbaImage::from_pixel(4, 4, Rgba([255; 4])))
//!     .unwrap();
//!
//! let fixer = IconFixer::new(FixerConfig::default(), overrides);
//!
//! let mut icon = RgbaImage::new(8, 8);
//! icon.put_pixel(4, 4, Rgba([30, 160, 90, 255]));
//! let mut entry = IconEntry::with_bitmap("com.example.chat", icon);
//!
//! let outcome = fixer.fix_or_keep(&mut entry);
//! assert!(outcome.is_changed());
//! ```
//!
//! # Filter only
//!
//! The silhouette filter can be used on its own:
//!
//! ```
//! use image::RgbaImage;
//! use notif_icon_fixer::silhouette;
//!
//! let out = silhouette(&RgbaImage::new(16, 16)).unwrap();
//! assert_eq!(out.dimensions(), (16, 16));
//! ```

mod config;
mod error;
mod filter;
mod fixer;
mod grayscale;
mod icon;
mod provider;

pub use config::{FixerConfig, GrayscaleSettings, SilhouetteSettings};
pub use error::IconFixError;
pub use filter::{
    DEFAULT_THRESHOLD_RATIO, EdgeProfile, EdgeSamples, SilhouetteConfig, luminance_threshold,
    luminance_threshold_with_ratio, silhouette, silhouette_with,
};
pub use fixer::{Configurable, FixOutcome, IconFixer, Unchanged};
pub use grayscale::{GrayscaleConfig, is_grayscale};
pub use icon::{IconEntry, SizePx, SmallIcon, UNSET, WHITE};
pub use provider::{
    COLUMN_ICON_BITMAP, COLUMN_PACKAGE_NAME, ContentUri, IconOverrideProvider, JsonFileOverrides,
    MemoryOverrides, NoOverrides, OVERRIDE_URI, OverrideQuery, OverrideRecord, OverrideRow,
    PACKAGE_SELECTION, decode_icon_bitmap, encode_icon_bitmap,
};
