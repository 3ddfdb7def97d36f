//! Notification icon fixer with an override-then-silhouette fallback chain.

use image::RgbaImage;
use log::{debug, error, info, warn};

use crate::config::FixerConfig;
use crate::error::IconFixError;
use crate::filter::{SilhouetteConfig, silhouette_with};
use crate::grayscale::{GrayscaleConfig, is_grayscale};
use crate::icon::IconEntry;
use crate::provider::{IconOverrideProvider, OverrideQuery};

// ============================================================================
// Configurable Trait
// ============================================================================

/// Trait for types that can be configured from a [`FixerConfig`].
pub trait Configurable {
    /// Applies a config's settings to this instance.
    fn apply_config(&mut self, config: &FixerConfig);

    /// Exports the current settings as a config.
    fn export_config(&self) -> FixerConfig;
}

// ============================================================================
// Outcome
// ============================================================================

/// Why an icon was left as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unchanged {
    /// The bitmap is already monochrome.
    AlreadyGrayscale,
    /// The small icon is not a bitmap.
    NotBitmap,
    /// The small icon could not be loaded.
    NoDrawable,
    /// Automatic silhouettes are turned off.
    Disabled,
    /// Fixing failed; see the log.
    Failed,
}

/// Result of fixing one notification icon.
#[derive(Debug, Clone, PartialEq)]
pub enum FixOutcome {
    /// Replaced by the user's override for the package.
    Override(RgbaImage),
    /// Replaced by a generated silhouette.
    Silhouette(RgbaImage),
    /// Left untouched.
    Unchanged(Unchanged),
}

impl FixOutcome {
    /// The replacement icon, if any.
    pub fn icon(&self) -> Option<&RgbaImage> {
        match self {
            Self::Override(icon) | Self::Silhouette(icon) => Some(icon),
            Self::Unchanged(_) => None,
        }
    }

    pub fn is_changed(&self) -> bool {
        self.icon().is_some()
    }
}

// ============================================================================
// IconFixer
// ============================================================================

/// Rewrites notification small icons.
///
/// For every entry the fixer tries, in order:
///
/// 1. **Override** - the user's replacement for the posting package, looked
///    up in the provider. Lookup failures are logged and skipped.
/// 2. **Silhouette** - a white silhouette of the bitmap icon, unless the
///    icon is already grayscale.
/// 3. **Unchanged** - the icon stays as posted.
///
/// # Example
///
/// ```
/// use image::{Rgba, RgbaImage};
/// use notif_icon_fixer::{FixOutcome, FixerConfig, IconEntry, IconFixer, MemoryOverrides};
///
/// let mut icon = RgbaImage::new(8, 8);
/// icon.put_pixel(3, 3, Rgba([220, 30, 30, 255]));
///
/// let fixer = IconFixer::new(FixerConfig::default(), MemoryOverrides::new());
/// let mut entry = IconEntry::with_bitmap("com.example.chat", icon);
///
/// let outcome = fixer.fix_or_keep(&mut entry);
/// assert!(matches!(outcome, FixOutcome::Silhouette(_)));
/// ```
pub struct IconFixer<P> {
    provider: P,
    override_uri: String,
    use_overrides: bool,
    auto_silhouette: bool,
    silhouette: SilhouetteConfig,
    grayscale: GrayscaleConfig,
}

impl<P: IconOverrideProvider> IconFixer<P> {
    /// Creates a fixer with the given config and override store.
    pub fn new(config: FixerConfig, provider: P) -> Self {
        let mut fixer = Self {
            provider,
            override_uri: String::new(),
            use_overrides: true,
            auto_silhouette: true,
            silhouette: SilhouetteConfig::default(),
            grayscale: GrayscaleConfig::default(),
        };
        fixer.apply_config(&config);
        fixer
    }

    /// Returns a reference to the override store.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Looks up and decodes the override for `package`.
    pub fn lookup_override(&self, package: &str) -> Result<Option<RgbaImage>, IconFixError> {
        let query = OverrideQuery::for_package(self.override_uri.as_str(), package);
        match self.provider.query(&query)? {
            Some(row) => Ok(Some(row.icon_bitmap()?)),
            None => Ok(None),
        }
    }

    /// Decides what `entry`'s small icon should become.
    ///
    /// Override failures never surface here; they are logged and the chain
    /// moves on.
    ///
    /// # Errors
    ///
    /// Returns an error when silhouette generation fails.
    pub fn fix(&self, entry: &IconEntry) -> Result<FixOutcome, IconFixError> {
        let package = entry.package_name.as_str();

        if self.use_overrides {
            match self.lookup_override(package) {
                Ok(Some(icon)) => {
                    info!("{package}: using icon override");
                    return Ok(FixOutcome::Override(icon));
                }
                Ok(None) => debug!("{package}: no icon override"),
                Err(e) => warn!("{package}: icon override lookup failed: {e}"),
            }
        }

        let Some(small_icon) = &entry.small_icon else {
            return Ok(FixOutcome::Unchanged(Unchanged::NoDrawable));
        };
        let Some(bitmap) = small_icon.as_bitmap() else {
            return Ok(FixOutcome::Unchanged(Unchanged::NotBitmap));
        };
        if !self.auto_silhouette {
            return Ok(FixOutcome::Unchanged(Unchanged::Disabled));
        }
        if is_grayscale(bitmap, &self.grayscale) {
            debug!("{package}: small icon already grayscale");
            return Ok(FixOutcome::Unchanged(Unchanged::AlreadyGrayscale));
        }

        let generated = silhouette_with(bitmap, &self.silhouette)?;
        info!("{package}: generated silhouette icon");
        Ok(FixOutcome::Silhouette(generated))
    }

    /// Fixes `entry` in place, keeping the original icon on any failure.
    pub fn fix_or_keep(&self, entry: &mut IconEntry) -> FixOutcome {
        match self.fix(entry) {
            Ok(outcome) => {
                if let Some(icon) = outcome.icon() {
                    entry.set_small_icon(icon.clone());
                }
                outcome
            }
            Err(e) => {
                error!("{}: keeping original icon: {e}", entry.package_name);
                FixOutcome::Unchanged(Unchanged::Failed)
            }
        }
    }
}

impl<P: IconOverrideProvider> Configurable for IconFixer<P> {
    fn apply_config(&mut self, config: &FixerConfig) {
        self.override_uri = config.override_uri.clone();
        self.use_overrides = config.use_overrides;
        self.auto_silhouette = config.auto_silhouette;
        self.silhouette = config.silhouette.into();
        self.grayscale = config.grayscale.into();
    }

    fn export_config(&self) -> FixerConfig {
        FixerConfig {
            override_uri: self.override_uri.clone(),
            use_overrides: self.use_overrides,
            auto_silhouette: self.auto_silhouette,
            silhouette: self.silhouette.into(),
            grayscale: self.grayscale.into(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SilhouetteSettings;
    use crate::icon::{SmallIcon, WHITE};
    use crate::provider::{
        JsonFileOverrides, MemoryOverrides, NoOverrides, OVERRIDE_URI, OverrideRecord,
    };
    use image::Rgba;

    const PACKAGE: &str = "com.example.chat";

    /// A red glyph on a transparent 8x8 canvas.
    fn colorful_icon() -> RgbaImage {
        let mut img = RgbaImage::new(8, 8);
        for (x, y) in [(2, 2), (3, 2), (2, 3), (3, 3), (5, 5)] {
            img.put_pixel(x, y, Rgba([220, 30, 30, 255]));
        }
        img
    }

    fn gray_icon() -> RgbaImage {
        RgbaImage::from_pixel(8, 8, Rgba([128, 128, 128, 255]))
    }

    fn override_icon() -> RgbaImage {
        RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 255]))
    }

    fn store_with_override() -> MemoryOverrides {
        let mut store = MemoryOverrides::new();
        store.insert_icon(PACKAGE, &override_icon()).unwrap();
        store
    }

    #[test]
    fn override_wins_over_silhouette() {
        let fixer = IconFixer::new(FixerConfig::default(), store_with_override());
        let mut entry = IconEntry::with_bitmap(PACKAGE, colorful_icon());

        let outcome = fixer.fix_or_keep(&mut entry);
        assert_eq!(outcome, FixOutcome::Override(override_icon()));
        assert_eq!(entry.small_icon, Some(SmallIcon::Bitmap(override_icon())));
    }

    #[test]
    fn override_applies_without_a_drawable() {
        let fixer = IconFixer::new(FixerConfig::default(), store_with_override());
        let mut entry = IconEntry::without_icon(PACKAGE);

        assert!(matches!(fixer.fix_or_keep(&mut entry), FixOutcome::Override(_)));
        assert!(entry.small_icon.is_some());
    }

    #[test]
    fn missing_override_falls_back_to_silhouette() {
        let fixer = IconFixer::new(FixerConfig::default(), store_with_override());
        let mut entry = IconEntry::with_bitmap("com.other", colorful_icon());

        let outcome = fixer.fix_or_keep(&mut entry);
        let FixOutcome::Silhouette(generated) = outcome else {
            panic!("expected silhouette, got {outcome:?}");
        };
        assert_eq!(generated.dimensions(), (8, 8));
        assert_eq!(generated.get_pixel(2, 2).0, WHITE.0);
        assert_eq!(generated.get_pixel(0, 0).0, [0, 0, 0, 0]);
        assert_eq!(entry.small_icon, Some(SmallIcon::Bitmap(generated)));
    }

    #[test]
    fn broken_override_falls_back_to_silhouette() {
        let mut store = MemoryOverrides::new();
        store.insert(OverrideRecord {
            package_name: PACKAGE.into(),
            icon_bitmap: "not base64 !".into(),
        });
        let fixer = IconFixer::new(FixerConfig::default(), store);

        let outcome = fixer.fix(&IconEntry::with_bitmap(PACKAGE, colorful_icon())).unwrap();
        assert!(matches!(outcome, FixOutcome::Silhouette(_)));
    }

    #[test]
    fn unavailable_store_falls_back_to_silhouette() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileOverrides::new(dir.path().join("overrides.json"));
        let fixer = IconFixer::new(FixerConfig::default(), store);

        let outcome = fixer.fix(&IconEntry::with_bitmap(PACKAGE, colorful_icon())).unwrap();
        assert!(matches!(outcome, FixOutcome::Silhouette(_)));
    }

    #[test]
    fn malformed_uri_falls_back_to_silhouette() {
        let config = FixerConfig::new().with_override_uri("::bad::");
        let fixer = IconFixer::new(config, store_with_override());

        let outcome = fixer.fix(&IconEntry::with_bitmap(PACKAGE, colorful_icon())).unwrap();
        assert!(matches!(outcome, FixOutcome::Silhouette(_)));
    }

    #[test]
    fn overrides_can_be_disabled() {
        let config = FixerConfig::new().with_overrides(false);
        let fixer = IconFixer::new(config, store_with_override());

        let outcome = fixer.fix(&IconEntry::with_bitmap(PACKAGE, colorful_icon())).unwrap();
        assert!(matches!(outcome, FixOutcome::Silhouette(_)));
    }

    #[test]
    fn grayscale_icon_is_unchanged() {
        let fixer = IconFixer::new(FixerConfig::default(), NoOverrides);
        let mut entry = IconEntry::with_bitmap(PACKAGE, gray_icon());

        let outcome = fixer.fix_or_keep(&mut entry);
        assert_eq!(outcome, FixOutcome::Unchanged(Unchanged::AlreadyGrayscale));
        assert_eq!(entry.small_icon, Some(SmallIcon::Bitmap(gray_icon())));
    }

    #[test]
    fn non_bitmap_and_missing_icons_are_unchanged() {
        let fixer = IconFixer::new(FixerConfig::default(), NoOverrides);

        let mut vector = IconEntry::new(PACKAGE, SmallIcon::Drawable("vector".into()));
        assert_eq!(
            fixer.fix_or_keep(&mut vector),
            FixOutcome::Unchanged(Unchanged::NotBitmap)
        );
        assert_eq!(vector.small_icon, Some(SmallIcon::Drawable("vector".into())));

        let mut missing = IconEntry::without_icon(PACKAGE);
        assert_eq!(
            fixer.fix_or_keep(&mut missing),
            FixOutcome::Unchanged(Unchanged::NoDrawable)
        );
    }

    #[test]
    fn auto_silhouette_can_be_disabled() {
        let config = FixerConfig::new().with_auto_silhouette(false);
        let fixer = IconFixer::new(config, NoOverrides);

        let outcome = fixer.fix(&IconEntry::with_bitmap(PACKAGE, colorful_icon())).unwrap();
        assert_eq!(outcome, FixOutcome::Unchanged(Unchanged::Disabled));
    }

    #[test]
    fn silhouette_failure_keeps_original_icon() {
        let tiny = RgbaImage::from_pixel(1, 1, Rgba([200, 20, 20, 255]));
        let fixer = IconFixer::new(FixerConfig::default(), NoOverrides);
        let mut entry = IconEntry::with_bitmap(PACKAGE, tiny.clone());

        assert!(matches!(
            fixer.fix(&entry),
            Err(IconFixError::SampleOutOfBounds { .. })
        ));
        assert_eq!(
            fixer.fix_or_keep(&mut entry),
            FixOutcome::Unchanged(Unchanged::Failed)
        );
        assert_eq!(entry.small_icon, Some(SmallIcon::Bitmap(tiny)));
    }

    #[test]
    fn lookup_override_by_package() {
        let fixer = IconFixer::new(FixerConfig::default(), store_with_override());
        assert_eq!(fixer.lookup_override(PACKAGE).unwrap(), Some(override_icon()));
        assert_eq!(fixer.lookup_override("com.other").unwrap(), None);
    }

    #[test]
    fn config_apply_and_export() {
        let config = FixerConfig::new()
            .with_override_uri("content://example.icons/ICON")
            .with_overrides(false)
            .with_silhouette(SilhouetteSettings {
                threshold_ratio: 0.6,
            });

        let mut fixer = IconFixer::new(FixerConfig::default(), NoOverrides);
        assert_eq!(fixer.export_config().override_uri, OVERRIDE_URI);

        fixer.apply_config(&config);
        assert_eq!(fixer.export_config(), config);
    }

    #[test]
    fn fixer_accepts_borrowed_provider() {
        let store = store_with_override();
        let fixer = IconFixer::new(FixerConfig::default(), &store);
        assert!(fixer.lookup_override(PACKAGE).unwrap().is_some());
        assert_eq!(fixer.provider().len(), 1);
    }
}
