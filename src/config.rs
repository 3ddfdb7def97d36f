//! Serializable fixer configuration.
//!
//! A [`FixerConfig`] captures every tunable of the fixer in a JSON-friendly
//! format. Missing fields fall back to their defaults, so `{}` is a valid
//! configuration.
//!
//! ```
//! use notif_icon_fixer::FixerConfig;
//!
//! let config = FixerConfig::from_json(r#"{ "autoSilhouette": false }"#).unwrap();
//! assert!(!config.auto_silhouette);
//! assert!(config.use_overrides);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::IconFixError;
use crate::filter::{DEFAULT_THRESHOLD_RATIO, SilhouetteConfig};
use crate::grayscale::GrayscaleConfig;
use crate::provider::OVERRIDE_URI;

// ============================================================================
// Stage Settings
// ============================================================================

/// Serializable settings for the silhouette filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SilhouetteSettings {
    /// Fraction of the mean brightness used as threshold (0.0-1.0).
    pub threshold_ratio: f32,
}

impl Default for SilhouetteSettings {
    fn default() -> Self {
        Self {
            threshold_ratio: DEFAULT_THRESHOLD_RATIO,
        }
    }
}

impl From<SilhouetteSettings> for SilhouetteConfig {
    fn from(settings: SilhouetteSettings) -> Self {
        SilhouetteConfig::new(settings.threshold_ratio)
    }
}

impl From<SilhouetteConfig> for SilhouetteSettings {
    fn from(config: SilhouetteConfig) -> Self {
        Self {
            threshold_ratio: config.threshold_ratio,
        }
    }
}

/// Serializable settings for grayscale detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GrayscaleSettings {
    pub tolerance: u8,
    pub alpha_tolerance: u8,
    pub compact_size: u32,
}

impl Default for GrayscaleSettings {
    fn default() -> Self {
        GrayscaleConfig::default().into()
    }
}

impl From<GrayscaleSettings> for GrayscaleConfig {
    fn from(settings: GrayscaleSettings) -> Self {
        Self {
            tolerance: settings.tolerance,
            alpha_tolerance: settings.alpha_tolerance,
            compact_size: settings.compact_size,
        }
    }
}

impl From<GrayscaleConfig> for GrayscaleSettings {
    fn from(config: GrayscaleConfig) -> Self {
        Self {
            tolerance: config.tolerance,
            alpha_tolerance: config.alpha_tolerance,
            compact_size: config.compact_size,
        }
    }
}

// ============================================================================
// FixerConfig
// ============================================================================

/// Configuration handed to [`IconFixer`](crate::IconFixer) at construction.
///
/// # JSON Format
///
/// ```json
/// {
///   "overrideUri": "content://top.easterNday.ICON/ICON",
///   "useOverrides": true,
///   "autoSilhouette": true,
///   "silhouette": { "thresholdRatio": 0.8 },
///   "grayscale": { "tolerance": 20, "alphaTolerance": 50, "compactSize": 64 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FixerConfig {
    /// Content URI of the override store.
    pub override_uri: String,

    /// Whether to consult the override store at all.
    pub use_overrides: bool,

    /// Whether colourful bitmap icons are turned into silhouettes.
    pub auto_silhouette: bool,

    pub silhouette: SilhouetteSettings,

    pub grayscale: GrayscaleSettings,
}

impl Default for FixerConfig {
    fn default() -> Self {
        Self {
            override_uri: OVERRIDE_URI.to_string(),
            use_overrides: true,
            auto_silhouette: true,
            silhouette: SilhouetteSettings::default(),
            grayscale: GrayscaleSettings::default(),
        }
    }
}

impl FixerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the override store URI.
    pub fn with_override_uri(mut self, uri: impl Into<String>) -> Self {
        self.override_uri = uri.into();
        self
    }

    /// Enables or disables the override lookup.
    pub fn with_overrides(mut self, enabled: bool) -> Self {
        self.use_overrides = enabled;
        self
    }

    /// Enables or disables automatic silhouettes.
    pub fn with_auto_silhouette(mut self, enabled: bool) -> Self {
        self.auto_silhouette = enabled;
        self
    }

    /// Sets silhouette settings.
    pub fn with_silhouette(mut self, settings: SilhouetteSettings) -> Self {
        self.silhouette = settings;
        self
    }

    /// Sets grayscale detection settings.
    pub fn with_grayscale(mut self, settings: GrayscaleSettings) -> Self {
        self.grayscale = settings;
        self
    }

    /// Serializes the config to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the config to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reads a config from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, IconFixError> {
        let json = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&json)?)
    }
}

// ============================================================================
// Tests
// ============================================================================
