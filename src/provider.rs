//! Per-package icon overrides.
//!
//! Users can register a replacement small icon for a package. Replacements
//! live in a store addressed by a content URI and are queried with a
//! projection plus a `packageName = ?` selection. Each row carries the icon
//! as a base64-encoded image in the `iconBitmap` column.
//!
//! ```json
//! [
//!   { "packageName": "com.example.chat", "iconBitmap": "iVBORw0KGgo..." }
//! ]
//! ```

use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use image::{ImageFormat, RgbaImage};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::IconFixError;

/// Address of the override store.
pub const OVERRIDE_URI: &str = "content://top.easterNday.ICON/ICON";

pub const COLUMN_PACKAGE_NAME: &str = "packageName";
pub const COLUMN_ICON_BITMAP: &str = "iconBitmap";

/// Selection clause matching a single package exactly.
pub const PACKAGE_SELECTION: &str = "packageName = ?";

/// Standard alphabet; padding optional on decode.
const ICON_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

// ============================================================================
// Content URI
// ============================================================================

/// A parsed `content://authority/path` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentUri {
    pub authority: String,
    pub path: String,
}

impl ContentUri {
    /// Parses a content URI. Scheme, authority and path are all required.
    pub fn parse(uri: &str) -> Result<Self, IconFixError> {
        let malformed = || IconFixError::MalformedUri(uri.to_string());

        let rest = uri.strip_prefix("content://").ok_or_else(malformed)?;
        let (authority, path) = rest.split_once('/').ok_or_else(malformed)?;
        if authority.is_empty() || path.is_empty() || authority.contains(char::is_whitespace) {
            return Err(malformed());
        }

        Ok(Self {
            authority: authority.to_string(),
            path: path.to_string(),
        })
    }
}

// ============================================================================
// Query / Row
// ============================================================================

/// A query against an override store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideQuery {
    pub uri: String,
    pub projection: Vec<String>,
    pub selection: String,
    pub selection_args: Vec<String>,
}

impl OverrideQuery {
    /// Builds the lookup for `package` against the store at `uri`.
    pub fn for_package(uri: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            projection: vec![COLUMN_PACKAGE_NAME.into(), COLUMN_ICON_BITMAP.into()],
            selection: PACKAGE_SELECTION.into(),
            selection_args: vec![package.into()],
        }
    }

    /// Parses the query URI.
    pub fn content_uri(&self) -> Result<ContentUri, IconFixError> {
        ContentUri::parse(&self.uri)
    }

    /// The package this query selects, if it uses the package selection.
    pub fn package(&self) -> Option<&str> {
        if self.selection != PACKAGE_SELECTION {
            return None;
        }
        self.selection_args.first().map(String::as_str)
    }
}

/// A single result row: projected column name to value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OverrideRow {
    columns: HashMap<String, String>,
}

impl OverrideRow {
    /// Projects a stored record onto the requested columns.
    fn project(record: &OverrideRecord, projection: &[String]) -> Self {
        let columns = projection
            .iter()
            .filter_map(|column| {
                let value = match column.as_str() {
                    COLUMN_PACKAGE_NAME => &record.package_name,
                    COLUMN_ICON_BITMAP => &record.icon_bitmap,
                    _ => return None,
                };
                Some((column.clone(), value.clone()))
            })
            .collect();
        Self { columns }
    }

    /// Returns a column value, failing if the row lacks it.
    pub fn get(&self, column: &str) -> Result<&str, IconFixError> {
        self.columns
            .get(column)
            .map(String::as_str)
            .ok_or_else(|| IconFixError::MissingColumn(column.to_string()))
    }

    /// Decodes the `iconBitmap` column.
    pub fn icon_bitmap(&self) -> Result<RgbaImage, IconFixError> {
        decode_icon_bitmap(self.get(COLUMN_ICON_BITMAP)?)
    }
}

/// Stored form of an override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideRecord {
    pub package_name: String,
    pub icon_bitmap: String,
}

impl OverrideRecord {
    /// Encodes `icon` into a record for `package_name`.
    pub fn from_icon(package_name: impl Into<String>, icon: &RgbaImage) -> Result<Self, IconFixError> {
        Ok(Self {
            package_name: package_name.into(),
            icon_bitmap: encode_icon_bitmap(icon)?,
        })
    }
}

// ============================================================================
// Provider trait
// ============================================================================

/// A store that can be queried for icon overrides.
pub trait IconOverrideProvider {
    /// Runs `query`. `Ok(None)` means the store has no matching row.
    fn query(&self, query: &OverrideQuery) -> Result<Option<OverrideRow>, IconFixError>;
}

impl<P: IconOverrideProvider + ?Sized> IconOverrideProvider for &P {
    fn query(&self, query: &OverrideQuery) -> Result<Option<OverrideRow>, IconFixError> {
        (**self).query(query)
    }
}

/// A provider with no rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOverrides;

impl IconOverrideProvider for NoOverrides {
    fn query(&self, query: &OverrideQuery) -> Result<Option<OverrideRow>, IconFixError> {
        query.content_uri()?;
        Ok(None)
    }
}

fn default_store_uri() -> ContentUri {
    ContentUri {
        authority: "top.easterNday.ICON".into(),
        path: "ICON".into(),
    }
}

/// Runs `query` over `records` if it targets the `served` URI.
fn select(
    served: &ContentUri,
    records: &[OverrideRecord],
    query: &OverrideQuery,
) -> Result<Option<OverrideRow>, IconFixError> {
    let uri = query.content_uri()?;
    if uri != *served {
        debug!("no override store at {}", query.uri);
        return Ok(None);
    }
    let Some(package) = query.package() else {
        return Ok(None);
    };

    Ok(records
        .iter()
        .find(|record| record.package_name == package)
        .map(|record| OverrideRow::project(record, &query.projection)))
}

// ============================================================================
// In-memory provider
// ============================================================================

/// Overrides held in memory.
#[derive(Debug, Clone)]
pub struct MemoryOverrides {
    uri: ContentUri,
    records: Vec<OverrideRecord>,
}

impl MemoryOverrides {
    /// Creates an empty store served at [`OVERRIDE_URI`].
    pub fn new() -> Self {
        Self {
            uri: default_store_uri(),
            records: Vec::new(),
        }
    }

    /// Creates an empty store served at `uri`.
    pub fn at(uri: &str) -> Result<Self, IconFixError> {
        Ok(Self {
            uri: ContentUri::parse(uri)?,
            records: Vec::new(),
        })
    }

    /// Inserts or replaces the override for a package.
    pub fn insert(&mut self, record: OverrideRecord) {
        self.records
            .retain(|existing| existing.package_name != record.package_name);
        self.records.push(record);
    }

    /// Encodes `icon` and stores it for `package_name`.
    pub fn insert_icon(&mut self, package_name: &str, icon: &RgbaImage) -> Result<(), IconFixError> {
        self.insert(OverrideRecord::from_icon(package_name, icon)?);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for MemoryOverrides {
    fn default() -> Self {
        Self::new()
    }
}

impl IconOverrideProvider for MemoryOverrides {
    fn query(&self, query: &OverrideQuery) -> Result<Option<OverrideRow>, IconFixError> {
        select(&self.uri, &self.records, query)
    }
}

// ============================================================================
// JSON file provider
// ============================================================================

/// Overrides read from a JSON file on every query.
///
/// A missing or unreadable file makes the store unavailable rather than empty.
#[derive(Debug, Clone)]
pub struct JsonFileOverrides {
    uri: ContentUri,
    path: PathBuf,
}

impl JsonFileOverrides {
    /// Serves the file at `path` under [`OVERRIDE_URI`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            uri: default_store_uri(),
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<OverrideRecord>, IconFixError> {
        let unavailable = |e: &dyn std::fmt::Display| {
            IconFixError::ProviderUnavailable(format!("{}: {e}", self.path.display()))
        };

        let json = std::fs::read_to_string(&self.path).map_err(|e| unavailable(&e))?;
        serde_json::from_str(&json).map_err(|e| unavailable(&e))
    }
}

impl IconOverrideProvider for JsonFileOverrides {
    fn query(&self, query: &OverrideQuery) -> Result<Option<OverrideRow>, IconFixError> {
        let records = self.load()?;
        select(&self.uri, &records, query)
    }
}

// ============================================================================
// Codec
// ============================================================================

/// Decodes a stored `iconBitmap` value.
///
/// Characters outside the base64 alphabet (line breaks, stray separators) are
/// skipped and padding is optional. The decoded bytes may be any format the
/// `image` crate can sniff.
pub fn decode_icon_bitmap(encoded: &str) -> Result<RgbaImage, IconFixError> {
    let compact: String = encoded
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '='))
        .collect();
    let bytes = ICON_BASE64.decode(compact)?;
    Ok(image::load_from_memory(&bytes)?.to_rgba8())
}

/// Encodes `icon` as PNG and then base64, the inverse of [`decode_icon_bitmap`].
pub fn encode_icon_bitmap(icon: &RgbaImage) -> Result<String, IconFixError> {
    let mut png = Vec::new();
    icon.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(ICON_BASE64.encode(png))
}
