//! Error type shared by the filter, the override provider and the fixer.

use thiserror::Error;

/// Everything that can go wrong while fixing a notification icon.
///
/// None of these are fatal to the caller: [`IconFixer::fix_or_keep`](crate::IconFixer::fix_or_keep)
/// logs them and leaves the original icon in place.
#[derive(Debug, Error)]
pub enum IconFixError {
    /// An edge sample offset fell outside the pixel buffer.
    #[error("edge sample {name} at offset {offset} is outside a {width}x{height} bitmap")]
    SampleOutOfBounds {
        name: &'static str,
        offset: i64,
        width: u32,
        height: u32,
    },

    #[error("malformed provider uri: {0}")]
    MalformedUri(String),

    /// The override store could not be reached or read.
    #[error("override provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("column '{0}' missing from override row")]
    MissingColumn(String),

    #[error("invalid base64 icon data: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
