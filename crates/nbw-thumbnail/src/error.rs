//! Error types for thumbnail rendering.

use nbw_song::CodedError;
use thiserror::Error;

use crate::png::PngError;

/// Errors from thumbnail rendering.
#[derive(Debug, Error)]
pub enum ThumbnailError {
    /// A caller passed a value the renderer cannot work with.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The note block sprite could not be loaded. Fatal for that render call.
    #[error("Failed to load resource '{path}': {source}")]
    ResourceLoad {
        path: String,
        #[source]
        source: PngError,
    },

    /// The rendered image could not be encoded.
    #[error("Image encoding failed: {0}")]
    Encoding(#[source] PngError),
}

impl CodedError for ThumbnailError {
    fn code(&self) -> &'static str {
        match self {
            ThumbnailError::InvalidArgument(_) => "THUMB_001",
            ThumbnailError::ResourceLoad { .. } => "THUMB_002",
            ThumbnailError::Encoding(_) => "THUMB_003",
        }
    }

    fn category(&self) -> &'static str {
        "thumbnail"
    }
}
