//! Error types for song decoding and processing.

use std::io;

use thiserror::Error;

/// Trait for errors that carry a stable machine-readable code.
///
/// Implemented by the error enums of every Note Block World crate so that
/// front ends (the CLI's `--json` mode, an HTTP layer) can report failures
/// uniformly without matching on crate-specific variants.
///
/// # Example
///
/// ```ignore
/// use nbw_song::CodedError;
///
/// fn report<E: CodedError>(err: E) {
///     eprintln!("[{}] {}", err.code(), err.message());
/// }
/// ```
pub trait CodedError: std::error::Error {
    /// Stable error code such as `"SONG_001"` or `"THUMB_002"`.
    fn code(&self) -> &'static str;

    /// Human-readable message. Defaults to the `Display` output.
    fn message(&self) -> String {
        self.to_string()
    }

    /// Error category used to group related codes ("song", "thumbnail").
    fn category(&self) -> &'static str;
}

/// Errors from reading, writing or summarizing a song.
#[derive(Debug, Error)]
pub enum SongError {
    #[error("IO error: {0}")]
    Io(io::Error),

    #[error("unexpected end of song data")]
    UnexpectedEof,

    #[error("unsupported NBS version {0}")]
    UnsupportedVersion(u8),

    #[error("invalid song data: {0}")]
    InvalidData(String),

    #[error("song contains no notes")]
    EmptySong,
}

impl From<io::Error> for SongError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => SongError::UnexpectedEof,
            _ => SongError::Io(err),
        }
    }
}

impl CodedError for SongError {
    fn code(&self) -> &'static str {
        match self {
            SongError::Io(_) => "SONG_001",
            SongError::UnexpectedEof => "SONG_002",
            SongError::UnsupportedVersion(_) => "SONG_003",
            SongError::InvalidData(_) => "SONG_004",
            SongError::EmptySong => "SONG_005",
        }
    }

    fn category(&self) -> &'static str {
        "song"
    }
}
