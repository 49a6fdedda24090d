//! Loading songs and thumbnail parameter files.
//!
//! Songs are read from `.nbs` files; thumbnail parameters from JSON files in
//! the same camelCase shape the upload form submits. Both loaders return a
//! BLAKE3 hash of the raw file so reports can identify their inputs.

use std::path::{Path, PathBuf};

use nbw_song::{read_song, CodedError, Song, SongError};
use nbw_thumbnail::ThumbnailData;

/// Recognized song file extensions.
pub const SONG_EXTENSIONS: &[&str] = &["nbs"];

/// A song read from disk.
#[derive(Debug)]
pub struct LoadedSong {
    pub song: Song,
    /// BLAKE3 hash of the file content (hex string).
    pub source_hash: String,
}

/// Errors that can occur while loading inputs.
#[derive(Debug)]
pub enum InputError {
    /// File could not be read.
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Not a song file.
    UnknownExtension { extension: Option<String> },

    /// The song file is malformed.
    Song { path: PathBuf, source: SongError },

    /// The parameter file is not valid JSON for thumbnail parameters.
    JsonParse { path: PathBuf, message: String },
}

impl InputError {
    /// Stable error code for machine-readable output.
    pub fn code(&self) -> &'static str {
        match self {
            InputError::FileRead { .. } => crate::commands::json_output::error_codes::FILE_READ,
            InputError::UnknownExtension { .. } => {
                crate::commands::json_output::error_codes::UNKNOWN_EXTENSION
            }
            InputError::Song { source, .. } => source.code(),
            InputError::JsonParse { .. } => crate::commands::json_output::error_codes::JSON_PARSE,
        }
    }
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::FileRead { path, source } => {
                write!(f, "failed to read file '{}': {}", path.display(), source)
            }
            InputError::UnknownExtension { extension } => match extension {
                Some(ext) => write!(f, "unknown file extension '.{}' (expected .nbs)", ext),
                None => write!(f, "file has no extension (expected .nbs)"),
            },
            InputError::Song { path, source } => {
                write!(f, "failed to parse song '{}': {}", path.display(), source)
            }
            InputError::JsonParse { path, message } => {
                write!(f, "invalid parameter file '{}': {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InputError::FileRead { source, .. } => Some(source),
            InputError::Song { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Whether `path` looks like a song file.
pub fn is_song_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SONG_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// Load and parse a `.nbs` song.
pub fn load_song(path: &Path) -> Result<LoadedSong, InputError> {
    if !is_song_file(path) {
        return Err(InputError::UnknownExtension {
            extension: path
                .extension()
                .and_then(|e| e.to_str())
                .map(|s| s.to_lowercase()),
        });
    }

    let bytes = std::fs::read(path).map_err(|source| InputError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let source_hash = blake3::hash(&bytes).to_hex().to_string();

    let song = read_song(&bytes).map_err(|source| InputError::Song {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!(
        "loaded {} ({} bytes, {} notes)",
        path.display(),
        bytes.len(),
        song.note_count()
    );

    Ok(LoadedSong { song, source_hash })
}

/// Load thumbnail parameters from a JSON file. Missing fields take their
/// defaults; values are not validated here.
pub fn load_thumbnail_data(path: &Path) -> Result<ThumbnailData, InputError> {
    let content = std::fs::read_to_string(path).map_err(|source| InputError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|e| InputError::JsonParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nbw_song::{write_song_to_vec, NoteBlock};

    #[test]
    fn test_load_song() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("song.nbs");

        let mut song = Song::new();
        song.set_note(3, 1, NoteBlock::new(2, 40));
        let bytes = write_song_to_vec(&song).unwrap();
        std::fs::write(&path, &bytes).unwrap();

        let loaded = load_song(&path).unwrap();
        assert_eq!(loaded.song.note_count(), 1);
        assert_eq!(loaded.source_hash, blake3::hash(&bytes).to_hex().to_string());
    }

    #[test]
    fn test_load_song_rejects_extension() {
        let err = load_song(Path::new("song.mid")).unwrap_err();
        assert!(matches!(err, InputError::UnknownExtension { .. }));
        assert_eq!(err.code(), "CLI_002");
    }

    #[test]
    fn test_load_song_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let err = load_song(&tmp.path().join("missing.nbs")).unwrap_err();
        assert!(matches!(err, InputError::FileRead { .. }));
        assert_eq!(err.code(), "CLI_001");
    }

    #[test]
    fn test_load_song_malformed() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("broken.NBS");
        std::fs::write(&path, [0u8, 0]).unwrap();

        let err = load_song(&path).unwrap_err();
        assert!(matches!(err, InputError::Song { .. }));
        assert!(err.code().starts_with("SONG_"));
    }

    #[test]
    fn test_load_thumbnail_data() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("thumb.json");
        std::fs::write(&path, r##"{"zoomLevel": 5, "backgroundColor": "#000000"}"##).unwrap();

        let data = load_thumbnail_data(&path).unwrap();
        assert_eq!(data.zoom_level, 5);
        assert_eq!(data.start_tick, 0);
        assert_eq!(data.background_color, "#000000");

        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            load_thumbnail_data(&path),
            Err(InputError::JsonParse { .. })
        ));
    }
}
