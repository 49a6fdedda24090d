//! JSON output types for machine-readable CLI output.
//!
//! Every command accepting `--json` prints one [`CommandOutput`] document on
//! stdout, successful or not, so scripts never have to parse colored text.

use nbw_song::{CodedError, SongError};
use nbw_thumbnail::ThumbnailError;
use serde::{Deserialize, Serialize};

use crate::input::InputError;

/// Error codes for CLI operations.
///
/// These codes are stable and can be used for programmatic error handling.
/// Library errors keep their own codes (`SONG_xxx`, `THUMB_xxx`).
pub mod error_codes {
    /// File could not be read
    pub const FILE_READ: &str = "CLI_001";
    /// Unknown file extension
    pub const UNKNOWN_EXTENSION: &str = "CLI_002";
    /// JSON parse error
    pub const JSON_PARSE: &str = "CLI_003";
    /// Output could not be written
    pub const FILE_WRITE: &str = "CLI_004";
    /// Anything without a more specific code
    pub const INTERNAL: &str = "CLI_099";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CLI_001", "SONG_002")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Source file path (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl JsonError {
    /// Creates a new error with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            file: None,
        }
    }

    /// Sets the file path for this error.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Convert any command error, picking the most specific code in its
    /// source chain.
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        let code = err
            .chain()
            .find_map(|cause| {
                if let Some(e) = cause.downcast_ref::<InputError>() {
                    Some(e.code())
                } else if let Some(e) = cause.downcast_ref::<SongError>() {
                    Some(e.code())
                } else if let Some(e) = cause.downcast_ref::<ThumbnailError>() {
                    Some(e.code())
                } else {
                    None
                }
            })
            .unwrap_or(error_codes::INTERNAL);
        Self::new(code, format!("{:#}", err))
    }
}

/// Envelope printed by every `--json` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandOutput<T> {
    /// Whether the command succeeded
    pub success: bool,
    /// Errors encountered
    pub errors: Vec<JsonError>,
    /// Command result (on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
}

impl<T> CommandOutput<T> {
    pub fn success(result: T) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            result: Some(result),
        }
    }

    pub fn failure(errors: Vec<JsonError>) -> Self {
        Self {
            success: false,
            errors,
            result: None,
        }
    }
}

/// Print `output` as pretty JSON on stdout.
pub fn print_json<T: Serialize>(output: &CommandOutput<T>) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(output)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_json_error_serialization() {
        let error = JsonError::new("CLI_001", "test error").with_file("song.nbs");

        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"CLI_001\""));
        assert!(json.contains("\"message\":\"test error\""));
        assert!(json.contains("\"file\":\"song.nbs\""));
    }

    #[test]
    fn test_json_error_optional_fields_skipped() {
        let json = serde_json::to_string(&JsonError::new("CLI_001", "x")).unwrap();
        assert!(!json.contains("\"file\""));
    }

    #[test]
    fn test_code_found_through_context() {
        let err = Err::<(), _>(ThumbnailError::InvalidArgument("zoom".into()))
            .context("rendering failed")
            .unwrap_err();
        let json = JsonError::from_anyhow(&err);
        assert_eq!(json.code, "THUMB_001");
        assert!(json.message.starts_with("rendering failed: "));

        let plain = JsonError::from_anyhow(&anyhow::anyhow!("boom"));
        assert_eq!(plain.code, error_codes::INTERNAL);
    }

    #[test]
    fn test_failure_has_no_result() {
        let output: CommandOutput<u32> = CommandOutput::failure(vec![JsonError::new("X", "y")]);
        let json = serde_json::to_string(&output).unwrap();
        assert!(json.contains("\"success\":false"));
        assert!(!json.contains("\"result\""));
    }
}
