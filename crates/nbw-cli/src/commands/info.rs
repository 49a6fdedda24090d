//! Info command implementation
//!
//! Shows what the upload pipeline would store for a song: its metadata and
//! custom instrument usage. Songs without notes are rejected, as on upload.

use anyhow::Result;
use colored::Colorize;
use nbw_song::SongSummary;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::ExitCode;

use super::json_output::{print_json, CommandOutput, JsonError};
use crate::input::load_song;

/// Song summary plus file provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongInfo {
    /// BLAKE3 hash of the song file
    pub source_hash: String,
    /// Format version the file was saved with
    pub version: u8,
    pub note_count: usize,
    #[serde(flatten)]
    pub summary: SongSummary,
}

/// Summarize the song at `path`.
pub fn song_info(path: &Path) -> Result<SongInfo> {
    let loaded = load_song(path)?;
    let summary = SongSummary::from_song(&loaded.song)?;
    Ok(SongInfo {
        source_hash: loaded.source_hash,
        version: loaded.song.version,
        note_count: summary.notes.len(),
        summary,
    })
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

/// Run the info command
///
/// # Returns
/// Exit code: 0 on success, 1 on error
pub fn run(input: &str, json_output: bool) -> Result<ExitCode> {
    let result = song_info(Path::new(input));

    if json_output {
        return match result {
            Ok(info) => {
                print_json(&CommandOutput::success(info))?;
                Ok(ExitCode::SUCCESS)
            }
            Err(err) => {
                let error = JsonError::from_anyhow(&err).with_file(input);
                print_json(&CommandOutput::<SongInfo>::failure(vec![error]))?;
                Ok(ExitCode::from(1))
            }
        };
    }

    let info = result?;
    let summary = &info.summary;
    println!("{}", or_dash(&summary.title).cyan().bold());
    println!("  {} {}", "Author:".dimmed(), or_dash(&summary.author));
    println!(
        "  {} {}",
        "Original author:".dimmed(),
        or_dash(&summary.original_author)
    );
    if !summary.description.is_empty() {
        println!("  {} {}", "Description:".dimmed(), summary.description);
    }
    println!("  {} {}", "Notes:".dimmed(), info.note_count);
    println!("  {} v{}", "Format:".dimmed(), info.version);
    println!("  {} {}", "Hash:".dimmed(), &info.source_hash[..16]);

    if !summary.instruments.is_empty() {
        println!("\n{}", "Custom instruments:".cyan().bold());
        for inst in &summary.instruments {
            let count = if inst.count == 0 {
                "unused".dimmed().to_string()
            } else {
                format!("{} notes", inst.count)
            };
            println!("  {:>3} {} ({})", inst.id, inst.name, count);
        }
    }

    Ok(ExitCode::SUCCESS)
}
