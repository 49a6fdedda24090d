//! Render-all command implementation
//!
//! Renders a thumbnail for every `.nbs` file under a directory, mirroring
//! the directory layout in the output directory, and writes a summary
//! report next to the thumbnails.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use walkdir::WalkDir;

use super::json_output::{print_json, CommandOutput, JsonError};
use super::render::{render_song, RenderOptions, RenderResult};
use crate::input::{is_song_file, load_song};

/// File name of the summary report written to the output directory.
pub const SUMMARY_FILE: &str = "render_summary.json";

/// Outcome for one song.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongRenderResult {
    /// Path to the song file
    pub input: String,
    /// Whether rendering succeeded
    pub success: bool,
    /// Render details on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub render: Option<RenderResult>,
    /// Error on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonError>,
}

/// Summary report for a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSummary {
    /// Total songs found
    pub total: usize,
    /// Successful renders
    pub successful: usize,
    /// Failed renders
    pub failed: usize,
    /// Total runtime in seconds
    pub runtime_seconds: f64,
    /// Results per song, sorted by path
    pub songs: Vec<SongRenderResult>,
}

/// All song files under `dir`, sorted for deterministic order.
pub fn collect_songs(dir: &Path) -> Vec<PathBuf> {
    let mut songs: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_song_file(e.path()))
        .map(|e| e.path().to_path_buf())
        .collect();
    songs.sort();
    songs
}

/// Render every song under `song_dir` into `out_dir`.
pub fn render_all(song_dir: &Path, out_dir: &Path, options: &RenderOptions) -> Result<RenderSummary> {
    let start = Instant::now();

    if !song_dir.is_dir() {
        anyhow::bail!("Song directory does not exist: {}", song_dir.display());
    }
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

    // Shared by every song; a bad flag or sprite fails the whole batch.
    let params = options.draw_params()?;
    let assets = options.assets()?;

    let mut songs = Vec::new();
    for path in collect_songs(song_dir) {
        let relative = path.strip_prefix(song_dir).unwrap_or(&path);
        let output = out_dir.join(relative).with_extension("png");

        let result = load_song(&path)
            .map_err(anyhow::Error::from)
            .and_then(|loaded| render_song(&path, &loaded, &params, &assets, &output));

        songs.push(match result {
            Ok(render) => SongRenderResult {
                input: path.display().to_string(),
                success: true,
                render: Some(render),
                error: None,
            },
            Err(err) => {
                log::warn!("{}: {:#}", path.display(), err);
                SongRenderResult {
                    input: path.display().to_string(),
                    success: false,
                    render: None,
                    error: Some(JsonError::from_anyhow(&err)),
                }
            }
        });
    }

    let successful = songs.iter().filter(|s| s.success).count();
    let summary = RenderSummary {
        total: songs.len(),
        successful,
        failed: songs.len() - successful,
        runtime_seconds: start.elapsed().as_secs_f64(),
        songs,
    };

    let summary_path = out_dir.join(SUMMARY_FILE);
    let summary_json = serde_json::to_string_pretty(&summary)?;
    fs::write(&summary_path, summary_json)
        .with_context(|| format!("Failed to write summary: {}", summary_path.display()))?;

    Ok(summary)
}

/// Run the render-all command
///
/// # Returns
/// Exit code: 0 if every song rendered, 1 otherwise
pub fn run(song_dir: &str, out_dir: &str, options: &RenderOptions, json_output: bool) -> Result<ExitCode> {
    let result = render_all(Path::new(song_dir), Path::new(out_dir), options);

    if json_output {
        return match result {
            Ok(summary) => {
                let code = exit_code(&summary);
                print_json(&CommandOutput::success(summary))?;
                Ok(code)
            }
            Err(err) => {
                let error = JsonError::from_anyhow(&err).with_file(song_dir);
                print_json(&CommandOutput::<RenderSummary>::failure(vec![error]))?;
                Ok(ExitCode::from(1))
            }
        };
    }

    let summary = result?;
    for song in &summary.songs {
        match (&song.render, &song.error) {
            (Some(render), _) => println!(
                "  {} {} -> {}",
                "OK".green(),
                song.input,
                render.output.dimmed()
            ),
            (None, Some(error)) => println!(
                "  {} {} - {}",
                "FAILED".red(),
                song.input,
                error.message
            ),
            (None, None) => {}
        }
    }

    println!();
    println!("{} {}", "Total songs:".blue().bold(), summary.total);
    println!("{} {}", "Successful:".green().bold(), summary.successful);
    println!("{} {}", "Failed:".red().bold(), summary.failed);
    println!("{} {:.2}s", "Total runtime:".blue().bold(), summary.runtime_seconds);
    println!(
        "{} {}",
        "Summary:".blue().bold(),
        Path::new(out_dir).join(SUMMARY_FILE).display()
    );

    Ok(exit_code(&summary))
}

fn exit_code(summary: &RenderSummary) -> ExitCode {
    if summary.failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nbw_song::{write_song_to_vec, NoteBlock, Song};

    fn write_song(path: &Path, tick: u32) {
        let mut song = Song::new();
        song.set_note(tick, 0, NoteBlock::new(1, 40));
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, write_song_to_vec(&song).unwrap()).unwrap();
    }

    fn small() -> RenderOptions {
        RenderOptions {
            width: 64,
            height: 32,
            ..RenderOptions::default()
        }
    }

    #[test]
    fn test_collect_songs_sorted_and_filtered() {
        let tmp = tempfile::tempdir().unwrap();
        write_song(&tmp.path().join("b.nbs"), 0);
        write_song(&tmp.path().join("a/c.nbs"), 0);
        fs::write(tmp.path().join("notes.txt"), "x").unwrap();

        let songs = collect_songs(tmp.path());
        assert_eq!(
            songs,
            vec![tmp.path().join("a/c.nbs"), tmp.path().join("b.nbs")]
        );
    }

    #[test]
    fn test_render_all_mirrors_layout() {
        let songs = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write_song(&songs.path().join("one.nbs"), 1);
        write_song(&songs.path().join("album/two.nbs"), 2);

        let summary = render_all(songs.path(), out.path(), &small()).unwrap();
        assert_eq!((summary.total, summary.successful, summary.failed), (2, 2, 0));
        assert!(out.path().join("one.png").exists());
        assert!(out.path().join("album/two.png").exists());
        assert!(out.path().join(SUMMARY_FILE).exists());
    }

    #[test]
    fn test_render_all_reports_broken_songs() {
        let songs = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write_song(&songs.path().join("good.nbs"), 0);
        fs::write(songs.path().join("bad.nbs"), [1u8]).unwrap();

        let summary = render_all(songs.path(), out.path(), &small()).unwrap();
        assert_eq!((summary.successful, summary.failed), (1, 1));

        let bad = &summary.songs[0];
        assert!(bad.input.ends_with("bad.nbs"));
        assert_eq!(bad.error.as_ref().unwrap().code, "SONG_002");
        assert_eq!(exit_code(&summary), ExitCode::from(1));
    }

    #[test]
    fn test_render_all_missing_dir() {
        let out = tempfile::tempdir().unwrap();
        assert!(render_all(Path::new("/definitely/not/here"), out.path(), &small()).is_err());
    }
}
