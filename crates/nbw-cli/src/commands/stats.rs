//! Stats command implementation

use anyhow::Result;
use colored::Colorize;
use nbw_song::SongStats;
use std::path::Path;
use std::process::ExitCode;

use super::json_output::{print_json, CommandOutput, JsonError};
use crate::input::load_song;

/// Compute statistics for the song at `path`.
pub fn song_stats(path: &Path) -> Result<SongStats> {
    let loaded = load_song(path)?;
    Ok(SongStats::from_song(&loaded.song))
}

/// Format seconds as `m:ss`.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Run the stats command
///
/// # Returns
/// Exit code: 0 on success, 1 on error
pub fn run(input: &str, json_output: bool) -> Result<ExitCode> {
    let result = song_stats(Path::new(input));

    if json_output {
        return match result {
            Ok(stats) => {
                print_json(&CommandOutput::success(stats))?;
                Ok(ExitCode::SUCCESS)
            }
            Err(err) => {
                let error = JsonError::from_anyhow(&err).with_file(input);
                print_json(&CommandOutput::<SongStats>::failure(vec![error]))?;
                Ok(ExitCode::from(1))
            }
        };
    }

    let stats = result?;
    println!("{} {}", "Song statistics:".cyan().bold(), input);
    println!("  {} {}", "Notes:".dimmed(), stats.note_count);
    println!("  {} {}", "Ticks:".dimmed(), stats.tick_count);
    println!("  {} {}", "Layers:".dimmed(), stats.layer_count);
    match stats.tempo_range {
        Some([min, max]) => println!(
            "  {} {:.2} t/s ({:.2} to {:.2})",
            "Tempo:".dimmed(),
            stats.tempo,
            min,
            max
        ),
        None => println!("  {} {:.2} t/s", "Tempo:".dimmed(), stats.tempo),
    }
    println!("  {} {}/4", "Time signature:".dimmed(), stats.time_signature);
    println!("  {} {}", "Duration:".dimmed(), format_duration(stats.duration));
    if stats.loop_enabled {
        println!("  {} from tick {}", "Loop:".dimmed(), stats.loop_start_tick);
    }
    println!(
        "  {} {} vanilla, {} custom",
        "Instruments:".dimmed(),
        stats.vanilla_instrument_count,
        stats.custom_instrument_count
    );
    if !stats.midi_file_name.is_empty() {
        println!("  {} {}", "Imported from:".dimmed(), stats.midi_file_name);
    }

    if stats.compatible {
        println!("\n{}", "Playable in vanilla Minecraft".green().bold());
    } else {
        println!("\n{}", "Not playable in vanilla Minecraft".yellow().bold());
        if stats.uses_custom_instruments {
            println!("  - uses custom instruments");
        }
        if stats.notes_outside_octave_range > 0 {
            println!(
                "  - {} notes outside the two-octave range",
                stats.notes_outside_octave_range
            );
        }
    }

    Ok(ExitCode::SUCCESS)
}
