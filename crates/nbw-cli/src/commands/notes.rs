//! Notes command implementation
//!
//! Prints the flat note list of a song, the same records the thumbnail
//! renderer consumes.

use anyhow::Result;
use colored::Colorize;
use nbw_song::Note;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::ExitCode;

use super::json_output::{print_json, CommandOutput, JsonError};
use crate::input::load_song;

/// A note with its key name spelled out.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NoteRecord {
    #[serde(flatten)]
    pub note: Note,
    pub key_name: String,
}

impl From<Note> for NoteRecord {
    fn from(note: Note) -> Self {
        Self {
            key_name: note.key_name(),
            note,
        }
    }
}

/// Every note of the song at `path`, sorted by tick then layer.
pub fn list_notes(path: &Path) -> Result<Vec<NoteRecord>> {
    let loaded = load_song(path)?;
    let mut notes = loaded.song.note_list();
    notes.sort_by_key(|n| (n.tick, n.layer));
    Ok(notes.into_iter().map(NoteRecord::from).collect())
}

/// Run the notes command
///
/// # Returns
/// Exit code: 0 on success, 1 on error
pub fn run(input: &str, json_output: bool) -> Result<ExitCode> {
    let result = list_notes(Path::new(input));

    if json_output {
        return match result {
            Ok(notes) => {
                print_json(&CommandOutput::success(notes))?;
                Ok(ExitCode::SUCCESS)
            }
            Err(err) => {
                let error = JsonError::from_anyhow(&err).with_file(input);
                print_json(&CommandOutput::<Vec<NoteRecord>>::failure(vec![error]))?;
                Ok(ExitCode::from(1))
            }
        };
    }

    let notes = result?;
    println!(
        "{}",
        format!("{:>8} {:>6} {:>5} {:>5} {:>10}", "tick", "layer", "key", "name", "instrument")
            .cyan()
            .bold()
    );
    for record in &notes {
        println!(
            "{:>8} {:>6} {:>5} {:>5} {:>10}",
            record.note.tick,
            record.note.layer,
            record.note.key,
            record.key_name,
            record.note.instrument
        );
    }
    println!("{} {}", "Total:".dimmed(), notes.len());

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nbw_song::{write_song_to_vec, NoteBlock, Song};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_list_notes_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("song.nbs");

        let mut song = Song::new();
        song.set_note(4, 0, NoteBlock::new(0, 39));
        song.set_note(0, 1, NoteBlock::new(3, 0));
        song.set_note(4, 2, NoteBlock::new(1, 87));
        std::fs::write(&path, write_song_to_vec(&song).unwrap()).unwrap();

        let notes = list_notes(&path).unwrap();
        let summary: Vec<(u32, u32, &str)> = notes
            .iter()
            .map(|r| (r.note.tick, r.note.layer, r.key_name.as_str()))
            .collect();
        assert_eq!(summary, vec![(0, 1, "A0"), (4, 0, "C4"), (4, 2, "C8")]);
    }

    #[test]
    fn test_note_record_json_is_flat() {
        let record = NoteRecord::from(Note::new(5, 0, 40, 0));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["tick"], 5);
        assert_eq!(json["instrument"], 0);
        assert_eq!(json["keyName"], "C#4");
    }
}
