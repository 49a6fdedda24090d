//! Upload summary: the parts of a song the upload pipeline stores.

use serde::{Deserialize, Serialize};

use crate::error::SongError;
use crate::nbs::read_song;
use crate::note::Note;
use crate::song::Song;

/// Usage of one custom instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentUsage {
    /// Index among the custom instruments (0 = first custom instrument).
    pub id: u32,
    pub name: String,
    /// Number of notes played with this instrument.
    pub count: u32,
}

/// Metadata and flattened notes of an uploaded song.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongSummary {
    pub title: String,
    pub author: String,
    pub original_author: String,
    pub description: String,
    pub notes: Vec<Note>,
    pub instruments: Vec<InstrumentUsage>,
}

impl SongSummary {
    /// Summarize a decoded song. Songs without notes are rejected.
    pub fn from_song(song: &Song) -> Result<Self, SongError> {
        if song.length() == 0 {
            return Err(SongError::EmptySong);
        }

        let first_custom = song.first_custom_index();
        let notes = song.note_list();
        let instruments = song
            .custom_instruments
            .iter()
            .enumerate()
            .map(|(i, inst)| {
                let id = first_custom + i as u32;
                InstrumentUsage {
                    id: i as u32,
                    name: inst.name.clone(),
                    count: notes.iter().filter(|n| n.instrument == id).count() as u32,
                }
            })
            .collect();

        Ok(Self {
            title: song.name.clone(),
            author: song.author.clone(),
            original_author: song.original_author.clone(),
            description: song.description.clone(),
            notes,
            instruments,
        })
    }

    /// Decode and summarize the bytes of an uploaded `.nbs` file.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SongError> {
        Self::from_song(&read_song(bytes)?)
    }
}
