//! Flat note records extracted from a song.

use serde::{Deserialize, Serialize};

/// Pitch class names, starting at C.
const PITCH_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// A single note event placed on the tick x layer grid.
///
/// This is the flattened form handed to the thumbnail renderer: the layer
/// a note lives in becomes a field instead of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Note {
    /// Time slot.
    pub tick: u32,
    /// Vertical track index.
    pub layer: u32,
    /// Piano key, 0 = A0 and 87 = C8.
    pub key: i32,
    /// Instrument id. Ids at or above the song's first custom index refer
    /// to custom instruments.
    pub instrument: u32,
}

impl Note {
    /// Create a note.
    pub const fn new(tick: u32, layer: u32, key: i32, instrument: u32) -> Self {
        Self {
            tick,
            layer,
            key,
            instrument,
        }
    }

    /// Human-readable key name, e.g. `"C#4"`.
    pub fn key_name(&self) -> String {
        key_name(self.key)
    }
}

/// Convert a piano key index to its name and octave.
///
/// Key 0 is A0, key 3 is C1 and key 87 is C8. Keys outside the 88-key
/// range keep counting octaves in both directions.
pub fn key_name(key: i32) -> String {
    let semitone = key as i64 + 9;
    let octave = semitone.div_euclid(12);
    let name = PITCH_NAMES[semitone.rem_euclid(12) as usize];
    format!("{}{}", name, octave)
}
