//! In-memory song model.
//!
//! A [`Song`] is an ordered list of [`Layer`]s, each holding at most one
//! [`NoteBlock`] per tick, plus the header metadata stored in `.nbs` files.

use std::collections::BTreeMap;

use crate::note::Note;

/// Number of vanilla instruments in current Minecraft versions.
pub const DEFAULT_VANILLA_INSTRUMENTS: u8 = 16;

/// Name custom instruments use to mark tempo-changing note blocks.
pub const TEMPO_CHANGER_NAME: &str = "Tempo Changer";

/// A note as stored inside a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteBlock {
    /// Instrument id.
    pub instrument: u8,
    /// Piano key (0 = A0, 87 = C8).
    pub key: u8,
    /// Velocity in percent (0..=100).
    pub velocity: u8,
    /// Stereo panning (-100 = left, 0 = center, 100 = right).
    pub panning: i8,
    /// Fine pitch in cents.
    pub pitch: i16,
}

impl NoteBlock {
    /// Note block with default velocity, panning and pitch.
    pub const fn new(instrument: u8, key: u8) -> Self {
        Self {
            instrument,
            key,
            velocity: 100,
            panning: 0,
            pitch: 0,
        }
    }
}

/// A horizontal track of the song.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    pub name: String,
    pub locked: bool,
    /// Volume in percent (0..=100).
    pub volume: u8,
    /// Stereo offset (-100..=100).
    pub stereo: i8,
    /// Notes keyed by tick.
    pub notes: BTreeMap<u32, NoteBlock>,
}

impl Default for Layer {
    fn default() -> Self {
        Self {
            name: String::new(),
            locked: false,
            volume: 100,
            stereo: 0,
            notes: BTreeMap::new(),
        }
    }
}

impl Layer {
    /// Place a note, replacing whatever was at that tick.
    pub fn set_note(&mut self, tick: u32, note: NoteBlock) -> Option<NoteBlock> {
        self.notes.insert(tick, note)
    }
}

/// A user-supplied instrument sound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomInstrument {
    pub name: String,
    /// Sound file path, relative to the Note Block Studio sounds folder.
    pub file: String,
    /// Key the sound file is pitched at.
    pub key: u8,
    /// Whether Note Block Studio presses the piano key on playback.
    pub press_key: bool,
}

/// Loop playback settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoopSettings {
    pub enabled: bool,
    /// 0 loops forever.
    pub max_count: u8,
    pub start_tick: u16,
}

/// A complete note block song.
#[derive(Debug, Clone, PartialEq)]
pub struct Song {
    /// NBS format version the song was read from.
    pub version: u8,
    /// Number of built-in instruments; custom instrument ids start here.
    pub vanilla_instrument_count: u8,
    pub name: String,
    pub author: String,
    pub original_author: String,
    pub description: String,
    /// Playback speed in ticks per second.
    pub tempo: f64,
    pub auto_save: bool,
    /// Auto-save interval in minutes.
    pub auto_save_duration: u8,
    /// Beats per bar.
    pub time_signature: u8,
    pub minutes_spent: u32,
    pub left_clicks: u32,
    pub right_clicks: u32,
    pub blocks_added: u32,
    pub blocks_removed: u32,
    /// Name of the MIDI or schematic file the song was imported from.
    pub import_name: String,
    pub looping: LoopSettings,
    pub layers: Vec<Layer>,
    pub custom_instruments: Vec<CustomInstrument>,
}

impl Default for Song {
    fn default() -> Self {
        Self {
            version: crate::nbs::CURRENT_VERSION,
            vanilla_instrument_count: DEFAULT_VANILLA_INSTRUMENTS,
            name: String::new(),
            author: String::new(),
            original_author: String::new(),
            description: String::new(),
            tempo: 10.0,
            auto_save: false,
            auto_save_duration: 10,
            time_signature: 4,
            minutes_spent: 0,
            left_clicks: 0,
            right_clicks: 0,
            blocks_added: 0,
            blocks_removed: 0,
            import_name: String::new(),
            looping: LoopSettings::default(),
            layers: Vec::new(),
            custom_instruments: Vec::new(),
        }
    }
}

impl Song {
    /// Create an empty song with default header values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a layer, growing the layer list as needed.
    pub fn layer_mut(&mut self, index: usize) -> &mut Layer {
        if self.layers.len() <= index {
            self.layers.resize_with(index + 1, Layer::default);
        }
        &mut self.layers[index]
    }

    /// Place a note block at `(tick, layer)`.
    pub fn set_note(&mut self, tick: u32, layer: usize, note: NoteBlock) -> Option<NoteBlock> {
        self.layer_mut(layer).set_note(tick, note)
    }

    /// Iterate every note in the song, layer by layer in tick order.
    pub fn notes(&self) -> impl Iterator<Item = Note> + '_ {
        self.layers
            .iter()
            .enumerate()
            .flat_map(|(layer_id, layer)| {
                layer.notes.iter().map(move |(&tick, block)| Note {
                    tick,
                    layer: layer_id as u32,
                    key: block.key as i32,
                    instrument: block.instrument as u32,
                })
            })
    }

    /// Collect every note into a flat list.
    pub fn note_list(&self) -> Vec<Note> {
        self.notes().collect()
    }

    /// Total number of notes.
    pub fn note_count(&self) -> usize {
        self.layers.iter().map(|l| l.notes.len()).sum()
    }

    /// Highest populated tick, if any.
    pub fn last_tick(&self) -> Option<u32> {
        self.layers
            .iter()
            .filter_map(|l| l.notes.keys().next_back().copied())
            .max()
    }

    /// Length in ticks: one past the last populated tick, saturating at
    /// `u32::MAX`.
    pub fn length(&self) -> u32 {
        self.last_tick().map_or(0, |t| t.saturating_add(1))
    }

    /// Id of the first custom instrument.
    pub fn first_custom_index(&self) -> u32 {
        self.vanilla_instrument_count as u32
    }

    /// Number of vanilla plus custom instruments.
    pub fn instrument_count(&self) -> u32 {
        self.first_custom_index() + self.custom_instruments.len() as u32
    }

    /// Instrument ids of custom instruments named "Tempo Changer".
    pub fn tempo_changer_ids(&self) -> Vec<u32> {
        self.custom_instruments
            .iter()
            .enumerate()
            .filter(|(_, inst)| inst.name == TEMPO_CHANGER_NAME)
            .map(|(i, _)| self.first_custom_index() + i as u32)
            .collect()
    }
}
