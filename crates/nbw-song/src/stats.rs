//! Song statistics shown on song pages and used for compatibility checks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::song::Song;

/// Lowest key playable by a vanilla note block without pitch shifting (F#3).
pub const VANILLA_KEY_MIN: u8 = 33;

/// Highest key playable by a vanilla note block without pitch shifting (F#5).
pub const VANILLA_KEY_MAX: u8 = 57;

/// Summary statistics of a song.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongStats {
    pub midi_file_name: String,
    pub note_count: u32,
    /// One past the last populated tick.
    pub tick_count: u32,
    /// One past the last populated layer; empty trailing layers are ignored.
    pub layer_count: u32,
    /// Starting tempo in ticks per second.
    pub tempo: f64,
    /// Minimum and maximum tempo when the song contains tempo changes.
    pub tempo_range: Option<[f64; 2]>,
    pub time_signature: u8,
    /// Playback length in seconds, honoring tempo changes.
    pub duration: f64,
    #[serde(rename = "loop")]
    pub loop_enabled: bool,
    pub loop_start_tick: u32,
    pub minutes_spent: u32,
    /// Vanilla instruments with at least one note.
    pub vanilla_instrument_count: u32,
    /// Custom instruments with at least one note.
    pub custom_instrument_count: u32,
    pub uses_custom_instruments: bool,
    pub first_custom_instrument_index: u32,
    /// Notes outside the two-octave vanilla range.
    pub notes_outside_octave_range: u32,
    /// Playable in vanilla Minecraft without resource packs or pitch tricks.
    pub compatible: bool,
    /// Note count per instrument id.
    pub instrument_note_counts: Vec<u32>,
}

impl SongStats {
    /// Compute statistics for a song.
    pub fn from_song(song: &Song) -> Self {
        let first_custom = song.first_custom_index();
        let mut instrument_note_counts = vec![0u32; song.instrument_count() as usize];
        let mut note_count = 0u32;
        let mut last_tick: Option<u32> = None;
        let mut last_layer: Option<u32> = None;
        let mut notes_outside_octave_range = 0u32;

        for note in song.notes() {
            note_count += 1;
            last_tick = Some(last_tick.map_or(note.tick, |t| t.max(note.tick)));
            last_layer = Some(last_layer.map_or(note.layer, |l| l.max(note.layer)));

            if note.key < VANILLA_KEY_MIN as i32 || note.key > VANILLA_KEY_MAX as i32 {
                notes_outside_octave_range += 1;
            }

            let id = note.instrument as usize;
            if instrument_note_counts.len() <= id {
                instrument_note_counts.resize(id + 1, 0);
            }
            instrument_note_counts[id] += 1;
        }

        let tick_count = last_tick.map_or(0, |t| t.saturating_add(1));
        let layer_count = last_layer.map_or(0, |l| l.saturating_add(1));

        let split = (first_custom as usize).min(instrument_note_counts.len());
        let (vanilla, custom) = instrument_note_counts.split_at(split);
        let vanilla_instrument_count = vanilla.iter().filter(|&&c| c > 0).count() as u32;
        let custom_instrument_count = custom.iter().filter(|&&c| c > 0).count() as u32;
        let uses_custom_instruments = custom_instrument_count > 0;

        let segments = tempo_segments(song);
        let tempo_range = if segments.len() > 1 {
            let min = segments.values().copied().fold(f64::INFINITY, f64::min);
            let max = segments.values().copied().fold(f64::NEG_INFINITY, f64::max);
            Some([min, max])
        } else {
            None
        };
        let duration = duration_seconds(&segments, tick_count);

        Self {
            midi_file_name: song.import_name.clone(),
            note_count,
            tick_count,
            layer_count,
            tempo: song.tempo,
            tempo_range,
            time_signature: song.time_signature,
            duration,
            loop_enabled: song.looping.enabled,
            loop_start_tick: song.looping.start_tick as u32,
            minutes_spent: song.minutes_spent,
            vanilla_instrument_count,
            custom_instrument_count,
            uses_custom_instruments,
            first_custom_instrument_index: first_custom,
            notes_outside_octave_range,
            compatible: notes_outside_octave_range == 0 && !uses_custom_instruments,
            instrument_note_counts,
        }
    }
}

/// Tempo in effect from each tick where it changes.
///
/// A tempo changer's pitch encodes BPM, so `|pitch| / 15` is ticks per
/// second. When several tempo changers share a tick the bottom-most
/// (highest-index) layer wins. Tick 0 always has an entry.
pub fn tempo_segments(song: &Song) -> BTreeMap<u32, f64> {
    let changers = song.tempo_changer_ids();
    let mut segments = BTreeMap::new();

    if !changers.is_empty() {
        for layer in song.layers.iter().rev() {
            for (&tick, note) in &layer.notes {
                if !changers.contains(&(note.instrument as u32)) {
                    continue;
                }
                segments
                    .entry(tick)
                    .or_insert((note.pitch as f64).abs() / 15.0);
            }
        }
    }

    segments.entry(0).or_insert(song.tempo);
    segments
}

/// Playback length in seconds of `tick_count` ticks under `segments`.
fn duration_seconds(segments: &BTreeMap<u32, f64>, tick_count: u32) -> f64 {
    let mut duration = 0.0;
    let mut iter = segments.iter().peekable();

    while let Some((&start, &tempo)) = iter.next() {
        if start >= tick_count {
            break;
        }
        let end = iter
            .peek()
            .map_or(tick_count, |(&next, _)| next.min(tick_count));
        if tempo > 0.0 {
            duration += (end - start) as f64 / tempo;
        }
    }

    duration
}
