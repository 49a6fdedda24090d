//! `.nbs` encoder. Always writes the current format version.

use std::collections::BTreeMap;
use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};

use super::{pan_to_byte, CURRENT_VERSION};
use crate::error::SongError;
use crate::song::{NoteBlock, Song};

/// Encode a song in the current `.nbs` format.
pub fn write_song<W: Write>(song: &Song, writer: &mut W) -> Result<(), SongError> {
    let layer_count = to_i16(song.layers.len() as i64, "layer count")?;
    // Informational only; readers recompute it from the notes.
    let length = song.length().min(i16::MAX as u32) as i16;

    writer.write_i16::<LittleEndian>(0)?;
    writer.write_u8(CURRENT_VERSION)?;
    writer.write_u8(song.vanilla_instrument_count)?;
    writer.write_i16::<LittleEndian>(length)?;
    writer.write_i16::<LittleEndian>(layer_count)?;

    write_string(writer, &song.name)?;
    write_string(writer, &song.author)?;
    write_string(writer, &song.original_author)?;
    write_string(writer, &song.description)?;
    writer.write_i16::<LittleEndian>((song.tempo * 100.0).round() as i16)?;
    writer.write_u8(song.auto_save as u8)?;
    writer.write_u8(song.auto_save_duration)?;
    writer.write_u8(song.time_signature)?;
    for counter in [
        song.minutes_spent,
        song.left_clicks,
        song.right_clicks,
        song.blocks_added,
        song.blocks_removed,
    ] {
        writer.write_i32::<LittleEndian>(counter.min(i32::MAX as u32) as i32)?;
    }
    write_string(writer, &song.import_name)?;

    writer.write_u8(song.looping.enabled as u8)?;
    writer.write_u8(song.looping.max_count)?;
    writer.write_i16::<LittleEndian>(song.looping.start_tick.min(i16::MAX as u16) as i16)?;

    write_notes(writer, song)?;

    for layer in &song.layers {
        write_string(writer, &layer.name)?;
        writer.write_u8(layer.locked as u8)?;
        writer.write_u8(layer.volume)?;
        writer.write_u8(pan_to_byte(layer.stereo))?;
    }

    let custom_count = u8::try_from(song.custom_instruments.len()).map_err(|_| {
        SongError::InvalidData(format!(
            "{} custom instruments exceed the format limit of 255",
            song.custom_instruments.len()
        ))
    })?;
    writer.write_u8(custom_count)?;
    for inst in &song.custom_instruments {
        write_string(writer, &inst.name)?;
        write_string(writer, &inst.file)?;
        writer.write_u8(inst.key)?;
        writer.write_u8(inst.press_key as u8)?;
    }

    Ok(())
}

/// Encode a song into a new byte vector.
pub fn write_song_to_vec(song: &Song) -> Result<Vec<u8>, SongError> {
    let mut data = Vec::new();
    write_song(song, &mut data)?;
    Ok(data)
}

fn write_notes<W: Write>(writer: &mut W, song: &Song) -> Result<(), SongError> {
    // Regroup by tick; layer order within a tick is preserved.
    let mut by_tick: BTreeMap<u32, Vec<(usize, &NoteBlock)>> = BTreeMap::new();
    for (layer_id, layer) in song.layers.iter().enumerate() {
        for (&tick, note) in &layer.notes {
            by_tick.entry(tick).or_default().push((layer_id, note));
        }
    }

    let mut prev_tick: i64 = -1;
    for (tick, notes) in by_tick {
        writer.write_i16::<LittleEndian>(to_i16(tick as i64 - prev_tick, "tick jump")?)?;
        prev_tick = tick as i64;

        let mut prev_layer: i64 = -1;
        for (layer_id, note) in notes {
            writer.write_i16::<LittleEndian>(to_i16(layer_id as i64 - prev_layer, "layer jump")?)?;
            prev_layer = layer_id as i64;

            writer.write_u8(note.instrument)?;
            writer.write_u8(note.key)?;
            writer.write_u8(note.velocity)?;
            writer.write_u8(pan_to_byte(note.panning))?;
            writer.write_i16::<LittleEndian>(note.pitch)?;
        }
        writer.write_i16::<LittleEndian>(0)?;
    }
    writer.write_i16::<LittleEndian>(0)?;

    Ok(())
}

fn write_string<W: Write>(writer: &mut W, s: &str) -> Result<(), SongError> {
    writer.write_i32::<LittleEndian>(s.len() as i32)?;
    writer.write_all(s.as_bytes())?;
    Ok(())
}

fn to_i16(value: i64, what: &str) -> Result<i16, SongError> {
    i16::try_from(value)
        .map_err(|_| SongError::InvalidData(format!("{} {} does not fit the format", what, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nbs::read_song;

    #[test]
    fn test_empty_song_roundtrip() {
        let song = Song::new();
        let data = write_song_to_vec(&song).unwrap();
        let decoded = read_song(&data).unwrap();
        assert_eq!(decoded, song);
    }

    #[test]
    fn test_header_starts_with_version_marker() {
        let data = write_song_to_vec(&Song::new()).unwrap();
        assert_eq!(&data[..4], &[0, 0, CURRENT_VERSION, 16]);
    }

    #[test]
    fn test_tick_gap_too_large() {
        let mut song = Song::new();
        song.set_note(0, 0, NoteBlock::new(0, 40));
        song.set_note(40_000, 0, NoteBlock::new(0, 40));
        let err = write_song_to_vec(&song).unwrap_err();
        assert!(matches!(err, SongError::InvalidData(_)));
    }

    #[test]
    fn test_long_song_clamps_declared_length() {
        let mut song = Song::new();
        for tick in [0, 30_000, 60_000] {
            song.set_note(tick, 0, NoteBlock::new(0, 40));
        }
        let data = write_song_to_vec(&song).unwrap();
        assert_eq!(i16::from_le_bytes([data[4], data[5]]), i16::MAX);

        let decoded = read_song(&data).unwrap();
        assert_eq!(decoded.length(), 60_001);
        assert_eq!(decoded, song);
    }
}
