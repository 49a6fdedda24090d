//! `.nbs` decoder.

use std::io::{Cursor, Read};

use byteorder::{LittleEndian, ReadBytesExt};

use super::{pan_from_byte, CURRENT_VERSION, LEGACY_VANILLA_INSTRUMENTS};
use crate::error::SongError;
use crate::song::{CustomInstrument, Layer, LoopSettings, NoteBlock, Song};

/// Decode a song from the bytes of an `.nbs` file.
pub fn read_song(bytes: &[u8]) -> Result<Song, SongError> {
    let mut r = Cursor::new(bytes);
    let mut song = Song::new();

    let marker = r.read_i16::<LittleEndian>()?;
    if marker == 0 {
        song.version = r.read_u8()?;
        if song.version > CURRENT_VERSION {
            return Err(SongError::UnsupportedVersion(song.version));
        }
        song.vanilla_instrument_count = r.read_u8()?;
        if song.version >= 3 {
            // Declared length; recomputed from the notes.
            r.read_i16::<LittleEndian>()?;
        }
    } else {
        song.version = 0;
        song.vanilla_instrument_count = LEGACY_VANILLA_INSTRUMENTS;
    }
    let version = song.version;

    let layer_count = r.read_i16::<LittleEndian>()?;
    if layer_count < 0 {
        return Err(SongError::InvalidData(format!(
            "negative layer count {}",
            layer_count
        )));
    }

    song.name = read_string(&mut r)?;
    song.author = read_string(&mut r)?;
    song.original_author = read_string(&mut r)?;
    song.description = read_string(&mut r)?;
    song.tempo = r.read_i16::<LittleEndian>()? as f64 / 100.0;
    song.auto_save = r.read_u8()? != 0;
    song.auto_save_duration = r.read_u8()?;
    song.time_signature = r.read_u8()?;
    song.minutes_spent = read_counter(&mut r)?;
    song.left_clicks = read_counter(&mut r)?;
    song.right_clicks = read_counter(&mut r)?;
    song.blocks_added = read_counter(&mut r)?;
    song.blocks_removed = read_counter(&mut r)?;
    song.import_name = read_string(&mut r)?;

    if version >= 4 {
        song.looping = LoopSettings {
            enabled: r.read_u8()? != 0,
            max_count: r.read_u8()?,
            start_tick: r.read_i16::<LittleEndian>()?.max(0) as u16,
        };
    }

    song.layers = vec![Layer::default(); layer_count as usize];
    read_notes(&mut r, &mut song)?;

    for index in 0..layer_count as usize {
        let layer = song.layer_mut(index);
        layer.name = read_string(&mut r)?;
        if version >= 4 {
            layer.locked = r.read_u8()? != 0;
        }
        layer.volume = r.read_u8()?;
        if version >= 2 {
            layer.stereo = pan_from_byte(r.read_u8()?);
        }
    }

    // Some old files end right after the layer section.
    let custom_count = match r.read_u8() {
        Ok(count) => count,
        Err(_) if r.position() as usize == bytes.len() => 0,
        Err(e) => return Err(e.into()),
    };
    for _ in 0..custom_count {
        song.custom_instruments.push(CustomInstrument {
            name: read_string(&mut r)?,
            file: read_string(&mut r)?,
            key: r.read_u8()?,
            press_key: r.read_u8()? != 0,
        });
    }

    log::debug!(
        "decoded nbs v{}: {} layers, {} notes, {} custom instruments",
        version,
        song.layers.len(),
        song.note_count(),
        song.custom_instruments.len()
    );

    Ok(song)
}

/// Highest layer index a note may sit on; layer counts are stored as `i16`.
const MAX_LAYER_INDEX: i64 = i16::MAX as i64;

/// Read the note section: tick jumps, each followed by layer jumps.
fn read_notes(r: &mut Cursor<&[u8]>, song: &mut Song) -> Result<(), SongError> {
    let version = song.version;
    let mut tick: i64 = -1;

    loop {
        let tick_jump = r.read_i16::<LittleEndian>()?;
        if tick_jump == 0 {
            break;
        }
        tick += tick_jump as i64;
        if tick < 0 {
            return Err(SongError::InvalidData(format!("note at negative tick {}", tick)));
        }
        let note_tick = u32::try_from(tick)
            .map_err(|_| SongError::InvalidData(format!("tick {} out of range", tick)))?;

        let mut layer: i64 = -1;
        loop {
            let layer_jump = r.read_i16::<LittleEndian>()?;
            if layer_jump == 0 {
                break;
            }
            layer += layer_jump as i64;
            if layer < 0 {
                return Err(SongError::InvalidData(format!(
                    "note at negative layer {}",
                    layer
                )));
            }
            if layer > MAX_LAYER_INDEX {
                return Err(SongError::InvalidData(format!(
                    "note at layer {} past the last possible layer {}",
                    layer, MAX_LAYER_INDEX
                )));
            }

            let mut note = NoteBlock::new(r.read_u8()?, r.read_u8()?);
            if version >= 4 {
                note.velocity = r.read_u8()?;
                note.panning = pan_from_byte(r.read_u8()?);
                note.pitch = r.read_i16::<LittleEndian>()?;
            }
            song.set_note(note_tick, layer as usize, note);
        }
    }

    Ok(())
}

fn read_string(r: &mut Cursor<&[u8]>) -> Result<String, SongError> {
    let len = r.read_i32::<LittleEndian>()?;
    if len < 0 {
        return Err(SongError::InvalidData(format!("negative string length {}", len)));
    }
    let remaining = r.get_ref().len() as u64 - r.position().min(r.get_ref().len() as u64);
    if len as u64 > remaining {
        return Err(SongError::UnexpectedEof);
    }
    let mut buf = vec![0u8; len as usize];
    r.read_exact(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn read_counter(r: &mut Cursor<&[u8]>) -> Result<u32, SongError> {
    Ok(r.read_i32::<LittleEndian>()?.max(0) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodedError;
    use byteorder::WriteBytesExt;

    fn push_string(buf: &mut Vec<u8>, s: &str) {
        buf.write_i32::<LittleEndian>(s.len() as i32).unwrap();
        buf.extend_from_slice(s.as_bytes());
    }

    /// Header of a pre-versioned file with one layer.
    fn legacy_header() -> Vec<u8> {
        let mut buf = Vec::new();
        buf.write_i16::<LittleEndian>(12).unwrap(); // song length
        buf.write_i16::<LittleEndian>(1).unwrap(); // layer count
        push_string(&mut buf, "Old Song");
        push_string(&mut buf, "someone");
        push_string(&mut buf, "");
        push_string(&mut buf, "");
        buf.write_i16::<LittleEndian>(1000).unwrap();
        buf.extend_from_slice(&[0, 10, 4]);
        for _ in 0..5 {
            buf.write_i32::<LittleEndian>(0).unwrap();
        }
        push_string(&mut buf, "");
        buf
    }

    #[test]
    fn test_read_legacy_file() {
        let mut buf = legacy_header();
        // One note at tick 2, layer 0
        buf.write_i16::<LittleEndian>(3).unwrap();
        buf.write_i16::<LittleEndian>(1).unwrap();
        buf.extend_from_slice(&[4, 45]);
        buf.write_i16::<LittleEndian>(0).unwrap();
        buf.write_i16::<LittleEndian>(0).unwrap();
        // Layer info: name + volume, no stereo before v2
        push_string(&mut buf, "Melody");
        buf.push(80);

        let song = read_song(&buf).unwrap();
        assert_eq!(song.version, 0);
        assert_eq!(song.vanilla_instrument_count, LEGACY_VANILLA_INSTRUMENTS);
        assert_eq!(song.name, "Old Song");
        assert!((song.tempo - 10.0).abs() < 1e-9);
        assert_eq!(song.layers.len(), 1);
        assert_eq!(song.layers[0].name, "Melody");
        assert_eq!(song.layers[0].volume, 80);
        assert_eq!(song.layers[0].notes.get(&2), Some(&NoteBlock::new(4, 45)));
        assert!(song.custom_instruments.is_empty());
    }

    #[test]
    fn test_unsupported_version() {
        let buf = [0u8, 0, CURRENT_VERSION + 1, 16];
        let err = read_song(&buf).unwrap_err();
        assert!(matches!(err, SongError::UnsupportedVersion(v) if v == CURRENT_VERSION + 1));
    }

    #[test]
    fn test_truncated_file() {
        let buf = legacy_header();
        let err = read_song(&buf[..buf.len() - 3]).unwrap_err();
        assert!(matches!(err, SongError::UnexpectedEof));
    }

    #[test]
    fn test_string_length_past_end() {
        let mut buf = Vec::new();
        buf.write_i16::<LittleEndian>(12).unwrap();
        buf.write_i16::<LittleEndian>(1).unwrap();
        buf.write_i32::<LittleEndian>(1_000_000).unwrap();
        let err = read_song(&buf).unwrap_err();
        assert!(matches!(err, SongError::UnexpectedEof));
    }

    #[test]
    fn test_notes_beyond_declared_layers_are_kept() {
        let mut buf = legacy_header();
        buf.write_i16::<LittleEndian>(1).unwrap();
        buf.write_i16::<LittleEndian>(3).unwrap(); // layer 2, only 1 declared
        buf.extend_from_slice(&[0, 40]);
        buf.write_i16::<LittleEndian>(0).unwrap();
        buf.write_i16::<LittleEndian>(0).unwrap();
        push_string(&mut buf, "");
        buf.push(100);

        let song = read_song(&buf).unwrap();
        assert_eq!(song.layers.len(), 3);
        assert_eq!(song.layers[2].notes.len(), 1);
    }

    #[test]
    fn test_layer_jumps_past_layer_limit_rejected() {
        let mut buf = legacy_header();
        buf.write_i16::<LittleEndian>(1).unwrap();
        for _ in 0..3 {
            buf.write_i16::<LittleEndian>(i16::MAX).unwrap();
            buf.extend_from_slice(&[0, 40]);
        }
        buf.write_i16::<LittleEndian>(0).unwrap();
        buf.write_i16::<LittleEndian>(0).unwrap();

        let err = read_song(&buf).unwrap_err();
        assert!(matches!(err, SongError::InvalidData(_)));
        assert_eq!(err.code(), "SONG_004");
    }

    #[test]
    fn test_layer_limit_boundary() {
        let mut buf = legacy_header();
        buf.write_i16::<LittleEndian>(1).unwrap();
        buf.write_i16::<LittleEndian>(i16::MAX).unwrap(); // layer 32766
        buf.extend_from_slice(&[0, 40]);
        buf.write_i16::<LittleEndian>(2).unwrap(); // layer 32768
        buf.extend_from_slice(&[0, 40]);
        buf.write_i16::<LittleEndian>(0).unwrap();
        buf.write_i16::<LittleEndian>(0).unwrap();
        assert!(matches!(read_song(&buf), Err(SongError::InvalidData(_))));

        let mut buf = legacy_header();
        buf.write_i16::<LittleEndian>(1).unwrap();
        buf.write_i16::<LittleEndian>(i16::MAX).unwrap();
        buf.extend_from_slice(&[0, 40]);
        buf.write_i16::<LittleEndian>(1).unwrap(); // layer 32767
        buf.extend_from_slice(&[0, 40]);
        buf.write_i16::<LittleEndian>(0).unwrap();
        buf.write_i16::<LittleEndian>(0).unwrap();
        push_string(&mut buf, "");
        buf.push(100);

        let song = read_song(&buf).unwrap();
        assert_eq!(song.layers.len(), 32768);
        assert_eq!(song.note_count(), 2);
    }

    #[test]
    fn test_tick_past_u32_rejected() {
        let mut buf = legacy_header();
        // 131080 jumps of 32767 ticks overflow a u32
        for _ in 0..131_080 {
            buf.write_i16::<LittleEndian>(i16::MAX).unwrap();
            buf.write_i16::<LittleEndian>(0).unwrap();
        }
        buf.write_i16::<LittleEndian>(0).unwrap();

        let err = read_song(&buf).unwrap_err();
        assert!(matches!(err, SongError::InvalidData(ref msg) if msg.contains("out of range")));
    }
}
