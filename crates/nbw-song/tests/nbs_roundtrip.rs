//! Integration tests for the `.nbs` codec: full-featured songs survive a
//! write/read cycle and decoded songs feed the note index and statistics.

use nbw_song::{
    read_song, write_song_to_vec, CustomInstrument, GridRect, LoopSettings, NoteBlock, NoteGrid,
    Song, SongStats, SongSummary,
};
use pretty_assertions::assert_eq;

fn full_song() -> Song {
    let mut song = Song::new();
    song.name = "Test Song".into();
    song.author = "tester".into();
    song.original_author = "Composer".into();
    song.description = "A song with every header field set".into();
    song.tempo = 12.5;
    song.auto_save = true;
    song.auto_save_duration = 5;
    song.time_signature = 3;
    song.minutes_spent = 42;
    song.left_clicks = 1000;
    song.right_clicks = 12;
    song.blocks_added = 900;
    song.blocks_removed = 100;
    song.import_name = "song.mid".into();
    song.looping = LoopSettings {
        enabled: true,
        max_count: 2,
        start_tick: 8,
    };

    let mut accented = NoteBlock::new(3, 50);
    accented.velocity = 60;
    accented.panning = -40;
    accented.pitch = -25;

    song.set_note(0, 0, NoteBlock::new(0, 45));
    song.set_note(0, 2, accented);
    song.set_note(7, 1, NoteBlock::new(16, 33));
    song.set_note(300, 0, NoteBlock::new(15, 87));

    song.layers[0].name = "Lead".into();
    song.layers[1].locked = true;
    song.layers[1].volume = 55;
    song.layers[2].stereo = 30;

    song.custom_instruments.push(CustomInstrument {
        name: "Synth".into(),
        file: "custom/synth.ogg".into(),
        key: 39,
        press_key: true,
    });
    song
}

#[test]
fn test_full_song_roundtrip() {
    let song = full_song();
    let bytes = write_song_to_vec(&song).unwrap();
    let decoded = read_song(&bytes).unwrap();
    assert_eq!(decoded, song);
}

#[test]
fn test_roundtrip_is_byte_stable() {
    let bytes = write_song_to_vec(&full_song()).unwrap();
    let again = write_song_to_vec(&read_song(&bytes).unwrap()).unwrap();
    assert_eq!(bytes, again);
}

#[test]
fn test_decoded_song_feeds_grid() {
    let bytes = write_song_to_vec(&full_song()).unwrap();
    let song = read_song(&bytes).unwrap();
    let grid = NoteGrid::from_song(&song);

    assert_eq!(grid.len(), 4);
    assert_eq!(grid.max_tick(), Some(300));
    assert_eq!(grid.max_layer(), Some(2));

    let rect = GridRect::from_origin(0, 0, 8, 3).unwrap();
    let ticks: Vec<u32> = grid.notes_in_rect(rect).map(|n| n.tick).collect();
    assert_eq!(ticks, vec![0, 7, 0]);
}

#[test]
fn test_decoded_song_stats_and_summary() {
    let bytes = write_song_to_vec(&full_song()).unwrap();

    let stats = SongStats::from_song(&read_song(&bytes).unwrap());
    assert_eq!(stats.note_count, 4);
    assert_eq!(stats.tick_count, 301);
    assert_eq!(stats.layer_count, 3);
    assert_eq!(stats.midi_file_name, "song.mid");
    assert!(stats.loop_enabled);
    assert_eq!(stats.loop_start_tick, 8);
    assert!(stats.uses_custom_instruments);

    let summary = SongSummary::from_bytes(&bytes).unwrap();
    assert_eq!(summary.original_author, "Composer");
    assert_eq!(summary.instruments.len(), 1);
    assert_eq!(summary.instruments[0].count, 1);
}
