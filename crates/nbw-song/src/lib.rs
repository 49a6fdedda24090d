//! Note Block World song library
//!
//! This crate provides the song model, the Open Note Block Studio (`.nbs`)
//! codec, note extraction and song statistics used by the Note Block World
//! upload pipeline and thumbnail renderer.
//!
//! # Example
//!
//! ```
//! use nbw_song::{read_song, write_song_to_vec, NoteBlock, NoteGrid, Song, GridRect};
//!
//! let mut song = Song::new();
//! song.name = "Demo".into();
//! song.set_note(5, 0, NoteBlock::new(0, 40));
//!
//! let bytes = write_song_to_vec(&song).unwrap();
//! let decoded = read_song(&bytes).unwrap();
//!
//! let grid = NoteGrid::from_song(&decoded);
//! let rect = GridRect::from_origin(0, 0, 16, 4).unwrap();
//! assert_eq!(grid.notes_in_rect(rect).count(), 1);
//! ```
//!
//! # Modules
//!
//! - [`song`]: Song, layer and note block types
//! - [`note`]: Flat note records and key names
//! - [`grid`]: Spatial note index for viewport queries
//! - [`nbs`]: `.nbs` reader and writer
//! - [`stats`]: Song statistics
//! - [`summary`]: Upload summary
//! - [`error`]: Error types

pub mod error;
pub mod grid;
pub mod nbs;
pub mod note;
pub mod song;
pub mod stats;
pub mod summary;

pub use error::{CodedError, SongError};
pub use grid::{GridRect, NoteGrid};
pub use nbs::{read_song, write_song, write_song_to_vec};
pub use note::{key_name, Note};
pub use song::{CustomInstrument, Layer, LoopSettings, NoteBlock, Song};
pub use stats::SongStats;
pub use summary::{InstrumentUsage, SongSummary};
