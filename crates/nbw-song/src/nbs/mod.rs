//! Open Note Block Studio (`.nbs`) file format.
//!
//! All integers are little-endian. Strings are an `i32` byte length
//! followed by the bytes. Files written before version 1 start with the
//! song length instead of a zero marker and carry no version byte.
//!
//! Version differences handled here:
//! - v1+: zero marker, version byte, vanilla instrument count
//! - v2+: per-layer stereo
//! - v3+: song length in the header
//! - v4+: loop settings, per-note velocity/panning/pitch, layer lock

mod reader;
mod writer;

pub use reader::read_song;
pub use writer::{write_song, write_song_to_vec};

/// Newest format version this crate reads and the version it writes.
pub const CURRENT_VERSION: u8 = 5;

/// Vanilla instrument count implied by pre-versioned files.
pub const LEGACY_VANILLA_INSTRUMENTS: u8 = 10;

/// Panning and stereo are stored as `0..=200` with 100 at center.
const PAN_CENTER: i16 = 100;

fn pan_from_byte(byte: u8) -> i8 {
    (byte as i16 - PAN_CENTER).clamp(-100, 100) as i8
}

fn pan_to_byte(pan: i8) -> u8 {
    (pan as i16 + PAN_CENTER).clamp(0, 200) as u8
}
