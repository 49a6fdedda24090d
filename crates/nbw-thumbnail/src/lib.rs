//! Note Block World thumbnail renderer
//!
//! Renders a song's notes as a piano roll: one square cell per note,
//! tinted by instrument, positioned by tick (x) and layer (y). Output is
//! either PNG bytes (server side) or pixels drawn into a caller-owned
//! RGBA canvas (browser side).
//!
//! # Example
//!
//! ```
//! use nbw_song::{NoteBlock, NoteGrid, Song};
//! use nbw_thumbnail::{draw_to_image, ThumbnailAssets, ThumbnailData};
//!
//! let mut song = Song::new();
//! song.set_note(5, 0, NoteBlock::new(0, 40));
//!
//! let assets = ThumbnailAssets::builtin();
//! let params = ThumbnailData::default().to_draw_params(320, 192).unwrap();
//! let png = draw_to_image(&NoteGrid::from_song(&song), &params, &assets).unwrap();
//! assert_eq!(&png[1..4], b"PNG");
//! ```
//!
//! # Determinism
//!
//! - Same notes + same parameters = byte-identical PNG
//! - Sprites are sampled nearest-neighbour; no smoothing
//! - PNG encoding uses fixed compression settings
//!
//! [`ThumbnailAssets`] holds the tinted sprites and the label font. Build
//! it once and share it between render calls, across threads if needed.

pub mod assets;
pub mod buffer;
pub mod color;
pub mod draw;
pub mod error;
pub mod font;
pub mod png;
pub mod request;
pub mod sprite;
pub mod surface;
pub mod viewport;

pub use assets::{instrument_color, CustomInstrumentStyle, ThumbnailAssets, INSTRUMENT_COLORS};
pub use buffer::PixelBuffer;
pub use color::{BlendMode, Color};
pub use draw::{draw_notes, draw_notes_offscreen, draw_notes_to_canvas, draw_to_image, DrawParams};
pub use error::ThumbnailError;
pub use font::KeyFont;
pub use crate::png::{PngConfig, PngError};
pub use request::{resolve_background, BackgroundPreset, ThumbnailData, BACKGROUND_PRESETS};
pub use sprite::Sprite;
pub use surface::{BrowserSurface, OffscreenSurface, Surface};
pub use viewport::{Viewport, VisibleNote, BASE_CELL_SIZE, DEFAULT_ZOOM_LEVEL, MAX_ZOOM_LEVEL, MIN_ZOOM_LEVEL};
