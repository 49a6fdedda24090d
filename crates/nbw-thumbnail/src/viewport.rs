//! Mapping from the tick x layer grid to image pixels.

use nbw_song::{GridRect, Note, NoteGrid};
use serde::{Deserialize, Serialize};

use crate::error::ThumbnailError;

/// Cell size in pixels at zoom level 1.
pub const BASE_CELL_SIZE: u32 = 8;

/// Smallest zoom level a thumbnail request may ask for.
pub const MIN_ZOOM_LEVEL: u32 = 1;

/// Largest zoom level a thumbnail request may ask for.
pub const MAX_ZOOM_LEVEL: u32 = 5;

pub const DEFAULT_ZOOM_LEVEL: u32 = 3;

/// The visible window of a song.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    /// Tick shown in the leftmost column.
    pub start_tick: u32,
    /// Layer shown in the top row.
    pub start_layer: u32,
    /// Pixels-per-cell multiplier. Must be positive.
    pub zoom_level: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            start_tick: 0,
            start_layer: 0,
            zoom_level: DEFAULT_ZOOM_LEVEL,
        }
    }
}

impl Viewport {
    pub fn new(start_tick: u32, start_layer: u32, zoom_level: u32) -> Result<Self, ThumbnailError> {
        let viewport = Self {
            start_tick,
            start_layer,
            zoom_level,
        };
        viewport.validate()?;
        Ok(viewport)
    }

    /// Reject a zero zoom level.
    pub fn validate(&self) -> Result<(), ThumbnailError> {
        if self.zoom_level == 0 {
            return Err(ThumbnailError::InvalidArgument(
                "zoom level must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Side length of one note cell in pixels.
    pub fn cell_size(&self) -> u32 {
        BASE_CELL_SIZE.saturating_mul(self.zoom_level)
    }

    /// Column and row of `note`, or `None` when it lies before the window.
    pub fn cell_of(&self, note: &Note) -> Option<(u32, u32)> {
        let col = note.tick.checked_sub(self.start_tick)?;
        let row = note.layer.checked_sub(self.start_layer)?;
        Some((col, row))
    }

    /// Top-left pixel of `note`'s cell.
    pub fn pixel_of(&self, note: &Note) -> Option<(i64, i64)> {
        let (col, row) = self.cell_of(note)?;
        let cell = self.cell_size() as i64;
        Some((col as i64 * cell, row as i64 * cell))
    }

    /// Cells touched by a `width x height` image, partial edge cells included.
    pub fn visible_rect(&self, width: u32, height: u32) -> Option<GridRect> {
        let cell = self.cell_size();
        if cell == 0 {
            return None;
        }
        GridRect::from_origin(
            self.start_tick,
            self.start_layer,
            width.div_ceil(cell),
            height.div_ceil(cell),
        )
    }

    /// Notes of `grid` that land on a `width x height` image.
    pub fn visible_notes<'a>(
        &self,
        grid: &'a NoteGrid,
        width: u32,
        height: u32,
    ) -> impl Iterator<Item = VisibleNote> + 'a {
        let viewport = *self;
        self.visible_rect(width, height)
            .into_iter()
            .flat_map(move |rect| grid.notes_in_rect(rect))
            .filter_map(move |note| viewport.place(note))
    }

    fn place(&self, note: &Note) -> Option<VisibleNote> {
        let (col, row) = self.cell_of(note)?;
        let cell = self.cell_size() as i64;
        Some(VisibleNote {
            note: *note,
            col,
            row,
            x: col as i64 * cell,
            y: row as i64 * cell,
        })
    }
}

/// A note placed on the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleNote {
    pub note: Note,
    pub col: u32,
    pub row: u32,
    /// Left edge of the cell in pixels.
    pub x: i64,
    /// Top edge of the cell in pixels.
    pub y: i64,
}

/// Place every note at or after the window origin. Only the lower bound
/// is checked; use [`Viewport::visible_notes`] to also drop notes past
/// the image edge.
pub fn window_notes<'a, I>(notes: I, viewport: &Viewport) -> impl Iterator<Item = VisibleNote> + 'a
where
    I: IntoIterator<Item = &'a Note>,
    I::IntoIter: 'a,
{
    let viewport = *viewport;
    notes.into_iter().filter_map(move |note| viewport.place(note))
}
