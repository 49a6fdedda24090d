//! Piano-roll rasterizer.
//!
//! Every note becomes one square cell: the instrument's tinted note block
//! sprite, optionally labelled with the key name. The same drawing code
//! runs against any [`Surface`]; the entry points below differ only in
//! where the pixels end up.

use nbw_song::NoteGrid;

use crate::assets::{CustomInstrumentStyle, ThumbnailAssets};
use crate::color::Color;
use crate::error::ThumbnailError;
use crate::surface::{present, BrowserSurface, OffscreenSurface, Surface};
use crate::viewport::Viewport;

/// Default thumbnail width in pixels.
pub const DEFAULT_IMG_WIDTH: u32 = 1280;

/// Default thumbnail height in pixels.
pub const DEFAULT_IMG_HEIGHT: u32 = 768;

/// Default background, a light gray.
pub const DEFAULT_BACKGROUND: Color = Color::rgb(240.0 / 255.0, 240.0 / 255.0, 240.0 / 255.0);

/// Backgrounds with an 8-bit luma below this get light grid lines.
pub const DARK_BACKGROUND_LUMA: f64 = 90.0;

/// Everything a render call needs besides the notes and assets.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawParams {
    pub viewport: Viewport,
    pub background: Color,
    /// Width of the rendered image.
    pub img_width: u32,
    /// Height of the rendered image.
    pub img_height: u32,
    /// Width of the display canvas, when it differs from `img_width`.
    pub canvas_width: Option<u32>,
    /// Draw key names inside the cells.
    pub key_labels: bool,
    /// Draw a vertical line at every column boundary.
    pub grid_lines: bool,
    pub custom_instruments: CustomInstrumentStyle,
}

impl Default for DrawParams {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            background: DEFAULT_BACKGROUND,
            img_width: DEFAULT_IMG_WIDTH,
            img_height: DEFAULT_IMG_HEIGHT,
            canvas_width: None,
            key_labels: true,
            grid_lines: false,
            custom_instruments: CustomInstrumentStyle::Fallback,
        }
    }
}

impl DrawParams {
    /// Reject parameters the rasterizer cannot work with.
    pub fn validate(&self) -> Result<(), ThumbnailError> {
        self.viewport.validate()?;
        if self.img_width == 0 || self.img_height == 0 {
            return Err(ThumbnailError::InvalidArgument(format!(
                "image must not be empty ({}x{})",
                self.img_width, self.img_height
            )));
        }
        if self.canvas_width == Some(0) {
            return Err(ThumbnailError::InvalidArgument(
                "canvas width must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Colour of the beat grid lines for this background.
    pub fn grid_line_color(&self) -> Color {
        if self.background.is_dark(DARK_BACKGROUND_LUMA) {
            Color::white().with_alpha(0.15)
        } else {
            Color::black().with_alpha(0.4)
        }
    }
}

/// Draw `notes` onto `surface`.
///
/// The whole surface is painted: background first, then grid lines, then
/// one cell per visible note. Notes before the viewport origin or past
/// the surface edge are skipped.
pub fn draw_notes<S: Surface + ?Sized>(
    surface: &mut S,
    notes: &NoteGrid,
    params: &DrawParams,
    assets: &ThumbnailAssets,
) -> Result<(), ThumbnailError> {
    params.viewport.validate()?;

    let (width, height) = (surface.width(), surface.height());
    let cell = params.viewport.cell_size();

    surface.fill(params.background);

    if params.grid_lines {
        let line = params.grid_line_color();
        for x in (0..width).step_by(cell as usize) {
            surface.fill_rect(x as i64, 0, 1, height, line);
        }
    }

    let label_scale = params.viewport.zoom_level / 2;
    let font = assets.font();
    let mut drawn = 0usize;

    for placed in params.viewport.visible_notes(notes, width, height) {
        let sprite = assets.sprite_for(placed.note.instrument, params.custom_instruments);
        surface.draw_sprite(sprite, placed.x, placed.y, cell, cell);

        if params.key_labels && label_scale > 0 {
            let text = placed.note.key_name();
            if font.text_width(&text, label_scale) + 2 <= cell {
                let half = (cell / 2) as i64;
                font.draw_text_centered(
                    surface,
                    &text,
                    placed.x + half,
                    placed.y + half,
                    label_scale,
                    Color::white(),
                );
            }
        }
        drawn += 1;
    }

    log::debug!(
        "drew {} of {} notes on {}x{} surface (cell {}px)",
        drawn,
        notes.len(),
        width,
        height,
        cell
    );
    Ok(())
}

/// Render into a new offscreen surface of `img_width x img_height`.
pub fn draw_notes_offscreen(
    notes: &NoteGrid,
    params: &DrawParams,
    assets: &ThumbnailAssets,
) -> Result<OffscreenSurface, ThumbnailError> {
    params.validate()?;
    let mut surface = OffscreenSurface::new(params.img_width, params.img_height)?;
    draw_notes(&mut surface, notes, params, assets)?;
    Ok(surface)
}

/// Render and encode as PNG.
pub fn draw_to_image(
    notes: &NoteGrid,
    params: &DrawParams,
    assets: &ThumbnailAssets,
) -> Result<Vec<u8>, ThumbnailError> {
    draw_notes_offscreen(notes, params, assets)?.encode_png()
}

/// Render onto a caller-owned canvas.
///
/// The image is rendered at `img_width x img_height` and copied onto the
/// canvas scaled by `canvas_width / img_width`. `canvas_width` defaults to
/// the canvas's own width.
pub fn draw_notes_to_canvas(
    canvas: &mut BrowserSurface<'_>,
    notes: &NoteGrid,
    params: &DrawParams,
    assets: &ThumbnailAssets,
) -> Result<(), ThumbnailError> {
    let canvas_width = params.canvas_width.unwrap_or(canvas.width());
    let rendered = draw_notes_offscreen(notes, params, assets)?.into_buffer();

    if canvas_width == params.img_width
        && canvas.width() == params.img_width
        && canvas.height() == params.img_height
    {
        present(&rendered, canvas);
        return Ok(());
    }

    // Scale to the requested display width first, then copy what fits.
    let display_height = (params.img_height as u64 * canvas_width as u64)
        .div_ceil(params.img_width as u64)
        .max(1) as u32;
    let mut display = OffscreenSurface::new(canvas_width, display_height)?;
    present(&rendered, &mut display);

    let buffer = display.into_buffer();
    for y in 0..canvas.height().min(buffer.height) {
        for x in 0..canvas.width().min(buffer.width) {
            canvas.put_pixel(x, y, buffer.get(x, y));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nbw_song::Note;

    fn params(zoom: u32) -> DrawParams {
        DrawParams {
            viewport: Viewport::new(0, 0, zoom).unwrap(),
            img_width: 64,
            img_height: 32,
            ..DrawParams::default()
        }
    }

    #[test]
    fn test_defaults() {
        let p = DrawParams::default();
        assert_eq!((p.img_width, p.img_height), (1280, 768));
        assert_eq!(p.viewport.zoom_level, 3);
        assert_eq!(p.background.to_hex(), "#f0f0f0");
        assert!(p.key_labels);
        assert!(!p.grid_lines);
    }

    #[test]
    fn test_zero_zoom_fails_fast() {
        let mut p = params(1);
        p.viewport.zoom_level = 0;
        let err = draw_notes_offscreen(&NoteGrid::default(), &p, &ThumbnailAssets::builtin());
        assert!(matches!(err, Err(ThumbnailError::InvalidArgument(_))));
    }

    #[test]
    fn test_zero_size_rejected() {
        let mut p = params(1);
        p.img_height = 0;
        assert!(draw_to_image(&NoteGrid::default(), &p, &ThumbnailAssets::builtin()).is_err());
    }

    #[test]
    fn test_grid_line_color_follows_background() {
        let mut p = params(1);
        assert_eq!(p.grid_line_color(), Color::black().with_alpha(0.4));
        p.background = Color::from_hex("#202020").unwrap();
        assert_eq!(p.grid_line_color(), Color::white().with_alpha(0.15));
    }

    #[test]
    fn test_grid_lines_every_cell() {
        let mut p = params(1);
        p.grid_lines = true;
        let surface =
            draw_notes_offscreen(&NoteGrid::default(), &p, &ThumbnailAssets::builtin()).unwrap();
        let bg = p.background.to_rgba8();
        for x in 0..64 {
            let on_line = x % 8 == 0;
            assert_eq!(surface.buffer().get_rgba8(x, 5) != bg, on_line, "column {}", x);
        }
    }

    #[test]
    fn test_note_is_drawn_in_its_cell() {
        let grid = NoteGrid::new([Note::new(1, 1, 39, 0)]);
        let surface = draw_notes_offscreen(&grid, &params(1), &ThumbnailAssets::builtin()).unwrap();
        let bg = DEFAULT_BACKGROUND.to_rgba8();
        let buffer = surface.buffer();

        assert_eq!(buffer.get_rgba8(7, 7), bg);
        assert_ne!(buffer.get_rgba8(8, 8), bg);
        assert_ne!(buffer.get_rgba8(15, 15), bg);
        assert_eq!(buffer.get_rgba8(16, 16), bg);
    }

    #[test]
    fn test_labels_drawn_only_when_they_fit() {
        let grid = NoteGrid::new([Note::new(0, 0, 39, 0)]);
        let assets = ThumbnailAssets::builtin();

        let mut p = params(4);
        let with = draw_notes_offscreen(&grid, &p, &assets).unwrap();
        p.key_labels = false;
        let without = draw_notes_offscreen(&grid, &p, &assets).unwrap();
        assert_ne!(with, without);

        // Zoom 1 cells are too small for text.
        let mut p = params(1);
        let with = draw_notes_offscreen(&grid, &p, &assets).unwrap();
        p.key_labels = false;
        let without = draw_notes_offscreen(&grid, &p, &assets).unwrap();
        assert_eq!(with, without);
    }

    #[test]
    fn test_extreme_keys_and_layers_render() {
        let grid = NoteGrid::new([
            Note::new(0, 0, i32::MAX, 0),
            Note::new(1, 0, i32::MIN, 3),
            Note::new(2, u32::MAX, 40, 0),
        ]);
        let surface = draw_notes_offscreen(&grid, &params(4), &ThumbnailAssets::builtin()).unwrap();
        let bg = DEFAULT_BACKGROUND.to_rgba8();
        assert_ne!(surface.buffer().get_rgba8(16, 16), bg);
        assert_ne!(surface.buffer().get_rgba8(48, 16), bg);
    }
}
