//! Drawing surfaces.
//!
//! The rasterizer draws through the [`Surface`] trait so that the same
//! drawing code can target an owned offscreen buffer (server side, PNG
//! output) or a caller-owned RGBA canvas (browser side, drawn in place).

use crate::buffer::PixelBuffer;
use crate::color::{BlendMode, Color};
use crate::error::ThumbnailError;
use crate::png::{write_rgba_to_vec, write_rgba_to_vec_with_hash, PngConfig};
use crate::sprite::Sprite;

/// Pixel-level drawing primitives shared by every backend.
pub trait Surface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Pixel at `(x, y)`. Coordinates must be inside the surface.
    fn pixel(&self, x: u32, y: u32) -> Color;

    /// Overwrite the pixel at `(x, y)`. Coordinates must be inside the surface.
    fn put_pixel(&mut self, x: u32, y: u32, color: Color);

    /// Overwrite every pixel.
    fn fill(&mut self, color: Color) {
        for y in 0..self.height() {
            for x in 0..self.width() {
                self.put_pixel(x, y, color);
            }
        }
    }

    /// Fill a rectangle, clipped to the surface. Translucent colors are
    /// composited source-over.
    fn fill_rect(&mut self, x: i64, y: i64, w: u32, h: u32, color: Color) {
        let Some((x0, y0, x1, y1)) = clip(self.width(), self.height(), x, y, w, h) else {
            return;
        };
        for py in y0..y1 {
            for px in x0..x1 {
                if color.a >= 1.0 {
                    self.put_pixel(px, py, color);
                } else {
                    let dst = self.pixel(px, py);
                    self.put_pixel(px, py, BlendMode::Normal.blend(&dst, &color, 1.0));
                }
            }
        }
    }

    /// Draw `sprite` scaled to `w x h` with its top-left corner at
    /// `(x, y)`, nearest-neighbour, clipped to the surface.
    fn draw_sprite(&mut self, sprite: &Sprite, x: i64, y: i64, w: u32, h: u32) {
        let Some((x0, y0, x1, y1)) = clip(self.width(), self.height(), x, y, w, h) else {
            return;
        };
        for py in y0..y1 {
            let dy = (py as i64 - y) as u32;
            for px in x0..x1 {
                let dx = (px as i64 - x) as u32;
                let src = sprite.sample_scaled(dx, dy, w, h);
                if src.a >= 1.0 {
                    self.put_pixel(px, py, src);
                } else if src.a > 0.0 {
                    let dst = self.pixel(px, py);
                    self.put_pixel(px, py, BlendMode::Normal.blend(&dst, &src, 1.0));
                }
            }
        }
    }
}

/// Intersect a rectangle with a `width x height` surface.
///
/// Returns the half-open pixel range `(x0, y0, x1, y1)`, or `None` when
/// nothing is left.
fn clip(width: u32, height: u32, x: i64, y: i64, w: u32, h: u32) -> Option<(u32, u32, u32, u32)> {
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + w as i64).min(width as i64);
    let y1 = (y + h as i64).min(height as i64);
    if x0 >= x1 || y0 >= y1 {
        return None;
    }
    Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
}

/// A surface that owns its pixels. Used for headless rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffscreenSurface {
    buffer: PixelBuffer,
}

impl OffscreenSurface {
    /// Create a transparent surface.
    pub fn new(width: u32, height: u32) -> Result<Self, ThumbnailError> {
        if width == 0 || height == 0 {
            return Err(ThumbnailError::InvalidArgument(format!(
                "surface must not be empty ({}x{})",
                width, height
            )));
        }
        Ok(Self {
            buffer: PixelBuffer::new_transparent(width, height),
        })
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn into_buffer(self) -> PixelBuffer {
        self.buffer
    }

    /// Encode the surface as PNG with the default deterministic settings.
    pub fn encode_png(&self) -> Result<Vec<u8>, ThumbnailError> {
        self.encode_png_with(&PngConfig::default())
    }

    /// Encode the surface as PNG.
    pub fn encode_png_with(&self, config: &PngConfig) -> Result<Vec<u8>, ThumbnailError> {
        write_rgba_to_vec(&self.buffer, config).map_err(ThumbnailError::Encoding)
    }

    /// Encode the surface as PNG and return the BLAKE3 hash of the bytes.
    pub fn encode_png_with_hash(&self) -> Result<(Vec<u8>, String), ThumbnailError> {
        write_rgba_to_vec_with_hash(&self.buffer, &PngConfig::default())
            .map_err(ThumbnailError::Encoding)
    }
}

impl Surface for OffscreenSurface {
    fn width(&self) -> u32 {
        self.buffer.width
    }

    fn height(&self) -> u32 {
        self.buffer.height
    }

    fn pixel(&self, x: u32, y: u32) -> Color {
        self.buffer.get(x, y)
    }

    fn put_pixel(&mut self, x: u32, y: u32, color: Color) {
        self.buffer.set(x, y, color);
    }
}

/// A caller-owned RGBA8 canvas, drawn in place.
///
/// Mirrors a browser `ImageData`: row-major, four bytes per pixel, no
/// encoder.
#[derive(Debug)]
pub struct BrowserSurface<'a> {
    data: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> BrowserSurface<'a> {
    /// Wrap `data` as a `width x height` canvas.
    pub fn new(data: &'a mut [u8], width: u32, height: u32) -> Result<Self, ThumbnailError> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || data.len() != expected {
            return Err(ThumbnailError::InvalidArgument(format!(
                "canvas of {}x{} needs {} bytes, got {}",
                width,
                height,
                expected,
                data.len()
            )));
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Raw canvas bytes.
    pub fn data(&self) -> &[u8] {
        self.data
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }
}

impl Surface for BrowserSurface<'_> {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixel(&self, x: u32, y: u32) -> Color {
        let i = self.index(x, y);
        Color::from_rgba8([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }

    fn put_pixel(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.data[i..i + 4].copy_from_slice(&color.to_rgba8());
    }
}

/// Copy a rendered image onto `dst`, scaled uniformly by
/// `dst.width() / src.width` with nearest-neighbour sampling.
///
/// Destination pixels that map outside the source are left untouched.
pub fn present<S: Surface + ?Sized>(src: &PixelBuffer, dst: &mut S) {
    let (sw, dw) = (src.width as u64, dst.width() as u64);
    if sw == 0 || dw == 0 {
        return;
    }
    for y in 0..dst.height() {
        let sy = y as u64 * sw / dw;
        if sy >= src.height as u64 {
            break;
        }
        for x in 0..dst.width() {
            let sx = (x as u64 * sw / dw) as u32;
            dst.put_pixel(x, y, src.get(sx, sy as u32));
        }
    }
}
