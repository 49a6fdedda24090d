//! Note block sprites and instrument tinting.

use std::path::Path;

use crate::buffer::PixelBuffer;
use crate::color::{BlendMode, Color};
use crate::error::ThumbnailError;
use crate::png::{decode_rgba, read_rgba_file};

/// Side length of the built-in note block sprite.
pub const NOTE_BLOCK_SPRITE_SIZE: u32 = 16;

/// Opacity of the grayscale texture when tinting.
pub const TINT_TEXTURE_OPACITY: f64 = 0.67;

/// A small image drawn once per note.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Sprite {
    /// Build a sprite from row-major pixels.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Color>) -> Result<Self, ThumbnailError> {
        if width == 0 || height == 0 {
            return Err(ThumbnailError::InvalidArgument(format!(
                "sprite must not be empty ({}x{})",
                width, height
            )));
        }
        if pixels.len() != width as usize * height as usize {
            return Err(ThumbnailError::InvalidArgument(format!(
                "sprite {}x{} needs {} pixels, got {}",
                width,
                height,
                width as usize * height as usize,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build a sprite from a decoded image.
    pub fn from_buffer(buffer: &PixelBuffer) -> Result<Self, ThumbnailError> {
        let pixels = buffer
            .as_rgba8()
            .chunks_exact(4)
            .map(|px| Color::from_rgba8([px[0], px[1], px[2], px[3]]))
            .collect();
        Self::from_pixels(buffer.width, buffer.height, pixels)
    }

    /// Load a sprite from a PNG file.
    pub fn load_png(path: &Path) -> Result<Self, ThumbnailError> {
        let buffer = read_rgba_file(path).map_err(|source| ThumbnailError::ResourceLoad {
            path: path.display().to_string(),
            source,
        })?;
        log::debug!(
            "loaded sprite {} ({}x{})",
            path.display(),
            buffer.width,
            buffer.height
        );
        Self::from_buffer(&buffer)
    }

    /// Decode a sprite from PNG bytes.
    pub fn decode_png(bytes: &[u8]) -> Result<Self, ThumbnailError> {
        let buffer = decode_rgba(bytes).map_err(|source| ThumbnailError::ResourceLoad {
            path: "<memory>".into(),
            source,
        })?;
        Self::from_buffer(&buffer)
    }

    /// The built-in grayscale note block: a dark frame, a bevelled face
    /// and a speaker grille in the middle.
    pub fn note_block() -> Self {
        let size = NOTE_BLOCK_SPRITE_SIZE;
        let last = size - 1;
        let mut pixels = Vec::with_capacity((size * size) as usize);

        for y in 0..size {
            for x in 0..size {
                let value = if x == 0 || y == 0 || x == last || y == last {
                    0.22
                } else if x == 1 || y == 1 {
                    0.85
                } else if x == last - 1 || y == last - 1 {
                    0.42
                } else if (5..=10).contains(&x) && (5..=10).contains(&y) && (x + y) % 2 == 0 {
                    0.30
                } else if y % 4 == 0 {
                    0.55
                } else {
                    0.66
                };
                pixels.push(Color::gray(value));
            }
        }

        Self {
            width: size,
            height: size,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at `(x, y)`. Coordinates must be inside the sprite.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Nearest-neighbour sample for a destination of `dst_w x dst_h` pixels.
    #[inline]
    pub fn sample_scaled(&self, dx: u32, dy: u32, dst_w: u32, dst_h: u32) -> Color {
        let sx = (dx as u64 * self.width as u64 / dst_w.max(1) as u64) as u32;
        let sy = (dy as u64 * self.height as u64 / dst_h.max(1) as u64) as u32;
        self.pixel(sx.min(self.width - 1), sy.min(self.height - 1))
    }

    /// Colorize the sprite: fill with `color`, then hard-light the sprite's
    /// own texture over it at [`TINT_TEXTURE_OPACITY`]. The result is opaque.
    pub fn tinted(&self, color: Color) -> Self {
        let base = Color { a: 1.0, ..color };
        let pixels = self
            .pixels
            .iter()
            .map(|px| Color {
                a: 1.0,
                ..BlendMode::HardLight.blend(&base, px, TINT_TEXTURE_OPACITY)
            })
            .collect();
        Self {
            width: self.width,
            height: self.height,
            pixels,
        }
    }
}
