//! Pixel storage.

use crate::color::Color;

/// An 8-bit RGBA image buffer, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel data, four bytes per pixel.
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Create a new buffer filled with a color.
    pub fn new(width: u32, height: u32, fill: Color) -> Self {
        let size = width as usize * height as usize;
        let rgba = fill.to_rgba8();
        let mut data = Vec::with_capacity(size * 4);
        for _ in 0..size {
            data.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Create a new fully transparent buffer.
    pub fn new_transparent(width: u32, height: u32) -> Self {
        Self::new(width, height, Color::transparent())
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Get the raw bytes of a pixel.
    #[inline]
    pub fn get_rgba8(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.index(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    /// Get a pixel at the given coordinates.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Color {
        Color::from_rgba8(self.get_rgba8(x, y))
    }

    /// Set a pixel at the given coordinates.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.data[i..i + 4].copy_from_slice(&color.to_rgba8());
    }

    /// Borrow the RGBA bytes.
    pub fn as_rgba8(&self) -> &[u8] {
        &self.data
    }

    /// Convert to 8-bit RGB bytes.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.data
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect()
    }

    /// Whether every pixel has the same value.
    pub fn is_uniform(&self) -> bool {
        match self.data.get(..4) {
            Some(first) => self.data.chunks_exact(4).all(|px| px == first),
            None => true,
        }
    }
}
