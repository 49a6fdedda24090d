//! Deterministic PNG reader and writer.
//!
//! Uses fixed compression settings so that the same thumbnail always
//! encodes to the same bytes, which keeps stored thumbnails cacheable by
//! content hash.

use std::io::{BufRead, Seek, Write};
use std::path::Path;

use png::{BitDepth, ColorType, Compression, Decoder, Encoder, FilterType, Transformations};
use thiserror::Error;

use crate::buffer::PixelBuffer;

/// Errors from PNG operations.
#[derive(Debug, Error)]
pub enum PngError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG encoding error: {0}")]
    Encoding(#[from] png::EncodingError),

    #[error("PNG decoding error: {0}")]
    Decoding(#[from] png::DecodingError),

    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),

    #[error("Unsupported PNG layout: {0}")]
    Unsupported(String),
}

/// PNG export configuration for deterministic output.
#[derive(Debug, Clone)]
pub struct PngConfig {
    /// Compression level. Use a fixed value for determinism.
    pub compression: Compression,
    /// Filter type. Use a fixed value for determinism.
    pub filter: FilterType,
}

impl Default for PngConfig {
    fn default() -> Self {
        Self {
            compression: Compression::Default,
            filter: FilterType::NoFilter,
        }
    }
}

impl PngConfig {
    /// Create config optimized for file size (slower, but deterministic).
    pub fn best_compression() -> Self {
        Self {
            compression: Compression::Best,
            filter: FilterType::Paeth,
        }
    }

    /// Create config optimized for speed (faster, but larger files).
    pub fn fast() -> Self {
        Self {
            compression: Compression::Fast,
            filter: FilterType::NoFilter,
        }
    }
}

/// Write an RGBA buffer to any writer.
pub fn write_rgba_to_writer<W: Write>(
    buffer: &PixelBuffer,
    writer: W,
    config: &PngConfig,
) -> Result<(), PngError> {
    if buffer.width == 0 || buffer.height == 0 {
        return Err(PngError::InvalidDimensions(format!(
            "{}x{} image",
            buffer.width, buffer.height
        )));
    }

    let mut encoder = Encoder::new(writer, buffer.width, buffer.height);
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);
    encoder.set_compression(config.compression);
    encoder.set_filter(config.filter);

    // The png crate doesn't add timestamps by default
    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(buffer.as_rgba8())?;

    Ok(())
}

/// Encode an RGBA buffer into a byte vector.
pub fn write_rgba_to_vec(buffer: &PixelBuffer, config: &PngConfig) -> Result<Vec<u8>, PngError> {
    let mut data = Vec::new();
    write_rgba_to_writer(buffer, &mut data, config)?;
    Ok(data)
}

/// Compute the BLAKE3 hash of PNG data.
pub fn hash_png(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// Write to a `Vec<u8>` and return the hash.
pub fn write_rgba_to_vec_with_hash(
    buffer: &PixelBuffer,
    config: &PngConfig,
) -> Result<(Vec<u8>, String), PngError> {
    let data = write_rgba_to_vec(buffer, config)?;
    let hash = hash_png(&data);
    Ok((data, hash))
}

/// Decode a PNG stream into an RGBA buffer.
///
/// Palette, grayscale and 16-bit images are normalized to 8-bit RGBA.
pub fn read_rgba<R: BufRead + Seek>(reader: R) -> Result<PixelBuffer, PngError> {
    let mut decoder = Decoder::new(reader);
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
    let mut reader = decoder.read_info()?;

    let mut raw = vec![0u8; reader.output_buffer_size()];
    let info = reader.next_frame(&mut raw)?;
    let raw = &raw[..info.buffer_size()];

    if info.bit_depth != BitDepth::Eight {
        return Err(PngError::Unsupported(format!("bit depth {:?}", info.bit_depth)));
    }

    let channels = match info.color_type {
        ColorType::Grayscale => 1,
        ColorType::GrayscaleAlpha => 2,
        ColorType::Rgb => 3,
        ColorType::Rgba => 4,
        ColorType::Indexed => {
            return Err(PngError::Unsupported("indexed color after expansion".into()))
        }
    };

    let width = info.width as usize;
    let mut data = Vec::with_capacity(width * info.height as usize * 4);
    for row in raw.chunks_exact(info.line_size).take(info.height as usize) {
        for px in row[..width * channels].chunks_exact(channels) {
            let rgba = match channels {
                1 => [px[0], px[0], px[0], 255],
                2 => [px[0], px[0], px[0], px[1]],
                3 => [px[0], px[1], px[2], 255],
                _ => [px[0], px[1], px[2], px[3]],
            };
            data.extend_from_slice(&rgba);
        }
    }

    Ok(PixelBuffer {
        width: info.width,
        height: info.height,
        data,
    })
}

/// Decode PNG bytes into an RGBA buffer.
pub fn decode_rgba(bytes: &[u8]) -> Result<PixelBuffer, PngError> {
    read_rgba(std::io::Cursor::new(bytes))
}

/// Read a PNG file into an RGBA buffer.
pub fn read_rgba_file(path: &Path) -> Result<PixelBuffer, PngError> {
    let file = std::fs::File::open(path)?;
    read_rgba(std::io::BufReader::new(file))
}
