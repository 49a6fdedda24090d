//! Color utilities for thumbnail rendering.

use crate::error::ThumbnailError;

/// RGBA color with f64 components (0.0 to 1.0 range).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    /// Create a new color with alpha = 1.0.
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a new color with alpha.
    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Create a grayscale color.
    pub const fn gray(value: f64) -> Self {
        Self::rgb(value, value, value)
    }

    pub const fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    pub const fn white() -> Self {
        Self::rgb(1.0, 1.0, 1.0)
    }

    pub const fn transparent() -> Self {
        Self::rgba(0.0, 0.0, 0.0, 0.0)
    }

    /// Same color with a different alpha.
    pub const fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// Parse a CSS hex color: `#RGB` or `#RRGGBB`.
    pub fn from_hex(hex: &str) -> Result<Self, ThumbnailError> {
        let invalid = || ThumbnailError::InvalidArgument(format!("malformed color '{}'", hex));

        let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        let rgb = match digits.len() {
            3 => {
                let expand = |i: usize| channel(&digits[i..i + 1]).map(|v| v * 17);
                [expand(0)?, expand(1)?, expand(2)?]
            }
            6 => [
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            ],
            _ => return Err(invalid()),
        };

        Ok(Self::from_rgb8(rgb))
    }

    /// Format as `#rrggbb`, dropping alpha.
    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    /// Linearly interpolate between two colors.
    pub fn lerp(&self, other: &Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// Clamp all components to [0.0, 1.0].
    pub fn clamp(&self) -> Color {
        Color {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
            a: self.a.clamp(0.0, 1.0),
        }
    }

    /// Convert to 8-bit RGBA.
    pub fn to_rgba8(&self) -> [u8; 4] {
        let c = self.clamp();
        [
            (c.r * 255.0).round() as u8,
            (c.g * 255.0).round() as u8,
            (c.b * 255.0).round() as u8,
            (c.a * 255.0).round() as u8,
        ]
    }

    /// Convert to 8-bit RGB.
    pub fn to_rgb8(&self) -> [u8; 3] {
        let [r, g, b, _] = self.to_rgba8();
        [r, g, b]
    }

    /// Create from 8-bit RGBA.
    pub fn from_rgba8(rgba: [u8; 4]) -> Self {
        Self {
            r: rgba[0] as f64 / 255.0,
            g: rgba[1] as f64 / 255.0,
            b: rgba[2] as f64 / 255.0,
            a: rgba[3] as f64 / 255.0,
        }
    }

    /// Create from 8-bit RGB.
    pub fn from_rgb8(rgb: [u8; 3]) -> Self {
        Self::from_rgba8([rgb[0], rgb[1], rgb[2], 255])
    }

    /// Overlay blend mode (`self` is the base).
    pub fn overlay(&self, other: &Color) -> Color {
        fn overlay_channel(base: f64, blend: f64) -> f64 {
            if base < 0.5 {
                2.0 * base * blend
            } else {
                1.0 - 2.0 * (1.0 - base) * (1.0 - blend)
            }
        }

        Color {
            r: overlay_channel(self.r, other.r),
            g: overlay_channel(self.g, other.g),
            b: overlay_channel(self.b, other.b),
            a: self.a.max(other.a),
        }
    }

    /// Hard light blend mode (`self` is the backdrop, `other` the source).
    ///
    /// Hard light is overlay with the layers swapped.
    pub fn hard_light(&self, other: &Color) -> Color {
        other.overlay(self)
    }

    /// Relative luma per ITU-R BT.709, in [0, 1].
    pub fn luma(&self) -> f64 {
        0.2126 * self.r + 0.7152 * self.g + 0.0722 * self.b
    }

    /// Whether the 8-bit luma falls below `threshold` (0-255).
    pub fn is_dark(&self, threshold: f64) -> bool {
        self.luma() * 255.0 < threshold
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// Blend mode for compositing a source over a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// Source-over.
    Normal,
    HardLight,
}

impl BlendMode {
    /// Blend source color over destination using this blend mode.
    pub fn blend(&self, dst: &Color, src: &Color, opacity: f64) -> Color {
        let blended = match self {
            BlendMode::Normal => *src,
            BlendMode::HardLight => dst.hard_light(src),
        };

        let t = opacity * src.a;
        if t >= 1.0 {
            return blended;
        }
        // Apply opacity via linear interpolation; alpha composites source-over.
        Color {
            a: t + dst.a * (1.0 - t),
            ..dst.lerp(&blended, t)
        }
    }
}
