//! Tiny bitmap font for note key labels.
//!
//! Only the characters that appear in key names are defined: the pitch
//! letters, `#`, `-` and digits. Glyphs are 3x5 pixels; each row is a
//! 3-bit mask with the leftmost pixel in bit 2.

use crate::color::Color;
use crate::surface::Surface;

/// Glyph width in font pixels.
pub const GLYPH_WIDTH: u32 = 3;

/// Glyph height in font pixels.
pub const GLYPH_HEIGHT: u32 = 5;

/// Gap between glyphs in font pixels.
pub const GLYPH_SPACING: u32 = 1;

fn glyph(c: char) -> Option<[u8; 5]> {
    let rows = match c {
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        '#' => [0b101, 0b111, 0b101, 0b111, 0b101],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b110, 0b001, 0b010, 0b100, 0b111],
        '3' => [0b110, 0b001, 0b010, 0b001, 0b110],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b110, 0b001, 0b110],
        '6' => [0b011, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b110],
        _ => return None,
    };
    Some(rows)
}

/// Renders key labels such as `C#4` onto a surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyFont;

impl KeyFont {
    /// Width in pixels of `text` at `scale`.
    pub fn text_width(&self, text: &str, scale: u32) -> u32 {
        let n = text.chars().count() as u32;
        if n == 0 {
            return 0;
        }
        (n * (GLYPH_WIDTH + GLYPH_SPACING) - GLYPH_SPACING) * scale
    }

    /// Height in pixels of a line at `scale`.
    pub fn text_height(&self, scale: u32) -> u32 {
        GLYPH_HEIGHT * scale
    }

    /// Draw `text` with its top-left corner at `(x, y)`. Unknown
    /// characters advance without drawing.
    pub fn draw_text<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        text: &str,
        x: i64,
        y: i64,
        scale: u32,
        color: Color,
    ) {
        let advance = ((GLYPH_WIDTH + GLYPH_SPACING) * scale) as i64;
        let s = scale as i64;

        for (i, c) in text.chars().enumerate() {
            let Some(rows) = glyph(c) else {
                continue;
            };
            let gx = x + i as i64 * advance;
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..GLYPH_WIDTH {
                    if bits & (0b100 >> col) != 0 {
                        surface.fill_rect(gx + col as i64 * s, y + row as i64 * s, scale, scale, color);
                    }
                }
            }
        }
    }

    /// Draw `text` centred on `(cx, cy)`.
    pub fn draw_text_centered<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        text: &str,
        cx: i64,
        cy: i64,
        scale: u32,
        color: Color,
    ) {
        let w = self.text_width(text, scale) as i64;
        let h = self.text_height(scale) as i64;
        self.draw_text(surface, text, cx - w / 2, cy - h / 2, scale, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::OffscreenSurface;

    #[test]
    fn test_key_name_characters_have_glyphs() {
        for c in "ABCDEFG#-0123456789".chars() {
            assert!(glyph(c).is_some(), "missing glyph for {:?}", c);
        }
        assert!(glyph('x').is_none());
    }

    #[test]
    fn test_glyph_rows_fit_width() {
        for c in "ABCDEFG#-0123456789".chars() {
            assert!(glyph(c).unwrap().iter().all(|&r| r < 0b1000));
        }
    }

    #[test]
    fn test_text_metrics() {
        let font = KeyFont;
        assert_eq!(font.text_width("", 1), 0);
        assert_eq!(font.text_width("C4", 1), 7);
        assert_eq!(font.text_width("C#4", 1), 11);
        assert_eq!(font.text_width("C#4", 2), 22);
        assert_eq!(font.text_height(3), 15);
    }

    #[test]
    fn test_draw_text_pixels() {
        let mut surface = OffscreenSurface::new(8, 5).unwrap();
        surface.fill(Color::black());
        KeyFont.draw_text(&mut surface, "1", 0, 0, 1, Color::white());

        let lit = |x, y| surface.pixel(x, y) == Color::white();
        // Glyph '1': .#. / ##. / .#. / .#. / ###
        assert!(!lit(0, 0) && lit(1, 0) && !lit(2, 0));
        assert!(lit(0, 1) && lit(1, 1));
        assert!(lit(0, 4) && lit(1, 4) && lit(2, 4));
        assert!(!lit(4, 0));
    }

    #[test]
    fn test_draw_text_clips_at_edges() {
        let mut surface = OffscreenSurface::new(4, 4).unwrap();
        surface.fill(Color::black());
        KeyFont.draw_text(&mut surface, "88", -2, -2, 2, Color::white());
        KeyFont.draw_text_centered(&mut surface, "A0", 3, 3, 1, Color::white());
    }
}
