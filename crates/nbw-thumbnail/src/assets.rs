//! Shared rendering resources.
//!
//! [`ThumbnailAssets`] is built once per process and handed by reference
//! to every render call. It never changes after construction, so any
//! number of threads may render with the same instance.

use std::path::Path;

use crate::color::Color;
use crate::error::ThumbnailError;
use crate::font::KeyFont;
use crate::sprite::Sprite;

/// Colours of the vanilla instruments, in instrument id order.
pub const INSTRUMENT_COLORS: [[u8; 3]; 16] = [
    [0x19, 0x64, 0xac], // harp
    [0x3c, 0x8e, 0x48], // double bass
    [0xbe, 0x6b, 0x6b], // bass drum
    [0xbe, 0xbe, 0x19], // snare drum
    [0x9d, 0x5a, 0x98], // click
    [0x57, 0x2b, 0x21], // guitar
    [0xbe, 0xc6, 0x5c], // flute
    [0xbe, 0x19, 0xbe], // bell
    [0x52, 0x90, 0x8d], // chime
    [0xbe, 0xbe, 0xbe], // xylophone
    [0x19, 0x91, 0xbe], // iron xylophone
    [0xbe, 0x23, 0x28], // cow bell
    [0xbe, 0x57, 0x28], // didgeridoo
    [0x19, 0xbe, 0x19], // bit
    [0xbe, 0x19, 0x57], // banjo
    [0x57, 0x57, 0x57], // pling
];

/// Colour of instrument `id`, if it is one of the vanilla instruments.
pub fn instrument_color(id: u32) -> Option<Color> {
    INSTRUMENT_COLORS
        .get(id as usize)
        .map(|&rgb| Color::from_rgb8(rgb))
}

/// How notes played by non-vanilla instruments are drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CustomInstrumentStyle {
    /// Untinted grayscale sprite.
    #[default]
    Fallback,
    /// Reuse the vanilla palette, `id % 16`.
    Wrap,
}

/// Sprites and font used by the rasterizer.
#[derive(Debug, Clone)]
pub struct ThumbnailAssets {
    base: Sprite,
    tinted: Vec<Sprite>,
    font: KeyFont,
}

impl ThumbnailAssets {
    /// Assets built from the procedural note block sprite.
    pub fn builtin() -> Self {
        Self::from_sprite(Sprite::note_block())
    }

    /// Assets built from a grayscale note block sprite.
    pub fn from_sprite(base: Sprite) -> Self {
        let tinted = INSTRUMENT_COLORS
            .iter()
            .map(|&rgb| base.tinted(Color::from_rgb8(rgb)))
            .collect();
        Self {
            base,
            tinted,
            font: KeyFont,
        }
    }

    /// Assets built from a grayscale note block sprite stored as PNG.
    pub fn load(path: &Path) -> Result<Self, ThumbnailError> {
        Ok(Self::from_sprite(Sprite::load_png(path)?))
    }

    /// Sprite for notes of instrument `id`.
    pub fn sprite_for(&self, id: u32, style: CustomInstrumentStyle) -> &Sprite {
        let index = match style {
            CustomInstrumentStyle::Fallback => id as usize,
            CustomInstrumentStyle::Wrap => id as usize % self.tinted.len(),
        };
        self.tinted.get(index).unwrap_or(&self.base)
    }

    /// The untinted sprite drawn for unknown instruments.
    pub fn fallback_sprite(&self) -> &Sprite {
        &self.base
    }

    pub fn font(&self) -> &KeyFont {
        &self.font
    }
}

impl Default for ThumbnailAssets {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_assets_are_shareable() {
        assert_send_sync::<ThumbnailAssets>();
    }

    #[test]
    fn test_palette_lookup() {
        assert_eq!(instrument_color(0).unwrap().to_hex(), "#1964ac");
        assert_eq!(instrument_color(15).unwrap().to_hex(), "#575757");
        assert!(instrument_color(16).is_none());
    }

    #[test]
    fn test_known_instruments_are_tinted() {
        let assets = ThumbnailAssets::builtin();
        for id in 0..16 {
            let sprite = assets.sprite_for(id, CustomInstrumentStyle::Fallback);
            assert_ne!(sprite, assets.fallback_sprite(), "instrument {}", id);
        }
        assert_ne!(
            assets.sprite_for(0, CustomInstrumentStyle::Fallback),
            assets.sprite_for(1, CustomInstrumentStyle::Fallback)
        );
    }

    #[test]
    fn test_unknown_instrument_falls_back() {
        let assets = ThumbnailAssets::builtin();
        for id in [16, 17, 255, u32::MAX] {
            assert_eq!(
                assets.sprite_for(id, CustomInstrumentStyle::Fallback),
                assets.fallback_sprite()
            );
        }
    }

    #[test]
    fn test_wrap_reuses_palette() {
        let assets = ThumbnailAssets::builtin();
        assert_eq!(
            assets.sprite_for(17, CustomInstrumentStyle::Wrap),
            assets.sprite_for(1, CustomInstrumentStyle::Fallback)
        );
    }
}
