//! Thumbnail request parameters as submitted with a song upload.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::draw::DrawParams;
use crate::error::ThumbnailError;
use crate::viewport::{Viewport, DEFAULT_ZOOM_LEVEL, MAX_ZOOM_LEVEL, MIN_ZOOM_LEVEL};

/// Hex colour accepted in requests: `#RGB` or `#RRGGBB`.
const HEX_COLOR_PATTERN: &str = r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$";

static HEX_COLOR_REGEX: OnceLock<Regex> = OnceLock::new();

fn hex_color_regex() -> &'static Regex {
    HEX_COLOR_REGEX.get_or_init(|| Regex::new(HEX_COLOR_PATTERN).expect("invalid regex pattern"))
}

/// Thumbnail settings chosen by the uploader.
///
/// Fields are signed so that out-of-range input survives deserialization
/// and is reported by [`ThumbnailData::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThumbnailData {
    pub zoom_level: i64,
    pub start_tick: i64,
    pub start_layer: i64,
    pub background_color: String,
}

impl Default for ThumbnailData {
    fn default() -> Self {
        Self {
            zoom_level: DEFAULT_ZOOM_LEVEL as i64,
            start_tick: 0,
            start_layer: 0,
            background_color: "#F0F0F0".to_string(),
        }
    }
}

impl ThumbnailData {
    /// Check every field, reporting the first problem found.
    pub fn validate(&self) -> Result<(), ThumbnailError> {
        if !(MIN_ZOOM_LEVEL as i64..=MAX_ZOOM_LEVEL as i64).contains(&self.zoom_level) {
            return Err(ThumbnailError::InvalidArgument(format!(
                "zoomLevel must be between {} and {}, got {}",
                MIN_ZOOM_LEVEL, MAX_ZOOM_LEVEL, self.zoom_level
            )));
        }
        if !(0..=u32::MAX as i64).contains(&self.start_tick) {
            return Err(ThumbnailError::InvalidArgument(format!(
                "startTick must be a non-negative tick, got {}",
                self.start_tick
            )));
        }
        if !(0..=u32::MAX as i64).contains(&self.start_layer) {
            return Err(ThumbnailError::InvalidArgument(format!(
                "startLayer must be a non-negative layer, got {}",
                self.start_layer
            )));
        }
        if !hex_color_regex().is_match(&self.background_color) {
            return Err(ThumbnailError::InvalidArgument(format!(
                "backgroundColor must be a hex colour, got '{}'",
                self.background_color
            )));
        }
        Ok(())
    }

    /// Validate and convert into render parameters for a
    /// `img_width x img_height` image.
    pub fn to_draw_params(&self, img_width: u32, img_height: u32) -> Result<DrawParams, ThumbnailError> {
        self.validate()?;
        Ok(DrawParams {
            viewport: Viewport::new(
                self.start_tick as u32,
                self.start_layer as u32,
                self.zoom_level as u32,
            )?,
            background: Color::from_hex(&self.background_color)?,
            img_width,
            img_height,
            ..DrawParams::default()
        })
    }
}

/// A named background the upload form offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundPreset {
    pub key: &'static str,
    pub name: &'static str,
    pub light: &'static str,
    pub dark: &'static str,
}

const fn preset(
    key: &'static str,
    name: &'static str,
    light: &'static str,
    dark: &'static str,
) -> BackgroundPreset {
    BackgroundPreset {
        key,
        name,
        light,
        dark,
    }
}

pub const BACKGROUND_PRESETS: [BackgroundPreset; 18] = [
    preset("red", "Red", "#FFCDD2", "#E57373"),
    preset("pink", "Pink", "#F8BBD0", "#F06292"),
    preset("purple", "Purple", "#E1BEE7", "#BA68C8"),
    preset("deepPurple", "Deep Purple", "#D1C4E9", "#9575CD"),
    preset("indigo", "Indigo", "#C5CAE9", "#7986CB"),
    preset("blue", "Blue", "#BBDEFB", "#64B5F6"),
    preset("lightBlue", "Light Blue", "#B3E5FC", "#4FC3F7"),
    preset("cyan", "Cyan", "#B2EBF2", "#4DD0E1"),
    preset("teal", "Teal", "#B2DFDB", "#4DB6AC"),
    preset("green", "Green", "#C8E6C9", "#81C784"),
    preset("lightGreen", "Light Green", "#DCEDC8", "#AED581"),
    preset("lime", "Lime", "#F0F4C3", "#DCE775"),
    preset("yellow", "Yellow", "#FFF9C4", "#FFF176"),
    preset("amber", "Amber", "#FFECB3", "#FFD54F"),
    preset("orange", "Orange", "#FFE0B2", "#FFB74D"),
    preset("deepOrange", "Deep Orange", "#FFCCBC", "#FF8A65"),
    preset("brown", "Brown", "#D7CCC8", "#A1887F"),
    preset("gray", "Gray", "#CFD8DC", "#90A4AE"),
];

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Resolve a background argument to a hex colour.
///
/// Accepts a hex colour, a preset name (`"teal"`, `"deep-orange"`) or a
/// preset with a shade (`"teal:dark"`, `"teal:light"`).
pub fn resolve_background(value: &str) -> Result<String, ThumbnailError> {
    if value.starts_with('#') {
        Color::from_hex(value)?;
        return Ok(value.to_string());
    }

    let (name, shade) = match value.split_once(':') {
        Some((name, shade)) => (name, shade),
        None => (value, "light"),
    };
    let wanted = normalize(name);
    let preset = BACKGROUND_PRESETS
        .iter()
        .find(|p| normalize(p.key) == wanted)
        .ok_or_else(|| ThumbnailError::InvalidArgument(format!("unknown background '{}'", value)))?;

    match shade {
        "light" => Ok(preset.light.to_string()),
        "dark" => Ok(preset.dark.to_string()),
        other => Err(ThumbnailError::InvalidArgument(format!(
            "unknown shade '{}', expected 'light' or 'dark'",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_request() {
        let data = ThumbnailData::default();
        assert!(data.validate().is_ok());
        let params = data.to_draw_params(1280, 768).unwrap();
        assert_eq!(params.viewport, Viewport::new(0, 0, 3).unwrap());
        assert_eq!(params.background.to_hex(), "#f0f0f0");
    }

    #[test]
    fn test_camel_case_json() {
        let json = r##"{"zoomLevel":2,"startTick":10,"startLayer":4,"backgroundColor":"#E57373"}"##;
        let data: ThumbnailData = serde_json::from_str(json).unwrap();
        assert_eq!(
            data,
            ThumbnailData {
                zoom_level: 2,
                start_tick: 10,
                start_layer: 4,
                background_color: "#E57373".into(),
            }
        );
        assert_eq!(serde_json::to_string(&data).unwrap(), json);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let data: ThumbnailData = serde_json::from_str(r#"{"startTick":7}"#).unwrap();
        assert_eq!(data.zoom_level, 3);
        assert_eq!(data.start_tick, 7);
        assert_eq!(data.background_color, "#F0F0F0");
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let bad = [
            ThumbnailData { zoom_level: 0, ..Default::default() },
            ThumbnailData { zoom_level: 6, ..Default::default() },
            ThumbnailData { start_tick: -1, ..Default::default() },
            ThumbnailData { start_layer: -3, ..Default::default() },
            ThumbnailData { background_color: "F0F0F0".into(), ..Default::default() },
            ThumbnailData { background_color: "#F0F0F".into(), ..Default::default() },
            ThumbnailData { background_color: "red".into(), ..Default::default() },
        ];
        for data in bad {
            assert!(
                matches!(data.validate(), Err(ThumbnailError::InvalidArgument(_))),
                "{:?} should be rejected",
                data
            );
        }
    }

    #[test]
    fn test_short_hex_accepted() {
        let data = ThumbnailData {
            background_color: "#abc".into(),
            ..Default::default()
        };
        assert!(data.validate().is_ok());
    }

    #[test]
    fn test_resolve_background() {
        assert_eq!(resolve_background("#123456").unwrap(), "#123456");
        assert_eq!(resolve_background("red").unwrap(), "#FFCDD2");
        assert_eq!(resolve_background("red:dark").unwrap(), "#E57373");
        assert_eq!(resolve_background("deep-purple").unwrap(), "#D1C4E9");
        assert_eq!(resolve_background("lightBlue:dark").unwrap(), "#4FC3F7");
        assert!(resolve_background("mauve").is_err());
        assert!(resolve_background("red:medium").is_err());
        assert!(resolve_background("#12").is_err());
    }

    #[test]
    fn test_presets_are_valid_colors() {
        for p in BACKGROUND_PRESETS {
            assert!(hex_color_regex().is_match(p.light), "{}", p.key);
            assert!(hex_color_regex().is_match(p.dark), "{}", p.key);
        }
    }
}
