//! Render command implementation
//!
//! Renders the thumbnail of a single song to a PNG file.

use anyhow::{Context, Result};
use colored::Colorize;
use nbw_song::NoteGrid;
use nbw_thumbnail::{
    draw_notes_offscreen, resolve_background, CustomInstrumentStyle, DrawParams, ThumbnailAssets,
    ThumbnailData,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use super::json_output::{print_json, CommandOutput, JsonError};
use crate::input::{load_song, load_thumbnail_data, LoadedSong};

/// Thumbnail settings collected from flags and an optional parameter file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub zoom: Option<i64>,
    pub start_tick: Option<i64>,
    pub start_layer: Option<i64>,
    /// Hex colour or preset name, see [`resolve_background`].
    pub background: Option<String>,
    pub width: u32,
    pub height: u32,
    /// JSON file with `ThumbnailData`; flags override its fields.
    pub params: Option<PathBuf>,
    /// Grayscale note block sprite to use instead of the built-in one.
    pub sprite: Option<PathBuf>,
    pub grid: bool,
    pub no_labels: bool,
    pub wrap_instruments: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            zoom: None,
            start_tick: None,
            start_layer: None,
            background: None,
            width: nbw_thumbnail::draw::DEFAULT_IMG_WIDTH,
            height: nbw_thumbnail::draw::DEFAULT_IMG_HEIGHT,
            params: None,
            sprite: None,
            grid: false,
            no_labels: false,
            wrap_instruments: false,
        }
    }
}

impl RenderOptions {
    /// The request these options describe, before validation.
    pub fn thumbnail_data(&self) -> Result<ThumbnailData> {
        let mut data = match &self.params {
            Some(path) => load_thumbnail_data(path)?,
            None => ThumbnailData::default(),
        };
        if let Some(zoom) = self.zoom {
            data.zoom_level = zoom;
        }
        if let Some(tick) = self.start_tick {
            data.start_tick = tick;
        }
        if let Some(layer) = self.start_layer {
            data.start_layer = layer;
        }
        if let Some(background) = &self.background {
            data.background_color = resolve_background(background)?;
        }
        Ok(data)
    }

    /// Validated render parameters.
    pub fn draw_params(&self) -> Result<DrawParams> {
        let mut params = self.thumbnail_data()?.to_draw_params(self.width, self.height)?;
        params.grid_lines = self.grid;
        params.key_labels = !self.no_labels;
        if self.wrap_instruments {
            params.custom_instruments = CustomInstrumentStyle::Wrap;
        }
        Ok(params)
    }

    pub fn assets(&self) -> Result<ThumbnailAssets> {
        match &self.sprite {
            Some(path) => ThumbnailAssets::load(path)
                .with_context(|| format!("Failed to load sprite: {}", path.display())),
            None => Ok(ThumbnailAssets::builtin()),
        }
    }
}

/// Result of rendering one song.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// Path to the song file
    pub input: String,
    /// Path to the written PNG
    pub output: String,
    /// BLAKE3 hash of the song file
    pub source_hash: String,
    /// BLAKE3 hash of the PNG bytes
    pub png_hash: String,
    pub width: u32,
    pub height: u32,
    pub zoom_level: u32,
    pub start_tick: u32,
    pub start_layer: u32,
    /// Background as `#rrggbb`
    pub background: String,
    /// Notes in the song
    pub note_count: usize,
    /// Notes inside the rendered window
    pub visible_notes: usize,
    /// Size of the PNG in bytes
    pub bytes: usize,
}

/// Default output path: the input with a `.png` extension.
pub fn default_output(input: &Path) -> PathBuf {
    input.with_extension("png")
}

/// Render a loaded song and write the PNG to `output`.
pub fn render_song(
    input: &Path,
    loaded: &LoadedSong,
    params: &DrawParams,
    assets: &ThumbnailAssets,
    output: &Path,
) -> Result<RenderResult> {
    let grid = NoteGrid::from_song(&loaded.song);
    let surface = draw_notes_offscreen(&grid, params, assets)
        .with_context(|| format!("Failed to render {}", input.display()))?;
    let (png, png_hash) = surface.encode_png_with_hash()?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }
    fs::write(output, &png)
        .with_context(|| format!("Failed to write thumbnail: {}", output.display()))?;

    let visible_notes = params
        .viewport
        .visible_notes(&grid, params.img_width, params.img_height)
        .count();
    log::info!(
        "rendered {} -> {} ({} of {} notes visible)",
        input.display(),
        output.display(),
        visible_notes,
        grid.len()
    );

    Ok(RenderResult {
        input: input.display().to_string(),
        output: output.display().to_string(),
        source_hash: loaded.source_hash.clone(),
        png_hash,
        width: params.img_width,
        height: params.img_height,
        zoom_level: params.viewport.zoom_level,
        start_tick: params.viewport.start_tick,
        start_layer: params.viewport.start_layer,
        background: params.background.to_hex(),
        note_count: grid.len(),
        visible_notes,
        bytes: png.len(),
    })
}

fn render_file(input: &Path, output: Option<&Path>, options: &RenderOptions) -> Result<RenderResult> {
    let params = options.draw_params()?;
    let assets = options.assets()?;
    let loaded = load_song(input)?;
    let output = output.map_or_else(|| default_output(input), Path::to_path_buf);
    render_song(input, &loaded, &params, &assets, &output)
}

/// Run the render command
///
/// # Arguments
/// * `input` - Path to the `.nbs` file
/// * `output` - PNG path (default: input with `.png` extension)
/// * `options` - Thumbnail settings
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 on success, 1 on error
pub fn run(
    input: &str,
    output: Option<&str>,
    options: &RenderOptions,
    json_output: bool,
) -> Result<ExitCode> {
    let result = render_file(Path::new(input), output.map(Path::new), options);

    if json_output {
        return match result {
            Ok(result) => {
                print_json(&CommandOutput::success(result))?;
                Ok(ExitCode::SUCCESS)
            }
            Err(err) => {
                let error = JsonError::from_anyhow(&err).with_file(input);
                print_json(&CommandOutput::<RenderResult>::failure(vec![error]))?;
                Ok(ExitCode::from(1))
            }
        };
    }

    let result = result?;
    println!("{} {}", "Rendered".green().bold(), result.output);
    println!("  {} {}", "Song:".dimmed(), result.input);
    println!(
        "  {} {}x{} at zoom {}, from tick {} layer {}",
        "Image:".dimmed(),
        result.width,
        result.height,
        result.zoom_level,
        result.start_tick,
        result.start_layer
    );
    println!("  {} {}", "Background:".dimmed(), result.background);
    println!(
        "  {} {} of {} visible",
        "Notes:".dimmed(),
        result.visible_notes,
        result.note_count
    );
    println!("  {} {}", "Hash:".dimmed(), &result.png_hash[..16]);

    Ok(ExitCode::SUCCESS)
}
