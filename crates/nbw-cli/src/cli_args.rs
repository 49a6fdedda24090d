//! CLI argument definitions for the `nbw` command-line interface.
//!
//! All `#[derive(Parser)]` and `#[derive(Subcommand)]` types are defined here,
//! keeping `main.rs` focused on dispatch logic.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use nbw_cli::commands::render::RenderOptions;

/// Note Block World - song thumbnails and inspection
#[derive(Parser)]
#[command(name = "nbw")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Thumbnail settings shared by `render` and `render-all`.
#[derive(Args, Debug, Clone)]
pub(crate) struct ThumbnailArgs {
    /// Zoom level, 1 to 5 (default: 3)
    #[arg(long, allow_negative_numbers = true)]
    pub zoom: Option<i64>,

    /// First tick shown (default: 0)
    #[arg(long, allow_negative_numbers = true)]
    pub start_tick: Option<i64>,

    /// First layer shown (default: 0)
    #[arg(long, allow_negative_numbers = true)]
    pub start_layer: Option<i64>,

    /// Background: hex colour (#F0F0F0) or preset name (teal, teal:dark)
    #[arg(long)]
    pub background: Option<String>,

    /// Image width in pixels
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 768)]
    pub height: u32,

    /// JSON file with thumbnail parameters (zoomLevel, startTick, startLayer, backgroundColor)
    #[arg(long)]
    pub params: Option<PathBuf>,

    /// Grayscale note block sprite (PNG) to use instead of the built-in one
    #[arg(long)]
    pub sprite: Option<PathBuf>,

    /// Draw a vertical line at every tick
    #[arg(long)]
    pub grid: bool,

    /// Do not draw key names on notes
    #[arg(long)]
    pub no_labels: bool,

    /// Color custom instruments with the vanilla palette (id % 16)
    #[arg(long)]
    pub wrap_instruments: bool,
}

impl From<ThumbnailArgs> for RenderOptions {
    fn from(args: ThumbnailArgs) -> Self {
        RenderOptions {
            zoom: args.zoom,
            start_tick: args.start_tick,
            start_layer: args.start_layer,
            background: args.background,
            width: args.width,
            height: args.height,
            params: args.params,
            sprite: args.sprite,
            grid: args.grid,
            no_labels: args.no_labels,
            wrap_instruments: args.wrap_instruments,
        }
    }
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Render the thumbnail of a song to PNG
    Render {
        /// Path to the .nbs file
        input: String,

        /// Output PNG path (default: input with .png extension)
        #[arg(short, long)]
        output: Option<String>,

        #[command(flatten)]
        thumbnail: ThumbnailArgs,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Render thumbnails for every .nbs file under a directory
    RenderAll {
        /// Directory to scan recursively
        input_dir: String,

        /// Output directory (mirrors the input layout)
        #[arg(short, long)]
        output: String,

        #[command(flatten)]
        thumbnail: ThumbnailArgs,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// List the notes of a song
    Notes {
        /// Path to the .nbs file
        input: String,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Show song statistics
    Stats {
        /// Path to the .nbs file
        input: String,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Show song metadata and custom instrument usage
    Info {
        /// Path to the .nbs file
        input: String,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },
}
