//! Command implementations for the `nbw` binary.

pub mod info;
pub mod json_output;
pub mod notes;
pub mod render;
pub mod render_all;
pub mod stats;
