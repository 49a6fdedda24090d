//! Note Block World CLI library.
//!
//! This crate provides the core functionality for the `nbw` CLI: input
//! loading, thumbnail rendering and song inspection commands.

pub mod commands;
pub mod input;
pub mod logger;
