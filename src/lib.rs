//! ldtk2tscn - Library for converting LDtk levels into Godot TileMap scenes
//!
//! This library provides functionality to:
//! - Parse LDtk project JSON and pick a level
//! - Transcode baked tile layers into Godot `format = 2` tile data
//! - Assemble and write `.tscn` scene text
//!
//! Recoverable problems are collected as [`diagnostics::Diagnostic`]s on the
//! conversion result; only document-level failures are errors.

pub mod cli;
pub mod codec;
pub mod config;
pub mod convert;
pub mod diagnostics;
pub mod export;
pub mod extract;
pub mod models;
pub mod preview;
pub mod tileset;
pub mod transcode;
