//! Scene export.
//!
//! Turns a [`ConversionResult`](crate::convert::ConversionResult) into
//! Godot scene text and writes it to disk.
//!
//! # Example
//!
//! ```ignore
//! use ldtk2tscn::convert::{Converter, ConverterSettings};
//! use ldtk2tscn::export::{Exporter, TscnExporter};
//!
//! let settings = ConverterSettings::default();
//! let result = Converter::new(&settings).convert_str(&content, None)?;
//! let exporter = TscnExporter::new(settings.resources.clone(), settings.seed);
//! let path = exporter.export(&result, Path::new("out/"))?;
//! ```

pub mod godot;

pub use godot::*;

use crate::convert::ConversionResult;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Common error type for export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// IO error during file writing
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for export format implementations.
pub trait Exporter {
    /// Write the result into `output`, returning the written file.
    ///
    /// `output` is either a directory, or a file path with an extension.
    fn export(&self, result: &ConversionResult, output: &Path) -> Result<PathBuf, ExportError>;

    /// Get the format name for this exporter.
    fn format_name(&self) -> &'static str;

    /// Get the default file extension for this format.
    fn extension(&self) -> &'static str;
}
