//! Conversion pipeline: extract -> transcode -> (assemble).
//!
//! [`Converter::convert`] runs synchronously to completion over an already
//! parsed document. It builds fresh intermediate data on every call; the
//! only shared input is the read-only [`ConverterSettings`].

use crate::diagnostics::{warning_count, Diagnostic};
use crate::extract::{find_level, select_layers, ConversionOptions};
use crate::models::{parse_document, Color, LayerConfig, LayerKind, LayerTable, LdtkDocument};
use crate::tileset::{ResourceTable, TilesetProfile};
use crate::transcode::{LayerTranscoder, TargetProfile, TileDataTriplet};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Fatal conversion errors
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConvertError {
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Not a usable LDtk project: {0}")]
    InvalidDocument(String),
    #[error("Level '{identifier}' not found{}", available_suffix(.available))]
    LevelNotFound { identifier: String, available: Vec<String> },
    #[error("Level '{identifier}' is stored in a separate file, which is not supported")]
    ExternalLevel { identifier: String },
    #[error("Level '{level}' has no layers to convert")]
    NoLayers { level: String },
    #[error("Level '{level}': all {skipped} selected layer(s) were skipped")]
    NoConvertibleLayers { level: String, skipped: usize },
}

fn available_suffix(available: &[String]) -> String {
    if available.is_empty() {
        String::new()
    } else {
        format!(" (available: {})", available.join(", "))
    }
}

/// Everything a conversion needs besides the document.
#[derive(Debug, Clone, Default)]
pub struct ConverterSettings {
    pub options: ConversionOptions,
    pub tileset: TilesetProfile,
    pub target: TargetProfile,
    pub layers: LayerTable,
    pub resources: ResourceTable,
    /// Stable-sort included layers by z-index before assembling
    pub sort_layers: bool,
    /// Seed for resource UIDs
    pub seed: Option<u64>,
}

/// One converted layer.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscodedLayer {
    pub kind: LayerKind,
    /// LDtk identifier
    pub identifier: String,
    pub config: LayerConfig,
    pub opacity: f32,
    pub visible: bool,
    /// Identifier of the tileset the layer draws from
    pub tileset: String,
    pub triplets: Vec<TileDataTriplet>,
}

impl TranscodedLayer {
    pub fn tile_count(&self) -> usize {
        self.triplets.len()
    }

    /// Configured modulate with the layer opacity folded into alpha.
    pub fn modulate(&self) -> Color {
        let base = self.config.modulate;
        base.with_alpha(base.a * self.opacity.clamp(0.0, 1.0))
    }
}

/// Output of one conversion, before text assembly.
#[derive(Debug, Clone)]
pub struct ConversionResult {
    pub level: String,
    /// Level size in pixels
    pub level_size: (i32, i32),
    pub layers: Vec<TranscodedLayer>,
    pub warnings: Vec<Diagnostic>,
}

impl ConversionResult {
    pub fn total_tiles(&self) -> usize {
        self.layers.iter().map(TranscodedLayer::tile_count).sum()
    }

    /// Number of `Warning`-severity diagnostics.
    pub fn warning_count(&self) -> usize {
        warning_count(&self.warnings)
    }

    /// Distinct tileset identifiers in first-use order.
    pub fn tilesets(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for layer in &self.layers {
            if !seen.contains(&layer.tileset.as_str()) {
                seen.push(&layer.tileset);
            }
        }
        seen
    }
}

/// Runs the conversion pipeline with fixed settings.
#[derive(Debug, Clone, Copy)]
pub struct Converter<'a> {
    settings: &'a ConverterSettings,
}

impl<'a> Converter<'a> {
    pub fn new(settings: &'a ConverterSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ConverterSettings {
        self.settings
    }

    /// Convert one level of a parsed document.
    pub fn convert(
        &self,
        document: &LdtkDocument,
        level: Option<&str>,
    ) -> Result<ConversionResult, ConvertError> {
        if let Some(version) = &document.json_version {
            log::trace!("LDtk json version {}", version);
        }
        let level = find_level(document, level)?;
        let mut warnings = Vec::new();
        let selected =
            select_layers(level, &LayerKind::ALL, &self.settings.options, &mut warnings)?;

        let transcoder = LayerTranscoder::new(&self.settings.tileset, &self.settings.target);
        let mut layers = Vec::with_capacity(selected.len());
        for layer in &selected {
            let Some(tileset) = transcoder.resolve_tileset(document, layer.instance, &mut warnings)
            else {
                log::debug!("dropping layer {}", layer.instance.identifier);
                continue;
            };
            let triplets = transcoder.transcode(layer.instance, &mut warnings);
            layers.push(TranscodedLayer {
                kind: layer.kind,
                identifier: layer.instance.identifier.clone(),
                config: self.settings.layers.get(layer.kind),
                opacity: layer.instance.opacity,
                visible: layer.instance.visible,
                tileset: tileset.identifier.clone(),
                triplets,
            });
        }

        if layers.is_empty() {
            return Err(ConvertError::NoConvertibleLayers {
                level: level.identifier.clone(),
                skipped: selected.len(),
            });
        }

        if self.settings.sort_layers {
            layers.sort_by_key(|l| l.config.z_index);
        }

        log::debug!(
            "level {}: {} layer(s), {} diagnostic(s)",
            level.identifier,
            layers.len(),
            warnings.len()
        );

        Ok(ConversionResult {
            level: level.identifier.clone(),
            level_size: (level.px_wid, level.px_hei),
            layers,
            warnings,
        })
    }

    /// Parse `content` and convert one of its levels.
    pub fn convert_str(
        &self,
        content: &str,
        level: Option<&str>,
    ) -> Result<ConversionResult, ConvertError> {
        let document = parse_document(content)?;
        self.convert(&document, level)
    }

    /// Read an LDtk project from disk and convert one of its levels.
    pub fn convert_file(
        &self,
        path: &Path,
        level: Option<&str>,
    ) -> Result<ConversionResult, ConvertError> {
        let content = fs::read_to_string(path)?;
        self.convert_str(&content, level)
    }
}
