//! Configuration schema types for `ldtk2tscn.toml`
//!
//! Defines the structure and validation rules for converter configuration.
//! Every section is optional; an empty file yields the built-in defaults.

use crate::codec::ALTERNATIVE_INDEX_MASK;
use crate::convert::ConverterSettings;
use crate::extract::ConversionOptions;
use crate::models::{LayerConfig, LayerKind, LayerTable};
use crate::tileset::{ResourcePaths, ResourceTable, TilesetProfile};
use crate::transcode::TargetProfile;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Layer selection and ordering
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConvertConfig {
    #[serde(flatten)]
    pub options: ConversionOptions,
    /// Stable-sort included layers by z-index
    #[serde(default)]
    pub sort_layers: bool,
}

/// Output settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Seed for generated resource UIDs (reproducible output)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Complete `ldtk2tscn.toml` configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ldtk2TscnConfig {
    #[serde(default)]
    pub convert: ConvertConfig,
    /// Supported tileset profile
    #[serde(default)]
    pub tileset: TilesetProfile,
    #[serde(default)]
    pub target: TargetProfile,
    #[serde(default)]
    pub output: OutputConfig,
    /// Tileset identifier -> Godot resource paths
    #[serde(default)]
    pub resources: HashMap<String, ResourcePaths>,
    /// LDtk layer identifier -> node configuration
    #[serde(default)]
    pub layers: HashMap<String, LayerConfig>,
}

/// Config validation error
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl Ldtk2TscnConfig {
    /// Validate the configuration, returning all problems found
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut error = |field: String, message: &str| {
            errors.push(ConfigValidationError { field, message: message.to_string() })
        };

        // Validate tileset profile
        if self.tileset.identifier.is_empty() {
            error("tileset.identifier".to_string(), "cannot be empty");
        }
        if self.tileset.tile_grid_size <= 0 {
            error("tileset.tile_grid_size".to_string(), "must be a positive integer");
        }
        if self.tileset.columns <= 0 {
            error("tileset.columns".to_string(), "must be a positive integer");
        }
        if self.tileset.rows <= 0 {
            error("tileset.rows".to_string(), "must be a positive integer");
        }
        if self.tileset.tile_grid_size > 0 && self.tileset.rows > 0 {
            let last_row = (self.tileset.rows as i64 - 1) * self.tileset.tile_grid_size as i64;
            if last_row > ALTERNATIVE_INDEX_MASK as i64 {
                error(
                    "tileset.rows".to_string(),
                    "atlas rows do not fit the 16-bit alternative field",
                );
            }
        }

        // Validate resources
        for (identifier, paths) in &self.resources {
            if paths.tileset.is_empty() {
                error(format!("resources.{}.tileset", identifier), "cannot be empty");
            }
            if paths.texture.is_empty() {
                error(format!("resources.{}.texture", identifier), "cannot be empty");
            }
        }

        // Validate layers
        for (identifier, layer) in &self.layers {
            if LayerKind::from_identifier(identifier).is_none() {
                error(format!("layers.{}", identifier), "is not a recognized layer");
            }
            if layer.name.is_empty() {
                error(format!("layers.{}.name", identifier), "cannot be empty");
            }
            if layer.modulate.components().iter().any(|c| !(0.0..=1.0).contains(c)) {
                error(format!("layers.{}.modulate", identifier), "components must be in [0, 1]");
            }
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Layer overrides keyed by kind; unrecognized keys are dropped.
    pub fn layer_overrides(&self) -> HashMap<LayerKind, LayerConfig> {
        self.layers
            .iter()
            .filter_map(|(id, cfg)| LayerKind::from_identifier(id).map(|k| (k, cfg.clone())))
            .collect()
    }

    /// Build the immutable settings the converter runs with.
    pub fn to_settings(&self) -> ConverterSettings {
        ConverterSettings {
            options: self.convert.options,
            tileset: self.tileset.clone(),
            target: self.target,
            layers: LayerTable::with_overrides(&self.layer_overrides()),
            resources: ResourceTable::with_entries(&self.resources),
            sort_layers: self.convert.sort_layers,
            seed: self.output.seed,
        }
    }
}
