//! Recognized layers and their output configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The LDtk layers this converter turns into Godot TileMap nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerKind {
    #[serde(rename = "Collisions_baked")]
    Collisions,
    #[serde(rename = "Wall_shadows_baked")]
    WallShadows,
    #[serde(rename = "Bg_textures_baked")]
    Background,
}

impl LayerKind {
    pub const ALL: [LayerKind; 3] =
        [LayerKind::Collisions, LayerKind::WallShadows, LayerKind::Background];

    /// LDtk layer identifier.
    pub fn identifier(&self) -> &'static str {
        match self {
            LayerKind::Collisions => "Collisions_baked",
            LayerKind::WallShadows => "Wall_shadows_baked",
            LayerKind::Background => "Bg_textures_baked",
        }
    }

    pub fn from_identifier(identifier: &str) -> Option<LayerKind> {
        LayerKind::ALL.into_iter().find(|kind| kind.identifier() == identifier)
    }

    /// Built-in node name, z-index and modulate for this layer.
    pub fn default_config(&self) -> LayerConfig {
        match self {
            LayerKind::Collisions => LayerConfig::new("Collisions", 0),
            LayerKind::WallShadows => LayerConfig::new("WallShadows", 1),
            LayerKind::Background => LayerConfig::new("Background", -1),
        }
    }
}

impl std::fmt::Display for LayerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

/// RGBA color with components in `[0, 1]`, written in config files as
/// `[r, g, b, a]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };

    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub fn components(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[f32; 4]> for Color {
    fn from(c: [f32; 4]) -> Self {
        Color::new(c[0], c[1], c[2], c[3])
    }
}

impl From<Color> for [f32; 4] {
    fn from(c: Color) -> Self {
        c.components()
    }
}

/// How one recognized layer is emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    /// Node name (sanitized again when written)
    pub name: String,
    /// Godot `z_index`
    #[serde(default)]
    pub z_index: i32,
    /// Godot `modulate`, before the layer opacity is applied
    #[serde(default = "default_modulate")]
    pub modulate: Color,
}

fn default_modulate() -> Color {
    Color::WHITE
}

impl LayerConfig {
    pub fn new(name: &str, z_index: i32) -> Self {
        Self { name: name.to_string(), z_index, modulate: Color::WHITE }
    }
}

/// Layer configuration keyed by layer kind. Built once, read-only after.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerTable {
    configs: HashMap<LayerKind, LayerConfig>,
}

impl Default for LayerTable {
    fn default() -> Self {
        Self {
            configs: LayerKind::ALL.into_iter().map(|k| (k, k.default_config())).collect(),
        }
    }
}

impl LayerTable {
    /// Built-in table with the given per-layer overrides applied.
    pub fn with_overrides(overrides: &HashMap<LayerKind, LayerConfig>) -> Self {
        let mut table = Self::default();
        for (kind, config) in overrides {
            table.configs.insert(*kind, config.clone());
        }
        table
    }

    pub fn get(&self, kind: LayerKind) -> LayerConfig {
        self.configs.get(&kind).cloned().unwrap_or_else(|| kind.default_config())
    }
}
