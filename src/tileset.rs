//! Tileset atlas mapping.
//!
//! The converter supports exactly one tileset, described by a
//! [`TilesetProfile`]. The profile turns source pixels into atlas cells and
//! atlas cells into the `source` and row parts of a tile-data triplet.
//! Godot resource paths for tilesets come from a [`ResourceTable`].

use crate::codec::{pixel_to_grid, GridCell, PixelPos, PACK_STRIDE};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Identifier of the tileset supported out of the box.
pub const DEFAULT_TILESET_IDENTIFIER: &str = "Main_tileset";

/// Placeholder resource used for tilesets missing from the table.
pub const FALLBACK_TILESET_PATH: &str = "res://tileset.tres";
/// Placeholder texture used for tilesets missing from the table.
pub const FALLBACK_TEXTURE_PATH: &str = "res://tileset.png";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TilesetError {
    #[error("unsupported tileset '{identifier}'")]
    Unsupported { identifier: String },
}

/// Geometry of the supported tileset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilesetProfile {
    /// LDtk tileset identifier
    #[serde(default = "default_identifier")]
    pub identifier: String,
    /// Tile size in pixels
    #[serde(default = "default_tile_grid_size")]
    pub tile_grid_size: i32,
    /// Number of atlas columns
    #[serde(default = "default_columns")]
    pub columns: i32,
    /// Number of atlas rows
    #[serde(default = "default_rows")]
    pub rows: i32,
}

fn default_identifier() -> String {
    DEFAULT_TILESET_IDENTIFIER.to_string()
}

fn default_tile_grid_size() -> i32 {
    16
}

fn default_columns() -> i32 {
    16
}

fn default_rows() -> i32 {
    16
}

impl Default for TilesetProfile {
    fn default() -> Self {
        Self {
            identifier: default_identifier(),
            tile_grid_size: default_tile_grid_size(),
            columns: default_columns(),
            rows: default_rows(),
        }
    }
}

/// A cell of the tileset image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AtlasCell {
    pub x: i32,
    pub y: i32,
}

impl TilesetProfile {
    pub fn pixel_width(&self) -> i32 {
        self.columns * self.tile_grid_size
    }

    pub fn pixel_height(&self) -> i32 {
        self.rows * self.tile_grid_size
    }

    /// Succeeds only for this profile's identifier.
    pub fn validate_tileset(&self, identifier: &str) -> Result<(), TilesetError> {
        if identifier == self.identifier {
            Ok(())
        } else {
            Err(TilesetError::Unsupported { identifier: identifier.to_string() })
        }
    }

    /// Atlas cell holding the given source pixel.
    pub fn resolve_atlas_cell(&self, source_pixel: PixelPos) -> AtlasCell {
        let GridCell { x, y } = pixel_to_grid(source_pixel, self.tile_grid_size);
        AtlasCell { x, y }
    }

    pub fn contains(&self, cell: AtlasCell) -> bool {
        cell.x >= 0 && cell.x < self.columns && cell.y >= 0 && cell.y < self.rows
    }

    /// Row value passed to the alternative encoding: the atlas row in
    /// source-pixel units.
    pub fn alternative_row(&self, cell: AtlasCell) -> i32 {
        cell.y.wrapping_mul(self.tile_grid_size)
    }
}

/// Encoded `source` integer: the atlas column in the high half.
#[inline]
pub fn encode_source(atlas_x: i32) -> i32 {
    atlas_x.wrapping_mul(PACK_STRIDE)
}

/// Godot resource paths of one tileset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePaths {
    /// `.tres` TileSet resource
    pub tileset: String,
    /// Texture2D image
    pub texture: String,
}

impl ResourcePaths {
    pub fn new(tileset: &str, texture: &str) -> Self {
        Self { tileset: tileset.to_string(), texture: texture.to_string() }
    }

    fn fallback() -> Self {
        Self::new(FALLBACK_TILESET_PATH, FALLBACK_TEXTURE_PATH)
    }
}

/// Tileset identifier -> resource paths. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceTable {
    entries: HashMap<String, ResourcePaths>,
    fallback: ResourcePaths,
}

impl Default for ResourceTable {
    fn default() -> Self {
        Self {
            entries: HashMap::from([(
                DEFAULT_TILESET_IDENTIFIER.to_string(),
                ResourcePaths::new(
                    "res://tilesets/main_tileset.tres",
                    "res://tilesets/main_tileset.png",
                ),
            )]),
            fallback: ResourcePaths::fallback(),
        }
    }
}

impl ResourceTable {
    /// Built-in table extended (or overridden) with the given entries.
    pub fn with_entries(entries: &HashMap<String, ResourcePaths>) -> Self {
        let mut table = Self::default();
        for (identifier, paths) in entries {
            table.entries.insert(identifier.clone(), paths.clone());
        }
        table
    }

    /// Paths for a tileset; never fails, unknown identifiers get the
    /// placeholder paths.
    pub fn resource_path(&self, identifier: &str) -> &ResourcePaths {
        self.entries.get(identifier).unwrap_or(&self.fallback)
    }
}
