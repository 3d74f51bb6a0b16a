//! Layer transcoding: LDtk grid tiles -> Godot tile-data triplets.

use crate::codec::{
    encode_alternative, encode_position, extract_flip_flags, pixel_to_grid, unknown_flip_bits,
    FlipFlags,
};
use crate::diagnostics::{Diagnostic, WarningCode};
use crate::models::{GridTile, LayerInstance, LdtkDocument, TilesetDef};
use crate::tileset::{encode_source, TilesetProfile};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One placed tile in Godot's `tile_data` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TileDataTriplet {
    pub position: i32,
    pub source: i32,
    pub alternative: i32,
}

impl TileDataTriplet {
    pub fn to_array(&self) -> [i32; 3] {
        [self.position, self.source, self.alternative]
    }
}

/// Capabilities of the Godot version the scene is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetProfile {
    /// Whether flip flags can be stored in the alternative value
    #[serde(default = "default_flip_transforms")]
    pub flip_transforms: bool,
}

fn default_flip_transforms() -> bool {
    true
}

impl Default for TargetProfile {
    fn default() -> Self {
        Self { flip_transforms: true }
    }
}

/// Applies the codec and the tileset profile to whole layers.
#[derive(Debug, Clone, Copy)]
pub struct LayerTranscoder<'a> {
    profile: &'a TilesetProfile,
    target: &'a TargetProfile,
}

impl<'a> LayerTranscoder<'a> {
    pub fn new(profile: &'a TilesetProfile, target: &'a TargetProfile) -> Self {
        Self { profile, target }
    }

    /// Find and validate the tileset a layer draws from.
    ///
    /// Returns `None`, with a warning, when the layer has to be dropped.
    pub fn resolve_tileset<'d>(
        &self,
        document: &'d LdtkDocument,
        layer: &LayerInstance,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<&'d TilesetDef> {
        let context = format!("layer {}", layer.identifier);

        let Some(uid) = layer.effective_tileset_uid() else {
            diagnostics.push(
                Diagnostic::new(WarningCode::MissingTileset, "layer has no tileset, skipped")
                    .with_context(context),
            );
            return None;
        };

        let Some(def) = document.tileset_by_uid(uid) else {
            diagnostics.push(
                Diagnostic::new(
                    WarningCode::UnknownTilesetUid,
                    format!("tileset uid {} has no definition, layer skipped", uid),
                )
                .with_context(context),
            );
            return None;
        };

        if let Err(e) = self.profile.validate_tileset(&def.identifier) {
            diagnostics.push(
                Diagnostic::new(WarningCode::UnsupportedTileset, format!("{}, layer skipped", e))
                    .with_context(context),
            );
            return None;
        }

        if def.tile_grid_size != self.profile.tile_grid_size {
            diagnostics.push(
                Diagnostic::new(
                    WarningCode::GridSizeMismatch,
                    format!(
                        "tileset '{}' declares {}px tiles, using {}px",
                        def.identifier, def.tile_grid_size, self.profile.tile_grid_size
                    ),
                )
                .with_context(context.clone()),
            );
        }

        let expected = (self.profile.pixel_width(), self.profile.pixel_height());
        if def.px_wid > 0 && def.px_hei > 0 && (def.px_wid, def.px_hei) != expected {
            diagnostics.push(
                Diagnostic::new(
                    WarningCode::TilesetSizeMismatch,
                    format!(
                        "tileset '{}' image is {}x{} px, expected {}x{}",
                        def.identifier, def.px_wid, def.px_hei, expected.0, expected.1
                    ),
                )
                .with_context(context),
            );
        }

        Some(def)
    }

    /// Level grid size for a layer: its own `__gridSize` when usable.
    pub fn grid_size(&self, layer: &LayerInstance) -> i32 {
        match layer.grid_size {
            Some(size) if size > 0 => size,
            _ => self.profile.tile_grid_size,
        }
    }

    /// Transcode every tile of a layer.
    ///
    /// Bad records are skipped with a warning. The result is sorted by grid
    /// row, then column; tiles sharing a cell keep their document order.
    pub fn transcode(
        &self,
        layer: &LayerInstance,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<TileDataTriplet> {
        let grid_size = self.grid_size(layer);
        let mut keyed = Vec::with_capacity(layer.grid_tiles.len());
        let mut per_cell: HashMap<(i32, i32), usize> = HashMap::new();
        let mut dropped_flips = 0usize;
        let mut odd_flip_masks = 0usize;

        for (index, raw) in layer.grid_tiles.iter().enumerate() {
            let tile_context = || format!("layer {}, tile #{}", layer.identifier, index);

            let tile = match GridTile::from_value(raw) {
                Ok(tile) => tile,
                Err(e) => {
                    log::debug!("{}: {}", tile_context(), e);
                    diagnostics.push(
                        Diagnostic::new(WarningCode::MalformedTile, format!("{}, tile skipped", e))
                            .with_context(tile_context()),
                    );
                    continue;
                }
            };

            let cell = pixel_to_grid(tile.pixel_position, grid_size);
            if !cell.is_encodable() {
                diagnostics.push(
                    Diagnostic::new(
                        WarningCode::CellOutOfRange,
                        format!(
                            "grid cell ({}, {}) cannot be encoded, tile skipped",
                            cell.x, cell.y
                        ),
                    )
                    .with_context(tile_context()),
                );
                continue;
            }

            let atlas = self.profile.resolve_atlas_cell(tile.source_pixel);
            if !self.profile.contains(atlas) {
                diagnostics.push(
                    Diagnostic::new(
                        WarningCode::AtlasOutOfBounds,
                        format!(
                            "atlas cell ({}, {}) is outside the {}x{} tileset, tile skipped",
                            atlas.x, atlas.y, self.profile.columns, self.profile.rows
                        ),
                    )
                    .with_context(tile_context()),
                );
                continue;
            }

            if unknown_flip_bits(tile.flip_mask) != 0 {
                odd_flip_masks += 1;
            }
            let mut flip = extract_flip_flags(tile.flip_mask);
            if flip.is_flipped() && !self.target.flip_transforms {
                dropped_flips += 1;
                flip = FlipFlags::NONE;
            }

            *per_cell.entry(cell.row_major_key()).or_default() += 1;
            keyed.push((
                cell.row_major_key(),
                TileDataTriplet {
                    position: encode_position(cell),
                    source: encode_source(atlas.x),
                    alternative: encode_alternative(self.profile.alternative_row(atlas), flip),
                },
            ));
        }

        let layer_context = || format!("layer {}", layer.identifier);
        if dropped_flips > 0 {
            diagnostics.push(
                Diagnostic::new(
                    WarningCode::FlipUnsupported,
                    format!(
                        "{} flipped tile(s) emitted unflipped, target cannot store flips",
                        dropped_flips
                    ),
                )
                .with_context(layer_context()),
            );
        }
        if odd_flip_masks > 0 {
            diagnostics.push(
                Diagnostic::new(
                    WarningCode::UnknownFlipBits,
                    format!("{} tile(s) carry unknown flip bits, ignored", odd_flip_masks),
                )
                .with_context(layer_context()),
            );
        }
        let stacked = per_cell.values().filter(|&&n| n > 1).count();
        if stacked > 0 {
            diagnostics.push(
                Diagnostic::new(
                    WarningCode::StackedTiles,
                    format!("{} cell(s) hold more than one tile", stacked),
                )
                .with_context(layer_context()),
            );
        }

        // Stable: stacked tiles keep document order.
        keyed.sort_by_key(|(key, _)| *key);
        log::debug!("layer {}: {} tile(s) transcoded", layer.identifier, keyed.len());
        keyed.into_iter().map(|(_, triplet)| triplet).collect()
    }
}

/// Flatten triplets into `tile_data` order.
pub fn flatten(triplets: &[TileDataTriplet]) -> Vec<i32> {
    triplets.iter().flat_map(|t| t.to_array()).collect()
}
