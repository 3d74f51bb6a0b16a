//! Human-readable summary of a conversion.

use crate::convert::ConversionResult;
use crate::diagnostics::Diagnostic;
use crate::export::layer_node_names;
use serde::Serialize;

/// Estimated size of the header and resource declarations.
pub const ESTIMATED_HEADER_BYTES: usize = 350;
/// Estimated size of one TileMap node without tile data.
pub const ESTIMATED_LAYER_BYTES: usize = 160;
/// Estimated size of one tile's three integers in the data array.
pub const ESTIMATED_TILE_BYTES: usize = 24;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerPreview {
    /// Node name in the scene
    pub name: String,
    /// LDtk identifier
    pub identifier: String,
    pub tiles: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preview {
    pub level: String,
    pub level_size: [i32; 2],
    pub total_tiles: usize,
    pub layers: Vec<LayerPreview>,
    pub warnings: Vec<Diagnostic>,
    /// Linear estimate, not an exact size
    pub estimated_bytes: usize,
}

pub fn generate_preview(result: &ConversionResult) -> Preview {
    let layers: Vec<LayerPreview> = result
        .layers
        .iter()
        .zip(layer_node_names(&result.layers))
        .map(|(l, name)| LayerPreview {
            name,
            identifier: l.identifier.clone(),
            tiles: l.tile_count(),
        })
        .collect();
    let total_tiles = result.total_tiles();

    Preview {
        level: result.level.clone(),
        level_size: [result.level_size.0, result.level_size.1],
        total_tiles,
        estimated_bytes: ESTIMATED_HEADER_BYTES
            + ESTIMATED_LAYER_BYTES * layers.len()
            + ESTIMATED_TILE_BYTES * total_tiles,
        layers,
        warnings: result.warnings.clone(),
    }
}

impl std::fmt::Display for Preview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Level: {} ({}x{} px)", self.level, self.level_size[0], self.level_size[1])?;
        writeln!(f, "Layers: {}", self.layers.len())?;
        for layer in &self.layers {
            writeln!(f, "  - {} ({}): {} tiles", layer.name, layer.identifier, layer.tiles)?;
        }
        writeln!(f, "Total tiles: {}", self.total_tiles)?;
        writeln!(f, "Estimated size: ~{} bytes", self.estimated_bytes)?;
        if !self.warnings.is_empty() {
            writeln!(f, "Diagnostics: {}", self.warnings.len())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::TranscodedLayer;
    use crate::diagnostics::WarningCode;
    use crate::models::{LayerConfig, LayerKind};
    use crate::transcode::TileDataTriplet;

    fn result() -> ConversionResult {
        let tile = TileDataTriplet { position: 0, source: 0, alternative: 0 };
        let layer = |kind: LayerKind, n: usize| TranscodedLayer {
            kind,
            identifier: kind.identifier().to_string(),
            config: kind.default_config(),
            opacity: 1.0,
            visible: true,
            tileset: "Main_tileset".to_string(),
            triplets: vec![tile; n],
        };
        ConversionResult {
            level: "Level_0".to_string(),
            level_size: (320, 240),
            layers: vec![layer(LayerKind::Collisions, 3), layer(LayerKind::Background, 10)],
            warnings: vec![Diagnostic::new(WarningCode::MalformedTile, "bad")],
        }
    }

    #[test]
    fn test_counts() {
        let preview = generate_preview(&result());
        assert_eq!(preview.total_tiles, 13);
        assert_eq!(preview.layers[0].tiles, 3);
        assert_eq!(preview.layers[1].name, "Background");
        assert_eq!(preview.warnings.len(), 1);
    }

    #[test]
    fn test_estimate_is_linear() {
        let preview = generate_preview(&result());
        assert_eq!(preview.estimated_bytes, 350 + 2 * 160 + 13 * 24);
    }

    #[test]
    fn test_display() {
        let text = generate_preview(&result()).to_string();
        assert!(text.contains("Level: Level_0 (320x240 px)"));
        assert!(text.contains("  - Collisions (Collisions_baked): 3 tiles"));
        assert!(text.contains("Total tiles: 13"));
        assert!(text.contains("Diagnostics: 1"));
    }

    #[test]
    fn test_serializes_to_json() {
        let json = serde_json::to_value(generate_preview(&result())).unwrap();
        assert_eq!(json["total_tiles"], 13);
        assert_eq!(json["layers"][0]["identifier"], "Collisions_baked");
        assert_eq!(json["warnings"][0]["code"], "malformed_tile");
    }

    #[test]
    fn test_names_match_scene_nodes() {
        let mut r = result();
        r.layers[0].config = LayerConfig::new("Ground", 0);
        r.layers[1].config = LayerConfig::new("Ground", -1);
        let names: Vec<String> = generate_preview(&r).layers.into_iter().map(|l| l.name).collect();
        assert_eq!(names, vec!["Ground", "Ground_2"]);
    }
}
