//! LDtk project document (only the fields the converter reads).

use crate::convert::ConvertError;
use serde::Deserialize;
use serde_json::Value;

/// Value of `__header__.fileType` in LDtk project files.
pub const LDTK_FILE_TYPE: &str = "LDtk Project JSON";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LdtkDocument {
    #[serde(default)]
    pub json_version: Option<String>,
    pub defs: Definitions,
    pub levels: Vec<Level>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Definitions {
    pub tilesets: Vec<TilesetDef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TilesetDef {
    pub identifier: String,
    pub uid: i64,
    pub tile_grid_size: i32,
    /// Atlas image size; 0 when the project does not say
    #[serde(default)]
    pub px_wid: i32,
    #[serde(default)]
    pub px_hei: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub identifier: String,
    #[serde(default)]
    pub px_wid: i32,
    #[serde(default)]
    pub px_hei: i32,
    /// `None` when the level lives in a separate file
    #[serde(default)]
    pub layer_instances: Option<Vec<LayerInstance>>,
    #[serde(default)]
    pub external_rel_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerInstance {
    #[serde(rename = "__identifier")]
    pub identifier: String,
    #[serde(rename = "__gridSize", default)]
    pub grid_size: Option<i32>,
    #[serde(rename = "__tilesetDefUid", default)]
    pub tileset_def_uid: Option<i64>,
    #[serde(default)]
    pub override_tileset_uid: Option<i64>,
    #[serde(alias = "__opacity", default = "default_opacity")]
    pub opacity: f32,
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Raw tile records, read one at a time by the transcoder
    #[serde(default)]
    pub grid_tiles: Vec<Value>,
}

fn default_opacity() -> f32 {
    1.0
}

fn default_visible() -> bool {
    true
}

impl LdtkDocument {
    pub fn tileset_by_uid(&self, uid: i64) -> Option<&TilesetDef> {
        self.defs.tilesets.iter().find(|t| t.uid == uid)
    }

    pub fn level(&self, identifier: &str) -> Option<&Level> {
        self.levels.iter().find(|l| l.identifier == identifier)
    }

    pub fn level_identifiers(&self) -> Vec<String> {
        self.levels.iter().map(|l| l.identifier.clone()).collect()
    }
}

impl LayerInstance {
    /// Tileset uid in effect for this layer (override first).
    pub fn effective_tileset_uid(&self) -> Option<i64> {
        self.override_tileset_uid.or(self.tileset_def_uid)
    }
}

/// Parse and structurally validate an LDtk project.
///
/// Rejects files that declare another file type, and files whose `levels`
/// or `defs.tilesets` are missing or not arrays.
pub fn parse_document(content: &str) -> Result<LdtkDocument, ConvertError> {
    let value: Value = serde_json::from_str(content)?;
    validate_structure(&value)?;
    Ok(serde_json::from_value(value)?)
}

fn validate_structure(value: &Value) -> Result<(), ConvertError> {
    let root = value
        .as_object()
        .ok_or_else(|| ConvertError::InvalidDocument("top-level value is not an object".into()))?;

    if let Some(file_type) =
        root.get("__header__").and_then(|h| h.get("fileType")).and_then(Value::as_str)
    {
        if file_type != LDTK_FILE_TYPE {
            return Err(ConvertError::InvalidDocument(format!(
                "expected file type '{}', found '{}'",
                LDTK_FILE_TYPE, file_type
            )));
        }
    }

    if !root.get("levels").is_some_and(Value::is_array) {
        return Err(ConvertError::InvalidDocument("no 'levels' array".into()));
    }

    let has_tilesets =
        root.get("defs").and_then(|d| d.get("tilesets")).is_some_and(Value::is_array);
    if !has_tilesets {
        return Err(ConvertError::InvalidDocument("no 'defs.tilesets' array".into()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "__header__": { "fileType": "LDtk Project JSON", "app": "LDtk" },
        "jsonVersion": "1.5.3",
        "defs": { "tilesets": [ {
            "identifier": "Main_tileset", "uid": 7, "tileGridSize": 16,
            "pxWid": 256, "pxHei": 256
        } ] },
        "levels": [ {
            "identifier": "Level_0", "pxWid": 256, "pxHei": 128,
            "layerInstances": [ {
                "__identifier": "Collisions_baked", "__type": "Tiles", "__gridSize": 16,
                "__tilesetDefUid": 7, "opacity": 0.5, "visible": false,
                "gridTiles": [ { "px": [0, 0], "src": [16, 0], "f": 0 } ]
            } ]
        } ]
    }"#;

    #[test]
    fn test_parse_minimal() {
        let doc = parse_document(MINIMAL).unwrap();
        assert_eq!(doc.json_version.as_deref(), Some("1.5.3"));
        assert_eq!(doc.levels.len(), 1);
        let level = doc.level("Level_0").unwrap();
        assert_eq!(level.px_wid, 256);
        let layers = level.layer_instances.as_ref().unwrap();
        assert_eq!(layers[0].identifier, "Collisions_baked");
        assert_eq!(layers[0].grid_size, Some(16));
        assert_eq!(layers[0].effective_tileset_uid(), Some(7));
        assert_eq!(layers[0].opacity, 0.5);
        assert!(!layers[0].visible);
        assert_eq!(layers[0].grid_tiles.len(), 1);
        assert_eq!(doc.tileset_by_uid(7).unwrap().identifier, "Main_tileset");
        assert!(doc.tileset_by_uid(8).is_none());
    }

    #[test]
    fn test_layer_defaults() {
        let layer: LayerInstance =
            serde_json::from_str(r#"{ "__identifier": "Bg_textures_baked" }"#).unwrap();
        assert_eq!(layer.opacity, 1.0);
        assert!(layer.visible);
        assert!(layer.grid_tiles.is_empty());
        assert_eq!(layer.effective_tileset_uid(), None);
    }

    #[test]
    fn test_override_tileset_uid_wins() {
        let layer: LayerInstance = serde_json::from_str(
            r#"{
                "__identifier": "Bg_textures_baked",
                "__tilesetDefUid": 1,
                "overrideTilesetUid": 2
            }"#,
        )
        .unwrap();
        assert_eq!(layer.effective_tileset_uid(), Some(2));
    }

    #[test]
    fn test_rejects_other_file_type() {
        let err = parse_document(
            r#"{"__header__": {"fileType": "Tiled"}, "levels": [], "defs": {"tilesets": []}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConvertError::InvalidDocument(_)));
        assert!(err.to_string().contains("Tiled"));
    }

    #[test]
    fn test_rejects_missing_levels() {
        let err = parse_document(r#"{"defs": {"tilesets": []}}"#).unwrap_err();
        assert!(err.to_string().contains("levels"));
    }

    #[test]
    fn test_rejects_missing_tilesets() {
        let err = parse_document(r#"{"levels": [], "defs": {}}"#).unwrap_err();
        assert!(err.to_string().contains("defs.tilesets"));
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(matches!(parse_document("[1, 2]"), Err(ConvertError::InvalidDocument(_))));
        assert!(matches!(parse_document("not json"), Err(ConvertError::Json(_))));
    }

    #[test]
    fn test_external_level_has_no_layers() {
        let doc = parse_document(
            r#"{
                "levels": [
                    {"identifier": "L", "layerInstances": null, "externalRelPath": "a/L.ldtkl"}
                ],
                "defs": {"tilesets": []}
            }"#,
        )
        .unwrap();
        assert!(doc.levels[0].layer_instances.is_none());
        assert_eq!(doc.levels[0].external_rel_path.as_deref(), Some("a/L.ldtkl"));
    }
}
