//! Data models for LDtk documents and the layers this converter understands

mod document;
mod layer;
mod tile;

// Re-export all public types
pub use document::{
    parse_document, Definitions, LayerInstance, LdtkDocument, Level, TilesetDef,
    LDTK_FILE_TYPE,
};
pub use layer::{Color, LayerConfig, LayerKind, LayerTable};
pub use tile::{GridTile, MalformedTile};
