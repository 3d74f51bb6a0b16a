//! Structured diagnostics collected during a conversion.
//!
//! Recoverable problems (a skipped tile, a dropped layer, a flip that could
//! not be represented) never abort the pipeline. They are recorded as
//! [`Diagnostic`] values and returned alongside the conversion result so
//! callers can count them, print them, or fail in strict mode.

use serde::Serialize;

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational, output is complete
    Info,
    /// Output is missing data or has reduced fidelity
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Warning => write!(f, "WARNING"),
        }
    }
}

/// Kind of diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningCode {
    /// Grid tile record lacks `px`, `src` or `f`, or has the wrong shape
    MalformedTile,
    /// Layer tileset is not the supported tileset
    UnsupportedTileset,
    /// Layer references a tileset uid with no definition
    UnknownTilesetUid,
    /// Layer declares no tileset at all
    MissingTileset,
    /// Tile is flipped but the target profile cannot express flips
    FlipUnsupported,
    /// Flip mask carries bits other than X/Y flip
    UnknownFlipBits,
    /// Source pixel lies outside the tileset atlas
    AtlasOutOfBounds,
    /// Grid cell cannot be packed into a position integer
    CellOutOfRange,
    /// Tileset definition grid size differs from the supported profile
    GridSizeMismatch,
    /// Tileset definition image size differs from the supported profile
    TilesetSizeMismatch,
    /// Several tiles share one grid cell
    StackedTiles,
    /// Layer excluded by conversion options
    LayerExcluded,
}

impl WarningCode {
    /// Default severity for this kind of diagnostic.
    pub fn severity(&self) -> Severity {
        match self {
            WarningCode::StackedTiles | WarningCode::LayerExcluded => Severity::Info,
            _ => Severity::Warning,
        }
    }
}

impl std::fmt::Display for WarningCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            WarningCode::MalformedTile => "malformed_tile",
            WarningCode::UnsupportedTileset => "unsupported_tileset",
            WarningCode::UnknownTilesetUid => "unknown_tileset_uid",
            WarningCode::MissingTileset => "missing_tileset",
            WarningCode::FlipUnsupported => "flip_unsupported",
            WarningCode::UnknownFlipBits => "unknown_flip_bits",
            WarningCode::AtlasOutOfBounds => "atlas_out_of_bounds",
            WarningCode::CellOutOfRange => "cell_out_of_range",
            WarningCode::GridSizeMismatch => "grid_size_mismatch",
            WarningCode::TilesetSizeMismatch => "tileset_size_mismatch",
            WarningCode::StackedTiles => "stacked_tiles",
            WarningCode::LayerExcluded => "layer_excluded",
        };
        write!(f, "{}", code)
    }
}

/// A recoverable problem found while converting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: WarningCode,
    /// Human-readable message
    pub message: String,
    /// Where it happened (layer identifier, tile index, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl Diagnostic {
    /// Create a diagnostic with the code's default severity
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self { severity: code.severity(), code, message: message.into(), context: None }
    }

    /// Add context to this diagnostic
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}] {}", self.severity, self.code, self.message)?;
        if let Some(ref context) = self.context {
            write!(f, " ({})", context)?;
        }
        Ok(())
    }
}

/// Count diagnostics with `Warning` severity.
pub fn warning_count(diagnostics: &[Diagnostic]) -> usize {
    diagnostics.iter().filter(|d| d.is_warning()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_severity() {
        assert_eq!(WarningCode::MalformedTile.severity(), Severity::Warning);
        assert_eq!(WarningCode::FlipUnsupported.severity(), Severity::Warning);
        assert_eq!(WarningCode::LayerExcluded.severity(), Severity::Info);
        assert_eq!(WarningCode::StackedTiles.severity(), Severity::Info);
    }

    #[test]
    fn test_display() {
        let diag =
            Diagnostic::new(WarningCode::UnsupportedTileset, "tileset 'Other' not supported")
                .with_context("layer Collisions_baked");
        assert_eq!(
            diag.to_string(),
            "WARNING [unsupported_tileset] tileset 'Other' not supported (layer Collisions_baked)"
        );

        let info = Diagnostic::new(WarningCode::LayerExcluded, "excluded");
        assert_eq!(info.to_string(), "INFO [layer_excluded] excluded");
    }

    #[test]
    fn test_warning_count() {
        let diags = vec![
            Diagnostic::new(WarningCode::MalformedTile, "a"),
            Diagnostic::new(WarningCode::LayerExcluded, "b"),
            Diagnostic::new(WarningCode::CellOutOfRange, "c"),
        ];
        assert_eq!(warning_count(&diags), 2);
    }

    #[test]
    fn test_serialize_codes() {
        let diag = Diagnostic::new(WarningCode::AtlasOutOfBounds, "x");
        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(json["code"], "atlas_out_of_bounds");
        assert_eq!(json["severity"], "warning");
        assert!(json.get("context").is_none());
    }
}
