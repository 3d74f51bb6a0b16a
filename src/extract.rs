//! Level and layer selection.

use crate::convert::ConvertError;
use crate::diagnostics::{Diagnostic, WarningCode};
use crate::models::{LayerInstance, LayerKind, LdtkDocument, Level};
use serde::{Deserialize, Serialize};

/// Which recognized layers to include. Every layer is included unless its
/// flag is explicitly false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionOptions {
    #[serde(default = "default_true")]
    pub include_collisions: bool,
    #[serde(default = "default_true")]
    pub include_shadows: bool,
    #[serde(default = "default_true")]
    pub include_background: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self { include_collisions: true, include_shadows: true, include_background: true }
    }
}

impl ConversionOptions {
    pub fn includes(&self, kind: LayerKind) -> bool {
        match kind {
            LayerKind::Collisions => self.include_collisions,
            LayerKind::WallShadows => self.include_shadows,
            LayerKind::Background => self.include_background,
        }
    }
}

/// A recognized layer chosen for conversion.
#[derive(Debug, Clone, Copy)]
pub struct SelectedLayer<'a> {
    pub kind: LayerKind,
    pub instance: &'a LayerInstance,
}

/// Find the requested level, or the first level when none is named.
pub fn find_level<'a>(
    document: &'a LdtkDocument,
    identifier: Option<&str>,
) -> Result<&'a Level, ConvertError> {
    match identifier {
        Some(id) => document.level(id).ok_or_else(|| ConvertError::LevelNotFound {
            identifier: id.to_string(),
            available: document.level_identifiers(),
        }),
        None => document.levels.first().ok_or_else(|| ConvertError::LevelNotFound {
            identifier: "<first level>".to_string(),
            available: Vec::new(),
        }),
    }
}

/// Layers of `level` that are recognized and not excluded, in document
/// order. Excluded layers are reported as info diagnostics.
pub fn select_layers<'a>(
    level: &'a Level,
    recognized: &[LayerKind],
    options: &ConversionOptions,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Vec<SelectedLayer<'a>>, ConvertError> {
    let instances = level
        .layer_instances
        .as_ref()
        .ok_or_else(|| ConvertError::ExternalLevel { identifier: level.identifier.clone() })?;

    let mut selected = Vec::new();
    for instance in instances {
        let Some(kind) = LayerKind::from_identifier(&instance.identifier) else {
            log::trace!("ignoring unrecognized layer '{}'", instance.identifier);
            continue;
        };
        if !recognized.contains(&kind) {
            continue;
        }
        if !options.includes(kind) {
            diagnostics.push(
                Diagnostic::new(WarningCode::LayerExcluded, "layer excluded by options")
                    .with_context(format!("layer {}", instance.identifier)),
            );
            continue;
        }
        selected.push(SelectedLayer { kind, instance });
    }

    if selected.is_empty() {
        return Err(ConvertError::NoLayers { level: level.identifier.clone() });
    }
    Ok(selected)
}
