//! Inspection command implementations (preview, levels)

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use crate::config::loader::load_config;
use crate::convert::Converter;
use crate::models::{parse_document, LayerKind, Level};
use crate::preview::generate_preview;

use super::convert::log_diagnostics;
use super::{EXIT_ERROR, EXIT_SUCCESS};

/// Execute the preview command
pub fn run_preview(
    input: &Path,
    level: Option<&str>,
    json: bool,
    config_path: Option<&Path>,
) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let settings = config.to_settings();
    let result = match Converter::new(&settings).convert_file(input, level) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}: {}", input.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let preview = generate_preview(&result);
    if json {
        match serde_json::to_string_pretty(&preview) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    } else {
        log_diagnostics(input, &result);
        print!("{}", preview);
    }

    ExitCode::from(EXIT_SUCCESS)
}

/// One line per level: identifier, size and the recognized layers it has.
fn describe_level(level: &Level) -> String {
    let layers = match &level.layer_instances {
        None => match &level.external_rel_path {
            Some(path) => format!("external ({})", path),
            None => "external".to_string(),
        },
        Some(instances) => {
            let recognized: Vec<&str> = instances
                .iter()
                .filter(|l| LayerKind::from_identifier(&l.identifier).is_some())
                .map(|l| l.identifier.as_str())
                .collect();
            if recognized.is_empty() {
                "no recognized layers".to_string()
            } else {
                recognized.join(", ")
            }
        }
    };
    format!("{} ({}x{} px): {}", level.identifier, level.px_wid, level.px_hei, layers)
}

/// Execute the levels command
pub fn run_levels(input: &Path) -> ExitCode {
    let content = match fs::read_to_string(input) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: Cannot read input file '{}': {}", input.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let document = match parse_document(&content) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error: {}: {}", input.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    for level in &document.levels {
        println!("{}", describe_level(level));
    }

    ExitCode::from(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(json: &str) -> Level {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_describe_level_lists_recognized_layers() {
        let level = level(
            r#"{
                "identifier": "Level_0", "pxWid": 256, "pxHei": 128,
                "layerInstances": [
                    {"__identifier": "Entities", "gridTiles": []},
                    {"__identifier": "Collisions_baked", "gridTiles": []},
                    {"__identifier": "Bg_textures_baked", "gridTiles": []}
                ]
            }"#,
        );
        assert_eq!(
            describe_level(&level),
            "Level_0 (256x128 px): Collisions_baked, Bg_textures_baked"
        );
    }

    #[test]
    fn test_describe_external_level() {
        let far = level(
            r#"{"identifier": "Far", "pxWid": 16, "pxHei": 16, "externalRelPath": "w/Far.ldtkl"}"#,
        );
        assert_eq!(describe_level(&far), "Far (16x16 px): external (w/Far.ldtkl)");

        let near = level(r#"{"identifier": "Near", "pxWid": 8, "pxHei": 8}"#);
        assert_eq!(describe_level(&near), "Near (8x8 px): external");
    }
}
