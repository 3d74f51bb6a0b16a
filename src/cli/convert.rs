//! Convert command implementation

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::loader::{load_config, merge_cli_overrides, CliOverrides};
use crate::convert::{ConversionResult, Converter};
use crate::export::{Exporter, TscnExporter};

use super::{find_ldtk_files, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Forward a result's diagnostics to the logger.
pub(crate) fn log_diagnostics(input: &Path, result: &ConversionResult) {
    for diagnostic in &result.warnings {
        if diagnostic.is_warning() {
            log::warn!("{}: {}", input.display(), diagnostic);
        } else {
            log::info!("{}: {}", input.display(), diagnostic);
        }
    }
}

/// Gather explicit inputs plus everything found under `dir`.
fn collect_inputs(inputs: &[PathBuf], dir: Option<&Path>) -> Result<Vec<PathBuf>, String> {
    let mut files = inputs.to_vec();
    if let Some(dir) = dir {
        if !dir.is_dir() {
            return Err(format!("'{}' is not a directory", dir.display()));
        }
        files.extend(find_ldtk_files(dir));
    }
    Ok(files)
}

/// Execute the convert command
pub fn run_convert(
    inputs: &[PathBuf],
    dir: Option<&Path>,
    output: Option<&Path>,
    level: Option<&str>,
    no_collisions: bool,
    no_shadows: bool,
    no_background: bool,
    sort_layers: bool,
    seed: Option<u64>,
    config_path: Option<&Path>,
    strict: bool,
    stdout: bool,
) -> ExitCode {
    let files = match collect_inputs(inputs, dir) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    if files.is_empty() {
        eprintln!("Error: No .ldtk files to convert");
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let single_target = stdout || output.is_some_and(|o| o.extension().is_some());
    if single_target && files.len() > 1 {
        eprintln!("Error: --stdout and a file --output require exactly one input");
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let mut config = match load_config(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    let overrides = CliOverrides {
        no_collisions,
        no_shadows,
        no_background,
        sort_layers: sort_layers.then_some(true),
        seed,
    };
    merge_cli_overrides(&mut config, &overrides);

    let settings = config.to_settings();
    let converter = Converter::new(&settings);
    let exporter = TscnExporter::new(settings.resources.clone(), settings.seed);

    let mut failures = 0usize;
    let mut warnings = 0usize;

    let mut written: HashSet<PathBuf> = HashSet::new();

    for input in &files {
        let result = match converter.convert_file(input, level) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Error: {}: {}", input.display(), e);
                failures += 1;
                continue;
            }
        };

        log_diagnostics(input, &result);
        warnings += result.warning_count();

        if stdout {
            print!("{}", exporter.export_to_string(&result));
            continue;
        }

        let target = match output {
            Some(o) => o.to_path_buf(),
            None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
        };
        let scene_path = exporter.output_path(&result, &target);
        if !written.insert(scene_path.clone()) {
            eprintln!(
                "Error: {}: level '{}' would overwrite '{}' from this run",
                input.display(),
                result.level,
                scene_path.display()
            );
            failures += 1;
            continue;
        }
        match exporter.export(&result, &target) {
            Ok(path) => println!("Saved: {} ({} tiles)", path.display(), result.total_tiles()),
            Err(e) => {
                eprintln!("Error: Failed to save '{}': {}", target.display(), e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        eprintln!("Error: {} of {} file(s) failed to convert", failures, files.len());
        return ExitCode::from(EXIT_ERROR);
    }

    if strict && warnings > 0 {
        eprintln!("Error: {} warning(s) treated as errors (--strict)", warnings);
        return ExitCode::from(EXIT_ERROR);
    }

    ExitCode::from(EXIT_SUCCESS)
}
