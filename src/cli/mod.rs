//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod convert;
mod preview;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use glob::glob;

/// Process exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Check if a path has the LDtk project extension (.ldtk).
pub fn is_ldtk_file(path: &Path) -> bool {
    matches!(path.extension().and_then(|e| e.to_str()), Some("ldtk"))
}

/// Find all LDtk projects in a directory (recursively), sorted by path.
pub fn find_ldtk_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let dir_str = dir.display().to_string();

    if let Ok(paths) = glob(&format!("{}/**/*.ldtk", dir_str)) {
        files.extend(paths.filter_map(Result::ok));
    }

    files.sort();
    files
}

/// ldtk2tscn - Convert LDtk levels into Godot TileMap scenes
#[derive(Parser)]
#[command(name = "ldtk2tscn")]
#[command(about = "ldtk2tscn - Convert LDtk levels (.ldtk) into Godot 4 TileMap scenes (.tscn)")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert one level of each LDtk project into a .tscn scene
    Convert {
        /// Input LDtk project file(s)
        #[arg(required_unless_present = "dir")]
        inputs: Vec<PathBuf>,

        /// Directory to scan for .ldtk files
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Output directory, or a .tscn path when converting a single input.
        /// If omitted: next to the input, named after the level
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Level identifier to convert (default: first level)
        #[arg(short, long)]
        level: Option<String>,

        /// Exclude the Collisions_baked layer
        #[arg(long)]
        no_collisions: bool,

        /// Exclude the Wall_shadows_baked layer
        #[arg(long)]
        no_shadows: bool,

        /// Exclude the Bg_textures_baked layer
        #[arg(long)]
        no_background: bool,

        /// Order TileMap nodes by z-index
        #[arg(long)]
        sort_layers: bool,

        /// Seed for resource UIDs (reproducible output)
        #[arg(long)]
        seed: Option<u64>,

        /// Path to ldtk2tscn.toml (default: discovered from the current directory)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Strict mode: treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Write the scene to stdout instead of a file
        #[arg(long, conflicts_with = "output")]
        stdout: bool,
    },

    /// Summarize what a conversion would produce without writing anything
    Preview {
        /// Input LDtk project file
        input: PathBuf,

        /// Level identifier (default: first level)
        #[arg(short, long)]
        level: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Path to ldtk2tscn.toml
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List the levels of an LDtk project
    Levels {
        /// Input LDtk project file
        input: PathBuf,
    },
}

/// Install the logger; `RUST_LOG` takes precedence over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Convert {
            inputs,
            dir,
            output,
            level,
            no_collisions,
            no_shadows,
            no_background,
            sort_layers,
            seed,
            config,
            strict,
            stdout,
        } => convert::run_convert(
            &inputs,
            dir.as_deref(),
            output.as_deref(),
            level.as_deref(),
            no_collisions,
            no_shadows,
            no_background,
            sort_layers,
            seed,
            config.as_deref(),
            strict,
            stdout,
        ),
        Commands::Preview { input, level, json, config } => {
            preview::run_preview(&input, level.as_deref(), json, config.as_deref())
        }
        Commands::Levels { input } => preview::run_levels(&input),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_is_ldtk_file() {
        assert!(is_ldtk_file(Path::new("world.ldtk")));
        assert!(is_ldtk_file(Path::new("path/to/world.ldtk")));
        assert!(!is_ldtk_file(Path::new("world.json")));
        assert!(!is_ldtk_file(Path::new("world.tscn")));
        assert!(!is_ldtk_file(Path::new("ldtk")));
        assert!(!is_ldtk_file(Path::new(".ldtk")));
    }

    #[test]
    fn test_find_ldtk_files() {
        use std::fs;
        use tempfile::TempDir;

        let temp_dir = TempDir::new().unwrap();
        let dir_path = temp_dir.path();

        fs::write(dir_path.join("b.ldtk"), "{}").unwrap();
        fs::write(dir_path.join("a.ldtk"), "{}").unwrap();
        fs::write(dir_path.join("notes.txt"), "ignored").unwrap();

        let sub_dir = dir_path.join("backups");
        fs::create_dir(&sub_dir).unwrap();
        fs::write(sub_dir.join("old.ldtk"), "{}").unwrap();

        let files = find_ldtk_files(dir_path);
        assert_eq!(files.len(), 3);
        assert!(files.iter().all(|f| is_ldtk_file(f)));
        assert_eq!(files[0].file_name().unwrap(), "a.ldtk");
    }

    #[test]
    fn test_parse_convert_flags() {
        let cli = Cli::try_parse_from([
            "ldtk2tscn",
            "-vv",
            "convert",
            "world.ldtk",
            "--no-shadows",
            "--seed",
            "7",
            "--level",
            "Level_1",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Convert { inputs, no_shadows, no_collisions, seed, level, .. } => {
                assert_eq!(inputs, vec![PathBuf::from("world.ldtk")]);
                assert!(no_shadows);
                assert!(!no_collisions);
                assert_eq!(seed, Some(7));
                assert_eq!(level.as_deref(), Some("Level_1"));
            }
            _ => panic!("expected convert command"),
        }
    }

    #[test]
    fn test_convert_requires_input_or_dir() {
        assert!(Cli::try_parse_from(["ldtk2tscn", "convert"]).is_err());
        assert!(Cli::try_parse_from(["ldtk2tscn", "convert", "--dir", "levels"]).is_ok());
    }

    #[test]
    fn test_stdout_conflicts_with_output() {
        let result =
            Cli::try_parse_from(["ldtk2tscn", "convert", "a.ldtk", "--stdout", "-o", "out"]);
        assert!(result.is_err());
    }
}
