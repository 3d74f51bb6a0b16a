//! Configuration loading and discovery for `ldtk2tscn.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::Ldtk2TscnConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = "ldtk2tscn.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse ldtk2tscn.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", bullet_list(.0))]
    Validation(Vec<String>),
}

fn bullet_list(items: &[String]) -> String {
    items.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n")
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Exclude the collisions layer
    pub no_collisions: bool,
    /// Exclude the wall-shadows layer
    pub no_shadows: bool,
    /// Exclude the background layer
    pub no_background: bool,
    /// Sort layers by z-index
    pub sort_layers: Option<bool>,
    /// Override the UID seed
    pub seed: Option<u64>,
}

/// Locate the config file used when `--config` is not given.
///
/// The nearest `ldtk2tscn.toml` in the working directory or one of its
/// parents wins; the per-user file from [`find_xdg_config`] is the last
/// resort.
pub fn find_config() -> Option<PathBuf> {
    env::current_dir().ok().and_then(|cwd| find_config_from(&cwd)).or_else(find_xdg_config)
}

/// The per-user config, `$XDG_CONFIG_HOME/ldtk2tscn/ldtk2tscn.toml`.
///
/// Without `XDG_CONFIG_HOME` the base is `$HOME/.config`. `None` unless
/// the file exists.
pub fn find_xdg_config() -> Option<PathBuf> {
    let base = match env::var_os("XDG_CONFIG_HOME") {
        Some(dir) => PathBuf::from(dir),
        None => PathBuf::from(env::var_os("HOME")?).join(".config"),
    };
    let candidate = base.join("ldtk2tscn").join(CONFIG_FILE_NAME);
    candidate.is_file().then_some(candidate)
}

/// First `ldtk2tscn.toml` found in `start` or any directory above it.
pub fn find_config_from(start: &Path) -> Option<PathBuf> {
    start.ancestors().map(|dir| dir.join(CONFIG_FILE_NAME)).find(|candidate| candidate.is_file())
}

/// Load configuration.
///
/// If a path is provided, loads from that file (a missing file is an
/// error). Otherwise, uses [`find_config`]; when nothing is found the
/// built-in defaults are returned.
pub fn load_config(path: Option<&Path>) -> Result<Ldtk2TscnConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => {
            log::debug!("loading config from {}", p.display());
            load_config_file(&p)
        }
        None => Ok(default_config()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<Ldtk2TscnConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: Ldtk2TscnConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    Ok(config)
}

/// Get the default configuration (used when no ldtk2tscn.toml is found).
pub fn default_config() -> Ldtk2TscnConfig {
    Ldtk2TscnConfig::default()
}

/// Merge CLI overrides into a configuration.
///
/// Exclusion flags can only turn layers off; they never re-enable a layer
/// the config file excludes.
pub fn merge_cli_overrides(config: &mut Ldtk2TscnConfig, overrides: &CliOverrides) {
    let options = &mut config.convert.options;
    if overrides.no_collisions {
        options.include_collisions = false;
    }
    if overrides.no_shadows {
        options.include_shadows = false;
    }
    if overrides.no_background {
        options.include_background = false;
    }

    if let Some(sort_layers) = overrides.sort_layers {
        config.convert.sort_layers = sort_layers;
    }

    if let Some(seed) = overrides.seed {
        config.output.seed = Some(seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_current_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join(CONFIG_FILE_NAME);
        File::create(&config_path)
            .expect("should create config file")
            .write_all(b"[output]\nseed = 1")
            .expect("should write config content");

        let found = find_config_from(temp.path());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_in_parent_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join(CONFIG_FILE_NAME);
        File::create(&config_path).expect("should create config file");

        let subdir = temp.path().join("levels").join("world");
        fs::create_dir_all(&subdir).expect("should create subdirectories");

        let found = find_config_from(&subdir);
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_not_found() {
        let temp = TempDir::new().expect("should create temp dir");
        let found = find_config_from(temp.path());
        assert_eq!(found, None);
    }

    #[test]
    fn test_find_config_skips_directory_with_config_name() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join(CONFIG_FILE_NAME);
        File::create(&config_path).expect("should create config file");

        let subdir = temp.path().join("levels");
        fs::create_dir_all(subdir.join(CONFIG_FILE_NAME)).expect("should create decoy dir");

        assert_eq!(find_config_from(&subdir), Some(config_path));
    }

    #[test]
    #[serial]
    fn test_find_xdg_config() {
        let temp = TempDir::new().expect("should create temp dir");
        let dir = temp.path().join("ldtk2tscn");
        fs::create_dir_all(&dir).expect("should create xdg dir");
        File::create(dir.join(CONFIG_FILE_NAME)).expect("should create config file");

        let previous = env::var_os("XDG_CONFIG_HOME");
        env::set_var("XDG_CONFIG_HOME", temp.path());
        let found = find_xdg_config();
        match previous {
            Some(v) => env::set_var("XDG_CONFIG_HOME", v),
            None => env::remove_var("XDG_CONFIG_HOME"),
        }

        assert_eq!(found, Some(dir.join(CONFIG_FILE_NAME)));
    }

    #[test]
    fn test_load_config_from_file() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join(CONFIG_FILE_NAME);
        File::create(&config_path)
            .expect("should create config file")
            .write_all(
                br#"
[convert]
include_background = false

[tileset]
identifier = "Cave"
"#,
            )
            .expect("should write config content");

        let config = load_config(Some(&config_path)).expect("should load valid config");
        assert!(!config.convert.options.include_background);
        assert_eq!(config.tileset.identifier, "Cave");
        assert_eq!(config.tileset.tile_grid_size, 16);
    }

    #[test]
    fn test_load_config_missing_file_is_error() {
        let temp = TempDir::new().expect("should create temp dir");
        let result = load_config(Some(&temp.path().join("nonexistent.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "this is not valid toml {{{").expect("should write config");

        let result = load_config(Some(&config_path));
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_validation_error() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "[tileset]\nidentifier = \"\"\ncolumns = 0\n")
            .expect("should write config");

        match load_config(Some(&config_path)) {
            Err(ConfigError::Validation(errors)) => {
                assert_eq!(errors.len(), 2);
                assert!(errors.iter().any(|e| e.starts_with("tileset.identifier")));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_merge_cli_overrides_exclusions() {
        let mut config = Ldtk2TscnConfig::default();
        let overrides = CliOverrides { no_shadows: true, ..Default::default() };

        merge_cli_overrides(&mut config, &overrides);
        assert!(config.convert.options.include_collisions);
        assert!(!config.convert.options.include_shadows);
        assert!(config.convert.options.include_background);
    }

    #[test]
    fn test_merge_cli_overrides_do_not_reenable() {
        let mut config = Ldtk2TscnConfig::default();
        config.convert.options.include_background = false;

        merge_cli_overrides(&mut config, &CliOverrides::default());
        assert!(!config.convert.options.include_background);
    }

    #[test]
    fn test_merge_cli_overrides_sort_and_seed() {
        let mut config = Ldtk2TscnConfig::default();
        config.output.seed = Some(1);
        let overrides =
            CliOverrides { sort_layers: Some(true), seed: Some(99), ..Default::default() };

        merge_cli_overrides(&mut config, &overrides);
        assert!(config.convert.sort_layers);
        assert_eq!(config.output.seed, Some(99));
    }
}
