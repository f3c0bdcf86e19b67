//! Config file handling.
//!
//! The file is searched in this order:
//! 1. The path passed explicitly (the `--config` flag)
//! 2. The path in the `GBDL_CONFIG` env var
//! 3. `config.toml` inside the XDG config dir (`$XDG_CONFIG_HOME/gelbooru-downloader` on Linux
//!    or `%APPDATA%/FerrahWolfeh/gelbooru-downloader` on Windows)
//!
//! Only the default location gets a sample file written when it doesn't exist yet.
use directories::ProjectDirs;
use log::debug;
use std::{
    env,
    fs::{create_dir_all, read_to_string, write},
    path::{Path, PathBuf},
};

use super::Config;
use crate::error::ConfigError;

const SAMPLE_CONFIG_TOML: &str = include_str!("sample.toml");

pub const CONFIG_ENV_VAR: &str = "GBDL_CONFIG";

/// Returns the default config file location.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let dirs = ProjectDirs::from("com", "FerrahWolfeh", "gelbooru-downloader")
        .ok_or(ConfigError::NoConfigDir)?;

    Ok(dirs.config_dir().join("config.toml"))
}

/// Parses the contents of a config file.
pub fn parse_config(contents: &str) -> Result<Config, ConfigError> {
    Ok(toml::from_str(contents)?)
}

/// Reads a config file. Missing files are an error.
pub fn read_config_file(path: &Path) -> Result<Config, ConfigError> {
    let contents = read_to_string(path)?;
    let config = parse_config(&contents)?;

    debug!("Loaded config from {}: {:?}", path.display(), config);
    Ok(config)
}

/// Resolves and reads the config file, following the search order described in the module docs.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    let env_path = env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
    load_config_from(explicit, env_path.as_deref(), default_config_path)
}

fn load_config_from(
    explicit: Option<&Path>,
    env_path: Option<&Path>,
    default_path: impl FnOnce() -> Result<PathBuf, ConfigError>,
) -> Result<Config, ConfigError> {
    if let Some(path) = explicit.or(env_path) {
        return read_config_file(path);
    }

    let path = default_path()?;

    if !path.exists() {
        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }
        write(&path, SAMPLE_CONFIG_TOML)?;
        debug!("Wrote sample config to {}", path.display());
    }

    read_config_file(&path)
}
