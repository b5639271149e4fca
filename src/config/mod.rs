mod init;
mod schema;

pub use init::write_default_config;
pub use schema::{validate_config, Config};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.config/leadrank/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("leadrank"))
}

/// Get the default config file path (~/.config/leadrank/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Parse configuration from a YAML file
pub fn read_config_file(path: &Path) -> Result<Config> {
    let config_content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", path.display()))?;

    Ok(config)
}

/// Load configuration
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   (~/.config/leadrank/config.yaml) and falls back to built-in defaults
///   when that file does not exist.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found at {}", path.display());
            }
            read_config_file(&path)
        }
        None => {
            let default_path = get_config_path()?;
            if default_path.exists() {
                read_config_file(&default_path)
            } else {
                tracing::debug!(path = %default_path.display(), "no config file, using defaults");
                Ok(Config::default())
            }
        }
    }
}
