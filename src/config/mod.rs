// src/config/mod.rs
mod schema;

use std::path::{Path, PathBuf};
use config::{Config as ConfigLoader, FileFormat};
use tracing::{info, warn, debug};

pub use schema::{Config, MakeConfig, MenuConfig};

use crate::error::{MakesResult, MakesError};

/// Centralized configuration handling
impl Config {
    /// Load configuration from a file, falling back to built-in defaults
    pub fn load(config_path: Option<&Path>) -> MakesResult<Self> {
        debug!("Loading configuration");

        let mut config_builder = ConfigLoader::builder();

        // Default configuration
        config_builder = config_builder.add_source(
            config::File::from_str(
                include_str!("../../config/default.toml"),
                FileFormat::Toml
            )
        );

        // User-provided configuration
        if let Some(path) = config_path {
            if path.exists() {
                config_builder = config_builder.add_source(config::File::from(path));
                info!("Loading user configuration from: {}", path.display());
            } else {
                warn!("Specified configuration file not found: {}", path.display());
            }
        } else if let Some(default_path) = Self::get_default_config_path() {
            if default_path.exists() {
                config_builder = config_builder.add_source(config::File::from(default_path.as_path()));
                info!("Loading default configuration from: {}", default_path.display());
            } else {
                debug!("No existing configuration found, using built-in defaults");
            }
        }

        // Environment variables, e.g. MAKES_MENU__MAX_SIZE
        config_builder = config_builder.add_source(
            config::Environment::with_prefix("MAKES")
                .prefix_separator("_")
                .separator("__")
        );

        let config: Config = config_builder
            .build()
            .map_err(|e| MakesError::ConfigError(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| MakesError::ConfigError(format!("Failed to parse configuration: {}", e)))?;

        Ok(config)
    }

    /// Get the default configuration path
    pub fn get_default_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".makes/config.toml"))
    }

    /// Write the default configuration to `path`, or to the default location
    pub fn init(path: Option<&Path>, force: bool) -> MakesResult<PathBuf> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::get_default_config_path().ok_or_else(|| {
                MakesError::ConfigError("Could not determine the home directory".to_string())
            })?,
        };

        // Check if config already exists
        if config_path.exists() && !force {
            return Err(MakesError::ConfigError(
                format!("Configuration already exists at {}. Use --force to overwrite.", config_path.display())
            ));
        }

        // Create parent directories
        if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| MakesError::FileError {
                    path: parent.to_path_buf(),
                    message: format!("Failed to create directory: {}", e),
                })?;
        }

        Config::default().save(&config_path)?;

        Ok(config_path)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> MakesResult<()> {
        let config_str = toml::to_string_pretty(self)
            .map_err(|e| MakesError::SerializationError(format!("Failed to serialize configuration: {}", e)))?;

        std::fs::write(path, config_str)
            .map_err(|e| MakesError::FileError {
                path: path.to_path_buf(),
                message: format!("Failed to write configuration: {}", e),
            })?;

        info!("Configuration saved to {}", path.display());

        Ok(())
    }
}
