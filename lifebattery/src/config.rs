//! # Configuration
//!
//! Application settings, read from `config.yaml` in the data directory (or a
//! path given on the command line). Every field is optional in the file.

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::backend::domain::models::ProfileType;
use crate::backend::domain::StoreSettings;
use crate::backend::storage::DEFAULT_KEY_PREFIX;

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "LIFEBATTERY_DATA_DIR";
pub const CONFIG_FILE_NAME: &str = "config.yaml";
const APP_DIRECTORY_NAME: &str = "LifeBattery";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where stored values live; platform data directory when absent
    pub data_directory: Option<PathBuf>,
    pub key_prefix: String,
    /// Name of the profile created from legacy single-profile data
    pub default_profile_name: String,
    pub human_lifespan_years: u32,
    pub pet_lifespan_years: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_directory: None,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            default_profile_name: "Me".to_string(),
            human_lifespan_years: ProfileType::Human.default_lifespan_years(),
            pet_lifespan_years: ProfileType::Pet.default_lifespan_years(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `path`, or from the default location if it exists
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = default_data_directory()?.join(CONFIG_FILE_NAME);
                if default_path.exists() {
                    Self::from_file(&default_path)
                } else {
                    debug!("No config file at {}, using defaults", default_path.display());
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let yaml = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_yaml(&yaml)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.default_profile_name.trim().is_empty() {
            return Err(anyhow!("default_profile_name cannot be empty"));
        }
        if self.human_lifespan_years == 0 || self.pet_lifespan_years == 0 {
            return Err(anyhow!("Default lifespans must be positive"));
        }
        Ok(())
    }

    /// Data directory: environment override, then config, then platform default
    pub fn resolve_data_directory(&self) -> Result<PathBuf> {
        self.resolve_data_directory_with(std::env::var(DATA_DIR_ENV).ok())
    }

    fn resolve_data_directory_with(&self, env_override: Option<String>) -> Result<PathBuf> {
        if let Some(dir) = env_override.filter(|d| !d.trim().is_empty()) {
            return Ok(PathBuf::from(dir));
        }
        match &self.data_directory {
            Some(dir) => Ok(dir.clone()),
            None => default_data_directory(),
        }
    }

    /// Lifespan suggested for a new profile of the given type
    pub fn default_lifespan_for(&self, profile_type: ProfileType) -> u32 {
        match profile_type {
            ProfileType::Human => self.human_lifespan_years,
            ProfileType::Pet => self.pet_lifespan_years,
        }
    }

    pub fn store_settings(&self) -> StoreSettings {
        StoreSettings {
            key_prefix: self.key_prefix.clone(),
            default_profile_name: self.default_profile_name.clone(),
        }
    }
}

/// `$LIFEBATTERY_DATA_DIR`, else the platform data directory
pub fn default_data_directory() -> Result<PathBuf> {
    if let Some(dir) = std::env::var(DATA_DIR_ENV).ok().filter(|d| !d.trim().is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIRECTORY_NAME))
        .ok_or_else(|| anyhow!("Could not determine the platform data directory"))
}
