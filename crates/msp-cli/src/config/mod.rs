//! Configuration management.

use anyhow::{Context as _, Result};
use directories::ProjectDirs;
use msp_service::SubjectDefaults;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::output::OutputFormat;

/// Overrides the config file location.
pub const CONFIG_ENV: &str = "MSPCTL_CONFIG";

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Where organization and identity records are kept.
    pub data_dir: Option<PathBuf>,

    /// Default output format.
    pub output_format: Option<OutputFormat>,

    /// Subject fields used when `org create` leaves them out.
    pub default_country: Option<String>,
    pub default_province: Option<String>,
    pub default_locality: Option<String>,
    pub default_postal_code: Option<String>,
}

impl Config {
    /// Get the config file path.
    pub fn path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }
        let dirs = project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load configuration from `path`; a missing file is an empty config.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Config =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Set a key by name, as used by `config set`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "data_dir" => self.data_dir = Some(PathBuf::from(value)),
            "output_format" | "output" => self.output_format = Some(value.parse()?),
            "default_country" | "country" => self.default_country = Some(value.to_string()),
            "default_province" | "province" => self.default_province = Some(value.to_string()),
            "default_locality" | "locality" => self.default_locality = Some(value.to_string()),
            "default_postal_code" | "postal_code" => {
                self.default_postal_code = Some(value.to_string());
            }
            _ => anyhow::bail!(
                "Unknown config key: {key}\n\n\
                 Available keys:\n  \
                 data_dir             - Directory holding organization and identity records\n  \
                 output_format        - Default output format (pretty/json/yaml)\n  \
                 default_country      - Subject country for new organizations\n  \
                 default_province     - Subject province for new organizations\n  \
                 default_locality     - Subject locality for new organizations\n  \
                 default_postal_code  - Subject postal code for new organizations"
            ),
        }
        Ok(())
    }

    /// Subject defaults with configured values layered over the built-in ones.
    pub fn subject_defaults(&self) -> SubjectDefaults {
        let base = SubjectDefaults::default();
        SubjectDefaults {
            country: self.default_country.clone().unwrap_or(base.country),
            province: self.default_province.clone().unwrap_or(base.province),
            locality: self.default_locality.clone().unwrap_or(base.locality),
            postal_code: self.default_postal_code.clone().unwrap_or(base.postal_code),
        }
    }

    /// Data directory from the config, falling back to the platform data dir.
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(project_dirs()?.data_dir().to_path_buf()),
        }
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("org", "msp", "mspctl")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
}
