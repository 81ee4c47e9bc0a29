use crate::core::anonymize::ValueEnvelope;
use crate::core::model::{Account, Category, Holding, Instrument};
use crate::core::portfolio::Portfolio;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AnonymizeConfig {
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "AnonymizeConfig::default_min_value")]
    pub min_value: f64,
    #[serde(default = "AnonymizeConfig::default_max_value")]
    pub max_value: f64,
}

impl AnonymizeConfig {
    fn default_min_value() -> f64 {
        ValueEnvelope::default().min_value
    }

    fn default_max_value() -> f64 {
        ValueEnvelope::default().max_value
    }

    pub fn envelope(&self) -> ValueEnvelope {
        ValueEnvelope {
            min_value: self.min_value,
            max_value: self.max_value,
        }
    }
}

impl Default for AnonymizeConfig {
    fn default() -> Self {
        AnonymizeConfig {
            seed: 0,
            min_value: Self::default_min_value(),
            max_value: Self::default_max_value(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "AppConfig::default_currency")]
    pub currency: String,
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub instruments: Vec<Instrument>,
    #[serde(default)]
    pub holdings: Vec<Holding>,
    /// Instrument used by `compare`.
    pub benchmark: Option<String>,
    /// Instrument quoting gold per gram, used by `gold`.
    pub gold: Option<String>,
    #[serde(default)]
    pub anonymize: AnonymizeConfig,
    pub data_path: Option<String>,
}

impl AppConfig {
    fn default_currency() -> String {
        "EUR".to_string()
    }

    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("org", "aurum", "aurum")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("org", "aurum", "aurum")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Resolves the configured records into a [`Portfolio`].
    pub fn portfolio(&self) -> Portfolio {
        Portfolio::new(
            self.instruments.clone(),
            self.accounts.clone(),
            self.categories.clone(),
            self.holdings.clone(),
        )
    }
}
