//! Application configuration loaded from YAML.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::identifier::validate_identifier;
use crate::error::{AcctError, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub templates: TemplateConfig,
}

/// Connection and schema settings for the backing database.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub database: String,
    pub user: String,
    #[serde(default)]
    pub password: String,
    /// Schema all generated and templated SQL is qualified with.
    #[serde(default = "default_schema")]
    pub schema: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
}

/// Where `.sql` template files are loaded from.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TemplateConfig {
    #[serde(default = "default_template_dir")]
    pub dir: PathBuf,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            dir: default_template_dir(),
        }
    }
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    5432
}

fn default_schema() -> String {
    "accounting".to_string()
}

fn default_pool_size() -> usize {
    4
}

fn default_template_dir() -> PathBuf {
    PathBuf::from("templates")
}

impl Config {
    /// Load and validate configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.database.database.is_empty() {
            return Err(AcctError::Schema("database name is empty".to_string()));
        }
        if self.database.user.is_empty() {
            return Err(AcctError::Schema("database user is empty".to_string()));
        }
        if self.database.pool_size == 0 {
            return Err(AcctError::Schema(
                "database pool_size must be at least 1".to_string(),
            ));
        }
        validate_identifier(&self.database.schema)?;
        Ok(())
    }
}
