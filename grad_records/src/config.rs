//! Configuration handling for GradRecords

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "db_config.toml";

/// Load configuration from a TOML file
pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    let config_str = fs::read_to_string(path).map_err(|e| {
        Error::ConfigError(format!("Failed to read config file {}: {}", path.display(), e))
    })?;

    let config = parse(&config_str)?;
    tracing::debug!(path = %path.display(), driver = %config.database.driver, "Loaded configuration");
    Ok(config)
}

/// Parse and validate configuration from a TOML string
pub fn parse(config_str: &str) -> Result<Config> {
    let config: Config = toml::from_str(config_str)
        .map_err(|e| Error::ConfigError(format!("Failed to parse config file: {}", e)))?;

    config.validate()?;
    Ok(config)
}

/// Represents the complete GradRecords configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default = "default_tables")]
    pub tables: Vec<TableConfig>,
    pub logging: Option<LoggingConfig>,
}

impl Config {
    /// Check the settings that serde cannot express
    pub fn validate(&self) -> Result<()> {
        self.database.validate()?;

        if self.tables.is_empty() {
            return Err(Error::ConfigError(
                "At least one table must be configured".to_string(),
            ));
        }
        for table in &self.tables {
            crate::utils::naming::validate_identifier(&table.name)?;
            if let Some(pk) = &table.primary_key {
                crate::utils::naming::validate_identifier(pk)?;
            }
        }

        Ok(())
    }
}

/// Database connection configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default = "default_driver")]
    pub driver: String,
    pub url: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl DatabaseConfig {
    fn validate(&self) -> Result<()> {
        match self.driver.as_str() {
            "mysql" => {
                if self.url.is_some() {
                    return Ok(());
                }
                let missing: Vec<&str> = [
                    ("user", self.user.is_none()),
                    ("host", self.host.is_none()),
                    ("database", self.database.is_none()),
                ]
                .into_iter()
                .filter_map(|(key, absent)| absent.then_some(key))
                .collect();

                if missing.is_empty() {
                    Ok(())
                } else {
                    Err(Error::ConfigError(format!(
                        "Missing database settings: {}",
                        missing.join(", ")
                    )))
                }
            }
            "sqlite" => {
                if self.url.is_some() || self.database.is_some() {
                    Ok(())
                } else {
                    Err(Error::ConfigError(
                        "sqlite driver needs either `url` or `database`".to_string(),
                    ))
                }
            }
            other => Err(Error::ConfigError(format!(
                "Unsupported database driver: {}",
                other
            ))),
        }
    }
}

/// A known table and the column its rows are deleted by
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TableConfig {
    pub name: String,
    pub primary_key: Option<String>,
}

impl TableConfig {
    pub fn new(name: &str, primary_key: &str) -> Self {
        Self {
            name: name.to_string(),
            primary_key: Some(primary_key.to_string()),
        }
    }
}

/// Logging configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    pub file: Option<String>,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_driver() -> String {
    "mysql".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

/// The graduate records tables and their primary keys
pub fn default_tables() -> Vec<TableConfig> {
    vec![
        TableConfig::new("Graduates", "Graduation_ID"),
        TableConfig::new("Specialty", "Speciality_ID"),
        TableConfig::new("PlaceOfWorks", "Work_ID"),
        TableConfig::new("ScientificSupervisors", "Scientific_Director_ID"),
        TableConfig::new("Donations", "DONATION_ID"),
    ]
}
