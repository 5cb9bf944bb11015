//! Logging utilities for GradRecords
//!
//! The terminal UI owns stdout, so log output only ever goes to a file.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::{Error, Result};

/// Parse a log level name, defaulting to INFO
pub fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Initialize logging based on configuration.
///
/// `level_override` comes from the command line and wins over the file.
/// Returns whether a subscriber was installed.
pub fn init_logging(config: &Option<LoggingConfig>, level_override: Option<&str>) -> Result<bool> {
    let config = match config {
        Some(cfg) => cfg,
        None => return Ok(false),
    };

    let file_path = match &config.file {
        Some(path) => path,
        None => return Ok(false),
    };

    let level = parse_level(level_override.unwrap_or(&config.level));
    let directive = format!("grad_records={}", level)
        .parse()
        .map_err(|e| Error::ConfigError(format!("Invalid log directive: {}", e)))?;
    let env_filter = EnvFilter::from_default_env().add_directive(directive);

    if let Some(parent) = Path::new(file_path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(file_path)?;

    if config.format.to_lowercase() == "json" {
        let subscriber = fmt::Subscriber::builder()
            .json()
            .with_env_filter(env_filter)
            .with_writer(Mutex::new(file))
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| Error::Unknown(e.to_string()))?;
    } else {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| Error::Unknown(e.to_string()))?;
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names() {
        assert_eq!(parse_level("DEBUG"), Level::DEBUG);
        assert_eq!(parse_level("warn"), Level::WARN);
        assert_eq!(parse_level("verbose"), Level::INFO);
    }

    #[test]
    fn no_file_means_no_subscriber() {
        let config = Some(LoggingConfig {
            level: "debug".to_string(),
            file: None,
            format: "text".to_string(),
        });
        assert!(!init_logging(&config, None).unwrap());
        assert!(!init_logging(&None, Some("trace")).unwrap());
    }
}
