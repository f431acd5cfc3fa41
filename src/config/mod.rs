//! Configuration management for cgmlst-export
//!
//! Configuration is assembled from several sources:
//! - Configuration file (TOML format)
//! - Environment variables
//! - Command-line arguments
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values
//!
//! Flags and environment variables are resolved by clap and applied on top
//! of the file with [`Config::apply_overrides`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, Result};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Connection configuration
    #[serde(default)]
    pub connection: ConnectionConfig,

    /// Export configuration
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Connection-related configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectionConfig {
    /// MongoDB connection URI
    #[serde(default = "default_uri")]
    pub uri: String,

    /// Application name reported to the server
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Connection timeout in seconds (driver default when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_timeout: Option<u64>,
}

/// What to export and where to write it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportConfig {
    /// Source database name
    #[serde(default = "default_database")]
    pub database: String,

    /// Source collection name
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Output file (stdout when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Number of documents pulled from the cursor per batch
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,

    /// Print a progress line every this many documents
    #[serde(default = "default_progress_interval")]
    pub progress_interval: u64,
}

/// Where encoded records are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Enable timestamps in logs
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Values supplied on the command line or through the environment.
///
/// `None` means "keep what the file or the defaults say".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub uri: Option<String>,
    pub database: Option<String>,
    pub collection: Option<String>,
    pub output: Option<PathBuf>,
    pub batch_size: Option<u32>,
}

// Default value functions
fn default_uri() -> String {
    "mongodb://mongodb-1,mongodb-2,mongodb-3:27017".to_string()
}

fn default_app_name() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

fn default_database() -> String {
    "wgsa-edge".to_string()
}

fn default_collection() -> String {
    "genomes".to_string()
}

fn default_batch_size() -> u32 {
    1000
}

fn default_progress_interval() -> u64 {
    500
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_log_timestamps() -> bool {
    true
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            app_name: default_app_name(),
            connect_timeout: None,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            collection: default_collection(),
            output: None,
            batch_size: default_batch_size(),
            progress_interval: default_progress_interval(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            timestamps: default_log_timestamps(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound(path.display().to_string()),
            _ => ConfigError::InvalidFormat(format!("{}: {e}", path.display())),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
    }

    /// Load configuration from an explicit path or the default location
    ///
    /// An explicit path must exist. The default path is optional: when it is
    /// missing the built-in defaults are used.
    pub fn load_from_file(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Self::default_path();
                if default_path.exists() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Get the default configuration file path
    ///
    /// # Returns
    /// * `PathBuf` - Path to default configuration file
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(concat!(".", env!("CARGO_PKG_NAME")))
            .join("config.toml")
    }

    /// Serialize the configuration as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
    }

    /// Apply command-line and environment overrides
    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(uri) = overrides.uri {
            self.connection.uri = uri;
        }
        if let Some(database) = overrides.database {
            self.export.database = database;
        }
        if let Some(collection) = overrides.collection {
            self.export.collection = collection;
        }
        if let Some(output) = overrides.output {
            self.export.output = Some(output);
        }
        if let Some(batch_size) = overrides.batch_size {
            self.export.batch_size = batch_size;
        }
    }

    /// Validate the configuration
    ///
    /// # Returns
    /// * `Result<()>` - Ok if valid, error otherwise
    pub fn validate(&self) -> Result<()> {
        self.connection.validate_uri()?;

        if self.export.database.trim().is_empty() {
            return Err(invalid("export.database", &self.export.database));
        }
        if self.export.collection.trim().is_empty() {
            return Err(invalid("export.collection", &self.export.collection));
        }
        if self.export.batch_size == 0 {
            return Err(invalid("export.batch_size", "0"));
        }
        if self.export.progress_interval == 0 {
            return Err(invalid("export.progress_interval", "0"));
        }
        Ok(())
    }
}

fn invalid(field: &str, value: &str) -> crate::error::ExportError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    }
    .into()
}

impl ConnectionConfig {
    /// Get connection timeout as Duration
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout.map(Duration::from_secs)
    }

    /// Check the connection URI scheme
    ///
    /// Full parsing (hosts, options) is left to the driver at connect time.
    pub fn validate_uri(&self) -> Result<()> {
        let uri = self.uri.trim();
        if uri.starts_with("mongodb://") || uri.starts_with("mongodb+srv://") {
            Ok(())
        } else {
            Err(invalid("connection.uri", &self.uri))
        }
    }
}

impl ExportConfig {
    /// Resolve the configured output target
    pub fn output_target(&self) -> OutputTarget {
        match &self.output {
            Some(path) if path.as_os_str() != "-" => OutputTarget::File(path.clone()),
            _ => OutputTarget::Stdout,
        }
    }
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(
            config.connection.uri,
            "mongodb://mongodb-1,mongodb-2,mongodb-3:27017"
        );
        assert_eq!(config.export.database, "wgsa-edge");
        assert_eq!(config.export.collection, "genomes");
        assert_eq!(config.export.progress_interval, 500);
        assert_eq!(config.export.output_target(), OutputTarget::Stdout);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [export]
            collection = "profiles"
            output = "/tmp/profiles.bson"

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.export.collection, "profiles");
        assert_eq!(config.export.database, "wgsa-edge");
        assert_eq!(
            config.export.output_target(),
            OutputTarget::File(PathBuf::from("/tmp/profiles.bson"))
        );
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.connection, ConnectionConfig::default());
    }

    #[test]
    fn test_invalid_toml_is_format_error() {
        let err = Config::from_toml_str("[export\ndatabase = 1").unwrap_err();
        assert!(err.to_string().contains("Invalid config format"));
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = Config::load_from_file(Some(Path::new("/nonexistent/cgmlst.toml"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_overrides_take_precedence() {
        let mut config = Config::default();
        config.apply_overrides(Overrides {
            uri: Some("mongodb://localhost:27017".to_string()),
            collection: Some("archive".to_string()),
            batch_size: Some(50),
            ..Default::default()
        });

        assert_eq!(config.connection.uri, "mongodb://localhost:27017");
        assert_eq!(config.export.collection, "archive");
        assert_eq!(config.export.database, "wgsa-edge");
        assert_eq!(config.export.batch_size, 50);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.connection.uri = "http://localhost".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.export.batch_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.export.collection = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_dash_output_means_stdout() {
        let mut config = Config::default();
        config.export.output = Some(PathBuf::from("-"));
        assert_eq!(config.export.output_target(), OutputTarget::Stdout);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = Config::default();
        config.connection.connect_timeout = Some(10);
        let text = config.to_toml_string().unwrap();
        let parsed = Config::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
        assert_eq!(
            parsed.connection.connect_timeout(),
            Some(Duration::from_secs(10))
        );
    }
}
