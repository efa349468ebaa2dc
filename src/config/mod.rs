//! Configuration management.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! command-line flags (which clap also fills from `DB_PATH`, `PORT` and
//! `STATIC_DIR`). Logging and metrics settings additionally accept
//! `SUGGESTBOX_*` environment overrides, applied by
//! [`crate::observability`].

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default database location.
pub const DEFAULT_DB_PATH: &str = "/tmp/suggestions.db";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default static asset directory.
pub const DEFAULT_STATIC_DIR: &str = "./static";

/// Main configuration for the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Path to the `SQLite` database file.
    pub db_path: PathBuf,
    /// Port to listen on.
    pub port: u16,
    /// Directory served for paths outside the API.
    pub static_dir: PathBuf,
    /// Logging and metrics settings.
    pub observability: ObservabilitySettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            port: DEFAULT_PORT,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            observability: ObservabilitySettings::default(),
        }
    }
}

/// Observability section of the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ObservabilitySettings {
    /// Logging settings.
    pub logging: Option<LoggingSettings>,
    /// Metrics settings.
    pub metrics: Option<MetricsSettings>,
}

/// Logging settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoggingSettings {
    /// Output format: "pretty" or "json".
    pub format: Option<String>,
    /// `EnvFilter` directive, e.g. `info,tower_http=debug`.
    pub filter: Option<String>,
}

/// Metrics settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MetricsSettings {
    /// Whether to install the Prometheus exporter.
    pub enabled: Option<bool>,
    /// Port of the Prometheus scrape listener.
    pub port: Option<u16>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Database path.
    pub db_path: Option<String>,
    /// Listen port.
    pub port: Option<u16>,
    /// Static asset directory.
    pub static_dir: Option<String>,
    /// Logging settings.
    pub logging: Option<LoggingSettings>,
    /// Metrics settings.
    pub metrics: Option<MetricsSettings>,
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Database path.
    pub db_path: Option<PathBuf>,
    /// Listen port.
    pub port: Option<u16>,
    /// Static asset directory.
    pub static_dir: Option<PathBuf>,
}

impl ServerConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> crate::Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| crate::Error::OperationFailed {
                operation: "read_config_file".to_string(),
                cause: format!("{}: {e}", path.display()),
            })?;

        Self::parse_toml(&contents)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid config file.
    pub fn parse_toml(contents: &str) -> crate::Result<Self> {
        let file: ConfigFile =
            toml::from_str(contents).map_err(|e| crate::Error::OperationFailed {
                operation: "parse_config_file".to_string(),
                cause: e.to_string(),
            })?;

        Ok(Self::from_config_file(file))
    }

    /// Loads the config file if one is given, then applies `overrides`.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file was given and cannot be loaded.
    pub fn load(file: Option<&Path>, overrides: ConfigOverrides) -> crate::Result<Self> {
        let base = match file {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        Ok(base.with_overrides(overrides))
    }

    /// Converts a `ConfigFile` to `ServerConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(db_path) = file.db_path {
            config.db_path = PathBuf::from(db_path);
        }
        if let Some(port) = file.port {
            config.port = port;
        }
        if let Some(static_dir) = file.static_dir {
            config.static_dir = PathBuf::from(static_dir);
        }
        config.observability = ObservabilitySettings {
            logging: file.logging,
            metrics: file.metrics,
        };

        config
    }

    /// Applies command-line and environment values on top of this config.
    ///
    /// Empty paths count as unset.
    #[must_use]
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(db_path) = overrides.db_path.filter(|p| !p.as_os_str().is_empty()) {
            self.db_path = db_path;
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(static_dir) = overrides.static_dir.filter(|p| !p.as_os_str().is_empty()) {
            self.static_dir = static_dir;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::new();
        assert_eq!(config.db_path, PathBuf::from("/tmp/suggestions.db"));
        assert_eq!(config.port, 8080);
        assert_eq!(config.static_dir, PathBuf::from("./static"));
        assert_eq!(config.observability, ObservabilitySettings::default());
    }

    #[test]
    fn test_parse_full_file() {
        let config = ServerConfig::parse_toml(
            r#"
            db_path = "/var/lib/suggestbox/data.db"
            port = 9000
            static_dir = "/srv/www"

            [logging]
            format = "json"
            filter = "debug"

            [metrics]
            enabled = true
            port = 9191
            "#,
        )
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/var/lib/suggestbox/data.db"));
        assert_eq!(config.port, 9000);
        assert_eq!(config.static_dir, PathBuf::from("/srv/www"));
        let logging = config.observability.logging.unwrap();
        assert_eq!(logging.format.as_deref(), Some("json"));
        assert_eq!(logging.filter.as_deref(), Some("debug"));
        let metrics = config.observability.metrics.unwrap();
        assert_eq!(metrics.enabled, Some(true));
        assert_eq!(metrics.port, Some(9191));
    }

    #[test]
    fn test_parse_partial_file_keeps_defaults() {
        let config = ServerConfig::parse_toml("port = 3000").unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB_PATH));
        assert!(config.observability.logging.is_none());
    }

    #[test]
    fn test_parse_rejects_bad_file() {
        let result = ServerConfig::parse_toml("port = \"eighty\"");
        assert!(matches!(
            result,
            Err(crate::Error::OperationFailed { ref operation, .. }) if operation == "parse_config_file"
        ));

        assert!(ServerConfig::parse_toml("unknown_key = 1").is_err());
    }

    #[test]
    fn test_overrides_win_over_file() {
        let config = ServerConfig::parse_toml("port = 3000\ndb_path = \"/a.db\"")
            .unwrap()
            .with_overrides(ConfigOverrides {
                db_path: Some(PathBuf::from("/b.db")),
                port: None,
                static_dir: Some(PathBuf::new()),
            });

        assert_eq!(config.db_path, PathBuf::from("/b.db"));
        assert_eq!(config.port, 3000);
        assert_eq!(config.static_dir, PathBuf::from(DEFAULT_STATIC_DIR));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("suggestbox.toml");
        std::fs::write(&path, "static_dir = \"public\"").unwrap();

        let config = ServerConfig::load(Some(&path), ConfigOverrides::default()).unwrap();
        assert_eq!(config.static_dir, PathBuf::from("public"));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = ServerConfig::load(
            Some(Path::new("/nonexistent/suggestbox.toml")),
            ConfigOverrides::default(),
        );
        assert!(matches!(
            result,
            Err(crate::Error::OperationFailed { ref operation, .. }) if operation == "read_config_file"
        ));
    }
}
