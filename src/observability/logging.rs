//! Structured logging configuration.

use crate::config::LoggingSettings;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable single-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses a format name. Unknown names fall back to [`LogFormat::Pretty`].
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// `EnvFilter` directive.
    pub filter: String,
}

impl LoggingConfig {
    /// Builds logging configuration from config settings with env overrides.
    ///
    /// Filter precedence: `SUGGESTBOX_LOG_FILTER`, `RUST_LOG`, `debug` when
    /// verbose, the config file, then `info`.
    #[must_use]
    pub fn from_settings(settings: Option<&LoggingSettings>, verbose: bool) -> Self {
        Self::resolve(settings, verbose, super::env::lookup_env)
    }

    pub(crate) fn resolve(
        settings: Option<&LoggingSettings>,
        verbose: bool,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let format = env("SUGGESTBOX_LOG_FORMAT")
            .or_else(|| settings.and_then(|s| s.format.clone()))
            .map(|f| LogFormat::parse(&f))
            .unwrap_or_default();

        let filter = env("SUGGESTBOX_LOG_FILTER")
            .or_else(|| env("RUST_LOG"))
            .or_else(|| verbose.then(|| "debug".to_string()))
            .or_else(|| settings.and_then(|s| s.filter.clone()))
            .unwrap_or_else(|| "info".to_string());

        Self { format, filter }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            filter: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse(" JSON "), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("whatever"), LogFormat::Pretty);
    }

    #[test]
    fn test_defaults_without_settings() {
        let config = LoggingConfig::resolve(None, false, env_from(&[]));
        assert_eq!(config, LoggingConfig::default());
    }

    #[test]
    fn test_verbose_beats_file_filter() {
        let settings = LoggingSettings {
            format: Some("json".to_string()),
            filter: Some("warn".to_string()),
        };
        let config = LoggingConfig::resolve(Some(&settings), true, env_from(&[]));
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.filter, "debug");

        let config = LoggingConfig::resolve(Some(&settings), false, env_from(&[]));
        assert_eq!(config.filter, "warn");
    }

    #[test]
    fn test_env_overrides() {
        let settings = LoggingSettings {
            format: Some("json".to_string()),
            filter: Some("warn".to_string()),
        };
        let env = env_from(&[
            ("SUGGESTBOX_LOG_FORMAT", "pretty"),
            ("RUST_LOG", "trace"),
        ]);
        let config = LoggingConfig::resolve(Some(&settings), true, env);
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.filter, "trace");

        let env = env_from(&[
            ("SUGGESTBOX_LOG_FILTER", "suggestbox=debug"),
            ("RUST_LOG", "trace"),
        ]);
        let config = LoggingConfig::resolve(None, false, env);
        assert_eq!(config.filter, "suggestbox=debug");
    }
}
