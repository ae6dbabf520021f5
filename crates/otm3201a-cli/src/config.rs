//! Configuration management.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Log filter used when `-v` is not given (e.g., "warn", "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry-run setup configuration
    #[serde(default)]
    pub setup: SetupConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Dry-run setup configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SetupConfig {
    /// Panel mode name to look up
    #[serde(default = "default_panel")]
    pub panel: String,

    /// Actually sleep for the power-on delays
    #[serde(default = "default_settle_delays")]
    pub settle_delays: bool,

    /// Reject this write (1-indexed) to exercise the failure path
    #[serde(default)]
    pub fail_at: Option<usize>,

    /// Status code returned for the rejected write
    #[serde(default = "default_fail_code")]
    pub fail_code: i32,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            panel: default_panel(),
            settle_delays: default_settle_delays(),
            fail_at: None,
            fail_code: default_fail_code(),
        }
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_panel() -> String {
    "TRULY-WVGA".to_string()
}

fn default_settle_delays() -> bool {
    true
}

fn default_fail_code() -> i32 {
    -5 // EIO
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read configuration file")?;
        Self::parse(&content)
    }

    /// Parses configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse configuration")
    }

    /// Saves configuration to a TOML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = self.to_toml()?;
        std::fs::write(path.as_ref(), content).context("Failed to write configuration file")?;
        Ok(())
    }

    /// Serializes configuration as TOML text.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            setup: SetupConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.setup.panel, "TRULY-WVGA");
        assert!(config.setup.settle_delays);
        assert_eq!(config.output.format, OutputFormat::Text);
    }

    #[test]
    fn test_partial_config() {
        let config = Config::parse(
            r#"
            log_level = "debug"

            [setup]
            settle_delays = false
            fail_at = 3

            [output]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.log_level, "debug");
        assert!(!config.setup.settle_delays);
        assert_eq!(config.setup.fail_at, Some(3));
        assert_eq!(config.setup.fail_code, -5);
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_bad_format_rejected() {
        assert!(Config::parse("[output]\nformat = \"yaml\"").is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = Config::default();
        config.setup.fail_at = Some(7);
        let text = config.to_toml().unwrap();
        assert_eq!(Config::parse(&text).unwrap(), config);
    }
}
