use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub list: ListConfig,
    pub output: OutputConfig,
}

/// Markers written in front of list items.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    pub bullet: String,
    pub ordered_delimiter: String,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            bullet: "•".to_string(),
            ordered_delimiter: ".".to_string(),
        }
    }
}

impl ListConfig {
    /// Prefix for an item of a bulleted list, e.g. `"• "`.
    pub fn bullet_prefix(&self) -> String {
        format!("{} ", self.bullet)
    }

    /// Prefix for the `number`th item of a numbered list, e.g. `"3. "`.
    pub fn ordered_prefix(&self, number: u32) -> String {
        format!("{}{} ", number, self.ordered_delimiter)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Placed between blocks unless both neighbours are list items.
    pub block_separator: String,
    /// Placed between two adjacent list items.
    pub item_separator: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            block_separator: "\n\n".to_string(),
            item_separator: "\n".to_string(),
        }
    }
}

impl Config {
    /// Read config from a TOML file the caller asked for explicitly.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load config from a TOML file, or return defaults if not found.
    pub fn load(path: &Path) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e @ Error::Config { .. }) => {
                tracing::warn!(error = %e, "invalid config, using defaults");
                Self::default()
            }
            Err(e) => {
                tracing::debug!(error = %e, "config not readable, using defaults");
                Self::default()
            }
        }
    }

    /// The config shipped in `default_config.toml`.
    pub fn compiled_default() -> Self {
        toml::from_str(DEFAULT_CONFIG).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "embedded default config rejected");
            Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiled_default_matches_builtin_default() {
        assert_eq!(Config::compiled_default(), Config::default());
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config: Config = toml::from_str("[list]\nbullet = \"-\"\n").unwrap();
        assert_eq!(config.list.bullet, "-");
        assert_eq!(config.list.ordered_delimiter, ".");
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn prefixes() {
        let list = ListConfig::default();
        assert_eq!(list.bullet_prefix(), "• ");
        assert_eq!(list.ordered_prefix(12), "12. ");

        let list = ListConfig {
            bullet: "*".to_string(),
            ordered_delimiter: ")".to_string(),
        };
        assert_eq!(list.bullet_prefix(), "* ");
        assert_eq!(list.ordered_prefix(1), "1) ");
    }

    #[test]
    fn from_file_reports_missing_file() {
        let err = Config::from_file(Path::new("/nonexistent/docplain.toml")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(err.to_string().starts_with("failed to read /nonexistent/docplain.toml"));
    }

    #[test]
    fn from_file_reports_invalid_toml() {
        let path = std::env::temp_dir().join(format!("docplain-{}-bad.toml", std::process::id()));
        fs::write(&path, "[list\nbullet = ").unwrap();
        let result = Config::from_file(&path);
        let fallback = Config::load(&path);
        fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(Error::Config { .. })));
        assert_eq!(fallback, Config::default());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = Config::load(Path::new("/nonexistent/docplain.toml"));
        assert_eq!(config, Config::default());
    }
}
