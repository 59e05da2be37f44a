//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the export
//! layout and locale data from YAML files.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::types::{EngineConfig, LayoutConfig, Locale};

/// Loads and provides access to the engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── layout.yaml   # Column positions, header keywords, delivery rules
/// └── format.yaml   # Currency format and month names
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_sheets::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Cutoff day: {}", loader.config().layout().delivery.cutoff_day);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if either file is missing, is not valid YAML, or
    /// holds values the engine cannot work with.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let layout = Self::load_yaml::<LayoutConfig>(&path.join("layout.yaml"))?;
        let locale = Self::load_yaml::<Locale>(&path.join("format.yaml"))?;

        Self::validate(&layout, &locale)?;
        debug!(path = %path.display(), "Loaded engine configuration");

        Ok(Self {
            config: EngineConfig::new(layout, locale),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn validate(layout: &LayoutConfig, locale: &Locale) -> EngineResult<()> {
        if locale.month_names.len() != 12 {
            return Err(EngineError::InvalidConfig {
                message: format!(
                    "expected 12 month names, found {}",
                    locale.month_names.len()
                ),
            });
        }
        if !(1..=31).contains(&layout.delivery.cutoff_day) {
            return Err(EngineError::InvalidConfig {
                message: format!(
                    "cutoff day {} is not a day of the month",
                    layout.delivery.cutoff_day
                ),
            });
        }
        if locale.currency.thousands_separator == locale.currency.decimal_separator {
            return Err(EngineError::InvalidConfig {
                message: "thousands and decimal separators must differ".to_string(),
            });
        }
        if locale.currency.decimals > 10 {
            return Err(EngineError::InvalidConfig {
                message: format!("{} decimals is too many", locale.currency.decimals),
            });
        }
        Ok(())
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Consumes the loader and returns the configuration.
    pub fn into_config(self) -> EngineConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_path() -> &'static str {
        "./config/default"
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
    }

    #[test]
    fn test_shipped_configuration_matches_defaults() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        assert_eq!(loader.config(), &EngineConfig::default());
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("layout.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_short_month_list() {
        let layout = LayoutConfig::default();
        let mut locale = Locale::default();
        locale.month_names.truncate(11);

        let result = ConfigLoader::validate(&layout, &locale);
        assert!(matches!(result, Err(EngineError::InvalidConfig { .. })));
    }

    #[test]
    fn test_validate_rejects_cutoff_out_of_range() {
        let mut layout = LayoutConfig::default();
        layout.delivery.cutoff_day = 40;

        let result = ConfigLoader::validate(&layout, &Locale::default());
        match result {
            Err(EngineError::InvalidConfig { message }) => assert!(message.contains("40")),
            other => panic!("Expected InvalidConfig error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_equal_separators() {
        let mut locale = Locale::default();
        locale.currency.thousands_separator = ',';

        let result = ConfigLoader::validate(&LayoutConfig::default(), &locale);
        assert!(matches!(result, Err(EngineError::InvalidConfig { .. })));
    }
}
