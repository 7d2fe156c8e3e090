//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the canton
//! rule tables from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{HolidayConfig, RulesConfig, SickPayConfig};

const BUILTIN_HOLIDAYS: &str = include_str!("../../config/ch/holidays.yaml");
const BUILTIN_SICK_PAY: &str = include_str!("../../config/ch/sick_pay.yaml");

/// Loads and provides access to the canton rule tables.
///
/// # Directory Structure
///
/// ```text
/// config/ch/
/// ├── holidays.yaml   # Public holidays per canton
/// └── sick_pay.yaml   # Sick pay scales per canton
/// ```
///
/// # Example
///
/// ```no_run
/// use emplaw_engine::config::ConfigLoader;
/// use emplaw_engine::models::Canton;
///
/// let loader = ConfigLoader::load("./config/ch").unwrap();
/// let scale = loader.config().scale_for(Canton::Zh);
/// println!("Sick pay scale: {}", scale.name);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: RulesConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - The sick pay scales do not cover every canton exactly once
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let holidays = Self::load_yaml::<HolidayConfig>(&path.join("holidays.yaml"))?;
        let sick_pay = Self::load_yaml::<SickPayConfig>(&path.join("sick_pay.yaml"))?;

        let config = RulesConfig::new(holidays.holidays, sick_pay)?;
        Ok(Self { config })
    }

    /// Loads the rule tables compiled into the crate.
    ///
    /// # Example
    ///
    /// ```
    /// use emplaw_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::builtin().unwrap();
    /// assert!(!loader.config().holidays().is_empty());
    /// ```
    pub fn builtin() -> EngineResult<Self> {
        let holidays =
            Self::parse_yaml::<HolidayConfig>(BUILTIN_HOLIDAYS, "<builtin>/holidays.yaml")?;
        let sick_pay =
            Self::parse_yaml::<SickPayConfig>(BUILTIN_SICK_PAY, "<builtin>/sick_pay.yaml")?;

        let config = RulesConfig::new(holidays.holidays, sick_pay)?;
        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::parse_yaml(&content, &path_str)
    }

    fn parse_yaml<T: serde::de::DeserializeOwned>(content: &str, path: &str) -> EngineResult<T> {
        serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    /// Returns the underlying rule tables.
    pub fn config(&self) -> &RulesConfig {
        &self.config
    }
}
