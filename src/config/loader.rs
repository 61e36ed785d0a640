//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading unit
//! configurations from YAML files.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{EngineError, EngineResult};

use super::types::{
    RuleConfig, ScoringConfig, StaffingRequirements, UnitFile, UnitMetadata, UnitSettings,
};

/// Loads and provides access to a unit's configuration.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/general_ward/
/// ├── unit.yaml          # Unit name and shift definitions
/// ├── rules.yaml         # Hard-rule parameters
/// ├── requirements.yaml  # Weekday staffing minimums per shift
/// └── scoring.yaml       # Quality categories and weights
/// ```
///
/// # Example
///
/// ```no_run
/// use roster_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/general_ward").unwrap();
/// println!("Loaded unit: {}", loader.settings().metadata().name);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    settings: UnitSettings,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the unit directory (e.g., "./config/general_ward")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - The files are inconsistent with each other (see [`UnitSettings::validate`])
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let unit = Self::load_yaml::<UnitFile>(&path.join("unit.yaml"))?;
        let rules = Self::load_yaml::<RuleConfig>(&path.join("rules.yaml"))?;
        let requirements =
            Self::load_yaml::<StaffingRequirements>(&path.join("requirements.yaml"))?;
        let scoring = Self::load_yaml::<ScoringConfig>(&path.join("scoring.yaml"))?;

        let settings = UnitSettings::new(
            UnitMetadata {
                name: unit.name,
                description: unit.description,
            },
            unit.shifts,
            rules,
            requirements,
            scoring,
        );
        settings.validate()?;

        tracing::debug!(
            unit = %settings.metadata().name,
            shifts = settings.shifts().len(),
            "Loaded unit configuration"
        );

        Ok(Self { settings })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: for<'de> Deserialize<'de>>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the loaded unit settings.
    pub fn settings(&self) -> &UnitSettings {
        &self.settings
    }

    /// Consumes the loader and returns the unit settings.
    pub fn into_settings(self) -> UnitSettings {
        self.settings
    }
}
