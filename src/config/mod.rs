//! Configuration loading and management for the roster engine.
//!
//! This module provides functionality to load a unit's configuration from
//! YAML files: shift vocabulary, hard-rule parameters, staffing
//! requirements and quality-score weights.
//!
//! # Example
//!
//! ```no_run
//! use roster_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/general_ward").unwrap();
//! println!("Loaded unit: {}", config.settings().metadata().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    RuleConfig, ScoreWeights, ScoringConfig, ScoringItem, ShiftCatalog, ShiftDefinition,
    StaffingRequirements, UnitFile, UnitMetadata, UnitSettings,
};
