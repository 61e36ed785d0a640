//! Application state for the roster engine API.

use std::sync::Arc;

use crate::config::{ConfigLoader, UnitSettings};

/// Shared application state.
///
/// Holds the unit configuration loaded at startup, used by every request
/// that does not bring its own.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
}

impl AppState {
    /// Creates a new application state with the given configuration loader.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// The loaded unit settings.
    pub fn settings(&self) -> &UnitSettings {
        self.config.settings()
    }
}
