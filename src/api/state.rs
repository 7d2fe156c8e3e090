//! Application state for the employment law engine API.
//!
//! The rule tables are loaded once and shared read-only by all handlers.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::error::EngineResult;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The loaded holiday and sick pay tables.
    config: Arc<ConfigLoader>,
}

impl AppState {
    /// Creates a new application state with the given configuration loader.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Creates a state over the rule tables compiled into the crate.
    pub fn builtin() -> EngineResult<Self> {
        Ok(Self::new(ConfigLoader::builtin()?))
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }
}
