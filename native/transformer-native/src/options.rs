//! Transform configuration.
//!
//! A single record handed to the orchestrator at construction time. Nothing here is read
//! from the process environment; the build mode decides the handler naming strategy.

use serde::{Deserialize, Serialize};

use crate::constants::{CONSTRUCTOR_ALIAS, EVENT_PREFIX, TRIGGER_METHOD};
use crate::error::{Result, TransformError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    #[default]
    Production,
    /// Stable handler names and no constructor renaming, for snapshot-style assertions.
    Test,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransformOptions {
    pub source_path: String,
    pub mode: BuildMode,
    pub event_prefix: String,
    pub trigger_method: String,
    pub constructor_alias: String,
    pub random_name_length: usize,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            source_path: String::new(),
            mode: BuildMode::Production,
            event_prefix: EVENT_PREFIX.to_string(),
            trigger_method: TRIGGER_METHOD.to_string(),
            constructor_alias: CONSTRUCTOR_ALIAS.to_string(),
            random_name_length: 5,
        }
    }
}

impl TransformOptions {
    pub fn new(source_path: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| TransformError::invalid_options(e.to_string()))
    }

    pub fn is_test(&self) -> bool {
        self.mode == BuildMode::Test
    }

    /// Attribute and property names following the callback naming convention (`onTap`).
    pub fn is_event_name(&self, name: &str) -> bool {
        name.starts_with(self.event_prefix.as_str())
    }
}
