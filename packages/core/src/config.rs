//! Tree construction configuration
//!
//! All fields use `#[serde(default)]` so partial JSON files deserialize into
//! a complete configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Relation nesting bound applied when none is configured
const DEFAULT_MAX_RELATION_DEPTH: usize = 16;

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Relation resolution settings for a [`TreeBuilder`](crate::services::TreeBuilder)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Resolve every identifier-shaped field value as a relation
    #[serde(default)]
    pub auto_resolve_relations: bool,

    /// Explicit resolve-list; entries are `field` or `component.field`
    #[serde(default)]
    pub resolve_relations: Vec<String>,

    /// Memoize fetched relations by identifier for the duration of one build
    #[serde(default)]
    pub cache_relations: bool,

    /// Fail when a relation chain revisits a document it is resolving
    #[serde(default = "default_true")]
    pub detect_relation_cycles: bool,

    /// Maximum number of nested relation resolutions on one chain
    #[serde(default = "default_max_relation_depth")]
    pub max_relation_depth: usize,
}

fn default_true() -> bool {
    true
}

fn default_max_relation_depth() -> usize {
    DEFAULT_MAX_RELATION_DEPTH
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            auto_resolve_relations: false,
            resolve_relations: Vec::new(),
            cache_relations: false,
            detect_relation_cycles: true,
            max_relation_depth: DEFAULT_MAX_RELATION_DEPTH,
        }
    }
}

impl BuildConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_relation_depth == 0 {
            return Err(ConfigError::Invalid(
                "max_relation_depth must be greater than 0".to_string(),
            ));
        }

        for entry in &self.resolve_relations {
            let valid = match entry.split_once('.') {
                Some((component, field)) => {
                    !component.is_empty() && !field.is_empty() && !field.contains('.')
                }
                None => !entry.is_empty(),
            };
            if !valid {
                return Err(ConfigError::Invalid(format!(
                    "resolve_relations entry '{}' must be 'field' or 'component.field'",
                    entry
                )));
            }
        }

        Ok(())
    }

    /// Whether the explicit resolve-list names this field
    pub fn is_resolve_listed(&self, component: &str, field: &str) -> bool {
        self.resolve_relations
            .iter()
            .any(|entry| match entry.split_once('.') {
                Some((c, f)) => c == component && f == field,
                None => entry == field,
            })
    }
}
