//! Service Layer Error Types
//!
//! This module defines the errors raised while building a content tree. Rule
//! misses during classification are not errors; everything here is fatal to
//! the whole build and propagates unmodified to the top-level call.

use crate::models::ValidationError;
use thiserror::Error;

/// Relation fetch failures raised by a [`RelationFetcher`](crate::services::RelationFetcher)
#[derive(Error, Debug)]
pub enum FetchError {
    /// No document exists for the identifier
    #[error("Relation not found: {uuid}")]
    RelationNotFound { uuid: String },

    /// Transport-level failure (network, timeout, upstream status)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The fetched payload is not a relation wrapper
    #[error("Invalid relation payload for {uuid}: {source}")]
    InvalidPayload {
        uuid: String,
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FetchError {
    /// Create a relation not found error
    pub fn not_found(uuid: impl Into<String>) -> Self {
        Self::RelationNotFound { uuid: uuid.into() }
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create an invalid payload error
    pub fn invalid_payload(uuid: impl Into<String>, source: serde_json::Error) -> Self {
        Self::InvalidPayload {
            uuid: uuid.into(),
            source,
        }
    }
}

/// Tree construction errors
///
/// Any of these aborts the build; no partial tree is returned.
#[derive(Error, Debug)]
pub enum BuildError {
    /// Raw node failed metadata validation
    #[error("Node validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The relation fetcher failed for a field
    #[error("Failed to resolve relation for field '{field}': {source}")]
    RelationFetch {
        field: String,
        #[source]
        source: FetchError,
    },

    /// A relation references a document already being resolved on this chain
    #[error("Circular relation detected at {uuid} (chain: {})", .chain.join(" -> "))]
    CircularRelation { uuid: String, chain: Vec<String> },

    /// Relation nesting exceeded the configured bound
    #[error("Relation depth limit of {max_depth} exceeded while resolving {uuid}")]
    RelationDepthExceeded { uuid: String, max_depth: usize },

    /// A cast or registered field type rejected its input
    #[error("Field '{field}' construction failed: {message}")]
    FieldConstruction { field: String, message: String },

    /// A post-construction initializer failed
    #[error("Initializer '{capability}' failed on component '{component}': {message}")]
    Initializer {
        capability: String,
        component: String,
        message: String,
    },

    /// Top-level story envelope could not be parsed
    #[error("Invalid story document: {0}")]
    InvalidStory(String),
}

impl BuildError {
    /// Create a relation fetch error for a field
    pub fn relation_fetch(field: impl Into<String>, source: FetchError) -> Self {
        Self::RelationFetch {
            field: field.into(),
            source,
        }
    }

    /// Create a field construction error
    pub fn field_construction(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FieldConstruction {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an initializer error
    pub fn initializer(
        capability: impl Into<String>,
        component: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Initializer {
            capability: capability.into(),
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create an invalid story error
    pub fn invalid_story(msg: impl Into<String>) -> Self {
        Self::InvalidStory(msg.into())
    }

    /// Underlying fetcher error, if this build failed on a relation fetch
    pub fn fetch_error(&self) -> Option<&FetchError> {
        match self {
            Self::RelationFetch { source, .. } => Some(source),
            _ => None,
        }
    }

    pub fn is_relation_not_found(&self) -> bool {
        matches!(self.fetch_error(), Some(FetchError::RelationNotFound { .. }))
    }
}

pub type Result<T> = std::result::Result<T, BuildError>;
