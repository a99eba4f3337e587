//! BlokSpace Core Content Tree Layer
//!
//! This crate turns the raw JSON of a block-based headless CMS document into a
//! typed tree of content nodes, resolving references to other documents on
//! the way.
//!
//! # Architecture
//!
//! - **Universal node model**: every component becomes a `ContentNode` with
//!   ordered, classified fields; hosts specialize behavior through the registry
//! - **Ordered classification**: each field runs through a fixed rule chain
//!   (casts, registry types, relations, structural shapes, scalars)
//! - **Synchronous relations**: referenced documents are fetched inline through
//!   a `RelationFetcher` and materialized as subtrees
//! - **Fail fast**: the first error anywhere aborts the build
//!
//! # Modules
//!
//! - [`models`] - Data structures (ContentNode, FieldValue, Asset, Link, etc.)
//! - [`behaviors`] - Type registry, node types, casts and initializers
//! - [`services`] - TreeBuilder, relation fetchers and the flat uid index
//! - [`config`] - Relation resolution configuration
//! - [`utils`] - Naming normalization and shape predicates

pub mod behaviors;
pub mod config;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use behaviors::*;
pub use config::{BuildConfig, ConfigError};
pub use models::*;
pub use services::*;
