//! Node Type System
//!
//! This module provides the host-configured type system consulted during
//! tree construction:
//!
//! - `TypeRegistry` - Name-normalized lookup of node types and field types
//! - `NodeType` - Per-component declarations (casts, resolve-list, initializers)
//! - `casts` - Built-in field constructors a host can bind
//! - `NodeInitializer` - Post-construction hooks run in registration order
//!
//! A registry miss is never an error: node lookups fall back to the default
//! `Block` type and field lookups fall through to the default classification
//! rules.

pub mod casts;
mod initializers;
mod registry;

pub use initializers::{initializer, FnInitializer, NodeInitializer};
pub use registry::{
    field_type, FieldConstructor, FieldContext, NodeType, ResolvedType, TypeCategory,
    TypeRegistry, DEFAULT_NODE_TYPE,
};
