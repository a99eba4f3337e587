//! Data Models
//!
//! This module contains the data structures produced by tree construction:
//!
//! - `ContentNode` - Typed tree node with metadata, ancestry and ordered fields
//! - `FieldValue` - Closed set of classified field representations
//! - Field payload types (Asset, Image, Link, Table, RichText)
//! - `RelationWrapper` / `Story` - Document envelopes from the delivery API

mod asset;
mod field_value;
mod link;
mod node;
mod rich_text;
mod story;
mod table;

#[cfg(test)]
mod node_test;

pub use asset::{Asset, FocusPoint, Image};
pub use field_value::{CustomField, FieldValue};
pub use link::{Link, LinkKind};
pub use node::{
    ContentNode, Descendants, NodeMetadata, NodeRef, ValidationError, COMPONENT_KEY, EDITABLE_KEY,
    UID_KEY,
};
pub use rich_text::{RichText, RICH_TEXT_DOCUMENT_TYPE};
pub use story::{RelationWrapper, Story};
pub use table::Table;
