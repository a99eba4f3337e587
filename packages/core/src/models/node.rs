//! Content Node Data Structures
//!
//! This module defines `ContentNode`, the typed tree node produced from one
//! JSON object of a CMS document, together with its metadata and the
//! validation errors raised while splitting raw JSON.
//!
//! # Architecture
//!
//! - **Metadata split**: `component`, `_uid` and `_editable` are structural
//!   metadata; every other key is a content field
//! - **Ordered fields**: classified fields keep the raw document's key order
//! - **Ancestry**: `component_path` runs from the document root to this node,
//!   inclusive
//! - **Back-reference by id**: `parent` names the enclosing node by uid and
//!   component; ownership flows top-down from the root
//!
//! Nodes are built by [`TreeBuilder`](crate::services::TreeBuilder) and are
//! immutable for consumers once returned.
//!
//! # Examples
//!
//! ```rust
//! use blokspace_core::behaviors::TypeRegistry;
//! use blokspace_core::services::TreeBuilder;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let builder = TreeBuilder::new(Arc::new(TypeRegistry::new()));
//! let node = builder
//!     .build(&json!({"component": "hero", "_uid": "1", "title": "Hi"}))
//!     .unwrap();
//!
//! assert_eq!(node.component(), "hero");
//! assert_eq!(node.get_str("title"), Some("Hi"));
//! assert_eq!(node.component_path, vec!["hero"]);
//! ```

use crate::models::FieldValue;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Reserved key holding the component type name
pub const COMPONENT_KEY: &str = "component";

/// Reserved key holding the node's unique identifier
pub const UID_KEY: &str = "_uid";

/// Reserved key holding the editor-integration token
pub const EDITABLE_KEY: &str = "_editable";

/// Validation errors for raw node input
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Node must be a JSON object, got {0}")]
    NotAnObject(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Metadata field '{field}' must be a string")]
    InvalidMetadata { field: String },
}

/// Structural metadata of a node
///
/// `name`, `published_at` and `full_slug` are only populated on relation
/// targets, copied from the relation wrapper rather than the node's content.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NodeMetadata {
    /// Component type name (e.g., "hero", "teaser")
    pub component: String,

    /// Unique identifier (`_uid`), empty when the payload omitted it
    pub uid: String,

    /// Editor-integration token (`_editable`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editable: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_slug: Option<String>,
}

impl NodeMetadata {
    /// Split a raw node into metadata and content fields
    ///
    /// Content fields keep their original key order.
    ///
    /// # Errors
    ///
    /// - `NotAnObject` if `raw` is not a JSON object
    /// - `MissingField("component")` if the component key is absent
    /// - `InvalidMetadata` if a reserved key holds a non-string value
    pub fn split(raw: &Value) -> Result<(Self, Map<String, Value>), ValidationError> {
        let object = raw
            .as_object()
            .ok_or_else(|| ValidationError::NotAnObject(json_type_name(raw).to_string()))?;

        let mut metadata = NodeMetadata::default();
        let mut fields = Map::new();

        for (key, value) in object {
            match key.as_str() {
                COMPONENT_KEY => metadata.component = metadata_string(key, value)?,
                UID_KEY => metadata.uid = metadata_string(key, value)?,
                EDITABLE_KEY => metadata.editable = Some(metadata_string(key, value)?),
                _ => {
                    fields.insert(key.clone(), value.clone());
                }
            }
        }

        if !object.contains_key(COMPONENT_KEY) {
            return Err(ValidationError::MissingField(COMPONENT_KEY.to_string()));
        }

        Ok((metadata, fields))
    }

    /// Relation publish timestamp parsed as RFC 3339 or `YYYY-MM-DD HH:MM`
    pub fn published_at_datetime(&self) -> Option<DateTime<Utc>> {
        self.published_at.as_deref().and_then(crate::behaviors::casts::parse_datetime)
    }

    /// Whether this node was materialized from a relation wrapper
    pub fn is_relation(&self) -> bool {
        self.name.is_some() || self.full_slug.is_some()
    }
}

fn metadata_string(key: &str, value: &Value) -> Result<String, ValidationError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ValidationError::InvalidMetadata {
            field: key.to_string(),
        })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Lightweight back-reference to the enclosing node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeRef {
    pub uid: String,
    pub component: String,
}

/// Typed tree node for one JSON object of a CMS document.
///
/// # Fields
///
/// - `type_name`: Registered node type this node was built as (`Block` by default)
/// - `metadata`: Component name, uid, editor token, relation enrichment
/// - `component_path`: Component names from the root to this node, inclusive
/// - `parent`: Enclosing node, `None` for a root
/// - `fields`: Classified content fields in original key order
/// - `extensions`: Values attached by post-construction initializers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentNode {
    pub type_name: String,

    pub metadata: NodeMetadata,

    pub component_path: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeRef>,

    fields: IndexMap<String, FieldValue>,

    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    extensions: IndexMap<String, Value>,
}

impl ContentNode {
    /// Assemble a node from already classified parts.
    ///
    /// `component_path` must already end with `metadata.component`.
    pub(crate) fn from_parts(
        type_name: String,
        metadata: NodeMetadata,
        component_path: Vec<String>,
        parent: Option<NodeRef>,
        fields: IndexMap<String, FieldValue>,
    ) -> Self {
        debug_assert_eq!(
            component_path.last().map(String::as_str),
            Some(metadata.component.as_str())
        );
        Self {
            type_name,
            metadata,
            component_path,
            parent,
            fields,
            extensions: IndexMap::new(),
        }
    }

    /// Copy relation-wrapper attributes into metadata.
    ///
    /// Only ever called on relation targets, after their own fields are
    /// classified.
    pub(crate) fn enrich_from_relation(
        &mut self,
        name: Option<String>,
        published_at: Option<String>,
        full_slug: Option<String>,
    ) {
        self.metadata.name = name;
        self.metadata.published_at = published_at;
        self.metadata.full_slug = full_slug;
    }

    pub fn component(&self) -> &str {
        &self.metadata.component
    }

    pub fn uid(&self) -> &str {
        &self.metadata.uid
    }

    /// Number of ancestors between this node and the document root
    pub fn depth(&self) -> usize {
        self.component_path.len().saturating_sub(1)
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Reference to this node for use as a child's `parent`
    pub fn node_ref(&self) -> NodeRef {
        NodeRef {
            uid: self.metadata.uid.clone(),
            component: self.metadata.component.clone(),
        }
    }

    /// Whether any ancestor (or this node) has the given component type
    pub fn is_within(&self, component: &str) -> bool {
        self.component_path.iter().any(|c| c == component)
    }

    pub fn fields(&self) -> &IndexMap<String, FieldValue> {
        &self.fields
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn has_field(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// String content of a scalar field
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FieldValue::as_str)
    }

    /// Single nested node of a `ChildNode` field
    pub fn get_node(&self, key: &str) -> Option<&ContentNode> {
        self.get(key).and_then(FieldValue::as_node)
    }

    /// Nested nodes of a `ChildNodeList` field
    pub fn get_nodes(&self, key: &str) -> Option<&[ContentNode]> {
        self.get(key).and_then(FieldValue::as_nodes)
    }

    pub fn extensions(&self) -> &IndexMap<String, Value> {
        &self.extensions
    }

    pub fn extension(&self, key: &str) -> Option<&Value> {
        self.extensions.get(key)
    }

    /// Attach a computed value; used by post-construction initializers
    pub fn set_extension(&mut self, key: impl Into<String>, value: Value) {
        self.extensions.insert(key.into(), value);
    }

    /// Direct child nodes, in field order then array order
    pub fn children(&self) -> impl Iterator<Item = &ContentNode> {
        self.fields.values().flat_map(FieldValue::child_nodes)
    }

    /// All nodes below this one, pre-order
    pub fn descendants(&self) -> Descendants<'_> {
        let mut stack: Vec<&ContentNode> = self.children().collect();
        stack.reverse();
        Descendants { stack }
    }

    /// First node in this subtree (self included) with the given uid
    pub fn find(&self, uid: &str) -> Option<&ContentNode> {
        if self.metadata.uid == uid {
            return Some(self);
        }
        self.descendants().find(|node| node.metadata.uid == uid)
    }
}

/// Pre-order iterator over a node's subtree, see [`ContentNode::descendants`]
pub struct Descendants<'a> {
    stack: Vec<&'a ContentNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a ContentNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        let mut children: Vec<&ContentNode> = node.children().collect();
        children.reverse();
        self.stack.extend(children);
        Some(node)
    }
}
