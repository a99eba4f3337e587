//! Classified Field Values
//!
//! `FieldValue` is the closed set of typed results a raw content field can be
//! classified into. Exactly one variant is active per field. Most variants are
//! produced by the default classification chain; `DateTime` and `Custom` only
//! appear when a host binds a cast or field type that produces them.

use crate::models::{Asset, ContentNode, Image, Link, RichText, Table};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Host-defined field type that carries its raw payload under a type name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomField {
    pub type_name: String,
    pub data: Value,
}

/// Typed representation of one content field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    /// String, number, boolean or null passed through unchanged
    Scalar(Value),

    Asset(Asset),

    Image(Image),

    MultiAsset(Vec<Asset>),

    RichText(RichText),

    Table(Table),

    Link(Link),

    /// Single nested node (resolved relation)
    ChildNode(Box<ContentNode>),

    /// Nested blocks, or resolved relations, in original array order
    ChildNodeList(Vec<ContentNode>),

    DateTime(DateTime<Utc>),

    Custom(CustomField),

    /// Structured value no classification rule matched
    Raw(Value),
}

impl FieldValue {
    /// Variant name, matching the serialized `kind` tag
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Asset(_) => "asset",
            Self::Image(_) => "image",
            Self::MultiAsset(_) => "multi_asset",
            Self::RichText(_) => "rich_text",
            Self::Table(_) => "table",
            Self::Link(_) => "link",
            Self::ChildNode(_) => "child_node",
            Self::ChildNodeList(_) => "child_node_list",
            Self::DateTime(_) => "date_time",
            Self::Custom(_) => "custom",
            Self::Raw(_) => "raw",
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            Self::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// String content of a scalar field
    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(Value::as_str)
    }

    /// Asset attributes of an `Asset` or `Image` field
    pub fn as_asset(&self) -> Option<&Asset> {
        match self {
            Self::Asset(asset) => Some(asset),
            Self::Image(image) => Some(&image.0),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&Image> {
        match self {
            Self::Image(image) => Some(image),
            _ => None,
        }
    }

    pub fn as_assets(&self) -> Option<&[Asset]> {
        match self {
            Self::MultiAsset(assets) => Some(assets),
            _ => None,
        }
    }

    pub fn as_rich_text(&self) -> Option<&RichText> {
        match self {
            Self::RichText(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Self::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn as_link(&self) -> Option<&Link> {
        match self {
            Self::Link(link) => Some(link),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&ContentNode> {
        match self {
            Self::ChildNode(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_nodes(&self) -> Option<&[ContentNode]> {
        match self {
            Self::ChildNodeList(nodes) => Some(nodes),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    pub fn as_custom(&self) -> Option<&CustomField> {
        match self {
            Self::Custom(custom) => Some(custom),
            _ => None,
        }
    }

    pub fn as_raw(&self) -> Option<&Value> {
        match self {
            Self::Raw(value) => Some(value),
            _ => None,
        }
    }

    /// Nested nodes held by this field, empty for non-node variants
    pub fn child_nodes(&self) -> &[ContentNode] {
        match self {
            Self::ChildNode(node) => std::slice::from_ref(node.as_ref()),
            Self::ChildNodeList(nodes) => nodes,
            _ => &[],
        }
    }
}
