//! Story Documents and Relation Wrappers
//!
//! The delivery API wraps every document in a story envelope:
//!
//! ```json
//! {
//!   "story": {
//!     "id": 104,
//!     "uuid": "3fa2b1c4-58cc-4372-a567-0e02b2c3d479",
//!     "name": "About us",
//!     "slug": "about",
//!     "full_slug": "company/about",
//!     "published_at": "2024-03-01T09:30:00.000Z",
//!     "content": { "component": "page", "_uid": "a1", "body": [] }
//!   }
//! }
//! ```
//!
//! The same envelope (without the outer `story` key) is what a relation
//! resolves to.

use crate::models::ContentNode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Envelope returned for a referenced document
///
/// `name`, `published_at` and `full_slug` are what relation enrichment copies
/// onto the materialized node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationWrapper {
    /// Raw content object of the referenced document
    pub content: Value,

    pub name: String,

    /// Publish timestamp, `None` for never-published drafts
    #[serde(default)]
    pub published_at: Option<String>,

    #[serde(default)]
    pub full_slug: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

impl RelationWrapper {
    /// Parse a wrapper, accepting both `{"story": {...}}` and the bare envelope
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        match value {
            Value::Object(mut map) if map.contains_key("story") && !map.contains_key("content") => {
                let story = map.remove("story").unwrap_or(Value::Null);
                serde_json::from_value(story)
            }
            other => serde_json::from_value(other),
        }
    }
}

/// Fully materialized story document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Story {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,

    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    pub full_slug: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,

    /// Root node of the story's content tree
    pub content: ContentNode,
}
