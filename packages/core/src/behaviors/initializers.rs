//! Post-construction initializers
//!
//! Initializers run once per node after all of its fields are classified and
//! before the node is handed to its parent. They may attach extension values
//! but cannot alter classification.

use crate::models::ContentNode;
use crate::services::error::Result;

/// Host-supplied hook keyed by capability name
pub trait NodeInitializer: Send + Sync {
    /// Capability this initializer provides (used in logs and errors)
    fn capability(&self) -> &str;

    fn initialize(&self, node: &mut ContentNode) -> Result<()>;
}

/// Closure-backed initializer, see [`initializer`]
pub struct FnInitializer<F> {
    capability: String,
    f: F,
}

impl<F> NodeInitializer for FnInitializer<F>
where
    F: Fn(&mut ContentNode) -> Result<()> + Send + Sync,
{
    fn capability(&self) -> &str {
        &self.capability
    }

    fn initialize(&self, node: &mut ContentNode) -> Result<()> {
        (self.f)(node)
    }
}

/// Wrap a closure as a [`NodeInitializer`]
///
/// # Examples
///
/// ```
/// use blokspace_core::behaviors::{initializer, NodeType};
/// use serde_json::json;
///
/// let teaser = NodeType::new("Teaser").with_initializer(initializer("word_count", |node| {
///     let words = node.get_str("text").map(|t| t.split_whitespace().count()).unwrap_or(0);
///     node.set_extension("word_count", json!(words));
///     Ok(())
/// }));
/// assert_eq!(teaser.initializers().len(), 1);
/// ```
pub fn initializer<F>(capability: impl Into<String>, f: F) -> FnInitializer<F>
where
    F: Fn(&mut ContentNode) -> Result<()> + Send + Sync,
{
    FnInitializer {
        capability: capability.into(),
        f,
    }
}
