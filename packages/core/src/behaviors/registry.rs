//! Type Registry
//!
//! Maps component names to [`NodeType`] declarations and field names (plain or
//! compound `{component}_{field}`) to field constructors. Keys are normalized
//! with [`studly_case`] on both registration and lookup, so a binding for
//! `HeroImage` answers lookups for `hero_image` and `hero-image`.
//!
//! # Examples
//!
//! ```
//! use blokspace_core::behaviors::{casts, NodeType, TypeCategory, TypeRegistry};
//!
//! let registry = TypeRegistry::new()
//!     .with_node_type("hero_section", NodeType::new("HeroSection").with_cast("date", casts::datetime()))
//!     .with_field_type("hero_section_background", casts::image());
//!
//! assert!(registry.resolve(TypeCategory::Node, "hero-section").is_some());
//! assert!(registry.resolve(TypeCategory::Field, "HeroSectionBackground").is_some());
//! assert!(registry.resolve(TypeCategory::Field, "background").is_none());
//! assert_eq!(registry.node_type_for("unknown").name(), "Block");
//! ```

use crate::behaviors::NodeInitializer;
use crate::models::FieldValue;
use crate::services::error::Result;
use crate::utils::studly_case;
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Name of the fallback node type used when no component binding exists
pub const DEFAULT_NODE_TYPE: &str = "Block";

/// Where a field constructor is being applied
#[derive(Debug, Clone, Copy)]
pub struct FieldContext<'a> {
    /// Field key within the owning node
    pub field: &'a str,

    /// Component type of the owning node
    pub component: &'a str,

    /// Ancestry of the owning node, root first
    pub component_path: &'a [String],
}

/// Constructor producing a classified value from a raw field
pub type FieldConstructor =
    Arc<dyn Fn(&Value, &FieldContext<'_>) -> Result<FieldValue> + Send + Sync>;

/// Wrap a closure as a [`FieldConstructor`]
pub fn field_type<F>(f: F) -> FieldConstructor
where
    F: Fn(&Value, &FieldContext<'_>) -> Result<FieldValue> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Lookup category for [`TypeRegistry::resolve`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCategory {
    Node,
    Field,
}

/// Result of a successful registry lookup
#[derive(Clone)]
pub enum ResolvedType {
    Node(Arc<NodeType>),
    Field(FieldConstructor),
}

impl fmt::Debug for ResolvedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(node_type) => f.debug_tuple("Node").field(node_type).finish(),
            Self::Field(_) => f.write_str("Field(<constructor>)"),
        }
    }
}

/// Per-component declarations applied while building a node
///
/// - `casts`: explicit field overrides, checked before any other rule
/// - `resolve_relations`: fields whose identifier values are resolved even
///   when global auto-resolve is off
/// - `initializers`: hooks run after field classification, in order
#[derive(Clone)]
pub struct NodeType {
    name: String,
    casts: IndexMap<String, FieldConstructor>,
    resolve_relations: Vec<String>,
    initializers: Vec<Arc<dyn NodeInitializer>>,
}

impl NodeType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            casts: IndexMap::new(),
            resolve_relations: Vec::new(),
            initializers: Vec::new(),
        }
    }

    /// Declare an explicit cast for `field`
    pub fn with_cast(mut self, field: impl Into<String>, constructor: FieldConstructor) -> Self {
        self.casts.insert(field.into(), constructor);
        self
    }

    /// Add `field` to this type's resolve-list
    pub fn with_resolved_relation(mut self, field: impl Into<String>) -> Self {
        self.resolve_relations.push(field.into());
        self
    }

    pub fn with_initializer(mut self, initializer: impl NodeInitializer + 'static) -> Self {
        self.initializers.push(Arc::new(initializer));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cast_for(&self, field: &str) -> Option<&FieldConstructor> {
        self.casts.get(field)
    }

    pub fn resolves_relation(&self, field: &str) -> bool {
        self.resolve_relations.iter().any(|f| f == field)
    }

    pub fn initializers(&self) -> &[Arc<dyn NodeInitializer>] {
        &self.initializers
    }
}

impl Default for NodeType {
    fn default() -> Self {
        Self::new(DEFAULT_NODE_TYPE)
    }
}

impl fmt::Debug for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeType")
            .field("name", &self.name)
            .field("casts", &self.casts.keys().collect::<Vec<_>>())
            .field("resolve_relations", &self.resolve_relations)
            .field(
                "initializers",
                &self
                    .initializers
                    .iter()
                    .map(|i| i.capability().to_string())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Pre-populated lookup table of node and field types
#[derive(Clone)]
pub struct TypeRegistry {
    node_types: HashMap<String, Arc<NodeType>>,
    field_types: HashMap<String, FieldConstructor>,
    fallback: Arc<NodeType>,
}

impl TypeRegistry {
    /// Empty registry with the default `Block` fallback
    pub fn new() -> Self {
        Self {
            node_types: HashMap::new(),
            field_types: HashMap::new(),
            fallback: Arc::new(NodeType::default()),
        }
    }

    /// Bind a component name to a node type
    pub fn register_node_type(&mut self, component: &str, node_type: NodeType) -> &mut Self {
        self.node_types
            .insert(studly_case(component), Arc::new(node_type));
        self
    }

    /// Bind a field name (plain or `{component}_{field}`) to a constructor
    pub fn register_field_type(&mut self, name: &str, constructor: FieldConstructor) -> &mut Self {
        self.field_types.insert(studly_case(name), constructor);
        self
    }

    /// Replace the node type used for unbound components
    pub fn set_fallback_node_type(&mut self, node_type: NodeType) -> &mut Self {
        self.fallback = Arc::new(node_type);
        self
    }

    pub fn with_node_type(mut self, component: &str, node_type: NodeType) -> Self {
        self.register_node_type(component, node_type);
        self
    }

    pub fn with_field_type(mut self, name: &str, constructor: FieldConstructor) -> Self {
        self.register_field_type(name, constructor);
        self
    }

    pub fn with_fallback_node_type(mut self, node_type: NodeType) -> Self {
        self.set_fallback_node_type(node_type);
        self
    }

    /// Look up `name` in `category`; `None` means "no override"
    pub fn resolve(&self, category: TypeCategory, name: &str) -> Option<ResolvedType> {
        match category {
            TypeCategory::Node => self.resolve_node(name).map(ResolvedType::Node),
            TypeCategory::Field => self.resolve_field(name).map(ResolvedType::Field),
        }
    }

    pub fn resolve_node(&self, component: &str) -> Option<Arc<NodeType>> {
        self.node_types.get(&studly_case(component)).cloned()
    }

    pub fn resolve_field(&self, name: &str) -> Option<FieldConstructor> {
        self.field_types.get(&studly_case(name)).cloned()
    }

    /// Node type for a component, falling back to the default type
    pub fn node_type_for(&self, component: &str) -> Arc<NodeType> {
        self.resolve_node(component)
            .unwrap_or_else(|| Arc::clone(&self.fallback))
    }

    pub fn node_type_count(&self) -> usize {
        self.node_types.len()
    }

    pub fn field_type_count(&self) -> usize {
        self.field_types.len()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut node_keys: Vec<_> = self.node_types.keys().collect();
        node_keys.sort();
        let mut field_keys: Vec<_> = self.field_types.keys().collect();
        field_keys.sort();
        f.debug_struct("TypeRegistry")
            .field("node_types", &node_keys)
            .field("field_types", &field_keys)
            .field("fallback", &self.fallback.name())
            .finish()
    }
}
