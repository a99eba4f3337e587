//! Tree Builder
//!
//! Recursive construction pipeline turning raw CMS JSON into a materialized
//! [`ContentNode`] tree:
//!
//! 1. Split the raw object into metadata and content fields
//! 2. Extend the parent's component path with this node's component
//! 3. Classify every field, in original key order, through the
//!    [`FieldClassifier`](super::classifier::FieldClassifier)
//! 4. Run the node type's initializers, in registration order
//!
//! Construction is synchronous and single-threaded. Relation fetches block the
//! build; the first error aborts the whole tree.
//!
//! # Examples
//!
//! ```rust
//! use blokspace_core::behaviors::TypeRegistry;
//! use blokspace_core::config::BuildConfig;
//! use blokspace_core::models::RelationWrapper;
//! use blokspace_core::services::{StaticRelationFetcher, TreeBuilder};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let author_uuid = "3fa2b1c4-58cc-4372-a567-0e02b2c3d479";
//! let fetcher = StaticRelationFetcher::new().with_document(
//!     author_uuid,
//!     RelationWrapper::from_value(json!({
//!         "name": "Ada",
//!         "published_at": "2024-03-01T09:30:00.000Z",
//!         "full_slug": "authors/ada",
//!         "content": {"component": "author", "_uid": "au1", "bio": "Hi"}
//!     }))
//!     .unwrap(),
//! );
//!
//! let builder = TreeBuilder::new(Arc::new(TypeRegistry::new()))
//!     .with_fetcher(Arc::new(fetcher))
//!     .with_config(BuildConfig {
//!         resolve_relations: vec!["article.author".to_string()],
//!         ..BuildConfig::default()
//!     });
//!
//! let article = builder
//!     .build(&json!({"component": "article", "_uid": "a1", "author": author_uuid}))
//!     .unwrap();
//!
//! let author = article.get_node("author").unwrap();
//! assert_eq!(author.metadata.name.as_deref(), Some("Ada"));
//! assert_eq!(author.component_path, vec!["article", "author"]);
//! ```

use crate::behaviors::{NodeType, TypeRegistry};
use crate::config::BuildConfig;
use crate::models::{ContentNode, NodeMetadata, NodeRef, RelationWrapper, Story};
use crate::services::classifier::FieldClassifier;
use crate::services::error::{BuildError, Result};
use crate::services::relation_fetcher::{NullRelationFetcher, RelationFetcher};
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Counters collected during one build
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BuildStats {
    pub nodes_built: usize,
    pub relations_fetched: usize,
    pub cache_hits: usize,
}

/// Mutable state scoped to a single build
#[derive(Debug, Default)]
pub(crate) struct BuildContext {
    /// Identifiers of documents currently being materialized, outermost first
    relation_chain: Vec<String>,

    /// Number of fetched relations currently nested on the chain
    relation_depth: usize,

    memo: HashMap<String, RelationWrapper>,

    pub(crate) stats: BuildStats,
}

/// The node whose fields are being classified
pub(crate) struct Owner<'a> {
    pub(crate) node_type: &'a NodeType,
    pub(crate) metadata: &'a NodeMetadata,
    pub(crate) component_path: &'a [String],
}

impl Owner<'_> {
    pub(crate) fn component(&self) -> &str {
        &self.metadata.component
    }

    fn as_parent(&self) -> Parent<'_> {
        Parent {
            node: NodeRef {
                uid: self.metadata.uid.clone(),
                component: self.metadata.component.clone(),
            },
            component_path: self.component_path,
        }
    }
}

/// Ancestry handed to a child under construction
struct Parent<'a> {
    node: NodeRef,
    component_path: &'a [String],
}

/// Builds typed content trees from raw CMS JSON
#[derive(Clone)]
pub struct TreeBuilder {
    registry: Arc<TypeRegistry>,
    fetcher: Arc<dyn RelationFetcher>,
    config: BuildConfig,
}

impl TreeBuilder {
    /// Builder with default configuration and no relation source
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self {
            registry,
            fetcher: Arc::new(NullRelationFetcher),
            config: BuildConfig::default(),
        }
    }

    pub fn with_fetcher(mut self, fetcher: Arc<dyn RelationFetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Replace the configuration
    ///
    /// An invalid configuration is logged and kept; a zero relation depth is
    /// treated as a depth of one when resolving.
    pub fn with_config(mut self, config: BuildConfig) -> Self {
        if let Err(e) = config.validate() {
            tracing::warn!(error = %e, "Builder configured with invalid settings");
        }
        self.config = config;
        self
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Build a root node from a raw content object
    ///
    /// # Errors
    ///
    /// Fails on the first validation, relation or constructor error anywhere in
    /// the tree; no partial tree is returned.
    pub fn build(&self, raw: &Value) -> Result<ContentNode> {
        self.build_with_stats(raw).map(|(node, _)| node)
    }

    /// Build a root node and report build counters
    pub fn build_with_stats(&self, raw: &Value) -> Result<(ContentNode, BuildStats)> {
        let mut ctx = BuildContext::default();
        let node = self.build_node(raw, None, &mut ctx)?;
        tracing::debug!(
            component = %node.component(),
            nodes = ctx.stats.nodes_built,
            fetched = ctx.stats.relations_fetched,
            cache_hits = ctx.stats.cache_hits,
            "Built content tree"
        );
        Ok((node, ctx.stats))
    }

    /// Build a story document from its envelope (`{"story": ...}` or bare)
    pub fn build_story(&self, raw: Value) -> Result<Story> {
        let wrapper = RelationWrapper::from_value(raw)
            .map_err(|e| BuildError::invalid_story(e.to_string()))?;

        let mut ctx = BuildContext::default();
        // A story referencing itself is a cycle too
        if let Some(uuid) = &wrapper.uuid {
            ctx.relation_chain.push(uuid.clone());
        }
        let content = self.build_node(&wrapper.content, None, &mut ctx)?;

        Ok(Story {
            id: wrapper.id,
            uuid: wrapper.uuid,
            name: wrapper.name,
            slug: wrapper.slug,
            full_slug: wrapper.full_slug,
            published_at: wrapper.published_at,
            content,
        })
    }

    fn build_node(
        &self,
        raw: &Value,
        parent: Option<Parent<'_>>,
        ctx: &mut BuildContext,
    ) -> Result<ContentNode> {
        let (metadata, raw_fields) = NodeMetadata::split(raw)?;
        if metadata.uid.is_empty() {
            tracing::warn!(component = %metadata.component, "Node has no _uid");
        }

        let component_path = match &parent {
            Some(parent) => {
                let mut path = parent.component_path.to_vec();
                path.push(metadata.component.clone());
                path
            }
            None => vec![metadata.component.clone()],
        };

        let node_type = self.registry.node_type_for(&metadata.component);

        let mut fields = IndexMap::with_capacity(raw_fields.len());
        {
            let owner = Owner {
                node_type: &node_type,
                metadata: &metadata,
                component_path: &component_path,
            };
            let classifier = FieldClassifier::new(self);
            for (key, value) in &raw_fields {
                let classified = classifier.classify(value, key, &owner, ctx)?;
                fields.insert(key.clone(), classified);
            }
        }

        let mut node = ContentNode::from_parts(
            node_type.name().to_string(),
            metadata,
            component_path,
            parent.map(|p| p.node),
            fields,
        );

        for initializer in node_type.initializers() {
            tracing::trace!(
                capability = initializer.capability(),
                component = %node.component(),
                "Running node initializer"
            );
            initializer.initialize(&mut node)?;
        }

        ctx.stats.nodes_built += 1;
        Ok(node)
    }

    /// Build a child node nested inline under `owner`
    pub(crate) fn build_child(
        &self,
        raw: &Value,
        owner: &Owner<'_>,
        ctx: &mut BuildContext,
    ) -> Result<ContentNode> {
        self.build_node(raw, Some(owner.as_parent()), ctx)
    }

    /// Fetch a referenced document and materialize it under `owner`
    pub(crate) fn resolve_relation(
        &self,
        uuid: &str,
        field: &str,
        owner: &Owner<'_>,
        ctx: &mut BuildContext,
    ) -> Result<ContentNode> {
        if self.config.detect_relation_cycles && ctx.relation_chain.iter().any(|id| id == uuid) {
            let mut chain = ctx.relation_chain.clone();
            chain.push(uuid.to_string());
            return Err(BuildError::CircularRelation {
                uuid: uuid.to_string(),
                chain,
            });
        }
        let max_depth = self.config.max_relation_depth.max(1);
        if ctx.relation_depth >= max_depth {
            return Err(BuildError::RelationDepthExceeded {
                uuid: uuid.to_string(),
                max_depth,
            });
        }

        let wrapper = self.fetch_relation(uuid, field, ctx)?;

        ctx.relation_chain.push(uuid.to_string());
        ctx.relation_depth += 1;
        let result = self.build_child(&wrapper.content, owner, ctx);
        ctx.relation_depth -= 1;
        ctx.relation_chain.pop();

        let mut node = result?;
        node.enrich_from_relation(
            Some(wrapper.name),
            wrapper.published_at,
            Some(wrapper.full_slug),
        );
        Ok(node)
    }

    /// Materialize an already-resolved relation wrapper embedded in the payload
    pub(crate) fn materialize_embedded_relation(
        &self,
        element: &Value,
        field: &str,
        index: usize,
        owner: &Owner<'_>,
        ctx: &mut BuildContext,
    ) -> Result<ContentNode> {
        let content = element
            .get("content")
            .filter(|content| content.is_object())
            .ok_or_else(|| {
                BuildError::field_construction(
                    field,
                    format!("embedded relation element {} has no content object", index),
                )
            })?;
        let mut node = self.build_child(content, owner, ctx)?;

        let attr = |key: &str| element.get(key).and_then(Value::as_str).map(str::to_string);
        node.enrich_from_relation(attr("name"), attr("published_at"), attr("full_slug"));
        Ok(node)
    }

    fn fetch_relation(
        &self,
        uuid: &str,
        field: &str,
        ctx: &mut BuildContext,
    ) -> Result<RelationWrapper> {
        if self.config.cache_relations {
            if let Some(wrapper) = ctx.memo.get(uuid) {
                tracing::debug!(uuid, field, "Relation cache hit");
                ctx.stats.cache_hits += 1;
                return Ok(wrapper.clone());
            }
        }

        tracing::debug!(uuid, field, "Fetching relation");
        let wrapper = self
            .fetcher
            .fetch(uuid)
            .map_err(|e| BuildError::relation_fetch(field, e))?;
        ctx.stats.relations_fetched += 1;

        if self.config.cache_relations {
            ctx.memo.insert(uuid.to_string(), wrapper.clone());
        }
        Ok(wrapper)
    }
}

impl std::fmt::Debug for TreeBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeBuilder")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
