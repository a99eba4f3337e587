//! Field Classifier
//!
//! Decides the typed representation of one raw field. Rules are evaluated in
//! a fixed order and the first match wins:
//!
//! 1. Explicit cast declared by the owner's node type
//! 2. Registry field type for `{component}_{field}`
//! 3. Registry field type for `{field}`
//! 4. Identifier string eligible for resolution → fetched relation
//! 5. Object or array → structural sub-chain
//!    a. `linktype` → link
//!    b. `type == "doc"` → rich text
//!    c. `fieldtype == "asset"` → image or asset by filename
//!    d. `fieldtype == "table"` → table
//!    e. non-empty array, by shape of element 0: identifiers (if eligible) →
//!       fetched relations; objects with `content` → embedded relations;
//!       objects with `component` → nested blocks; objects with `filename` →
//!       multi-asset
//!    f. anything else → raw passthrough
//! 6. String ending in a raster-image extension → image
//! 7. Scalar passthrough
//!
//! A miss at any rule is not an error.

use crate::behaviors::FieldContext;
use crate::models::{
    Asset, FieldValue, Image, Link, RichText, Table, RICH_TEXT_DOCUMENT_TYPE,
};
use crate::services::error::{BuildError, Result};
use crate::services::tree_builder::{BuildContext, Owner, TreeBuilder};
use crate::utils::{compound_field_name, is_image_filename, is_uuid};
use serde_json::{Map, Value};

pub(crate) struct FieldClassifier<'b> {
    builder: &'b TreeBuilder,
}

impl<'b> FieldClassifier<'b> {
    pub(crate) fn new(builder: &'b TreeBuilder) -> Self {
        Self { builder }
    }

    pub(crate) fn classify(
        &self,
        raw: &Value,
        key: &str,
        owner: &Owner<'_>,
        ctx: &mut BuildContext,
    ) -> Result<FieldValue> {
        let value = self.classify_value(raw, key, owner, ctx)?;
        tracing::trace!(
            component = %owner.component(),
            field = key,
            kind = value.kind(),
            "Classified field"
        );
        Ok(value)
    }

    fn classify_value(
        &self,
        raw: &Value,
        key: &str,
        owner: &Owner<'_>,
        ctx: &mut BuildContext,
    ) -> Result<FieldValue> {
        let field_ctx = FieldContext {
            field: key,
            component: owner.component(),
            component_path: owner.component_path,
        };

        if let Some(constructor) = owner.node_type.cast_for(key) {
            return constructor(raw, &field_ctx);
        }

        let registry = self.builder.registry();
        if let Some(constructor) =
            registry.resolve_field(&compound_field_name(owner.component(), key))
        {
            return constructor(raw, &field_ctx);
        }
        if let Some(constructor) = registry.resolve_field(key) {
            return constructor(raw, &field_ctx);
        }

        if let Value::String(s) = raw {
            if is_uuid(s) && self.should_resolve(key, owner) {
                let node = self.builder.resolve_relation(s, key, owner, ctx)?;
                return Ok(FieldValue::ChildNode(Box::new(node)));
            }
        }

        match raw {
            Value::Object(map) => Ok(self.classify_object(map, raw)),
            Value::Array(items) => self.classify_array(items, raw, key, owner, ctx),
            Value::String(s) if is_image_filename(s) => {
                Ok(FieldValue::Image(Image::new(Asset::from_filename(s.clone()))))
            }
            _ => Ok(FieldValue::Scalar(raw.clone())),
        }
    }

    /// Global auto-resolve, the node type's resolve-list, or the configured
    /// resolve-list
    fn should_resolve(&self, key: &str, owner: &Owner<'_>) -> bool {
        let config = self.builder.config();
        config.auto_resolve_relations
            || owner.node_type.resolves_relation(key)
            || config.is_resolve_listed(owner.component(), key)
    }

    fn classify_object(&self, map: &Map<String, Value>, raw: &Value) -> FieldValue {
        if map.contains_key("linktype") {
            return FieldValue::Link(Link::from_value(raw));
        }

        if map.get("type").and_then(Value::as_str) == Some(RICH_TEXT_DOCUMENT_TYPE) {
            return FieldValue::RichText(RichText::new(raw.clone()));
        }

        match map.get("fieldtype").and_then(Value::as_str) {
            Some("asset") => {
                let asset = Asset::from_value(raw);
                if is_image_filename(&asset.filename) {
                    FieldValue::Image(Image::new(asset))
                } else {
                    FieldValue::Asset(asset)
                }
            }
            Some("table") => FieldValue::Table(Table::from_value(raw)),
            _ => FieldValue::Raw(raw.clone()),
        }
    }

    fn classify_array(
        &self,
        items: &[Value],
        raw: &Value,
        key: &str,
        owner: &Owner<'_>,
        ctx: &mut BuildContext,
    ) -> Result<FieldValue> {
        let Some(first) = items.first() else {
            return Ok(FieldValue::Raw(raw.clone()));
        };

        match first {
            Value::String(s) if is_uuid(s) && self.should_resolve(key, owner) => {
                let mut nodes = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    let uuid = item.as_str().ok_or_else(|| {
                        BuildError::field_construction(
                            key,
                            format!("relation list element {} is not an identifier", index),
                        )
                    })?;
                    nodes.push(self.builder.resolve_relation(uuid, key, owner, ctx)?);
                }
                Ok(FieldValue::ChildNodeList(nodes))
            }
            Value::Object(element) if element.contains_key("content") => {
                let mut nodes = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    nodes.push(
                        self.builder
                            .materialize_embedded_relation(item, key, index, owner, ctx)?,
                    );
                }
                Ok(FieldValue::ChildNodeList(nodes))
            }
            Value::Object(element) if element.contains_key("component") => {
                let mut nodes = Vec::with_capacity(items.len());
                for item in items {
                    nodes.push(self.builder.build_child(item, owner, ctx)?);
                }
                Ok(FieldValue::ChildNodeList(nodes))
            }
            Value::Object(element) if element.contains_key("filename") => Ok(
                FieldValue::MultiAsset(items.iter().map(Asset::from_value).collect()),
            ),
            _ => Ok(FieldValue::Raw(raw.clone())),
        }
    }
}
