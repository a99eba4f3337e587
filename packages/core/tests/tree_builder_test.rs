//! Integration tests for TreeBuilder
//!
//! Tests cover:
//! - Field classification on realistic documents
//! - Component path and parent back-references
//! - Key order preservation
//! - Node types, casts and initializers from the registry
//! - Story envelopes
//! - Serialized output

use anyhow::Result;
use blokspace_core::behaviors::{casts, initializer, NodeType, TypeRegistry};
use blokspace_core::models::{ContentNode, FieldValue, LinkKind};
use blokspace_core::services::{BuildError, FlatIndex, TreeBuilder};
use serde_json::{json, Value};
use std::sync::Arc;

fn default_builder() -> TreeBuilder {
    TreeBuilder::new(Arc::new(TypeRegistry::new()))
}

fn landing_page() -> Value {
    json!({
        "component": "page",
        "_uid": "page-1",
        "_editable": "<!--#storyblok#{\"id\":1}-->",
        "title": "Welcome",
        "banner": {
            "id": 88,
            "fieldtype": "asset",
            "filename": "https://a.cdn.test/f/1/1600x900/abc/banner.png",
            "alt": "Banner",
            "focus": null
        },
        "cta": {"linktype": "url", "url": "https://x.test", "cached_url": "https://x.test"},
        "intro": {"type": "doc", "content": [
            {"type": "paragraph", "content": [{"type": "text", "text": "Hello"}]}
        ]},
        "body": [
            {"component": "grid", "_uid": "grid-1", "columns": [
                {"component": "card", "_uid": "card-1", "title": "A"},
                {"component": "card", "_uid": "card-2", "title": "B"}
            ]},
            {"component": "card", "_uid": "card-3", "title": "C", "icon": "star.svg"}
        ],
        "downloads": [{"filename": "a.pdf"}, {"filename": "b.pdf"}],
        "pricing": {"fieldtype": "table", "thead": [{"value": "Plan"}], "tbody": []},
        "tags": ["news", "events"],
        "views": 42
    })
}

// =========================================================================
// Classification Tests
// =========================================================================

#[test]
fn test_hero_scalar_field() -> Result<()> {
    let node = default_builder().build(&json!({"component": "hero", "_uid": "1", "title": "Hi"}))?;

    assert_eq!(node.get("title"), Some(&FieldValue::Scalar(json!("Hi"))));
    assert_eq!(node.component_path, vec!["hero"]);
    assert_eq!(node.type_name, "Block");
    assert!(node.is_root());
    Ok(())
}

#[test]
fn test_landing_page_classification() -> Result<()> {
    let node = default_builder().build(&landing_page())?;

    assert_eq!(node.get("title").map(FieldValue::kind), Some("scalar"));
    assert_eq!(node.get("banner").map(FieldValue::kind), Some("image"));
    assert_eq!(node.get("cta").map(FieldValue::kind), Some("link"));
    assert_eq!(node.get("intro").map(FieldValue::kind), Some("rich_text"));
    assert_eq!(node.get("body").map(FieldValue::kind), Some("child_node_list"));
    assert_eq!(node.get("downloads").map(FieldValue::kind), Some("multi_asset"));
    assert_eq!(node.get("pricing").map(FieldValue::kind), Some("table"));
    assert_eq!(node.get("tags").map(FieldValue::kind), Some("raw"));
    assert_eq!(node.get("views").map(FieldValue::kind), Some("scalar"));

    let banner = node.get("banner").and_then(FieldValue::as_image).unwrap();
    assert_eq!(banner.dimensions(), Some((1600, 900)));
    assert_eq!(banner.alt.as_deref(), Some("Banner"));

    let cta = node.get("cta").and_then(FieldValue::as_link).unwrap();
    assert_eq!(cta.kind, LinkKind::Url);
    assert_eq!(cta.href(), "https://x.test");

    let intro = node.get("intro").and_then(FieldValue::as_rich_text).unwrap();
    assert_eq!(intro.plain_text(), "Hello");

    assert_eq!(node.metadata.editable.as_deref(), Some("<!--#storyblok#{\"id\":1}-->"));
    Ok(())
}

#[test]
fn test_link_precedes_rich_text() -> Result<()> {
    let node = default_builder().build(&json!({
        "component": "hero",
        "cta": {"linktype": "url", "url": "https://x.test", "type": "doc"}
    }))?;
    assert!(node.get("cta").and_then(FieldValue::as_link).is_some());
    Ok(())
}

#[test]
fn test_asset_image_banner() -> Result<()> {
    let node = default_builder().build(&json!({
        "component": "hero",
        "banner": {"fieldtype": "asset", "filename": "pic.png"}
    }))?;
    assert_eq!(
        node.get("banner").and_then(FieldValue::as_image).map(|i| i.filename.as_str()),
        Some("pic.png")
    );
    Ok(())
}

#[test]
fn test_image_filename_string() -> Result<()> {
    let node = default_builder().build(&landing_page())?;
    let card = node.find("card-3").unwrap();
    // svg is not a raster extension
    assert!(card.get("icon").unwrap().is_scalar());
    Ok(())
}

// =========================================================================
// Structure Tests
// =========================================================================

#[test]
fn test_nested_blocks_inherit_path() -> Result<()> {
    let node = default_builder().build(&json!({
        "component": "section",
        "_uid": "s",
        "items": [
            {"component": "card", "_uid": "c1", "title": "A"},
            {"component": "card", "_uid": "c2", "title": "B"}
        ]
    }))?;

    let items = node.get_nodes("items").unwrap();
    assert_eq!(items.len(), 2);
    for item in items {
        assert_eq!(item.component_path, vec!["section", "card"]);
        let parent = item.parent.as_ref().unwrap();
        assert_eq!(parent.uid, "s");
        assert_eq!(parent.component, "section");
    }
    assert_eq!(items[0].get_str("title"), Some("A"));
    assert_eq!(items[1].get_str("title"), Some("B"));
    Ok(())
}

fn assert_path_invariant(node: &ContentNode, depth: usize) {
    assert_eq!(node.component_path.len(), depth + 1);
    assert_eq!(node.component_path.last().map(String::as_str), Some(node.component()));
    assert_eq!(node.depth(), depth);
    for child in node.children() {
        assert_eq!(&child.component_path[..=depth], &node.component_path[..]);
        assert_path_invariant(child, depth + 1);
    }
}

#[test]
fn test_path_invariant_holds_everywhere() -> Result<()> {
    let node = default_builder().build(&landing_page())?;
    assert_path_invariant(&node, 0);

    let card = node.find("card-2").unwrap();
    assert_eq!(card.component_path, vec!["page", "grid", "card"]);
    Ok(())
}

#[test]
fn test_field_order_preserved() -> Result<()> {
    let node = default_builder().build(&json!({
        "component": "hero",
        "zeta": 1,
        "alpha": 2,
        "_uid": "u",
        "mid": 3
    }))?;
    let names: Vec<&str> = node.field_names().collect();
    assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    Ok(())
}

#[test]
fn test_descendants_and_flat_index() -> Result<()> {
    let node = default_builder().build(&landing_page())?;

    let uids: Vec<&str> = node.descendants().map(|n| n.uid()).collect();
    assert_eq!(uids, vec!["grid-1", "card-1", "card-2", "card-3"]);

    let index = FlatIndex::build(&node);
    assert_eq!(index.len(), 5);
    assert_eq!(index.parent_of("card-1").map(|n| n.uid()), Some("grid-1"));
    Ok(())
}

// =========================================================================
// Validation Tests
// =========================================================================

#[test]
fn test_missing_component_fails() {
    let err = default_builder().build(&json!({"_uid": "x"})).unwrap_err();
    assert!(matches!(err, BuildError::Validation(_)));
}

#[test]
fn test_invalid_nested_block_fails_whole_tree() {
    let err = default_builder()
        .build(&json!({
            "component": "page",
            "body": [{"component": "ok"}, {"component": 5}]
        }))
        .unwrap_err();
    assert!(err.to_string().contains("'component' must be a string"));
}

#[test]
fn test_non_object_root_fails() {
    let err = default_builder().build(&json!("page")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Node validation failed: Node must be a JSON object, got string"
    );
}

// =========================================================================
// Registry Tests
// =========================================================================

#[test]
fn test_registered_node_type_and_casts() -> Result<()> {
    let registry = TypeRegistry::new()
        .with_node_type(
            "event",
            NodeType::new("Event")
                .with_cast("starts_at", casts::datetime())
                .with_cast("poster", casts::image()),
        )
        .with_field_type("event_color", casts::custom("Color"));
    let builder = TreeBuilder::new(Arc::new(registry));

    let node = builder.build(&json!({
        "component": "event",
        "starts_at": "2024-06-01 18:00",
        "poster": "https://cdn.test/poster",
        "color": "#ff0000",
        "nested": [{"component": "speaker", "color": "#00ff00"}]
    }))?;

    assert_eq!(node.type_name, "Event");
    assert!(node.get("starts_at").and_then(FieldValue::as_datetime).is_some());
    assert!(node.get("poster").and_then(FieldValue::as_image).is_some());
    assert_eq!(
        node.get("color").and_then(FieldValue::as_custom).map(|c| c.type_name.as_str()),
        Some("Color")
    );

    // Compound lookup is keyed by the owning component
    let speaker = &node.get_nodes("nested").unwrap()[0];
    assert_eq!(speaker.type_name, "Block");
    assert!(speaker.get("color").unwrap().is_scalar());
    Ok(())
}

#[test]
fn test_registry_names_are_normalized() -> Result<()> {
    let registry = TypeRegistry::new().with_node_type("feature-list", NodeType::new("FeatureList"));
    let builder = TreeBuilder::new(Arc::new(registry));
    let node = builder.build(&json!({"component": "feature_list"}))?;
    assert_eq!(node.type_name, "FeatureList");
    Ok(())
}

#[test]
fn test_initializers_run_in_order_after_fields() -> Result<()> {
    let registry = TypeRegistry::new().with_node_type(
        "article",
        NodeType::new("Article")
            .with_initializer(initializer("word_count", |node: &mut ContentNode| {
                let words = node.get_str("text").map(|t| t.split_whitespace().count()).unwrap_or(0);
                node.set_extension("word_count", json!(words));
                Ok(())
            }))
            .with_initializer(initializer("reading_time", |node: &mut ContentNode| {
                let words = node.extension("word_count").and_then(Value::as_u64).unwrap_or(0);
                node.set_extension("reading_time", json!(words.div_ceil(200)));
                Ok(())
            })),
    );
    let builder = TreeBuilder::new(Arc::new(registry));

    let node = builder.build(&json!({"component": "article", "text": "one two three"}))?;
    assert_eq!(node.extension("word_count"), Some(&json!(3)));
    assert_eq!(node.extension("reading_time"), Some(&json!(1)));
    let keys: Vec<&String> = node.extensions().keys().collect();
    assert_eq!(keys, vec!["word_count", "reading_time"]);
    Ok(())
}

#[test]
fn test_initializer_failure_aborts_build() {
    let registry = TypeRegistry::new().with_node_type(
        "card",
        NodeType::new("Card").with_initializer(initializer("require_title", |node: &mut ContentNode| {
            if node.has_field("title") {
                Ok(())
            } else {
                Err(BuildError::initializer("require_title", node.component(), "missing title"))
            }
        })),
    );
    let builder = TreeBuilder::new(Arc::new(registry));

    let err = builder
        .build(&json!({"component": "page", "body": [{"component": "card"}]}))
        .unwrap_err();
    assert!(matches!(err, BuildError::Initializer { ref capability, .. } if capability == "require_title"));
}

// =========================================================================
// Story Tests
// =========================================================================

#[test]
fn test_build_story_envelope() -> Result<()> {
    let story = default_builder().build_story(json!({
        "story": {
            "id": 104,
            "uuid": "3fa2b1c4-58cc-4372-a567-0e02b2c3d479",
            "name": "Home",
            "slug": "home",
            "full_slug": "home",
            "published_at": "2024-03-01T09:30:00.000Z",
            "content": landing_page()
        }
    }))?;

    assert_eq!(story.id, Some(104));
    assert_eq!(story.name, "Home");
    assert_eq!(story.content.component(), "page");
    // The root content is not itself a relation target
    assert!(!story.content.metadata.is_relation());
    Ok(())
}

#[test]
fn test_build_story_rejects_bad_envelope() {
    let err = default_builder().build_story(json!({"story": {"name": "x"}})).unwrap_err();
    assert!(matches!(err, BuildError::InvalidStory(_)));
}

// =========================================================================
// Serialization Tests
// =========================================================================

#[test]
fn test_serialized_tree_shape() -> Result<()> {
    let node = default_builder().build(&json!({
        "component": "section",
        "_uid": "s",
        "title": "T",
        "items": [{"component": "card", "_uid": "c"}]
    }))?;
    let json = serde_json::to_value(&node)?;

    assert_eq!(json["type_name"], "Block");
    assert_eq!(json["metadata"]["component"], "section");
    assert_eq!(json["component_path"], json!(["section"]));
    assert_eq!(json["fields"]["title"], json!({"kind": "scalar", "value": "T"}));
    let card = &json["fields"]["items"]["value"][0];
    assert_eq!(card["parent"], json!({"uid": "s", "component": "section"}));
    assert_eq!(card["component_path"], json!(["section", "card"]));
    Ok(())
}
