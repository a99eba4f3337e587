//! Tests for ContentNode and metadata splitting

#[cfg(test)]
mod tests {
    use crate::models::{
        ContentNode, FieldValue, NodeMetadata, NodeRef, ValidationError,
    };
    use indexmap::IndexMap;
    use serde_json::json;

    fn leaf(component: &str, uid: &str, path: &[&str]) -> ContentNode {
        ContentNode::from_parts(
            "Block".to_string(),
            NodeMetadata {
                component: component.to_string(),
                uid: uid.to_string(),
                ..NodeMetadata::default()
            },
            path.iter().map(|s| s.to_string()).collect(),
            None,
            IndexMap::new(),
        )
    }

    fn page() -> ContentNode {
        let mut fields = IndexMap::new();
        fields.insert("title".to_string(), FieldValue::Scalar(json!("Home")));
        fields.insert(
            "hero".to_string(),
            FieldValue::ChildNode(Box::new(leaf("hero", "h", &["page", "hero"]))),
        );
        fields.insert(
            "body".to_string(),
            FieldValue::ChildNodeList(vec![
                leaf("teaser", "t1", &["page", "teaser"]),
                leaf("teaser", "t2", &["page", "teaser"]),
            ]),
        );
        ContentNode::from_parts(
            "Block".to_string(),
            NodeMetadata {
                component: "page".to_string(),
                uid: "p".to_string(),
                ..NodeMetadata::default()
            },
            vec!["page".to_string()],
            None,
            fields,
        )
    }

    #[test]
    fn test_split_separates_metadata() {
        let (metadata, fields) = NodeMetadata::split(&json!({
            "title": "Hi",
            "component": "hero",
            "_uid": "u1",
            "_editable": "<!--#edit-->",
            "subtitle": "There"
        }))
        .unwrap();

        assert_eq!(metadata.component, "hero");
        assert_eq!(metadata.uid, "u1");
        assert_eq!(metadata.editable.as_deref(), Some("<!--#edit-->"));
        assert!(!metadata.is_relation());
        let keys: Vec<&String> = fields.keys().collect();
        assert_eq!(keys, vec!["title", "subtitle"]);
    }

    #[test]
    fn test_split_without_uid() {
        let (metadata, fields) = NodeMetadata::split(&json!({"component": "hero"})).unwrap();
        assert_eq!(metadata.uid, "");
        assert!(metadata.editable.is_none());
        assert!(fields.is_empty());
    }

    #[test]
    fn test_split_errors() {
        assert_eq!(
            NodeMetadata::split(&json!([1])).unwrap_err(),
            ValidationError::NotAnObject("array".to_string())
        );
        assert_eq!(
            NodeMetadata::split(&json!({"_uid": "x"})).unwrap_err(),
            ValidationError::MissingField("component".to_string())
        );
        assert_eq!(
            NodeMetadata::split(&json!({"component": 3})).unwrap_err(),
            ValidationError::InvalidMetadata {
                field: "component".to_string()
            }
        );
    }

    #[test]
    fn test_published_at_datetime() {
        let metadata = NodeMetadata {
            published_at: Some("2024-03-01 09:30".to_string()),
            ..NodeMetadata::default()
        };
        assert!(metadata.published_at_datetime().is_some());
        assert!(NodeMetadata::default().published_at_datetime().is_none());
    }

    #[test]
    fn test_field_accessors() {
        let node = page();
        assert_eq!(node.get_str("title"), Some("Home"));
        assert_eq!(node.get_node("hero").map(|n| n.uid()), Some("h"));
        assert_eq!(node.get_nodes("body").map(|n| n.len()), Some(2));
        assert!(node.get_node("title").is_none());
        assert!(node.has_field("body"));
        assert!(!node.has_field("missing"));
        let names: Vec<&str> = node.field_names().collect();
        assert_eq!(names, vec!["title", "hero", "body"]);
    }

    #[test]
    fn test_ancestry() {
        let node = page();
        assert!(node.is_root());
        assert_eq!(node.depth(), 0);

        let hero = node.get_node("hero").unwrap();
        assert_eq!(hero.depth(), 1);
        assert!(hero.is_within("page"));
        assert!(!hero.is_within("grid"));
        assert_eq!(
            node.node_ref(),
            NodeRef {
                uid: "p".to_string(),
                component: "page".to_string()
            }
        );
    }

    #[test]
    fn test_children_and_descendants_order() {
        let node = page();
        let children: Vec<&str> = node.children().map(|n| n.uid()).collect();
        assert_eq!(children, vec!["h", "t1", "t2"]);

        let all: Vec<&str> = node.descendants().map(|n| n.uid()).collect();
        assert_eq!(all, vec!["h", "t1", "t2"]);

        assert_eq!(node.find("p").map(|n| n.component()), Some("page"));
        assert_eq!(node.find("t2").map(|n| n.component()), Some("teaser"));
        assert!(node.find("zzz").is_none());
    }

    #[test]
    fn test_enrich_from_relation() {
        let mut node = leaf("author", "a", &["article", "author"]);
        node.enrich_from_relation(
            Some("Ada".to_string()),
            None,
            Some("authors/ada".to_string()),
        );
        assert_eq!(node.metadata.name.as_deref(), Some("Ada"));
        assert_eq!(node.metadata.published_at, None);
        assert!(node.metadata.is_relation());
    }

    #[test]
    fn test_extensions() {
        let mut node = leaf("hero", "h", &["hero"]);
        assert!(node.extensions().is_empty());
        node.set_extension("word_count", json!(3));
        assert_eq!(node.extension("word_count"), Some(&json!(3)));
    }

    #[test]
    fn test_serialize_keeps_field_order() {
        let json = serde_json::to_value(page()).unwrap();
        let keys: Vec<&String> = json["fields"].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["title", "hero", "body"]);
        assert_eq!(json["fields"]["title"], json!({"kind": "scalar", "value": "Home"}));
        assert!(json.get("parent").is_none());
        assert!(json.get("extensions").is_none());
    }
}
