//! Rich Text Field Values
//!
//! Rich text documents are nested trees rooted at `{"type": "doc"}`. The core
//! only detects them; rendering belongs to the consumer.

use serde::Serialize;
use serde_json::Value;

/// Root `type` marker of a rich-text document
pub const RICH_TEXT_DOCUMENT_TYPE: &str = "doc";

/// Opaque rich-text document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RichText {
    pub document: Value,
}

impl RichText {
    pub fn new(document: Value) -> Self {
        Self { document }
    }

    /// Concatenated `text` leaves, paragraphs separated by a newline
    ///
    /// # Examples
    ///
    /// ```
    /// use blokspace_core::models::RichText;
    /// use serde_json::json;
    ///
    /// let doc = RichText::new(json!({
    ///     "type": "doc",
    ///     "content": [
    ///         {"type": "paragraph", "content": [{"type": "text", "text": "Hello "},
    ///                                           {"type": "text", "text": "world"}]},
    ///         {"type": "paragraph", "content": [{"type": "text", "text": "Bye"}]}
    ///     ]
    /// }));
    /// assert_eq!(doc.plain_text(), "Hello world\nBye");
    /// ```
    pub fn plain_text(&self) -> String {
        let mut blocks = Vec::new();
        if let Some(content) = self.document.get("content").and_then(Value::as_array) {
            for block in content {
                let mut text = String::new();
                collect_text(block, &mut text);
                blocks.push(text);
            }
        }
        blocks.join("\n")
    }
}

fn collect_text(node: &Value, out: &mut String) {
    if let Some(text) = node.get("text").and_then(Value::as_str) {
        out.push_str(text);
    }
    if let Some(children) = node.get("content").and_then(Value::as_array) {
        for child in children {
            collect_text(child, out);
        }
    }
}
