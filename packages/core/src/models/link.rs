//! Link Field Values
//!
//! Multilink fields are objects carrying a `linktype` attribute. The CMS keeps
//! a denormalized `cached_url` next to the primary target so a story link can
//! be rendered without resolving the referenced story.

use serde::Serialize;
use serde_json::Value;

/// Kind of link target, derived from the `linktype` attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    /// External URL
    Url,
    /// Internal link to another story
    Story,
    /// Link to an uploaded asset
    Asset,
    /// Email address
    Email,
    /// Unrecognized `linktype` value, kept verbatim
    Other(String),
}

impl LinkKind {
    pub fn from_linktype(linktype: &str) -> Self {
        match linktype {
            "url" => Self::Url,
            "story" => Self::Story,
            "asset" => Self::Asset,
            "email" => Self::Email,
            other => Self::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for LinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Url => write!(f, "url"),
            Self::Story => write!(f, "story"),
            Self::Asset => write!(f, "asset"),
            Self::Email => write!(f, "email"),
            Self::Other(kind) => write!(f, "{}", kind),
        }
    }
}

/// Classified link field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub kind: LinkKind,

    /// URL, slug or address the link points at (empty when unset)
    pub target: String,

    /// In-page anchor for story links
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,

    /// The untouched multilink object
    pub raw: Value,
}

impl Link {
    /// Build a link from a multilink object.
    ///
    /// Target selection per kind:
    /// - `url`, `asset` and unknown kinds: `url`, falling back to `cached_url`
    /// - `story`: `story.full_slug` when the link was resolved, else `cached_url`
    /// - `email`: `email`, falling back to `url`
    pub fn from_value(value: &Value) -> Self {
        let attr = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let kind = LinkKind::from_linktype(
            value.get("linktype").and_then(Value::as_str).unwrap_or_default(),
        );

        let target = match kind {
            LinkKind::Story => value
                .get("story")
                .and_then(|story| story.get("full_slug"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .or_else(|| attr("cached_url")),
            LinkKind::Email => attr("email").or_else(|| attr("url")),
            _ => attr("url").or_else(|| attr("cached_url")),
        }
        .unwrap_or_default();

        Self {
            kind,
            target,
            anchor: attr("anchor"),
            raw: value.clone(),
        }
    }

    /// UUID of the referenced story (story links only)
    pub fn story_uuid(&self) -> Option<&str> {
        if self.kind != LinkKind::Story {
            return None;
        }
        self.raw
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }

    /// Value suitable for an `href` attribute
    ///
    /// # Examples
    ///
    /// ```
    /// use blokspace_core::models::Link;
    /// use serde_json::json;
    ///
    /// let link = Link::from_value(&json!({
    ///     "linktype": "story",
    ///     "cached_url": "about/team",
    ///     "anchor": "jobs"
    /// }));
    /// assert_eq!(link.href(), "/about/team#jobs");
    ///
    /// let mail = Link::from_value(&json!({"linktype": "email", "email": "hi@x.test"}));
    /// assert_eq!(mail.href(), "mailto:hi@x.test");
    /// ```
    pub fn href(&self) -> String {
        match self.kind {
            LinkKind::Email => format!("mailto:{}", self.target),
            LinkKind::Story => {
                let mut href = format!("/{}", self.target.trim_start_matches('/'));
                if let Some(anchor) = &self.anchor {
                    href.push('#');
                    href.push_str(anchor);
                }
                href
            }
            _ => self.target.clone(),
        }
    }
}
