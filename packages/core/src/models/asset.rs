//! Asset and Image Field Values
//!
//! Assets arrive from the CMS as objects tagged `fieldtype: "asset"`:
//!
//! ```json
//! {
//!   "id": 4021,
//!   "alt": "Mountain lake",
//!   "name": "",
//!   "focus": "640x360:641x361",
//!   "title": "Lake",
//!   "filename": "https://a.cdn.test/f/39898/1280x720/abc123/lake.jpg",
//!   "copyright": "",
//!   "fieldtype": "asset",
//!   "is_external_url": false
//! }
//! ```
//!
//! Extraction is lenient: a missing or mistyped attribute becomes `None` (or an
//! empty filename) instead of an error. Consumers that need a filename are
//! expected to check it themselves.

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// `/{width}x{height}/` segment in CDN asset paths
static DIMENSION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(\d+)x(\d+)/").unwrap());

/// `x1xy1:x2xy2` focus rectangle
static FOCUS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)x(\d+):(\d+)x(\d+)$").unwrap());

/// Generic uploaded asset (documents, video, images)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Asset {
    /// Numeric asset id assigned by the CMS
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// Public URL of the file (may be empty for unset asset fields)
    pub filename: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Focus rectangle as sent by the editor (`640x360:641x361`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,

    pub is_external_url: bool,

    /// Free-form asset metadata (`meta_data` attribute)
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub meta_data: Map<String, Value>,
}

impl Asset {
    /// Extract an asset from a raw JSON value.
    ///
    /// A bare string is treated as the filename; any other non-object value
    /// yields an empty asset.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(filename) => Self::from_filename(filename.clone()),
            Value::Object(map) => Self {
                id: map.get("id").and_then(Value::as_u64),
                filename: string_attr(map, "filename").unwrap_or_default(),
                alt: string_attr(map, "alt"),
                title: string_attr(map, "title"),
                name: string_attr(map, "name"),
                focus: string_attr(map, "focus"),
                copyright: string_attr(map, "copyright"),
                is_external_url: map
                    .get("is_external_url")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
                meta_data: map
                    .get("meta_data")
                    .and_then(Value::as_object)
                    .cloned()
                    .unwrap_or_default(),
            },
            _ => Self::default(),
        }
    }

    /// Asset carrying only a filename (legacy string image fields)
    pub fn from_filename(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            ..Self::default()
        }
    }

    /// Whether the field was left empty in the editor
    pub fn is_empty(&self) -> bool {
        self.filename.is_empty()
    }

    /// File extension, lower-cased, if the filename has one
    pub fn extension(&self) -> Option<String> {
        let last_segment = self.filename.rsplit('/').next()?;
        let (_, ext) = last_segment.rsplit_once('.')?;
        if ext.is_empty() {
            None
        } else {
            Some(ext.to_ascii_lowercase())
        }
    }
}

fn string_attr(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Asset whose filename carries a raster-image extension
///
/// Derefs to [`Asset`] for the shared attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Image(pub Asset);

/// Focal rectangle inside an image, in source pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FocusPoint {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Image {
    pub fn new(asset: Asset) -> Self {
        Self(asset)
    }

    /// Original `(width, height)` parsed from the CDN path, if present
    ///
    /// # Examples
    ///
    /// ```
    /// use blokspace_core::models::{Asset, Image};
    ///
    /// let image = Image::new(Asset::from_filename(
    ///     "https://a.cdn.test/f/39898/1280x720/abc123/lake.jpg",
    /// ));
    /// assert_eq!(image.dimensions(), Some((1280, 720)));
    /// ```
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        let caps = DIMENSION_REGEX.captures(&self.0.filename)?;
        let width = caps.get(1)?.as_str().parse().ok()?;
        let height = caps.get(2)?.as_str().parse().ok()?;
        Some((width, height))
    }

    pub fn width(&self) -> Option<u32> {
        self.dimensions().map(|(w, _)| w)
    }

    pub fn height(&self) -> Option<u32> {
        self.dimensions().map(|(_, h)| h)
    }

    /// Editor-selected focus rectangle, if one was set
    pub fn focus_point(&self) -> Option<FocusPoint> {
        let focus = self.0.focus.as_deref()?;
        let caps = FOCUS_REGEX.captures(focus)?;
        let part = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
        Some(FocusPoint {
            left: part(1)?,
            top: part(2)?,
            right: part(3)?,
            bottom: part(4)?,
        })
    }

    pub fn into_asset(self) -> Asset {
        self.0
    }
}

impl std::ops::Deref for Image {
    type Target = Asset;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
