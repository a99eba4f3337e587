//! Shape predicates used during field classification

use regex::Regex;
use std::sync::LazyLock;

/// Canonical hyphenated 8-4-4-4-12 hex identifier, case-insensitive
const UUID_PATTERN: &str =
    r"(?i)^[a-f0-9]{8}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{12}$";

/// Raster image extensions recognized on asset filenames
const IMAGE_EXTENSION_PATTERN: &str = r"(?i)\.(jpg|jpeg|png|gif|webp)$";

static UUID_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(UUID_PATTERN).unwrap());

static IMAGE_EXTENSION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(IMAGE_EXTENSION_PATTERN).unwrap());

/// Whether `value` is a well-formed unique identifier (relation reference).
///
/// # Examples
///
/// ```
/// use blokspace_core::utils::is_uuid;
///
/// assert!(is_uuid("550e8400-e29b-41d4-a716-446655440000"));
/// assert!(!is_uuid("550e8400e29b41d4a716446655440000"));
/// assert!(!is_uuid("hello"));
/// ```
pub fn is_uuid(value: &str) -> bool {
    UUID_REGEX.is_match(value)
}

/// Whether `filename` ends in a raster-image extension
/// (`.jpg .jpeg .png .gif .webp`, case-insensitive).
pub fn is_image_filename(filename: &str) -> bool {
    IMAGE_EXTENSION_REGEX.is_match(filename)
}
