//! Built-in field constructors
//!
//! Hosts bind these as node-type casts or registry field types when a field's
//! raw shape does not announce its type (for example an asset stored as a bare
//! URL, or a datetime string).

use crate::behaviors::{field_type, FieldConstructor};
use crate::models::{Asset, CustomField, FieldValue, Image, Link, RichText, Table};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

/// Pass the raw value through as a scalar
pub fn scalar() -> FieldConstructor {
    field_type(|value, _| Ok(FieldValue::Scalar(value.clone())))
}

pub fn asset() -> FieldConstructor {
    field_type(|value, _| Ok(FieldValue::Asset(Asset::from_value(value))))
}

/// Image regardless of filename extension
pub fn image() -> FieldConstructor {
    field_type(|value, _| Ok(FieldValue::Image(Image::new(Asset::from_value(value)))))
}

/// Array of assets; `null` yields an empty list, any other single value a
/// one-element list
pub fn multi_asset() -> FieldConstructor {
    field_type(|value, _| {
        let assets = match value {
            Value::Array(items) => items.iter().map(Asset::from_value).collect(),
            Value::Null => Vec::new(),
            other => vec![Asset::from_value(other)],
        };
        Ok(FieldValue::MultiAsset(assets))
    })
}

pub fn rich_text() -> FieldConstructor {
    field_type(|value, _| Ok(FieldValue::RichText(RichText::new(value.clone()))))
}

pub fn table() -> FieldConstructor {
    field_type(|value, _| Ok(FieldValue::Table(Table::from_value(value))))
}

pub fn link() -> FieldConstructor {
    field_type(|value, _| Ok(FieldValue::Link(Link::from_value(value))))
}

/// Parse a datetime string; unparseable or non-string input stays a scalar
pub fn datetime() -> FieldConstructor {
    field_type(|value, _| {
        Ok(value
            .as_str()
            .and_then(parse_datetime)
            .map(FieldValue::DateTime)
            .unwrap_or_else(|| FieldValue::Scalar(value.clone())))
    })
}

/// Wrap the raw value in a named [`CustomField`]
pub fn custom(type_name: impl Into<String>) -> FieldConstructor {
    let type_name = type_name.into();
    field_type(move |value, _| {
        Ok(FieldValue::Custom(CustomField {
            type_name: type_name.clone(),
            data: value.clone(),
        }))
    })
}

/// Parse the datetime formats the CMS emits
///
/// Accepts RFC 3339 (`2024-03-01T09:30:00.000Z`), the editor's datetime
/// format (`2024-03-01 09:30`, optionally with seconds) and bare dates. Naive
/// values are taken as UTC.
///
/// # Examples
///
/// ```
/// use blokspace_core::behaviors::casts::parse_datetime;
///
/// assert!(parse_datetime("2024-03-01 09:30").is_some());
/// assert!(parse_datetime("2024-03-01T09:30:00.000Z").is_some());
/// assert!(parse_datetime("next tuesday").is_none());
/// ```
pub fn parse_datetime(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behaviors::FieldContext;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    fn apply(constructor: FieldConstructor, value: Value) -> FieldValue {
        let path = vec!["page".to_string()];
        let ctx = FieldContext {
            field: "f",
            component: "page",
            component_path: &path,
        };
        constructor(&value, &ctx).unwrap()
    }

    #[test]
    fn test_datetime_cast() {
        let value = apply(datetime(), json!("2024-03-01 09:30"));
        let dt = value.as_datetime().unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 3, 1));
        assert_eq!((dt.hour(), dt.minute()), (9, 30));
    }

    #[test]
    fn test_datetime_cast_keeps_unparseable_input() {
        assert_eq!(apply(datetime(), json!("soon")), FieldValue::Scalar(json!("soon")));
        assert_eq!(apply(datetime(), json!(5)), FieldValue::Scalar(json!(5)));
    }

    #[test]
    fn test_parse_datetime_formats() {
        let rfc = parse_datetime("2024-03-01T10:30:00+01:00").unwrap();
        assert_eq!(rfc.hour(), 9);
        assert_eq!(parse_datetime("2024-03-01 09:30:15").unwrap().second(), 15);
        assert_eq!(parse_datetime("2024-03-01").unwrap().hour(), 0);
        assert!(parse_datetime("").is_none());
    }

    #[test]
    fn test_image_cast_ignores_extension() {
        let value = apply(image(), json!("https://cdn.test/file.svg"));
        assert_eq!(value.as_image().unwrap().filename, "https://cdn.test/file.svg");
    }

    #[test]
    fn test_multi_asset_cast_shapes() {
        let list = apply(multi_asset(), json!([{"filename": "a.pdf"}, {"filename": "b.pdf"}]));
        assert_eq!(list.as_assets().map(|a| a.len()), Some(2));
        assert_eq!(apply(multi_asset(), json!(null)).as_assets().map(|a| a.len()), Some(0));
        assert_eq!(apply(multi_asset(), json!("c.pdf")).as_assets().map(|a| a.len()), Some(1));
    }

    #[test]
    fn test_custom_cast() {
        let value = apply(custom("Color"), json!({"hex": "#fff"}));
        let custom = value.as_custom().unwrap();
        assert_eq!(custom.type_name, "Color");
        assert_eq!(custom.data, json!({"hex": "#fff"}));
    }

    #[test]
    fn test_structural_casts() {
        assert_eq!(apply(rich_text(), json!({"type": "doc"})).kind(), "rich_text");
        assert_eq!(apply(table(), json!({})).kind(), "table");
        assert_eq!(apply(link(), json!({"linktype": "url"})).kind(), "link");
        assert_eq!(apply(asset(), json!({"filename": "x.png"})).kind(), "asset");
        assert_eq!(apply(scalar(), json!([1])).kind(), "scalar");
    }
}
