//! Table Field Values

use serde::Serialize;
use serde_json::Value;

/// Tabular field (`fieldtype: "table"`)
///
/// Cells are flattened to their `value` strings; non-string cells become
/// empty strings. The original object is kept in `raw`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub raw: Value,
}

impl Table {
    /// Extract header cells from `thead[].value` and body cells from
    /// `tbody[].body[].value`
    ///
    /// # Examples
    ///
    /// ```
    /// use blokspace_core::models::Table;
    /// use serde_json::json;
    ///
    /// let table = Table::from_value(&json!({
    ///     "fieldtype": "table",
    ///     "thead": [{"value": "Plan"}, {"value": "Price"}],
    ///     "tbody": [{"body": [{"value": "Basic"}, {"value": "9"}]}]
    /// }));
    /// assert_eq!(table.columns, vec!["Plan", "Price"]);
    /// assert_eq!(table.rows, vec![vec!["Basic", "9"]]);
    /// ```
    pub fn from_value(value: &Value) -> Self {
        let columns = value
            .get("thead")
            .and_then(Value::as_array)
            .map(|cells| cells.iter().map(cell_value).collect())
            .unwrap_or_default();

        let rows = value
            .get("tbody")
            .and_then(Value::as_array)
            .map(|rows| {
                rows.iter()
                    .map(|row| {
                        row.get("body")
                            .and_then(Value::as_array)
                            .map(|cells| cells.iter().map(cell_value).collect())
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            columns,
            rows,
            raw: value.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }
}

fn cell_value(cell: &Value) -> String {
    cell.get("value")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
