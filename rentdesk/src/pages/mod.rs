//! The desk's form pages. Each page declares its fields and validation,
//! turns a submitted payload into a row, and saves it through a repository.

pub mod client;
pub mod inventory;
pub mod rental;

use deskform::FormValues;
use serde_json::{Map, Value};

/// Remove columns whose value is null, so the backend applies its defaults.
pub fn strip_nulls(mut row: Map<String, Value>) -> Map<String, Value> {
    row.retain(|_, value| !value.is_null());
    row
}

/// A stored column value as form text. Nulls, arrays and objects have no
/// text form.
pub fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Default values for `names` taken from a stored row.
pub fn defaults_from_row(row: &Map<String, Value>, names: &[&str]) -> FormValues {
    names
        .iter()
        .filter_map(|name| {
            let text = row.get(*name).and_then(field_text)?;
            Some((*name, text))
        })
        .collect()
}
