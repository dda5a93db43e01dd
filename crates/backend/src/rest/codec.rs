//! JSON <-> SQLite value conversion for the generic tables

use sea_orm::{QueryResult, Value};
use serde_json::Value as JsonValue;

use super::TableKind;

/// Metadata columns holding JSON documents as text
const JSON_COLUMNS: [&str; 3] = ["options", "default_value", "definition"];
/// Metadata columns holding booleans as 0/1
const BOOLEAN_COLUMNS: [&str; 4] = ["is_system", "is_required", "is_unique", "is_default"];

fn is_json_column(kind: TableKind, column: &str) -> bool {
    kind == TableKind::Metadata && JSON_COLUMNS.contains(&column)
}

fn is_boolean_column(kind: TableKind, column: &str) -> bool {
    kind == TableKind::Metadata && BOOLEAN_COLUMNS.contains(&column)
}

/// Bind value for one column of a write or filter
pub fn to_sql_value(kind: TableKind, column: &str, value: &JsonValue) -> Value {
    if is_json_column(kind, column) {
        return match value {
            JsonValue::Null => Option::<String>::None.into(),
            other => other.to_string().into(),
        };
    }

    match value {
        JsonValue::Null => Option::<String>::None.into(),
        JsonValue::Bool(b) => i64::from(*b).into(),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => i.into(),
            None => n.as_f64().unwrap_or_default().into(),
        },
        JsonValue::String(s) => s.clone().into(),
        other => other.to_string().into(),
    }
}

/// Bind value for an `eq.` filter given as query-string text
pub fn filter_value(kind: TableKind, column: &str, text: &str) -> Value {
    if is_boolean_column(kind, column) {
        match text {
            "true" => return 1i64.into(),
            "false" => return 0i64.into(),
            _ => {}
        }
    }
    text.to_string().into()
}

/// Read one column whatever storage class it holds
fn read_column(row: &QueryResult, column: &str) -> JsonValue {
    if let Ok(v) = row.try_get::<Option<i64>>("", column) {
        return v.map(JsonValue::from).unwrap_or(JsonValue::Null);
    }
    if let Ok(v) = row.try_get::<Option<f64>>("", column) {
        return v.map(JsonValue::from).unwrap_or(JsonValue::Null);
    }
    if let Ok(v) = row.try_get::<Option<String>>("", column) {
        return v.map(JsonValue::from).unwrap_or(JsonValue::Null);
    }
    JsonValue::Null
}

pub fn row_to_json(kind: TableKind, row: &QueryResult, columns: &[String]) -> JsonValue {
    let object = columns
        .iter()
        .map(|column| {
            let raw = read_column(row, column);
            let value = if is_boolean_column(kind, column) {
                match raw {
                    JsonValue::Number(n) => JsonValue::Bool(n.as_i64().unwrap_or(0) != 0),
                    other => other,
                }
            } else if is_json_column(kind, column) {
                match raw {
                    JsonValue::String(text) => {
                        serde_json::from_str(&text).unwrap_or(JsonValue::String(text))
                    }
                    other => other,
                }
            } else {
                raw
            };
            (column.clone(), value)
        })
        .collect();
    JsonValue::Object(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_columns_are_stored_as_text() {
        let options = json!([{ "label": "Red", "value": "red" }]);
        assert_eq!(
            to_sql_value(TableKind::Metadata, "options", &options),
            Value::from(options.to_string())
        );
        // the same column name on an entity table is plain text
        assert_eq!(
            to_sql_value(TableKind::Entity, "options", &json!("a,b")),
            Value::from("a,b".to_string())
        );
    }

    #[test]
    fn booleans_become_integers() {
        assert_eq!(to_sql_value(TableKind::Entity, "active", &json!(true)), Value::from(1i64));
        assert_eq!(filter_value(TableKind::Metadata, "is_default", "false"), Value::from(0i64));
        assert_eq!(
            filter_value(TableKind::Entity, "is_default", "false"),
            Value::from("false".to_string())
        );
    }

    #[test]
    fn numbers_keep_their_kind() {
        assert_eq!(to_sql_value(TableKind::Entity, "amount", &json!(500)), Value::from(500i64));
        assert_eq!(to_sql_value(TableKind::Entity, "amount", &json!(2.5)), Value::from(2.5f64));
    }
}
