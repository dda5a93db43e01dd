//! Dynamic records
//!
//! Rows of entity tables travel as plain JSON objects (`RawRecord`). The UI
//! rebuilds a typed [`Record`] from a row and the entity's field definitions;
//! each column becomes a [`FieldValue`] chosen by the field's type.

use std::borrow::Cow;
use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use super::metadata::{FieldDefinition, FieldType};

/// A row exactly as the data backend returns it
pub type RawRecord = serde_json::Map<String, Value>;

/// Typed column values keyed by field name
pub type RecordValues = BTreeMap<String, FieldValue>;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const DATETIME_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    #[default]
    Null,
    Text(String),
    Number(f64),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    /// `value` of one of the field's options
    OptionRef(String),
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).naive_utc());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", DATETIME_INPUT_FORMAT, "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .ok()
        .or_else(|| parse_datetime(s).map(|dt| dt.date()))
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "on" | "1" | "yes" => Some(true),
        "false" | "off" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl FieldValue {
    /// Interpret a JSON column by the owning field's type.
    ///
    /// Values that do not fit the type (e.g. "abc" in a number column) are
    /// kept as `Text` so validation can report them instead of losing them.
    pub fn from_json(field_type: FieldType, value: &Value) -> Self {
        if value.is_null() {
            return Self::Null;
        }
        if let Value::String(s) = value {
            if s.is_empty() {
                return Self::Null;
            }
        }

        match field_type {
            FieldType::Number => match value {
                Value::Number(n) => n.as_f64().map(Self::Number).unwrap_or(Self::Null),
                Value::String(s) => s
                    .trim()
                    .parse::<f64>()
                    .map(Self::Number)
                    .unwrap_or_else(|_| Self::Text(s.clone())),
                other => Self::Text(other.to_string()),
            },
            FieldType::Checkbox => match value {
                Value::Bool(b) => Self::Boolean(*b),
                Value::Number(n) => Self::Boolean(n.as_f64().unwrap_or(0.0) != 0.0),
                Value::String(s) => parse_bool(s)
                    .map(Self::Boolean)
                    .unwrap_or_else(|| Self::Text(s.clone())),
                other => Self::Text(other.to_string()),
            },
            FieldType::Date => {
                let text = scalar_text(value);
                parse_date(&text).map(Self::Date).unwrap_or(Self::Text(text))
            }
            FieldType::Datetime => {
                let text = scalar_text(value);
                parse_datetime(&text)
                    .map(Self::DateTime)
                    .unwrap_or(Self::Text(text))
            }
            FieldType::Select | FieldType::Radio => Self::OptionRef(scalar_text(value)),
            FieldType::Text
            | FieldType::Textarea
            | FieldType::Email
            | FieldType::Url
            | FieldType::Relation => Self::Text(scalar_text(value)),
        }
    }

    /// Interpret the raw text of a form input
    pub fn from_input(field_type: FieldType, input: &str) -> Self {
        Self::from_json(field_type, &Value::String(input.to_string()))
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Text(s) | Self::OptionRef(s) => Value::String(s.clone()),
            Self::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Self::Boolean(b) => Value::Bool(*b),
            Self::Date(d) => Value::String(d.format(DATE_FORMAT).to_string()),
            Self::DateTime(dt) => Value::String(dt.format(DATETIME_FORMAT).to_string()),
        }
    }

    /// Text for pre-filling a form input
    pub fn to_input_text(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Text(s) | Self::OptionRef(s) => s.clone(),
            Self::Number(n) => format_number(*n),
            Self::Boolean(b) => b.to_string(),
            Self::Date(d) => d.format(DATE_FORMAT).to_string(),
            Self::DateTime(dt) => dt.format(DATETIME_INPUT_FORMAT).to_string(),
        }
    }

    /// Null and whitespace-only text count as missing
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) | Self::OptionRef(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Text that free-text search looks at; numbers and booleans are skipped
    pub fn search_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Text(s) | Self::OptionRef(s) => Some(Cow::Borrowed(s.as_str())),
            Self::Date(d) => Some(Cow::Owned(d.format(DATE_FORMAT).to_string())),
            Self::DateTime(dt) => Some(Cow::Owned(dt.format(DATETIME_FORMAT).to_string())),
            _ => None,
        }
    }
}

pub(crate) fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// A typed row of an entity table
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    pub id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
    /// Every non-system column, typed where a field definition exists
    pub values: RecordValues,
}

static NULL_VALUE: FieldValue = FieldValue::Null;

impl Record {
    /// Columns without a field definition are kept as text.
    pub fn from_row(row: &RawRecord, fields: &[FieldDefinition]) -> Self {
        let mut record = Record::default();

        for (column, value) in row {
            match column.as_str() {
                "id" => record.id = scalar_text(value),
                "created_at" => {
                    record.created_at = value
                        .as_str()
                        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                        .map(|dt| dt.with_timezone(&Utc));
                }
                "created_by" => {
                    record.created_by = value.as_str().map(str::to_string);
                }
                _ => {
                    let typed = match fields.iter().find(|f| &f.name == column) {
                        Some(field) => FieldValue::from_json(field.field_type, value),
                        None if value.is_null() => FieldValue::Null,
                        None => FieldValue::Text(scalar_text(value)),
                    };
                    record.values.insert(column.clone(), typed);
                }
            }
        }

        record
    }

    pub fn get(&self, name: &str) -> &FieldValue {
        self.values.get(name).unwrap_or(&NULL_VALUE)
    }

    /// Heading for the details page: the first field's value if set
    pub fn title(&self, fields: &[FieldDefinition]) -> Option<String> {
        fields
            .iter()
            .find(|f| !f.is_system_column())
            .map(|f| self.get(&f.name))
            .filter(|v| !v.is_empty())
            .map(FieldValue::to_input_text)
    }
}

/// Write payload for insert/update: only the given columns are sent
pub fn record_payload(values: &RecordValues) -> RawRecord {
    values
        .iter()
        .map(|(name, value)| (name.clone(), value.to_json()))
        .collect()
}

/// Typed values of the form inputs for the given fields, keyed by field name
pub fn values_from_inputs<'a>(
    fields: &[FieldDefinition],
    inputs: impl Fn(&str) -> Option<&'a str>,
) -> RecordValues {
    fields
        .iter()
        .filter(|f| !f.is_system_column())
        .map(|f| {
            let value = inputs(&f.name)
                .map(|text| FieldValue::from_input(f.field_type, text))
                .unwrap_or_default();
            (f.name.clone(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn field(name: &str, field_type: FieldType) -> FieldDefinition {
        FieldDefinition {
            id: format!("f_{}", name),
            entity_id: "e1".into(),
            name: name.into(),
            label: name.into(),
            field_type,
            is_required: false,
            is_unique: false,
            default_value: None,
            options: None,
            display_order: 0,
        }
    }

    #[test]
    fn row_is_typed_by_field_definitions() {
        let fields = vec![
            field("amount", FieldType::Number),
            field("active", FieldType::Checkbox),
            field("stage", FieldType::Select),
            field("closes_on", FieldType::Date),
        ];
        let row = json!({
            "id": "r1",
            "created_at": "2024-03-01T10:00:00Z",
            "created_by": "u1",
            "amount": 500,
            "active": 1,
            "stage": "won",
            "closes_on": "2024-04-30",
            "legacy": 7
        });
        let record = Record::from_row(row.as_object().unwrap(), &fields);

        assert_eq!(record.id, "r1");
        assert_eq!(record.created_by.as_deref(), Some("u1"));
        assert!(record.created_at.is_some());
        assert_eq!(record.get("amount"), &FieldValue::Number(500.0));
        assert_eq!(record.get("active"), &FieldValue::Boolean(true));
        assert_eq!(record.get("stage"), &FieldValue::OptionRef("won".into()));
        assert_eq!(
            record.get("closes_on"),
            &FieldValue::Date(NaiveDate::from_ymd_opt(2024, 4, 30).unwrap())
        );
        assert_eq!(record.get("legacy"), &FieldValue::Text("7".into()));
        assert_eq!(record.get("missing"), &FieldValue::Null);
    }

    #[test]
    fn unparsable_input_stays_text() {
        assert_eq!(
            FieldValue::from_input(FieldType::Number, "abc"),
            FieldValue::Text("abc".into())
        );
        assert_eq!(FieldValue::from_input(FieldType::Number, ""), FieldValue::Null);
        assert_eq!(
            FieldValue::from_input(FieldType::Number, "12.5"),
            FieldValue::Number(12.5)
        );
    }

    #[test]
    fn datetime_input_round_trips() {
        let value = FieldValue::from_input(FieldType::Datetime, "2024-05-06T07:08");
        assert_eq!(value.to_input_text(), "2024-05-06T07:08");
        assert_eq!(value.to_json(), json!("2024-05-06T07:08:00"));
    }

    #[test]
    fn payload_contains_only_given_columns() {
        let mut values = RecordValues::new();
        values.insert("amount".into(), FieldValue::Number(500.0));
        values.insert("note".into(), FieldValue::Null);
        let payload = record_payload(&values);
        assert_eq!(Value::Object(payload), json!({ "amount": 500.0, "note": null }));
    }

    #[test]
    fn inputs_skip_system_columns() {
        let fields = vec![field("name", FieldType::Text), field("created_by", FieldType::Text)];
        let values = values_from_inputs(&fields, |name| match name {
            "name" => Some("Acme"),
            _ => Some("someone"),
        });
        assert_eq!(values.len(), 1);
        assert_eq!(values["name"], FieldValue::Text("Acme".into()));
    }

    #[test]
    fn integral_numbers_print_without_fraction() {
        assert_eq!(FieldValue::Number(500.0).to_input_text(), "500");
        assert_eq!(FieldValue::Number(0.25).to_input_text(), "0.25");
    }
}
