//! Record list rules: visible columns, sorting, search and cell text

use std::cmp::Ordering;

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use super::metadata::FieldDefinition;
use super::record::{FieldValue, Record};

/// How many dynamic fields a list shows before the synthetic columns
pub const LIST_FIELD_LIMIT: usize = 5;
pub const CREATED_AT: &str = "created_at";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ListColumn<'a> {
    Field(&'a FieldDefinition),
    CreatedAt,
    Actions,
}

impl ListColumn<'_> {
    pub fn header(&self) -> &str {
        match self {
            Self::Field(f) => f.label.as_str(),
            Self::CreatedAt => "Created",
            Self::Actions => "Actions",
        }
    }

    /// Key passed to [`SortState::toggle`]; the actions column is not sortable
    pub fn sort_key(&self) -> Option<&str> {
        match self {
            Self::Field(f) => Some(f.name.as_str()),
            Self::CreatedAt => Some(CREATED_AT),
            Self::Actions => None,
        }
    }
}

/// First five non-system fields by `display_order`, then created-at and actions
pub fn list_columns(fields: &[FieldDefinition]) -> Vec<ListColumn<'_>> {
    let mut ordered: Vec<&FieldDefinition> =
        fields.iter().filter(|f| !f.is_system_column()).collect();
    ordered.sort_by_key(|f| f.display_order);

    ordered
        .into_iter()
        .take(LIST_FIELD_LIMIT)
        .map(ListColumn::Field)
        .chain([ListColumn::CreatedAt, ListColumn::Actions])
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub key: String,
    pub direction: SortDirection,
}

impl Default for SortState {
    /// Newest records first
    fn default() -> Self {
        Self {
            key: CREATED_AT.to_string(),
            direction: SortDirection::Descending,
        }
    }
}

impl SortState {
    /// Same key flips the direction, a new key starts ascending
    pub fn toggle(&mut self, key: &str) {
        if self.key == key {
            self.direction = match self.direction {
                SortDirection::Ascending => SortDirection::Descending,
                SortDirection::Descending => SortDirection::Ascending,
            };
        } else {
            self.key = key.to_string();
            self.direction = SortDirection::Ascending;
        }
    }

    pub fn is_ascending(&self) -> bool {
        self.direction == SortDirection::Ascending
    }
}

/// Numbers compare numerically, `created_at` by timestamp, everything else
/// as text. Missing values sort as empty text.
pub fn compare_records(a: &Record, b: &Record, key: &str) -> Ordering {
    if key == CREATED_AT {
        return a.created_at.cmp(&b.created_at);
    }
    match (a.get(key), b.get(key)) {
        (FieldValue::Number(x), FieldValue::Number(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (x, y) => x.to_input_text().cmp(&y.to_input_text()),
    }
}

/// Stable: records that compare equal keep their relative order
pub fn sort_records(records: &mut [Record], sort: &SortState) {
    records.sort_by(|a, b| {
        let ordering = compare_records(a, b, &sort.key);
        if sort.is_ascending() {
            ordering
        } else {
            ordering.reverse()
        }
    });
}

/// Case-insensitive substring match against any textual value, the
/// `id`, `created_by` and `created_at` columns included
pub fn record_matches(record: &Record, term: &str) -> bool {
    let needle = term.to_lowercase();
    let hit = |text: &str| text.to_lowercase().contains(&needle);

    let created_at = record
        .created_at
        .map(|at| at.to_rfc3339_opts(SecondsFormat::AutoSi, true));
    if hit(&record.id)
        || record.created_by.as_deref().is_some_and(hit)
        || created_at.as_deref().is_some_and(hit)
    {
        return true;
    }

    record
        .values
        .values()
        .any(|value| value.search_text().is_some_and(|text| hit(&text)))
}

/// Blank terms keep every record
pub fn filter_records(records: Vec<Record>, term: &str) -> Vec<Record> {
    if term.trim().is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter(|r| record_matches(r, term))
        .collect()
}

/// Table cell text; option values are shown by their label
pub fn format_cell(field: &FieldDefinition, value: &FieldValue) -> String {
    match value {
        FieldValue::Null => "-".to_string(),
        FieldValue::Boolean(true) => "Yes".to_string(),
        FieldValue::Boolean(false) => "No".to_string(),
        FieldValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        FieldValue::OptionRef(choice) => field
            .options()
            .iter()
            .find(|o| &o.value == choice)
            .map(|o| o.label.clone())
            .unwrap_or_else(|| choice.clone()),
        other => {
            let text = other.to_input_text();
            if text.trim().is_empty() {
                "-".to_string()
            } else {
                text
            }
        }
    }
}

pub fn format_created_at(record: &Record) -> String {
    record
        .created_at
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::metadata::{parse_options, FieldType};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn field(name: &str, field_type: FieldType, order: i32) -> FieldDefinition {
        FieldDefinition {
            id: format!("f_{}", name),
            entity_id: "e1".into(),
            name: name.into(),
            label: name.to_uppercase(),
            field_type,
            is_required: false,
            is_unique: false,
            default_value: None,
            options: None,
            display_order: order,
        }
    }

    fn record(id: &str, day: u32, name: &str, amount: f64) -> Record {
        let mut r = Record {
            id: id.into(),
            created_at: Some(Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()),
            ..Default::default()
        };
        r.values.insert("name".into(), FieldValue::Text(name.into()));
        r.values.insert("amount".into(), FieldValue::Number(amount));
        r
    }

    fn ids(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn list_shows_five_fields_then_synthetic_columns() {
        let mut fields: Vec<_> = (0..7)
            .rev()
            .map(|i| field(&format!("f{}", i), FieldType::Text, i))
            .collect();
        fields.push(field("created_by", FieldType::Text, -1));

        let columns = list_columns(&fields);
        let headers: Vec<_> = columns.iter().map(|c| c.header().to_string()).collect();
        assert_eq!(headers, vec!["F0", "F1", "F2", "F3", "F4", "Created", "Actions"]);
        assert_eq!(columns.last().unwrap().sort_key(), None);
    }

    #[test]
    fn toggle_flips_same_key_and_resets_new_key() {
        let mut sort = SortState::default();
        assert_eq!(sort.direction, SortDirection::Descending);
        sort.toggle("created_at");
        assert!(sort.is_ascending());
        sort.toggle("name");
        assert_eq!(sort.key, "name");
        assert!(sort.is_ascending());
        sort.toggle("name");
        assert!(!sort.is_ascending());
    }

    #[test]
    fn created_at_sort_reverses_in_full() {
        let mut records = vec![record("b", 2, "x", 1.0), record("a", 1, "y", 2.0), record("c", 3, "z", 3.0)];
        let mut sort = SortState { key: CREATED_AT.into(), direction: SortDirection::Ascending };
        sort_records(&mut records, &sort);
        assert_eq!(ids(&records), vec!["a", "b", "c"]);

        let once = records.clone();
        sort_records(&mut records, &sort);
        assert_eq!(records, once);

        sort.toggle(CREATED_AT);
        sort_records(&mut records, &sort);
        assert_eq!(ids(&records), vec!["c", "b", "a"]);
    }

    #[test]
    fn ties_keep_prior_order() {
        let mut records = vec![record("1", 1, "same", 1.0), record("2", 2, "same", 1.0), record("3", 3, "same", 1.0)];
        let sort = SortState { key: "name".into(), direction: SortDirection::Descending };
        sort_records(&mut records, &sort);
        assert_eq!(ids(&records), vec!["1", "2", "3"]);
    }

    #[test]
    fn numbers_sort_numerically() {
        let mut records = vec![record("a", 1, "x", 100.0), record("b", 2, "y", 9.0)];
        let sort = SortState { key: "amount".into(), direction: SortDirection::Ascending };
        sort_records(&mut records, &sort);
        assert_eq!(ids(&records), vec!["b", "a"]);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let records = vec![record("a", 1, "Acme Corp", 42.0), record("b", 2, "Globex", 7.0)];
        assert_eq!(ids(&filter_records(records.clone(), "acme")), vec!["a"]);
        assert_eq!(ids(&filter_records(records.clone(), "CORP")), vec!["a"]);
        assert!(filter_records(records.clone(), "acme inc").is_empty());
        // numbers are never matched
        assert!(filter_records(records.clone(), "42").is_empty());
        assert_eq!(filter_records(records, "  ").len(), 2);
    }

    #[test]
    fn search_covers_system_columns() {
        let mut owned = record("rec-7f3a", 3, "Initech", 1.0);
        owned.created_by = Some("user-jane".into());
        let records = vec![record("a", 1, "Acme Corp", 42.0), owned];

        assert_eq!(ids(&filter_records(records.clone(), "7F3A")), vec!["rec-7f3a"]);
        assert_eq!(ids(&filter_records(records.clone(), "jane")), vec!["rec-7f3a"]);
        assert_eq!(ids(&filter_records(records, "2024-01-03")), vec!["rec-7f3a"]);
    }

    #[test]
    fn cells_use_option_labels_and_dashes() {
        let mut stage = field("stage", FieldType::Select, 0);
        stage.options = Some(parse_options("Closed Won"));
        assert_eq!(format_cell(&stage, &FieldValue::OptionRef("closed_won".into())), "Closed Won");
        assert_eq!(format_cell(&stage, &FieldValue::Null), "-");
        let flag = field("active", FieldType::Checkbox, 1);
        assert_eq!(format_cell(&flag, &FieldValue::Boolean(true)), "Yes");
        assert_eq!(format_created_at(&record("a", 5, "x", 1.0)), "2024-01-05");
    }
}
