//! In-memory data backend for store tests

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use contracts::shared::metadata::is_valid_identifier;
use contracts::shared::provisioning::CreateEntityTableRequest;
use contracts::shared::record::RawRecord;
use contracts::shared::rest::SelectQuery;
use serde_json::Value;

use super::backend::{DataBackend, DataError, DataResult, SchemaProvisioner};

#[derive(Default)]
pub struct MemoryBackend {
    tables: Mutex<HashMap<String, Vec<RawRecord>>>,
    next_id: Mutex<u64>,
    /// Every call fails with this error while set
    failure: Mutex<Option<DataError>>,
    calls: Mutex<usize>,
}

fn as_filter_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn compare_json(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (a, b) => {
            let a = a.map(as_filter_text).unwrap_or_default();
            let b = b.map(as_filter_text).unwrap_or_default();
            a.cmp(&b)
        }
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_with(&self, error: DataError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    pub fn recover(&self) {
        *self.failure.lock().unwrap() = None;
    }

    /// Number of calls that reached the backend
    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }

    pub fn rows(&self, table: &str) -> Vec<RawRecord> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    fn enter(&self) -> DataResult<()> {
        *self.calls.lock().unwrap() += 1;
        match self.failure.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn next_seq(&self) -> u64 {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        *next
    }
}

#[async_trait(?Send)]
impl DataBackend for MemoryBackend {
    async fn select(&self, table: &str, query: &SelectQuery) -> DataResult<Vec<RawRecord>> {
        self.enter()?;
        let mut rows: Vec<RawRecord> = self
            .rows(table)
            .into_iter()
            .filter(|row| {
                query
                    .filters
                    .iter()
                    .all(|(column, value)| row.get(column).map(as_filter_text).as_deref() == Some(value))
            })
            .collect();

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let cmp = compare_json(a.get(&order.column), b.get(&order.column));
                if order.descending {
                    cmp.reverse()
                } else {
                    cmp
                }
            });
        }
        Ok(rows)
    }

    async fn select_single(&self, table: &str, id: &str) -> DataResult<RawRecord> {
        self.enter()?;
        let mut rows: Vec<RawRecord> = self
            .rows(table)
            .into_iter()
            .filter(|row| row.get("id").and_then(Value::as_str) == Some(id))
            .collect();
        if rows.len() == 1 {
            Ok(rows.remove(0))
        } else {
            Err(DataError::NotSingle)
        }
    }

    async fn insert(&self, table: &str, mut row: RawRecord) -> DataResult<RawRecord> {
        self.enter()?;
        let seq = self.next_seq();
        row.insert("id".into(), Value::String(format!("row-{}", seq)));
        // One second apart, so insertion order is creation order
        row.insert(
            "created_at".into(),
            Value::String(format!("2024-01-01T00:{:02}:{:02}Z", seq / 60 % 60, seq % 60)),
        );
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .push(row.clone());
        Ok(row)
    }

    async fn update(&self, table: &str, id: &str, patch: RawRecord) -> DataResult<RawRecord> {
        self.enter()?;
        let mut tables = self.tables.lock().unwrap();
        let row = tables
            .get_mut(table)
            .and_then(|rows| {
                rows.iter_mut()
                    .find(|row| row.get("id").and_then(Value::as_str) == Some(id))
            })
            .ok_or_else(|| DataError::NotFound(format!("Row '{}' not found in '{}'", id, table)))?;
        for (column, value) in patch {
            if column != "id" {
                row.insert(column, value);
            }
        }
        Ok(row.clone())
    }

    async fn delete(&self, table: &str, id: &str) -> DataResult<()> {
        self.enter()?;
        let mut tables = self.tables.lock().unwrap();
        let rows = tables.entry(table.to_string()).or_default();
        let before = rows.len();
        rows.retain(|row| row.get("id").and_then(Value::as_str) != Some(id));
        if rows.len() == before {
            return Err(DataError::NotFound(format!("Row '{}' not found in '{}'", id, table)));
        }
        Ok(())
    }
}

/// Records provisioned tables; rejects invalid names like the real function
#[derive(Default)]
pub struct MemoryProvisioner {
    pub tables: Mutex<Vec<String>>,
    failure: Mutex<Option<DataError>>,
}

impl MemoryProvisioner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_with(&self, error: DataError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    pub fn tables(&self) -> Vec<String> {
        self.tables.lock().unwrap().clone()
    }
}

#[async_trait(?Send)]
impl SchemaProvisioner for MemoryProvisioner {
    async fn create_entity_table(&self, request: &CreateEntityTableRequest) -> DataResult<()> {
        if let Some(error) = self.failure.lock().unwrap().clone() {
            return Err(error);
        }
        if !is_valid_identifier(&request.entity_name) {
            return Err(DataError::Status {
                status: 400,
                message: "Invalid entity name. Use only lowercase letters, numbers, and underscores."
                    .to_string(),
            });
        }
        self.tables.lock().unwrap().push(request.entity_name.clone());
        Ok(())
    }
}
