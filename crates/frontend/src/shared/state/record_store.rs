//! Record Store: CRUD over entity tables named at runtime
//!
//! Rows stay untyped (`RawRecord`) in the cache. Field definitions are only
//! consulted to validate writes; pages turn rows into typed records with
//! [`contracts::shared::record::Record::from_row`].

use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;

use contracts::shared::metadata::{summarize, validate_patch, validate_record, FieldDefinition};
use contracts::shared::record::{record_payload, FieldValue, RawRecord, RecordValues};
use contracts::shared::rest::SelectQuery;
use leptos::prelude::*;
use serde_json::Value;

use crate::shared::data::DataBackend;

const CREATED_BY: &str = "created_by";

fn row_id(row: &RawRecord) -> Option<&str> {
    row.get("id").and_then(Value::as_str)
}

#[derive(Clone, Copy)]
pub struct RecordStore {
    backend: StoredValue<Arc<dyn DataBackend>>,
    /// Id of the signed-in user, used for `created_by`
    user_id: Signal<Option<String>>,
    /// Keyed by entity name, newest first
    pub records: RwSignal<HashMap<String, Vec<RawRecord>>>,
    /// Row shown on the details page
    pub current: RwSignal<Option<RawRecord>>,
    pub is_loading: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,
}

impl RecordStore {
    pub fn new(backend: Arc<dyn DataBackend>, user_id: Signal<Option<String>>) -> Self {
        Self {
            backend: StoredValue::new(backend),
            user_id,
            records: RwSignal::new(HashMap::new()),
            current: RwSignal::new(None),
            is_loading: RwSignal::new(false),
            error: RwSignal::new(None),
        }
    }

    fn backend(&self) -> Arc<dyn DataBackend> {
        self.backend.get_value()
    }

    fn begin(&self) {
        self.is_loading.set(true);
        self.error.set(None);
    }

    fn finish(&self) {
        self.is_loading.set(false);
    }

    fn fail(&self, operation: &str, entity_name: &str, error: impl Display) {
        log::warn!("{} on '{}' failed: {}", operation, entity_name, error);
        self.error.set(Some(error.to_string()));
        self.is_loading.set(false);
    }

    pub fn clear_error(&self) {
        self.error.set(None);
    }

    pub fn records_for(&self, entity_name: &str) -> Vec<RawRecord> {
        self.records
            .with(|records| records.get(entity_name).cloned().unwrap_or_default())
    }

    pub fn current_record(&self) -> Option<RawRecord> {
        self.current.get()
    }

    /// Full-table read, replacing the cache for the entity
    pub async fn fetch_records(&self, entity_name: &str) -> Vec<RawRecord> {
        self.begin();
        let query = SelectQuery::all().order_by("created_at", true);
        match self.backend().select(entity_name, &query).await {
            Ok(rows) => {
                self.records.update(|records| {
                    records.insert(entity_name.to_string(), rows.clone());
                });
                self.finish();
                rows
            }
            Err(e) => {
                self.fail("fetch_records", entity_name, e);
                Vec::new()
            }
        }
    }

    /// `None` unless exactly one row has the id
    pub async fn fetch_record(&self, entity_name: &str, id: &str) -> Option<RawRecord> {
        self.begin();
        match self.backend().select_single(entity_name, id).await {
            Ok(row) => {
                self.current.set(Some(row.clone()));
                self.finish();
                Some(row)
            }
            Err(e) => {
                self.current.set(None);
                self.fail("fetch_record", entity_name, e);
                None
            }
        }
    }

    /// Validates against `fields` before anything is sent. When the entity
    /// defines a `created_by` field it is filled from the session.
    pub async fn create_record(
        &self,
        entity_name: &str,
        fields: &[FieldDefinition],
        mut values: RecordValues,
    ) -> Option<RawRecord> {
        if fields.iter().any(|f| f.name == CREATED_BY) {
            if let Some(user_id) = self.user_id.get_untracked() {
                values.insert(CREATED_BY.to_string(), FieldValue::Text(user_id));
            }
        }

        if let Err(errors) = validate_record(fields, &values) {
            self.fail("create_record", entity_name, summarize(&errors));
            return None;
        }

        self.begin();
        match self
            .backend()
            .insert(entity_name, record_payload(&values))
            .await
        {
            Ok(row) => {
                self.records.update(|records| {
                    records
                        .entry(entity_name.to_string())
                        .or_default()
                        .insert(0, row.clone());
                });
                self.finish();
                Some(row)
            }
            Err(e) => {
                self.fail("create_record", entity_name, e);
                None
            }
        }
    }

    /// Partial update; only the given columns are validated and sent
    pub async fn update_record(
        &self,
        entity_name: &str,
        id: &str,
        fields: &[FieldDefinition],
        values: RecordValues,
    ) -> Option<RawRecord> {
        if let Err(errors) = validate_patch(fields, &values) {
            self.fail("update_record", entity_name, summarize(&errors));
            return None;
        }

        self.begin();
        match self
            .backend()
            .update(entity_name, id, record_payload(&values))
            .await
        {
            Ok(row) => {
                self.records.update(|records| {
                    if let Some(slot) = records
                        .get_mut(entity_name)
                        .and_then(|rows| rows.iter_mut().find(|r| row_id(r) == Some(id)))
                    {
                        *slot = row.clone();
                    }
                });
                self.current.update(|current| {
                    if current.as_ref().and_then(row_id) == Some(id) {
                        *current = Some(row.clone());
                    }
                });
                self.finish();
                Some(row)
            }
            Err(e) => {
                self.fail("update_record", entity_name, e);
                None
            }
        }
    }

    pub async fn delete_record(&self, entity_name: &str, id: &str) -> bool {
        self.begin();
        match self.backend().delete(entity_name, id).await {
            Ok(()) => {
                self.records.update(|records| {
                    if let Some(rows) = records.get_mut(entity_name) {
                        rows.retain(|r| row_id(r) != Some(id));
                    }
                });
                self.current.update(|current| {
                    if current.as_ref().and_then(row_id) == Some(id) {
                        *current = None;
                    }
                });
                self.finish();
                true
            }
            Err(e) => {
                self.fail("delete_record", entity_name, e);
                false
            }
        }
    }
}
