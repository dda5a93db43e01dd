use contracts::shared::metadata::{
    choose_default_layout, EntityDefinition, FieldDefinition, LayoutDocument, LayoutType,
};
use contracts::shared::record::{Record, RecordValues};
use leptos::prelude::*;
use serde_json::Value;

use crate::shared::state::{MetadataStore, RecordStore};

/// Id segment that opens an empty form instead of loading a row
pub const NEW_RECORD_ID: &str = "new";

#[derive(Clone, Copy)]
pub struct RecordDetailsViewModel {
    metadata: MetadataStore,
    records: RecordStore,
    pub entity_name: Memo<String>,
    pub record_id: Memo<String>,
    pub entity: Memo<Option<EntityDefinition>>,
    pub fields: Memo<Vec<FieldDefinition>>,
    pub editing: RwSignal<bool>,
}

impl RecordDetailsViewModel {
    pub fn new(
        metadata: MetadataStore,
        records: RecordStore,
        entity_name: Memo<String>,
        record_id: Memo<String>,
        edit: bool,
    ) -> Self {
        let entity = Memo::new(move |_| metadata.entity_by_name(&entity_name.get()));
        let fields = Memo::new(move |_| {
            entity
                .get()
                .map(|e| metadata.fields_for(&e.id))
                .unwrap_or_default()
        });
        let editing = RwSignal::new(edit || record_id.get_untracked() == NEW_RECORD_ID);

        Self {
            metadata,
            records,
            entity_name,
            record_id,
            entity,
            fields,
            editing,
        }
    }

    pub fn is_new(&self) -> bool {
        self.record_id.get() == NEW_RECORD_ID
    }

    pub fn is_busy(&self) -> bool {
        self.records.is_loading.get()
    }

    /// The loaded row, typed; a stale row of another id is ignored
    pub fn record(&self) -> Option<Record> {
        let id = self.record_id.get();
        let fields = self.fields.get();
        self.records.current.with(|current| {
            current
                .as_ref()
                .filter(|row| row.get("id").and_then(Value::as_str) == Some(id.as_str()))
                .map(|row| Record::from_row(row, &fields))
        })
    }

    /// Edit layout while editing, detail layout otherwise
    pub fn layout(&self) -> Option<LayoutDocument> {
        let entity = self.entity.get()?;
        let layout_type = if self.editing.get() {
            LayoutType::Edit
        } else {
            LayoutType::Detail
        };
        let layouts = self.metadata.layouts_for(&entity.id);
        choose_default_layout(&layouts, layout_type).map(|l| l.definition.clone())
    }

    pub fn title(&self) -> String {
        let label = self
            .entity
            .get()
            .map(|e| e.label)
            .unwrap_or_else(|| self.entity_name.get());
        if self.is_new() {
            return format!("New {}", label);
        }
        self.record()
            .and_then(|r| r.title(&self.fields.get()))
            .unwrap_or_else(|| format!("{} Details", label))
    }

    pub fn error(&self) -> Signal<Option<String>> {
        let metadata = self.metadata;
        let records = self.records;
        Signal::derive(move || records.error.get().or_else(|| metadata.error.get()))
    }

    pub fn clear_error(&self) {
        self.records.clear_error();
        self.metadata.clear_error();
    }

    /// Fields, layouts and (unless creating) the row itself
    pub fn load(&self) {
        let Some(entity) = self.entity.get_untracked() else {
            return;
        };
        let id = self.record_id.get_untracked();
        let metadata = self.metadata;
        let records = self.records;
        wasm_bindgen_futures::spawn_local(async move {
            metadata.fetch_fields(&entity.id).await;
            metadata.fetch_layouts(&entity.id).await;
            if id != NEW_RECORD_ID {
                records.fetch_record(&entity.name, &id).await;
            }
        });
    }

    /// Creates or updates; `on_saved` receives the id of the saved row
    pub fn save(&self, values: RecordValues, on_saved: Callback<String>) {
        let name = self.entity_name.get_untracked();
        let id = self.record_id.get_untracked();
        let fields = self.fields.get_untracked();
        let records = self.records;
        let editing = self.editing;

        wasm_bindgen_futures::spawn_local(async move {
            let saved = if id == NEW_RECORD_ID {
                records.create_record(&name, &fields, values).await
            } else {
                records.update_record(&name, &id, &fields, values).await
            };
            if let Some(row) = saved {
                editing.set(false);
                let saved_id = row
                    .get("id")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or(id);
                on_saved.run(saved_id);
            }
        });
    }

    pub fn delete(&self, on_deleted: Callback<()>) {
        let name = self.entity_name.get_untracked();
        let id = self.record_id.get_untracked();
        let records = self.records;
        wasm_bindgen_futures::spawn_local(async move {
            if records.delete_record(&name, &id).await {
                on_deleted.run(());
            }
        });
    }
}
