//! Metadata Store: cached entity, field and layout definitions
//!
//! Every public operation returns a value or a sentinel (`None`, `false`,
//! empty `Vec`). Failures never propagate: they are logged and recorded in
//! [`MetadataStore::error`].

use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use std::sync::Arc;

use contracts::shared::metadata::{
    is_valid_identifier, EntityDefinition, EntityPatch, FieldDefinition, FieldDraft, FieldPatch,
    LayoutDefinition, LayoutPatch, NewEntityDefinition, NewFieldDefinition, NewLayoutDefinition,
    ENTITY_DEFINITIONS, FIELD_DEFINITIONS, LAYOUT_DEFINITIONS,
};
use contracts::shared::provisioning::{CreateEntityTableRequest, EntityCreation};
use contracts::shared::rest::SelectQuery;
use leptos::prelude::*;

use crate::shared::data::{
    decode_row, decode_rows, encode_row, DataBackend, DataError, SchemaProvisioner,
};

/// `Copy` handle: the collaborators live in stored values so the store can
/// be captured by any number of view closures.
#[derive(Clone, Copy)]
pub struct MetadataStore {
    backend: StoredValue<Arc<dyn DataBackend>>,
    provisioner: StoredValue<Arc<dyn SchemaProvisioner>>,
    /// Ordered by name
    pub entities: RwSignal<Vec<EntityDefinition>>,
    /// Keyed by entity id, ordered by `display_order`
    pub fields: RwSignal<HashMap<String, Vec<FieldDefinition>>>,
    /// Keyed by entity id
    pub layouts: RwSignal<HashMap<String, Vec<LayoutDefinition>>>,
    /// Outcome of the most recent `create_entity`
    pub last_creation: RwSignal<Option<EntityCreation>>,
    /// Entities whose table could not be provisioned
    orphaned: RwSignal<HashSet<String>>,
    pub is_loading: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,
}

fn sort_fields(fields: &mut [FieldDefinition]) {
    fields.sort_by_key(|f| f.display_order);
}

impl MetadataStore {
    pub fn new(backend: Arc<dyn DataBackend>, provisioner: Arc<dyn SchemaProvisioner>) -> Self {
        Self {
            backend: StoredValue::new(backend),
            provisioner: StoredValue::new(provisioner),
            entities: RwSignal::new(Vec::new()),
            fields: RwSignal::new(HashMap::new()),
            layouts: RwSignal::new(HashMap::new()),
            last_creation: RwSignal::new(None),
            orphaned: RwSignal::new(HashSet::new()),
            is_loading: RwSignal::new(false),
            error: RwSignal::new(None),
        }
    }

    fn backend(&self) -> Arc<dyn DataBackend> {
        self.backend.get_value()
    }

    fn provisioner(&self) -> Arc<dyn SchemaProvisioner> {
        self.provisioner.get_value()
    }

    fn begin(&self) {
        self.is_loading.set(true);
        self.error.set(None);
    }

    fn finish(&self) {
        self.is_loading.set(false);
    }

    fn fail(&self, operation: &str, error: impl Display) {
        log::warn!("{} failed: {}", operation, error);
        self.error.set(Some(error.to_string()));
        self.is_loading.set(false);
    }

    pub fn clear_error(&self) {
        self.error.set(None);
    }

    // ------------------------------------------------------------------
    // Read helpers
    // ------------------------------------------------------------------

    pub fn entity_by_name(&self, name: &str) -> Option<EntityDefinition> {
        self.entities
            .with(|entities| entities.iter().find(|e| e.name == name).cloned())
    }

    pub fn entity_by_id(&self, id: &str) -> Option<EntityDefinition> {
        self.entities
            .with(|entities| entities.iter().find(|e| e.id == id).cloned())
    }

    pub fn fields_for(&self, entity_id: &str) -> Vec<FieldDefinition> {
        self.fields
            .with(|fields| fields.get(entity_id).cloned().unwrap_or_default())
    }

    pub fn layouts_for(&self, entity_id: &str) -> Vec<LayoutDefinition> {
        self.layouts
            .with(|layouts| layouts.get(entity_id).cloned().unwrap_or_default())
    }

    pub fn find_field(&self, field_id: &str) -> Option<FieldDefinition> {
        self.fields.with(|fields| {
            fields
                .values()
                .flatten()
                .find(|f| f.id == field_id)
                .cloned()
        })
    }

    pub fn find_layout(&self, layout_id: &str) -> Option<LayoutDefinition> {
        self.layouts.with(|layouts| {
            layouts
                .values()
                .flatten()
                .find(|l| l.id == layout_id)
                .cloned()
        })
    }

    /// True for an entity row left behind by a failed provisioning
    pub fn needs_cleanup(&self, entity_id: &str) -> bool {
        self.orphaned.with(|ids| ids.contains(entity_id))
    }

    // ------------------------------------------------------------------
    // Entities
    // ------------------------------------------------------------------

    /// Replaces the whole entity cache
    pub async fn fetch_entities(&self) -> Vec<EntityDefinition> {
        self.begin();
        let query = SelectQuery::all().order_by("name", false);
        let result = self
            .backend()
            .select(ENTITY_DEFINITIONS, &query)
            .await
            .and_then(decode_rows::<EntityDefinition>);

        match result {
            Ok(entities) => {
                self.entities.set(entities.clone());
                self.finish();
                entities
            }
            Err(e) => {
                self.fail("fetch_entities", e);
                Vec::new()
            }
        }
    }

    /// Inserts the metadata row, then provisions the table.
    ///
    /// The two calls are not atomic. When provisioning fails the row stays
    /// (flagged by [`Self::needs_cleanup`]), the error is recorded and `None`
    /// is returned.
    pub async fn create_entity(&self, new_entity: NewEntityDefinition) -> Option<EntityDefinition> {
        if !is_valid_identifier(&new_entity.name) {
            self.fail(
                "create_entity",
                "Invalid entity name. Use only lowercase letters, numbers, and underscores.",
            );
            return None;
        }

        self.begin();
        let inserted = match encode_row(&new_entity) {
            Ok(row) => self.backend().insert(ENTITY_DEFINITIONS, row).await,
            Err(e) => Err(e),
        }
        .and_then(decode_row::<EntityDefinition>);

        let entity = match inserted {
            Ok(entity) => entity,
            Err(e) => {
                self.fail("create_entity", e);
                return None;
            }
        };

        self.entities.update(|entities| {
            entities.push(entity.clone());
            entities.sort_by(|a, b| a.name.cmp(&b.name));
        });
        let creation = EntityCreation::started(entity.clone());
        self.last_creation.set(Some(creation.clone()));

        let request = CreateEntityTableRequest {
            entity_name: entity.name.clone(),
            fields: Vec::new(),
        };
        match self.provisioner().create_entity_table(&request).await {
            Ok(()) => {
                self.last_creation.set(Some(creation.provisioned()));
                self.finish();
                Some(entity)
            }
            Err(e) => {
                log::warn!(
                    "Entity '{}' ({}) has no table and needs manual cleanup",
                    entity.name,
                    entity.id
                );
                self.orphaned.update(|ids| {
                    ids.insert(entity.id.clone());
                });
                self.last_creation
                    .set(Some(creation.failed(e.to_string())));
                self.fail("create_entity", e);
                None
            }
        }
    }

    /// Sends the patch as given: pinning the name of system entities is
    /// the caller's job (see [`EntityPatch::pinned_to`]).
    pub async fn update_entity(&self, id: &str, patch: EntityPatch) -> Option<EntityDefinition> {
        self.begin();
        let result = match encode_row(&patch) {
            Ok(row) => self.backend().update(ENTITY_DEFINITIONS, id, row).await,
            Err(e) => Err(e),
        }
        .and_then(decode_row::<EntityDefinition>);

        match result {
            Ok(entity) => {
                self.entities.update(|entities| {
                    if let Some(slot) = entities.iter_mut().find(|e| e.id == entity.id) {
                        *slot = entity.clone();
                    }
                });
                self.finish();
                Some(entity)
            }
            Err(e) => {
                self.fail("update_entity", e);
                None
            }
        }
    }

    // ------------------------------------------------------------------
    // Fields
    // ------------------------------------------------------------------

    pub async fn fetch_fields(&self, entity_id: &str) -> Vec<FieldDefinition> {
        self.begin();
        let query = SelectQuery::all()
            .eq("entity_id", entity_id)
            .order_by("display_order", false);
        let result = self
            .backend()
            .select(FIELD_DEFINITIONS, &query)
            .await
            .and_then(decode_rows::<FieldDefinition>);

        match result {
            Ok(mut fields) => {
                sort_fields(&mut fields);
                self.fields.update(|cache| {
                    cache.insert(entity_id.to_string(), fields.clone());
                });
                self.finish();
                fields
            }
            Err(e) => {
                self.fail("fetch_fields", e);
                Vec::new()
            }
        }
    }

    pub async fn create_field(&self, new_field: NewFieldDefinition) -> Option<FieldDefinition> {
        self.begin();
        let result = match encode_row(&new_field) {
            Ok(row) => self.backend().insert(FIELD_DEFINITIONS, row).await,
            Err(e) => Err(e),
        }
        .and_then(decode_row::<FieldDefinition>);

        match result {
            Ok(field) => {
                self.fields.update(|cache| {
                    let fields = cache.entry(field.entity_id.clone()).or_default();
                    fields.push(field.clone());
                    sort_fields(fields);
                });
                self.finish();
                Some(field)
            }
            Err(e) => {
                self.fail("create_field", e);
                None
            }
        }
    }

    /// Normalizes the raw form text and appends the field after the
    /// cached ones
    pub async fn create_field_from_draft(
        &self,
        entity_id: &str,
        draft: FieldDraft,
    ) -> Option<FieldDefinition> {
        let display_order = self.fields.with_untracked(|cache| {
            cache
                .get(entity_id)
                .and_then(|fields| fields.iter().map(|f| f.display_order).max())
                .map_or(0, |max| max + 1)
        });
        match draft.into_new(entity_id, display_order) {
            Ok(new_field) => self.create_field(new_field).await,
            Err(e) => {
                self.fail("create_field", e);
                None
            }
        }
    }

    pub async fn update_field(&self, id: &str, patch: FieldPatch) -> Option<FieldDefinition> {
        if self.find_field_untracked(id).is_none() {
            self.fail("update_field", DataError::NotFound(format!("Field '{}' not found", id)));
            return None;
        }

        self.begin();
        let result = match encode_row(&patch) {
            Ok(row) => self.backend().update(FIELD_DEFINITIONS, id, row).await,
            Err(e) => Err(e),
        }
        .and_then(decode_row::<FieldDefinition>);

        match result {
            Ok(field) => {
                self.fields.update(|cache| {
                    let fields = cache.entry(field.entity_id.clone()).or_default();
                    match fields.iter_mut().find(|f| f.id == field.id) {
                        Some(slot) => *slot = field.clone(),
                        None => fields.push(field.clone()),
                    }
                    sort_fields(fields);
                });
                self.finish();
                Some(field)
            }
            Err(e) => {
                self.fail("update_field", e);
                None
            }
        }
    }

    pub async fn update_field_from_draft(
        &self,
        id: &str,
        entity_id: &str,
        draft: FieldDraft,
    ) -> Option<FieldDefinition> {
        match draft.into_patch(entity_id) {
            Ok(patch) => self.update_field(id, patch).await,
            Err(e) => {
                self.fail("update_field", e);
                None
            }
        }
    }

    /// Dropping a field also drops its column data on the backend
    pub async fn delete_field(&self, id: &str) -> bool {
        let Some(field) = self.find_field_untracked(id) else {
            self.fail("delete_field", DataError::NotFound(format!("Field '{}' not found", id)));
            return false;
        };

        self.begin();
        match self.backend().delete(FIELD_DEFINITIONS, id).await {
            Ok(()) => {
                self.fields.update(|cache| {
                    if let Some(fields) = cache.get_mut(&field.entity_id) {
                        fields.retain(|f| f.id != id);
                    }
                });
                self.finish();
                true
            }
            Err(e) => {
                self.fail("delete_field", e);
                false
            }
        }
    }

    fn find_field_untracked(&self, field_id: &str) -> Option<FieldDefinition> {
        self.fields.with_untracked(|fields| {
            fields
                .values()
                .flatten()
                .find(|f| f.id == field_id)
                .cloned()
        })
    }

    // ------------------------------------------------------------------
    // Layouts
    // ------------------------------------------------------------------

    pub async fn fetch_layouts(&self, entity_id: &str) -> Vec<LayoutDefinition> {
        self.begin();
        let query = SelectQuery::all().eq("entity_id", entity_id);
        let result = self
            .backend()
            .select(LAYOUT_DEFINITIONS, &query)
            .await
            .and_then(decode_rows::<LayoutDefinition>);

        match result {
            Ok(layouts) => {
                self.layouts.update(|cache| {
                    cache.insert(entity_id.to_string(), layouts.clone());
                });
                self.finish();
                layouts
            }
            Err(e) => {
                self.fail("fetch_layouts", e);
                Vec::new()
            }
        }
    }

    pub async fn create_layout(&self, new_layout: NewLayoutDefinition) -> Option<LayoutDefinition> {
        self.begin();
        let result = match encode_row(&new_layout) {
            Ok(row) => self.backend().insert(LAYOUT_DEFINITIONS, row).await,
            Err(e) => Err(e),
        }
        .and_then(decode_row::<LayoutDefinition>);

        match result {
            Ok(layout) => {
                self.layouts.update(|cache| {
                    cache
                        .entry(layout.entity_id.clone())
                        .or_default()
                        .push(layout.clone());
                });
                self.finish();
                Some(layout)
            }
            Err(e) => {
                self.fail("create_layout", e);
                None
            }
        }
    }

    pub async fn update_layout(&self, id: &str, patch: LayoutPatch) -> Option<LayoutDefinition> {
        if self.find_layout_untracked(id).is_none() {
            self.fail("update_layout", DataError::NotFound(format!("Layout '{}' not found", id)));
            return None;
        }

        self.begin();
        let result = match encode_row(&patch) {
            Ok(row) => self.backend().update(LAYOUT_DEFINITIONS, id, row).await,
            Err(e) => Err(e),
        }
        .and_then(decode_row::<LayoutDefinition>);

        match result {
            Ok(layout) => {
                self.layouts.update(|cache| {
                    let layouts = cache.entry(layout.entity_id.clone()).or_default();
                    match layouts.iter_mut().find(|l| l.id == layout.id) {
                        Some(slot) => *slot = layout.clone(),
                        None => layouts.push(layout.clone()),
                    }
                });
                self.finish();
                Some(layout)
            }
            Err(e) => {
                self.fail("update_layout", e);
                None
            }
        }
    }

    pub async fn delete_layout(&self, id: &str) -> bool {
        let Some(layout) = self.find_layout_untracked(id) else {
            self.fail("delete_layout", DataError::NotFound(format!("Layout '{}' not found", id)));
            return false;
        };

        self.begin();
        match self.backend().delete(LAYOUT_DEFINITIONS, id).await {
            Ok(()) => {
                self.layouts.update(|cache| {
                    if let Some(layouts) = cache.get_mut(&layout.entity_id) {
                        layouts.retain(|l| l.id != id);
                    }
                });
                self.finish();
                true
            }
            Err(e) => {
                self.fail("delete_layout", e);
                false
            }
        }
    }

    fn find_layout_untracked(&self, layout_id: &str) -> Option<LayoutDefinition> {
        self.layouts.with_untracked(|layouts| {
            layouts
                .values()
                .flatten()
                .find(|l| l.id == layout_id)
                .cloned()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::memory::{MemoryBackend, MemoryProvisioner};
    use contracts::shared::metadata::{FieldOption, FieldType};
    use pretty_assertions::assert_eq;

    fn store() -> (MetadataStore, Arc<MemoryBackend>, Arc<MemoryProvisioner>) {
        let backend = Arc::new(MemoryBackend::new());
        let provisioner = Arc::new(MemoryProvisioner::new());
        let store = MetadataStore::new(backend.clone(), provisioner.clone());
        (store, backend, provisioner)
    }

    fn new_entity(name: &str, label: &str) -> NewEntityDefinition {
        NewEntityDefinition {
            name: name.into(),
            label: label.into(),
            ..Default::default()
        }
    }

    fn draft(name: &str, label: &str, field_type: FieldType) -> FieldDraft {
        FieldDraft {
            name: name.into(),
            label: label.into(),
            field_type,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_entity_provisions_table() {
        let (store, backend, provisioner) = store();

        let entity = store
            .create_entity(new_entity("deals", "Deals"))
            .await
            .expect("entity");

        assert_eq!(entity.name, "deals");
        assert_eq!(provisioner.tables(), vec!["deals".to_string()]);
        assert_eq!(backend.rows(ENTITY_DEFINITIONS).len(), 1);
        assert!(store.last_creation.get_untracked().unwrap().is_complete());
        assert_eq!(store.entity_by_name("deals"), Some(entity));
        assert_eq!(store.error.get_untracked(), None);
    }

    #[tokio::test]
    async fn new_entity_starts_without_fields() {
        let (store, _, _) = store();

        let entity = store
            .create_entity(new_entity("deals", "Deals"))
            .await
            .unwrap();

        assert!(store.fetch_fields(&entity.id).await.is_empty());
        assert!(store.fields_for(&entity.id).is_empty());
        assert_eq!(store.error.get_untracked(), None);
    }

    #[tokio::test]
    async fn failed_provisioning_leaves_flagged_entity() {
        let (store, backend, provisioner) = store();
        provisioner.fail_with(DataError::Status {
            status: 500,
            message: "disk full".into(),
        });

        let result = store.create_entity(new_entity("deals", "Deals")).await;

        assert_eq!(result, None);
        assert_eq!(store.error.get_untracked().as_deref(), Some("disk full"));
        assert_eq!(backend.rows(ENTITY_DEFINITIONS).len(), 1);

        let creation = store.last_creation.get_untracked().unwrap();
        assert!(creation.needs_cleanup());
        assert_eq!(creation.error(), Some("disk full"));
        assert!(store.needs_cleanup(&creation.entity().id));
    }

    #[tokio::test]
    async fn invalid_entity_name_never_reaches_backend() {
        let (store, backend, provisioner) = store();

        let result = store.create_entity(new_entity("Bad Name", "Bad")).await;

        assert_eq!(result, None);
        assert_eq!(backend.calls(), 0);
        assert!(provisioner.tables().is_empty());
        assert!(store.error.get_untracked().is_some());
        assert!(!store.is_loading.get_untracked());
    }

    #[tokio::test]
    async fn fetch_entities_orders_by_name_and_reports_failures() {
        let (store, backend, _) = store();
        store.create_entity(new_entity("tasks", "Tasks")).await;
        store.create_entity(new_entity("deals", "Deals")).await;

        let names: Vec<String> = store
            .fetch_entities()
            .await
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["deals", "tasks"]);

        backend.fail_with(DataError::Network("offline".into()));
        assert!(store.fetch_entities().await.is_empty());
        assert_eq!(
            store.error.get_untracked().as_deref(),
            Some("Network error: offline")
        );
        assert!(!store.is_loading.get_untracked());

        store.clear_error();
        assert_eq!(store.error.get_untracked(), None);
    }

    #[tokio::test]
    async fn update_entity_pins_system_names_only_when_asked() {
        let (store, _, _) = store();
        let entity = store
            .create_entity(NewEntityDefinition {
                is_system: true,
                ..new_entity("contacts", "Contacts")
            })
            .await
            .unwrap();

        let patch = EntityPatch {
            name: Some("people".into()),
            label: Some("People".into()),
            ..Default::default()
        }
        .pinned_to(&entity);
        let updated = store.update_entity(&entity.id, patch).await.unwrap();

        assert_eq!(updated.name, "contacts");
        assert_eq!(updated.label, "People");
        assert_eq!(store.entity_by_id(&entity.id).unwrap().label, "People");
    }

    #[tokio::test]
    async fn field_draft_is_normalized_before_insert() {
        let (store, _, _) = store();
        let entity = store
            .create_entity(new_entity("contacts", "Contacts"))
            .await
            .unwrap();

        let phone = store
            .create_field_from_draft(&entity.id, draft("Phone Number", "Phone", FieldType::Text))
            .await
            .unwrap();
        assert_eq!(phone.name, "phone_number");
        assert_eq!(phone.display_order, 0);

        let color = store
            .create_field_from_draft(
                &entity.id,
                FieldDraft {
                    options: "Red, green , Blue".into(),
                    ..draft("color", "Color", FieldType::Select)
                },
            )
            .await
            .unwrap();
        assert_eq!(color.display_order, 1);
        assert_eq!(
            color.options(),
            &[
                FieldOption {
                    label: "Red".into(),
                    value: "red".into()
                },
                FieldOption {
                    label: "green".into(),
                    value: "green".into()
                },
                FieldOption {
                    label: "Blue".into(),
                    value: "blue".into()
                },
            ]
        );

        let names: Vec<String> = store
            .fields_for(&entity.id)
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, vec!["phone_number", "color"]);
    }

    #[tokio::test]
    async fn update_field_keeps_untouched_attributes() {
        let (store, _, _) = store();
        let entity = store
            .create_entity(new_entity("contacts", "Contacts"))
            .await
            .unwrap();
        store
            .create_field_from_draft(&entity.id, draft("name", "Name", FieldType::Text))
            .await
            .unwrap();
        let field = store
            .create_field_from_draft(
                &entity.id,
                FieldDraft {
                    is_required: true,
                    ..draft("email", "Email", FieldType::Email)
                },
            )
            .await
            .unwrap();
        assert_eq!(field.display_order, 1);

        let updated = store
            .update_field(
                &field.id,
                FieldPatch {
                    label: Some("Work email".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.label, "Work email");
        assert_eq!(updated.name, "email");
        assert_eq!(updated.field_type, FieldType::Email);
        assert!(updated.is_required);
        assert_eq!(updated.display_order, 1);
        assert_eq!(store.find_field(&field.id), Some(updated.clone()));

        let listed = store.fetch_fields(&entity.id).await;
        let names: Vec<&str> = listed.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["name", "email"]);
        assert_eq!(
            listed[1],
            FieldDefinition {
                label: "Work email".into(),
                ..field
            }
        );
        assert_eq!(listed[1], updated);
    }

    #[tokio::test]
    async fn invalid_draft_is_rejected_locally() {
        let (store, backend, _) = store();
        let calls = backend.calls();

        let result = store
            .create_field_from_draft("e1", draft("notes", "  ", FieldType::Textarea))
            .await;

        assert_eq!(result, None);
        assert_eq!(backend.calls(), calls);
        assert_eq!(
            store.error.get_untracked().as_deref(),
            Some("Field label is required")
        );
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let (store, backend, _) = store();

        assert!(!store.delete_field("missing").await);
        assert!(store
            .error
            .get_untracked()
            .unwrap()
            .contains("Field 'missing' not found"));
        assert_eq!(
            store.update_layout("missing", LayoutPatch::default()).await,
            None
        );
        assert!(!store.delete_layout("missing").await);
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn delete_field_removes_it_from_cache() {
        let (store, backend, _) = store();
        let entity = store
            .create_entity(new_entity("contacts", "Contacts"))
            .await
            .unwrap();
        let field = store
            .create_field_from_draft(&entity.id, draft("name", "Name", FieldType::Text))
            .await
            .unwrap();

        assert!(store.delete_field(&field.id).await);
        assert!(store.fields_for(&entity.id).is_empty());
        assert!(backend.rows(FIELD_DEFINITIONS).is_empty());
    }

    #[tokio::test]
    async fn layouts_are_cached_per_entity() {
        let (store, _, _) = store();
        let entity = store
            .create_entity(new_entity("contacts", "Contacts"))
            .await
            .unwrap();

        let layout = store
            .create_layout(NewLayoutDefinition {
                entity_id: entity.id.clone(),
                name: "Main".into(),
                layout_type: contracts::shared::metadata::LayoutType::Detail,
                is_default: true,
                definition: Default::default(),
                created_by: "u1".into(),
            })
            .await
            .unwrap();
        assert_eq!(store.layouts_for(&entity.id), vec![layout.clone()]);

        let renamed = store
            .update_layout(
                &layout.id,
                LayoutPatch {
                    name: Some("Primary".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.name, "Primary");
        assert_eq!(store.find_layout(&layout.id).unwrap().name, "Primary");

        assert_eq!(store.fetch_layouts(&entity.id).await.len(), 1);
        assert!(store.delete_layout(&layout.id).await);
        assert!(store.layouts_for(&entity.id).is_empty());
    }
}
