use contracts::shared::metadata::{
    choose_default_layout, FieldDefinition, LayoutDefinition, LayoutDocument, LayoutEditError,
    LayoutEditor, LayoutPatch, LayoutType, NewLayoutDefinition,
};
use leptos::prelude::*;

use crate::shared::state::MetadataStore;

/// Inputs of the "new layout" form
#[derive(Clone, Debug, PartialEq)]
pub struct NewLayoutForm {
    pub name: String,
    pub layout_type: LayoutType,
    pub is_default: bool,
}

impl Default for NewLayoutForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            layout_type: LayoutType::Detail,
            is_default: false,
        }
    }
}

impl NewLayoutForm {
    /// New layouts start from every field of the entity
    pub fn to_new(
        &self,
        entity_id: &str,
        fields: &[FieldDefinition],
        created_by: String,
    ) -> Result<NewLayoutDefinition, String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Layout name is required".to_string());
        }
        Ok(NewLayoutDefinition {
            entity_id: entity_id.to_string(),
            name: name.to_string(),
            layout_type: self.layout_type,
            definition: LayoutDocument::default_for(fields),
            is_default: self.is_default,
            created_by,
        })
    }
}

/// Working copy handling. Edits only touch `editor`; the store is written
/// on `save` and `create_layout` alone.
#[derive(Clone, Copy)]
pub struct LayoutEditorViewModel {
    store: MetadataStore,
    user_id: Signal<Option<String>>,
    pub entity_id: Memo<String>,
    pub fields: Memo<Vec<FieldDefinition>>,
    pub layouts: Memo<Vec<LayoutDefinition>>,
    /// `None` while editing a document that has never been saved
    pub selected: RwSignal<Option<String>>,
    pub editor: RwSignal<LayoutEditor>,
    /// Feedback of the last edit command
    pub notice: RwSignal<Option<String>>,
    pub new_form: RwSignal<Option<NewLayoutForm>>,
}

impl LayoutEditorViewModel {
    pub fn new(store: MetadataStore, user_id: Signal<Option<String>>, entity_id: Memo<String>) -> Self {
        Self {
            store,
            user_id,
            entity_id,
            fields: Memo::new(move |_| store.fields_for(&entity_id.get())),
            layouts: Memo::new(move |_| store.layouts_for(&entity_id.get())),
            selected: RwSignal::new(None),
            editor: RwSignal::new(LayoutEditor::default()),
            notice: RwSignal::new(None),
            new_form: RwSignal::new(None),
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.editor.with(LayoutEditor::is_dirty)
    }

    pub fn store(&self) -> MetadataStore {
        self.store
    }

    /// Fetches fields and layouts, then opens the default detail layout.
    /// Without any layout the editor starts from every field.
    pub fn load(&self) {
        let vm = *self;
        let entity_id = self.entity_id.get_untracked();
        wasm_bindgen_futures::spawn_local(async move {
            if vm.store.entities.with_untracked(|e| e.is_empty()) {
                vm.store.fetch_entities().await;
            }
            let fields = vm.store.fetch_fields(&entity_id).await;
            let layouts = vm.store.fetch_layouts(&entity_id).await;
            match choose_default_layout(&layouts, LayoutType::Detail) {
                Some(layout) => vm.open(layout),
                None => {
                    vm.selected.set(None);
                    vm.editor
                        .update(|e| e.reset(LayoutDocument::default_for(&fields)));
                }
            }
        });
    }

    fn open(&self, layout: &LayoutDefinition) {
        self.selected.set(Some(layout.id.clone()));
        self.editor.update(|e| e.reset(layout.definition.clone()));
        self.notice.set(None);
    }

    /// Switching drops unsaved edits of the current working copy
    pub fn select(&self, layout_id: &str) {
        if let Some(layout) = self.store.find_layout(layout_id) {
            self.open(&layout);
        }
    }

    fn apply<T>(&self, edit: impl FnOnce(&mut LayoutEditor) -> Result<T, LayoutEditError>) {
        let mut result = None;
        self.editor.update(|editor| result = Some(edit(editor)));
        match result {
            Some(Err(e)) => self.notice.set(Some(e.to_string())),
            _ => self.notice.set(None),
        }
    }

    pub fn add_section(&self) {
        self.apply(|e| Ok::<_, LayoutEditError>(e.add_section()));
    }

    pub fn remove_section(&self, section: usize) {
        self.apply(|e| e.remove_section(section));
    }

    pub fn rename_section(&self, section: usize, title: String) {
        self.apply(|e| e.rename_section(section, &title));
    }

    pub fn set_columns(&self, section: usize, columns: u8) {
        self.apply(|e| e.set_columns(section, columns));
    }

    pub fn add_next_field(&self, section: usize) {
        let fields = self.fields.get_untracked();
        self.apply(|e| e.add_next_field(section, &fields).map(|_| ()));
    }

    pub fn remove_field(&self, section: usize, field: usize) {
        self.apply(|e| e.remove_field(section, field));
    }

    pub fn toggle_visibility(&self, section: usize, field: usize) {
        self.apply(|e| e.toggle_visibility(section, field));
    }

    /// Explicit "Sync with fields"
    pub fn sync_with_fields(&self) {
        let fields = self.fields.get_untracked();
        let mut changed = false;
        self.editor.update(|e| changed = e.reconcile(&fields));
        self.notice.set(Some(if changed {
            "Layout updated from the current fields".to_string()
        } else {
            "Layout already matches the fields".to_string()
        }));
    }

    /// Writes the working copy. A never saved document becomes the
    /// entity's default detail layout.
    pub fn save(&self) {
        let vm = *self;
        let document = self.editor.with_untracked(|e| e.document().clone());
        let entity_id = self.entity_id.get_untracked();
        let selected = self.selected.get_untracked();
        let user_id = self.user_id.get_untracked();

        wasm_bindgen_futures::spawn_local(async move {
            let saved = match selected {
                Some(id) => {
                    let patch = LayoutPatch {
                        definition: Some(document),
                        ..Default::default()
                    };
                    vm.store.update_layout(&id, patch).await
                }
                None => {
                    let Some(created_by) = user_id else {
                        vm.notice.set(Some("You must be signed in".to_string()));
                        return;
                    };
                    vm.store
                        .create_layout(NewLayoutDefinition {
                            entity_id,
                            name: "Default Layout".to_string(),
                            layout_type: LayoutType::Detail,
                            definition: document,
                            is_default: true,
                            created_by,
                        })
                        .await
                }
            };
            if let Some(layout) = saved {
                vm.selected.set(Some(layout.id));
                vm.editor.update(LayoutEditor::mark_saved);
                vm.notice.set(Some("Layout saved".to_string()));
            }
        });
    }

    pub fn discard(&self) {
        match self.selected.get_untracked() {
            Some(id) => self.select(&id),
            None => {
                let fields = self.fields.get_untracked();
                self.editor
                    .update(|e| e.reset(LayoutDocument::default_for(&fields)));
            }
        }
    }

    pub fn create_layout(&self) {
        let Some(form) = self.new_form.get_untracked() else {
            return;
        };
        let Some(created_by) = self.user_id.get_untracked() else {
            self.notice.set(Some("You must be signed in".to_string()));
            return;
        };
        let entity_id = self.entity_id.get_untracked();
        let fields = self.fields.get_untracked();
        let new_layout = match form.to_new(&entity_id, &fields, created_by) {
            Ok(new_layout) => new_layout,
            Err(message) => {
                self.notice.set(Some(message));
                return;
            }
        };

        let vm = *self;
        wasm_bindgen_futures::spawn_local(async move {
            if let Some(layout) = vm.store.create_layout(new_layout).await {
                vm.new_form.set(None);
                vm.open(&layout);
            }
        });
    }

    pub fn delete_layout(&self, layout_id: String) {
        let vm = *self;
        wasm_bindgen_futures::spawn_local(async move {
            let was_open = vm.selected.get_untracked().as_deref() == Some(layout_id.as_str());
            if vm.store.delete_layout(&layout_id).await && was_open {
                vm.selected.set(None);
                vm.discard();
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::metadata::FieldType;

    fn field(id: &str, name: &str) -> FieldDefinition {
        FieldDefinition {
            id: id.into(),
            entity_id: "e1".into(),
            name: name.into(),
            label: name.into(),
            field_type: FieldType::Text,
            is_required: false,
            is_unique: false,
            default_value: None,
            options: None,
            display_order: 0,
        }
    }

    #[test]
    fn new_layout_requires_a_name() {
        let form = NewLayoutForm::default();
        assert_eq!(
            form.to_new("e1", &[], "u1".into()).unwrap_err(),
            "Layout name is required"
        );
    }

    #[test]
    fn new_layout_starts_with_every_field() {
        let form = NewLayoutForm {
            name: " Compact ".into(),
            layout_type: LayoutType::Edit,
            is_default: true,
        };
        let fields = vec![field("f0", "id"), field("f1", "name"), field("f2", "stage")];
        let new_layout = form.to_new("e1", &fields, "u1".into()).unwrap();

        assert_eq!(new_layout.name, "Compact");
        assert_eq!(new_layout.layout_type, LayoutType::Edit);
        assert_eq!(new_layout.created_by, "u1");
        assert_eq!(new_layout.definition.sections.len(), 1);
        assert_eq!(new_layout.definition.sections[0].fields.len(), 2);
    }
}
