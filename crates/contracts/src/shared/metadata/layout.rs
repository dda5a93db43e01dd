//! Layout documents and the in-memory layout editor
//!
//! A layout's `definition` column holds a [`LayoutDocument`]: ordered
//! sections, each with a column count and ordered field snapshots. The
//! snapshots are copies of the field definitions taken when the layout was
//! edited; they are not refreshed when a field changes. Rendering resolves
//! them against the live fields and skips references that no longer exist,
//! and [`LayoutDocument::reconcile`] refreshes them when asked to.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::field_type::FieldType;
use super::naming::is_system_column;
use super::types::FieldDefinition;

pub const DEFAULT_SECTION_TITLE: &str = "Information";
/// Trailing section for fields a layout does not place
pub const UNPLACED_SECTION_TITLE: &str = "Additional Fields";

/// Whether sections are resolved for a read-only view or an input form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Display,
    Input,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutEditError {
    #[error("No more fields available to add")]
    NoAvailableField,
    #[error("Section {0} does not exist")]
    SectionOutOfRange(usize),
    #[error("A section has 1 to 3 columns, got {0}")]
    ColumnsOutOfRange(u8),
    #[error("Section {section} has no field at position {field}")]
    FieldOutOfRange { section: usize, field: usize },
}

/// Column count of a section, always 1..=3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SectionColumns(u8);

impl SectionColumns {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 3;

    pub fn new(columns: u8) -> Result<Self, LayoutEditError> {
        if (Self::MIN..=Self::MAX).contains(&columns) {
            Ok(Self(columns))
        } else {
            Err(LayoutEditError::ColumnsOutOfRange(columns))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for SectionColumns {
    fn default() -> Self {
        Self(2)
    }
}

impl TryFrom<u8> for SectionColumns {
    type Error = LayoutEditError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SectionColumns> for u8 {
    fn from(value: SectionColumns) -> Self {
        value.0
    }
}

fn visible_by_default() -> bool {
    true
}

/// Snapshot of a field inside a layout section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutFieldRef {
    pub id: String,
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default = "visible_by_default")]
    pub is_visible: bool,
}

impl LayoutFieldRef {
    pub fn snapshot(field: &FieldDefinition) -> Self {
        Self {
            id: field.id.clone(),
            name: field.name.clone(),
            label: field.label.clone(),
            field_type: field.field_type,
            is_required: field.is_required,
            is_visible: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSection {
    pub title: String,
    #[serde(default)]
    pub columns: SectionColumns,
    #[serde(default)]
    pub fields: Vec<LayoutFieldRef>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutDocument {
    #[serde(default)]
    pub sections: Vec<LayoutSection>,
}

/// A section ready for rendering: only visible fields that still exist
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSection<'a> {
    pub title: &'a str,
    pub columns: SectionColumns,
    pub fields: Vec<&'a FieldDefinition>,
}

impl LayoutDocument {
    /// One "Information" section with every non-system field, all visible
    pub fn default_for(fields: &[FieldDefinition]) -> Self {
        Self {
            sections: vec![LayoutSection {
                title: DEFAULT_SECTION_TITLE.to_string(),
                columns: SectionColumns::default(),
                fields: fields
                    .iter()
                    .filter(|f| !f.is_system_column())
                    .map(LayoutFieldRef::snapshot)
                    .collect(),
            }],
        }
    }

    pub fn contains_field(&self, field_id: &str) -> bool {
        self.sections
            .iter()
            .any(|s| s.fields.iter().any(|f| f.id == field_id))
    }

    /// Sections resolved against the live field list.
    ///
    /// References to deleted fields are skipped, never an error, and a
    /// field placed twice is rendered once. Hidden references are left out,
    /// except that [`RenderMode::Input`] keeps required ones so a form never
    /// demands a value it does not show. Fields the document does not
    /// mention at all, such as those added after the layout was saved, are
    /// appended in an [`UNPLACED_SECTION_TITLE`] section.
    pub fn resolve<'a>(
        &'a self,
        fields: &'a [FieldDefinition],
        mode: RenderMode,
    ) -> Vec<ResolvedSection<'a>> {
        let mut placed: Vec<&str> = Vec::new();
        let mut sections: Vec<ResolvedSection<'a>> = Vec::with_capacity(self.sections.len() + 1);

        for section in &self.sections {
            let mut resolved = Vec::new();
            for field_ref in &section.fields {
                let Some(live) = fields
                    .iter()
                    .find(|f| f.id == field_ref.id && !f.is_system_column())
                else {
                    continue;
                };
                let shown = field_ref.is_visible || (mode == RenderMode::Input && live.is_required);
                if shown && !placed.contains(&live.id.as_str()) {
                    placed.push(live.id.as_str());
                    resolved.push(live);
                }
            }
            sections.push(ResolvedSection {
                title: section.title.as_str(),
                columns: section.columns,
                fields: resolved,
            });
        }

        let unplaced: Vec<&FieldDefinition> = fields
            .iter()
            .filter(|f| !f.is_system_column() && !self.contains_field(&f.id))
            .collect();
        if !unplaced.is_empty() {
            sections.push(ResolvedSection {
                title: UNPLACED_SECTION_TITLE,
                columns: SectionColumns::default(),
                fields: unplaced,
            });
        }

        sections
    }

    /// Refresh snapshots from the live fields and drop references to
    /// deleted ones. Visibility and ordering are kept. Returns whether
    /// anything changed.
    pub fn reconcile(&mut self, fields: &[FieldDefinition]) -> bool {
        let mut changed = false;

        for section in &mut self.sections {
            let before = section.fields.len();
            section
                .fields
                .retain(|r| fields.iter().any(|f| f.id == r.id));
            changed |= section.fields.len() != before;

            for field_ref in &mut section.fields {
                if let Some(live) = fields.iter().find(|f| f.id == field_ref.id) {
                    let mut fresh = LayoutFieldRef::snapshot(live);
                    fresh.is_visible = field_ref.is_visible;
                    if *field_ref != fresh {
                        *field_ref = fresh;
                        changed = true;
                    }
                }
            }
        }

        changed
    }
}

/// Working copy of a layout definition. Nothing is persisted until the
/// caller saves [`LayoutEditor::document`] through the metadata store.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutEditor {
    document: LayoutDocument,
    dirty: bool,
}

impl LayoutEditor {
    pub fn new(document: LayoutDocument) -> Self {
        Self {
            document,
            dirty: false,
        }
    }

    pub fn document(&self) -> &LayoutDocument {
        &self.document
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Replace the working copy, e.g. after selecting another layout
    pub fn reset(&mut self, document: LayoutDocument) {
        self.document = document;
        self.dirty = false;
    }

    fn section_mut(&mut self, index: usize) -> Result<&mut LayoutSection, LayoutEditError> {
        self.document
            .sections
            .get_mut(index)
            .ok_or(LayoutEditError::SectionOutOfRange(index))
    }

    /// Appends "Section N" with two columns and no fields
    pub fn add_section(&mut self) -> usize {
        let index = self.document.sections.len();
        self.document.sections.push(LayoutSection {
            title: format!("Section {}", index + 1),
            columns: SectionColumns::default(),
            fields: Vec::new(),
        });
        self.dirty = true;
        index
    }

    pub fn remove_section(&mut self, index: usize) -> Result<LayoutSection, LayoutEditError> {
        if index >= self.document.sections.len() {
            return Err(LayoutEditError::SectionOutOfRange(index));
        }
        self.dirty = true;
        Ok(self.document.sections.remove(index))
    }

    pub fn rename_section(&mut self, index: usize, title: &str) -> Result<(), LayoutEditError> {
        self.section_mut(index)?.title = title.to_string();
        self.dirty = true;
        Ok(())
    }

    pub fn set_columns(&mut self, index: usize, columns: u8) -> Result<(), LayoutEditError> {
        let columns = SectionColumns::new(columns)?;
        self.section_mut(index)?.columns = columns;
        self.dirty = true;
        Ok(())
    }

    /// Adds the first non-system field (in the given order) that no section
    /// references yet. The same field may still be placed in several
    /// sections by editing the document directly.
    pub fn add_next_field(
        &mut self,
        section: usize,
        fields: &[FieldDefinition],
    ) -> Result<&LayoutFieldRef, LayoutEditError> {
        if section >= self.document.sections.len() {
            return Err(LayoutEditError::SectionOutOfRange(section));
        }

        let next = fields
            .iter()
            .filter(|f| !is_system_column(&f.name))
            .find(|f| !self.document.contains_field(&f.id))
            .ok_or(LayoutEditError::NoAvailableField)?;

        self.dirty = true;
        let target = self.section_mut(section)?;
        target.fields.push(LayoutFieldRef::snapshot(next));

        target
            .fields
            .last()
            .ok_or(LayoutEditError::FieldOutOfRange { section, field: 0 })
    }

    pub fn remove_field(
        &mut self,
        section: usize,
        field: usize,
    ) -> Result<LayoutFieldRef, LayoutEditError> {
        let target = self.section_mut(section)?;
        if field >= target.fields.len() {
            return Err(LayoutEditError::FieldOutOfRange { section, field });
        }
        let removed = target.fields.remove(field);
        self.dirty = true;
        Ok(removed)
    }

    /// Returns the new visibility
    pub fn toggle_visibility(
        &mut self,
        section: usize,
        field: usize,
    ) -> Result<bool, LayoutEditError> {
        let target = self.section_mut(section)?;
        let field_ref = target
            .fields
            .get_mut(field)
            .ok_or(LayoutEditError::FieldOutOfRange { section, field })?;
        field_ref.is_visible = !field_ref.is_visible;
        let visible = field_ref.is_visible;
        self.dirty = true;
        Ok(visible)
    }

    /// "Sync with fields": explicit reconciliation of the working copy
    pub fn reconcile(&mut self, fields: &[FieldDefinition]) -> bool {
        let changed = self.document.reconcile(fields);
        self.dirty |= changed;
        changed
    }

    /// Place an arbitrary field, duplicates included
    pub fn insert_field(
        &mut self,
        section: usize,
        field: &FieldDefinition,
    ) -> Result<(), LayoutEditError> {
        self.section_mut(section)?
            .fields
            .push(LayoutFieldRef::snapshot(field));
        self.dirty = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn field(id: &str, name: &str, order: i32) -> FieldDefinition {
        FieldDefinition {
            id: id.into(),
            entity_id: "e1".into(),
            name: name.into(),
            label: name.to_uppercase(),
            field_type: FieldType::Text,
            is_required: false,
            is_unique: false,
            default_value: None,
            options: None,
            display_order: order,
        }
    }

    fn fields() -> Vec<FieldDefinition> {
        vec![
            field("f1", "name", 0),
            field("f2", "email", 1),
            field("f3", "created_by", 2),
            field("f4", "phone", 3),
        ]
    }

    #[test]
    fn default_document_skips_system_fields() {
        let doc = LayoutDocument::default_for(&fields());
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].title, "Information");
        assert_eq!(doc.sections[0].columns.get(), 2);
        let names: Vec<_> = doc.sections[0].fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["name", "email", "phone"]);
        assert!(doc.sections[0].fields.iter().all(|f| f.is_visible));
    }

    #[test]
    fn definition_json_shape() {
        let doc = LayoutDocument::default_for(&fields()[..1]);
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "sections": [{
                    "title": "Information",
                    "columns": 2,
                    "fields": [{
                        "id": "f1",
                        "name": "name",
                        "label": "NAME",
                        "type": "text",
                        "is_required": false,
                        "is_visible": true
                    }]
                }]
            })
        );
    }

    #[test]
    fn columns_out_of_range_are_rejected_on_parse() {
        let raw = serde_json::json!({ "sections": [{ "title": "A", "columns": 4, "fields": [] }] });
        assert!(serde_json::from_value::<LayoutDocument>(raw).is_err());
    }

    #[test]
    fn editor_adds_sections_and_next_fields() {
        let all = fields();
        let mut editor = LayoutEditor::new(LayoutDocument::default());
        assert!(!editor.is_dirty());

        let s = editor.add_section();
        assert_eq!(editor.document().sections[s].title, "Section 1");
        assert_eq!(editor.add_next_field(s, &all).unwrap().name, "name");
        assert_eq!(editor.add_next_field(s, &all).unwrap().name, "email");
        assert_eq!(editor.add_next_field(s, &all).unwrap().name, "phone");
        assert_eq!(
            editor.add_next_field(s, &all).unwrap_err(),
            LayoutEditError::NoAvailableField
        );
        assert_eq!(
            LayoutEditError::NoAvailableField.to_string(),
            "No more fields available to add"
        );
        assert!(editor.is_dirty());
        editor.mark_saved();
        assert!(!editor.is_dirty());
    }

    #[test]
    fn editor_bounds_are_checked() {
        let mut editor = LayoutEditor::new(LayoutDocument::default_for(&fields()));
        assert_eq!(editor.set_columns(0, 0), Err(LayoutEditError::ColumnsOutOfRange(0)));
        assert_eq!(editor.set_columns(5, 1), Err(LayoutEditError::SectionOutOfRange(5)));
        assert_eq!(
            editor.toggle_visibility(0, 9),
            Err(LayoutEditError::FieldOutOfRange { section: 0, field: 9 })
        );
        assert_eq!(editor.toggle_visibility(0, 1), Ok(false));
        assert_eq!(editor.remove_field(0, 0).unwrap().name, "name");
        assert!(editor.remove_section(0).is_ok());
        assert!(editor.document().sections.is_empty());
    }

    #[test]
    fn duplicates_across_sections_are_allowed() {
        let all = fields();
        let mut editor = LayoutEditor::new(LayoutDocument::default_for(&all));
        let s = editor.add_section();
        editor.insert_field(s, &all[0]).unwrap();
        assert_eq!(editor.document().sections[0].fields[0].id, "f1");
        assert_eq!(editor.document().sections[1].fields[0].id, "f1");
    }

    #[test]
    fn stale_references_are_skipped_when_resolving() {
        let mut all = fields();
        let mut doc = LayoutDocument::default_for(&all);
        doc.sections[0].fields[2].is_visible = false;
        all.retain(|f| f.id != "f2");

        let resolved = doc.resolve(&all, RenderMode::Display);
        let names: Vec<_> = resolved[0].fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["name"]);
    }

    #[test]
    fn fields_added_after_the_layout_are_appended() {
        let mut all = fields();
        let doc = LayoutDocument::default_for(&all[..1]);
        let mut amount = field("f5", "amount", 4);
        amount.is_required = true;
        all.push(amount);

        let resolved = doc.resolve(&all, RenderMode::Input);
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].fields[0].name, "name");
        assert_eq!(resolved[1].title, UNPLACED_SECTION_TITLE);
        let names: Vec<_> = resolved[1].fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["email", "phone", "amount"]);
    }

    #[test]
    fn hidden_required_fields_stay_in_forms() {
        let mut all = fields();
        all[1].is_required = true;
        let mut doc = LayoutDocument::default_for(&all);
        doc.sections[0].fields[1].is_visible = false;

        let shown = |mode| -> Vec<String> {
            doc.resolve(&all, mode)
                .iter()
                .flat_map(|s| s.fields.iter().map(|f| f.name.clone()))
                .collect()
        };
        assert_eq!(shown(RenderMode::Display), vec!["name", "phone"]);
        assert_eq!(shown(RenderMode::Input), vec!["name", "email", "phone"]);
    }

    #[test]
    fn duplicated_field_renders_once() {
        let all = fields();
        let mut editor = LayoutEditor::new(LayoutDocument::default_for(&all));
        let s = editor.add_section();
        editor.insert_field(s, &all[0]).unwrap();

        let resolved = editor.document().resolve(&all, RenderMode::Input);
        assert_eq!(resolved.len(), 2);
        assert!(resolved[1].fields.is_empty());
    }

    #[test]
    fn reconcile_refreshes_and_drops() {
        let mut all = fields();
        let mut editor = LayoutEditor::new(LayoutDocument::default_for(&all));
        editor.toggle_visibility(0, 0).unwrap();
        editor.mark_saved();

        all[0].label = "Full Name".into();
        all.retain(|f| f.id != "f2");

        assert!(editor.reconcile(&all));
        assert!(editor.is_dirty());
        let section = &editor.document().sections[0];
        assert_eq!(section.fields.len(), 2);
        assert_eq!(section.fields[0].label, "Full Name");
        assert!(!section.fields[0].is_visible);
        assert!(!editor.reconcile(&all));
    }
}
