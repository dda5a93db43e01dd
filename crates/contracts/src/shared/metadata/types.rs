//! Metadata rows: entity, field and layout definitions
//!
//! These mirror the three metadata collections of the data backend
//! (`entity_definitions`, `field_definitions`, `layout_definitions`).
//! `New*` types are the insert payloads (no id), `*Patch` types are partial
//! updates where an absent member leaves the column untouched.

use serde::{Deserialize, Serialize};

use super::field_type::FieldType;
use super::layout::LayoutDocument;
use super::naming::{normalize_field_name, parse_options};
use super::validation::{validate_field_definition, FieldDefinitionError};

pub const ENTITY_DEFINITIONS: &str = "entity_definitions";
pub const FIELD_DEFINITIONS: &str = "field_definitions";
pub const LAYOUT_DEFINITIONS: &str = "layout_definitions";

// ============================================================================
// Entity definitions
// ============================================================================

/// A user-defined record type. `name` doubles as the physical table name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDefinition {
    pub id: String,
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_system: bool,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NewEntityDefinition {
    pub name: String,
    pub label: String,
    pub description: Option<String>,
    pub is_system: bool,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EntityPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl EntityPatch {
    /// System entities keep their name: a patch coming from the edit form
    /// gets its `name` pinned back to the original before it is sent.
    /// The store itself does not check this.
    pub fn pinned_to(mut self, original: &EntityDefinition) -> Self {
        if original.is_system {
            self.name = Some(original.name.clone());
        }
        self
    }
}

// ============================================================================
// Field definitions
// ============================================================================

/// One choice of a select/radio field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub id: String,
    pub entity_id: String,
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub is_unique: bool,
    #[serde(default)]
    pub default_value: Option<serde_json::Value>,
    #[serde(default)]
    pub options: Option<Vec<FieldOption>>,
    #[serde(default)]
    pub display_order: i32,
}

impl FieldDefinition {
    pub fn options(&self) -> &[FieldOption] {
        self.options.as_deref().unwrap_or(&[])
    }

    /// `id`, `created_at` and `created_by` are managed by the backend
    pub fn is_system_column(&self) -> bool {
        super::naming::is_system_column(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFieldDefinition {
    pub entity_id: String,
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub is_required: bool,
    pub is_unique: bool,
    pub default_value: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
    pub display_order: i32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_unique: Option<bool>,
    /// `Some(Value::Null)` clears the default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i32>,
}

/// Raw text of the field settings form before normalization
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldDraft {
    pub name: String,
    pub label: String,
    pub field_type: FieldType,
    pub is_required: bool,
    pub is_unique: bool,
    pub default_value: String,
    pub options: String,
}

impl FieldDraft {
    /// Pre-fill the edit form from an existing definition
    pub fn from_definition(field: &FieldDefinition) -> Self {
        Self {
            name: field.name.clone(),
            label: field.label.clone(),
            field_type: field.field_type,
            is_required: field.is_required,
            is_unique: field.is_unique,
            default_value: field
                .default_value
                .as_ref()
                .map(|v| match v {
                    serde_json::Value::String(s) => s.clone(),
                    serde_json::Value::Null => String::new(),
                    other => other.to_string(),
                })
                .unwrap_or_default(),
            options: super::naming::options_to_text(field.options()),
        }
    }

    fn normalized_options(&self) -> Option<Vec<FieldOption>> {
        if self.field_type.requires_options() && !self.options.is_empty() {
            Some(parse_options(&self.options))
        } else {
            None
        }
    }

    fn normalized_default(&self) -> serde_json::Value {
        if self.default_value.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::Value::String(self.default_value.clone())
        }
    }

    /// Insert payload for a new field placed after `display_order - 1` existing ones
    pub fn into_new(
        self,
        entity_id: &str,
        display_order: i32,
    ) -> Result<NewFieldDefinition, FieldDefinitionError> {
        let new_field = NewFieldDefinition {
            entity_id: entity_id.to_string(),
            name: normalize_field_name(&self.name),
            label: self.label.trim().to_string(),
            field_type: self.field_type,
            is_required: self.is_required,
            is_unique: self.is_unique,
            default_value: Some(self.normalized_default()),
            options: self.normalized_options(),
            display_order,
        };
        validate_field_definition(&new_field)?;
        Ok(new_field)
    }

    /// Patch for an existing field; `display_order` is left untouched
    pub fn into_patch(self, entity_id: &str) -> Result<FieldPatch, FieldDefinitionError> {
        let checked = self.clone().into_new(entity_id, 0)?;
        Ok(FieldPatch {
            name: Some(checked.name),
            label: Some(checked.label),
            field_type: Some(checked.field_type),
            is_required: Some(checked.is_required),
            is_unique: Some(checked.is_unique),
            default_value: checked.default_value,
            options: checked.options,
            display_order: None,
        })
    }
}

// ============================================================================
// Layout definitions
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutType {
    #[default]
    Detail,
    Edit,
    List,
}

impl LayoutType {
    pub const ALL: [LayoutType; 3] = [Self::Detail, Self::Edit, Self::List];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Detail => "detail",
            Self::Edit => "edit",
            Self::List => "list",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Detail => "Detail View",
            Self::Edit => "Edit Form",
            Self::List => "List View",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == code)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDefinition {
    pub id: String,
    pub entity_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub layout_type: LayoutType,
    #[serde(default)]
    pub definition: LayoutDocument,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub created_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLayoutDefinition {
    pub entity_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub layout_type: LayoutType,
    pub definition: LayoutDocument,
    pub is_default: bool,
    pub created_by: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub layout_type: Option<LayoutType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<LayoutDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}

/// The layout an entity renders with: the default one of the given type,
/// otherwise the first layout of that type, otherwise the first at all.
pub fn choose_default_layout(
    layouts: &[LayoutDefinition],
    layout_type: LayoutType,
) -> Option<&LayoutDefinition> {
    layouts
        .iter()
        .find(|l| l.is_default && l.layout_type == layout_type)
        .or_else(|| layouts.iter().find(|l| l.layout_type == layout_type))
        .or_else(|| layouts.first())
}
