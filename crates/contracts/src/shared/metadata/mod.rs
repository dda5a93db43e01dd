//! Runtime metadata model
//!
//! Entities, their fields and their layouts are defined by users at runtime
//! and stored as rows. Everything that renders or persists a record is driven
//! by these definitions instead of compile-time structs.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use contracts::shared::metadata::{FieldDraft, FieldType, LayoutDocument};
//!
//! let draft = FieldDraft {
//!     name: "Phone Number".into(),
//!     label: "Phone".into(),
//!     field_type: FieldType::Text,
//!     ..Default::default()
//! };
//! let new_field = draft.into_new(&entity.id, fields.len() as i32)?;
//! assert_eq!(new_field.name, "phone_number");
//!
//! let layout = LayoutDocument::default_for(&fields);
//! ```

mod field_type;
mod layout;
mod naming;
mod types;
mod validation;

pub use field_type::{FieldType, WidgetKind};
pub use layout::{
    LayoutDocument, LayoutEditError, LayoutEditor, LayoutFieldRef, LayoutSection, RenderMode,
    ResolvedSection, SectionColumns, DEFAULT_SECTION_TITLE, UNPLACED_SECTION_TITLE,
};
pub use naming::{
    is_system_column, is_valid_identifier, normalize_field_name, options_to_text, parse_options,
    SYSTEM_COLUMNS,
};
pub use types::{
    choose_default_layout, EntityDefinition, EntityPatch, FieldDefinition, FieldDraft,
    FieldOption, FieldPatch, LayoutDefinition, LayoutPatch, LayoutType, NewEntityDefinition,
    NewFieldDefinition, NewLayoutDefinition, ENTITY_DEFINITIONS, FIELD_DEFINITIONS,
    LAYOUT_DEFINITIONS,
};
pub use validation::{
    summarize, validate_field_definition, validate_patch, validate_record, validate_value,
    FieldDefinitionError, ValidationError,
};
