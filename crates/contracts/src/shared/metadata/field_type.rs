//! Field type enumeration for the runtime metadata system

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type of a user-defined field. Serialized with its lowercase wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Textarea,
    Number,
    Email,
    Url,
    Date,
    Datetime,
    Checkbox,
    Select,
    Radio,
    Relation,
}

/// Widget the form renderer produces for a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    /// Single-line `<input>` with the given HTML input type
    SingleLine(&'static str),
    MultiLine,
    Toggle,
    Dropdown,
    RadioGroup,
}

impl FieldType {
    pub const ALL: [FieldType; 11] = [
        Self::Text,
        Self::Textarea,
        Self::Number,
        Self::Email,
        Self::Url,
        Self::Date,
        Self::Datetime,
        Self::Checkbox,
        Self::Select,
        Self::Radio,
        Self::Relation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Number => "number",
            Self::Email => "email",
            Self::Url => "url",
            Self::Date => "date",
            Self::Datetime => "datetime",
            Self::Checkbox => "checkbox",
            Self::Select => "select",
            Self::Radio => "radio",
            Self::Relation => "relation",
        }
    }

    /// Label shown in the field type picker
    pub fn label(&self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Textarea => "Text Area",
            Self::Number => "Number",
            Self::Email => "Email",
            Self::Url => "URL",
            Self::Date => "Date",
            Self::Datetime => "Date/Time",
            Self::Checkbox => "Checkbox",
            Self::Select => "Dropdown",
            Self::Radio => "Radio Buttons",
            Self::Relation => "Relation",
        }
    }

    /// Select and radio fields carry a non-empty option list
    pub fn requires_options(&self) -> bool {
        matches!(self, Self::Select | Self::Radio)
    }

    /// Whether the field settings form offers a default value
    pub fn accepts_default(&self) -> bool {
        !matches!(
            self,
            Self::Checkbox | Self::Select | Self::Radio | Self::Relation
        )
    }

    /// Relation has no dedicated widget yet and renders as plain text.
    pub fn widget(&self) -> WidgetKind {
        match self {
            Self::Text | Self::Relation => WidgetKind::SingleLine("text"),
            Self::Email => WidgetKind::SingleLine("email"),
            Self::Url => WidgetKind::SingleLine("url"),
            Self::Number => WidgetKind::SingleLine("number"),
            Self::Date => WidgetKind::SingleLine("date"),
            Self::Datetime => WidgetKind::SingleLine("datetime-local"),
            Self::Textarea => WidgetKind::MultiLine,
            Self::Checkbox => WidgetKind::Toggle,
            Self::Select => WidgetKind::Dropdown,
            Self::Radio => WidgetKind::RadioGroup,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown field type: {}", s))
    }
}
