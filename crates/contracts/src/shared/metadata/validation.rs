//! Validation of record values and field definitions
//!
//! The dynamic form and the record store both go through
//! [`validate_record`], so a rule is declared once per field type.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use thiserror::Error;

use super::field_type::FieldType;
use super::naming::{is_system_column, is_valid_identifier};
use super::types::{FieldDefinition, NewFieldDefinition};
use crate::shared::record::{FieldValue, RecordValues};

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(r"^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$")
        .case_insensitive(true)
        .build()
        .unwrap()
});

static URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(https?://)?([\da-z.-]+)\.([a-z.]{2,6})([/\w .-]*)*/?$").unwrap());

/// A single field-level error, shown next to the offending input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{label} is required")]
    Required { field: String, label: String },
    #[error("Invalid email address")]
    InvalidEmail { field: String, label: String },
    #[error("Invalid URL")]
    InvalidUrl { field: String, label: String },
    #[error("{label} must be a number")]
    NotANumber { field: String, label: String },
    #[error("{label} must be a valid date")]
    InvalidDate { field: String, label: String },
    #[error("{label} must be checked or unchecked")]
    NotABoolean { field: String, label: String },
    #[error("{label} has no option '{value}'")]
    UnknownOption {
        field: String,
        label: String,
        value: String,
    },
}

impl ValidationError {
    /// Name of the field the error belongs to
    pub fn field(&self) -> &str {
        match self {
            Self::Required { field, .. }
            | Self::InvalidEmail { field, .. }
            | Self::InvalidUrl { field, .. }
            | Self::NotANumber { field, .. }
            | Self::InvalidDate { field, .. }
            | Self::NotABoolean { field, .. }
            | Self::UnknownOption { field, .. } => field,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldDefinitionError {
    #[error("Field label is required")]
    EmptyLabel,
    #[error("Field name '{0}' may only contain lowercase letters, digits and underscores")]
    InvalidName(String),
    #[error("Field name '{0}' is reserved")]
    ReservedName(String),
    #[error("{0} needs at least one option")]
    MissingOptions(String),
}

/// Check one value against its field definition.
///
/// A missing value only fails when the field is required; pattern and
/// type checks apply to present values.
pub fn validate_value(field: &FieldDefinition, value: &FieldValue) -> Result<(), ValidationError> {
    let field_name = || field.name.clone();
    let label = || field.label.clone();

    if value.is_empty() {
        if field.is_required {
            return Err(ValidationError::Required {
                field: field_name(),
                label: label(),
            });
        }
        return Ok(());
    }

    match (field.field_type, value) {
        (FieldType::Email, FieldValue::Text(s)) if !EMAIL.is_match(s.trim()) => {
            Err(ValidationError::InvalidEmail {
                field: field_name(),
                label: label(),
            })
        }
        (FieldType::Url, FieldValue::Text(s)) if !URL.is_match(s.trim()) => {
            Err(ValidationError::InvalidUrl {
                field: field_name(),
                label: label(),
            })
        }
        (FieldType::Number, v) if !matches!(v, FieldValue::Number(_)) => {
            Err(ValidationError::NotANumber {
                field: field_name(),
                label: label(),
            })
        }
        (FieldType::Date, v) if !matches!(v, FieldValue::Date(_)) => {
            Err(ValidationError::InvalidDate {
                field: field_name(),
                label: label(),
            })
        }
        (FieldType::Datetime, v) if !matches!(v, FieldValue::DateTime(_)) => {
            Err(ValidationError::InvalidDate {
                field: field_name(),
                label: label(),
            })
        }
        (FieldType::Checkbox, v) if !matches!(v, FieldValue::Boolean(_)) => {
            Err(ValidationError::NotABoolean {
                field: field_name(),
                label: label(),
            })
        }
        (FieldType::Select | FieldType::Radio, FieldValue::OptionRef(choice))
            if !field.options().iter().any(|o| &o.value == choice) =>
        {
            Err(ValidationError::UnknownOption {
                field: field_name(),
                label: label(),
                value: choice.clone(),
            })
        }
        _ => Ok(()),
    }
}

/// Check every field of an entity against the values about to be written.
///
/// Fields absent from `values` are treated as missing. System columns are
/// checked too, so a required `created_by` without a session fails here.
pub fn validate_record(
    fields: &[FieldDefinition],
    values: &RecordValues,
) -> Result<(), Vec<ValidationError>> {
    let errors: Vec<ValidationError> = fields
        .iter()
        .filter_map(|field| {
            let value = values.get(&field.name).cloned().unwrap_or_default();
            validate_value(field, &value).err()
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Like [`validate_record`] but only for the columns present in a partial update
pub fn validate_patch(
    fields: &[FieldDefinition],
    values: &RecordValues,
) -> Result<(), Vec<ValidationError>> {
    let errors: Vec<ValidationError> = values
        .iter()
        .filter_map(|(name, value)| {
            fields
                .iter()
                .find(|f| &f.name == name)
                .and_then(|field| validate_value(field, value).err())
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// One line per error, for the store's error slot
pub fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn validate_field_definition(field: &NewFieldDefinition) -> Result<(), FieldDefinitionError> {
    if field.label.trim().is_empty() {
        return Err(FieldDefinitionError::EmptyLabel);
    }
    if !is_valid_identifier(&field.name) {
        return Err(FieldDefinitionError::InvalidName(field.name.clone()));
    }
    // created_by may be declared so forms can require it; the column itself
    // already exists on every provisioned table.
    if is_system_column(&field.name) && field.name != "created_by" {
        return Err(FieldDefinitionError::ReservedName(field.name.clone()));
    }
    if field.field_type.requires_options()
        && !field
            .options
            .as_ref()
            .is_some_and(|o| o.iter().any(|opt| !opt.value.is_empty()))
    {
        return Err(FieldDefinitionError::MissingOptions(field.label.clone()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::metadata::naming::parse_options;
    use pretty_assertions::assert_eq;

    fn field(name: &str, label: &str, field_type: FieldType, required: bool) -> FieldDefinition {
        FieldDefinition {
            id: format!("f_{}", name),
            entity_id: "e1".into(),
            name: name.into(),
            label: label.into(),
            field_type,
            is_required: required,
            is_unique: false,
            default_value: None,
            options: None,
            display_order: 0,
        }
    }

    #[test]
    fn required_error_names_the_label() {
        let f = field("company", "Company", FieldType::Text, true);
        let err = validate_value(&f, &FieldValue::Text("   ".into())).unwrap_err();
        assert_eq!(err.to_string(), "Company is required");
        assert_eq!(err.field(), "company");
        assert!(validate_value(&f, &FieldValue::Text("Acme".into())).is_ok());
    }

    #[test]
    fn optional_empty_values_pass() {
        let f = field("site", "Site", FieldType::Url, false);
        assert!(validate_value(&f, &FieldValue::Null).is_ok());
    }

    #[test]
    fn email_pattern_is_case_insensitive() {
        let f = field("email", "Email", FieldType::Email, false);
        assert!(validate_value(&f, &FieldValue::Text("Jane.Doe@Example.COM".into())).is_ok());
        assert!(matches!(
            validate_value(&f, &FieldValue::Text("jane@".into())),
            Err(ValidationError::InvalidEmail { .. })
        ));
    }

    #[test]
    fn url_pattern() {
        let f = field("site", "Site", FieldType::Url, false);
        assert!(validate_value(&f, &FieldValue::Text("https://acme.com/about".into())).is_ok());
        assert!(validate_value(&f, &FieldValue::Text("acme.io".into())).is_ok());
        assert!(validate_value(&f, &FieldValue::Text("not a url".into())).is_err());
    }

    #[test]
    fn number_field_rejects_text() {
        let f = field("amount", "Amount", FieldType::Number, true);
        let value = FieldValue::from_input(FieldType::Number, "five");
        assert!(matches!(
            validate_value(&f, &value),
            Err(ValidationError::NotANumber { .. })
        ));
    }

    #[test]
    fn option_membership() {
        let mut f = field("stage", "Stage", FieldType::Select, false);
        f.options = Some(parse_options("Open, Closed Won"));
        assert!(validate_value(&f, &FieldValue::OptionRef("closed_won".into())).is_ok());
        assert!(validate_value(&f, &FieldValue::OptionRef("lost".into())).is_err());
    }

    #[test]
    fn record_missing_required_created_by_is_rejected() {
        let fields = vec![
            field("amount", "Amount", FieldType::Number, true),
            field("created_by", "Created By", FieldType::Text, true),
        ];
        let mut values = RecordValues::new();
        values.insert("amount".into(), FieldValue::Number(500.0));

        let errors = validate_record(&fields, &values).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field(), "created_by");

        values.insert("created_by".into(), FieldValue::Text("u1".into()));
        assert!(validate_record(&fields, &values).is_ok());
    }

    #[test]
    fn patch_only_checks_present_columns() {
        let fields = vec![
            field("amount", "Amount", FieldType::Number, true),
            field("name", "Name", FieldType::Text, true),
        ];
        let mut values = RecordValues::new();
        values.insert("name".into(), FieldValue::Text("Big deal".into()));
        assert!(validate_patch(&fields, &values).is_ok());

        values.insert("amount".into(), FieldValue::Null);
        let errors = validate_patch(&fields, &values).unwrap_err();
        assert_eq!(summarize(&errors), "Amount is required");
    }

    #[test]
    fn field_definition_rules() {
        let base = NewFieldDefinition {
            entity_id: "e1".into(),
            name: "phone_number".into(),
            label: "Phone Number".into(),
            field_type: FieldType::Text,
            is_required: false,
            is_unique: false,
            default_value: None,
            options: None,
            display_order: 0,
        };
        assert!(validate_field_definition(&base).is_ok());

        let bad_name = NewFieldDefinition { name: "phone-number".into(), ..base.clone() };
        assert!(matches!(
            validate_field_definition(&bad_name),
            Err(FieldDefinitionError::InvalidName(_))
        ));

        let reserved = NewFieldDefinition { name: "created_at".into(), ..base.clone() };
        assert!(matches!(
            validate_field_definition(&reserved),
            Err(FieldDefinitionError::ReservedName(_))
        ));

        let no_label = NewFieldDefinition { label: " ".into(), ..base };
        assert_eq!(
            validate_field_definition(&no_label),
            Err(FieldDefinitionError::EmptyLabel)
        );
    }
}
