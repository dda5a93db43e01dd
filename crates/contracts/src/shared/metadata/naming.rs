//! Identifier and option-list normalization

use once_cell::sync::Lazy;
use regex::Regex;

use super::types::FieldOption;

/// Columns every provisioned table carries and the backend manages
pub const SYSTEM_COLUMNS: [&str; 3] = ["id", "created_at", "created_by"];

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9_]+$").unwrap());

pub fn is_system_column(name: &str) -> bool {
    SYSTEM_COLUMNS.contains(&name)
}

/// Lowercase and replace each whitespace run with a single underscore.
///
/// "First Name" becomes "first_name". Nothing else is stripped, so the
/// result may still fail [`is_valid_identifier`].
pub fn normalize_field_name(input: &str) -> String {
    WHITESPACE_RUN
        .replace_all(&input.to_lowercase(), "_")
        .into_owned()
}

/// Table and column names accepted by the provisioning function
pub fn is_valid_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Parse the comma separated option text of the field settings form.
///
/// Each token is trimmed; its label is the trimmed text and its value the
/// normalized text. Empty tokens are kept as empty options.
pub fn parse_options(text: &str) -> Vec<FieldOption> {
    text.split(',')
        .map(|token| {
            let label = token.trim();
            FieldOption {
                label: label.to_string(),
                value: normalize_field_name(label),
            }
        })
        .collect()
}

/// Inverse of [`parse_options`] for pre-filling the edit form
pub fn options_to_text(options: &[FieldOption]) -> String {
    options
        .iter()
        .map(|o| o.label.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn field_names_are_lowercased_and_underscored() {
        assert_eq!(normalize_field_name("First Name"), "first_name");
        assert_eq!(normalize_field_name("Annual  Revenue\t2024"), "annual_revenue_2024");
        assert_eq!(normalize_field_name("email"), "email");
    }

    #[test]
    fn identifier_whitelist() {
        assert!(is_valid_identifier("contacts_2"));
        assert!(!is_valid_identifier("Contacts"));
        assert!(!is_valid_identifier("drop table;"));
        assert!(!is_valid_identifier(""));
    }

    #[test]
    fn options_keep_empty_tokens() {
        let options = parse_options("Hot,,Cold Lead");
        assert_eq!(options.len(), 3);
        assert_eq!(options[1], FieldOption { label: String::new(), value: String::new() });
        assert_eq!(options[2].value, "cold_lead");
    }

    #[test]
    fn options_text_round_trip() {
        let options = parse_options("Small, Medium, Large");
        assert_eq!(options_to_text(&options), "Small, Medium, Large");
    }

    #[test]
    fn system_columns() {
        assert!(is_system_column("created_by"));
        assert!(!is_system_column("name"));
    }
}
