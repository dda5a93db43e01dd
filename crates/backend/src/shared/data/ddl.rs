//! SQL text for entity tables
//!
//! Every identifier reaching this module has passed `is_valid_identifier`,
//! so quoting is only about reserved words, not injection.

use contracts::shared::metadata::{is_valid_identifier, FieldType};
use contracts::shared::provisioning::ProvisionedColumn;

pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name)
}

pub fn require_identifier(kind: &str, name: &str) -> Result<(), String> {
    if is_valid_identifier(name) {
        Ok(())
    } else {
        Err(format!(
            "Invalid {} name. Use only lowercase letters, numbers, and underscores.",
            kind
        ))
    }
}

/// SQLite column type for a field type wire name; unknown names map to TEXT
pub fn sqlite_type(type_name: &str) -> &'static str {
    match type_name.to_lowercase().parse::<FieldType>() {
        Ok(FieldType::Number) => "NUMERIC",
        Ok(FieldType::Checkbox) => "INTEGER",
        _ if type_name.eq_ignore_ascii_case("boolean") => "INTEGER",
        _ => "TEXT",
    }
}

fn column_sql(column: &ProvisionedColumn) -> String {
    let mut sql = format!("{} {}", quote_ident(&column.name), sqlite_type(&column.column_type));
    if column.required {
        sql.push_str(" NOT NULL");
    }
    if column.unique {
        sql.push_str(" UNIQUE");
    }
    sql
}

/// Table with the three system columns plus the requested ones
pub fn create_entity_table(table: &str, columns: &[ProvisionedColumn]) -> String {
    let mut parts = vec![
        "\"id\" TEXT PRIMARY KEY NOT NULL".to_string(),
        "\"created_at\" TEXT NOT NULL".to_string(),
        "\"created_by\" TEXT NOT NULL REFERENCES sys_users(id)".to_string(),
    ];
    parts.extend(columns.iter().map(column_sql));

    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
        quote_ident(table),
        parts.join(",\n    ")
    )
}

/// Columns added after creation are always nullable: SQLite cannot add a
/// NOT NULL or UNIQUE column to a table that may already hold rows.
pub fn add_column(table: &str, column: &str, type_name: &str) -> String {
    format!(
        "ALTER TABLE {} ADD COLUMN {} {}",
        quote_ident(table),
        quote_ident(column),
        sqlite_type(type_name)
    )
}

pub fn rename_column(table: &str, from: &str, to: &str) -> String {
    format!(
        "ALTER TABLE {} RENAME COLUMN {} TO {}",
        quote_ident(table),
        quote_ident(from),
        quote_ident(to)
    )
}

pub fn drop_column(table: &str, column: &str) -> String {
    format!(
        "ALTER TABLE {} DROP COLUMN {}",
        quote_ident(table),
        quote_ident(column)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn column(name: &str, column_type: &str, required: bool, unique: bool) -> ProvisionedColumn {
        ProvisionedColumn {
            name: name.into(),
            column_type: column_type.into(),
            required,
            unique,
        }
    }

    #[test]
    fn type_mapping() {
        assert_eq!(sqlite_type("text"), "TEXT");
        assert_eq!(sqlite_type("email"), "TEXT");
        assert_eq!(sqlite_type("number"), "NUMERIC");
        assert_eq!(sqlite_type("date"), "TEXT");
        assert_eq!(sqlite_type("datetime"), "TEXT");
        assert_eq!(sqlite_type("checkbox"), "INTEGER");
        assert_eq!(sqlite_type("boolean"), "INTEGER");
        assert_eq!(sqlite_type("mystery"), "TEXT");
    }

    #[test]
    fn create_table_with_columns() {
        let sql = create_entity_table(
            "deals",
            &[column("amount", "number", true, false), column("code", "text", false, true)],
        );
        assert_eq!(
            sql,
            "CREATE TABLE IF NOT EXISTS \"deals\" (\n    \
             \"id\" TEXT PRIMARY KEY NOT NULL,\n    \
             \"created_at\" TEXT NOT NULL,\n    \
             \"created_by\" TEXT NOT NULL REFERENCES sys_users(id),\n    \
             \"amount\" NUMERIC NOT NULL,\n    \
             \"code\" TEXT UNIQUE\n)"
        );
    }

    #[test]
    fn alter_statements() {
        assert_eq!(
            add_column("deals", "stage", "select"),
            "ALTER TABLE \"deals\" ADD COLUMN \"stage\" TEXT"
        );
        assert_eq!(
            drop_column("deals", "stage"),
            "ALTER TABLE \"deals\" DROP COLUMN \"stage\""
        );
        assert!(require_identifier("entity", "Deals").is_err());
        assert!(require_identifier("entity", "deals_2024").is_ok());
    }
}
