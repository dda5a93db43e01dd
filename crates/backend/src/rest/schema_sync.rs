//! Keeps entity tables in step with their field definitions
//!
//! Runs inside the transaction of the metadata write, so a failed ALTER
//! leaves neither the field row nor the column behind.

use contracts::shared::metadata::is_system_column;
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};
use serde_json::{Map, Value as JsonValue};

use super::repository::{execute_ddl, is_registered_entity_table, table_columns};
use crate::shared::data::ddl;
use crate::shared::error::{ApiError, ApiResult};

fn text<'a>(row: &'a Map<String, JsonValue>, column: &str) -> Option<&'a str> {
    row.get(column).and_then(JsonValue::as_str)
}

/// Physical table of an entity, if it has been provisioned
async fn entity_table<C: ConnectionTrait>(conn: &C, entity_id: &str) -> ApiResult<Option<String>> {
    let row = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT name FROM entity_definitions WHERE id = ?",
            [entity_id.into()],
        ))
        .await?;

    let Some(row) = row else {
        return Ok(None);
    };
    let name: String = row.try_get("", "name")?;
    if is_registered_entity_table(conn, &name).await? {
        Ok(Some(name))
    } else {
        Ok(None)
    }
}

pub async fn on_field_created<C: ConnectionTrait>(
    conn: &C,
    field: &Map<String, JsonValue>,
) -> ApiResult<()> {
    let (Some(entity_id), Some(name)) = (text(field, "entity_id"), text(field, "name")) else {
        return Err(ApiError::BadRequest(
            "Field definitions need entity_id and name".to_string(),
        ));
    };
    ddl::require_identifier("field", name).map_err(ApiError::BadRequest)?;

    if is_system_column(name) {
        return Ok(());
    }
    let Some(table) = entity_table(conn, entity_id).await? else {
        return Ok(());
    };
    if table_columns(conn, &table).await?.iter().any(|c| c == name) {
        return Ok(());
    }

    let type_name = text(field, "type").unwrap_or("text");
    execute_ddl(conn, ddl::add_column(&table, name, type_name)).await?;
    Ok(())
}

pub async fn on_field_updated<C: ConnectionTrait>(
    conn: &C,
    existing: &Map<String, JsonValue>,
    patch: &Map<String, JsonValue>,
) -> ApiResult<()> {
    let (Some(entity_id), Some(old_name)) = (text(existing, "entity_id"), text(existing, "name"))
    else {
        return Ok(());
    };
    let Some(new_name) = text(patch, "name") else {
        return Ok(());
    };
    if new_name == old_name {
        return Ok(());
    }
    ddl::require_identifier("field", new_name).map_err(ApiError::BadRequest)?;
    if is_system_column(old_name) || is_system_column(new_name) {
        return Err(ApiError::BadRequest(format!(
            "Field '{}' cannot be renamed to '{}'",
            old_name, new_name
        )));
    }

    let Some(table) = entity_table(conn, entity_id).await? else {
        return Ok(());
    };
    if table_columns(conn, &table).await?.iter().any(|c| c == old_name) {
        execute_ddl(conn, ddl::rename_column(&table, old_name, new_name)).await?;
    }
    Ok(())
}

/// Dropping the column destroys its data
pub async fn on_field_deleted<C: ConnectionTrait>(
    conn: &C,
    existing: &Map<String, JsonValue>,
) -> ApiResult<()> {
    let (Some(entity_id), Some(name)) = (text(existing, "entity_id"), text(existing, "name")) else {
        return Ok(());
    };
    if is_system_column(name) {
        return Ok(());
    }
    let Some(table) = entity_table(conn, entity_id).await? else {
        return Ok(());
    };
    if table_columns(conn, &table).await?.iter().any(|c| c == name) {
        execute_ddl(conn, ddl::drop_column(&table, name)).await?;
    }
    Ok(())
}
