use chrono::Utc;
use contracts::shared::metadata::{
    is_valid_identifier, ENTITY_DEFINITIONS, FIELD_DEFINITIONS, LAYOUT_DEFINITIONS,
};
use contracts::shared::rest::SelectQuery;
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use serde_json::{Map, Value as JsonValue};

use super::{repository, schema_sync, TableKind};
use crate::shared::error::{ApiError, ApiResult};

pub const METADATA_TABLES: [&str; 3] = [ENTITY_DEFINITIONS, FIELD_DEFINITIONS, LAYOUT_DEFINITIONS];

/// Only metadata tables and provisioned entity tables are reachable
pub async fn resolve_table<C: ConnectionTrait>(conn: &C, table: &str) -> ApiResult<TableKind> {
    if !is_valid_identifier(table) {
        return Err(ApiError::NotFound(format!("Table '{}' not found", table)));
    }
    if METADATA_TABLES.contains(&table) {
        return Ok(TableKind::Metadata);
    }
    if repository::is_registered_entity_table(conn, table).await? {
        return Ok(TableKind::Entity);
    }
    Err(ApiError::NotFound(format!("Table '{}' not found", table)))
}

fn check_columns<'a>(
    table: &str,
    known: &[String],
    requested: impl IntoIterator<Item = &'a String>,
) -> ApiResult<()> {
    for column in requested {
        if !is_valid_identifier(column) || !known.iter().any(|k| k == column) {
            return Err(ApiError::BadRequest(format!(
                "Column '{}' does not exist on '{}'",
                column, table
            )));
        }
    }
    Ok(())
}

fn row_security_violation(table: &str) -> ApiError {
    ApiError::Forbidden(format!(
        "new row violates row-level security policy for table \"{}\"",
        table
    ))
}

fn into_object(value: JsonValue) -> Map<String, JsonValue> {
    match value {
        JsonValue::Object(map) => map,
        _ => Map::new(),
    }
}

fn owner(row: &Map<String, JsonValue>) -> Option<&str> {
    row.get("created_by").and_then(JsonValue::as_str)
}

async fn fetch_one<C: ConnectionTrait>(
    conn: &C,
    kind: TableKind,
    table: &str,
    columns: &[String],
    id: &str,
) -> ApiResult<Map<String, JsonValue>> {
    let mut rows = repository::select_by_id(conn, kind, table, columns, id).await?;
    match rows.len() {
        1 => Ok(into_object(rows.remove(0))),
        0 => Err(ApiError::NotFound(format!("Row '{}' not found in '{}'", id, table))),
        _ => Err(ApiError::NotAcceptable(
            "JSON object requested, multiple (or no) rows returned".to_string(),
        )),
    }
}

/// Select-all or select-by-equality
pub async fn list(
    conn: &DatabaseConnection,
    table: &str,
    query: &SelectQuery,
) -> ApiResult<Vec<JsonValue>> {
    let kind = resolve_table(conn, table).await?;
    let columns = repository::table_columns(conn, table).await?;
    check_columns(
        table,
        &columns,
        query
            .filters
            .iter()
            .map(|(c, _)| c)
            .chain(query.order.as_ref().map(|o| &o.column)),
    )?;
    Ok(repository::select(conn, kind, table, &columns, query).await?)
}

/// Exactly one row by id, otherwise 406
pub async fn get_single(conn: &DatabaseConnection, table: &str, id: &str) -> ApiResult<JsonValue> {
    let kind = resolve_table(conn, table).await?;
    let columns = repository::table_columns(conn, table).await?;
    let mut rows = repository::select_by_id(conn, kind, table, &columns, id).await?;
    if rows.len() != 1 {
        return Err(ApiError::NotAcceptable(
            "JSON object requested, multiple (or no) rows returned".to_string(),
        ));
    }
    Ok(rows.remove(0))
}

/// Insert with returning. The server assigns `id` and `created_at`; on
/// entity tables a missing `created_by` is filled with the caller and any
/// other owner is refused.
pub async fn create(
    conn: &DatabaseConnection,
    caller_id: &str,
    table: &str,
    mut body: Map<String, JsonValue>,
) -> ApiResult<JsonValue> {
    let kind = resolve_table(conn, table).await?;

    body.remove("id");
    body.remove("created_at");
    let id = uuid::Uuid::new_v4().to_string();
    body.insert("id".to_string(), JsonValue::String(id.clone()));
    body.insert(
        "created_at".to_string(),
        JsonValue::String(Utc::now().to_rfc3339()),
    );

    if kind == TableKind::Entity {
        match body.get("created_by") {
            None | Some(JsonValue::Null) => {
                body.insert(
                    "created_by".to_string(),
                    JsonValue::String(caller_id.to_string()),
                );
            }
            Some(JsonValue::String(owner)) if owner == caller_id => {}
            Some(_) => {
                tracing::warn!("Insert into {} refused: created_by is not the caller", table);
                return Err(row_security_violation(table));
            }
        }
    }

    let columns = repository::table_columns(conn, table).await?;
    check_columns(table, &columns, body.keys())?;

    let txn = conn.begin().await?;
    repository::insert(&txn, kind, table, &body).await?;
    if table == FIELD_DEFINITIONS {
        schema_sync::on_field_created(&txn, &body).await?;
    }
    txn.commit().await?;

    let row = fetch_one(conn, kind, table, &columns, &id).await?;
    Ok(JsonValue::Object(row))
}

/// Partial update by id with returning
pub async fn update(
    conn: &DatabaseConnection,
    caller_id: &str,
    table: &str,
    id: &str,
    mut patch: Map<String, JsonValue>,
) -> ApiResult<JsonValue> {
    let kind = resolve_table(conn, table).await?;
    patch.remove("id");
    patch.remove("created_at");

    let columns = repository::table_columns(conn, table).await?;
    check_columns(table, &columns, patch.keys())?;

    let existing = fetch_one(conn, kind, table, &columns, id).await?;
    if kind == TableKind::Entity {
        if owner(&existing) != Some(caller_id) {
            tracing::warn!("Update of {}/{} refused: not the owner", table, id);
            return Err(ApiError::Forbidden(format!(
                "Row '{}' of '{}' belongs to another user",
                id, table
            )));
        }
        if patch.contains_key("created_by") && owner(&patch) != Some(caller_id) {
            return Err(row_security_violation(table));
        }
    }

    let txn = conn.begin().await?;
    if table == FIELD_DEFINITIONS {
        schema_sync::on_field_updated(&txn, &existing, &patch).await?;
    }
    repository::update_by_id(&txn, kind, table, id, &patch).await?;
    txn.commit().await?;

    let row = fetch_one(conn, kind, table, &columns, id).await?;
    Ok(JsonValue::Object(row))
}

pub async fn delete(
    conn: &DatabaseConnection,
    caller_id: &str,
    table: &str,
    id: &str,
) -> ApiResult<()> {
    let kind = resolve_table(conn, table).await?;
    let columns = repository::table_columns(conn, table).await?;
    let existing = fetch_one(conn, kind, table, &columns, id).await?;

    if kind == TableKind::Entity && owner(&existing) != Some(caller_id) {
        tracing::warn!("Delete of {}/{} refused: not the owner", table, id);
        return Err(ApiError::Forbidden(format!(
            "Row '{}' of '{}' belongs to another user",
            id, table
        )));
    }

    let txn = conn.begin().await?;
    if table == FIELD_DEFINITIONS {
        schema_sync::on_field_deleted(&txn, &existing).await?;
    }
    repository::delete_by_id(&txn, table, id).await?;
    txn.commit().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_columns_are_rejected() {
        let known = vec!["id".to_string(), "name".to_string()];
        assert!(check_columns("deals", &known, [&"name".to_string()]).is_ok());
        let err = check_columns("deals", &known, [&"amount".to_string()]).unwrap_err();
        assert_eq!(err.to_string(), "Column 'amount' does not exist on 'deals'");
        assert!(check_columns("deals", &known, [&"Name; --".to_string()]).is_err());
    }
}
