//! Generic SQL over any known table

use contracts::shared::rest::SelectQuery;
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement, Value};
use serde_json::{Map, Value as JsonValue};

use super::codec::{filter_value, row_to_json, to_sql_value};
use super::TableKind;
use crate::shared::data::ddl::quote_ident;

/// Column names in declaration order
pub async fn table_columns<C: ConnectionTrait>(conn: &C, table: &str) -> anyhow::Result<Vec<String>> {
    let rows = conn
        .query_all(Statement::from_string(
            DatabaseBackend::Sqlite,
            format!("PRAGMA table_info({})", quote_ident(table)),
        ))
        .await?;

    let mut columns = Vec::with_capacity(rows.len());
    for row in rows {
        columns.push(row.try_get::<String>("", "name")?);
    }
    Ok(columns)
}

pub async fn is_registered_entity_table<C: ConnectionTrait>(
    conn: &C,
    table: &str,
) -> anyhow::Result<bool> {
    let row = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT name FROM sys_entity_tables WHERE name = ?",
            [table.into()],
        ))
        .await?;
    Ok(row.is_some())
}

pub async fn select<C: ConnectionTrait>(
    conn: &C,
    kind: TableKind,
    table: &str,
    columns: &[String],
    query: &SelectQuery,
) -> anyhow::Result<Vec<JsonValue>> {
    let mut sql = format!("SELECT * FROM {}", quote_ident(table));
    let mut values: Vec<Value> = Vec::new();

    if !query.filters.is_empty() {
        let conditions: Vec<String> = query
            .filters
            .iter()
            .map(|(column, text)| {
                values.push(filter_value(kind, column, text));
                format!("{} = ?", quote_ident(column))
            })
            .collect();
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }

    if let Some(order) = &query.order {
        sql.push_str(&format!(
            " ORDER BY {} {}",
            quote_ident(&order.column),
            if order.descending { "DESC" } else { "ASC" }
        ));
    }

    let rows = conn
        .query_all(Statement::from_sql_and_values(DatabaseBackend::Sqlite, &sql, values))
        .await?;

    Ok(rows.iter().map(|row| row_to_json(kind, row, columns)).collect())
}

/// Every row whose `id` matches; callers decide what a count other than one means
pub async fn select_by_id<C: ConnectionTrait>(
    conn: &C,
    kind: TableKind,
    table: &str,
    columns: &[String],
    id: &str,
) -> anyhow::Result<Vec<JsonValue>> {
    select(conn, kind, table, columns, &SelectQuery::all().eq("id", id)).await
}

pub async fn insert<C: ConnectionTrait>(
    conn: &C,
    kind: TableKind,
    table: &str,
    row: &Map<String, JsonValue>,
) -> Result<(), sea_orm::DbErr> {
    let names: Vec<String> = row.keys().map(|k| quote_ident(k)).collect();
    let placeholders = vec!["?"; names.len()].join(", ");
    let values: Vec<Value> = row
        .iter()
        .map(|(column, value)| to_sql_value(kind, column, value))
        .collect();

    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(table),
        names.join(", "),
        placeholders
    );
    conn.execute(Statement::from_sql_and_values(DatabaseBackend::Sqlite, &sql, values))
        .await?;
    Ok(())
}

/// Returns the number of rows touched
pub async fn update_by_id<C: ConnectionTrait>(
    conn: &C,
    kind: TableKind,
    table: &str,
    id: &str,
    patch: &Map<String, JsonValue>,
) -> Result<u64, sea_orm::DbErr> {
    if patch.is_empty() {
        return Ok(0);
    }

    let assignments: Vec<String> = patch
        .keys()
        .map(|column| format!("{} = ?", quote_ident(column)))
        .collect();
    let mut values: Vec<Value> = patch
        .iter()
        .map(|(column, value)| to_sql_value(kind, column, value))
        .collect();
    values.push(id.into());

    let sql = format!(
        "UPDATE {} SET {} WHERE \"id\" = ?",
        quote_ident(table),
        assignments.join(", ")
    );
    let result = conn
        .execute(Statement::from_sql_and_values(DatabaseBackend::Sqlite, &sql, values))
        .await?;
    Ok(result.rows_affected())
}

pub async fn delete_by_id<C: ConnectionTrait>(
    conn: &C,
    table: &str,
    id: &str,
) -> Result<u64, sea_orm::DbErr> {
    let sql = format!("DELETE FROM {} WHERE \"id\" = ?", quote_ident(table));
    let result = conn
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            &sql,
            [id.into()],
        ))
        .await?;
    Ok(result.rows_affected())
}

pub async fn execute_ddl<C: ConnectionTrait>(conn: &C, sql: String) -> Result<(), sea_orm::DbErr> {
    tracing::info!("Schema change: {}", sql);
    conn.execute(Statement::from_string(DatabaseBackend::Sqlite, sql))
        .await?;
    Ok(())
}
