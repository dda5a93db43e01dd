//! Schema provisioning: one physical table per entity

use axum::extract::{Json, State};
use chrono::Utc;
use contracts::shared::metadata::is_system_column;
use contracts::shared::provisioning::{
    CreateEntityTableRequest, CreateEntityTableResponse, TABLE_CREATED_MESSAGE,
};
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement, TransactionTrait};

use crate::rest::repository::execute_ddl;
use crate::rest::service::METADATA_TABLES;
use crate::shared::data::ddl;
use crate::shared::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::system::auth::extractor::CurrentUser;

/// Readable by every authenticated user, writable by the row owner only
pub const OWNER_WRITE_POLICY: &str = "owner_write";

fn check_request(request: &CreateEntityTableRequest) -> ApiResult<()> {
    let name = request.entity_name.as_str();
    ddl::require_identifier("entity", name).map_err(ApiError::BadRequest)?;
    if METADATA_TABLES.contains(&name) || name.starts_with("sys_") {
        return Err(ApiError::BadRequest(format!(
            "Entity name '{}' is reserved",
            name
        )));
    }
    for column in &request.fields {
        ddl::require_identifier("field", &column.name).map_err(ApiError::BadRequest)?;
    }
    Ok(())
}

/// Create the table and register its access policy. Running it again for
/// an existing table changes nothing.
pub async fn provision(
    conn: &DatabaseConnection,
    caller_id: &str,
    mut request: CreateEntityTableRequest,
) -> ApiResult<CreateEntityTableResponse> {
    check_request(&request)?;
    request.fields.retain(|column| !is_system_column(&column.name));

    let table = request.entity_name.as_str();
    let txn = conn.begin().await?;
    execute_ddl(&txn, ddl::create_entity_table(table, &request.fields)).await?;
    txn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT OR IGNORE INTO sys_entity_tables (name, policy, created_by, created_at)
         VALUES (?, ?, ?, ?)",
        [
            table.into(),
            OWNER_WRITE_POLICY.into(),
            caller_id.into(),
            Utc::now().to_rfc3339().into(),
        ],
    ))
    .await?;
    txn.commit().await?;

    tracing::info!(
        "Provisioned entity table {} with {} column(s)",
        table,
        request.fields.len()
    );
    Ok(CreateEntityTableResponse {
        message: TABLE_CREATED_MESSAGE.to_string(),
    })
}

/// POST /api/functions/create-entity-table
pub async fn handler(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Json(request): Json<CreateEntityTableRequest>,
) -> ApiResult<Json<CreateEntityTableResponse>> {
    Ok(Json(provision(&state.db, &claims.sub, request).await?))
}
