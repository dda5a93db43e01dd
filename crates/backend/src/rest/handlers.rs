use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use contracts::shared::rest::SelectQuery;
use serde_json::{Map, Value as JsonValue};

use super::service;
use crate::shared::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/rest/:table
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(_claims): CurrentUser,
    Path(table): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResult<Json<Vec<JsonValue>>> {
    let query = SelectQuery::from_query_pairs(&pairs).map_err(ApiError::BadRequest)?;
    let rows = service::list(&state.db, &table, &query).await?;
    Ok(Json(rows))
}

/// GET /api/rest/:table/:id
pub async fn get_single(
    State(state): State<AppState>,
    CurrentUser(_claims): CurrentUser,
    Path((table, id)): Path<(String, String)>,
) -> ApiResult<Json<JsonValue>> {
    let row = service::get_single(&state.db, &table, &id).await?;
    Ok(Json(row))
}

/// POST /api/rest/:table
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(table): Path<String>,
    Json(body): Json<Map<String, JsonValue>>,
) -> ApiResult<(StatusCode, Json<JsonValue>)> {
    let row = service::create(&state.db, &claims.sub, &table, body).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// PATCH /api/rest/:table/:id
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path((table, id)): Path<(String, String)>,
    Json(patch): Json<Map<String, JsonValue>>,
) -> ApiResult<Json<JsonValue>> {
    let row = service::update(&state.db, &claims.sub, &table, &id, patch).await?;
    Ok(Json(row))
}

/// DELETE /api/rest/:table/:id
pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path((table, id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    service::delete(&state.db, &claims.sub, &table, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
