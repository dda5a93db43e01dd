use axum::extract::{Json, State};
use chrono::Utc;
use contracts::system::auth::{
    MessageResponse, RecoverRequest, RefreshRequest, RefreshResponse, ResetPasswordRequest,
    Session, SignInRequest, SignOutRequest, SignUpRequest, UpdatePasswordRequest, UserInfo,
};
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

use crate::shared::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::system::auth::extractor::CurrentUser;
use crate::system::auth::jwt;
use crate::system::users::{repository::User, service as user_service};

/// Recovery tokens stay valid for one hour
const RECOVERY_TOKEN_HOURS: i64 = 1;

async fn issue_session(state: &AppState, user: &User) -> ApiResult<Session> {
    let access_token =
        jwt::generate_access_token(&state.jwt_secret, &state.config.auth, &user.id, &user.email)?;
    let refresh_token = jwt::generate_opaque_token();
    store_refresh_token(state, &user.id, &refresh_token).await?;

    Ok(Session {
        access_token,
        refresh_token,
        user: user.info(),
    })
}

/// POST /api/auth/sign-up
pub async fn sign_up(
    State(state): State<AppState>,
    Json(request): Json<SignUpRequest>,
) -> ApiResult<Json<Session>> {
    let user =
        user_service::sign_up(&state.db, &request.email, &request.password, &request.full_name)
            .await?;
    Ok(Json(issue_session(&state, &user).await?))
}

/// POST /api/auth/sign-in
pub async fn sign_in(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> ApiResult<Json<Session>> {
    let user = user_service::verify_credentials(&state.db, &request.email, &request.password)
        .await?
        .ok_or_else(|| ApiError::BadRequest("Invalid login credentials".to_string()))?;

    tracing::info!("User {} signed in", user.email);
    Ok(Json(issue_session(&state, &user).await?))
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let user_id = validate_refresh_token(&state, &request.refresh_token)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid or expired refresh token".to_string()))?;

    let user = user_service::get_by_id(&state.db, &user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User no longer exists".to_string()))?;

    let access_token =
        jwt::generate_access_token(&state.jwt_secret, &state.config.auth, &user.id, &user.email)?;
    Ok(Json(RefreshResponse { access_token }))
}

/// POST /api/auth/sign-out
pub async fn sign_out(
    State(state): State<AppState>,
    Json(request): Json<SignOutRequest>,
) -> ApiResult<Json<MessageResponse>> {
    revoke_refresh_token(&state, &request.refresh_token).await?;
    Ok(Json(MessageResponse {
        message: "Signed out".to_string(),
    }))
}

/// GET /api/auth/session (protected by middleware)
pub async fn session(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
) -> ApiResult<Json<UserInfo>> {
    let user = user_service::get_by_id(&state.db, &claims.sub)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
    Ok(Json(user.info()))
}

/// POST /api/auth/reset-password
///
/// Always answers with the same message so callers cannot probe for
/// registered emails. The token is only written to the log.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    if let Some(user) = user_service::get_by_email(&state.db, &request.email).await? {
        let token = jwt::generate_opaque_token();
        store_recovery_token(&state, &user.id, &token).await?;
        tracing::info!("Password recovery requested for {}: token {}", user.email, token);
    } else {
        tracing::warn!("Password recovery requested for unknown email");
    }

    Ok(Json(MessageResponse {
        message: "Password recovery instructions have been sent".to_string(),
    }))
}

/// POST /api/auth/recover
pub async fn recover(
    State(state): State<AppState>,
    Json(request): Json<RecoverRequest>,
) -> ApiResult<Json<Session>> {
    let user_id = consume_recovery_token(&state, &request.token)
        .await?
        .ok_or_else(|| ApiError::BadRequest("Recovery link is invalid or has expired".to_string()))?;

    user_service::set_password(&state.db, &user_id, &request.password).await?;
    let user = user_service::get_by_id(&state.db, &user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    tracing::info!("Password of {} reset through recovery", user.email);
    Ok(Json(issue_session(&state, &user).await?))
}

/// POST /api/auth/update-password (protected by middleware)
pub async fn update_password(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Json(request): Json<UpdatePasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    user_service::set_password(&state.db, &claims.sub, &request.password).await?;
    Ok(Json(MessageResponse {
        message: "Password updated".to_string(),
    }))
}

// Helper functions for refresh and recovery tokens

async fn store_refresh_token(state: &AppState, user_id: &str, token: &str) -> anyhow::Result<()> {
    let expires_at = jwt::calculate_refresh_token_expiration(&state.config.auth);
    store_token(&state.db, "sys_refresh_tokens", user_id, token, expires_at).await
}

async fn store_recovery_token(state: &AppState, user_id: &str, token: &str) -> anyhow::Result<()> {
    let expires_at = (Utc::now() + chrono::Duration::hours(RECOVERY_TOKEN_HOURS)).to_rfc3339();
    store_token(&state.db, "sys_recovery_tokens", user_id, token, expires_at).await
}

async fn store_token<C: ConnectionTrait>(
    conn: &C,
    table: &str,
    user_id: &str,
    token: &str,
    expires_at: String,
) -> anyhow::Result<()> {
    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        format!(
            "INSERT INTO {} (id, user_id, token_hash, expires_at, created_at) VALUES (?, ?, ?, ?, ?)",
            table
        ),
        [
            uuid::Uuid::new_v4().to_string().into(),
            user_id.to_string().into(),
            hash_token(token).into(),
            expires_at.into(),
            Utc::now().to_rfc3339().into(),
        ],
    ))
    .await?;

    Ok(())
}

async fn validate_refresh_token(state: &AppState, token: &str) -> anyhow::Result<Option<String>> {
    let result = state
        .db
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT user_id FROM sys_refresh_tokens
             WHERE token_hash = ? AND expires_at > ? AND revoked_at IS NULL",
            [hash_token(token).into(), Utc::now().to_rfc3339().into()],
        ))
        .await?;

    match result {
        Some(row) => Ok(Some(row.try_get("", "user_id")?)),
        None => Ok(None),
    }
}

async fn revoke_refresh_token(state: &AppState, token: &str) -> anyhow::Result<()> {
    state
        .db
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "UPDATE sys_refresh_tokens SET revoked_at = ? WHERE token_hash = ?",
            [Utc::now().to_rfc3339().into(), hash_token(token).into()],
        ))
        .await?;

    Ok(())
}

/// Marks the token used; a token works once
async fn consume_recovery_token(state: &AppState, token: &str) -> anyhow::Result<Option<String>> {
    let token_hash = hash_token(token);
    let now = Utc::now().to_rfc3339();

    let result = state
        .db
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT id, user_id FROM sys_recovery_tokens
             WHERE token_hash = ? AND expires_at > ? AND used_at IS NULL",
            [token_hash.into(), now.clone().into()],
        ))
        .await?;

    let Some(row) = result else {
        return Ok(None);
    };
    let id: String = row.try_get("", "id")?;
    let user_id: String = row.try_get("", "user_id")?;

    state
        .db
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "UPDATE sys_recovery_tokens SET used_at = ? WHERE id = ?",
            [now.into(), id.into()],
        ))
        .await?;

    Ok(Some(user_id))
}

fn hash_token(token: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_hash_is_stable_hex() {
        let hash = hash_token("abc");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, hash_token("abc"));
        assert_ne!(hash, hash_token("abd"));
    }
}
