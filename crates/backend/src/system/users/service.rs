use anyhow::Result;
use chrono::Utc;
use sea_orm::ConnectionTrait;

use super::repository::{self, User};
use crate::shared::error::{ApiError, ApiResult};
use crate::system::auth::password;

/// Register a new user; the email must be unused
pub async fn sign_up<C: ConnectionTrait>(
    conn: &C,
    email: &str,
    password: &str,
    full_name: &str,
) -> ApiResult<User> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::BadRequest("Invalid email format".to_string()));
    }
    password::validate_password_strength(password)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    if repository::get_by_email(conn, &email).await?.is_some() {
        return Err(ApiError::BadRequest("User already registered".to_string()));
    }

    let password_hash = password::hash_password(password)?;
    let now = Utc::now().to_rfc3339();
    let full_name = full_name.trim();

    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        email,
        full_name: (!full_name.is_empty()).then(|| full_name.to_string()),
        created_at: now.clone(),
        updated_at: now,
        last_login_at: None,
    };

    repository::create_with_password(conn, &user, &password_hash).await?;
    tracing::info!("User {} signed up", user.email);

    Ok(user)
}

/// Verify credentials; `None` for an unknown email or a wrong password
pub async fn verify_credentials<C: ConnectionTrait>(
    conn: &C,
    email: &str,
    password: &str,
) -> Result<Option<User>> {
    let Some(user) = repository::get_by_email(conn, email.trim()).await? else {
        return Ok(None);
    };
    let Some(hash) = repository::get_password_hash(conn, &user.id).await? else {
        return Ok(None);
    };
    if !password::verify_password(password, &hash)? {
        return Ok(None);
    }

    repository::update_last_login(conn, &user.id, &Utc::now().to_rfc3339()).await?;
    Ok(Some(user))
}

pub async fn get_by_id<C: ConnectionTrait>(conn: &C, id: &str) -> Result<Option<User>> {
    repository::get_by_id(conn, id).await
}

pub async fn get_by_email<C: ConnectionTrait>(conn: &C, email: &str) -> Result<Option<User>> {
    repository::get_by_email(conn, email.trim()).await
}

pub async fn set_password<C: ConnectionTrait>(conn: &C, user_id: &str, new_password: &str) -> ApiResult<()> {
    password::validate_password_strength(new_password)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let hash = password::hash_password(new_password)?;
    repository::update_password(conn, user_id, &hash, &Utc::now().to_rfc3339()).await?;
    Ok(())
}
