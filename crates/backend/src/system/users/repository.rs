use anyhow::{Context, Result};
use contracts::system::auth::UserInfo;
use sea_orm::{ConnectionTrait, DatabaseBackend, QueryResult, Statement};

/// Row of `sys_users` without the password hash
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub last_login_at: Option<String>,
}

impl User {
    pub fn info(&self) -> UserInfo {
        UserInfo {
            id: self.id.clone(),
            email: self.email.clone(),
            full_name: self.full_name.clone(),
        }
    }
}

const USER_COLUMNS: &str = "id, email, full_name, created_at, updated_at, last_login_at";

fn from_row(row: &QueryResult) -> Result<User> {
    Ok(User {
        id: row.try_get("", "id")?,
        email: row.try_get("", "email")?,
        full_name: row.try_get("", "full_name")?,
        created_at: row.try_get("", "created_at")?,
        updated_at: row.try_get("", "updated_at")?,
        last_login_at: row.try_get("", "last_login_at")?,
    })
}

/// Create user with password hash
pub async fn create_with_password<C: ConnectionTrait>(
    conn: &C,
    user: &User,
    password_hash: &str,
) -> Result<()> {
    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT INTO sys_users (id, email, password_hash, full_name, created_at, updated_at, last_login_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
        [
            user.id.clone().into(),
            user.email.clone().into(),
            password_hash.to_string().into(),
            user.full_name.clone().into(),
            user.created_at.clone().into(),
            user.updated_at.clone().into(),
            user.last_login_at.clone().into(),
        ],
    ))
    .await
    .context("Failed to insert user")?;

    Ok(())
}

pub async fn get_by_id<C: ConnectionTrait>(conn: &C, id: &str) -> Result<Option<User>> {
    let result = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            format!("SELECT {} FROM sys_users WHERE id = ?", USER_COLUMNS),
            [id.into()],
        ))
        .await?;

    result.as_ref().map(from_row).transpose()
}

/// Emails are stored lowercased, so lookups are case-insensitive
pub async fn get_by_email<C: ConnectionTrait>(conn: &C, email: &str) -> Result<Option<User>> {
    let result = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            format!("SELECT {} FROM sys_users WHERE email = ?", USER_COLUMNS),
            [email.to_lowercase().into()],
        ))
        .await?;

    result.as_ref().map(from_row).transpose()
}

pub async fn get_password_hash<C: ConnectionTrait>(conn: &C, user_id: &str) -> Result<Option<String>> {
    let result = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT password_hash FROM sys_users WHERE id = ?",
            [user_id.into()],
        ))
        .await?;

    match result {
        Some(row) => Ok(Some(row.try_get("", "password_hash")?)),
        None => Ok(None),
    }
}

pub async fn update_password<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
    password_hash: &str,
    updated_at: &str,
) -> Result<()> {
    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "UPDATE sys_users SET password_hash = ?, updated_at = ? WHERE id = ?",
        [
            password_hash.to_string().into(),
            updated_at.to_string().into(),
            user_id.into(),
        ],
    ))
    .await
    .context("Failed to update password")?;

    Ok(())
}

pub async fn update_last_login<C: ConnectionTrait>(conn: &C, user_id: &str, at: &str) -> Result<()> {
    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "UPDATE sys_users SET last_login_at = ? WHERE id = ?",
        [at.to_string().into(), user_id.into()],
    ))
    .await?;

    Ok(())
}
