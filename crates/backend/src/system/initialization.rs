use anyhow::{Context, Result};
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};

/// Base schema: auth tables, the registry of provisioned entity tables and
/// the three metadata tables. Every statement is idempotent.
const SCHEMA_SQL: &str = r#"
-- auth
CREATE TABLE IF NOT EXISTS sys_settings (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    description TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS sys_users (
    id TEXT PRIMARY KEY NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    full_name TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    last_login_at TEXT
);

CREATE TABLE IF NOT EXISTS sys_refresh_tokens (
    id TEXT PRIMARY KEY NOT NULL,
    user_id TEXT NOT NULL REFERENCES sys_users(id),
    token_hash TEXT NOT NULL,
    expires_at TEXT NOT NULL,
    created_at TEXT NOT NULL,
    revoked_at TEXT
);

CREATE TABLE IF NOT EXISTS sys_recovery_tokens (
    id TEXT PRIMARY KEY NOT NULL,
    user_id TEXT NOT NULL REFERENCES sys_users(id),
    token_hash TEXT NOT NULL,
    expires_at TEXT NOT NULL,
    created_at TEXT NOT NULL,
    used_at TEXT
);

-- provisioned entity tables and their access policy
CREATE TABLE IF NOT EXISTS sys_entity_tables (
    name TEXT PRIMARY KEY NOT NULL,
    policy TEXT NOT NULL,
    created_by TEXT REFERENCES sys_users(id),
    created_at TEXT NOT NULL
);

-- metadata
CREATE TABLE IF NOT EXISTS entity_definitions (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL UNIQUE,
    label TEXT NOT NULL,
    description TEXT,
    is_system INTEGER NOT NULL DEFAULT 0,
    icon TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS field_definitions (
    id TEXT PRIMARY KEY NOT NULL,
    entity_id TEXT NOT NULL REFERENCES entity_definitions(id),
    name TEXT NOT NULL,
    label TEXT NOT NULL,
    type TEXT NOT NULL,
    is_required INTEGER NOT NULL DEFAULT 0,
    is_unique INTEGER NOT NULL DEFAULT 0,
    default_value TEXT,
    options TEXT,
    display_order INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    UNIQUE (entity_id, name)
);

CREATE TABLE IF NOT EXISTS layout_definitions (
    id TEXT PRIMARY KEY NOT NULL,
    entity_id TEXT NOT NULL REFERENCES entity_definitions(id),
    name TEXT NOT NULL,
    type TEXT NOT NULL,
    definition TEXT NOT NULL,
    is_default INTEGER NOT NULL DEFAULT 0,
    created_by TEXT REFERENCES sys_users(id),
    created_at TEXT NOT NULL
);
"#;

/// Split a script into statements, dropping comment-only lines
fn statements(script: &str) -> Vec<String> {
    script
        .split(';')
        .map(|statement| {
            statement
                .lines()
                .filter(|line| {
                    let trimmed_line = line.trim();
                    !trimmed_line.is_empty() && !trimmed_line.starts_with("--")
                })
                .collect::<Vec<_>>()
                .join("\n")
        })
        .filter(|cleaned| !cleaned.trim().is_empty())
        .collect()
}

/// Apply the base schema
pub async fn apply_schema(conn: &DatabaseConnection) -> Result<()> {
    // SQLite doesn't support execute_batch in sea-orm; run statements one by one
    for (idx, statement) in statements(SCHEMA_SQL).iter().enumerate() {
        let preview = statement
            .chars()
            .take(60)
            .collect::<String>()
            .replace('\n', " ");
        tracing::debug!("Executing schema statement #{}: {}...", idx, preview);

        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            format!("{};", statement.trim()),
        ))
        .await
        .with_context(|| format!("Failed to execute schema statement #{}: {}", idx, preview))?;
    }

    tracing::info!("Database schema is up to date");

    Ok(())
}
