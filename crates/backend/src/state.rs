use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::shared::config::Config;

/// Shared by every handler through axum `State`
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
    /// JWT signing secret, loaded from `sys_settings` at startup
    pub jwt_secret: Arc<String>,
}

impl AppState {
    /// Loads (or creates) the JWT secret stored in the database
    pub async fn new(db: DatabaseConnection, config: Config) -> anyhow::Result<Self> {
        let secret = crate::system::auth::jwt::get_jwt_secret(&db).await?;
        Ok(Self {
            db,
            config: Arc::new(config),
            jwt_secret: Arc::new(secret),
        })
    }
}
