#![allow(dead_code)]

use backend::shared::data::db;
use backend::system::initialization;
use backend::system::users::service as user_service;
use contracts::shared::provisioning::{CreateEntityTableRequest, ProvisionedColumn};
use sea_orm::DatabaseConnection;
use serde_json::{Map, Value};

/// Fresh in-memory database with the base schema applied
pub async fn setup() -> DatabaseConnection {
    let conn = db::connect_in_memory().await.unwrap();
    initialization::apply_schema(&conn).await.unwrap();
    conn
}

/// Registers a user and returns its id
pub async fn user(conn: &DatabaseConnection, email: &str) -> String {
    user_service::sign_up(conn, email, "secret1", "Test User")
        .await
        .unwrap()
        .id
}

pub fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {}", other),
    }
}

pub fn column(name: &str, column_type: &str, required: bool) -> ProvisionedColumn {
    ProvisionedColumn {
        name: name.to_string(),
        column_type: column_type.to_string(),
        required,
        unique: false,
    }
}

pub fn table_request(name: &str, fields: Vec<ProvisionedColumn>) -> CreateEntityTableRequest {
    CreateEntityTableRequest {
        entity_name: name.to_string(),
        fields,
    }
}
