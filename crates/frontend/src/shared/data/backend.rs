use async_trait::async_trait;
use contracts::shared::provisioning::CreateEntityTableRequest;
use contracts::shared::record::RawRecord;
use contracts::shared::rest::SelectQuery;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("{0}")]
    NotFound(String),
    /// Select-single matched zero or several rows
    #[error("JSON object requested, multiple (or no) rows returned")]
    NotSingle,
    #[error("Failed to decode response: {0}")]
    Decode(String),
    #[error("You must be signed in")]
    Unauthenticated,
}

pub type DataResult<T> = Result<T, DataError>;

/// Collection-oriented CRUD over named tables
#[async_trait(?Send)]
pub trait DataBackend: Send + Sync {
    async fn select(&self, table: &str, query: &SelectQuery) -> DataResult<Vec<RawRecord>>;

    /// Exactly one row by id; anything else is [`DataError::NotSingle`]
    async fn select_single(&self, table: &str, id: &str) -> DataResult<RawRecord>;

    /// Insert with returning
    async fn insert(&self, table: &str, row: RawRecord) -> DataResult<RawRecord>;

    /// Partial update by id with returning
    async fn update(&self, table: &str, id: &str, patch: RawRecord) -> DataResult<RawRecord>;

    async fn delete(&self, table: &str, id: &str) -> DataResult<()>;
}

/// Creates the physical table of a new entity
#[async_trait(?Send)]
pub trait SchemaProvisioner: Send + Sync {
    async fn create_entity_table(&self, request: &CreateEntityTableRequest) -> DataResult<()>;
}

pub fn decode_row<T: DeserializeOwned>(row: RawRecord) -> DataResult<T> {
    serde_json::from_value(Value::Object(row)).map_err(|e| DataError::Decode(e.to_string()))
}

pub fn decode_rows<T: DeserializeOwned>(rows: Vec<RawRecord>) -> DataResult<Vec<T>> {
    rows.into_iter().map(decode_row).collect()
}

pub fn encode_row<T: Serialize>(value: &T) -> DataResult<RawRecord> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(DataError::Decode(format!("expected an object, got {}", other))),
        Err(e) => Err(DataError::Decode(e.to_string())),
    }
}
