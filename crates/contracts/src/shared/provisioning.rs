//! Entity creation: metadata row first, physical table second
//!
//! The two steps are separate network calls with no transaction around
//! them. [`EntityCreation`] records how far a creation got so that an entity
//! row without a table is visible as such instead of silently lingering.

use serde::{Deserialize, Serialize};

use super::metadata::EntityDefinition;

/// Path segment of the provisioning function under `/api/functions/`
pub const CREATE_ENTITY_TABLE: &str = "create-entity-table";
pub const TABLE_CREATED_MESSAGE: &str = "Table created successfully";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntityTableRequest {
    pub entity_name: String,
    #[serde(default)]
    pub fields: Vec<ProvisionedColumn>,
}

/// A column to create together with the table. Unknown types become text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvisionedColumn {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub unique: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateEntityTableResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntityCreation {
    /// Metadata row inserted, table not provisioned yet
    MetadataCreated(EntityDefinition),
    TableProvisioned(EntityDefinition),
    /// Metadata row exists without a table and needs manual cleanup
    ProvisioningFailed {
        entity: EntityDefinition,
        error: String,
    },
}

impl EntityCreation {
    pub fn started(entity: EntityDefinition) -> Self {
        Self::MetadataCreated(entity)
    }

    /// Only a pending creation can move on; settled states stay as they are.
    pub fn provisioned(self) -> Self {
        match self {
            Self::MetadataCreated(entity) => Self::TableProvisioned(entity),
            settled => settled,
        }
    }

    pub fn failed(self, error: impl Into<String>) -> Self {
        match self {
            Self::MetadataCreated(entity) => Self::ProvisioningFailed {
                entity,
                error: error.into(),
            },
            settled => settled,
        }
    }

    pub fn entity(&self) -> &EntityDefinition {
        match self {
            Self::MetadataCreated(entity)
            | Self::TableProvisioned(entity)
            | Self::ProvisioningFailed { entity, .. } => entity,
        }
    }

    pub fn needs_cleanup(&self) -> bool {
        matches!(self, Self::ProvisioningFailed { .. })
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::TableProvisioned(_))
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::ProvisioningFailed { error, .. } => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn deals() -> EntityDefinition {
        EntityDefinition {
            id: "e1".into(),
            name: "deals".into(),
            label: "Deals".into(),
            description: None,
            is_system: false,
            icon: None,
        }
    }

    #[test]
    fn request_uses_camel_case() {
        let request = CreateEntityTableRequest {
            entity_name: "deals".into(),
            fields: vec![],
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({ "entityName": "deals", "fields": [] })
        );
    }

    #[test]
    fn successful_creation() {
        let state = EntityCreation::started(deals());
        assert!(!state.is_complete());
        let state = state.provisioned();
        assert!(state.is_complete());
        assert!(!state.needs_cleanup());
        assert_eq!(state.entity().name, "deals");
    }

    #[test]
    fn failed_creation_needs_cleanup() {
        let state = EntityCreation::started(deals()).failed("Invalid entity name");
        assert!(state.needs_cleanup());
        assert_eq!(state.error(), Some("Invalid entity name"));
        // settled states do not move
        assert!(state.clone().provisioned().needs_cleanup());
    }
}
