//! Registered resource domain model.
//!
//! Resources are registered by the resource owner through a separate
//! registration flow. Issuance only reads them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A resource as recorded in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredResource {
    /// Internal record identifier.
    pub id: Uuid,
    /// Public resource identifier handed out at registration time.
    pub resource_id: String,
    pub resource_owner_name: String,
    pub client_id: String,
    pub user_domain: String,
    pub created_at: DateTime<Utc>,
}

/// The (owner, client, user domain) triple a resource identifier is
/// unique within.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerContext {
    pub resource_owner_name: String,
    /// Client id of the resource server acting on the owner's behalf.
    pub client_id: String,
    pub user_domain: String,
}

impl OwnerContext {
    pub fn new(
        resource_owner_name: impl Into<String>,
        client_id: impl Into<String>,
        user_domain: impl Into<String>,
    ) -> Self {
        Self {
            resource_owner_name: resource_owner_name.into(),
            client_id: client_id.into(),
            user_domain: user_domain.into(),
        }
    }

    /// True if `resource` was registered under exactly this context.
    pub fn owns(&self, resource: &RegisteredResource) -> bool {
        resource.resource_owner_name == self.resource_owner_name
            && resource.client_id == self.client_id
            && resource.user_domain == self.user_domain
    }
}
