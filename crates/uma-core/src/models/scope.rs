//! Registered scope domain model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredScope {
    pub id: Uuid,
    /// Internal record id of the owning
    /// [`RegisteredResource`](super::resource::RegisteredResource).
    pub resource_id: Uuid,
    pub name: String,
}
