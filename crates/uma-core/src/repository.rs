//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Implementations receive their
//! store handle at construction time; nothing here reaches for a global
//! connection.

use crate::error::UmaResult;
use crate::models::{
    permission::RequestedResource,
    resource::{OwnerContext, RegisteredResource},
    scope::RegisteredScope,
    ticket::{PermissionTicket, PersistedTicket},
};

// ---------------------------------------------------------------------------
// Resource registry (read-only)
// ---------------------------------------------------------------------------

/// Read access to registered resources and their scopes.
///
/// Store failures are reported as
/// [`UmaError::ValidationQueryFailure`](crate::error::UmaError::ValidationQueryFailure).
pub trait ResourceRegistry: Send + Sync {
    /// Look up a resource by its public id within the given owner context.
    fn find_resource(
        &self,
        resource_id: &str,
        owner: &OwnerContext,
    ) -> impl Future<Output = UmaResult<Option<RegisteredResource>>> + Send;

    /// Look up a scope registered on `resource` by name.
    fn find_scope(
        &self,
        resource: &RegisteredResource,
        scope_name: &str,
    ) -> impl Future<Output = UmaResult<Option<RegisteredScope>>> + Send;
}

// ---------------------------------------------------------------------------
// Permission tickets (write)
// ---------------------------------------------------------------------------

pub trait PermissionTicketStore: Send + Sync {
    /// Persist `ticket` together with one resource association per entry
    /// in `resources` and one scope association per requested scope.
    ///
    /// Either every row is written or none is. Resources and scopes are
    /// resolved again inside the write; if one can no longer be resolved
    /// the write is abandoned. All failures are reported as
    /// [`UmaError::PersistenceFailure`](crate::error::UmaError::PersistenceFailure).
    fn persist(
        &self,
        ticket: &PermissionTicket,
        owner: &OwnerContext,
        resources: &[RequestedResource],
    ) -> impl Future<Output = UmaResult<PersistedTicket>> + Send;
}
