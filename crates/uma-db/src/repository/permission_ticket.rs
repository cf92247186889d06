//! SurrealDB implementation of [`PermissionTicketStore`].
//!
//! The ticket row and every association row are written by a single
//! SurrealQL block wrapped in `BEGIN TRANSACTION` / `COMMIT TRANSACTION`.
//! SurrealDB cancels the whole block when any statement in it errors,
//! so there is no exit path that leaves a partially written ticket.

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::debug;
use uma_core::error::UmaResult;
use uma_core::models::permission::RequestedResource;
use uma_core::models::resource::OwnerContext;
use uma_core::models::ticket::{PermissionTicket, PersistedTicket};
use uma_core::repository::PermissionTicketStore;
use uuid::Uuid;

use crate::error::DbError;

/// Resources and scopes are resolved again inside the transaction. A
/// resource or scope deleted since validation aborts the block with
/// `THROW` instead of producing a dangling association.
const PERSIST_TICKET: &str = "\
BEGIN TRANSACTION;

CREATE type::record('permission_ticket', $ticket_id) SET \
    ticket = $ticket, \
    created_at = $created_at, \
    validity_period_ms = $validity_period_ms, \
    status = $status, \
    tenant_id = $tenant_id;

FOR $entry IN $resources {
    LET $resource = (SELECT VALUE meta::id(id) FROM resource \
        WHERE resource_id = $entry.resource_id \
        AND resource_owner_name = $resource_owner_name \
        AND client_id = $client_id \
        AND user_domain = $user_domain \
        LIMIT 1)[0];
    IF !$resource {
        THROW 'requested resource is no longer registered';
    };

    CREATE type::record('pt_resource', $entry.association_id) SET \
        ticket_id = $ticket_id, \
        resource_id = $resource;

    FOR $scope IN $entry.scopes {
        LET $scope_id = (SELECT VALUE meta::id(id) FROM resource_scope \
            WHERE resource_id = $resource AND scope_name = $scope \
            LIMIT 1)[0];
        IF !$scope_id {
            THROW 'requested scope is no longer registered';
        };

        CREATE pt_resource_scope SET \
            pt_resource_id = $entry.association_id, \
            scope_id = $scope_id;
    };
};

COMMIT TRANSACTION;
";

/// Per-resource parameters for [`PERSIST_TICKET`].
#[derive(Debug, SurrealValue)]
struct ResourceBinding {
    resource_id: String,
    association_id: String,
    scopes: Vec<String>,
}

/// Ticket store backed by SurrealDB.
#[derive(Clone)]
pub struct SurrealPermissionTicketStore<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealPermissionTicketStore<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn write(
        &self,
        ticket: &PermissionTicket,
        owner: &OwnerContext,
        resources: &[RequestedResource],
    ) -> Result<PersistedTicket, DbError> {
        let ticket_id = Uuid::new_v4();
        let resource_association_ids: Vec<Uuid> =
            resources.iter().map(|_| Uuid::new_v4()).collect();

        let bindings: Vec<ResourceBinding> = resources
            .iter()
            .zip(&resource_association_ids)
            .map(|(resource, association_id)| ResourceBinding {
                resource_id: resource.resource_id.clone(),
                association_id: association_id.to_string(),
                scopes: resource.scopes.clone(),
            })
            .collect();

        let validity_period_ms = ticket.validity_period.num_milliseconds();
        let created_at: DateTime<Utc> = ticket.created_at;

        debug!(
            ticket_id = %ticket_id,
            resources = bindings.len(),
            "Writing permission ticket"
        );

        self.db
            .query(PERSIST_TICKET)
            .bind(("ticket_id", ticket_id.to_string()))
            .bind(("ticket", ticket.ticket.clone()))
            .bind(("created_at", created_at))
            .bind(("validity_period_ms", validity_period_ms))
            .bind(("status", ticket.status.as_str()))
            .bind(("tenant_id", ticket.tenant_id))
            .bind(("resource_owner_name", owner.resource_owner_name.clone()))
            .bind(("client_id", owner.client_id.clone()))
            .bind(("user_domain", owner.user_domain.clone()))
            .bind(("resources", bindings))
            .await?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(PersistedTicket {
            id: ticket_id,
            resource_association_ids,
        })
    }
}

impl<C: Connection> PermissionTicketStore for SurrealPermissionTicketStore<C> {
    async fn persist(
        &self,
        ticket: &PermissionTicket,
        owner: &OwnerContext,
        resources: &[RequestedResource],
    ) -> UmaResult<PersistedTicket> {
        self.write(ticket, owner, resources)
            .await
            .map_err(DbError::into_persistence_failure)
    }
}
