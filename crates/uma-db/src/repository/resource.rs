//! SurrealDB implementation of [`ResourceRegistry`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uma_core::error::UmaResult;
use uma_core::models::resource::{OwnerContext, RegisteredResource};
use uma_core::models::scope::RegisteredScope;
use uma_core::repository::ResourceRegistry;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ResourceRowWithId {
    record_id: String,
    resource_id: String,
    resource_owner_name: String,
    client_id: String,
    user_domain: String,
    created_at: DateTime<Utc>,
}

impl ResourceRowWithId {
    fn try_into_resource(self) -> Result<RegisteredResource, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Malformed(format!("invalid resource UUID: {e}")))?;
        Ok(RegisteredResource {
            id,
            resource_id: self.resource_id,
            resource_owner_name: self.resource_owner_name,
            client_id: self.client_id,
            user_domain: self.user_domain,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct ScopeRowWithId {
    record_id: String,
    resource_id: String,
    scope_name: String,
}

impl ScopeRowWithId {
    fn try_into_scope(self) -> Result<RegisteredScope, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Malformed(format!("invalid scope UUID: {e}")))?;
        let resource_id = Uuid::parse_str(&self.resource_id)
            .map_err(|e| DbError::Malformed(format!("invalid resource UUID: {e}")))?;
        Ok(RegisteredScope {
            id,
            resource_id,
            name: self.scope_name,
        })
    }
}

/// Read-only view of the resource registry tables.
#[derive(Clone)]
pub struct SurrealResourceRegistry<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealResourceRegistry<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn query_resource(
        &self,
        resource_id: &str,
        owner: &OwnerContext,
    ) -> Result<Option<RegisteredResource>, DbError> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM resource \
                 WHERE resource_id = $resource_id \
                 AND resource_owner_name = $resource_owner_name \
                 AND client_id = $client_id \
                 AND user_domain = $user_domain \
                 LIMIT 1",
            )
            .bind(("resource_id", resource_id.to_string()))
            .bind(("resource_owner_name", owner.resource_owner_name.clone()))
            .bind(("client_id", owner.client_id.clone()))
            .bind(("user_domain", owner.user_domain.clone()))
            .await?;

        let rows: Vec<ResourceRowWithId> = result.take(0)?;
        rows.into_iter()
            .next()
            .map(ResourceRowWithId::try_into_resource)
            .transpose()
    }

    async fn query_scope(
        &self,
        resource: &RegisteredResource,
        scope_name: &str,
    ) -> Result<Option<RegisteredScope>, DbError> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, resource_id, scope_name \
                 FROM resource_scope \
                 WHERE resource_id = $resource_id AND scope_name = $scope_name \
                 LIMIT 1",
            )
            .bind(("resource_id", resource.id.to_string()))
            .bind(("scope_name", scope_name.to_string()))
            .await?;

        let rows: Vec<ScopeRowWithId> = result.take(0)?;
        rows.into_iter()
            .next()
            .map(ScopeRowWithId::try_into_scope)
            .transpose()
    }
}

impl<C: Connection> ResourceRegistry for SurrealResourceRegistry<C> {
    async fn find_resource(
        &self,
        resource_id: &str,
        owner: &OwnerContext,
    ) -> UmaResult<Option<RegisteredResource>> {
        self.query_resource(resource_id, owner)
            .await
            .map_err(DbError::into_validation_failure)
    }

    async fn find_scope(
        &self,
        resource: &RegisteredResource,
        scope_name: &str,
    ) -> UmaResult<Option<RegisteredScope>> {
        self.query_scope(resource, scope_name)
            .await
            .map_err(DbError::into_validation_failure)
    }
}
