//! In-memory registry and store fakes for unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Utc;
use uma_core::error::{UmaError, UmaResult};
use uma_core::models::permission::RequestedResource;
use uma_core::models::resource::{OwnerContext, RegisteredResource};
use uma_core::models::scope::RegisteredScope;
use uma_core::models::ticket::{PermissionTicket, PersistedTicket};
use uma_core::repository::{PermissionTicketStore, ResourceRegistry};
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryRegistry {
    resources: Vec<RegisteredResource>,
    scopes: Vec<RegisteredScope>,
    fail_with: Option<String>,
    pub resource_lookups: AtomicUsize,
    pub scope_lookups: AtomicUsize,
}

impl InMemoryRegistry {
    pub fn with_resource(
        mut self,
        resource_id: &str,
        owner: &OwnerContext,
        scopes: &[&str],
    ) -> Self {
        let resource = RegisteredResource {
            id: Uuid::new_v4(),
            resource_id: resource_id.into(),
            resource_owner_name: owner.resource_owner_name.clone(),
            client_id: owner.client_id.clone(),
            user_domain: owner.user_domain.clone(),
            created_at: Utc::now(),
        };
        self.scopes.extend(scopes.iter().map(|name| RegisteredScope {
            id: Uuid::new_v4(),
            resource_id: resource.id,
            name: (*name).into(),
        }));
        self.resources.push(resource);
        self
    }

    pub fn failing(detail: &str) -> Self {
        Self {
            fail_with: Some(detail.into()),
            ..Default::default()
        }
    }

    fn check_available(&self) -> UmaResult<()> {
        match &self.fail_with {
            Some(detail) => Err(UmaError::ValidationQueryFailure(detail.clone())),
            None => Ok(()),
        }
    }
}

impl ResourceRegistry for InMemoryRegistry {
    async fn find_resource(
        &self,
        resource_id: &str,
        owner: &OwnerContext,
    ) -> UmaResult<Option<RegisteredResource>> {
        self.resource_lookups.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        Ok(self
            .resources
            .iter()
            .find(|r| r.resource_id == resource_id && owner.owns(r))
            .cloned())
    }

    async fn find_scope(
        &self,
        resource: &RegisteredResource,
        scope_name: &str,
    ) -> UmaResult<Option<RegisteredScope>> {
        self.scope_lookups.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        Ok(self
            .scopes
            .iter()
            .find(|s| s.resource_id == resource.id && s.name == scope_name)
            .cloned())
    }
}

/// Records every persisted ticket; optionally fails every write.
#[derive(Default)]
pub struct RecordingStore {
    pub persisted: Mutex<Vec<(PermissionTicket, Vec<RequestedResource>)>>,
    fail_with: Option<String>,
}

impl RecordingStore {
    pub fn failing(detail: &str) -> Self {
        Self {
            fail_with: Some(detail.into()),
            ..Default::default()
        }
    }

    pub fn persisted_count(&self) -> usize {
        self.persisted.lock().map(|p| p.len()).unwrap_or(0)
    }
}

impl PermissionTicketStore for RecordingStore {
    async fn persist(
        &self,
        ticket: &PermissionTicket,
        _owner: &OwnerContext,
        resources: &[RequestedResource],
    ) -> UmaResult<PersistedTicket> {
        if let Some(detail) = &self.fail_with {
            return Err(UmaError::PersistenceFailure(detail.clone()));
        }
        self.persisted
            .lock()
            .expect("store mutex poisoned")
            .push((ticket.clone(), resources.to_vec()));
        Ok(PersistedTicket {
            id: Uuid::new_v4(),
            resource_association_ids: resources.iter().map(|_| Uuid::new_v4()).collect(),
        })
    }
}
