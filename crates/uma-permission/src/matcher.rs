//! Validation of a permission request against the resource registry.
//!
//! Every resource id is checked before any scope is, and each matcher
//! stops at the first miss. When a request contains several bad inputs
//! the reported error is therefore deterministic, and an unknown resource
//! id always wins over an unknown scope.

use uma_core::error::{UmaError, UmaResult};
use uma_core::models::permission::RequestedResource;
use uma_core::models::resource::{OwnerContext, RegisteredResource};
use uma_core::repository::ResourceRegistry;

/// A requested resource paired with the registry entry it matched.
#[derive(Debug, Clone)]
pub struct MatchedResource<'a> {
    pub requested: &'a RequestedResource,
    pub registered: RegisteredResource,
}

pub struct ResourceMatcher<'r, R: ResourceRegistry> {
    registry: &'r R,
}

impl<'r, R: ResourceRegistry> ResourceMatcher<'r, R> {
    pub fn new(registry: &'r R) -> Self {
        Self { registry }
    }

    /// Resolve every requested resource id within `owner`, in request
    /// order. Fails with [`UmaError::InvalidResourceId`] on the first id
    /// that is not registered there.
    pub async fn validate<'a>(
        &self,
        resources: &'a [RequestedResource],
        owner: &OwnerContext,
    ) -> UmaResult<Vec<MatchedResource<'a>>> {
        let mut matched = Vec::with_capacity(resources.len());
        for requested in resources {
            let registered = self
                .registry
                .find_resource(&requested.resource_id, owner)
                .await?
                .ok_or_else(|| UmaError::InvalidResourceId {
                    resource_id: requested.resource_id.clone(),
                })?;
            matched.push(MatchedResource {
                requested,
                registered,
            });
        }
        Ok(matched)
    }
}

pub struct ScopeMatcher<'r, R: ResourceRegistry> {
    registry: &'r R,
}

impl<'r, R: ResourceRegistry> ScopeMatcher<'r, R> {
    pub fn new(registry: &'r R) -> Self {
        Self { registry }
    }

    /// Check every requested scope against the scopes registered on its
    /// matched resource. Fails with [`UmaError::InvalidResourceScope`] on
    /// the first scope that is missing.
    pub async fn validate(&self, matched: &[MatchedResource<'_>]) -> UmaResult<()> {
        for resource in matched {
            for scope in &resource.requested.scopes {
                let found = self
                    .registry
                    .find_scope(&resource.registered, scope)
                    .await?;
                if found.is_none() {
                    return Err(UmaError::InvalidResourceScope {
                        resource_id: resource.requested.resource_id.clone(),
                        scope: scope.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
