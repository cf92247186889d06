//! Permission request model.
//!
//! A [`PermissionRequest`] is the input to ticket issuance. It is never
//! persisted directly.

use serde::{Deserialize, Serialize};

use crate::error::{UmaError, UmaResult};

/// One requested resource with the scopes asked for on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedResource {
    pub resource_id: String,
    pub scopes: Vec<String>,
}

impl RequestedResource {
    pub fn new<I, S>(resource_id: impl Into<String>, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            resource_id: resource_id.into(),
            scopes: scopes.into_iter().map(Into::into).collect(),
        }
    }
}

/// An ordered, validated list of requested resources.
///
/// Guarantees at least one resource, at least one scope per resource and
/// no blank identifiers. Repeated scope names inside one resource are
/// collapsed, keeping the first occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionRequest {
    resources: Vec<RequestedResource>,
}

impl PermissionRequest {
    pub fn new(resources: Vec<RequestedResource>) -> UmaResult<Self> {
        if resources.is_empty() {
            return Err(invalid("at least one resource must be requested"));
        }

        let mut normalized = Vec::with_capacity(resources.len());
        for resource in resources {
            if resource.resource_id.trim().is_empty() {
                return Err(invalid("resource id must not be blank"));
            }
            if resource.scopes.is_empty() {
                return Err(invalid(format!(
                    "no scopes requested for resource {}",
                    resource.resource_id
                )));
            }

            let mut scopes: Vec<String> = Vec::with_capacity(resource.scopes.len());
            for scope in resource.scopes {
                if scope.trim().is_empty() {
                    return Err(invalid(format!(
                        "blank scope requested for resource {}",
                        resource.resource_id
                    )));
                }
                if !scopes.contains(&scope) {
                    scopes.push(scope);
                }
            }

            normalized.push(RequestedResource {
                resource_id: resource.resource_id,
                scopes,
            });
        }

        Ok(Self {
            resources: normalized,
        })
    }

    pub fn resources(&self) -> &[RequestedResource] {
        &self.resources
    }

    /// Total number of (resource, scope) pairs in the request.
    pub fn scope_count(&self) -> usize {
        self.resources.iter().map(|r| r.scopes.len()).sum()
    }
}

fn invalid(reason: impl Into<String>) -> UmaError {
    UmaError::InvalidRequest {
        reason: reason.into(),
    }
}
