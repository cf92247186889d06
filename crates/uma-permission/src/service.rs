//! Permission service — permission-ticket issuance.

use chrono::{DateTime, Duration, Utc};
use tracing::{error, info, warn};
use uma_core::error::{ErrorClass, UmaError, UmaResult};
use uma_core::models::permission::PermissionRequest;
use uma_core::models::resource::OwnerContext;
use uma_core::repository::{PermissionTicketStore, ResourceRegistry};

use crate::config::PermissionConfig;
use crate::matcher::{ResourceMatcher, ScopeMatcher};
use crate::ticket;

/// Input for the issuance flow.
#[derive(Debug)]
pub struct IssueInput {
    pub request: PermissionRequest,
    /// Registration context the requested resources must belong to.
    pub owner: OwnerContext,
    pub tenant_id: i64,
    /// Ticket lifetime; `None` uses the configured default.
    pub validity_period: Option<Duration>,
}

/// Successful issuance result.
#[derive(Debug)]
pub struct IssueOutput {
    /// Opaque permission ticket for the resource server.
    pub ticket: String,
    pub created_at: DateTime<Utc>,
    /// Ticket lifetime in seconds.
    pub expires_in: u64,
}

/// Issues permission tickets.
///
/// Generic over repository implementations so that the issuance layer
/// has no dependency on the database crate.
pub struct PermissionService<R: ResourceRegistry, S: PermissionTicketStore> {
    registry: R,
    store: S,
    config: PermissionConfig,
}

impl<R: ResourceRegistry, S: PermissionTicketStore> PermissionService<R, S> {
    pub fn new(registry: R, store: S, config: PermissionConfig) -> Self {
        Self {
            registry,
            store,
            config,
        }
    }

    /// Validate the request and, if every resource and scope is
    /// registered, persist and return a new ticket.
    ///
    /// Nothing is written unless validation passes, and the write itself
    /// is all-or-nothing.
    pub async fn issue(&self, input: IssueInput) -> UmaResult<IssueOutput> {
        let result = self.try_issue(&input).await;
        if let Err(err) = &result {
            log_failure(err, &input);
        }
        result
    }

    async fn try_issue(&self, input: &IssueInput) -> UmaResult<IssueOutput> {
        // 1. Resolve the ticket lifetime before touching the store.
        let validity_period = match input.validity_period {
            Some(period) => period,
            None => self.config.default_validity_period().ok_or_else(|| {
                UmaError::InvalidRequest {
                    reason: "configured default validity period is out of range".into(),
                }
            })?,
        };
        if validity_period <= Duration::zero() {
            return Err(UmaError::InvalidRequest {
                reason: "validity period must be positive".into(),
            });
        }
        if Utc::now().checked_add_signed(validity_period).is_none() {
            return Err(UmaError::InvalidRequest {
                reason: "validity period is out of range".into(),
            });
        }

        // 2. Every resource id, then every scope.
        let resources = input.request.resources();
        let matched = ResourceMatcher::new(&self.registry)
            .validate(resources, &input.owner)
            .await?;
        ScopeMatcher::new(&self.registry).validate(&matched).await?;

        // 3. Build and persist the ticket atomically.
        let ticket = ticket::new_ticket(validity_period, input.tenant_id);
        let persisted = self
            .store
            .persist(&ticket, &input.owner, resources)
            .await?;

        info!(
            ticket_id = %persisted.id,
            tenant_id = input.tenant_id,
            client_id = %input.owner.client_id,
            resources = resources.len(),
            scopes = input.request.scope_count(),
            "Issued permission ticket"
        );

        Ok(IssueOutput {
            expires_in: expires_in_secs(validity_period),
            created_at: ticket.created_at,
            ticket: ticket.ticket,
        })
    }
}

/// Whole seconds until expiry, rounded up so a sub-second lifetime is
/// never reported as already expired.
fn expires_in_secs(validity_period: Duration) -> u64 {
    let millis = validity_period.num_milliseconds();
    let secs = millis / 1000 + i64::from(millis % 1000 != 0);
    u64::try_from(secs).unwrap_or(0)
}

fn log_failure(err: &UmaError, input: &IssueInput) {
    match err.class() {
        ErrorClass::Client => warn!(
            client_id = %input.owner.client_id,
            tenant_id = input.tenant_id,
            error = %err,
            "Rejected permission request"
        ),
        ErrorClass::Server => error!(
            client_id = %input.owner.client_id,
            tenant_id = input.tenant_id,
            error = %err,
            "Permission ticket issuance failed"
        ),
    }
}
