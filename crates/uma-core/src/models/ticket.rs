//! Permission ticket domain model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a ticket.
///
/// Issuance only ever writes [`TicketStatus::Active`]; the remaining
/// states are owned by the redemption flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Active,
    Redeemed,
    Expired,
    Revoked,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Active => "ACTIVE",
            TicketStatus::Redeemed => "REDEEMED",
            TicketStatus::Expired => "EXPIRED",
            TicketStatus::Revoked => "REVOKED",
        }
    }
}

/// An issued permission ticket, before or after persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionTicket {
    /// Opaque ticket value returned to the resource server.
    pub ticket: String,
    pub created_at: DateTime<Utc>,
    pub validity_period: Duration,
    pub status: TicketStatus,
    pub tenant_id: i64,
}

impl PermissionTicket {
    /// `None` when the expiry lies beyond the representable date range.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.created_at.checked_add_signed(self.validity_period)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|at| now >= at)
    }
}

/// Record ids generated while persisting a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTicket {
    pub id: Uuid,
    /// One resource-association id per requested resource, in request order.
    pub resource_association_ids: Vec<Uuid>,
}
