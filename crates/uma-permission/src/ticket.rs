//! Ticket factory: opaque ticket values and fresh ticket records.
//!
//! Pure apart from the entropy source; nothing here touches the store.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use uma_core::models::ticket::{PermissionTicket, TicketStatus};

/// Generate a cryptographically random opaque ticket value
/// (32 bytes → base64url-encoded, no padding).
pub fn generate_ticket_value() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rand::Rng::random(&mut rng);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Build a new active ticket created now.
pub fn new_ticket(validity_period: Duration, tenant_id: i64) -> PermissionTicket {
    PermissionTicket {
        ticket: generate_ticket_value(),
        created_at: Utc::now(),
        validity_period,
        status: TicketStatus::Active,
        tenant_id,
    }
}
