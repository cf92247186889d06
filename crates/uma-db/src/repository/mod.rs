//! SurrealDB repository implementations.

mod permission_ticket;
mod resource;

pub use permission_ticket::SurrealPermissionTicketStore;
pub use resource::SurrealResourceRegistry;
