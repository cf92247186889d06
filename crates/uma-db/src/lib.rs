//! UMA Database — SurrealDB connection management, schema migrations
//! and the repository implementations used by ticket issuance.
//!
//! This crate provides:
//! - Connection management ([`DbManager`], [`DbConfig`])
//! - Schema initialization and migrations ([`run_migrations`])
//! - Error types ([`DbError`])
//! - [`repository::SurrealResourceRegistry`] and
//!   [`repository::SurrealPermissionTicketStore`]

mod connection;
mod error;
pub mod repository;
mod schema;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use schema::{run_migrations, schema_v1};
