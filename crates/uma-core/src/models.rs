//! Domain models for permission-ticket issuance.

pub mod permission;
pub mod resource;
pub mod scope;
pub mod ticket;
