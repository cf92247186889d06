//! UMA Permission — validates permission requests against the resource
//! registry and issues permission tickets.

pub mod config;
pub mod matcher;
pub mod service;
pub mod ticket;

#[cfg(test)]
mod test_support;

pub use config::PermissionConfig;
pub use matcher::{MatchedResource, ResourceMatcher, ScopeMatcher};
pub use service::{IssueInput, IssueOutput, PermissionService};
