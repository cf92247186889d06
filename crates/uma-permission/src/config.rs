//! Issuance configuration.

use chrono::Duration;
use serde::Deserialize;

/// Configuration for the permission service.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PermissionConfig {
    /// Ticket lifetime in seconds when the caller does not ask for one
    /// (default: 300 = 5 minutes).
    pub default_validity_period_secs: u64,
}

impl Default for PermissionConfig {
    fn default() -> Self {
        Self {
            default_validity_period_secs: 300,
        }
    }
}

impl PermissionConfig {
    /// The default ticket lifetime, or `None` when the configured number
    /// of seconds does not fit in a [`Duration`].
    pub fn default_validity_period(&self) -> Option<Duration> {
        i64::try_from(self.default_validity_period_secs)
            .ok()
            .and_then(Duration::try_seconds)
    }
}
