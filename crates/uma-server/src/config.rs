//! Server configuration loaded from the environment.

use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use uma_db::DbConfig;
use uma_permission::PermissionConfig;

/// Top-level configuration for the UMA server.
///
/// Every field can be set through `UMA_`-prefixed variables; nested keys
/// use a double underscore, e.g. `UMA_DB__URL` or
/// `UMA_PERMISSION__DEFAULT_VALIDITY_PERIOD_SECS`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub db: DbConfig,
    pub permission: PermissionConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("UMA")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Self::from_config(config)
    }

    fn from_config(config: Config) -> Result<Self, ConfigError> {
        let server: Self = config.try_deserialize()?;
        server.validate()?;
        Ok(server)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let secs = self.permission.default_validity_period_secs;
        if secs == 0 || self.permission.default_validity_period().is_none() {
            return Err(ConfigError::Message(format!(
                "permission.default_validity_period_secs must be between 1 and {}",
                i64::MAX / 1000
            )));
        }
        Ok(())
    }
}
