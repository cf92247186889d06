//! UMA Server — bootstraps the permission-ticket service.
//!
//! Loads configuration, connects to SurrealDB, applies pending schema
//! migrations and wires the permission service. The HTTP boundary is
//! mounted on top of [`PermissionService`] by the embedding deployment.

mod config;

use thiserror::Error;
use tracing_subscriber::EnvFilter;
use uma_db::repository::{SurrealPermissionTicketStore, SurrealResourceRegistry};
use uma_db::{DbError, DbManager};
use uma_permission::PermissionService;

use crate::config::ServerConfig;

#[derive(Debug, Error)]
enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("database: {0}")]
    Db(#[from] DbError),

    #[error("signal handler: {0}")]
    Signal(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("uma=info")),
        )
        .json()
        .init();

    tracing::info!("Starting UMA server...");

    if let Err(e) = run().await {
        tracing::error!(error = %e, "UMA server failed");
        std::process::exit(1);
    }

    tracing::info!("UMA server stopped.");
}

async fn run() -> Result<(), StartupError> {
    let config = ServerConfig::from_env()?;

    let db = DbManager::connect(&config.db).await?;
    db.migrate().await?;

    tracing::info!(
        default_validity_period_secs = config.permission.default_validity_period_secs,
        "Permission service ready"
    );

    // The HTTP boundary mounts `service`; it is held until shutdown.
    let service = PermissionService::new(
        SurrealResourceRegistry::new(db.client().clone()),
        SurrealPermissionTicketStore::new(db.client().clone()),
        config.permission,
    );

    tokio::signal::ctrl_c().await?;
    drop(service);
    Ok(())
}
