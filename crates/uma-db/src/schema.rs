//! Schema definitions and migration runner for SurrealDB.
//!
//! Tables are SCHEMAFULL. Record ids are UUID strings and cross-table
//! references are stored as plain UUID strings, matching how the
//! resource registration flow writes the registry tables.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::{debug, info};

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct AppliedVersion {
    version: u32,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "permission_ticket_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — registry and permission-ticket tables
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Registered resources (written by the registration flow)
-- =======================================================================
DEFINE TABLE resource SCHEMAFULL;
DEFINE FIELD resource_id ON TABLE resource TYPE string;
DEFINE FIELD resource_owner_name ON TABLE resource TYPE string;
DEFINE FIELD client_id ON TABLE resource TYPE string;
DEFINE FIELD user_domain ON TABLE resource TYPE string;
DEFINE FIELD created_at ON TABLE resource TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_resource_owner_key ON TABLE resource \
    COLUMNS resource_id, resource_owner_name, client_id, user_domain UNIQUE;

-- =======================================================================
-- Registered scopes (per resource)
-- =======================================================================
DEFINE TABLE resource_scope SCHEMAFULL;
DEFINE FIELD resource_id ON TABLE resource_scope TYPE string;
DEFINE FIELD scope_name ON TABLE resource_scope TYPE string;
DEFINE FIELD created_at ON TABLE resource_scope TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_resource_scope_name ON TABLE resource_scope \
    COLUMNS resource_id, scope_name UNIQUE;

-- =======================================================================
-- Permission tickets (tenant scope)
-- =======================================================================
DEFINE TABLE permission_ticket SCHEMAFULL;
DEFINE FIELD ticket ON TABLE permission_ticket TYPE string;
DEFINE FIELD created_at ON TABLE permission_ticket TYPE datetime;
DEFINE FIELD validity_period_ms ON TABLE permission_ticket TYPE int \
    ASSERT $value > 0;
DEFINE FIELD status ON TABLE permission_ticket TYPE string \
    ASSERT $value IN ['ACTIVE', 'REDEEMED', 'EXPIRED', 'REVOKED'];
DEFINE FIELD tenant_id ON TABLE permission_ticket TYPE int;
DEFINE INDEX idx_permission_ticket_value ON TABLE permission_ticket \
    COLUMNS ticket UNIQUE;

-- =======================================================================
-- Ticket -> resource associations
-- =======================================================================
DEFINE TABLE pt_resource SCHEMAFULL;
DEFINE FIELD ticket_id ON TABLE pt_resource TYPE string;
DEFINE FIELD resource_id ON TABLE pt_resource TYPE string;
DEFINE INDEX idx_pt_resource_ticket ON TABLE pt_resource \
    COLUMNS ticket_id;

-- =======================================================================
-- Ticket resource -> scope associations
-- =======================================================================
DEFINE TABLE pt_resource_scope SCHEMAFULL;
DEFINE FIELD pt_resource_id ON TABLE pt_resource_scope TYPE string;
DEFINE FIELD scope_id ON TABLE pt_resource_scope TYPE string;
DEFINE INDEX idx_pt_resource_scope ON TABLE pt_resource_scope \
    COLUMNS pt_resource_id, scope_id UNIQUE;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Migrations at or below the highest recorded version are skipped, so
/// calling this on every start-up is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let current = current_version(db).await?;
    debug!(current_version = current, "Schema version");

    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        apply(db, migration).await?;
    }

    Ok(())
}

async fn current_version<C: Connection>(db: &Surreal<C>) -> Result<u32, DbError> {
    let mut result = db
        .query("SELECT version FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let rows: Vec<AppliedVersion> = result.take(0)?;
    Ok(rows.first().map(|r| r.version).unwrap_or(0))
}

async fn apply<C: Connection>(db: &Surreal<C>, migration: &Migration) -> Result<(), DbError> {
    info!(
        version = migration.version,
        name = migration.name,
        "Applying migration"
    );

    db.query(migration.sql).await?.check().map_err(|e| {
        DbError::Migration(format!(
            "v{} '{}' failed: {}",
            migration.version, migration.name, e,
        ))
    })?;

    db.query("CREATE _migration SET version = $version, name = $name")
        .bind(("version", migration.version))
        .bind(("name", migration.name))
        .await?
        .check()
        .map_err(|e| {
            DbError::Migration(format!(
                "could not record v{}: {}",
                migration.version, e,
            ))
        })?;

    info!(version = migration.version, "Migration applied");
    Ok(())
}

/// Returns the raw schema DDL for version 1.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}
