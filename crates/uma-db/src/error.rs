//! Database-specific error types and conversions.

use uma_core::error::UmaError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Malformed record: {0}")]
    Malformed(String),
}

impl DbError {
    /// Failure while reading the registry during request validation.
    pub fn into_validation_failure(self) -> UmaError {
        UmaError::ValidationQueryFailure(self.to_string())
    }

    /// Failure anywhere inside the ticket write transaction.
    pub fn into_persistence_failure(self) -> UmaError {
        UmaError::PersistenceFailure(self.to_string())
    }
}
