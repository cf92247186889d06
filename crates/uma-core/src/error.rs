//! Error types for permission-ticket issuance.
//!
//! [`UmaError`] is the closed set of failures the issuance flow can
//! produce. Client errors carry the offending identifiers so the
//! boundary layer can render them; server errors carry store detail for
//! logging only and are rendered opaquely by [`ErrorResponse`].

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UmaError {
    #[error("Invalid permission request: {reason}")]
    InvalidRequest { reason: String },

    #[error("Permission request failed with bad resource ID: {resource_id}")]
    InvalidResourceId { resource_id: String },

    #[error("Permission request failed with bad resource scope {scope} for resource {resource_id}")]
    InvalidResourceScope { resource_id: String, scope: String },

    #[error("Failed to validate requested resources: {0}")]
    ValidationQueryFailure(String),

    #[error("Failed to persist permission ticket: {0}")]
    PersistenceFailure(String),
}

pub type UmaResult<T> = Result<T, UmaError>;

/// Whether a failure is the caller's fault or the server's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    Client,
    Server,
}

/// Numeric code and client-visible label for an error kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorDescriptor {
    pub code: u32,
    pub label: &'static str,
}

const INVALID_REQUEST: ErrorDescriptor = ErrorDescriptor {
    code: 60001,
    label: "invalid_request",
};
const INVALID_RESOURCE_ID: ErrorDescriptor = ErrorDescriptor {
    code: 60002,
    label: "invalid_resource_id",
};
const INVALID_SCOPE: ErrorDescriptor = ErrorDescriptor {
    code: 60003,
    label: "invalid_scope",
};
const VALIDATION_QUERY_FAILURE: ErrorDescriptor = ErrorDescriptor {
    code: 65001,
    label: "server_error",
};
const PERSISTENCE_FAILURE: ErrorDescriptor = ErrorDescriptor {
    code: 65002,
    label: "server_error",
};

impl UmaError {
    pub fn class(&self) -> ErrorClass {
        match self {
            UmaError::InvalidRequest { .. }
            | UmaError::InvalidResourceId { .. }
            | UmaError::InvalidResourceScope { .. } => ErrorClass::Client,
            UmaError::ValidationQueryFailure(_) | UmaError::PersistenceFailure(_) => {
                ErrorClass::Server
            }
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.class() == ErrorClass::Client
    }

    pub fn descriptor(&self) -> ErrorDescriptor {
        match self {
            UmaError::InvalidRequest { .. } => INVALID_REQUEST,
            UmaError::InvalidResourceId { .. } => INVALID_RESOURCE_ID,
            UmaError::InvalidResourceScope { .. } => INVALID_SCOPE,
            UmaError::ValidationQueryFailure(_) => VALIDATION_QUERY_FAILURE,
            UmaError::PersistenceFailure(_) => PERSISTENCE_FAILURE,
        }
    }
}

/// Boundary-facing rendering of an [`UmaError`].
///
/// Server failures get a fixed description so that store internals never
/// reach the caller. The HTTP status is left to the boundary layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: &'static str,
    pub error_description: String,
    pub class: ErrorClass,
}

impl From<&UmaError> for ErrorResponse {
    fn from(err: &UmaError) -> Self {
        let ErrorDescriptor { code, label } = err.descriptor();
        let class = err.class();
        let error_description = match class {
            ErrorClass::Client => err.to_string(),
            ErrorClass::Server => "Internal server error".to_string(),
        };
        Self {
            code,
            error: label,
            error_description,
            class,
        }
    }
}
