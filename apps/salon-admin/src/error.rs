//! # Admin Error Type
//!
//! What a failed command prints on stderr.
//!
//! ```json
//! {
//!   "code": "VALIDATION_ERROR",
//!   "message": "2 validation error(s): ...",
//!   "violations": [
//!     "full name must contain at least a first and a last name",
//!     "this email is already in use"
//!   ]
//! }
//! ```

use serde::Serialize;
use salon_core::CoreError;
use salon_db::DbError;

use crate::config::ConfigError;

/// Error reported by a salon-admin command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,

    /// One message per broken rule, in order. Empty unless `code` is
    /// `VALIDATION_ERROR`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<String>,
}

/// Error codes for command output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Unknown command or bad arguments
    Usage,

    /// Environment configuration is unusable
    Config,

    /// Referenced record does not exist
    NotFound,

    /// One or more business rules failed
    ValidationError,

    /// Storage failed
    DatabaseError,

    /// Output could not be produced
    Internal,
}

impl AdminError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AdminError {
            code,
            message: message.into(),
            violations: Vec::new(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        AdminError::new(ErrorCode::Usage, message)
    }
}

impl std::fmt::Display for AdminError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for AdminError {}

impl From<DbError> for AdminError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => {
                AdminError::new(ErrorCode::NotFound, format!("{entity} not found: {id}"))
            }
            DbError::Validation(validation) => AdminError {
                code: ErrorCode::ValidationError,
                message: validation.to_string(),
                violations: validation.messages(),
            },
            DbError::UniqueViolation { field, .. } => AdminError::new(
                ErrorCode::ValidationError,
                format!("{field} already exists"),
            ),
            other => {
                tracing::error!(error = %other, "Database operation failed");
                AdminError::new(ErrorCode::DatabaseError, other.to_string())
            }
        }
    }
}

impl From<CoreError> for AdminError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidAmount(raw) => {
                AdminError::usage(format!("invalid amount: '{raw}' (expected e.g. 45,90)"))
            }
            CoreError::Validation(validation) => AdminError::from(DbError::Validation(validation)),
        }
    }
}

impl From<ConfigError> for AdminError {
    fn from(err: ConfigError) -> Self {
        AdminError::new(ErrorCode::Config, err.to_string())
    }
}
