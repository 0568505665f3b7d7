//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// Domain modules define their own error enums; this type is the
/// service-boundary envelope they map into.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Access denied (e.g., segregation-of-duties rejection).
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Input validation error: malformed request, never retried.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Business rule violation, surfaced with a machine-readable code.
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// Accounting invariant failure (unbalanced journal, balance sheet
    /// equation broken). Reported with full numeric detail, never corrected.
    #[error("Invariant violation: {0}")]
    Invariant(String),

    /// Conflict (e.g., a second running consolidation for the same period).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Persistence layer unavailable or failed. The caller may retry;
    /// the core never retries a posting itself.
    #[error("Storage error: {0}")]
    Storage(String),

    /// External service error.
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::BusinessRule(_) | Self::Invariant(_) => 422,
            Self::Conflict(_) => 409,
            Self::Storage(_) | Self::ExternalService(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
            Self::Invariant(_) => "INVARIANT_VIOLATION",
            Self::Conflict(_) => "CONFLICT",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true if the caller may safely retry the operation.
    ///
    /// Only environmental errors are retryable; a validation or business
    /// failure will fail the same way again, and retrying a posting that
    /// may have partially committed risks double-booking.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::ExternalService(_))
    }
}
