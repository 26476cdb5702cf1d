//! Core error types.

use thiserror::Error;

/// Errors that can occur constructing core types.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Tenant identifier failed validation.
    #[error("invalid tenant id: {reason}")]
    InvalidTenantId {
        /// Why the identifier was rejected.
        reason: String,
    },
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
