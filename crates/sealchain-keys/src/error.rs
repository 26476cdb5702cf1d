//! Key lifecycle error types.
//!
//! All of these are fatal to the calling operation and surfaced to the
//! operator; none are retried inside the engine.

use thiserror::Error;

/// Errors that can occur during key lifecycle operations.
#[derive(Debug, Error)]
pub enum KeyError {
    /// An Active key already exists; rotation must be explicit.
    #[error("tenant {tenant} already has an active key {fingerprint}")]
    KeyConflict {
        /// Tenant whose activation was rejected.
        tenant: String,
        /// Fingerprint of the key that is already active.
        fingerprint: String,
    },

    /// No Active key exists for the tenant.
    #[error("tenant {tenant} has no active signing key")]
    NoActiveKey {
        /// Tenant whose signing request was rejected.
        tenant: String,
    },

    /// The fingerprint was never issued by this key manager.
    #[error("unknown key fingerprint: {fingerprint}")]
    UnknownKey {
        /// The unrecognized fingerprint.
        fingerprint: String,
    },
}

/// Result type for key lifecycle operations.
pub type KeyResult<T> = Result<T, KeyError>;
