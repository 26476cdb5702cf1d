//! Chain engine error types.
//!
//! Hard failures only. Verification-time findings (hash mismatches, gaps,
//! invalid signatures) are not errors: they are first-class data in the
//! verification report, because "the chain is broken" is an expected,
//! reportable outcome.

use thiserror::Error;

use sealchain_crypto::CryptoError;
use sealchain_keys::KeyError;

/// Failures reported by a digest store or event source backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A record already exists at this position; append-only stores never
    /// overwrite.
    #[error("record already exists for tenant {tenant} at sequence {sequence}")]
    Conflict {
        /// Tenant of the conflicting write.
        tenant: String,
        /// Sequence of the conflicting write.
        sequence: u64,
    },

    /// Transient backend failure; the caller may retry the same operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The backend returned data that fails integrity expectations.
    #[error("storage corrupt: {0}")]
    Corrupt(String),
}

impl StorageError {
    /// Whether the caller may retry the failed operation as-is.
    ///
    /// Retrying an append is safe because `append` is idempotent for an
    /// already-committed (tenant, sequence, payload).
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Errors surfaced by the chain builder and verifier.
#[derive(Debug, Error)]
pub enum ChainError {
    /// The event's sequence does not extend the tenant's tail. Upstream
    /// ordering bug; not retryable.
    #[error("sequence violation for tenant {tenant}: expected {expected}, got {actual}")]
    SequenceViolation {
        /// Tenant whose append was rejected.
        tenant: String,
        /// The only sequence the chain would accept next.
        expected: u64,
        /// The sequence the event carried.
        actual: u64,
    },

    /// A concurrent writer advanced the tail first; the caller may retry.
    #[error("tail mismatch for tenant {tenant} at sequence {sequence}: concurrent append won")]
    TailMismatch {
        /// Tenant of the lost race.
        tenant: String,
        /// Sequence both writers contended for.
        sequence: u64,
    },

    /// The tenant's sequence space is exhausted.
    #[error("sequence overflow for tenant {tenant}")]
    SequenceOverflow {
        /// Tenant whose chain reached the maximum sequence.
        tenant: String,
    },

    /// The event source could not produce the event being appended.
    #[error("missing event for tenant {tenant} at sequence {sequence}")]
    MissingEvent {
        /// Tenant of the missing event.
        tenant: String,
        /// Sequence of the missing event.
        sequence: u64,
    },

    /// A verification range with `start > end`.
    #[error("invalid sequence range: {start}..={end}")]
    InvalidRange {
        /// Requested start.
        start: u64,
        /// Requested end.
        end: u64,
    },

    /// Payload serialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Backend failure.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Key lifecycle failure (no active key, unknown fingerprint, ...).
    #[error(transparent)]
    Key(#[from] KeyError),

    /// Cryptographic failure.
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

/// Result type for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;
