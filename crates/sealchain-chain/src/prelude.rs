//! Prelude module - commonly used types for convenient import.
//!
//! Use `use sealchain_chain::prelude::*;` to import all essential types.

// Errors
pub use crate::{ChainError, ChainResult, StorageError};

// Records and storage
pub use crate::{DigestRecord, DigestStore, EventSource, MemoryDigestStore, MemoryEventSource};

// Engine
pub use crate::{ChainBuilder, ChainVerifier, SequenceRange};

// Reporting
pub use crate::{
    Anomaly, AnomalyKind, Certificate, RecordOutcome, RecordStatus, Severity, VerificationReport,
    Verdict,
};
