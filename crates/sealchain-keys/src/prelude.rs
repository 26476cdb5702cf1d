//! Prelude module - commonly used types for convenient import.
//!
//! Use `use sealchain_keys::prelude::*;` to import all essential types.

// Errors
pub use crate::{KeyError, KeyResult};

// Lifecycle metadata
pub use crate::{KeyHandle, KeyStatus, RevocationReason, RotationReason, SignatureAlgorithm};

// Manager and policy
pub use crate::{KeyManager, RotationPolicy};
