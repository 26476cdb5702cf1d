//! Prelude module - commonly used types for convenient import.
//!
//! Use `use sealchain_core::prelude::*;` to import all essential types.

// Errors
pub use crate::{CoreError, CoreResult};

// Identity and time
pub use crate::{TenantId, TenantTier, Timestamp};

// Events
pub use crate::{EventId, EventRecord};
