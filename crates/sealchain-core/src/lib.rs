//! Sealchain Core - Foundation types for the audit digest chain engine.
//!
//! This crate provides:
//! - Tenant identity and tier classification
//! - Event records as consumed by the chain builder
//! - Timestamps and event identifiers
//!
//! It deliberately contains no cryptography and no storage; those live in
//! `sealchain-crypto` and `sealchain-chain` respectively.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod event;
mod types;

pub use error::{CoreError, CoreResult};
pub use event::{EventId, EventRecord};
pub use types::{TenantId, TenantTier, Timestamp};
