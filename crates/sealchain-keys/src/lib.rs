//! Sealchain Keys - Signing key lifecycle for the audit digest chain.
//!
//! This crate provides the key manager: the sole custodian of per-tenant
//! signing key material. It owns generation, activation, rotation,
//! revocation, and public-key publication. The chain builder and verifier
//! only ever receive sign/verify capabilities, never raw key bytes.
//!
//! # Lifecycle model
//!
//! - At most one `Active` key per tenant at any instant.
//! - Rotation marks the old key `Expired`; expired keys remain verifiable
//!   forever (their public keys are never forgotten).
//! - Revocation is reserved for compromise. Digests signed by a revoked key
//!   stay in the chain; the verifier flags them as an informational anomaly.
//!
//! # Example
//!
//! ```
//! use sealchain_core::TenantId;
//! use sealchain_keys::{KeyManager, RotationReason};
//!
//! let tenant = TenantId::new("acme").unwrap();
//! let manager = KeyManager::new();
//!
//! let first = manager.activate_key(&tenant).unwrap();
//! let (signature, fingerprint) = manager.sign(&tenant, b"digest bytes").unwrap();
//! assert_eq!(fingerprint, first.fingerprint);
//!
//! // Rotation keeps the old key verifiable.
//! let second = manager.rotate_key(&tenant, RotationReason::Scheduled).unwrap();
//! assert_ne!(first.fingerprint, second.fingerprint);
//! let old_key = manager.get_public_key(&first.fingerprint).unwrap();
//! assert!(old_key.verify(b"digest bytes", &signature).is_ok());
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod handle;
mod manager;
mod policy;

pub use error::{KeyError, KeyResult};
pub use handle::{KeyHandle, KeyStatus, RevocationReason, RotationReason, SignatureAlgorithm};
pub use manager::KeyManager;
pub use policy::RotationPolicy;
