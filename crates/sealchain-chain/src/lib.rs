//! Sealchain Chain - Append and verification engine for tamper-evident
//! audit digest chains.
//!
//! Each tenant owns an independent hash chain: one signed [`DigestRecord`]
//! per ingested event, linked to its predecessor by a domain-separated
//! digest hash. The [`ChainBuilder`] appends records; the [`ChainVerifier`]
//! replays a range, recomputes every hash and signature, and reports
//! anomalies as data rather than errors. A pass with zero anomalies yields
//! a signed [`Certificate`] suitable for external compliance export.
//!
//! Storage is abstracted behind [`DigestStore`] and [`EventSource`];
//! in-memory implementations back tests and single-process use.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use sealchain_chain::{
//!     ChainBuilder, ChainVerifier, MemoryDigestStore, MemoryEventSource, SequenceRange, Verdict,
//! };
//! use sealchain_core::{EventRecord, TenantId};
//! use sealchain_keys::KeyManager;
//! use serde_json::json;
//!
//! let store = Arc::new(MemoryDigestStore::new());
//! let events = Arc::new(MemoryEventSource::new());
//! let keys = Arc::new(KeyManager::new());
//!
//! let tenant = TenantId::new("acme").unwrap();
//! keys.activate_key(&tenant).unwrap();
//!
//! let builder = ChainBuilder::new(store.clone(), keys.clone());
//! for sequence in 0..3 {
//!     let event = EventRecord::new(tenant.clone(), sequence, json!({ "n": sequence }));
//!     events.insert(event.clone());
//!     builder.append(&event).unwrap();
//! }
//!
//! let verifier = ChainVerifier::new(store, events, keys);
//! let report = verifier
//!     .verify(&tenant, SequenceRange::new(0, 2).unwrap())
//!     .unwrap();
//! assert_eq!(report.verdict, Verdict::Valid);
//! assert!(report.certificate.is_some());
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod builder;
mod error;
mod record;
mod report;
mod store;
mod verifier;

pub use builder::ChainBuilder;
pub use error::{ChainError, ChainResult, StorageError};
pub use record::DigestRecord;
pub use report::{
    Anomaly, AnomalyKind, Certificate, RecordOutcome, RecordStatus, Severity, VerificationReport,
    Verdict,
};
pub use store::{DigestStore, EventSource, MemoryDigestStore, MemoryEventSource};
pub use verifier::{ChainVerifier, SequenceRange};
