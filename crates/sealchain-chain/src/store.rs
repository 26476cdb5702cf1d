//! Storage and event-source interfaces, with in-memory implementations.
//!
//! The engine is agnostic to the concrete backend; production deployments
//! bring their own implementations over whatever storage tier they run.
//! The in-memory implementations back tests and single-process use.

use dashmap::DashMap;
use std::collections::BTreeMap;

use sealchain_core::{EventRecord, TenantId};
use serde_json::Value;

use crate::error::StorageError;
use crate::record::DigestRecord;

/// Append-only persistence contract for digest records.
///
/// `put` must be atomic: a record is either fully durable or not visible at
/// all. No update or delete operations exist; legal deletion is an external
/// policy process outside this engine.
pub trait DigestStore: Send + Sync {
    /// The most recently appended record for a tenant, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend fails.
    fn get_tail(&self, tenant: &TenantId) -> Result<Option<DigestRecord>, StorageError>;

    /// The record at a specific sequence position, if present.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend fails.
    fn get(&self, tenant: &TenantId, sequence: u64) -> Result<Option<DigestRecord>, StorageError>;

    /// Append a record.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Conflict`] if a record already exists at
    /// this (tenant, sequence); append-only stores never overwrite.
    fn put(&self, record: &DigestRecord) -> Result<(), StorageError>;
}

/// Read-only access to the already-validated event stream.
pub trait EventSource: Send + Sync {
    /// The event at a sequence position, if present.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend fails.
    fn get_event(
        &self,
        tenant: &TenantId,
        sequence: u64,
    ) -> Result<Option<EventRecord>, StorageError>;

    /// The highest ingested sequence for a tenant, if any events exist.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend fails.
    fn get_latest_sequence(&self, tenant: &TenantId) -> Result<Option<u64>, StorageError>;
}

/// In-memory digest store.
#[derive(Default)]
pub struct MemoryDigestStore {
    chains: DashMap<TenantId, BTreeMap<u64, DigestRecord>>,
}

impl MemoryDigestStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl DigestStore for MemoryDigestStore {
    fn get_tail(&self, tenant: &TenantId) -> Result<Option<DigestRecord>, StorageError> {
        Ok(self
            .chains
            .get(tenant)
            .and_then(|chain| chain.last_key_value().map(|(_, r)| r.clone())))
    }

    fn get(&self, tenant: &TenantId, sequence: u64) -> Result<Option<DigestRecord>, StorageError> {
        Ok(self
            .chains
            .get(tenant)
            .and_then(|chain| chain.get(&sequence).cloned()))
    }

    fn put(&self, record: &DigestRecord) -> Result<(), StorageError> {
        let mut chain = self.chains.entry(record.tenant.clone()).or_default();
        if chain.contains_key(&record.sequence) {
            return Err(StorageError::Conflict {
                tenant: record.tenant.to_string(),
                sequence: record.sequence,
            });
        }
        chain.insert(record.sequence, record.clone());
        Ok(())
    }
}

impl std::fmt::Debug for MemoryDigestStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryDigestStore")
            .field("tenants", &self.chains.len())
            .finish_non_exhaustive()
    }
}

/// In-memory event source.
///
/// Doubles as the test harness for tamper scenarios: mutating a payload
/// after its digest record exists simulates exactly the upstream tampering
/// the verifier must detect.
#[derive(Default)]
pub struct MemoryEventSource {
    events: DashMap<TenantId, BTreeMap<u64, EventRecord>>,
}

impl MemoryEventSource {
    /// Create an empty event source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an event, replacing any previous event at its sequence.
    pub fn insert(&self, event: EventRecord) {
        self.events
            .entry(event.tenant.clone())
            .or_default()
            .insert(event.sequence, event);
    }

    /// Overwrite the payload of a stored event in place.
    ///
    /// Returns `false` if no event exists at that position. This models
    /// after-the-fact tampering with the upstream event store.
    pub fn tamper_payload(&self, tenant: &TenantId, sequence: u64, payload: Value) -> bool {
        self.events
            .get_mut(tenant)
            .and_then(|mut chain| {
                chain.get_mut(&sequence).map(|event| {
                    event.payload = payload;
                })
            })
            .is_some()
    }
}

impl EventSource for MemoryEventSource {
    fn get_event(
        &self,
        tenant: &TenantId,
        sequence: u64,
    ) -> Result<Option<EventRecord>, StorageError> {
        Ok(self
            .events
            .get(tenant)
            .and_then(|chain| chain.get(&sequence).cloned()))
    }

    fn get_latest_sequence(&self, tenant: &TenantId) -> Result<Option<u64>, StorageError> {
        Ok(self
            .events
            .get(tenant)
            .and_then(|chain| chain.last_key_value().map(|(seq, _)| *seq)))
    }
}

impl std::fmt::Debug for MemoryEventSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryEventSource")
            .field("tenants", &self.events.len())
            .finish_non_exhaustive()
    }
}
