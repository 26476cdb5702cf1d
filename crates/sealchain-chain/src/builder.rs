//! The digest chain builder: one signed, linked record per event.

use dashmap::DashMap;
use std::sync::{Arc, Mutex, PoisonError};

use sealchain_core::{EventRecord, TenantId};
use sealchain_crypto::DigestHash;
use sealchain_keys::KeyManager;

use crate::error::{ChainError, ChainResult, StorageError};
use crate::record::DigestRecord;
use crate::store::{DigestStore, EventSource};

/// Produces one [`DigestRecord`] per event, maintaining the hash linkage.
///
/// Appends are serialized per tenant through an internal lock arena: the
/// tail read and the record write happen inside one exclusive section, so
/// two concurrent appends can never both extend the same tail (a fork).
/// Different tenants share no mutable state and append fully in parallel.
pub struct ChainBuilder {
    store: Arc<dyn DigestStore>,
    keys: Arc<KeyManager>,
    append_guards: DashMap<TenantId, Arc<Mutex<()>>>,
}

impl ChainBuilder {
    /// Create a builder over a digest store and key manager.
    #[must_use]
    pub fn new(store: Arc<dyn DigestStore>, keys: Arc<KeyManager>) -> Self {
        Self {
            store,
            keys,
            append_guards: DashMap::new(),
        }
    }

    /// Append one event to its tenant's chain.
    ///
    /// The algorithm:
    /// 1. compute the event's content hash,
    /// 2. read the tenant's tail (genesis for an empty chain),
    /// 3. require `event.sequence` to extend the tail exactly,
    /// 4. compute the linkage hash,
    /// 5. sign it with the tenant's Active key,
    /// 6. persist atomically via the append-only store,
    /// 7. return the durable record.
    ///
    /// Idempotent: re-appending an event whose record is already committed
    /// (same tenant, sequence and payload) returns the existing record
    /// without creating a second link, which makes storage-failure retries
    /// safe.
    ///
    /// # Errors
    ///
    /// - [`ChainError::SequenceViolation`] if the event does not extend the
    ///   tail (not retryable; fix the upstream ordering).
    /// - [`ChainError::Key`] if the tenant has no Active key (not
    ///   retryable; provision keys first).
    /// - [`ChainError::TailMismatch`] if a concurrent writer won the race
    ///   (retryable).
    /// - [`ChainError::Storage`] for backend failures (retryable when
    ///   [`StorageError::is_retryable`]).
    pub fn append(&self, event: &EventRecord) -> ChainResult<DigestRecord> {
        let guard = self.tenant_guard(&event.tenant);
        let _lock = guard.lock().unwrap_or_else(PoisonError::into_inner);

        let content_hash = DigestRecord::content_hash_of(event)?;

        // Retry path: the record may already be durable from a previous
        // attempt whose acknowledgment was lost.
        if let Some(existing) = self.store.get(&event.tenant, event.sequence)? {
            if existing.content_hash == content_hash {
                tracing::debug!(
                    tenant = %event.tenant,
                    sequence = event.sequence,
                    "append is a replay of a committed record"
                );
                return Ok(existing);
            }
            return Err(ChainError::SequenceViolation {
                tenant: event.tenant.to_string(),
                expected: self.next_sequence(&event.tenant)?,
                actual: event.sequence,
            });
        }

        let tail = self.store.get_tail(&event.tenant)?;
        let (previous_digest_hash, expected) = match &tail {
            Some(tail) => (
                tail.current_digest_hash,
                tail.sequence
                    .checked_add(1)
                    .ok_or_else(|| ChainError::SequenceOverflow {
                        tenant: event.tenant.to_string(),
                    })?,
            ),
            None => (DigestHash::genesis(), 0),
        };

        if event.sequence != expected {
            return Err(ChainError::SequenceViolation {
                tenant: event.tenant.to_string(),
                expected,
                actual: event.sequence,
            });
        }

        let current_digest_hash = DigestRecord::linkage_hash(
            &content_hash,
            &previous_digest_hash,
            event.sequence,
            event.timestamp,
        );

        let (signature, key_fingerprint) = self
            .keys
            .sign(&event.tenant, current_digest_hash.as_bytes())?;

        let record = DigestRecord {
            tenant: event.tenant.clone(),
            sequence: event.sequence,
            content_hash,
            previous_digest_hash,
            current_digest_hash,
            signature,
            key_fingerprint,
            timestamp: event.timestamp,
        };

        match self.store.put(&record) {
            Ok(()) => {
                tracing::debug!(
                    tenant = %record.tenant,
                    sequence = record.sequence,
                    fingerprint = %record.key_fingerprint,
                    "appended digest record"
                );
                Ok(record)
            }
            // Another writer committed this position between our tail read
            // and our put. Only possible with an external writer sharing
            // the store; the caller re-reads and retries.
            Err(StorageError::Conflict { .. }) => Err(ChainError::TailMismatch {
                tenant: record.tenant.to_string(),
                sequence: record.sequence,
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Append the tenant's next undigested event, pulled from the source.
    ///
    /// Drives catch-up loops when the chain trails the event stream, e.g.
    /// after a key outage halted appends while ingestion continued.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::MissingEvent`] when the source has no event at
    /// the next sequence, i.e. the chain is fully caught up; otherwise the
    /// same errors as [`append`](Self::append).
    pub fn append_next(
        &self,
        events: &dyn EventSource,
        tenant: &TenantId,
    ) -> ChainResult<DigestRecord> {
        let sequence = self.next_sequence(tenant)?;
        let event =
            events
                .get_event(tenant, sequence)?
                .ok_or_else(|| ChainError::MissingEvent {
                    tenant: tenant.to_string(),
                    sequence,
                })?;
        self.append(&event)
    }

    /// The sequence the tenant's chain will accept next.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::Storage`] if the tail cannot be read, or
    /// [`ChainError::SequenceOverflow`] if the sequence space is exhausted.
    pub fn next_sequence(&self, tenant: &TenantId) -> ChainResult<u64> {
        match self.store.get_tail(tenant)? {
            Some(tail) => tail
                .sequence
                .checked_add(1)
                .ok_or_else(|| ChainError::SequenceOverflow {
                    tenant: tenant.to_string(),
                }),
            None => Ok(0),
        }
    }

    fn tenant_guard(&self, tenant: &TenantId) -> Arc<Mutex<()>> {
        self.append_guards
            .entry(tenant.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

impl std::fmt::Debug for ChainBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainBuilder")
            .field("tenants", &self.append_guards.len())
            .finish_non_exhaustive()
    }
}
