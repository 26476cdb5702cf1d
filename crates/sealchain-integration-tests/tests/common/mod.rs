//! Shared harness for chain integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Once};

use sealchain_chain::{
    ChainBuilder, ChainVerifier, DigestRecord, DigestStore, MemoryDigestStore, MemoryEventSource,
};
use sealchain_core::{EventRecord, TenantId};
use sealchain_keys::KeyManager;
use serde_json::json;

/// One fully wired engine: store, event source, key manager, builder.
pub struct Harness {
    pub store: Arc<MemoryDigestStore>,
    pub events: Arc<MemoryEventSource>,
    pub keys: Arc<KeyManager>,
    pub builder: ChainBuilder,
}

/// Install a process-wide subscriber so engine traces show up in test
/// output. Filter via `RUST_LOG`; quiet by default.
fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

impl Harness {
    pub fn new() -> Self {
        init_tracing();
        let store = Arc::new(MemoryDigestStore::new());
        let events = Arc::new(MemoryEventSource::new());
        let keys = Arc::new(KeyManager::new());
        let builder = ChainBuilder::new(store.clone(), keys.clone());
        Self {
            store,
            events,
            keys,
            builder,
        }
    }

    /// Register a tenant with an Active signing key.
    pub fn tenant(&self, name: &str) -> TenantId {
        let tenant = TenantId::new(name).unwrap();
        self.keys.activate_key(&tenant).unwrap();
        tenant
    }

    pub fn verifier(&self) -> ChainVerifier {
        ChainVerifier::new(self.store.clone(), self.events.clone(), self.keys.clone())
    }

    /// Ingest one event: register it with the source and append its digest.
    pub fn ingest(&self, event: &EventRecord) -> DigestRecord {
        self.events.insert(event.clone());
        self.builder.append(event).unwrap()
    }

    /// Ingest `count` generated events for a tenant, starting at sequence 0.
    pub fn ingest_many(&self, tenant: &TenantId, count: u64) -> Vec<DigestRecord> {
        (0..count)
            .map(|sequence| self.ingest(&sample_event(tenant, sequence)))
            .collect()
    }

    pub fn record(&self, tenant: &TenantId, sequence: u64) -> DigestRecord {
        self.store.get(tenant, sequence).unwrap().unwrap()
    }
}

/// A representative audit event for a sequence position.
pub fn sample_event(tenant: &TenantId, sequence: u64) -> EventRecord {
    EventRecord::new(
        tenant.clone(),
        sequence,
        json!({
            "action": "document.write",
            "actor": "user-17",
            "n": sequence,
        }),
    )
}
