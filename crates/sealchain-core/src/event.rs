//! Event records as consumed by the digest chain builder.
//!
//! Events arrive already validated and ordered: sequence positions within a
//! tenant are strictly increasing and gap-free at ingestion time. The chain
//! engine cannot repair gaps, only detect them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

use crate::types::{TenantId, Timestamp};

/// Unique identifier of an event record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub Uuid);

impl EventId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An audit event, external input to the chain builder.
///
/// The engine treats events as read-only; it never mutates or stores them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Unique event identifier.
    pub id: EventId,
    /// Owning tenant.
    pub tenant: TenantId,
    /// Ordered position within the tenant's stream, starting at 0.
    pub sequence: u64,
    /// When the event occurred.
    pub timestamp: Timestamp,
    /// Canonical serializable payload.
    pub payload: Value,
}

impl EventRecord {
    /// Construct an event record.
    #[must_use]
    pub fn new(tenant: TenantId, sequence: u64, payload: Value) -> Self {
        Self {
            id: EventId::new(),
            tenant,
            sequence,
            timestamp: Timestamp::now(),
            payload,
        }
    }

    /// Deterministic byte encoding of the payload, used for content hashing.
    ///
    /// `serde_json` serializes object keys in sorted order (its map type is
    /// a `BTreeMap` unless the `preserve_order` feature is enabled), so two
    /// structurally equal payloads always produce identical bytes.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json::Error` if the payload cannot be serialized,
    /// which only happens for non-string map keys injected via `Value`
    /// construction.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tenant() -> TenantId {
        TenantId::new("t1").unwrap()
    }

    #[test]
    fn test_canonical_bytes_deterministic() {
        let a = EventRecord::new(tenant(), 0, json!({"b": 2, "a": 1}));
        let b = EventRecord::new(tenant(), 0, json!({"a": 1, "b": 2}));
        assert_eq!(a.canonical_bytes().unwrap(), b.canonical_bytes().unwrap());
    }

    #[test]
    fn test_canonical_bytes_distinguish_payloads() {
        let a = EventRecord::new(tenant(), 0, json!({"a": 1}));
        let b = EventRecord::new(tenant(), 0, json!({"a": 2}));
        assert_ne!(a.canonical_bytes().unwrap(), b.canonical_bytes().unwrap());
    }

    #[test]
    fn test_event_serde_roundtrip() {
        let event = EventRecord::new(tenant(), 7, json!({"action": "login"}));
        let json = serde_json::to_string(&event).unwrap();
        let decoded: EventRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(event, decoded);
    }
}
