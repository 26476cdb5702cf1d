//! Digest records: the immutable links of a tenant's chain.

use serde::{Deserialize, Serialize};

use sealchain_core::{EventRecord, TenantId, Timestamp};
use sealchain_crypto::{DigestHash, Fingerprint, Signature};

use crate::error::{ChainError, ChainResult};

/// Domain label for event content hashes.
const CONTENT_DOMAIN: &str = "sealchain.content.v1";

/// Domain label for linkage hashes.
///
/// Distinct from the content domain so a linkage hash can never collide
/// with a content hash over the same bytes.
const LINK_DOMAIN: &str = "sealchain.link.v1";

/// One link in a tenant's digest chain.
///
/// Created exactly once at event-ingestion time and immutable thereafter.
/// `current_digest_hash` binds the event content to the previous link;
/// `signature` binds the link to the signing key identified by
/// `key_fingerprint`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestRecord {
    /// Owning tenant; never references another tenant's chain.
    pub tenant: TenantId,
    /// Sequence position, mirroring the covered event.
    pub sequence: u64,
    /// Hash of the event's canonical payload bytes.
    pub content_hash: DigestHash,
    /// `current_digest_hash` of the prior record, or the genesis value at
    /// sequence 0.
    pub previous_digest_hash: DigestHash,
    /// Hash over `{content_hash, previous_digest_hash, sequence, timestamp}`.
    pub current_digest_hash: DigestHash,
    /// Signature over `current_digest_hash`.
    pub signature: Signature,
    /// Fingerprint of the key that produced `signature`.
    pub key_fingerprint: Fingerprint,
    /// Timestamp of the covered event.
    pub timestamp: Timestamp,
}

impl DigestRecord {
    /// Compute the content hash of an event's canonical payload.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::Serialization`] if the payload cannot be
    /// canonically serialized.
    pub fn content_hash_of(event: &EventRecord) -> ChainResult<DigestHash> {
        let bytes = event
            .canonical_bytes()
            .map_err(|e| ChainError::Serialization(e.to_string()))?;
        Ok(DigestHash::hash_parts_with_domain(CONTENT_DOMAIN, &[&bytes]))
    }

    /// Compute the linkage hash binding a content hash to its predecessor.
    ///
    /// This is the single definition used by both the builder (to create
    /// records) and the verifier (to recompute and compare); the two can
    /// never drift apart.
    #[must_use]
    pub fn linkage_hash(
        content_hash: &DigestHash,
        previous_digest_hash: &DigestHash,
        sequence: u64,
        timestamp: Timestamp,
    ) -> DigestHash {
        DigestHash::hash_parts_with_domain(
            LINK_DOMAIN,
            &[
                content_hash.algorithm().as_str().as_bytes(),
                content_hash.as_bytes(),
                previous_digest_hash.as_bytes(),
                &sequence.to_be_bytes(),
                &timestamp.unix_millis().to_be_bytes(),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(seq: u64, payload: serde_json::Value) -> EventRecord {
        EventRecord::new(TenantId::new("t1").unwrap(), seq, payload)
    }

    #[test]
    fn test_content_hash_depends_only_on_payload() {
        let a = event(0, json!({"k": "v"}));
        let b = event(5, json!({"k": "v"}));
        assert_eq!(
            DigestRecord::content_hash_of(&a).unwrap(),
            DigestRecord::content_hash_of(&b).unwrap()
        );
    }

    #[test]
    fn test_linkage_hash_binds_every_field() {
        let e = event(1, json!({"k": "v"}));
        let content = DigestRecord::content_hash_of(&e).unwrap();
        let previous = DigestHash::hash(b"previous");
        let base = DigestRecord::linkage_hash(&content, &previous, 1, e.timestamp);

        let other_content = DigestHash::hash(b"other");
        assert_ne!(
            base,
            DigestRecord::linkage_hash(&other_content, &previous, 1, e.timestamp)
        );
        assert_ne!(
            base,
            DigestRecord::linkage_hash(&content, &DigestHash::genesis(), 1, e.timestamp)
        );
        assert_ne!(
            base,
            DigestRecord::linkage_hash(&content, &previous, 2, e.timestamp)
        );
    }

    #[test]
    fn test_linkage_hash_differs_from_content_hash() {
        let e = event(0, json!({"k": "v"}));
        let content = DigestRecord::content_hash_of(&e).unwrap();
        let linkage =
            DigestRecord::linkage_hash(&content, &DigestHash::genesis(), 0, e.timestamp);
        assert_ne!(content, linkage);
    }
}
