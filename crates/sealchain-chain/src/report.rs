//! Verification reports, anomalies and certificates.
//!
//! Anomalies are data, not errors: a broken chain is an expected,
//! reportable outcome, and the report is the compliance deliverable.

use serde::{Deserialize, Serialize};
use std::fmt;

use sealchain_core::{TenantId, Timestamp};
use sealchain_crypto::{CryptoResult, DigestHash, Fingerprint, PublicKey, Signature};

/// Certificate signing domain label.
const CERTIFICATE_DOMAIN: &str = "sealchain.certificate.v1";

/// Kinds of verification anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    /// Recomputed linkage hash differs from the stored one: the event
    /// payload or the record itself was altered.
    HashMismatch,
    /// The stored signature does not verify under the stored fingerprint.
    SignatureInvalid,
    /// A sequence position has no digest record.
    SequenceGap,
    /// A record claims a sequence position that was already covered.
    SequenceDuplicate,
    /// A record claims a sequence position ahead of its slot.
    OutOfOrder,
    /// The record's key fingerprint was never issued by the key manager.
    UnknownKey,
    /// The signing key has since been revoked. Informational: the hash
    /// linkage is independent of key status.
    SignedByRevokedKey,
    /// The event source could not produce the covered event.
    MissingEvent,
}

impl AnomalyKind {
    /// Severity of this anomaly kind.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::SignedByRevokedKey => Severity::Informational,
            _ => Severity::Critical,
        }
    }
}

impl fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::HashMismatch => "hash-mismatch",
            Self::SignatureInvalid => "signature-invalid",
            Self::SequenceGap => "sequence-gap",
            Self::SequenceDuplicate => "sequence-duplicate",
            Self::OutOfOrder => "out-of-order",
            Self::UnknownKey => "unknown-key",
            Self::SignedByRevokedKey => "signed-by-revoked-key",
            Self::MissingEvent => "missing-event",
        };
        f.write_str(name)
    }
}

/// How serious an anomaly is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Breaks trust in the chain.
    Critical,
    /// Reportable but does not break chain mathematics.
    Informational,
}

/// One finding at one sequence position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anomaly {
    /// Sequence position the finding is tagged with.
    pub sequence: u64,
    /// What was found.
    pub kind: AnomalyKind,
    /// Severity of the finding.
    pub severity: Severity,
    /// Human-readable context.
    pub detail: String,
}

impl Anomaly {
    /// Construct an anomaly with the kind's default severity.
    #[must_use]
    pub fn new(sequence: u64, kind: AnomalyKind, detail: impl Into<String>) -> Self {
        Self {
            sequence,
            kind,
            severity: kind.severity(),
            detail: detail.into(),
        }
    }
}

/// Terminal state of one walked record.
///
/// Every record starts `Pending` and ends in exactly one of these; `Tainted`
/// is sticky and propagates to every later record in the same pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    /// Hash and signature checks passed with a trusted predecessor.
    Valid,
    /// The recomputed linkage hash did not match.
    HashMismatch,
    /// The signature did not verify.
    SignatureInvalid,
    /// Downstream of a break; cannot be judged either way.
    Tainted,
}

/// Per-record outcome of a verification pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordOutcome {
    /// Sequence position of the record.
    pub sequence: u64,
    /// Terminal status after the walk.
    pub status: RecordStatus,
}

/// Overall verdict of a verification pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// No critical anomalies over the requested range.
    Valid,
    /// Tampering evidence: hash or signature checks failed.
    Invalid,
    /// Gaps or duplicates prevented judging part of the range.
    Indeterminate,
}

/// Result of one verification pass. Ephemeral; not persisted by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    /// Tenant whose chain was verified.
    pub tenant: TenantId,
    /// First sequence of the requested range (inclusive).
    pub range_start: u64,
    /// Last sequence of the requested range (inclusive).
    pub range_end: u64,
    /// Overall verdict.
    pub verdict: Verdict,
    /// All findings, in walk order.
    pub anomalies: Vec<Anomaly>,
    /// Terminal status of each record encountered.
    pub records: Vec<RecordOutcome>,
    /// Signed attestation; present only when the pass found zero anomalies.
    pub certificate: Option<Certificate>,
}

impl VerificationReport {
    /// Whether the pass found no anomalies at all, informational included.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.anomalies.is_empty()
    }

    /// Findings of critical severity.
    pub fn critical_anomalies(&self) -> impl Iterator<Item = &Anomaly> {
        self.anomalies
            .iter()
            .filter(|a| a.severity == Severity::Critical)
    }
}

/// A signed attestation that a chain range passed verification with zero
/// anomalies. The one artifact intended for external compliance export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    /// Attested tenant.
    pub tenant: TenantId,
    /// First attested sequence (inclusive).
    pub range_start: u64,
    /// Last attested sequence (inclusive).
    pub range_end: u64,
    /// `current_digest_hash` of the last record in the range.
    pub final_hash: DigestHash,
    /// When the verification pass completed.
    pub verified_at: Timestamp,
    /// Signature over the attestation.
    pub signature: Signature,
    /// Fingerprint of the key that signed the attestation.
    pub key_fingerprint: Fingerprint,
}

impl Certificate {
    /// The bytes the attestation signature covers.
    #[must_use]
    pub fn signing_bytes(
        tenant: &TenantId,
        range_start: u64,
        range_end: u64,
        final_hash: &DigestHash,
        verified_at: Timestamp,
    ) -> DigestHash {
        DigestHash::hash_parts_with_domain(
            CERTIFICATE_DOMAIN,
            &[
                tenant.as_str().as_bytes(),
                &range_start.to_be_bytes(),
                &range_end.to_be_bytes(),
                final_hash.as_bytes(),
                &verified_at.unix_millis().to_be_bytes(),
            ],
        )
    }

    /// Verify the attestation signature against a published public key.
    ///
    /// This is what an external auditor runs on an exported certificate.
    ///
    /// # Errors
    ///
    /// Returns a crypto error if the signature does not verify.
    pub fn verify(&self, public_key: &PublicKey) -> CryptoResult<()> {
        let bytes = Self::signing_bytes(
            &self.tenant,
            self.range_start,
            self.range_end,
            &self.final_hash,
            self.verified_at,
        );
        public_key.verify(bytes.as_bytes(), &self.signature)
    }
}
