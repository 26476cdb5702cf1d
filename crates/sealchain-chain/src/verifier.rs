//! The chain verifier: read-only replay of a tenant's digest chain.

use std::sync::Arc;

use sealchain_core::{TenantId, Timestamp};
use sealchain_crypto::DigestHash;
use sealchain_keys::{KeyError, KeyManager};

use crate::error::{ChainError, ChainResult, StorageError};
use crate::record::DigestRecord;
use crate::report::{
    Anomaly, AnomalyKind, Certificate, RecordOutcome, RecordStatus, Severity, VerificationReport,
    Verdict,
};
use crate::store::{DigestStore, EventSource};

/// An inclusive sequence range to verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceRange {
    start: u64,
    end: u64,
}

impl SequenceRange {
    /// Create an inclusive range.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::InvalidRange`] if `start > end`.
    pub fn new(start: u64, end: u64) -> ChainResult<Self> {
        if start > end {
            return Err(ChainError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// A range covering a single sequence.
    #[must_use]
    pub const fn single(sequence: u64) -> Self {
        Self {
            start: sequence,
            end: sequence,
        }
    }

    /// First covered sequence.
    #[must_use]
    pub const fn start(&self) -> u64 {
        self.start
    }

    /// Last covered sequence.
    #[must_use]
    pub const fn end(&self) -> u64 {
        self.end
    }
}

/// Replays digest records against event records, recomputing hashes and
/// validating signatures and linkage.
///
/// Fully read-only: any number of verification passes may run concurrently,
/// including alongside an in-flight append, because only durably committed
/// records are ever visible through the store.
pub struct ChainVerifier {
    store: Arc<dyn DigestStore>,
    events: Arc<dyn EventSource>,
    keys: Arc<KeyManager>,
}

impl ChainVerifier {
    /// Create a verifier over a digest store, event source and key manager.
    #[must_use]
    pub fn new(
        store: Arc<dyn DigestStore>,
        events: Arc<dyn EventSource>,
        keys: Arc<KeyManager>,
    ) -> Self {
        Self {
            store,
            events,
            keys,
        }
    }

    /// Verify a tenant's chain over an inclusive sequence range.
    ///
    /// Anomalies never abort the walk: the verifier always completes and
    /// returns a full report, even over a chain with multiple breaks.
    /// Linkage trust is seeded from the record immediately preceding
    /// `range.start` (genesis at 0) and advances only across records that
    /// pass every check; after a break, every later record is reported
    /// `Tainted` rather than falsely valid.
    ///
    /// A pass with zero anomalies yields a [`Certificate`] signed with the
    /// tenant's Active key. When the tenant has no Active key the report is
    /// returned without a certificate.
    ///
    /// # Errors
    ///
    /// Only hard failures: backend errors from the store or event source.
    pub fn verify(
        &self,
        tenant: &TenantId,
        range: SequenceRange,
    ) -> ChainResult<VerificationReport> {
        let mut anomalies: Vec<Anomaly> = Vec::new();
        let mut records: Vec<RecordOutcome> = Vec::new();
        let mut tainted = false;

        let mut expected_previous = if range.start == 0 {
            DigestHash::genesis()
        } else {
            let seed_sequence = range.start.saturating_sub(1);
            match self.store.get(tenant, seed_sequence)? {
                Some(prior) => prior.current_digest_hash,
                None => {
                    anomalies.push(Anomaly::new(
                        range.start,
                        AnomalyKind::SequenceGap,
                        format!("seed record at sequence {seed_sequence} is missing"),
                    ));
                    tainted = true;
                    DigestHash::genesis()
                }
            }
        };

        for sequence in range.start..=range.end {
            let Some(record) = self.store.get(tenant, sequence)? else {
                anomalies.push(Anomaly::new(
                    sequence,
                    AnomalyKind::SequenceGap,
                    "no digest record at this sequence",
                ));
                tainted = true;
                continue;
            };

            if record.tenant != *tenant {
                // Tenant isolation is a storage invariant, not an anomaly.
                return Err(ChainError::Storage(StorageError::Corrupt(format!(
                    "record for tenant {} returned from chain of {tenant}",
                    record.tenant
                ))));
            }

            if record.sequence != sequence {
                let kind = if record.sequence < sequence {
                    AnomalyKind::SequenceDuplicate
                } else {
                    AnomalyKind::OutOfOrder
                };
                anomalies.push(Anomaly::new(
                    sequence,
                    kind,
                    format!("record claims sequence {}", record.sequence),
                ));
                tainted = true;
                records.push(RecordOutcome {
                    sequence,
                    status: RecordStatus::Tainted,
                });
                continue;
            }

            let status =
                self.check_record(tenant, &record, &expected_previous, tainted, &mut anomalies)?;
            records.push(RecordOutcome { sequence, status });

            if status == RecordStatus::Valid {
                expected_previous = record.current_digest_hash;
            } else {
                tainted = true;
            }
        }

        let verdict = Self::verdict(&anomalies);
        let certificate = if anomalies.is_empty() && verdict == Verdict::Valid && !records.is_empty()
        {
            self.issue_certificate(tenant, range, &expected_previous)?
        } else {
            None
        };

        tracing::info!(
            tenant = %tenant,
            start = range.start,
            end = range.end,
            verdict = ?verdict,
            anomalies = anomalies.len(),
            certified = certificate.is_some(),
            "verification pass complete"
        );

        Ok(VerificationReport {
            tenant: tenant.clone(),
            range_start: range.start,
            range_end: range.end,
            verdict,
            anomalies,
            records,
            certificate,
        })
    }

    /// Verify a tenant's whole chain, from genesis to the latest ingested
    /// event. An empty chain is trivially valid and yields no certificate.
    ///
    /// # Errors
    ///
    /// Same as [`verify`](Self::verify).
    pub fn verify_to_latest(&self, tenant: &TenantId) -> ChainResult<VerificationReport> {
        match self.events.get_latest_sequence(tenant)? {
            Some(end) => self.verify(tenant, SequenceRange::new(0, end)?),
            None => Ok(VerificationReport {
                tenant: tenant.clone(),
                range_start: 0,
                range_end: 0,
                verdict: Verdict::Valid,
                anomalies: Vec::new(),
                records: Vec::new(),
                certificate: None,
            }),
        }
    }

    /// Run hash and signature checks on one record.
    ///
    /// Signature and key-status findings are recorded even for tainted
    /// records; the linkage hash is only judged while the chain of trust is
    /// intact, because a tainted `expected_previous` proves nothing.
    fn check_record(
        &self,
        tenant: &TenantId,
        record: &DigestRecord,
        expected_previous: &DigestHash,
        tainted: bool,
        anomalies: &mut Vec<Anomaly>,
    ) -> ChainResult<RecordStatus> {
        let sequence = record.sequence;

        let signature_ok = match self.keys.get_public_key(&record.key_fingerprint) {
            Ok(public_key) => {
                if self
                    .keys
                    .key_status(&record.key_fingerprint)
                    .is_ok_and(|s| s.is_revoked())
                {
                    anomalies.push(Anomaly::new(
                        sequence,
                        AnomalyKind::SignedByRevokedKey,
                        format!("key {} was revoked after signing", record.key_fingerprint),
                    ));
                }

                let ok = public_key
                    .verify(record.current_digest_hash.as_bytes(), &record.signature)
                    .is_ok();
                if !ok {
                    anomalies.push(Anomaly::new(
                        sequence,
                        AnomalyKind::SignatureInvalid,
                        format!(
                            "signature does not verify under key {}",
                            record.key_fingerprint
                        ),
                    ));
                }
                ok
            }
            Err(KeyError::UnknownKey { .. }) => {
                anomalies.push(Anomaly::new(
                    sequence,
                    AnomalyKind::UnknownKey,
                    format!("fingerprint {} was never issued", record.key_fingerprint),
                ));
                false
            }
            Err(e) => return Err(e.into()),
        };

        let recomputed = match self.events.get_event(tenant, sequence)? {
            Some(event) => {
                let content_hash = DigestRecord::content_hash_of(&event)?;
                Some(DigestRecord::linkage_hash(
                    &content_hash,
                    expected_previous,
                    sequence,
                    record.timestamp,
                ))
            }
            None => {
                anomalies.push(Anomaly::new(
                    sequence,
                    AnomalyKind::MissingEvent,
                    "event source has no event for this sequence",
                ));
                None
            }
        };

        if tainted {
            return Ok(RecordStatus::Tainted);
        }

        match recomputed {
            Some(recomputed) if recomputed != record.current_digest_hash => {
                anomalies.push(Anomaly::new(
                    sequence,
                    AnomalyKind::HashMismatch,
                    "recomputed digest hash differs from the stored one",
                ));
                Ok(RecordStatus::HashMismatch)
            }
            Some(_) if !signature_ok => Ok(RecordStatus::SignatureInvalid),
            Some(_) => Ok(RecordStatus::Valid),
            // Without the event the content hash cannot be recomputed.
            None => Ok(RecordStatus::Tainted),
        }
    }

    fn verdict(anomalies: &[Anomaly]) -> Verdict {
        let critical = anomalies.iter().any(|a| a.severity == Severity::Critical);
        if !critical {
            return Verdict::Valid;
        }

        let tampering = anomalies.iter().any(|a| {
            matches!(
                a.kind,
                AnomalyKind::HashMismatch
                    | AnomalyKind::SignatureInvalid
                    | AnomalyKind::UnknownKey
                    | AnomalyKind::MissingEvent
            )
        });
        if tampering {
            Verdict::Invalid
        } else {
            Verdict::Indeterminate
        }
    }

    fn issue_certificate(
        &self,
        tenant: &TenantId,
        range: SequenceRange,
        final_hash: &DigestHash,
    ) -> ChainResult<Option<Certificate>> {
        let verified_at = Timestamp::now();
        let bytes =
            Certificate::signing_bytes(tenant, range.start, range.end, final_hash, verified_at);

        match self.keys.sign(tenant, bytes.as_bytes()) {
            Ok((signature, key_fingerprint)) => Ok(Some(Certificate {
                tenant: tenant.clone(),
                range_start: range.start,
                range_end: range.end,
                final_hash: *final_hash,
                verified_at,
                signature,
                key_fingerprint,
            })),
            Err(KeyError::NoActiveKey { .. }) => {
                tracing::warn!(
                    tenant = %tenant,
                    "chain is valid but no active key is available to sign a certificate"
                );
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl std::fmt::Debug for ChainVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainVerifier").finish_non_exhaustive()
    }
}
