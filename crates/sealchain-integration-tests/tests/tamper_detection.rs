//! Tamper and gap scenarios: the verifier must localize the break and
//! taint everything downstream rather than report false validity.

mod common;

use std::sync::Arc;

use common::{Harness, sample_event};
use sealchain_chain::{
    AnomalyKind, DigestStore, MemoryDigestStore, RecordStatus, SequenceRange, Verdict,
};
use serde_json::json;

#[test]
fn payload_tamper_is_localized() {
    let harness = Harness::new();
    let tenant = harness.tenant("acme");
    harness.ingest_many(&tenant, 8);

    assert!(harness.events.tamper_payload(&tenant, 3, json!({"action": "forged"})));

    let report = harness
        .verifier()
        .verify(&tenant, SequenceRange::new(0, 7).unwrap())
        .unwrap();

    assert_eq!(report.verdict, Verdict::Invalid);
    assert!(report.certificate.is_none());

    let mismatches: Vec<u64> = report
        .anomalies
        .iter()
        .filter(|a| a.kind == AnomalyKind::HashMismatch)
        .map(|a| a.sequence)
        .collect();
    assert_eq!(mismatches, vec![3]);
    assert_eq!(report.critical_anomalies().count(), 1);

    for outcome in &report.records {
        let expected = match outcome.sequence {
            0..=2 => RecordStatus::Valid,
            3 => RecordStatus::HashMismatch,
            _ => RecordStatus::Tainted,
        };
        assert_eq!(outcome.status, expected, "sequence {}", outcome.sequence);
    }
}

#[test]
fn missing_record_yields_indeterminate() {
    let harness = Harness::new();
    let tenant = harness.tenant("acme");
    harness.ingest_many(&tenant, 6);

    // Replay the chain into a store that drops sequence 2, modelling a
    // backend that lost a record.
    let lossy = Arc::new(MemoryDigestStore::new());
    for sequence in [0u64, 1, 3, 4, 5] {
        lossy.put(&harness.record(&tenant, sequence)).unwrap();
    }

    let verifier = sealchain_chain::ChainVerifier::new(
        lossy,
        harness.events.clone(),
        harness.keys.clone(),
    );
    let report = verifier
        .verify(&tenant, SequenceRange::new(0, 5).unwrap())
        .unwrap();

    assert_eq!(report.verdict, Verdict::Indeterminate);

    let gaps: Vec<u64> = report
        .anomalies
        .iter()
        .filter(|a| a.kind == AnomalyKind::SequenceGap)
        .map(|a| a.sequence)
        .collect();
    assert_eq!(gaps, vec![2]);

    // No outcome is reported for the missing slot itself.
    assert!(report.records.iter().all(|r| r.sequence != 2));
    for outcome in &report.records {
        let expected = if outcome.sequence < 2 {
            RecordStatus::Valid
        } else {
            RecordStatus::Tainted
        };
        assert_eq!(outcome.status, expected);
    }
}

#[test]
fn tamper_then_gap_reports_both() {
    let harness = Harness::new();
    let tenant = harness.tenant("acme");
    harness.ingest_many(&tenant, 6);

    assert!(harness.events.tamper_payload(&tenant, 1, json!({"forged": true})));

    let lossy = Arc::new(MemoryDigestStore::new());
    for sequence in [0u64, 1, 2, 3, 5] {
        lossy.put(&harness.record(&tenant, sequence)).unwrap();
    }

    let verifier = sealchain_chain::ChainVerifier::new(
        lossy,
        harness.events.clone(),
        harness.keys.clone(),
    );
    let report = verifier
        .verify(&tenant, SequenceRange::new(0, 5).unwrap())
        .unwrap();

    // Tampering evidence dominates the verdict.
    assert_eq!(report.verdict, Verdict::Invalid);
    assert!(report.anomalies.iter().any(|a| a.kind == AnomalyKind::HashMismatch));
    assert!(report.anomalies.iter().any(|a| a.kind == AnomalyKind::SequenceGap));
}

#[test]
fn tampered_chain_still_fully_walked() {
    let harness = Harness::new();
    let tenant = harness.tenant("acme");
    harness.ingest_many(&tenant, 10);

    assert!(harness.events.tamper_payload(&tenant, 0, json!(1)));

    let report = harness
        .verifier()
        .verify(&tenant, SequenceRange::new(0, 9).unwrap())
        .unwrap();

    // The break at genesis never aborts the pass; every record gets an
    // outcome.
    assert_eq!(report.records.len(), 10);
    assert_eq!(report.records[0].status, RecordStatus::HashMismatch);
}

#[test]
fn clean_prefix_stays_certifiable_after_later_tamper() {
    let harness = Harness::new();
    let tenant = harness.tenant("acme");
    harness.ingest_many(&tenant, 8);

    assert!(harness.events.tamper_payload(&tenant, 6, json!({"forged": true})));

    // The untouched prefix still verifies clean and earns a certificate.
    let prefix = harness
        .verifier()
        .verify(&tenant, SequenceRange::new(0, 5).unwrap())
        .unwrap();
    assert_eq!(prefix.verdict, Verdict::Valid);
    assert!(prefix.certificate.is_some());

    let full = harness.verifier().verify_to_latest(&tenant).unwrap();
    assert_eq!(full.verdict, Verdict::Invalid);
    assert!(full.certificate.is_none());
}
