//! Key lifecycle across a live chain: rotation boundaries, revocation
//! reporting, and chains that outlive every key that signed them.

mod common;

use chrono::Duration;
use common::{Harness, sample_event};
use sealchain_chain::{AnomalyKind, ChainError, SequenceRange, Severity, Verdict};
use sealchain_core::{TenantTier, Timestamp};
use sealchain_keys::{KeyError, KeyStatus, RevocationReason, RotationReason};

#[test]
fn rotation_boundary_is_invisible_to_verification() {
    let harness = Harness::new();
    let tenant = harness.tenant("acme");

    harness.ingest_many(&tenant, 3);
    harness
        .keys
        .rotate_key(&tenant, RotationReason::Scheduled)
        .unwrap();
    for sequence in 3..6 {
        harness.ingest(&sample_event(&tenant, sequence));
    }

    let report = harness
        .verifier()
        .verify(&tenant, SequenceRange::new(0, 5).unwrap())
        .unwrap();

    assert_eq!(report.verdict, Verdict::Valid);
    assert!(report.is_clean());
    assert!(report.certificate.is_some());

    // Records straddle two keys, both attributable.
    let before = harness.record(&tenant, 2);
    let after = harness.record(&tenant, 3);
    assert_ne!(before.key_fingerprint, after.key_fingerprint);
    assert_eq!(
        harness.keys.key_status(&before.key_fingerprint).unwrap(),
        KeyStatus::Expired
    );
    assert_eq!(
        harness.keys.key_status(&after.key_fingerprint).unwrap(),
        KeyStatus::Active
    );
}

#[test]
fn chain_survives_multiple_rotations() {
    let harness = Harness::new();
    let tenant = harness.tenant("acme");

    let mut next = 0;
    for _ in 0..4 {
        for _ in 0..2 {
            harness.ingest(&sample_event(&tenant, next));
            next = next.checked_add(1).unwrap();
        }
        harness
            .keys
            .rotate_key(&tenant, RotationReason::Scheduled)
            .unwrap();
    }

    let report = harness.verifier().verify_to_latest(&tenant).unwrap();
    assert_eq!(report.verdict, Verdict::Valid);
    assert!(report.certificate.is_some());
    assert_eq!(harness.keys.list_keys(&tenant).len(), 5);
}

#[test]
fn revoked_key_flagged_but_chain_stays_valid() {
    let harness = Harness::new();
    let tenant = harness.tenant("acme");
    harness.ingest_many(&tenant, 2);

    let compromised = harness.record(&tenant, 0).key_fingerprint;
    harness
        .keys
        .rotate_key(&tenant, RotationReason::PolicyChange)
        .unwrap();
    harness
        .keys
        .revoke_key(&tenant, &compromised, RevocationReason::Compromise)
        .unwrap();
    for sequence in 2..4 {
        harness.ingest(&sample_event(&tenant, sequence));
    }

    let report = harness.verifier().verify_to_latest(&tenant).unwrap();

    assert_eq!(report.verdict, Verdict::Valid);

    let flagged: Vec<&sealchain_chain::Anomaly> = report
        .anomalies
        .iter()
        .filter(|a| a.kind == AnomalyKind::SignedByRevokedKey)
        .collect();
    assert_eq!(flagged.len(), 2);
    assert!(flagged.iter().all(|a| a.severity == Severity::Informational));
    assert!(flagged.iter().all(|a| a.sequence < 2));
    assert_eq!(report.critical_anomalies().count(), 0);

    // Informational findings still disqualify a certificate.
    assert!(report.certificate.is_none());
}

#[test]
fn revoking_active_key_halts_appends_until_reprovisioned() {
    let harness = Harness::new();
    let tenant = harness.tenant("acme");
    harness.ingest_many(&tenant, 1);

    let active = harness.record(&tenant, 0).key_fingerprint;
    harness
        .keys
        .revoke_key(&tenant, &active, RevocationReason::Compromise)
        .unwrap();

    let err = harness.builder.append(&sample_event(&tenant, 1)).unwrap_err();
    assert!(matches!(err, ChainError::Key(KeyError::NoActiveKey { .. })));

    // A fresh key resumes the chain where it stopped.
    harness.keys.activate_key(&tenant).unwrap();
    let resumed = harness.ingest(&sample_event(&tenant, 1));
    assert_eq!(resumed.sequence, 1);
    assert_ne!(resumed.key_fingerprint, active);
}

#[test]
fn rotation_schedule_follows_tenant_tier() {
    let harness = Harness::new();
    let regulated = harness.tenant("bank");
    harness.keys.set_tenant_tier(&regulated, TenantTier::Regulated);
    let standard = harness.tenant("shop");

    let issued = Timestamp::now();
    let in_six_weeks = Timestamp(issued.0.checked_add_signed(Duration::weeks(6)).unwrap());

    // 42 days: past the 30-day regulated period, inside the 90-day default.
    assert!(harness.keys.rotation_due(&regulated, in_six_weeks).unwrap());
    assert!(!harness.keys.rotation_due(&standard, in_six_weeks).unwrap());
}
