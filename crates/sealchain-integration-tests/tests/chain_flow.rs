//! End-to-end flow: ingest events, build the chain, verify, export a
//! certificate an external auditor can check independently.

mod common;

use common::{Harness, sample_event};
use sealchain_chain::{SequenceRange, Verdict};
use sealchain_crypto::DigestHash;

#[test]
fn full_chain_verifies_and_certifies() {
    let harness = Harness::new();
    let tenant = harness.tenant("acme");
    let records = harness.ingest_many(&tenant, 5);

    // Linkage is intact from genesis.
    assert!(records[0].previous_digest_hash.is_genesis());
    for pair in records.windows(2) {
        assert_eq!(pair[1].previous_digest_hash, pair[0].current_digest_hash);
    }

    let report = harness
        .verifier()
        .verify(&tenant, SequenceRange::new(0, 4).unwrap())
        .unwrap();

    assert_eq!(report.verdict, Verdict::Valid);
    assert!(report.is_clean());

    let certificate = report.certificate.expect("clean pass yields a certificate");
    assert_eq!(certificate.range_start, 0);
    assert_eq!(certificate.range_end, 4);
    assert_eq!(certificate.final_hash, records[4].current_digest_hash);

    // External audit path: only the published key is needed.
    let published = harness
        .keys
        .get_public_key(&certificate.key_fingerprint)
        .unwrap();
    assert!(certificate.verify(&published).is_ok());
}

#[test]
fn certificate_export_roundtrip() {
    let harness = Harness::new();
    let tenant = harness.tenant("acme");
    harness.ingest_many(&tenant, 3);

    let report = harness.verifier().verify_to_latest(&tenant).unwrap();
    let certificate = report.certificate.unwrap();

    // The exported JSON alone, plus the public key, convinces an auditor.
    let exported = serde_json::to_string(&certificate).unwrap();
    let imported: sealchain_chain::Certificate = serde_json::from_str(&exported).unwrap();

    let published = harness
        .keys
        .get_public_key(&imported.key_fingerprint)
        .unwrap();
    assert!(imported.verify(&published).is_ok());
}

#[test]
fn identical_event_streams_produce_identical_hashes() {
    let first = Harness::new();
    let second = Harness::new();
    let tenant_a = first.tenant("acme");
    let tenant_b = second.tenant("acme");

    // The same events (same payloads, timestamps, sequences) fed into two
    // independent engines with different signing keys.
    for sequence in 0..4 {
        let event = sample_event(&tenant_a, sequence);
        first.ingest(&event);
        second.ingest(&event);
    }

    for sequence in 0..4 {
        let a = first.record(&tenant_a, sequence);
        let b = second.record(&tenant_b, sequence);
        assert_eq!(a.content_hash, b.content_hash);
        assert_eq!(a.current_digest_hash, b.current_digest_hash);
        // Signatures differ: each engine has its own keys.
        assert_ne!(a.signature, b.signature);
    }
}

#[test]
fn replayed_append_is_idempotent() {
    let harness = Harness::new();
    let tenant = harness.tenant("acme");

    let event = sample_event(&tenant, 0);
    let first = harness.ingest(&event);
    let replay = harness.builder.append(&event).unwrap();

    assert_eq!(first, replay);
    assert_eq!(harness.builder.next_sequence(&tenant).unwrap(), 1);

    let report = harness.verifier().verify_to_latest(&tenant).unwrap();
    assert_eq!(report.verdict, Verdict::Valid);
}

#[test]
fn records_serialize_with_tagged_hashes() {
    let harness = Harness::new();
    let tenant = harness.tenant("acme");
    let record = harness.ingest(&sample_event(&tenant, 0));

    let json = serde_json::to_value(&record).unwrap();
    let tagged = json["current_digest_hash"].as_str().unwrap();
    assert!(tagged.starts_with("blake3:"));

    let parsed = DigestHash::parse(tagged).unwrap();
    assert_eq!(parsed, record.current_digest_hash);
}
