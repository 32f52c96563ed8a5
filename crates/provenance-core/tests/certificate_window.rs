// crates/provenance-core/tests/certificate_window.rs
// ============================================================================
// Module: Certificate Window Property-Based Tests
// Description: Property tests for validity classification and fingerprints.
// Purpose: Detect classification drift across wide timestamp ranges.
// ============================================================================

//! Property-based tests for certificate validity invariants.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use proptest::prelude::*;
use provenance_core::CERTIFICATE_FINGERPRINT_BYTES;
use provenance_core::CertificateFingerprint;
use provenance_core::CertificateId;
use provenance_core::CertificateRecord;
use provenance_core::CertificateStatus;
use provenance_core::CoordinatorId;
use provenance_core::Timestamp;

fn sample_record(issue_millis: i64, expiry_millis: i64) -> CertificateRecord {
    CertificateRecord {
        certificate_id: CertificateId::from_raw(1).expect("nonzero certificate id"),
        added_by: CoordinatorId::from_raw(1).expect("nonzero coordinator id"),
        certificate_type: "ISO 9001".to_string(),
        issuer: "International Standards Organization".to_string(),
        issue_date: Timestamp::from_unix_millis(issue_millis),
        expiry_date: Timestamp::from_unix_millis(expiry_millis),
        fingerprint: CertificateFingerprint::from_bytes(vec![0u8; CERTIFICATE_FINGERPRINT_BYTES])
            .expect("fingerprint"),
        added_at: Timestamp::from_unix_millis(issue_millis),
    }
}

proptest! {
    /// The classification partitions the timeline into exactly three ranges.
    #[test]
    fn classification_matches_window_bounds(
        issue in -1_000_000_000_i64 .. 1_000_000_000_i64,
        window in 1_i64 .. 1_000_000_000_i64,
        at in -2_000_000_000_i64 .. 3_000_000_000_i64,
    ) {
        let record = sample_record(issue, issue + window);
        let status = record.status_at(Timestamp::from_unix_millis(at));
        if at < issue {
            prop_assert_eq!(status, CertificateStatus::NotYetValid);
        } else if at >= issue + window {
            prop_assert_eq!(status, CertificateStatus::Expired);
        } else {
            prop_assert_eq!(status, CertificateStatus::Valid);
        }
    }

    /// The issue instant is always valid and the expiry instant never is.
    #[test]
    fn window_is_half_open(
        issue in -1_000_000_000_i64 .. 1_000_000_000_i64,
        window in 1_i64 .. 1_000_000_000_i64,
    ) {
        let record = sample_record(issue, issue + window);
        prop_assert_eq!(
            record.status_at(Timestamp::from_unix_millis(issue)),
            CertificateStatus::Valid
        );
        prop_assert_eq!(
            record.status_at(Timestamp::from_unix_millis(issue + window)),
            CertificateStatus::Expired
        );
    }

    /// Fingerprints round-trip through their hex wire form.
    #[test]
    fn fingerprint_roundtrips_through_hex(
        bytes in prop::collection::vec(any::<u8>(), CERTIFICATE_FINGERPRINT_BYTES),
    ) {
        let fingerprint = CertificateFingerprint::from_bytes(bytes.clone()).expect("fingerprint");
        let hex = fingerprint.to_hex();
        let json = serde_json::to_string(&fingerprint).expect("serialize");
        prop_assert_eq!(json, format!("\"{hex}\""));

        let decoded: CertificateFingerprint =
            serde_json::from_str(&format!("\"{hex}\"")).expect("deserialize");
        prop_assert_eq!(decoded.as_bytes(), bytes.as_slice());
    }

    /// Fingerprints with the wrong byte count are rejected.
    #[test]
    fn fingerprint_rejects_wrong_length(
        len in 0_usize .. 128_usize,
    ) {
        prop_assume!(len != CERTIFICATE_FINGERPRINT_BYTES);
        let result = CertificateFingerprint::from_bytes(vec![0u8; len]);
        prop_assert!(result.is_err());
    }
}
