// crates/provenance-core/tests/registry_operations.rs
// ============================================================================
// Module: Registry Operation Tests
// Description: Tests for origin, certificate, and source operations.
// Purpose: Validate authorization, validation, and verification lifecycles.
// Dependencies: provenance-core
// ============================================================================
//! ## Overview
//! Exercises the registry engine end to end against the in-memory store:
//! catalog admission, origin registration and verification, certificate
//! windows, raw-material sources, and the audit log.

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
    reason = "Test-only output and panic-based assertions are permitted."
)]

use provenance_core::AddCertificateRequest;
use provenance_core::AddMaterialSourceRequest;
use provenance_core::CertificateFingerprint;
use provenance_core::CertificateStatus;
use provenance_core::Coordinator;
use provenance_core::CoordinatorId;
use provenance_core::CoordinatorRole;
use provenance_core::InMemoryProvenanceStore;
use provenance_core::ProductId;
use provenance_core::ProvenanceRegistry;
use provenance_core::RegisterOriginRequest;
use provenance_core::RegisterProductRequest;
use provenance_core::RegistryError;
use provenance_core::RegistryLimits;
use provenance_core::SourceId;
use provenance_core::StaticCoordinatorDirectory;
use provenance_core::Timestamp;
use provenance_core::VerifyMaterialSourceRequest;
use provenance_core::VerifyOriginRequest;

/// Milliseconds in one (non-leap) year, used to build validity windows.
const YEAR_MILLIS: i64 = 365 * 24 * 60 * 60 * 1000;

fn registrar_id() -> CoordinatorId {
    CoordinatorId::from_raw(1).expect("nonzero coordinator id")
}

fn verifier_id() -> CoordinatorId {
    CoordinatorId::from_raw(2).expect("nonzero coordinator id")
}

fn unknown_coordinator_id() -> CoordinatorId {
    CoordinatorId::from_raw(999).expect("nonzero coordinator id")
}

fn product_id() -> ProductId {
    ProductId::from_raw(1).expect("nonzero product id")
}

fn unknown_product_id() -> ProductId {
    ProductId::from_raw(999).expect("nonzero product id")
}

fn build_registry() -> ProvenanceRegistry<InMemoryProvenanceStore, StaticCoordinatorDirectory> {
    let roster = vec![
        Coordinator {
            coordinator_id: registrar_id(),
            name: "Plant Registrar".to_string(),
            roles: vec![CoordinatorRole::Registrar],
        },
        Coordinator {
            coordinator_id: verifier_id(),
            name: "Compliance Verifier".to_string(),
            roles: vec![CoordinatorRole::Verifier],
        },
    ];
    let directory = StaticCoordinatorDirectory::from_roster(roster).expect("roster");
    ProvenanceRegistry::new(InMemoryProvenanceStore::new(), directory, RegistryLimits::default())
        .expect("registry limits")
}

fn register_sample_product(
    registry: &ProvenanceRegistry<InMemoryProvenanceStore, StaticCoordinatorDirectory>,
) {
    registry
        .register_product(&RegisterProductRequest {
            product_id: product_id(),
            coordinator_id: registrar_id(),
            product_name: "Alloy Bicycle Frame".to_string(),
            requested_at: Timestamp::from_unix_millis(500),
            correlation_id: None,
        })
        .expect("register product");
}

fn origin_request() -> RegisterOriginRequest {
    RegisterOriginRequest {
        product_id: product_id(),
        coordinator_id: registrar_id(),
        manufacturer: "ABC Manufacturing Ltd".to_string(),
        manufacturing_location: "Factory Complex, Industrial Zone".to_string(),
        raw_materials: "Steel, Aluminum, Plastic Components".to_string(),
        manufacturing_date: Timestamp::from_unix_millis(1_000),
        requested_at: Timestamp::from_unix_millis(1_100),
        correlation_id: None,
    }
}

fn certificate_request(issue_millis: i64, expiry_millis: i64) -> AddCertificateRequest {
    AddCertificateRequest {
        product_id: product_id(),
        coordinator_id: registrar_id(),
        certificate_type: "ISO 9001".to_string(),
        issuer: "International Standards Organization".to_string(),
        issue_date: Timestamp::from_unix_millis(issue_millis),
        expiry_date: Timestamp::from_unix_millis(expiry_millis),
        fingerprint: CertificateFingerprint::from_bytes(vec![0u8; 64]).expect("fingerprint"),
        requested_at: Timestamp::from_unix_millis(issue_millis),
        correlation_id: None,
    }
}

fn source_request(raw_source_id: u64) -> AddMaterialSourceRequest {
    AddMaterialSourceRequest {
        product_id: product_id(),
        coordinator_id: registrar_id(),
        source_id: SourceId::from_raw(raw_source_id).expect("nonzero source id"),
        source_name: "Steel Supplier Inc".to_string(),
        source_location: "Industrial District A".to_string(),
        material_type: "Steel".to_string(),
        quantity: 100,
        requested_at: Timestamp::from_unix_millis(2_000),
        correlation_id: None,
    }
}

/// Verifies an origin registers with the supplied fields and unverified state.
#[test]
fn register_origin_creates_unverified_record() {
    let registry = build_registry();
    register_sample_product(&registry);

    let origin = registry.register_origin(&origin_request()).expect("register origin");
    assert_eq!(origin.manufacturer, "ABC Manufacturing Ltd");
    assert_eq!(origin.manufacturing_location, "Factory Complex, Industrial Zone");
    assert!(!origin.verified());

    let fetched = registry.product_origin(product_id()).expect("product origin");
    assert_eq!(fetched, origin);
    assert!(!registry.origin_verified(product_id()).expect("origin verified"));
}

/// Verifies unknown coordinators cannot register an origin.
#[test]
fn register_origin_rejects_unknown_coordinator() {
    let registry = build_registry();
    register_sample_product(&registry);

    let mut request = origin_request();
    request.coordinator_id = unknown_coordinator_id();
    let error = registry.register_origin(&request).expect_err("unauthorized");
    assert!(matches!(error, RegistryError::Unauthorized { .. }));
    assert_eq!(error.code(), "UNAUTHORIZED");
}

/// Verifies coordinators without the registrar role cannot register an origin.
#[test]
fn register_origin_rejects_verifier_only_coordinator() {
    let registry = build_registry();
    register_sample_product(&registry);

    let mut request = origin_request();
    request.coordinator_id = verifier_id();
    let error = registry.register_origin(&request).expect_err("unauthorized");
    assert_eq!(error.code(), "UNAUTHORIZED");
}

/// Verifies origin registration fails closed for unknown products.
#[test]
fn register_origin_rejects_unknown_product() {
    let registry = build_registry();
    register_sample_product(&registry);

    let mut request = origin_request();
    request.product_id = unknown_product_id();
    let error = registry.register_origin(&request).expect_err("product not found");
    assert!(matches!(error, RegistryError::ProductNotFound(_)));
    assert_eq!(error.code(), "PRODUCT_NOT_FOUND");
}

/// Verifies a product accepts at most one origin.
#[test]
fn register_origin_rejects_duplicate_origin() {
    let registry = build_registry();
    register_sample_product(&registry);

    registry.register_origin(&origin_request()).expect("register origin");
    let error = registry.register_origin(&origin_request()).expect_err("duplicate origin");
    assert_eq!(error.code(), "ORIGIN_EXISTS");
}

/// Verifies empty text fields are rejected before any state changes.
#[test]
fn register_origin_rejects_empty_manufacturer() {
    let registry = build_registry();
    register_sample_product(&registry);

    let mut request = origin_request();
    request.manufacturer = "   ".to_string();
    let error = registry.register_origin(&request).expect_err("empty manufacturer");
    assert!(matches!(error, RegistryError::InvalidField { field: "manufacturer", .. }));
}

/// Verifies duplicate product registration is rejected.
#[test]
fn register_product_rejects_duplicate_identifier() {
    let registry = build_registry();
    register_sample_product(&registry);

    let error = registry
        .register_product(&RegisterProductRequest {
            product_id: product_id(),
            coordinator_id: registrar_id(),
            product_name: "Alloy Bicycle Frame".to_string(),
            requested_at: Timestamp::from_unix_millis(600),
            correlation_id: None,
        })
        .expect_err("duplicate product");
    assert_eq!(error.code(), "PRODUCT_EXISTS");
}

/// Verifies origin verification records the verifier and timestamp once.
#[test]
fn verify_origin_records_mark() {
    let registry = build_registry();
    register_sample_product(&registry);
    registry.register_origin(&origin_request()).expect("register origin");

    let mark = registry
        .verify_origin(&VerifyOriginRequest {
            product_id: product_id(),
            coordinator_id: verifier_id(),
            requested_at: Timestamp::from_unix_millis(5_000),
            correlation_id: None,
        })
        .expect("verify origin");
    assert_eq!(mark.verifier_id, verifier_id());
    assert_eq!(mark.verified_at, Timestamp::from_unix_millis(5_000));

    assert!(registry.origin_verified(product_id()).expect("origin verified"));
    let origin = registry.product_origin(product_id()).expect("product origin");
    assert_eq!(origin.verification, Some(mark));
}

/// Verifies a verified origin cannot be verified again.
#[test]
fn verify_origin_rejects_second_verification() {
    let registry = build_registry();
    register_sample_product(&registry);
    registry.register_origin(&origin_request()).expect("register origin");

    let request = VerifyOriginRequest {
        product_id: product_id(),
        coordinator_id: verifier_id(),
        requested_at: Timestamp::from_unix_millis(5_000),
        correlation_id: None,
    };
    registry.verify_origin(&request).expect("first verification");
    let error = registry.verify_origin(&request).expect_err("second verification");
    assert!(matches!(error, RegistryError::OriginAlreadyVerified(_)));
    assert_eq!(error.code(), "ALREADY_VERIFIED");
}

/// Verifies verification requires a registered origin.
#[test]
fn verify_origin_requires_registered_origin() {
    let registry = build_registry();
    register_sample_product(&registry);

    let error = registry
        .verify_origin(&VerifyOriginRequest {
            product_id: product_id(),
            coordinator_id: verifier_id(),
            requested_at: Timestamp::from_unix_millis(5_000),
            correlation_id: None,
        })
        .expect_err("missing origin");
    assert_eq!(error.code(), "ORIGIN_NOT_REGISTERED");
}

/// Verifies certificates are admitted with sequential positive identifiers.
#[test]
fn add_certificate_allocates_sequential_identifiers() {
    let registry = build_registry();
    register_sample_product(&registry);

    let first = registry
        .add_certificate(&certificate_request(10_000, 10_000 + YEAR_MILLIS))
        .expect("first certificate");
    let second = registry
        .add_certificate(&certificate_request(20_000, 20_000 + YEAR_MILLIS))
        .expect("second certificate");

    assert_eq!(first.certificate_id.get(), 1);
    assert_eq!(second.certificate_id.get(), 2);
    assert!(first.certificate_id.get() > 0);
}

/// Verifies certificates with non-positive validity windows are rejected.
#[test]
fn add_certificate_rejects_expiry_not_after_issue() {
    let registry = build_registry();
    register_sample_product(&registry);

    let expired = registry
        .add_certificate(&certificate_request(10_000, 9_000))
        .expect_err("expiry before issue");
    assert!(matches!(expired, RegistryError::InvalidCertificate(_)));
    assert_eq!(expired.code(), "INVALID_CERTIFICATE");

    let degenerate = registry
        .add_certificate(&certificate_request(10_000, 10_000))
        .expect_err("expiry equal to issue");
    assert_eq!(degenerate.code(), "INVALID_CERTIFICATE");
}

/// Verifies certificate status classification across the validity window.
#[test]
fn certificate_status_tracks_validity_window() {
    let registry = build_registry();
    register_sample_product(&registry);

    let record = registry
        .add_certificate(&certificate_request(10_000, 10_000 + YEAR_MILLIS))
        .expect("certificate");

    let during = registry
        .certificate_status(product_id(), record.certificate_id, Timestamp::from_unix_millis(10_000))
        .expect("status during window");
    assert_eq!(during.status, CertificateStatus::Valid);
    assert!(during.is_valid());

    let before = registry
        .certificate_status(product_id(), record.certificate_id, Timestamp::from_unix_millis(9_999))
        .expect("status before window");
    assert_eq!(before.status, CertificateStatus::NotYetValid);

    let after = registry
        .certificate_status(
            product_id(),
            record.certificate_id,
            Timestamp::from_unix_millis(10_000 + YEAR_MILLIS),
        )
        .expect("status after window");
    assert_eq!(after.status, CertificateStatus::Expired);
}

/// Verifies unknown certificate identifiers fail closed.
#[test]
fn certificate_status_rejects_unknown_certificate() {
    let registry = build_registry();
    register_sample_product(&registry);

    let error = registry
        .certificate_status(
            product_id(),
            provenance_core::CertificateId::from_raw(7).expect("nonzero certificate id"),
            Timestamp::from_unix_millis(10_000),
        )
        .expect_err("unknown certificate");
    assert_eq!(error.code(), "CERTIFICATE_NOT_FOUND");
}

/// Verifies raw-material sources are admitted with the supplied fields.
#[test]
fn add_material_source_creates_unverified_record() {
    let registry = build_registry();
    register_sample_product(&registry);

    let record = registry.add_material_source(&source_request(1)).expect("add source");
    assert!(!record.verified());

    let fetched = registry
        .material_source(product_id(), SourceId::from_raw(1).expect("nonzero source id"))
        .expect("material source");
    assert_eq!(fetched.source_name, "Steel Supplier Inc");
    assert_eq!(fetched.material_type, "Steel");
    assert_eq!(fetched.quantity, 100);
}

/// Verifies duplicate source identifiers within a product are rejected.
#[test]
fn add_material_source_rejects_duplicate_identifier() {
    let registry = build_registry();
    register_sample_product(&registry);

    registry.add_material_source(&source_request(1)).expect("add source");
    let error = registry.add_material_source(&source_request(1)).expect_err("duplicate source");
    assert_eq!(error.code(), "SOURCE_EXISTS");
}

/// Verifies source verification marks the record and rejects repeats.
#[test]
fn verify_material_source_marks_once() {
    let registry = build_registry();
    register_sample_product(&registry);
    registry.add_material_source(&source_request(1)).expect("add source");

    let request = VerifyMaterialSourceRequest {
        product_id: product_id(),
        source_id: SourceId::from_raw(1).expect("nonzero source id"),
        coordinator_id: verifier_id(),
        requested_at: Timestamp::from_unix_millis(6_000),
        correlation_id: None,
    };
    registry.verify_material_source(&request).expect("verify source");

    let fetched = registry
        .material_source(product_id(), request.source_id)
        .expect("material source");
    assert!(fetched.verified());

    let error = registry.verify_material_source(&request).expect_err("second verification");
    assert_eq!(error.code(), "ALREADY_VERIFIED");
}

/// Verifies verification of unknown sources fails closed.
#[test]
fn verify_material_source_rejects_unknown_source() {
    let registry = build_registry();
    register_sample_product(&registry);

    let error = registry
        .verify_material_source(&VerifyMaterialSourceRequest {
            product_id: product_id(),
            source_id: SourceId::from_raw(9).expect("nonzero source id"),
            coordinator_id: verifier_id(),
            requested_at: Timestamp::from_unix_millis(6_000),
            correlation_id: None,
        })
        .expect_err("unknown source");
    assert_eq!(error.code(), "SOURCE_NOT_FOUND");
}

/// Verifies every mutation appends one audit record with monotonic sequence.
#[test]
fn audit_log_sequences_are_monotonic() {
    let registry = build_registry();
    register_sample_product(&registry);
    registry.register_origin(&origin_request()).expect("register origin");
    registry
        .add_certificate(&certificate_request(10_000, 10_000 + YEAR_MILLIS))
        .expect("certificate");
    registry.add_material_source(&source_request(1)).expect("add source");
    registry
        .verify_origin(&VerifyOriginRequest {
            product_id: product_id(),
            coordinator_id: verifier_id(),
            requested_at: Timestamp::from_unix_millis(5_000),
            correlation_id: None,
        })
        .expect("verify origin");

    let provenance = registry.provenance_summary(product_id()).expect("summary");
    let seqs: Vec<u64> = provenance.audit_log.iter().map(|record| record.seq).collect();
    assert_eq!(seqs, vec![1, 2, 3, 4, 5]);
}
