// system-tests/tests/authorization.rs
// ============================================================================
// Module: Authorization Matrix Tests
// Description: Role coverage for every mutating registry operation.
// Purpose: Ensure the coordinator directory fails closed across the matrix.
// Dependencies: system-tests, provenance-core
// ============================================================================

//! ## Overview
//! Exercises the role matrix: registrars cannot verify, verifiers cannot
//! register, dual-role coordinators can do both, and unknown principals are
//! rejected everywhere.

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

use provenance_core::CoordinatorId;
use provenance_core::ProductId;
use provenance_core::ProvenanceRegistry;
use provenance_core::RegisterOriginRequest;
use provenance_core::RegisterProductRequest;
use provenance_core::SharedProvenanceStore;
use provenance_core::StaticCoordinatorDirectory;
use provenance_core::Timestamp;
use provenance_core::VerifyOriginRequest;
use system_tests::config::build_registry;
use system_tests::config::memory_config;

fn coordinator(raw: u64) -> CoordinatorId {
    CoordinatorId::from_raw(raw).expect("nonzero coordinator id")
}

fn seeded_registry() -> ProvenanceRegistry<SharedProvenanceStore, StaticCoordinatorDirectory> {
    let config = memory_config().expect("memory config");
    let registry = build_registry(&config).expect("registry");
    registry
        .register_product(&RegisterProductRequest {
            product_id: ProductId::from_raw(1).expect("nonzero product id"),
            coordinator_id: coordinator(1),
            product_name: "Alloy Bicycle Frame".to_string(),
            requested_at: Timestamp::from_unix_millis(1_000),
            correlation_id: None,
        })
        .expect("register product");
    registry
}

fn origin_request(coordinator_id: CoordinatorId) -> RegisterOriginRequest {
    RegisterOriginRequest {
        product_id: ProductId::from_raw(1).expect("nonzero product id"),
        coordinator_id,
        manufacturer: "ABC Manufacturing Ltd".to_string(),
        manufacturing_location: "Factory Complex".to_string(),
        raw_materials: "Steel, Aluminum".to_string(),
        manufacturing_date: Timestamp::from_unix_millis(500),
        requested_at: Timestamp::from_unix_millis(2_000),
        correlation_id: None,
    }
}

fn verify_request(coordinator_id: CoordinatorId) -> VerifyOriginRequest {
    VerifyOriginRequest {
        product_id: ProductId::from_raw(1).expect("nonzero product id"),
        coordinator_id,
        requested_at: Timestamp::from_unix_millis(3_000),
        correlation_id: None,
    }
}

/// Verifies verifier-only coordinators cannot register origins.
#[test]
fn verifier_cannot_register_origin() {
    let registry = seeded_registry();
    let error = registry.register_origin(&origin_request(coordinator(2))).expect_err("denied");
    assert_eq!(error.code(), "UNAUTHORIZED");
}

/// Verifies registrar-only coordinators cannot verify origins.
#[test]
fn registrar_cannot_verify_origin() {
    let registry = seeded_registry();
    registry.register_origin(&origin_request(coordinator(1))).expect("register origin");
    let error = registry.verify_origin(&verify_request(coordinator(1))).expect_err("denied");
    assert_eq!(error.code(), "UNAUTHORIZED");
}

/// Verifies dual-role coordinators can register and verify.
#[test]
fn dual_role_coordinator_covers_both_actions() {
    let registry = seeded_registry();
    registry.register_origin(&origin_request(coordinator(3))).expect("register origin");
    registry.verify_origin(&verify_request(coordinator(3))).expect("verify origin");
}

/// Verifies unknown coordinators are rejected on every operation.
#[test]
fn unknown_coordinator_is_rejected_everywhere() {
    let registry = seeded_registry();
    let unknown = coordinator(999);

    let register = registry.register_origin(&origin_request(unknown)).expect_err("denied");
    assert_eq!(register.code(), "UNAUTHORIZED");

    let verify = registry.verify_origin(&verify_request(unknown)).expect_err("denied");
    assert_eq!(verify.code(), "UNAUTHORIZED");
}
