// crates/provenance-core/src/core/mod.rs
// ============================================================================
// Module: Provenance Ledger Core Types
// Description: Canonical ledger record and identifier structures.
// Purpose: Provide stable, serializable types for provenance records and logs.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Core types define the product catalog, origin records, certificates,
//! raw-material sources, and audit logs. These types are the canonical
//! source of truth for any derived API surfaces.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod authority;
pub mod hashing;
pub mod identifiers;
pub mod records;
pub mod time;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use authority::Coordinator;
pub use authority::CoordinatorRole;
pub use authority::RegistryAction;
pub use hashing::CERTIFICATE_FINGERPRINT_BYTES;
pub use hashing::CertificateFingerprint;
pub use hashing::DEFAULT_HASH_ALGORITHM;
pub use hashing::FingerprintError;
pub use hashing::HashAlgorithm;
pub use hashing::HashDigest;
pub use identifiers::CertificateId;
pub use identifiers::CoordinatorId;
pub use identifiers::CorrelationId;
pub use identifiers::ProductId;
pub use identifiers::SourceId;
pub use records::AuditRecord;
pub use records::CertificateRecord;
pub use records::CertificateStatus;
pub use records::MaterialSourceRecord;
pub use records::OriginRecord;
pub use records::ProductProvenance;
pub use records::VerificationMark;
pub use time::Timestamp;
