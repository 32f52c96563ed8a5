// crates/provenance-core/src/core/records.rs
// ============================================================================
// Module: Provenance Ledger Records
// Description: Product provenance state, origin, certificates, and sources.
// Purpose: Capture deterministic provenance evolution for replay and audit.
// Dependencies: crate::core::{authority, hashing, identifiers, time}, serde
// ============================================================================

//! ## Overview
//! Product provenance captures the full history needed for offline audit:
//! the catalog entry, the manufacturing origin, attached certificates,
//! raw-material sources, and an append-only audit log. All state changes
//! are deterministic; verification marks are recorded exactly once.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::authority::RegistryAction;
use crate::core::hashing::CertificateFingerprint;
use crate::core::identifiers::CertificateId;
use crate::core::identifiers::CoordinatorId;
use crate::core::identifiers::CorrelationId;
use crate::core::identifiers::ProductId;
use crate::core::identifiers::SourceId;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Verification Marks
// ============================================================================

/// Verification mark recorded when a coordinator verifies a record.
///
/// # Invariants
/// - A mark is written at most once per record and never cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationMark {
    /// Coordinator that performed the verification.
    pub verifier_id: CoordinatorId,
    /// Timestamp when verification was recorded.
    pub verified_at: Timestamp,
}

// ============================================================================
// SECTION: Origin Records
// ============================================================================

/// Claimed manufacturing provenance record for a product.
///
/// # Invariants
/// - At most one origin exists per product.
/// - `verification` transitions from `None` to `Some` exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginRecord {
    /// Coordinator that registered the origin.
    pub registered_by: CoordinatorId,
    /// Manufacturer name.
    pub manufacturer: String,
    /// Manufacturing location description.
    pub manufacturing_location: String,
    /// Raw-materials description supplied at registration.
    pub raw_materials: String,
    /// Manufacturing date supplied by the caller.
    pub manufacturing_date: Timestamp,
    /// Timestamp when the origin was registered.
    pub registered_at: Timestamp,
    /// Verification mark, present once the origin is verified.
    pub verification: Option<VerificationMark>,
}

impl OriginRecord {
    /// Returns true when the origin has been verified.
    #[must_use]
    pub const fn verified(&self) -> bool {
        self.verification.is_some()
    }
}

// ============================================================================
// SECTION: Certificate Records
// ============================================================================

/// Quality or compliance attestation with a validity window.
///
/// # Invariants
/// - `expiry_date` is strictly after `issue_date`; enforced at admission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateRecord {
    /// Certificate identifier, sequential within the product.
    pub certificate_id: CertificateId,
    /// Coordinator that attached the certificate.
    pub added_by: CoordinatorId,
    /// Certificate type label (for example an ISO designation).
    pub certificate_type: String,
    /// Issuing body name.
    pub issuer: String,
    /// Issue date of the certificate.
    pub issue_date: Timestamp,
    /// Expiry date of the certificate.
    pub expiry_date: Timestamp,
    /// Fixed-size content fingerprint of the certificate document.
    pub fingerprint: CertificateFingerprint,
    /// Timestamp when the certificate was attached.
    pub added_at: Timestamp,
}

/// Validity classification of a certificate at a given instant.
///
/// # Invariants
/// - Variants are stable for serialization and contract matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificateStatus {
    /// The instant falls inside the validity window.
    Valid,
    /// The instant precedes the issue date.
    NotYetValid,
    /// The instant is at or past the expiry date.
    Expired,
}

impl CertificateRecord {
    /// Classifies the certificate against the supplied instant.
    ///
    /// The window is half-open: valid from `issue_date` inclusive up to
    /// `expiry_date` exclusive.
    #[must_use]
    pub fn status_at(&self, at: Timestamp) -> CertificateStatus {
        if at < self.issue_date {
            CertificateStatus::NotYetValid
        } else if at >= self.expiry_date {
            CertificateStatus::Expired
        } else {
            CertificateStatus::Valid
        }
    }
}

// ============================================================================
// SECTION: Raw-Material Sources
// ============================================================================

/// Supplier-level record of an input material used in a product.
///
/// # Invariants
/// - `source_id` is unique within the owning product.
/// - `verification` transitions from `None` to `Some` exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialSourceRecord {
    /// Source identifier, unique within the product.
    pub source_id: SourceId,
    /// Coordinator that attached the source.
    pub added_by: CoordinatorId,
    /// Supplier name.
    pub source_name: String,
    /// Supplier location description.
    pub source_location: String,
    /// Material type supplied.
    pub material_type: String,
    /// Quantity of material supplied, in supplier units.
    pub quantity: u64,
    /// Timestamp when the source was attached.
    pub added_at: Timestamp,
    /// Verification mark, present once the source is verified.
    pub verification: Option<VerificationMark>,
}

impl MaterialSourceRecord {
    /// Returns true when the source has been verified.
    #[must_use]
    pub const fn verified(&self) -> bool {
        self.verification.is_some()
    }
}

// ============================================================================
// SECTION: Audit Records
// ============================================================================

/// Append-only audit log entry for a provenance mutation.
///
/// # Invariants
/// - `seq` is monotonic within a product, starting at 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Monotonic sequence number assigned by the registry.
    pub seq: u64,
    /// Action that produced this entry.
    pub action: RegistryAction,
    /// Coordinator that performed the action.
    pub actor_id: CoordinatorId,
    /// Timestamp when the action was recorded.
    pub recorded_at: Timestamp,
    /// Optional correlation identifier from the originating request.
    pub correlation_id: Option<CorrelationId>,
}

// ============================================================================
// SECTION: Product Provenance
// ============================================================================

/// Full provenance state for a single product.
///
/// # Invariants
/// - `audit_log` is append-only and ordered by `seq`.
/// - Certificate identifiers are strictly increasing; `next_certificate_seq`
///   tracks the next raw value to allocate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductProvenance {
    /// Product identifier.
    pub product_id: ProductId,
    /// Human-readable product name.
    pub product_name: String,
    /// Coordinator that registered the product.
    pub registered_by: CoordinatorId,
    /// Timestamp when the product entered the catalog.
    pub registered_at: Timestamp,
    /// Manufacturing origin, present once registered.
    pub origin: Option<OriginRecord>,
    /// Certificates attached to the product, ordered by identifier.
    pub certificates: Vec<CertificateRecord>,
    /// Raw-material sources attached to the product, ordered by insertion.
    pub sources: Vec<MaterialSourceRecord>,
    /// Next raw certificate identifier value to allocate (starts at 1).
    pub next_certificate_seq: u64,
    /// Append-only audit log.
    pub audit_log: Vec<AuditRecord>,
}

impl ProductProvenance {
    /// Creates an empty provenance record for a newly cataloged product.
    #[must_use]
    pub fn new(
        product_id: ProductId,
        product_name: String,
        registered_by: CoordinatorId,
        registered_at: Timestamp,
    ) -> Self {
        Self {
            product_id,
            product_name,
            registered_by,
            registered_at,
            origin: None,
            certificates: Vec::new(),
            sources: Vec::new(),
            next_certificate_seq: 1,
            audit_log: Vec::new(),
        }
    }

    /// Returns the certificate with the given identifier, if present.
    #[must_use]
    pub fn certificate(&self, certificate_id: CertificateId) -> Option<&CertificateRecord> {
        self.certificates.iter().find(|record| record.certificate_id == certificate_id)
    }

    /// Returns the raw-material source with the given identifier, if present.
    #[must_use]
    pub fn source(&self, source_id: SourceId) -> Option<&MaterialSourceRecord> {
        self.sources.iter().find(|record| record.source_id == source_id)
    }

    /// Returns a mutable reference to the source with the given identifier.
    #[must_use]
    pub fn source_mut(&mut self, source_id: SourceId) -> Option<&mut MaterialSourceRecord> {
        self.sources.iter_mut().find(|record| record.source_id == source_id)
    }

    /// Returns the next audit sequence number for this product.
    #[must_use]
    pub fn next_audit_seq(&self) -> u64 {
        self.audit_log.last().map_or(1, |record| record.seq.saturating_add(1))
    }
}
