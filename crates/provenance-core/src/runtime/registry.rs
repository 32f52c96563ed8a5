// crates/provenance-core/src/runtime/registry.rs
// ============================================================================
// Module: Provenance Registry Engine
// Description: Deterministic origin, certificate, and source operations.
// Purpose: Execute ledger mutations with authorization, validation, and audit.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! The registry engine is the single canonical execution path for the
//! ledger. All API surfaces must call into these methods to preserve
//! invariance and auditability. Every mutation follows the same shape:
//! authorize the coordinator, validate the request, mutate the record,
//! append an audit entry, and save the snapshot.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::AuditRecord;
use crate::core::CertificateFingerprint;
use crate::core::CertificateId;
use crate::core::CertificateRecord;
use crate::core::CertificateStatus;
use crate::core::CoordinatorId;
use crate::core::CorrelationId;
use crate::core::FingerprintError;
use crate::core::MaterialSourceRecord;
use crate::core::OriginRecord;
use crate::core::ProductId;
use crate::core::ProductProvenance;
use crate::core::RegistryAction;
use crate::core::SourceId;
use crate::core::Timestamp;
use crate::core::VerificationMark;
use crate::interfaces::CoordinatorDirectory;
use crate::interfaces::DirectoryError;
use crate::interfaces::ProvenanceStore;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Default maximum length of any free-text field, in bytes.
pub const DEFAULT_MAX_TEXT_FIELD_LENGTH: usize = 512;
/// Default maximum number of certificates per product.
pub const DEFAULT_MAX_CERTIFICATES_PER_PRODUCT: usize = 256;
/// Default maximum number of raw-material sources per product.
pub const DEFAULT_MAX_SOURCES_PER_PRODUCT: usize = 1_024;

/// Hard limits applied by the registry engine.
///
/// # Invariants
/// - All limits are greater than zero; enforced by [`ProvenanceRegistry::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryLimits {
    /// Maximum length of any free-text field, in bytes.
    pub max_text_field_length: usize,
    /// Maximum number of certificates per product.
    pub max_certificates_per_product: usize,
    /// Maximum number of raw-material sources per product.
    pub max_sources_per_product: usize,
}

impl Default for RegistryLimits {
    fn default() -> Self {
        Self {
            max_text_field_length: DEFAULT_MAX_TEXT_FIELD_LENGTH,
            max_certificates_per_product: DEFAULT_MAX_CERTIFICATES_PER_PRODUCT,
            max_sources_per_product: DEFAULT_MAX_SOURCES_PER_PRODUCT,
        }
    }
}

// ============================================================================
// SECTION: Requests
// ============================================================================

/// Request to register a product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterProductRequest {
    /// Product identifier to register.
    pub product_id: ProductId,
    /// Coordinator performing the registration.
    pub coordinator_id: CoordinatorId,
    /// Human-readable product name.
    pub product_name: String,
    /// Request timestamp.
    pub requested_at: Timestamp,
    /// Optional correlation identifier.
    pub correlation_id: Option<CorrelationId>,
}

/// Request to register a manufacturing origin for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterOriginRequest {
    /// Product the origin belongs to.
    pub product_id: ProductId,
    /// Coordinator performing the registration.
    pub coordinator_id: CoordinatorId,
    /// Manufacturer name.
    pub manufacturer: String,
    /// Manufacturing location description.
    pub manufacturing_location: String,
    /// Raw-materials description.
    pub raw_materials: String,
    /// Manufacturing date supplied by the caller.
    pub manufacturing_date: Timestamp,
    /// Request timestamp.
    pub requested_at: Timestamp,
    /// Optional correlation identifier.
    pub correlation_id: Option<CorrelationId>,
}

/// Request to verify a registered origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyOriginRequest {
    /// Product whose origin is verified.
    pub product_id: ProductId,
    /// Coordinator performing the verification.
    pub coordinator_id: CoordinatorId,
    /// Request timestamp.
    pub requested_at: Timestamp,
    /// Optional correlation identifier.
    pub correlation_id: Option<CorrelationId>,
}

/// Request to attach a certificate to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddCertificateRequest {
    /// Product the certificate belongs to.
    pub product_id: ProductId,
    /// Coordinator attaching the certificate.
    pub coordinator_id: CoordinatorId,
    /// Certificate type label.
    pub certificate_type: String,
    /// Issuing body name.
    pub issuer: String,
    /// Issue date of the certificate.
    pub issue_date: Timestamp,
    /// Expiry date of the certificate.
    pub expiry_date: Timestamp,
    /// Fixed-size content fingerprint of the certificate document.
    pub fingerprint: CertificateFingerprint,
    /// Request timestamp.
    pub requested_at: Timestamp,
    /// Optional correlation identifier.
    pub correlation_id: Option<CorrelationId>,
}

/// Request to attach a raw-material source to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddMaterialSourceRequest {
    /// Product the source belongs to.
    pub product_id: ProductId,
    /// Coordinator attaching the source.
    pub coordinator_id: CoordinatorId,
    /// Source identifier, unique within the product.
    pub source_id: SourceId,
    /// Supplier name.
    pub source_name: String,
    /// Supplier location description.
    pub source_location: String,
    /// Material type supplied.
    pub material_type: String,
    /// Quantity of material supplied, in supplier units.
    pub quantity: u64,
    /// Request timestamp.
    pub requested_at: Timestamp,
    /// Optional correlation identifier.
    pub correlation_id: Option<CorrelationId>,
}

/// Request to verify a raw-material source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyMaterialSourceRequest {
    /// Product the source belongs to.
    pub product_id: ProductId,
    /// Source identifier to verify.
    pub source_id: SourceId,
    /// Coordinator performing the verification.
    pub coordinator_id: CoordinatorId,
    /// Request timestamp.
    pub requested_at: Timestamp,
    /// Optional correlation identifier.
    pub correlation_id: Option<CorrelationId>,
}

// ============================================================================
// SECTION: Results
// ============================================================================

/// Certificate validity report at a supplied instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateStatusReport {
    /// Certificate identifier inspected.
    pub certificate_id: CertificateId,
    /// Validity classification at `checked_at`.
    pub status: CertificateStatus,
    /// Instant the certificate was classified against.
    pub checked_at: Timestamp,
}

impl CertificateStatusReport {
    /// Returns true when the certificate was valid at the checked instant.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self.status, CertificateStatus::Valid)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Registry execution errors.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Coordinator is unknown or lacks the role required for the action.
    #[error("coordinator {coordinator_id} is not authorized for {action}", action = .action.as_str())]
    Unauthorized {
        /// Coordinator that attempted the action.
        coordinator_id: CoordinatorId,
        /// Action that was attempted.
        action: RegistryAction,
    },
    /// Product is not present in the catalog.
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),
    /// Product identifier is already cataloged.
    #[error("product already exists: {0}")]
    ProductAlreadyExists(ProductId),
    /// Product already has a registered origin.
    #[error("origin already registered for product: {0}")]
    OriginAlreadyRegistered(ProductId),
    /// Product has no registered origin.
    #[error("no origin registered for product: {0}")]
    OriginNotRegistered(ProductId),
    /// Origin has already been verified.
    #[error("origin already verified for product: {0}")]
    OriginAlreadyVerified(ProductId),
    /// Raw-material source has already been verified.
    #[error("source {source_id} already verified for product {product_id}")]
    SourceAlreadyVerified {
        /// Product the source belongs to.
        product_id: ProductId,
        /// Source identifier.
        source_id: SourceId,
    },
    /// Certificate payload failed validation.
    #[error("invalid certificate: {0}")]
    InvalidCertificate(String),
    /// Certificate identifier is unknown for the product.
    #[error("certificate {certificate_id} not found for product {product_id}")]
    CertificateNotFound {
        /// Product inspected.
        product_id: ProductId,
        /// Certificate identifier requested.
        certificate_id: CertificateId,
    },
    /// Source identifier is already attached to the product.
    #[error("source {source_id} already exists for product {product_id}")]
    SourceAlreadyExists {
        /// Product the source belongs to.
        product_id: ProductId,
        /// Source identifier.
        source_id: SourceId,
    },
    /// Source identifier is unknown for the product.
    #[error("source {source_id} not found for product {product_id}")]
    SourceNotFound {
        /// Product inspected.
        product_id: ProductId,
        /// Source identifier requested.
        source_id: SourceId,
    },
    /// A request field failed validation.
    #[error("invalid field {field}: {reason}")]
    InvalidField {
        /// Field that failed validation.
        field: &'static str,
        /// Reason the field was rejected.
        reason: String,
    },
    /// A configured limit was exceeded.
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),
    /// Registry limits configuration is invalid.
    #[error("invalid registry limits: {0}")]
    InvalidLimits(String),
    /// Coordinator directory error.
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    /// Provenance store error.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<FingerprintError> for RegistryError {
    fn from(error: FingerprintError) -> Self {
        Self::InvalidCertificate(error.to_string())
    }
}

impl RegistryError {
    /// Returns the stable error code for API surfaces.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::ProductNotFound(_) => "PRODUCT_NOT_FOUND",
            Self::ProductAlreadyExists(_) => "PRODUCT_EXISTS",
            Self::OriginAlreadyRegistered(_) => "ORIGIN_EXISTS",
            Self::OriginNotRegistered(_) => "ORIGIN_NOT_REGISTERED",
            Self::OriginAlreadyVerified(_) | Self::SourceAlreadyVerified { .. } => {
                "ALREADY_VERIFIED"
            }
            Self::InvalidCertificate(_) => "INVALID_CERTIFICATE",
            Self::CertificateNotFound { .. } => "CERTIFICATE_NOT_FOUND",
            Self::SourceAlreadyExists { .. } => "SOURCE_EXISTS",
            Self::SourceNotFound { .. } => "SOURCE_NOT_FOUND",
            Self::InvalidField { .. } => "INVALID_FIELD",
            Self::LimitExceeded(_) => "LIMIT_EXCEEDED",
            Self::InvalidLimits(_) => "INVALID_LIMITS",
            Self::Directory(_) => "DIRECTORY_ERROR",
            Self::Store(_) => "STORE_ERROR",
        }
    }
}

// ============================================================================
// SECTION: Registry Engine
// ============================================================================

/// Registry engine implementing deterministic ledger operations.
pub struct ProvenanceRegistry<S, D> {
    /// Provenance store implementation.
    store: S,
    /// Coordinator directory implementation.
    directory: D,
    /// Hard limits applied to requests.
    limits: RegistryLimits,
}

impl<S, D> ProvenanceRegistry<S, D>
where
    S: ProvenanceStore,
    D: CoordinatorDirectory,
{
    /// Creates a new registry engine.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidLimits`] when any limit is zero.
    pub fn new(store: S, directory: D, limits: RegistryLimits) -> Result<Self, RegistryError> {
        if limits.max_text_field_length == 0 {
            return Err(RegistryError::InvalidLimits(
                "max_text_field_length must be greater than zero".to_string(),
            ));
        }
        if limits.max_certificates_per_product == 0 {
            return Err(RegistryError::InvalidLimits(
                "max_certificates_per_product must be greater than zero".to_string(),
            ));
        }
        if limits.max_sources_per_product == 0 {
            return Err(RegistryError::InvalidLimits(
                "max_sources_per_product must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            store,
            directory,
            limits,
        })
    }

    /// Registers a product in the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when authorization, validation, or storage fails.
    pub fn register_product(
        &self,
        request: &RegisterProductRequest,
    ) -> Result<ProductProvenance, RegistryError> {
        self.authorize(request.coordinator_id, RegistryAction::RegisterProduct)?;
        let product_name = self.validated_text("product_name", &request.product_name)?;
        if self.store.load(request.product_id)?.is_some() {
            return Err(RegistryError::ProductAlreadyExists(request.product_id));
        }

        let mut provenance = ProductProvenance::new(
            request.product_id,
            product_name,
            request.coordinator_id,
            request.requested_at,
        );
        append_audit(
            &mut provenance,
            RegistryAction::RegisterProduct,
            request.coordinator_id,
            request.requested_at,
            request.correlation_id.clone(),
        );
        self.store.save(&provenance)?;
        Ok(provenance)
    }

    /// Registers a manufacturing origin for a product.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when authorization, validation, or storage fails.
    pub fn register_origin(
        &self,
        request: &RegisterOriginRequest,
    ) -> Result<OriginRecord, RegistryError> {
        self.authorize(request.coordinator_id, RegistryAction::RegisterOrigin)?;
        let manufacturer = self.validated_text("manufacturer", &request.manufacturer)?;
        let manufacturing_location =
            self.validated_text("manufacturing_location", &request.manufacturing_location)?;
        let raw_materials = self.validated_text("raw_materials", &request.raw_materials)?;

        let mut provenance = self.load_product(request.product_id)?;
        if provenance.origin.is_some() {
            return Err(RegistryError::OriginAlreadyRegistered(request.product_id));
        }

        let origin = OriginRecord {
            registered_by: request.coordinator_id,
            manufacturer,
            manufacturing_location,
            raw_materials,
            manufacturing_date: request.manufacturing_date,
            registered_at: request.requested_at,
            verification: None,
        };
        provenance.origin = Some(origin.clone());
        append_audit(
            &mut provenance,
            RegistryAction::RegisterOrigin,
            request.coordinator_id,
            request.requested_at,
            request.correlation_id.clone(),
        );
        self.store.save(&provenance)?;
        Ok(origin)
    }

    /// Verifies a registered origin.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::OriginAlreadyVerified`] when the origin has
    /// already been verified, and other [`RegistryError`] variants when
    /// authorization or storage fails.
    pub fn verify_origin(
        &self,
        request: &VerifyOriginRequest,
    ) -> Result<VerificationMark, RegistryError> {
        self.authorize(request.coordinator_id, RegistryAction::VerifyOrigin)?;
        let mut provenance = self.load_product(request.product_id)?;
        let origin = provenance
            .origin
            .as_mut()
            .ok_or(RegistryError::OriginNotRegistered(request.product_id))?;
        if origin.verification.is_some() {
            return Err(RegistryError::OriginAlreadyVerified(request.product_id));
        }

        let mark = VerificationMark {
            verifier_id: request.coordinator_id,
            verified_at: request.requested_at,
        };
        origin.verification = Some(mark);
        append_audit(
            &mut provenance,
            RegistryAction::VerifyOrigin,
            request.coordinator_id,
            request.requested_at,
            request.correlation_id.clone(),
        );
        self.store.save(&provenance)?;
        Ok(mark)
    }

    /// Attaches a certificate to a product.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidCertificate`] when the validity window
    /// is not strictly positive, and other [`RegistryError`] variants when
    /// authorization, validation, or storage fails.
    pub fn add_certificate(
        &self,
        request: &AddCertificateRequest,
    ) -> Result<CertificateRecord, RegistryError> {
        self.authorize(request.coordinator_id, RegistryAction::AddCertificate)?;
        let certificate_type = self.validated_text("certificate_type", &request.certificate_type)?;
        let issuer = self.validated_text("issuer", &request.issuer)?;
        if request.expiry_date <= request.issue_date {
            return Err(RegistryError::InvalidCertificate(format!(
                "expiry date {} is not after issue date {}",
                request.expiry_date, request.issue_date
            )));
        }

        let mut provenance = self.load_product(request.product_id)?;
        if provenance.certificates.len() >= self.limits.max_certificates_per_product {
            return Err(RegistryError::LimitExceeded(format!(
                "product {} already holds {} certificates (max {})",
                request.product_id,
                provenance.certificates.len(),
                self.limits.max_certificates_per_product
            )));
        }

        let certificate_id = CertificateId::from_raw(provenance.next_certificate_seq)
            .ok_or_else(|| {
                RegistryError::LimitExceeded("certificate identifier space exhausted".to_string())
            })?;
        let record = CertificateRecord {
            certificate_id,
            added_by: request.coordinator_id,
            certificate_type,
            issuer,
            issue_date: request.issue_date,
            expiry_date: request.expiry_date,
            fingerprint: request.fingerprint.clone(),
            added_at: request.requested_at,
        };
        provenance.certificates.push(record.clone());
        provenance.next_certificate_seq = provenance.next_certificate_seq.saturating_add(1);
        append_audit(
            &mut provenance,
            RegistryAction::AddCertificate,
            request.coordinator_id,
            request.requested_at,
            request.correlation_id.clone(),
        );
        self.store.save(&provenance)?;
        Ok(record)
    }

    /// Classifies a certificate against the supplied instant.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::CertificateNotFound`] when the certificate is
    /// unknown, and other [`RegistryError`] variants when storage fails.
    pub fn certificate_status(
        &self,
        product_id: ProductId,
        certificate_id: CertificateId,
        at: Timestamp,
    ) -> Result<CertificateStatusReport, RegistryError> {
        let provenance = self.load_product(product_id)?;
        let record = provenance.certificate(certificate_id).ok_or(
            RegistryError::CertificateNotFound {
                product_id,
                certificate_id,
            },
        )?;
        Ok(CertificateStatusReport {
            certificate_id,
            status: record.status_at(at),
            checked_at: at,
        })
    }

    /// Attaches a raw-material source to a product.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::SourceAlreadyExists`] on duplicate source
    /// identifiers, and other [`RegistryError`] variants when authorization,
    /// validation, or storage fails.
    pub fn add_material_source(
        &self,
        request: &AddMaterialSourceRequest,
    ) -> Result<MaterialSourceRecord, RegistryError> {
        self.authorize(request.coordinator_id, RegistryAction::AddMaterialSource)?;
        let source_name = self.validated_text("source_name", &request.source_name)?;
        let source_location = self.validated_text("source_location", &request.source_location)?;
        let material_type = self.validated_text("material_type", &request.material_type)?;

        let mut provenance = self.load_product(request.product_id)?;
        if provenance.source(request.source_id).is_some() {
            return Err(RegistryError::SourceAlreadyExists {
                product_id: request.product_id,
                source_id: request.source_id,
            });
        }
        if provenance.sources.len() >= self.limits.max_sources_per_product {
            return Err(RegistryError::LimitExceeded(format!(
                "product {} already holds {} sources (max {})",
                request.product_id,
                provenance.sources.len(),
                self.limits.max_sources_per_product
            )));
        }

        let record = MaterialSourceRecord {
            source_id: request.source_id,
            added_by: request.coordinator_id,
            source_name,
            source_location,
            material_type,
            quantity: request.quantity,
            added_at: request.requested_at,
            verification: None,
        };
        provenance.sources.push(record.clone());
        append_audit(
            &mut provenance,
            RegistryAction::AddMaterialSource,
            request.coordinator_id,
            request.requested_at,
            request.correlation_id.clone(),
        );
        self.store.save(&provenance)?;
        Ok(record)
    }

    /// Verifies a raw-material source.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::SourceAlreadyVerified`] when the source has
    /// already been verified, and other [`RegistryError`] variants when
    /// authorization or storage fails.
    pub fn verify_material_source(
        &self,
        request: &VerifyMaterialSourceRequest,
    ) -> Result<VerificationMark, RegistryError> {
        self.authorize(request.coordinator_id, RegistryAction::VerifyMaterialSource)?;
        let mut provenance = self.load_product(request.product_id)?;
        let source = provenance.source_mut(request.source_id).ok_or(
            RegistryError::SourceNotFound {
                product_id: request.product_id,
                source_id: request.source_id,
            },
        )?;
        if source.verification.is_some() {
            return Err(RegistryError::SourceAlreadyVerified {
                product_id: request.product_id,
                source_id: request.source_id,
            });
        }

        let mark = VerificationMark {
            verifier_id: request.coordinator_id,
            verified_at: request.requested_at,
        };
        source.verification = Some(mark);
        append_audit(
            &mut provenance,
            RegistryAction::VerifyMaterialSource,
            request.coordinator_id,
            request.requested_at,
            request.correlation_id.clone(),
        );
        self.store.save(&provenance)?;
        Ok(mark)
    }

    /// Returns the origin record for a product.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::OriginNotRegistered`] when no origin exists,
    /// and other [`RegistryError`] variants when storage fails.
    pub fn product_origin(&self, product_id: ProductId) -> Result<OriginRecord, RegistryError> {
        let provenance = self.load_product(product_id)?;
        provenance.origin.ok_or(RegistryError::OriginNotRegistered(product_id))
    }

    /// Returns whether a product's origin has been verified.
    ///
    /// Products without a registered origin report `false`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when the product is unknown or storage fails.
    pub fn origin_verified(&self, product_id: ProductId) -> Result<bool, RegistryError> {
        let provenance = self.load_product(product_id)?;
        Ok(provenance.origin.as_ref().is_some_and(OriginRecord::verified))
    }

    /// Returns a raw-material source record for a product.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::SourceNotFound`] when the source is unknown,
    /// and other [`RegistryError`] variants when storage fails.
    pub fn material_source(
        &self,
        product_id: ProductId,
        source_id: SourceId,
    ) -> Result<MaterialSourceRecord, RegistryError> {
        let provenance = self.load_product(product_id)?;
        provenance.source(source_id).cloned().ok_or(RegistryError::SourceNotFound {
            product_id,
            source_id,
        })
    }

    /// Returns the full provenance record for a product.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::ProductNotFound`] when the product is unknown,
    /// and other [`RegistryError`] variants when storage fails.
    pub fn provenance_summary(
        &self,
        product_id: ProductId,
    ) -> Result<ProductProvenance, RegistryError> {
        self.load_product(product_id)
    }

    /// Lists all product identifiers known to the ledger.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when storage enumeration fails.
    pub fn list_products(&self) -> Result<Vec<ProductId>, RegistryError> {
        Ok(self.store.list_products()?)
    }

    /// Checks that a coordinator exists and holds the role for the action.
    fn authorize(
        &self,
        coordinator_id: CoordinatorId,
        action: RegistryAction,
    ) -> Result<(), RegistryError> {
        let coordinator = self.directory.resolve(coordinator_id)?.ok_or(
            RegistryError::Unauthorized {
                coordinator_id,
                action,
            },
        )?;
        if coordinator.has_role(action.required_role()) {
            Ok(())
        } else {
            Err(RegistryError::Unauthorized {
                coordinator_id,
                action,
            })
        }
    }

    /// Loads a product record, failing closed when it is missing.
    fn load_product(&self, product_id: ProductId) -> Result<ProductProvenance, RegistryError> {
        self.store.load(product_id)?.ok_or(RegistryError::ProductNotFound(product_id))
    }

    /// Validates a free-text field against emptiness and length limits.
    fn validated_text(
        &self,
        field: &'static str,
        value: &str,
    ) -> Result<String, RegistryError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(RegistryError::InvalidField {
                field,
                reason: "must not be empty".to_string(),
            });
        }
        if trimmed.len() > self.limits.max_text_field_length {
            return Err(RegistryError::LimitExceeded(format!(
                "{field} exceeds {} bytes",
                self.limits.max_text_field_length
            )));
        }
        Ok(trimmed.to_string())
    }
}

// ============================================================================
// SECTION: Audit Helpers
// ============================================================================

/// Appends an audit record for a completed mutation.
fn append_audit(
    provenance: &mut ProductProvenance,
    action: RegistryAction,
    actor_id: CoordinatorId,
    recorded_at: Timestamp,
    correlation_id: Option<CorrelationId>,
) {
    let seq = provenance.next_audit_seq();
    provenance.audit_log.push(AuditRecord {
        seq,
        action,
        actor_id,
        recorded_at,
        correlation_id,
    });
}
