// crates/provenance-core/src/core/authority.rs
// ============================================================================
// Module: Provenance Ledger Authority Model
// Description: Coordinator roles and the actions they authorize.
// Purpose: Provide the role vocabulary consumed by coordinator directories.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Coordinators are the principals acting on the ledger. Each coordinator
//! carries a set of roles; registry operations map to actions, and the
//! directory decides whether a coordinator's roles cover the requested
//! action. Unknown coordinators fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::CoordinatorId;

// ============================================================================
// SECTION: Roles
// ============================================================================

/// Role granted to a coordinator.
///
/// # Invariants
/// - Variants are stable for serialization and config matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinatorRole {
    /// May register products and origins, and attach certificates and sources.
    Registrar,
    /// May verify origins and raw-material sources.
    Verifier,
}

// ============================================================================
// SECTION: Actions
// ============================================================================

/// Action requested against the registry, used for authorization decisions.
///
/// # Invariants
/// - Variants are stable for serialization and audit logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryAction {
    /// Register a product in the catalog.
    RegisterProduct,
    /// Register a manufacturing origin for a product.
    RegisterOrigin,
    /// Verify a registered origin.
    VerifyOrigin,
    /// Attach a certificate to a product.
    AddCertificate,
    /// Attach a raw-material source to a product.
    AddMaterialSource,
    /// Verify a raw-material source.
    VerifyMaterialSource,
}

impl RegistryAction {
    /// Returns the role required to perform this action.
    #[must_use]
    pub const fn required_role(self) -> CoordinatorRole {
        match self {
            Self::RegisterProduct
            | Self::RegisterOrigin
            | Self::AddCertificate
            | Self::AddMaterialSource => CoordinatorRole::Registrar,
            Self::VerifyOrigin | Self::VerifyMaterialSource => CoordinatorRole::Verifier,
        }
    }

    /// Returns the stable action name used in audit records.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RegisterProduct => "register_product",
            Self::RegisterOrigin => "register_origin",
            Self::VerifyOrigin => "verify_origin",
            Self::AddCertificate => "add_certificate",
            Self::AddMaterialSource => "add_material_source",
            Self::VerifyMaterialSource => "verify_material_source",
        }
    }
}

// ============================================================================
// SECTION: Coordinator Records
// ============================================================================

/// Coordinator roster entry resolved by directories.
///
/// # Invariants
/// - `roles` is non-empty for any coordinator admitted to a directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinator {
    /// Coordinator identifier.
    pub coordinator_id: CoordinatorId,
    /// Human-readable coordinator name.
    pub name: String,
    /// Roles granted to the coordinator.
    pub roles: Vec<CoordinatorRole>,
}

impl Coordinator {
    /// Returns true when the coordinator holds the given role.
    #[must_use]
    pub fn has_role(&self, role: CoordinatorRole) -> bool {
        self.roles.contains(&role)
    }
}
