// crates/provenance-core/src/interfaces/mod.rs
// ============================================================================
// Module: Provenance Ledger Interfaces
// Description: Backend-agnostic interfaces for storage and authorization.
// Purpose: Define the contract surfaces used by the ledger registry engine.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Interfaces define how the ledger integrates with external systems without
//! embedding backend-specific details. Implementations must be deterministic
//! and fail closed on missing or invalid data.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::Coordinator;
use crate::core::CoordinatorId;
use crate::core::ProductId;
use crate::core::ProductProvenance;

// ============================================================================
// SECTION: Provenance Store
// ============================================================================

/// Provenance store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store I/O error.
    #[error("provenance store io error: {0}")]
    Io(String),
    /// Store data is corrupted or fails integrity checks.
    #[error("provenance store corruption: {0}")]
    Corrupt(String),
    /// Store data version is incompatible.
    #[error("provenance store version mismatch: {0}")]
    VersionMismatch(String),
    /// Store data is invalid.
    #[error("provenance store invalid data: {0}")]
    Invalid(String),
    /// Store reported an error.
    #[error("provenance store error: {0}")]
    Store(String),
}

/// Provenance store for persistence of per-product records.
pub trait ProvenanceStore {
    /// Loads the provenance record for a product.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when loading fails.
    fn load(&self, product_id: ProductId) -> Result<Option<ProductProvenance>, StoreError>;

    /// Saves a provenance record, replacing any prior snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when saving fails.
    fn save(&self, provenance: &ProductProvenance) -> Result<(), StoreError>;

    /// Lists all product identifiers known to the store, in ascending order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when enumeration fails.
    fn list_products(&self) -> Result<Vec<ProductId>, StoreError>;
}

// ============================================================================
// SECTION: Coordinator Directory
// ============================================================================

/// Coordinator directory errors.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Directory backend reported an error.
    #[error("coordinator directory error: {0}")]
    Directory(String),
}

/// Directory resolving coordinator identities and roles.
///
/// Lookups returning `None` mean the coordinator is unknown; callers must
/// treat unknown coordinators as unauthorized.
pub trait CoordinatorDirectory {
    /// Resolves a coordinator roster entry by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] when the lookup backend fails.
    fn resolve(&self, coordinator_id: CoordinatorId) -> Result<Option<Coordinator>, DirectoryError>;
}
