// crates/provenance-core/src/runtime/store.rs
// ============================================================================
// Module: Provenance In-Memory Store
// Description: Simple in-memory store and directory for tests and examples.
// Purpose: Provide deterministic implementations without external deps.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! This module provides a simple in-memory implementation of
//! [`ProvenanceStore`] and a roster-backed [`CoordinatorDirectory`] for tests
//! and local demos. The in-memory store is not intended for production use.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use crate::core::Coordinator;
use crate::core::CoordinatorId;
use crate::core::ProductId;
use crate::core::ProductProvenance;
use crate::interfaces::CoordinatorDirectory;
use crate::interfaces::DirectoryError;
use crate::interfaces::ProvenanceStore;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// In-memory provenance store for tests and examples.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProvenanceStore {
    /// Provenance map protected by a mutex.
    products: Arc<Mutex<BTreeMap<ProductId, ProductProvenance>>>,
}

impl InMemoryProvenanceStore {
    /// Creates a new in-memory provenance store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            products: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }
}

impl ProvenanceStore for InMemoryProvenanceStore {
    fn load(&self, product_id: ProductId) -> Result<Option<ProductProvenance>, StoreError> {
        let guard = self
            .products
            .lock()
            .map_err(|_| StoreError::Store("provenance store mutex poisoned".to_string()))?;
        Ok(guard.get(&product_id).cloned())
    }

    fn save(&self, provenance: &ProductProvenance) -> Result<(), StoreError> {
        self.products
            .lock()
            .map_err(|_| StoreError::Store("provenance store mutex poisoned".to_string()))?
            .insert(provenance.product_id, provenance.clone());
        Ok(())
    }

    fn list_products(&self) -> Result<Vec<ProductId>, StoreError> {
        let guard = self
            .products
            .lock()
            .map_err(|_| StoreError::Store("provenance store mutex poisoned".to_string()))?;
        Ok(guard.keys().copied().collect())
    }
}

// ============================================================================
// SECTION: Shared Store Wrapper
// ============================================================================

/// Shared provenance store backed by an `Arc` trait object.
#[derive(Clone)]
pub struct SharedProvenanceStore {
    /// Inner store implementation.
    inner: Arc<dyn ProvenanceStore + Send + Sync>,
}

impl SharedProvenanceStore {
    /// Wraps a provenance store in a shared, clonable wrapper.
    #[must_use]
    pub fn from_store(store: impl ProvenanceStore + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// Wraps an existing shared store.
    #[must_use]
    pub const fn new(store: Arc<dyn ProvenanceStore + Send + Sync>) -> Self {
        Self {
            inner: store,
        }
    }
}

impl ProvenanceStore for SharedProvenanceStore {
    fn load(&self, product_id: ProductId) -> Result<Option<ProductProvenance>, StoreError> {
        self.inner.load(product_id)
    }

    fn save(&self, provenance: &ProductProvenance) -> Result<(), StoreError> {
        self.inner.save(provenance)
    }

    fn list_products(&self) -> Result<Vec<ProductId>, StoreError> {
        self.inner.list_products()
    }
}

// ============================================================================
// SECTION: Static Coordinator Directory
// ============================================================================

/// Coordinator directory backed by a fixed roster.
///
/// # Invariants
/// - Roster entries with empty role sets are rejected at construction.
#[derive(Debug, Default, Clone)]
pub struct StaticCoordinatorDirectory {
    /// Roster entries keyed by coordinator identifier.
    roster: BTreeMap<CoordinatorId, Coordinator>,
}

impl StaticCoordinatorDirectory {
    /// Builds a directory from a coordinator roster.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] on duplicate identifiers or empty role sets.
    pub fn from_roster(entries: Vec<Coordinator>) -> Result<Self, DirectoryError> {
        let mut roster = BTreeMap::new();
        for entry in entries {
            if entry.roles.is_empty() {
                return Err(DirectoryError::Directory(format!(
                    "coordinator {} has no roles",
                    entry.coordinator_id
                )));
            }
            if roster.insert(entry.coordinator_id, entry.clone()).is_some() {
                return Err(DirectoryError::Directory(format!(
                    "duplicate coordinator id: {}",
                    entry.coordinator_id
                )));
            }
        }
        Ok(Self {
            roster,
        })
    }

    /// Returns the number of roster entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roster.len()
    }

    /// Returns true when the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }
}

impl CoordinatorDirectory for StaticCoordinatorDirectory {
    fn resolve(
        &self,
        coordinator_id: CoordinatorId,
    ) -> Result<Option<Coordinator>, DirectoryError> {
        Ok(self.roster.get(&coordinator_id).cloned())
    }
}
