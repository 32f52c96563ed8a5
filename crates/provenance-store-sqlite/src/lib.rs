// crates/provenance-store-sqlite/src/lib.rs
// ============================================================================
// Module: SQLite Provenance Store
// Description: Durable ProvenanceStore backend using SQLite WAL.
// Purpose: Provide production-grade persistence for ledger provenance records.
// Dependencies: provenance-core, rusqlite
// ============================================================================

//! ## Overview
//! This crate provides a SQLite-backed [`ProvenanceStore`] implementation
//! that persists canonical provenance snapshots in a versioned history table.
//! It is designed for deterministic serialization, crash recovery, and audit
//! readiness. Storage inputs are treated as untrusted on load.
//!
//! [`ProvenanceStore`]: provenance_core::ProvenanceStore

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::MAX_SNAPSHOT_BYTES;
pub use store::SqliteProvenanceStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
