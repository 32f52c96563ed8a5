// system-tests/src/config.rs
// ============================================================================
// Module: System Test Configuration Helpers
// Description: Canonical configs and registry builders for system tests.
// Purpose: Reduce duplication across system-test binaries.
// Dependencies: provenance-config, provenance-core, provenance-store-sqlite
// ============================================================================

//! ## Overview
//! Helpers that parse canonical test configurations and assemble registry
//! engines over each storage backend the way the CLI does.

// ============================================================================
// SECTION: Imports
// ============================================================================

use provenance_config::ProvenanceConfig;
use provenance_core::InMemoryProvenanceStore;
use provenance_core::ProvenanceRegistry;
use provenance_core::RegistryError;
use provenance_core::SharedProvenanceStore;
use provenance_core::StaticCoordinatorDirectory;
use provenance_store_sqlite::SqliteProvenanceStore;

// ============================================================================
// SECTION: Canonical Configs
// ============================================================================

/// Roster TOML shared by system-test configs.
const ROSTER_TOML: &str = r#"
[[coordinators]]
id = 1
name = "Plant Registrar"
roles = ["registrar"]

[[coordinators]]
id = 2
name = "Compliance Verifier"
roles = ["verifier"]

[[coordinators]]
id = 3
name = "Supply Chain Lead"
roles = ["registrar", "verifier"]
"#;

/// Returns a memory-backed test configuration.
///
/// # Errors
///
/// Returns an error string when the canonical config fails to parse or
/// validate.
pub fn memory_config() -> Result<ProvenanceConfig, String> {
    let config: ProvenanceConfig =
        toml::from_str(ROSTER_TOML).map_err(|err| err.to_string())?;
    config.validate().map_err(|err| err.to_string())?;
    Ok(config)
}

/// Returns a sqlite-backed test configuration rooted at the given path.
///
/// # Errors
///
/// Returns an error string when the canonical config fails to parse or
/// validate.
pub fn sqlite_config(db_path: &std::path::Path) -> Result<ProvenanceConfig, String> {
    let storage = format!(
        "[storage]\ntype = \"sqlite\"\npath = \"{}\"\n{ROSTER_TOML}",
        db_path.display()
    );
    let config: ProvenanceConfig = toml::from_str(&storage).map_err(|err| err.to_string())?;
    config.validate().map_err(|err| err.to_string())?;
    Ok(config)
}

// ============================================================================
// SECTION: Registry Builders
// ============================================================================

/// Builds a registry engine over the backend selected by the config.
///
/// # Errors
///
/// Returns an error string when directory, store, or registry assembly fails.
pub fn build_registry(
    config: &ProvenanceConfig,
) -> Result<ProvenanceRegistry<SharedProvenanceStore, StaticCoordinatorDirectory>, String> {
    let directory = StaticCoordinatorDirectory::from_roster(config.roster())
        .map_err(|err| err.to_string())?;
    let store = match config.storage.sqlite_config() {
        None => SharedProvenanceStore::from_store(InMemoryProvenanceStore::new()),
        Some(store_config) => {
            let store = SqliteProvenanceStore::new(store_config).map_err(|err| err.to_string())?;
            SharedProvenanceStore::from_store(store)
        }
    };
    ProvenanceRegistry::new(store, directory, config.registry_limits())
        .map_err(|err: RegistryError| err.to_string())
}
