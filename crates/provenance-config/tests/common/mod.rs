// crates/provenance-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config validation tests.
// Purpose: Reduce duplication across integration tests for provenance-config.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use provenance_config::ProvenanceConfig;

/// Minimal roster TOML accepted by validation.
const MINIMAL_TOML: &str = r#"
[[coordinators]]
id = 1
name = "Plant Registrar"
roles = ["registrar"]

[[coordinators]]
id = 2
name = "Compliance Verifier"
roles = ["verifier"]
"#;

/// Parses a TOML string into a `ProvenanceConfig` for tests.
pub fn config_from_toml(toml_str: &str) -> Result<ProvenanceConfig, toml::de::Error> {
    toml::from_str(toml_str)
}

/// Returns a minimal config with a valid roster and all defaults applied.
pub fn minimal_config() -> Result<ProvenanceConfig, toml::de::Error> {
    config_from_toml(MINIMAL_TOML)
}
