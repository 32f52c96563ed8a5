// crates/provenance-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payloads.
// Purpose: Deterministic examples for docs and tooling.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical examples for ledger configuration. Outputs are deterministic and
//! kept in sync with the config model.

/// Returns a canonical example `provenance.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[storage]
type = "sqlite"
path = "provenance.db"
journal_mode = "wal"
sync_mode = "full"
busy_timeout_ms = 5000
max_versions = 1000

[limits]
max_text_field_length = 512
max_certificates_per_product = 256
max_sources_per_product = 1024

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
"#,
    )
}
