//! Config defaults and core validation tests for provenance-config.
// crates/provenance-config/tests/config_defaults.rs
// =============================================================================
// Module: Config Defaults and Core Validation Tests
// Description: Validate default behavior and core config invariants.
// Purpose: Ensure minimal config is valid and critical invariants are enforced.
// =============================================================================

use provenance_config::ConfigError;
use provenance_config::ProvenanceConfig;
use provenance_config::StorageBackend;
use provenance_config::config_toml_example;

mod common;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<(), ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(()) => Err("expected invalid config".to_string()),
    }
}

#[test]
fn minimal_config_validates() -> TestResult {
    let config = common::minimal_config().map_err(|err| err.to_string())?;
    config.validate().map_err(|err| err.to_string())?;
    Ok(())
}

#[test]
fn storage_defaults_to_memory_backend() -> TestResult {
    let config = common::minimal_config().map_err(|err| err.to_string())?;
    if config.storage.backend != StorageBackend::Memory {
        return Err("storage.type should default to memory".to_string());
    }
    if config.storage.sqlite_config().is_some() {
        return Err("memory backend should not produce a sqlite config".to_string());
    }
    Ok(())
}

#[test]
fn limits_defaults_match_registry_defaults() -> TestResult {
    let config = common::minimal_config().map_err(|err| err.to_string())?;
    let limits = config.registry_limits();
    if limits.max_text_field_length != provenance_core::runtime::DEFAULT_MAX_TEXT_FIELD_LENGTH {
        return Err("limits.max_text_field_length default mismatch".to_string());
    }
    if limits.max_certificates_per_product
        != provenance_core::runtime::DEFAULT_MAX_CERTIFICATES_PER_PRODUCT
    {
        return Err("limits.max_certificates_per_product default mismatch".to_string());
    }
    if limits.max_sources_per_product != provenance_core::runtime::DEFAULT_MAX_SOURCES_PER_PRODUCT {
        return Err("limits.max_sources_per_product default mismatch".to_string());
    }
    Ok(())
}

#[test]
fn empty_roster_is_rejected() -> TestResult {
    let config = common::config_from_toml("").map_err(|err| err.to_string())?;
    assert_invalid(config.validate(), "coordinators roster must contain at least one entry")?;
    Ok(())
}

#[test]
fn unknown_keys_are_rejected() -> TestResult {
    let result = common::config_from_toml("[surprise]\nkey = 1\n");
    if result.is_ok() {
        return Err("unknown config sections should be rejected".to_string());
    }
    Ok(())
}

#[test]
fn zero_limit_override_is_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.limits.max_certificates_per_product = 0;
    assert_invalid(
        config.validate(),
        "limits.max_certificates_per_product must be greater than zero",
    )?;
    Ok(())
}

#[test]
fn example_config_parses_and_validates() -> TestResult {
    let config: ProvenanceConfig =
        toml::from_str(&config_toml_example()).map_err(|err| err.to_string())?;
    config.validate().map_err(|err| err.to_string())?;
    if config.storage.backend != StorageBackend::Sqlite {
        return Err("example config should select the sqlite backend".to_string());
    }
    if config.roster().len() != 3 {
        return Err("example config should list three coordinators".to_string());
    }
    Ok(())
}

#[test]
fn load_reads_config_from_disk() -> TestResult {
    let dir = tempfile::TempDir::new().map_err(|err| err.to_string())?;
    let path = dir.path().join("provenance.toml");
    std::fs::write(&path, config_toml_example()).map_err(|err| err.to_string())?;

    let config = ProvenanceConfig::load(Some(&path)).map_err(|err| err.to_string())?;
    if config.coordinators.len() != 3 {
        return Err("loaded config should list three coordinators".to_string());
    }
    Ok(())
}

#[test]
fn load_rejects_missing_file() -> TestResult {
    let dir = tempfile::TempDir::new().map_err(|err| err.to_string())?;
    let path = dir.path().join("absent.toml");
    match ProvenanceConfig::load(Some(&path)) {
        Err(ConfigError::Io(_)) => Ok(()),
        Err(other) => Err(format!("expected io error, got {other}")),
        Ok(_) => Err("expected missing config to fail".to_string()),
    }
}
