// crates/provenance-config/src/config.rs
// ============================================================================
// Module: Provenance Ledger Configuration
// Description: Configuration loading and validation for the ledger.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: provenance-core, provenance-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Missing or invalid configuration fails closed: a backend cannot start with
//! an empty roster or an unset sqlite path.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::SystemTime;

use provenance_core::Coordinator;
use provenance_core::CoordinatorId;
use provenance_core::CoordinatorRole;
use provenance_core::RegistryLimits;
use provenance_core::runtime::DEFAULT_MAX_CERTIFICATES_PER_PRODUCT;
use provenance_core::runtime::DEFAULT_MAX_SOURCES_PER_PRODUCT;
use provenance_core::runtime::DEFAULT_MAX_TEXT_FIELD_LENGTH;
use provenance_store_sqlite::SqliteStoreConfig;
use provenance_store_sqlite::SqliteStoreMode;
use provenance_store_sqlite::SqliteSyncMode;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "provenance.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "PROVENANCE_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of coordinator roster entries.
pub(crate) const MAX_COORDINATORS: usize = 256;
/// Maximum length of a coordinator name.
pub(crate) const MAX_COORDINATOR_NAME_LENGTH: usize = 256;
/// Hard upper bound for the text field length limit.
pub(crate) const MAX_TEXT_FIELD_LENGTH_LIMIT: usize = 4096;
/// Hard upper bound for certificates per product.
pub(crate) const MAX_CERTIFICATES_LIMIT: usize = 10_000;
/// Hard upper bound for raw-material sources per product.
pub(crate) const MAX_SOURCES_LIMIT: usize = 100_000;
/// Default busy timeout for sqlite storage in milliseconds.
const DEFAULT_STORE_BUSY_TIMEOUT_MS: u64 = 5_000;

// ============================================================================
// SECTION: Config Model
// ============================================================================

/// Canonical ledger configuration loaded from `provenance.toml`.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ProvenanceConfig {
    /// Provenance storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Coordinator roster entries.
    #[serde(default)]
    pub coordinators: Vec<CoordinatorEntry>,
    /// Registry limit overrides.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Optional config source metadata (not serialized).
    #[serde(skip)]
    pub source_modified_at: Option<SystemTime>,
}

impl ProvenanceConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let mut config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.source_modified_at = fs::metadata(&resolved).and_then(|meta| meta.modified()).ok();
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.storage.validate()?;
        self.limits.validate()?;
        if self.coordinators.is_empty() {
            return Err(ConfigError::Invalid(
                "coordinators roster must contain at least one entry".to_string(),
            ));
        }
        if self.coordinators.len() > MAX_COORDINATORS {
            return Err(ConfigError::Invalid(format!(
                "coordinators roster exceeds {MAX_COORDINATORS} entries"
            )));
        }
        let mut seen: Vec<CoordinatorId> = Vec::with_capacity(self.coordinators.len());
        for entry in &self.coordinators {
            entry.validate()?;
            if seen.contains(&entry.id) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate coordinator id: {}",
                    entry.id
                )));
            }
            seen.push(entry.id);
        }
        Ok(())
    }

    /// Returns the coordinator roster as core records.
    #[must_use]
    pub fn roster(&self) -> Vec<Coordinator> {
        self.coordinators
            .iter()
            .map(|entry| Coordinator {
                coordinator_id: entry.id,
                name: entry.name.clone(),
                roles: entry.roles.clone(),
            })
            .collect()
    }

    /// Returns the effective registry limits.
    #[must_use]
    pub const fn registry_limits(&self) -> RegistryLimits {
        RegistryLimits {
            max_text_field_length: self.limits.max_text_field_length,
            max_certificates_per_product: self.limits.max_certificates_per_product,
            max_sources_per_product: self.limits.max_sources_per_product,
        }
    }
}

// ============================================================================
// SECTION: Storage Config
// ============================================================================

/// Provenance storage backend type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Use the in-memory store.
    #[default]
    Memory,
    /// Use the `SQLite`-backed durable store.
    Sqlite,
}

/// Provenance storage configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Store backend type.
    #[serde(rename = "type", default)]
    pub backend: StorageBackend,
    /// `SQLite` database path when using the sqlite backend.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_store_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` synchronous mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
    /// Optional max snapshot versions to retain per product.
    #[serde(default)]
    pub max_versions: Option<u64>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: None,
            busy_timeout_ms: default_store_busy_timeout_ms(),
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
            max_versions: None,
        }
    }
}

impl StorageConfig {
    /// Validates storage configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match self.backend {
            StorageBackend::Memory => {
                if self.path.is_some() {
                    return Err(ConfigError::Invalid(
                        "memory storage must not set path".to_string(),
                    ));
                }
                Ok(())
            }
            StorageBackend::Sqlite => {
                let path = self.path.as_ref().ok_or_else(|| {
                    ConfigError::Invalid("sqlite storage requires path".to_string())
                })?;
                validate_path(path)?;
                if self.max_versions == Some(0) {
                    return Err(ConfigError::Invalid(
                        "storage max_versions must be greater than zero".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }

    /// Returns the sqlite store configuration when the sqlite backend is set.
    #[must_use]
    pub fn sqlite_config(&self) -> Option<SqliteStoreConfig> {
        match self.backend {
            StorageBackend::Memory => None,
            StorageBackend::Sqlite => self.path.as_ref().map(|path| SqliteStoreConfig {
                path: path.clone(),
                busy_timeout_ms: self.busy_timeout_ms,
                journal_mode: self.journal_mode,
                sync_mode: self.sync_mode,
                max_versions: self.max_versions,
            }),
        }
    }
}

/// Returns the default busy timeout for sqlite storage.
const fn default_store_busy_timeout_ms() -> u64 {
    DEFAULT_STORE_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Coordinator Roster
// ============================================================================

/// Coordinator roster entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoordinatorEntry {
    /// Coordinator identifier (non-zero).
    pub id: CoordinatorId,
    /// Human-readable coordinator name.
    pub name: String,
    /// Roles granted to the coordinator.
    pub roles: Vec<CoordinatorRole>,
}

impl CoordinatorEntry {
    /// Validates a roster entry.
    fn validate(&self) -> Result<(), ConfigError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "coordinator {} name must not be empty",
                self.id
            )));
        }
        if name.len() > MAX_COORDINATOR_NAME_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "coordinator {} name exceeds {MAX_COORDINATOR_NAME_LENGTH} bytes",
                self.id
            )));
        }
        if self.roles.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "coordinator {} must hold at least one role",
                self.id
            )));
        }
        let mut seen: Vec<CoordinatorRole> = Vec::with_capacity(self.roles.len());
        for role in &self.roles {
            if seen.contains(role) {
                return Err(ConfigError::Invalid(format!(
                    "coordinator {} lists duplicate roles",
                    self.id
                )));
            }
            seen.push(*role);
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Limits Config
// ============================================================================

/// Registry limit overrides.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Maximum length of any free-text field, in bytes.
    #[serde(default = "default_max_text_field_length")]
    pub max_text_field_length: usize,
    /// Maximum number of certificates per product.
    #[serde(default = "default_max_certificates_per_product")]
    pub max_certificates_per_product: usize,
    /// Maximum number of raw-material sources per product.
    #[serde(default = "default_max_sources_per_product")]
    pub max_sources_per_product: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_text_field_length: default_max_text_field_length(),
            max_certificates_per_product: default_max_certificates_per_product(),
            max_sources_per_product: default_max_sources_per_product(),
        }
    }
}

impl LimitsConfig {
    /// Validates limit overrides against hard bounds.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_limit(
            "limits.max_text_field_length",
            self.max_text_field_length,
            MAX_TEXT_FIELD_LENGTH_LIMIT,
        )?;
        validate_limit(
            "limits.max_certificates_per_product",
            self.max_certificates_per_product,
            MAX_CERTIFICATES_LIMIT,
        )?;
        validate_limit(
            "limits.max_sources_per_product",
            self.max_sources_per_product,
            MAX_SOURCES_LIMIT,
        )?;
        Ok(())
    }
}

/// Returns the default free-text field length limit.
const fn default_max_text_field_length() -> usize {
    DEFAULT_MAX_TEXT_FIELD_LENGTH
}

/// Returns the default certificates-per-product limit.
const fn default_max_certificates_per_product() -> usize {
    DEFAULT_MAX_CERTIFICATES_PER_PRODUCT
}

/// Returns the default sources-per-product limit.
const fn default_max_sources_per_product() -> usize {
    DEFAULT_MAX_SOURCES_PER_PRODUCT
}

/// Validates a single limit override against its hard bound.
fn validate_limit(key: &str, value: usize, hard_max: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Invalid(format!("{key} must be greater than zero")));
    }
    if value > hard_max {
        return Err(ConfigError::Invalid(format!("{key} exceeds hard limit {hard_max}")));
    }
    Ok(())
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}
