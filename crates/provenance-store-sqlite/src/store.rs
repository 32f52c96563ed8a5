// crates/provenance-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Provenance Store
// Description: Durable ProvenanceStore backed by SQLite WAL.
// Purpose: Persist provenance snapshots with deterministic serialization.
// Dependencies: provenance-core, rusqlite, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! This module implements a durable [`ProvenanceStore`] using `SQLite`. Each
//! save produces a canonical JSON snapshot stored in an append-only version
//! table. Loads verify integrity via stored hashes and fail closed on
//! corruption. Database contents are treated as untrusted on load.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use provenance_core::ProductId;
use provenance_core::ProductProvenance;
use provenance_core::ProvenanceStore;
use provenance_core::StoreError;
use provenance_core::hashing::DEFAULT_HASH_ALGORITHM;
use provenance_core::hashing::HashAlgorithm;
use provenance_core::hashing::canonical_json_bytes;
use provenance_core::hashing::hash_bytes;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::params;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum provenance snapshot size accepted by the store.
pub const MAX_SNAPSHOT_BYTES: usize = 4 * 1024 * 1024;

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` provenance store.
#[derive(Debug, Clone, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
    /// Optional maximum versions per product (older versions pruned).
    #[serde(default)]
    pub max_versions: Option<u64>,
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Store corruption or hash mismatch.
    #[error("sqlite store corruption: {0}")]
    Corrupt(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store data.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
    /// Store payload exceeded configured size limits.
    #[error("sqlite store payload too large: {actual_bytes} bytes (max {max_bytes})")]
    TooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual payload size in bytes.
        actual_bytes: usize,
    },
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Store(message),
            SqliteStoreError::Corrupt(message) => Self::Corrupt(message),
            SqliteStoreError::VersionMismatch(message) => Self::VersionMismatch(message),
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
            SqliteStoreError::TooLarge {
                max_bytes,
                actual_bytes,
            } => Self::Invalid(format!(
                "snapshot_json exceeds size limit: {actual_bytes} bytes (max {max_bytes})"
            )),
        }
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed provenance store with WAL support.
#[derive(Clone)]
pub struct SqliteProvenanceStore {
    /// Store configuration.
    config: SqliteStoreConfig,
    /// Shared `SQLite` connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
}

impl SqliteProvenanceStore {
    /// Opens an `SQLite`-backed provenance store.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized.
    pub fn new(config: SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(&config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            config,
            connection: Arc::new(Mutex::new(connection)),
        })
    }
}

impl ProvenanceStore for SqliteProvenanceStore {
    fn load(&self, product_id: ProductId) -> Result<Option<ProductProvenance>, StoreError> {
        self.load_snapshot(product_id).map_err(StoreError::from)
    }

    fn save(&self, provenance: &ProductProvenance) -> Result<(), StoreError> {
        self.save_snapshot(provenance).map_err(StoreError::from)
    }

    fn list_products(&self) -> Result<Vec<ProductId>, StoreError> {
        self.list_product_ids().map_err(StoreError::from)
    }
}

impl SqliteProvenanceStore {
    /// Loads the latest provenance snapshot for the provided product.
    fn load_snapshot(
        &self,
        product_id: ProductId,
    ) -> Result<Option<ProductProvenance>, SqliteStoreError> {
        let key = product_key(product_id)?;
        let row = {
            let mut guard = self
                .connection
                .lock()
                .map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))?;
            let tx = guard.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            let latest_version: Option<i64> = tx
                .query_row(
                    "SELECT latest_version FROM products WHERE product_id = ?1",
                    params![key],
                    |row| row.get(0),
                )
                .optional()
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            let latest_version = match latest_version {
                None => None,
                Some(value) => {
                    if value < 1 {
                        return Err(SqliteStoreError::Corrupt(format!(
                            "invalid latest_version for product {product_id}"
                        )));
                    }
                    Some(value)
                }
            };
            let row = if let Some(latest_version) = latest_version {
                let metadata = tx
                    .query_row(
                        "SELECT length(snapshot_json), snapshot_hash, hash_algorithm FROM \
                         provenance_versions WHERE product_id = ?1 AND version = ?2",
                        params![key, latest_version],
                        |row| {
                            let length: i64 = row.get(0)?;
                            let hash: String = row.get(1)?;
                            let algorithm: String = row.get(2)?;
                            Ok((length, hash, algorithm))
                        },
                    )
                    .optional()
                    .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
                let Some((length, hash, algorithm)) = metadata else {
                    return Err(SqliteStoreError::Corrupt(format!(
                        "missing provenance version {latest_version} for product {product_id}"
                    )));
                };
                let length_usize = usize::try_from(length).map_err(|_| {
                    SqliteStoreError::Invalid(format!(
                        "negative snapshot length for product {product_id}"
                    ))
                })?;
                if length_usize > MAX_SNAPSHOT_BYTES {
                    return Err(SqliteStoreError::TooLarge {
                        max_bytes: MAX_SNAPSHOT_BYTES,
                        actual_bytes: length_usize,
                    });
                }
                let bytes: Vec<u8> = tx
                    .query_row(
                        "SELECT snapshot_json FROM provenance_versions WHERE product_id = ?1 AND \
                         version = ?2",
                        params![key, latest_version],
                        |row| row.get(0),
                    )
                    .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
                Some((bytes, hash, algorithm))
            } else {
                None
            };
            tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            drop(guard);
            row
        };
        let Some((bytes, hash_value, hash_algorithm)) = row else {
            return Ok(None);
        };
        let algorithm = parse_hash_algorithm(&hash_algorithm)?;
        let expected = hash_bytes(algorithm, &bytes);
        if expected.value != hash_value {
            return Err(SqliteStoreError::Corrupt(format!(
                "hash mismatch for product {product_id}"
            )));
        }
        let provenance: ProductProvenance = serde_json::from_slice(&bytes)
            .map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
        if provenance.product_id != product_id {
            return Err(SqliteStoreError::Invalid(
                "product_id mismatch between key and payload".to_string(),
            ));
        }
        Ok(Some(provenance))
    }

    /// Saves a provenance snapshot to the `SQLite` store.
    fn save_snapshot(&self, provenance: &ProductProvenance) -> Result<(), SqliteStoreError> {
        let key = product_key(provenance.product_id)?;
        let canonical_json = canonical_json_bytes(provenance)
            .map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
        if canonical_json.len() > MAX_SNAPSHOT_BYTES {
            return Err(SqliteStoreError::TooLarge {
                max_bytes: MAX_SNAPSHOT_BYTES,
                actual_bytes: canonical_json.len(),
            });
        }
        let digest = hash_bytes(DEFAULT_HASH_ALGORITHM, &canonical_json);
        let saved_at = unix_millis();
        {
            let mut guard = self
                .connection
                .lock()
                .map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))?;
            let tx = guard.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            let latest_version: Option<i64> = tx
                .query_row(
                    "SELECT latest_version FROM products WHERE product_id = ?1",
                    params![key],
                    |row| row.get(0),
                )
                .optional()
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            let next_version = match latest_version {
                None => 1,
                Some(value) => {
                    if value < 1 {
                        return Err(SqliteStoreError::Corrupt(format!(
                            "invalid latest_version for product {}",
                            provenance.product_id
                        )));
                    }
                    value.checked_add(1).ok_or_else(|| {
                        SqliteStoreError::Corrupt(format!(
                            "provenance version overflow for product {}",
                            provenance.product_id
                        ))
                    })?
                }
            };
            tx.execute(
                "INSERT INTO products (product_id, latest_version) VALUES (?1, ?2) ON \
                 CONFLICT(product_id) DO UPDATE SET latest_version = excluded.latest_version",
                params![key, next_version],
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            tx.execute(
                "INSERT INTO provenance_versions (product_id, version, snapshot_json, \
                 snapshot_hash, hash_algorithm, saved_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    key,
                    next_version,
                    canonical_json,
                    digest.value,
                    hash_algorithm_label(digest.algorithm),
                    saved_at
                ],
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            enforce_retention(&tx, key, next_version, self.config.max_versions)?;
            tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            drop(guard);
        }
        Ok(())
    }

    /// Lists all product identifiers in ascending order.
    fn list_product_ids(&self) -> Result<Vec<ProductId>, SqliteStoreError> {
        let guard = self
            .connection
            .lock()
            .map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))?;
        let mut statement = guard
            .prepare("SELECT product_id FROM products ORDER BY product_id ASC")
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let rows = statement
            .query_map(params![], |row| row.get::<_, i64>(0))
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let mut products = Vec::new();
        for row in rows {
            let raw = row.map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            let raw = u64::try_from(raw).map_err(|_| {
                SqliteStoreError::Corrupt(format!("negative product identifier: {raw}"))
            })?;
            let product_id = ProductId::from_raw(raw).ok_or_else(|| {
                SqliteStoreError::Corrupt("zero product identifier in store".to_string())
            })?;
            products.push(product_id);
        }
        Ok(products)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Converts a product identifier into its `SQLite` key column value.
fn product_key(product_id: ProductId) -> Result<i64, SqliteStoreError> {
    i64::try_from(product_id.get())
        .map_err(|_| SqliteStoreError::Invalid(format!("product id too large: {product_id}")))
}

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    let path_string = path.display().to_string();
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.exists() && path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with secure defaults.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for durability.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection
        .execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Initializes the `SQLite` schema or validates existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS products (
                    product_id INTEGER PRIMARY KEY,
                    latest_version INTEGER NOT NULL
                );
                CREATE TABLE IF NOT EXISTS provenance_versions (
                    product_id INTEGER NOT NULL,
                    version INTEGER NOT NULL,
                    snapshot_json BLOB NOT NULL,
                    snapshot_hash TEXT NOT NULL,
                    hash_algorithm TEXT NOT NULL,
                    saved_at INTEGER NOT NULL,
                    PRIMARY KEY (product_id, version),
                    FOREIGN KEY (product_id) REFERENCES products(product_id) ON DELETE CASCADE
                );
                CREATE INDEX IF NOT EXISTS idx_provenance_versions_product_id
                    ON provenance_versions (product_id);",
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Enforces version retention if configured.
fn enforce_retention(
    tx: &rusqlite::Transaction<'_>,
    key: i64,
    latest_version: i64,
    max_versions: Option<u64>,
) -> Result<(), SqliteStoreError> {
    let Some(max_versions) = max_versions else {
        return Ok(());
    };
    if max_versions == 0 {
        return Err(SqliteStoreError::Invalid(
            "max_versions must be greater than zero".to_string(),
        ));
    }
    let max_versions = i64::try_from(max_versions)
        .map_err(|_| SqliteStoreError::Invalid("max_versions too large".to_string()))?;
    if latest_version > max_versions {
        let min_version = latest_version - max_versions + 1;
        tx.execute(
            "DELETE FROM provenance_versions WHERE product_id = ?1 AND version < ?2",
            params![key, min_version],
        )
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    }
    Ok(())
}

/// Returns the current unix epoch in milliseconds.
fn unix_millis() -> i64 {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    i64::try_from(now.as_millis()).unwrap_or(i64::MAX)
}

/// Returns the canonical hash algorithm label.
const fn hash_algorithm_label(algorithm: HashAlgorithm) -> &'static str {
    match algorithm {
        HashAlgorithm::Sha256 => "sha256",
    }
}

/// Parses a hash algorithm label.
fn parse_hash_algorithm(label: &str) -> Result<HashAlgorithm, SqliteStoreError> {
    match label {
        "sha256" => Ok(HashAlgorithm::Sha256),
        other => Err(SqliteStoreError::Invalid(format!("unsupported hash algorithm: {other}"))),
    }
}
