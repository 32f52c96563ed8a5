// crates/provenance-cli/src/main.rs
// ============================================================================
// Module: Provenance CLI Entry Point
// Description: Command dispatcher for ledger registry operations.
// Purpose: Provide a safe local CLI over the provenance registry engine.
// Dependencies: clap, provenance-config, provenance-core, provenance-store-sqlite,
// serde_json, thiserror, time
// ============================================================================

//! ## Overview
//! The provenance CLI drives every registry operation against the configured
//! store: catalog registration, origin registration and verification,
//! certificate management, and raw-material sources. Results are rendered as
//! JSON. Inputs are untrusted and validated before any state is touched.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use provenance_config::ConfigError;
use provenance_config::ProvenanceConfig;
use provenance_config::StorageBackend;
use provenance_core::AddCertificateRequest;
use provenance_core::AddMaterialSourceRequest;
use provenance_core::CertificateFingerprint;
use provenance_core::CertificateId;
use provenance_core::CoordinatorId;
use provenance_core::InMemoryProvenanceStore;
use provenance_core::ProductId;
use provenance_core::ProvenanceRegistry;
use provenance_core::RegisterOriginRequest;
use provenance_core::RegisterProductRequest;
use provenance_core::RegistryError;
use provenance_core::SharedProvenanceStore;
use provenance_core::SourceId;
use provenance_core::StaticCoordinatorDirectory;
use provenance_core::Timestamp;
use provenance_core::VerifyMaterialSourceRequest;
use provenance_core::VerifyOriginRequest;
use provenance_store_sqlite::SqliteProvenanceStore;
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "provenance", version, disable_help_subcommand = true)]
struct Cli {
    /// Path to the configuration file (defaults to `provenance.toml`).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Register a product in the catalog.
    RegisterProduct(RegisterProductCommand),
    /// Register a manufacturing origin for a product.
    RegisterOrigin(RegisterOriginCommand),
    /// Verify a registered origin.
    VerifyOrigin(VerifyOriginCommand),
    /// Attach a certificate to a product.
    AddCertificate(AddCertificateCommand),
    /// Classify a certificate against an instant.
    CertificateStatus(CertificateStatusCommand),
    /// Attach a raw-material source to a product.
    AddSource(AddSourceCommand),
    /// Verify a raw-material source.
    VerifySource(VerifySourceCommand),
    /// Show provenance records.
    Show(ShowCommand),
    /// Configuration utilities.
    Config {
        /// Config subcommand to execute.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for `register-product`.
#[derive(Args, Debug)]
struct RegisterProductCommand {
    /// Product identifier (non-zero).
    #[arg(long)]
    product: u64,
    /// Acting coordinator identifier (non-zero).
    #[arg(long)]
    coordinator: u64,
    /// Human-readable product name.
    #[arg(long)]
    name: String,
    /// Request timestamp (RFC 3339 or unix millis, defaults to now).
    #[arg(long, value_name = "TIME")]
    at: Option<String>,
}

/// Arguments for `register-origin`.
#[derive(Args, Debug)]
struct RegisterOriginCommand {
    /// Product identifier (non-zero).
    #[arg(long)]
    product: u64,
    /// Acting coordinator identifier (non-zero).
    #[arg(long)]
    coordinator: u64,
    /// Manufacturer name.
    #[arg(long)]
    manufacturer: String,
    /// Manufacturing location description.
    #[arg(long)]
    location: String,
    /// Raw-materials description.
    #[arg(long = "raw-materials")]
    raw_materials: String,
    /// Manufacturing date (RFC 3339 or unix millis).
    #[arg(long = "manufactured-at", value_name = "TIME")]
    manufactured_at: String,
    /// Request timestamp (RFC 3339 or unix millis, defaults to now).
    #[arg(long, value_name = "TIME")]
    at: Option<String>,
}

/// Arguments for `verify-origin`.
#[derive(Args, Debug)]
struct VerifyOriginCommand {
    /// Product identifier (non-zero).
    #[arg(long)]
    product: u64,
    /// Acting coordinator identifier (non-zero).
    #[arg(long)]
    coordinator: u64,
    /// Request timestamp (RFC 3339 or unix millis, defaults to now).
    #[arg(long, value_name = "TIME")]
    at: Option<String>,
}

/// Arguments for `add-certificate`.
#[derive(Args, Debug)]
struct AddCertificateCommand {
    /// Product identifier (non-zero).
    #[arg(long)]
    product: u64,
    /// Acting coordinator identifier (non-zero).
    #[arg(long)]
    coordinator: u64,
    /// Certificate type label.
    #[arg(long = "certificate-type")]
    certificate_type: String,
    /// Issuing body name.
    #[arg(long)]
    issuer: String,
    /// Issue date (RFC 3339 or unix millis).
    #[arg(long = "issued-at", value_name = "TIME")]
    issued_at: String,
    /// Expiry date (RFC 3339 or unix millis).
    #[arg(long = "expires-at", value_name = "TIME")]
    expires_at: String,
    /// Hex-encoded 64-byte certificate fingerprint.
    #[arg(long)]
    fingerprint: String,
    /// Request timestamp (RFC 3339 or unix millis, defaults to now).
    #[arg(long, value_name = "TIME")]
    at: Option<String>,
}

/// Arguments for `certificate-status`.
#[derive(Args, Debug)]
struct CertificateStatusCommand {
    /// Product identifier (non-zero).
    #[arg(long)]
    product: u64,
    /// Certificate identifier (non-zero).
    #[arg(long)]
    certificate: u64,
    /// Instant to classify against (RFC 3339 or unix millis, defaults to now).
    #[arg(long, value_name = "TIME")]
    at: Option<String>,
}

/// Arguments for `add-source`.
#[derive(Args, Debug)]
struct AddSourceCommand {
    /// Product identifier (non-zero).
    #[arg(long)]
    product: u64,
    /// Acting coordinator identifier (non-zero).
    #[arg(long)]
    coordinator: u64,
    /// Source identifier, unique within the product (non-zero).
    #[arg(long)]
    source: u64,
    /// Supplier name.
    #[arg(long)]
    name: String,
    /// Supplier location description.
    #[arg(long)]
    location: String,
    /// Material type supplied.
    #[arg(long)]
    material: String,
    /// Quantity of material supplied, in supplier units.
    #[arg(long)]
    quantity: u64,
    /// Request timestamp (RFC 3339 or unix millis, defaults to now).
    #[arg(long, value_name = "TIME")]
    at: Option<String>,
}

/// Arguments for `verify-source`.
#[derive(Args, Debug)]
struct VerifySourceCommand {
    /// Product identifier (non-zero).
    #[arg(long)]
    product: u64,
    /// Source identifier (non-zero).
    #[arg(long)]
    source: u64,
    /// Acting coordinator identifier (non-zero).
    #[arg(long)]
    coordinator: u64,
    /// Request timestamp (RFC 3339 or unix millis, defaults to now).
    #[arg(long, value_name = "TIME")]
    at: Option<String>,
}

/// Arguments for `show`.
#[derive(Args, Debug)]
struct ShowCommand {
    /// Product identifier to show; lists all products when omitted.
    #[arg(long)]
    product: Option<u64>,
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate the configuration file.
    Validate,
    /// Print a canonical example configuration.
    Example,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI errors mapped onto process exit codes.
#[derive(Debug, Error)]
enum CliError {
    /// Configuration loading or validation failed.
    #[error("config error: {0}")]
    Config(String),
    /// A command-line argument failed validation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A registry operation failed.
    #[error("{code}: {message}", code = .0.code(), message = .0)]
    Operation(RegistryError),
    /// Output could not be written.
    #[error("output error: {0}")]
    Output(String),
}

impl From<ConfigError> for CliError {
    fn from(error: ConfigError) -> Self {
        Self::Config(error.to_string())
    }
}

impl From<RegistryError> for CliError {
    fn from(error: RegistryError) -> Self {
        Self::Operation(error)
    }
}

impl CliError {
    /// Returns the process exit code for this error.
    fn exit_code(&self) -> ExitCode {
        match self {
            Self::Config(_) | Self::InvalidArgument(_) => ExitCode::from(2),
            Self::Operation(_) | Self::Output(_) => ExitCode::FAILURE,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let _ = write_stderr_line(&err.to_string());
            err.exit_code()
        }
    }
}

/// Executes the CLI command dispatcher.
fn run(cli: Cli) -> CliResult<()> {
    match cli.command {
        Commands::RegisterProduct(command) => {
            command_register_product(cli.config.as_deref(), &command)
        }
        Commands::RegisterOrigin(command) => {
            command_register_origin(cli.config.as_deref(), &command)
        }
        Commands::VerifyOrigin(command) => command_verify_origin(cli.config.as_deref(), &command),
        Commands::AddCertificate(command) => {
            command_add_certificate(cli.config.as_deref(), &command)
        }
        Commands::CertificateStatus(command) => {
            command_certificate_status(cli.config.as_deref(), &command)
        }
        Commands::AddSource(command) => command_add_source(cli.config.as_deref(), &command),
        Commands::VerifySource(command) => command_verify_source(cli.config.as_deref(), &command),
        Commands::Show(command) => command_show(cli.config.as_deref(), &command),
        Commands::Config {
            command,
        } => command_config(cli.config.as_deref(), &command),
    }
}

// ============================================================================
// SECTION: Registry Commands
// ============================================================================

/// Executes the `register-product` command.
fn command_register_product(
    config_path: Option<&std::path::Path>,
    command: &RegisterProductCommand,
) -> CliResult<()> {
    let registry = build_registry(config_path)?;
    let provenance = registry.register_product(&RegisterProductRequest {
        product_id: parse_product_id(command.product)?,
        coordinator_id: parse_coordinator_id(command.coordinator)?,
        product_name: command.name.clone(),
        requested_at: resolve_timestamp(command.at.as_deref())?,
        correlation_id: None,
    })?;
    write_json(&provenance)
}

/// Executes the `register-origin` command.
fn command_register_origin(
    config_path: Option<&std::path::Path>,
    command: &RegisterOriginCommand,
) -> CliResult<()> {
    let registry = build_registry(config_path)?;
    let origin = registry.register_origin(&RegisterOriginRequest {
        product_id: parse_product_id(command.product)?,
        coordinator_id: parse_coordinator_id(command.coordinator)?,
        manufacturer: command.manufacturer.clone(),
        manufacturing_location: command.location.clone(),
        raw_materials: command.raw_materials.clone(),
        manufacturing_date: parse_timestamp(&command.manufactured_at)?,
        requested_at: resolve_timestamp(command.at.as_deref())?,
        correlation_id: None,
    })?;
    write_json(&origin)
}

/// Executes the `verify-origin` command.
fn command_verify_origin(
    config_path: Option<&std::path::Path>,
    command: &VerifyOriginCommand,
) -> CliResult<()> {
    let registry = build_registry(config_path)?;
    let mark = registry.verify_origin(&VerifyOriginRequest {
        product_id: parse_product_id(command.product)?,
        coordinator_id: parse_coordinator_id(command.coordinator)?,
        requested_at: resolve_timestamp(command.at.as_deref())?,
        correlation_id: None,
    })?;
    write_json(&mark)
}

/// Executes the `add-certificate` command.
fn command_add_certificate(
    config_path: Option<&std::path::Path>,
    command: &AddCertificateCommand,
) -> CliResult<()> {
    let registry = build_registry(config_path)?;
    let record = registry.add_certificate(&AddCertificateRequest {
        product_id: parse_product_id(command.product)?,
        coordinator_id: parse_coordinator_id(command.coordinator)?,
        certificate_type: command.certificate_type.clone(),
        issuer: command.issuer.clone(),
        issue_date: parse_timestamp(&command.issued_at)?,
        expiry_date: parse_timestamp(&command.expires_at)?,
        fingerprint: parse_fingerprint(&command.fingerprint)?,
        requested_at: resolve_timestamp(command.at.as_deref())?,
        correlation_id: None,
    })?;
    write_json(&record)
}

/// Executes the `certificate-status` command.
fn command_certificate_status(
    config_path: Option<&std::path::Path>,
    command: &CertificateStatusCommand,
) -> CliResult<()> {
    let registry = build_registry(config_path)?;
    let report = registry.certificate_status(
        parse_product_id(command.product)?,
        parse_certificate_id(command.certificate)?,
        resolve_timestamp(command.at.as_deref())?,
    )?;
    write_json(&report)
}

/// Executes the `add-source` command.
fn command_add_source(
    config_path: Option<&std::path::Path>,
    command: &AddSourceCommand,
) -> CliResult<()> {
    let registry = build_registry(config_path)?;
    let record = registry.add_material_source(&AddMaterialSourceRequest {
        product_id: parse_product_id(command.product)?,
        coordinator_id: parse_coordinator_id(command.coordinator)?,
        source_id: parse_source_id(command.source)?,
        source_name: command.name.clone(),
        source_location: command.location.clone(),
        material_type: command.material.clone(),
        quantity: command.quantity,
        requested_at: resolve_timestamp(command.at.as_deref())?,
        correlation_id: None,
    })?;
    write_json(&record)
}

/// Executes the `verify-source` command.
fn command_verify_source(
    config_path: Option<&std::path::Path>,
    command: &VerifySourceCommand,
) -> CliResult<()> {
    let registry = build_registry(config_path)?;
    let mark = registry.verify_material_source(&VerifyMaterialSourceRequest {
        product_id: parse_product_id(command.product)?,
        source_id: parse_source_id(command.source)?,
        coordinator_id: parse_coordinator_id(command.coordinator)?,
        requested_at: resolve_timestamp(command.at.as_deref())?,
        correlation_id: None,
    })?;
    write_json(&mark)
}

/// Executes the `show` command.
fn command_show(config_path: Option<&std::path::Path>, command: &ShowCommand) -> CliResult<()> {
    let registry = build_registry(config_path)?;
    if let Some(raw_product_id) = command.product {
        let provenance = registry.provenance_summary(parse_product_id(raw_product_id)?)?;
        write_json(&provenance)
    } else {
        let products = registry.list_products()?;
        write_json(&products)
    }
}

/// Executes the `config` subcommands.
fn command_config(
    config_path: Option<&std::path::Path>,
    command: &ConfigCommand,
) -> CliResult<()> {
    match command {
        ConfigCommand::Validate => {
            let config = ProvenanceConfig::load(config_path)?;
            write_json(&ValidationOutcome {
                valid: true,
                coordinators: config.coordinators.len(),
            })
        }
        ConfigCommand::Example => {
            write_stdout_line(provenance_config::config_toml_example().trim_end())
                .map_err(|err| CliError::Output(err.to_string()))
        }
    }
}

/// Validation outcome rendered by `config validate`.
#[derive(Debug, Serialize)]
struct ValidationOutcome {
    /// Indicates the configuration passed validation.
    valid: bool,
    /// Number of roster entries admitted.
    coordinators: usize,
}

// ============================================================================
// SECTION: Registry Construction
// ============================================================================

/// Builds a registry engine over the configured storage backend.
fn build_registry(
    config_path: Option<&std::path::Path>,
) -> CliResult<ProvenanceRegistry<SharedProvenanceStore, StaticCoordinatorDirectory>> {
    let config = ProvenanceConfig::load(config_path)?;
    let directory = StaticCoordinatorDirectory::from_roster(config.roster())
        .map_err(|err| CliError::Config(err.to_string()))?;
    let store = match config.storage.backend {
        StorageBackend::Memory => SharedProvenanceStore::from_store(InMemoryProvenanceStore::new()),
        StorageBackend::Sqlite => {
            let store_config = config.storage.sqlite_config().ok_or_else(|| {
                CliError::Config("sqlite storage requires path".to_string())
            })?;
            let store = SqliteProvenanceStore::new(store_config)
                .map_err(|err| CliError::Config(err.to_string()))?;
            SharedProvenanceStore::from_store(store)
        }
    };
    ProvenanceRegistry::new(store, directory, config.registry_limits())
        .map_err(CliError::Operation)
}

// ============================================================================
// SECTION: Argument Parsing
// ============================================================================

/// Parses a product identifier argument.
fn parse_product_id(raw: u64) -> CliResult<ProductId> {
    ProductId::from_raw(raw)
        .ok_or_else(|| CliError::InvalidArgument("product id must be non-zero".to_string()))
}

/// Parses a coordinator identifier argument.
fn parse_coordinator_id(raw: u64) -> CliResult<CoordinatorId> {
    CoordinatorId::from_raw(raw)
        .ok_or_else(|| CliError::InvalidArgument("coordinator id must be non-zero".to_string()))
}

/// Parses a certificate identifier argument.
fn parse_certificate_id(raw: u64) -> CliResult<CertificateId> {
    CertificateId::from_raw(raw)
        .ok_or_else(|| CliError::InvalidArgument("certificate id must be non-zero".to_string()))
}

/// Parses a source identifier argument.
fn parse_source_id(raw: u64) -> CliResult<SourceId> {
    SourceId::from_raw(raw)
        .ok_or_else(|| CliError::InvalidArgument("source id must be non-zero".to_string()))
}

/// Parses a timestamp argument as unix millis or RFC 3339.
fn parse_timestamp(text: &str) -> CliResult<Timestamp> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(CliError::InvalidArgument("timestamp must not be empty".to_string()));
    }
    if let Ok(millis) = trimmed.parse::<i64>() {
        return Ok(Timestamp::from_unix_millis(millis));
    }
    let parsed = OffsetDateTime::parse(trimmed, &Rfc3339).map_err(|err| {
        CliError::InvalidArgument(format!("timestamp must be unix millis or RFC 3339: {err}"))
    })?;
    let millis = i64::try_from(parsed.unix_timestamp_nanos() / 1_000_000).map_err(|_| {
        CliError::InvalidArgument("timestamp is out of the representable range".to_string())
    })?;
    Ok(Timestamp::from_unix_millis(millis))
}

/// Resolves an optional timestamp argument, falling back to the host clock.
fn resolve_timestamp(text: Option<&str>) -> CliResult<Timestamp> {
    match text {
        Some(value) => parse_timestamp(value),
        None => Ok(now_timestamp()),
    }
}

/// Returns the current host time as a ledger timestamp.
fn now_timestamp() -> Timestamp {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    let millis = i64::try_from(now.as_millis()).unwrap_or(i64::MAX);
    Timestamp::from_unix_millis(millis)
}

/// Parses a hex-encoded certificate fingerprint argument.
fn parse_fingerprint(text: &str) -> CliResult<CertificateFingerprint> {
    CertificateFingerprint::try_from(text.trim().to_string())
        .map_err(|err| CliError::InvalidArgument(err.to_string()))
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a serializable value to stdout as pretty JSON.
fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::Output(err.to_string()))?;
    write_stdout_line(&rendered).map_err(|err| CliError::Output(err.to_string()))
}

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}
