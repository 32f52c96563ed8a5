// crates/provenance-core/src/core/hashing.rs
// ============================================================================
// Module: Provenance Ledger Canonical Hashing
// Description: RFC 8785 JSON canonicalization, content hashing, and fingerprints.
// Purpose: Provide deterministic digests for snapshots and certificate contents.
// Dependencies: serde, serde_jcs, sha2
// ============================================================================

//! ## Overview
//! The ledger hashes all canonical JSON using RFC 8785 (JCS) to guarantee
//! stable, replayable digests for stored snapshots. Certificate contents are
//! identified by caller-supplied fixed-size fingerprints validated at the
//! construction boundary.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;
use thiserror::Error;

// ============================================================================
// SECTION: Hash Algorithm
// ============================================================================

/// Supported hash algorithms for ledger snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    /// SHA-256 hashing (FIPS-friendly default).
    Sha256,
}

/// Default hash algorithm for the ledger.
pub const DEFAULT_HASH_ALGORITHM: HashAlgorithm = HashAlgorithm::Sha256;

// ============================================================================
// SECTION: Hash Digest
// ============================================================================

/// Deterministic content hash representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashDigest {
    /// Hash algorithm identifier.
    pub algorithm: HashAlgorithm,
    /// Lowercase hex-encoded digest bytes.
    pub value: String,
}

impl HashDigest {
    /// Creates a new digest from raw bytes.
    #[must_use]
    pub fn new(algorithm: HashAlgorithm, bytes: &[u8]) -> Self {
        Self {
            algorithm,
            value: hex_encode(bytes),
        }
    }
}

// ============================================================================
// SECTION: Certificate Fingerprints
// ============================================================================

/// Required length of a certificate fingerprint in bytes.
pub const CERTIFICATE_FINGERPRINT_BYTES: usize = 64;

/// Fixed-size content fingerprint attached to a certificate.
///
/// # Invariants
/// - Exactly [`CERTIFICATE_FINGERPRINT_BYTES`] bytes; enforced at construction.
/// - Serializes as a lowercase hex string on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CertificateFingerprint(Vec<u8>);

impl CertificateFingerprint {
    /// Creates a fingerprint from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`FingerprintError::Length`] when the byte count is wrong.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, FingerprintError> {
        if bytes.len() == CERTIFICATE_FINGERPRINT_BYTES {
            Ok(Self(bytes))
        } else {
            Err(FingerprintError::Length {
                actual: bytes.len(),
            })
        }
    }

    /// Returns the fingerprint bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the lowercase hex encoding of the fingerprint.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex_encode(&self.0)
    }
}

impl TryFrom<String> for CertificateFingerprint {
    type Error = FingerprintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let bytes = hex_decode(&value)?;
        Self::from_bytes(bytes)
    }
}

impl From<CertificateFingerprint> for String {
    fn from(fingerprint: CertificateFingerprint) -> Self {
        fingerprint.to_hex()
    }
}

/// Errors raised when constructing certificate fingerprints.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FingerprintError {
    /// Fingerprint byte count did not match the required length.
    #[error(
        "certificate fingerprint must be {CERTIFICATE_FINGERPRINT_BYTES} bytes, got {actual}"
    )]
    Length {
        /// Actual byte count supplied.
        actual: usize,
    },
    /// Fingerprint hex encoding could not be decoded.
    #[error("certificate fingerprint is not valid hex: {0}")]
    Encoding(String),
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when computing canonical hashes.
#[derive(Debug, Error)]
pub enum HashError {
    /// JSON canonicalization failed.
    #[error("failed to canonicalize json: {0}")]
    Canonicalization(String),
}

// ============================================================================
// SECTION: Hashing Helpers
// ============================================================================

/// Returns canonical JSON bytes for a serializable value using RFC 8785.
///
/// # Errors
///
/// Returns [`HashError::Canonicalization`] when serialization fails.
pub fn canonical_json_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, HashError> {
    serde_jcs::to_vec(value).map_err(|err| HashError::Canonicalization(err.to_string()))
}

/// Hashes canonical JSON using the provided algorithm.
///
/// # Errors
///
/// Returns [`HashError::Canonicalization`] when serialization fails.
pub fn hash_canonical_json<T: Serialize + ?Sized>(
    algorithm: HashAlgorithm,
    value: &T,
) -> Result<HashDigest, HashError> {
    let bytes = canonical_json_bytes(value)?;
    Ok(hash_bytes(algorithm, &bytes))
}

/// Hashes raw bytes using the provided algorithm.
#[must_use]
pub fn hash_bytes(algorithm: HashAlgorithm, bytes: &[u8]) -> HashDigest {
    match algorithm {
        HashAlgorithm::Sha256 => {
            let mut hasher = Sha256::new();
            hasher.update(bytes);
            let digest = hasher.finalize();
            HashDigest::new(HashAlgorithm::Sha256, &digest)
        }
    }
}

// ============================================================================
// SECTION: Hex Encoding
// ============================================================================

/// Encodes bytes as a lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(HEX[(byte >> 4) as usize] as char);
        out.push(HEX[(byte & 0x0f) as usize] as char);
    }
    out
}

/// Decodes a lowercase or uppercase hex string into bytes.
fn hex_decode(text: &str) -> Result<Vec<u8>, FingerprintError> {
    if text.len() % 2 != 0 {
        return Err(FingerprintError::Encoding("odd length hex string".to_string()));
    }
    let digits = text.as_bytes();
    let mut out = Vec::with_capacity(digits.len() / 2);
    for pair in digits.chunks_exact(2) {
        let high = hex_value(pair[0])?;
        let low = hex_value(pair[1])?;
        out.push((high << 4) | low);
    }
    Ok(out)
}

/// Returns the numeric value of a single hex digit.
fn hex_value(digit: u8) -> Result<u8, FingerprintError> {
    match digit {
        b'0'..=b'9' => Ok(digit - b'0'),
        b'a'..=b'f' => Ok(digit - b'a' + 10),
        b'A'..=b'F' => Ok(digit - b'A' + 10),
        other => Err(FingerprintError::Encoding(format!("invalid hex digit: {}", other as char))),
    }
}
