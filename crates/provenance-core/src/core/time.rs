// crates/provenance-core/src/core/time.rs
// ============================================================================
// Module: Provenance Ledger Time Model
// Description: Canonical timestamp representation for records and audit logs.
// Purpose: Provide deterministic, replayable time values across ledger records.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The ledger uses explicit time values embedded in requests and records to
//! keep replay deterministic. The core engine never reads wall-clock time;
//! hosts must supply timestamps at the API boundary.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Time Values
// ============================================================================

/// Canonical timestamp used in ledger records and audit logs.
///
/// # Invariants
/// - Values are unix epoch milliseconds, explicitly provided by callers.
/// - No validation is performed; monotonicity is a caller responsibility.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp from unix epoch milliseconds.
    #[must_use]
    pub const fn from_unix_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the timestamp as unix epoch milliseconds.
    #[must_use]
    pub const fn as_unix_millis(self) -> i64 {
        self.0
    }

    /// Returns the signed millisecond difference `self - other`.
    #[must_use]
    pub const fn millis_since(self, other: Self) -> i64 {
        self.0.saturating_sub(other.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for Timestamp {
    fn from(millis: i64) -> Self {
        Self(millis)
    }
}
