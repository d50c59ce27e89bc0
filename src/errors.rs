//! Unified error type for the ledger core.
//!
//! Every fallible operation returns [`Result`]. Variants are surfaced to the
//! calling request layer as-is; nothing inside the core retries except the
//! retention job, which logs a failed pass and waits for the next tick.

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Errors produced by the ledger core
#[derive(Debug, Error)]
pub enum Error {
    /// A string did not name a member of a closed enum set
    #[error("{value:?} is not a possible value for {type_name} (allowed: {allowed})")]
    InvalidEnumValue {
        /// Name of the enum type that rejected the value
        type_name: &'static str,
        /// The offending input
        value: String,
        /// Comma-separated list of accepted names
        allowed: String,
    },

    /// The transaction type cannot reference the given parent
    #[error("Chain violation: {reason}")]
    ChainViolation {
        /// Human-readable description of the broken rule
        reason: String,
    },

    /// The merchant's backing user is not ACTIVE
    #[error("Merchant {email} is not in active status")]
    InactiveMerchant {
        /// Email of the merchant
        email: String,
    },

    /// A referenced entity does not exist
    #[error("{entity} not found: {key}")]
    NotFound {
        /// Kind of entity that was looked up
        entity: &'static str,
        /// Lookup key (email, external id, primary key)
        key: String,
    },

    /// A deletion was blocked by rows still referencing the target
    #[error("{entity} {key} is still referenced by transactions")]
    ReferentialConflict {
        /// Kind of entity that could not be deleted
        entity: &'static str,
        /// Lookup key of the entity
        key: String,
    },

    /// A unique column already holds this value
    #[error("{entity} already exists: {key}")]
    Duplicate {
        /// Kind of entity being inserted
        entity: &'static str,
        /// The conflicting value
        key: String,
    },

    /// A business value (email, UUID, amount, duration) is malformed
    #[error("Validation error: {message}")]
    Validation {
        /// What was wrong with the value
        message: String,
    },

    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// The underlying store failed
    #[error("Database error: {0}")]
    Store(#[from] DbErr),
}

impl Error {
    /// Rewrites a unique-constraint violation into [`Error::Duplicate`],
    /// forwarding every other store failure unchanged.
    pub(crate) fn from_insert(err: DbErr, entity: &'static str, key: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::Duplicate {
                entity,
                key: key.to_string(),
            },
            _ => Self::Store(err),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
