//! Error types for Entwine operations

use crate::ContactId;
use thiserror::Error;

/// Validation errors raised before any store access.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("At least one of email or phone number must be provided")]
    MissingIdentifiers,
}

/// Storage layer errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Contact not found: {id}")]
    NotFound { id: ContactId },

    #[error("Insert failed: {reason}")]
    InsertFailed { reason: String },

    #[error("Update failed for ids {ids:?}: {reason}")]
    UpdateFailed { ids: Vec<ContactId>, reason: String },

    #[error("Transaction failed: {reason}")]
    TransactionFailed { reason: String },

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// Master error type for all Entwine errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EntwineError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type alias for Entwine operations.
pub type EntwineResult<T> = Result<T, EntwineError>;

// =============================================================================
// TESTS
// =============================================================================
