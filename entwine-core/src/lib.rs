//! Entwine Core - Data Types for Identity Resolution
//!
//! Defines the contact entity, the consolidated-identity view returned to
//! callers, and the error taxonomy shared by the storage and engine crates.
//! This crate performs no I/O.

pub mod contact;
pub mod error;
pub mod identity;

pub use contact::{Contact, ContactId, LinkPrecedence};
pub use error::{EntwineError, EntwineResult, StoreError, ValidationError};
pub use identity::{push_unique, ConsolidatedIdentity};

/// Timestamp type used across all entities.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
