//! API Request/Response Types
//!
//! Wire-format types for the REST layer. These are deliberately separate
//! from the core entities: the HTTP contract is camelCase and tolerates
//! client quirks (numeric phone numbers) that the core types never see.

pub mod identify;

pub use identify::{ContactView, IdentifyRequest, IdentifyResponse, PhoneNumberInput};
