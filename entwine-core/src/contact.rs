//! Contact entity structures

use crate::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a contact.
///
/// Assigned by the store in monotonically increasing creation order. The
/// `Ord` on this type therefore doubles as a creation-order tie-break
/// wherever two contacts share a `created_at` timestamp.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct ContactId(pub i64);

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ContactId {
    fn from(id: i64) -> Self {
        ContactId(id)
    }
}

/// Whether a contact is the canonical head of its cluster or linked to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkPrecedence {
    /// Canonical, oldest contact of a cluster.
    Primary,
    /// Linked directly to its cluster's primary via `linked_id`.
    Secondary,
}

/// Contact - a single identity fragment submitted by a client.
///
/// At least one of `email`/`phone_number` is always present on contacts
/// created by the engine. Field values are never mutated once recorded; new
/// information always becomes a new contact. The only mutation a contact
/// ever undergoes is the primary-to-secondary flip during a cluster merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    /// Set only on secondaries; always points directly at the cluster's
    /// primary, never through another secondary.
    pub linked_id: Option<ContactId>,
    pub link_precedence: LinkPrecedence,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Soft-delete marker; deleted contacts are excluded from matching and
    /// responses.
    pub deleted_at: Option<Timestamp>,
}

impl Contact {
    pub fn is_primary(&self) -> bool {
        self.link_precedence == LinkPrecedence::Primary
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// The primary-contact id this contact resolves to: its own id if
    /// primary, else its `linked_id`.
    ///
    /// A secondary with no `linked_id` violates the link invariant; falling
    /// back to the contact's own id keeps the cluster computation total.
    pub fn root_id(&self) -> ContactId {
        if self.is_primary() {
            self.id
        } else {
            self.linked_id.unwrap_or(self.id)
        }
    }
}
