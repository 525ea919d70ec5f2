//! Entwine Storage - Contact Store Trait and In-Memory Implementation
//!
//! Defines the storage abstraction the resolution engine depends on. The
//! engine never touches a concrete persistence technology; it only sees
//! this trait, which is what makes the in-memory store usable for tests
//! and default wiring alike.

pub mod memory;

pub use memory::InMemoryContactStore;

use ::async_trait::async_trait;
use entwine_core::{Contact, ContactId, EntwineResult, LinkPrecedence};

// ============================================================================
// INSERT PAYLOAD
// ============================================================================

/// Insert payload for contacts.
///
/// The store owns id assignment and timestamps; callers only provide the
/// identity fields and link placement.
#[derive(Debug, Clone, Default)]
pub struct NewContact {
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub linked_id: Option<ContactId>,
    pub link_precedence: Option<LinkPrecedence>,
}

impl NewContact {
    /// Payload for a fresh, unlinked primary.
    pub fn primary(email: Option<String>, phone_number: Option<String>) -> Self {
        Self {
            email,
            phone_number,
            linked_id: None,
            link_precedence: Some(LinkPrecedence::Primary),
        }
    }

    /// Payload for a secondary linked to an existing primary.
    pub fn secondary(
        email: Option<String>,
        phone_number: Option<String>,
        linked_id: ContactId,
    ) -> Self {
        Self {
            email,
            phone_number,
            linked_id: Some(linked_id),
            link_precedence: Some(LinkPrecedence::Secondary),
        }
    }
}

// ============================================================================
// CONTACT STORE TRAIT
// ============================================================================

/// Async contact store for identity resolution.
///
/// All read methods exclude soft-deleted contacts and return rows ordered
/// by `created_at` ascending, ties broken by id (creation order). Each bulk
/// mutation is atomic: a concurrent reader observes either none or all of
/// the rows changed by one call.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Find contacts whose email equals `email` or whose phone number
    /// equals `phone`. A `None` input participates in no match; in
    /// particular it never matches rows where the field is also null.
    async fn find_by_email_or_phone(
        &self,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> EntwineResult<Vec<Contact>>;

    /// Fetch the primary contacts with the given ids, oldest first.
    ///
    /// Callers pass root ids, so the result set holds the candidate
    /// primaries of every cluster touched by a match. Ids that point at
    /// secondary rows are skipped.
    async fn find_primaries_by_ids(&self, ids: &[ContactId]) -> EntwineResult<Vec<Contact>>;

    /// Fetch a full cluster: the contact with `id` plus every contact whose
    /// `linked_id` equals `id`, oldest first.
    async fn find_by_id_or_linked_id(&self, id: ContactId) -> EntwineResult<Vec<Contact>>;

    /// Insert a new contact, assigning its id and timestamps.
    async fn insert(&self, new: NewContact) -> EntwineResult<Contact>;

    /// Demote the given contacts to secondary, pointing their `linked_id`
    /// at `new_linked_id`. Returns the number of rows changed.
    async fn bulk_update_precedence(
        &self,
        ids: &[ContactId],
        new_linked_id: ContactId,
    ) -> EntwineResult<u64>;

    /// Re-point every contact whose `linked_id` is in `old_linked_ids` at
    /// `new_linked_id`. Returns the number of rows changed.
    async fn bulk_relink(
        &self,
        old_linked_ids: &[ContactId],
        new_linked_id: ContactId,
    ) -> EntwineResult<u64>;

    /// Mark a contact as soft-deleted, removing it from all matching and
    /// responses. The row itself is retained.
    async fn soft_delete(&self, id: ContactId) -> EntwineResult<()>;
}
