//! Entwine Engine - Identity Resolution
//!
//! Matches an incoming (email, phone) fragment against the contact store,
//! decides cluster membership, merges clusters that turn out to be the same
//! person, and produces the consolidated identity view.
//!
//! The engine is stateless between requests; all state lives behind the
//! `ContactStore` trait. It is a pure request/response transformation over
//! store state, with exactly two mutation shapes: inserting one contact, and
//! the demote/relink pair during a cluster merge.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use entwine_core::{
    push_unique, ConsolidatedIdentity, Contact, ContactId, EntwineResult, StoreError,
    ValidationError,
};
use entwine_storage::{ContactStore, NewContact};

// ============================================================================
// RESOLVER
// ============================================================================

/// The identity-resolution engine.
///
/// Holds a shared store handle (constructor injection; the engine never
/// depends on a concrete persistence technology) and a guard serializing
/// the read-modify-write sequence of concurrent resolutions.
pub struct Resolver<S> {
    store: Arc<S>,
    /// Serializes match → merge → insert. Which cluster a request lands in
    /// is only known mid-resolution, so the guard cannot be taken per
    /// cluster up front; a store backed by a transactional database would
    /// carry this responsibility instead.
    guard: Mutex<()>,
}

impl<S: ContactStore> Resolver<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            guard: Mutex::new(()),
        }
    }

    /// Access the underlying store handle.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Resolve an identity fragment into the consolidated view of the
    /// person it belongs to.
    ///
    /// Fails with a validation error when both inputs are absent or empty.
    /// Store failures abort the whole resolution; each mutation is a single
    /// atomic store call, so no partial multi-row update is observable.
    pub async fn resolve(
        &self,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> EntwineResult<ConsolidatedIdentity> {
        let email = normalize(email);
        let phone = normalize(phone);
        if email.is_none() && phone.is_none() {
            return Err(ValidationError::MissingIdentifiers.into());
        }

        let _guard = self.guard.lock().await;

        let matches = self.store.find_by_email_or_phone(email, phone).await?;

        // No match: the fragment is a brand-new person.
        if matches.is_empty() {
            let created = self
                .store
                .insert(NewContact::primary(owned(email), owned(phone)))
                .await?;
            info!(contact_id = %created.id, "created new primary contact");
            return Ok(ConsolidatedIdentity::solitary(
                created.id,
                created.email,
                created.phone_number,
            ));
        }
        debug!(matched = matches.len(), "fragment matched existing contacts");

        // Distinct root ids in first-seen order.
        let mut root_ids: Vec<ContactId> = Vec::new();
        for contact in &matches {
            push_unique(&mut root_ids, &contact.root_id());
        }

        let primaries = self.store.find_primaries_by_ids(&root_ids).await?;
        let main = primaries
            .first()
            .cloned()
            .ok_or(StoreError::NotFound { id: root_ids[0] })?;

        // More than one root: two previously independent clusters are now
        // known to be the same person. The oldest primary wins; the newer
        // ones are demoted and their dependents re-pointed, each class of
        // change in one atomic call.
        if primaries.len() > 1 {
            let newer_ids: Vec<ContactId> = primaries[1..].iter().map(|c| c.id).collect();
            self.store
                .bulk_update_precedence(&newer_ids, main.id)
                .await?;
            self.store.bulk_relink(&newer_ids, main.id).await?;
            info!(
                main_contact_id = %main.id,
                demoted = newer_ids.len(),
                "merged clusters into oldest primary"
            );
        }

        // Cluster closure is computed from the final main id, after any
        // merge, so just-relinked contacts are never omitted.
        let mut cluster = self.store.find_by_id_or_linked_id(main.id).await?;

        let mut known_emails: Vec<String> = Vec::new();
        let mut known_phones: Vec<String> = Vec::new();
        for contact in &cluster {
            if let Some(e) = &contact.email {
                push_unique(&mut known_emails, e);
            }
            if let Some(p) = &contact.phone_number {
                push_unique(&mut known_phones, p);
            }
        }

        // Novelty check: one new secondary at most per request, and only
        // when the fragment carries information the cluster lacks.
        let has_new_email = email.is_some_and(|e| !known_emails.iter().any(|k| k == e));
        let has_new_phone = phone.is_some_and(|p| !known_phones.iter().any(|k| k == p));
        if has_new_email || has_new_phone {
            let created = self
                .store
                .insert(NewContact::secondary(owned(email), owned(phone), main.id))
                .await?;
            debug!(contact_id = %created.id, "recorded new secondary contact");
            cluster.push(created);
        }

        Ok(consolidate(&main, &cluster))
    }
}

// ============================================================================
// HELPERS
// ============================================================================

/// Treat absent and blank inputs identically; never alters a usable key.
fn normalize(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_string)
}

/// Compose the response view. The primary's own email/phone come first,
/// followed by the remaining cluster contacts' distinct values in
/// ascending-creation order; secondary ids likewise ascend by creation.
fn consolidate(main: &Contact, cluster: &[Contact]) -> ConsolidatedIdentity {
    let mut emails: Vec<String> = Vec::new();
    let mut phone_numbers: Vec<String> = Vec::new();
    let mut secondary_contact_ids: Vec<ContactId> = Vec::new();

    if let Some(e) = &main.email {
        emails.push(e.clone());
    }
    if let Some(p) = &main.phone_number {
        phone_numbers.push(p.clone());
    }

    for contact in cluster {
        if contact.id == main.id {
            continue;
        }
        if let Some(e) = &contact.email {
            push_unique(&mut emails, e);
        }
        if let Some(p) = &contact.phone_number {
            push_unique(&mut phone_numbers, p);
        }
        if !contact.is_primary() {
            secondary_contact_ids.push(contact.id);
        }
    }

    ConsolidatedIdentity {
        primary_contact_id: main.id,
        emails,
        phone_numbers,
        secondary_contact_ids,
    }
}

// ============================================================================
// TESTS
// ============================================================================
