//! In-memory contact store
//!
//! Reference `ContactStore` implementation backed by a `RwLock`-guarded
//! table. Every trait method takes the lock exactly once, which is what
//! gives the bulk mutations their atomicity: a concurrent reader sees the
//! table before or after a call, never mid-update.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use ::async_trait::async_trait;
use chrono::Utc;
use entwine_core::{
    Contact, ContactId, EntwineResult, LinkPrecedence, StoreError,
};

use crate::{ContactStore, NewContact};

// ============================================================================
// TABLE
// ============================================================================

#[derive(Debug, Default)]
struct ContactTable {
    /// Keyed by id; BTreeMap keeps iteration in id (creation) order.
    rows: BTreeMap<ContactId, Contact>,
    next_id: i64,
}

impl ContactTable {
    fn allocate_id(&mut self) -> ContactId {
        self.next_id += 1;
        ContactId(self.next_id)
    }
}

/// In-memory contact store.
///
/// Clones share the same underlying table, matching the handle semantics of
/// a pooled database client.
#[derive(Debug, Clone, Default)]
pub struct InMemoryContactStore {
    inner: Arc<RwLock<ContactTable>>,
}

impl InMemoryContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count of live (non-deleted) contacts. Test and health-check helper.
    pub fn live_count(&self) -> usize {
        self.inner
            .read()
            .map(|table| table.rows.values().filter(|c| !c.is_deleted()).count())
            .unwrap_or(0)
    }

    /// All live contacts in creation order. Inspection helper for tests and
    /// invariant checks; not part of the `ContactStore` surface.
    pub fn snapshot(&self) -> Vec<Contact> {
        self.inner
            .read()
            .map(|table| {
                table
                    .rows
                    .values()
                    .filter(|c| !c.is_deleted())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn read_table(&self) -> EntwineResult<RwLockReadGuard<'_, ContactTable>> {
        self.inner
            .read()
            .map_err(|_| StoreError::LockPoisoned.into())
    }

    fn write_table(&self) -> EntwineResult<RwLockWriteGuard<'_, ContactTable>> {
        self.inner
            .write()
            .map_err(|_| StoreError::LockPoisoned.into())
    }
}

/// Sort into ascending creation order. Timestamps from rapid successive
/// inserts can collide, so the id is the required tie-break.
fn sort_by_creation(contacts: &mut [Contact]) {
    contacts.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
}

// ============================================================================
// CONTACT STORE IMPLEMENTATION
// ============================================================================

#[async_trait]
impl ContactStore for InMemoryContactStore {
    async fn find_by_email_or_phone(
        &self,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> EntwineResult<Vec<Contact>> {
        let table = self.read_table()?;
        let mut matches: Vec<Contact> = table
            .rows
            .values()
            .filter(|c| !c.is_deleted())
            .filter(|c| {
                let email_hit = match email {
                    Some(e) => c.email.as_deref() == Some(e),
                    None => false,
                };
                let phone_hit = match phone {
                    Some(p) => c.phone_number.as_deref() == Some(p),
                    None => false,
                };
                email_hit || phone_hit
            })
            .cloned()
            .collect();
        sort_by_creation(&mut matches);
        Ok(matches)
    }

    async fn find_primaries_by_ids(&self, ids: &[ContactId]) -> EntwineResult<Vec<Contact>> {
        let table = self.read_table()?;
        let mut found: Vec<Contact> = ids
            .iter()
            .filter_map(|id| table.rows.get(id))
            .filter(|c| !c.is_deleted() && c.is_primary())
            .cloned()
            .collect();
        sort_by_creation(&mut found);
        Ok(found)
    }

    async fn find_by_id_or_linked_id(&self, id: ContactId) -> EntwineResult<Vec<Contact>> {
        let table = self.read_table()?;
        let mut cluster: Vec<Contact> = table
            .rows
            .values()
            .filter(|c| !c.is_deleted())
            .filter(|c| c.id == id || c.linked_id == Some(id))
            .cloned()
            .collect();
        sort_by_creation(&mut cluster);
        Ok(cluster)
    }

    async fn insert(&self, new: NewContact) -> EntwineResult<Contact> {
        let mut table = self.write_table()?;
        let id = table.allocate_id();
        let now = Utc::now();
        let contact = Contact {
            id,
            email: new.email,
            phone_number: new.phone_number,
            linked_id: new.linked_id,
            link_precedence: new.link_precedence.unwrap_or(LinkPrecedence::Primary),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        table.rows.insert(id, contact.clone());
        Ok(contact)
    }

    async fn bulk_update_precedence(
        &self,
        ids: &[ContactId],
        new_linked_id: ContactId,
    ) -> EntwineResult<u64> {
        let mut table = self.write_table()?;
        let now = Utc::now();
        let mut changed = 0;
        for id in ids {
            if let Some(contact) = table.rows.get_mut(id) {
                contact.link_precedence = LinkPrecedence::Secondary;
                contact.linked_id = Some(new_linked_id);
                contact.updated_at = now;
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn bulk_relink(
        &self,
        old_linked_ids: &[ContactId],
        new_linked_id: ContactId,
    ) -> EntwineResult<u64> {
        let mut table = self.write_table()?;
        let now = Utc::now();
        let mut changed = 0;
        for contact in table.rows.values_mut() {
            if let Some(linked) = contact.linked_id {
                if old_linked_ids.contains(&linked) {
                    contact.linked_id = Some(new_linked_id);
                    contact.updated_at = now;
                    changed += 1;
                }
            }
        }
        Ok(changed)
    }

    async fn soft_delete(&self, id: ContactId) -> EntwineResult<()> {
        let mut table = self.write_table()?;
        let contact = table
            .rows
            .get_mut(&id)
            .ok_or(StoreError::NotFound { id })?;
        let now = Utc::now();
        contact.deleted_at = Some(now);
        contact.updated_at = now;
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn email(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[tokio::test]
    async fn test_insert_assigns_monotonic_ids() -> EntwineResult<()> {
        let store = InMemoryContactStore::new();
        let a = store.insert(NewContact::primary(email("a@x.com"), None)).await?;
        let b = store.insert(NewContact::primary(email("b@x.com"), None)).await?;
        let c = store.insert(NewContact::primary(email("c@x.com"), None)).await?;
        assert!(a.id < b.id);
        assert!(b.id < c.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_find_matches_on_either_field() -> EntwineResult<()> {
        let store = InMemoryContactStore::new();
        let by_mail = store
            .insert(NewContact::primary(email("a@x.com"), Some("111".to_string())))
            .await?;
        let by_phone = store
            .insert(NewContact::primary(email("b@x.com"), Some("222".to_string())))
            .await?;
        store
            .insert(NewContact::primary(email("c@x.com"), Some("333".to_string())))
            .await?;

        let matches = store
            .find_by_email_or_phone(Some("a@x.com"), Some("222"))
            .await?;
        let ids: Vec<ContactId> = matches.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![by_mail.id, by_phone.id]);
        Ok(())
    }

    #[tokio::test]
    async fn test_null_input_matches_nothing() -> EntwineResult<()> {
        let store = InMemoryContactStore::new();
        // Row with a null phone must not match a null phone input.
        store.insert(NewContact::primary(email("a@x.com"), None)).await?;

        let matches = store.find_by_email_or_phone(None, None).await?;
        assert!(matches.is_empty());

        let matches = store.find_by_email_or_phone(Some("other@x.com"), None).await?;
        assert!(matches.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_soft_deleted_rows_are_invisible() -> EntwineResult<()> {
        let store = InMemoryContactStore::new();
        let contact = store
            .insert(NewContact::primary(email("a@x.com"), Some("111".to_string())))
            .await?;
        store.soft_delete(contact.id).await?;

        assert!(store
            .find_by_email_or_phone(Some("a@x.com"), Some("111"))
            .await?
            .is_empty());
        assert!(store.find_primaries_by_ids(&[contact.id]).await?.is_empty());
        assert!(store.find_by_id_or_linked_id(contact.id).await?.is_empty());
        assert_eq!(store.live_count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_soft_delete_missing_contact_fails() {
        let store = InMemoryContactStore::new();
        let err = store.soft_delete(ContactId(99)).await.unwrap_err();
        assert_eq!(
            err,
            StoreError::NotFound { id: ContactId(99) }.into()
        );
    }

    #[tokio::test]
    async fn test_primaries_returned_oldest_first() -> EntwineResult<()> {
        let store = InMemoryContactStore::new();
        let first = store.insert(NewContact::primary(email("a@x.com"), None)).await?;
        let second = store.insert(NewContact::primary(email("b@x.com"), None)).await?;

        // Query in reverse order; result must still be creation order.
        let primaries = store.find_primaries_by_ids(&[second.id, first.id]).await?;
        let ids: Vec<ContactId> = primaries.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
        Ok(())
    }

    #[tokio::test]
    async fn test_primaries_query_skips_secondaries() -> EntwineResult<()> {
        let store = InMemoryContactStore::new();
        let main = store.insert(NewContact::primary(email("a@x.com"), None)).await?;
        let member = store
            .insert(NewContact::secondary(email("b@x.com"), None, main.id))
            .await?;

        // A secondary id in the lookup set must not be elected.
        let primaries = store.find_primaries_by_ids(&[member.id, main.id]).await?;
        let ids: Vec<ContactId> = primaries.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![main.id]);
        Ok(())
    }

    #[tokio::test]
    async fn test_bulk_update_precedence_demotes_and_links() -> EntwineResult<()> {
        let store = InMemoryContactStore::new();
        let main = store.insert(NewContact::primary(email("a@x.com"), None)).await?;
        let other = store.insert(NewContact::primary(email("b@x.com"), None)).await?;

        let changed = store.bulk_update_precedence(&[other.id], main.id).await?;
        assert_eq!(changed, 1);

        let cluster = store.find_by_id_or_linked_id(main.id).await?;
        assert_eq!(cluster.len(), 2);
        let demoted = cluster.iter().find(|c| c.id == other.id).unwrap();
        assert_eq!(demoted.link_precedence, LinkPrecedence::Secondary);
        assert_eq!(demoted.linked_id, Some(main.id));
        assert!(demoted.updated_at >= demoted.created_at);
        Ok(())
    }

    #[tokio::test]
    async fn test_bulk_relink_repoints_dependents() -> EntwineResult<()> {
        let store = InMemoryContactStore::new();
        let main = store.insert(NewContact::primary(email("a@x.com"), None)).await?;
        let demoted = store.insert(NewContact::primary(email("b@x.com"), None)).await?;
        let dependent = store
            .insert(NewContact::secondary(email("c@x.com"), None, demoted.id))
            .await?;

        store.bulk_update_precedence(&[demoted.id], main.id).await?;
        let changed = store.bulk_relink(&[demoted.id], main.id).await?;
        assert_eq!(changed, 1);

        let cluster = store.find_by_id_or_linked_id(main.id).await?;
        let moved = cluster.iter().find(|c| c.id == dependent.id).unwrap();
        assert_eq!(moved.linked_id, Some(main.id));
        Ok(())
    }

    #[tokio::test]
    async fn test_cluster_fetch_includes_head_and_members() -> EntwineResult<()> {
        let store = InMemoryContactStore::new();
        let main = store
            .insert(NewContact::primary(email("a@x.com"), Some("111".to_string())))
            .await?;
        let member = store
            .insert(NewContact::secondary(email("a@x.com"), Some("222".to_string()), main.id))
            .await?;
        // Unrelated contact outside the cluster.
        store.insert(NewContact::primary(email("z@x.com"), None)).await?;

        let cluster = store.find_by_id_or_linked_id(main.id).await?;
        let ids: Vec<ContactId> = cluster.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![main.id, member.id]);
        Ok(())
    }
}
