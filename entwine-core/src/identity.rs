//! Consolidated identity view
//!
//! The merged picture of one person: the canonical primary contact, the
//! union of known emails and phone numbers, and every secondary contact id
//! in the cluster. Output ordering is part of the contract: the primary's
//! own values come first, then remaining distinct values in ascending
//! creation order.

use crate::ContactId;
use serde::{Deserialize, Serialize};

/// The merged view of a cluster returned by the resolution engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidatedIdentity {
    pub primary_contact_id: ContactId,
    pub emails: Vec<String>,
    pub phone_numbers: Vec<String>,
    pub secondary_contact_ids: Vec<ContactId>,
}

impl ConsolidatedIdentity {
    /// View for a freshly created, still-unlinked primary.
    pub fn solitary(
        primary_contact_id: ContactId,
        email: Option<String>,
        phone_number: Option<String>,
    ) -> Self {
        Self {
            primary_contact_id,
            emails: email.into_iter().collect(),
            phone_numbers: phone_number.into_iter().collect(),
            secondary_contact_ids: Vec::new(),
        }
    }
}

/// Append `value` unless already present, preserving first-seen order.
///
/// The linear scan is deliberate: clusters are small and insertion order
/// is part of the response contract, which rules out unordered sets.
pub fn push_unique<T: PartialEq + Clone>(list: &mut Vec<T>, value: &T) {
    if !list.contains(value) {
        list.push(value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_unique_preserves_first_seen_order() {
        let mut list: Vec<String> = Vec::new();
        for v in ["b", "a", "b", "c", "a"] {
            push_unique(&mut list, &v.to_string());
        }
        assert_eq!(list, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_solitary_with_email_only() {
        let identity =
            ConsolidatedIdentity::solitary(ContactId(1), Some("a@x.com".to_string()), None);
        assert_eq!(identity.primary_contact_id, ContactId(1));
        assert_eq!(identity.emails, vec!["a@x.com"]);
        assert!(identity.phone_numbers.is_empty());
        assert!(identity.secondary_contact_ids.is_empty());
    }

    #[test]
    fn test_solitary_with_both_fields() {
        let identity = ConsolidatedIdentity::solitary(
            ContactId(5),
            Some("a@x.com".to_string()),
            Some("111".to_string()),
        );
        assert_eq!(identity.emails, vec!["a@x.com"]);
        assert_eq!(identity.phone_numbers, vec!["111"]);
    }

    #[test]
    fn test_consolidated_identity_serde_roundtrip() -> Result<(), serde_json::Error> {
        let identity = ConsolidatedIdentity {
            primary_contact_id: ContactId(1),
            emails: vec!["a@x.com".to_string()],
            phone_numbers: vec!["111".to_string(), "222".to_string()],
            secondary_contact_ids: vec![ContactId(2), ContactId(3)],
        };
        let json = serde_json::to_string(&identity)?;
        let back: ConsolidatedIdentity = serde_json::from_str(&json)?;
        assert_eq!(back, identity);
        Ok(())
    }
}
