//! Identify endpoint request/response types

use entwine_core::{ConsolidatedIdentity, ContactId};
use serde::{Deserialize, Serialize};

// ============================================================================
// REQUEST
// ============================================================================

/// Phone number as submitted by clients: either a JSON string or a bare
/// number. Numeric input is coerced to its decimal string form before it
/// reaches the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PhoneNumberInput {
    Text(String),
    Digits(i64),
}

impl PhoneNumberInput {
    pub fn into_string(self) -> String {
        match self {
            PhoneNumberInput::Text(s) => s,
            PhoneNumberInput::Digits(n) => n.to_string(),
        }
    }
}

/// POST /identify request body.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct IdentifyRequest {
    pub email: Option<String>,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub phone_number: Option<PhoneNumberInput>,
}

// ============================================================================
// RESPONSE
// ============================================================================

/// The consolidated contact view inside an identify response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ContactView {
    #[cfg_attr(feature = "openapi", schema(value_type = i64))]
    pub primary_contact_id: ContactId,
    pub emails: Vec<String>,
    pub phone_numbers: Vec<String>,
    #[cfg_attr(feature = "openapi", schema(value_type = Vec<i64>))]
    pub secondary_contact_ids: Vec<ContactId>,
}

/// POST /identify response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct IdentifyResponse {
    pub contact: ContactView,
}

impl From<ConsolidatedIdentity> for IdentifyResponse {
    fn from(identity: ConsolidatedIdentity) -> Self {
        Self {
            contact: ContactView {
                primary_contact_id: identity.primary_contact_id,
                emails: identity.emails,
                phone_numbers: identity.phone_numbers,
                secondary_contact_ids: identity.secondary_contact_ids,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_string_phone() -> Result<(), serde_json::Error> {
        let req: IdentifyRequest =
            serde_json::from_str(r#"{"email":"a@x.com","phoneNumber":"111"}"#)?;
        assert_eq!(req.email.as_deref(), Some("a@x.com"));
        assert_eq!(
            req.phone_number.map(PhoneNumberInput::into_string),
            Some("111".to_string())
        );
        Ok(())
    }

    #[test]
    fn test_request_coerces_numeric_phone() -> Result<(), serde_json::Error> {
        let req: IdentifyRequest = serde_json::from_str(r#"{"phoneNumber":9876543210}"#)?;
        assert_eq!(
            req.phone_number.map(PhoneNumberInput::into_string),
            Some("9876543210".to_string())
        );
        Ok(())
    }

    #[test]
    fn test_request_tolerates_missing_fields() -> Result<(), serde_json::Error> {
        let req: IdentifyRequest = serde_json::from_str("{}")?;
        assert!(req.email.is_none());
        assert!(req.phone_number.is_none());
        Ok(())
    }

    #[test]
    fn test_response_uses_camel_case() -> Result<(), serde_json::Error> {
        let response = IdentifyResponse::from(ConsolidatedIdentity {
            primary_contact_id: ContactId(1),
            emails: vec!["a@x.com".to_string()],
            phone_numbers: vec!["111".to_string()],
            secondary_contact_ids: vec![ContactId(2)],
        });
        let json = serde_json::to_string(&response)?;

        assert!(json.contains("\"contact\""));
        assert!(json.contains("\"primaryContactId\":1"));
        assert!(json.contains("\"phoneNumbers\":[\"111\"]"));
        assert!(json.contains("\"secondaryContactIds\":[2]"));
        Ok(())
    }
}
