//! Message resolver: fetch canonical message text and sender profile for a webhook event.
//!
//! Webhook deliveries carry identifiers only. Each call here is a single read
//! against the messaging API with no retries; fallback policy is the caller's.

use crate::error::DetailFetchError;
use crate::webex::{MessagingApi, Person};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Display name used when the sender profile cannot be resolved or has no name.
pub const UNKNOWN_DISPLAY_NAME: &str = "알 수 없는 사용자";

/// Text and sender email of one message. `text` is empty when the message has none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMessage {
    pub text: String,
    pub sender_email: String,
}

/// Sender profile as returned by the people API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderProfile {
    pub id: String,
    pub display_name: String,
    pub emails: Vec<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar_url: Option<String>,
    pub org_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl SenderProfile {
    pub fn primary_email(&self) -> Option<&str> {
        self.emails.first().map(String::as_str)
    }
}

impl From<Person> for SenderProfile {
    fn from(p: Person) -> Self {
        let display_name = p
            .display_name
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| UNKNOWN_DISPLAY_NAME.to_string());
        let created_at = p
            .created
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|d| d.with_timezone(&Utc));
        Self {
            id: p.id.unwrap_or_default(),
            display_name,
            emails: p.emails,
            first_name: p.first_name,
            last_name: p.last_name,
            avatar_url: p.avatar,
            org_id: p.org_id,
            created_at,
        }
    }
}

/// Resolves message and sender details through the messaging API.
#[derive(Clone)]
pub struct MessageResolver {
    api: Arc<dyn MessagingApi>,
}

impl MessageResolver {
    pub fn new(api: Arc<dyn MessagingApi>) -> Self {
        Self { api }
    }

    /// GET /messages/{id} → text and sender email.
    pub async fn resolve(&self, message_id: &str) -> Result<ResolvedMessage, DetailFetchError> {
        let message = self
            .api
            .get_message(message_id)
            .await
            .map_err(|source| DetailFetchError::Message {
                id: message_id.to_string(),
                source,
            })?;
        Ok(ResolvedMessage {
            text: message.text.unwrap_or_default(),
            sender_email: message.person_email.unwrap_or_default(),
        })
    }

    /// GET /people/{id} → sender profile.
    pub async fn resolve_sender(&self, person_id: &str) -> Result<SenderProfile, DetailFetchError> {
        let person = self
            .api
            .get_person(person_id)
            .await
            .map_err(|source| DetailFetchError::Person {
                id: person_id.to_string(),
                source,
            })?;
        Ok(SenderProfile::from(person))
    }
}
