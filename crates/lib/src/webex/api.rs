//! Messaging API seam: the only capabilities the dispatch core needs from the platform.

use crate::error::ApiError;
use crate::webex::wire::{Message, MessageSendResult, OutboundMessage, Person};
use async_trait::async_trait;

/// Read and write access to the messaging platform. Implemented by
/// [`WebexClient`](crate::webex::WebexClient); tests substitute a fake.
#[async_trait]
pub trait MessagingApi: Send + Sync {
    /// GET /messages/{id}.
    async fn get_message(&self, message_id: &str) -> Result<Message, ApiError>;

    /// GET /people/{id}.
    async fn get_person(&self, person_id: &str) -> Result<Person, ApiError>;

    /// GET /people/me: the bot's own account.
    async fn get_me(&self) -> Result<Person, ApiError>;

    /// POST /messages. One outbound write per call.
    async fn create_message(&self, message: &OutboundMessage)
        -> Result<MessageSendResult, ApiError>;
}
