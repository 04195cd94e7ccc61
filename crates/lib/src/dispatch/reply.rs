//! Reply sender and the per-room bot handle given to command handlers.

use crate::commands::CommandRegistry;
use crate::dispatch::event::RoomType;
use crate::error::SendError;
use crate::webex::{MessageSendResult, MessagingApi, OutboundMessage};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Reply content: plain text or markdown. Maps to exactly one of the `text` / `markdown` fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Markdown(String),
}

impl Reply {
    pub fn markdown(s: impl Into<String>) -> Self {
        Reply::Markdown(s.into())
    }

    fn into_outbound(self, room_id: &str) -> OutboundMessage {
        let (text, markdown) = match self {
            Reply::Text(t) => (Some(t), None),
            Reply::Markdown(m) => (None, Some(m)),
        };
        OutboundMessage {
            room_id: room_id.to_string(),
            text,
            markdown,
        }
    }
}

impl From<String> for Reply {
    fn from(s: String) -> Self {
        Reply::Text(s)
    }
}

impl From<&str> for Reply {
    fn from(s: &str) -> Self {
        Reply::Text(s.to_string())
    }
}

/// Sends replies into rooms. One `POST /messages` per [`send`](Self::send).
#[derive(Clone)]
pub struct ReplySender {
    api: Arc<dyn MessagingApi>,
}

impl ReplySender {
    pub fn new(api: Arc<dyn MessagingApi>) -> Self {
        Self { api }
    }

    pub async fn send(
        &self,
        room_id: &str,
        content: impl Into<Reply>,
    ) -> Result<MessageSendResult, SendError> {
        let outbound = content.into().into_outbound(room_id);
        self.api
            .create_message(&outbound)
            .await
            .map_err(|source| {
                log::error!("reply: send to room {} failed: {}", room_id, source);
                SendError {
                    room_id: room_id.to_string(),
                    source,
                }
            })
    }
}

/// The room a bot handle is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: String,
    pub room_type: RoomType,
}

impl Room {
    pub fn title(&self) -> &'static str {
        match self.room_type {
            RoomType::Group => "그룹 채팅",
            RoomType::Direct => "1:1 채팅",
        }
    }
}

/// Capability to reply in one room, for one event.
///
/// Clones share the same event: once any clone has delivered a message,
/// [`has_replied`](Self::has_replied) is true for all of them.
#[derive(Clone)]
pub struct BotHandle {
    room: Room,
    sender: ReplySender,
    commands: Option<Arc<CommandRegistry>>,
    replied: Arc<AtomicBool>,
}

impl BotHandle {
    pub fn new(room: Room, sender: ReplySender) -> Self {
        Self {
            room,
            sender,
            commands: None,
            replied: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Attach the registry the event is dispatched from.
    pub fn with_commands(mut self, commands: Arc<CommandRegistry>) -> Self {
        self.commands = Some(commands);
        self
    }

    pub fn room(&self) -> &Room {
        &self.room
    }

    /// Help texts of the commands currently registered, in match order.
    pub fn help_listing(&self) -> String {
        self.commands
            .as_ref()
            .map(|c| c.help_listing())
            .unwrap_or_default()
    }

    /// True once a message has been delivered through this handle.
    pub fn has_replied(&self) -> bool {
        self.replied.load(Ordering::SeqCst)
    }

    pub async fn say(&self, content: impl Into<Reply>) -> Result<MessageSendResult, SendError> {
        let result = self.sender.send(&self.room.id, content).await?;
        self.replied.store(true, Ordering::SeqCst);
        Ok(result)
    }
}
