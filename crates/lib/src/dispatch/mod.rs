//! Webhook-to-command dispatch pipeline.
//!
//! Raw webhook → [`InboundEvent`] → [`MessageResolver`] → self-message filter →
//! [`CommandRegistry`](crate::commands::CommandRegistry) lookup → handler with a
//! [`BotHandle`] → [`ReplySender`].

mod dispatcher;
mod event;
mod identity;
mod reply;
mod resolver;

#[cfg(test)]
pub(crate) mod fake;

pub use dispatcher::{DispatchOutcome, DispatchStatus, Dispatcher, FAILURE_NOTICE};
pub use event::{InboundEvent, RoomType};
pub use identity::{is_own_message, BotIdentity};
pub use reply::{BotHandle, Reply, ReplySender, Room};
pub use resolver::{MessageResolver, ResolvedMessage, SenderProfile, UNKNOWN_DISPLAY_NAME};
