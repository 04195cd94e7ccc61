//! Webex platform integration.
//!
//! The [`MessagingApi`] trait is what the dispatch core depends on; [`WebexClient`]
//! is the REST implementation, which also manages the bot's webhook subscription.

mod api;
mod client;
pub mod wire;

pub use api::MessagingApi;
pub use client::{WebexClient, WEBEX_API_BASE};
pub use wire::{
    Message, MessageSendResult, OutboundMessage, Person, Webhook, WebhookData, WebhookPayload,
};
