//! Webhook-to-command dispatcher.
//!
//! One call to [`Dispatcher::process_webhook`] walks a single event through
//! resolve → self-message filter → command match → handler → reply. Every
//! failure is contained in the returned [`DispatchOutcome`]; nothing propagates
//! to the webhook transport. At most one reply is sent per event.

use crate::commands::{CommandDefinition, CommandRegistry, Trigger, TriggerPerson};
use crate::dispatch::event::InboundEvent;
use crate::dispatch::identity::{is_own_message, BotIdentity};
use crate::dispatch::reply::{BotHandle, ReplySender, Room};
use crate::dispatch::resolver::{MessageResolver, ResolvedMessage, UNKNOWN_DISPLAY_NAME};
use crate::error::{DetailFetchError, HandlerError};
use crate::webex::{MessagingApi, WebhookPayload};
use serde::Serialize;
use std::sync::Arc;

/// Notice sent to the room when a handler fails. Never carries the error text.
pub const FAILURE_NOTICE: &str = "명령어 처리 중 오류가 발생했습니다.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchStatus {
    Success,
    Ignored,
    Error,
    UnknownCommand,
}

/// Acknowledgment relayed to the webhook transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchOutcome {
    pub status: DispatchStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

impl DispatchOutcome {
    fn new(status: DispatchStatus) -> Self {
        Self {
            status,
            message: None,
            command: None,
        }
    }

    pub fn success(command: impl Into<String>) -> Self {
        Self::new(DispatchStatus::Success).with_command(command)
    }

    pub fn ignored(message: impl Into<String>) -> Self {
        Self::new(DispatchStatus::Ignored).with_message(message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(DispatchStatus::Error).with_message(message)
    }

    pub fn unknown_command() -> Self {
        Self::new(DispatchStatus::UnknownCommand)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }
}

pub struct Dispatcher {
    registry: Arc<CommandRegistry>,
    resolver: MessageResolver,
    identity: BotIdentity,
    sender: ReplySender,
}

impl Dispatcher {
    /// Dispatcher whose bot identity is fetched from `api` on first use.
    pub fn new(registry: Arc<CommandRegistry>, api: Arc<dyn MessagingApi>) -> Self {
        Self {
            registry,
            resolver: MessageResolver::new(api.clone()),
            identity: BotIdentity::lazy(api.clone()),
            sender: ReplySender::new(api),
        }
    }

    pub fn with_identity(mut self, identity: BotIdentity) -> Self {
        self.identity = identity;
        self
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn identity(&self) -> &BotIdentity {
        &self.identity
    }

    /// Re-fetch the bot's own email.
    pub async fn refresh_identity(&self) -> Result<String, DetailFetchError> {
        self.identity.refresh().await
    }

    /// Validate a raw webhook delivery and dispatch it. Always returns an outcome.
    pub async fn process_webhook(&self, payload: &WebhookPayload) -> DispatchOutcome {
        log::debug!(
            "dispatch: webhook received: {}",
            payload.id.as_deref().unwrap_or("-")
        );
        match InboundEvent::try_from(payload) {
            Ok(event) => self.dispatch(&event).await,
            Err(e) => {
                log::warn!("dispatch: {}", e);
                DispatchOutcome::error(e.to_string())
            }
        }
    }

    pub async fn dispatch(&self, event: &InboundEvent) -> DispatchOutcome {
        let message = match self.resolver.resolve(&event.message_id).await {
            Ok(m) => m,
            Err(e) => {
                log::error!("dispatch: {}", e);
                return DispatchOutcome::error(e.to_string());
            }
        };

        if let Some(bot_email) = self.identity.email().await {
            if is_own_message(&message, &bot_email) {
                log::debug!("dispatch: ignoring message {} sent by the bot", event.message_id);
                return DispatchOutcome::ignored("bot message ignored");
            }
        }

        let trigger = self.build_trigger(event, message).await;
        log::info!(
            "dispatch: message \"{}\" from {}",
            trigger.text,
            trigger.person.display_name
        );

        let Some(command) = self.registry.find_match(&trigger.text) else {
            log::info!(
                "dispatch: no command matched \"{}\" from {}",
                trigger.text,
                trigger.person.display_name
            );
            return DispatchOutcome::unknown_command();
        };

        let bot = BotHandle::new(
            Room {
                id: event.room_id.clone(),
                room_type: event.room_type,
            },
            self.sender.clone(),
        )
        .with_commands(self.registry.clone());
        self.execute(command, bot, trigger).await
    }

    /// Sender profile failures fall back to a placeholder name and the message's sender email.
    async fn build_trigger(&self, event: &InboundEvent, message: ResolvedMessage) -> Trigger {
        let person = match self.resolver.resolve_sender(&event.person_id).await {
            Ok(profile) => TriggerPerson {
                email: profile
                    .primary_email()
                    .map(str::to_string)
                    .unwrap_or_else(|| message.sender_email.clone()),
                display_name: profile.display_name,
            },
            Err(e) => {
                log::warn!("dispatch: {}", e);
                TriggerPerson {
                    display_name: UNKNOWN_DISPLAY_NAME.to_string(),
                    email: message.sender_email.clone(),
                }
            }
        };
        Trigger {
            person,
            text: message.text,
        }
    }

    async fn execute(
        &self,
        command: &CommandDefinition,
        bot: BotHandle,
        trigger: Trigger,
    ) -> DispatchOutcome {
        let id = command.id();
        log::info!(
            "dispatch: running command [{}] for {}",
            id,
            trigger.person.display_name
        );

        let handler = command.handler.clone();
        let task_bot = bot.clone();
        let result = tokio::spawn(async move { handler.execute(&task_bot, &trigger).await })
            .await
            .unwrap_or_else(|join| Err(HandlerError::Panicked(panic_message(join))));

        match result {
            Ok(Some(_)) if bot.has_replied() => {
                log::warn!(
                    "dispatch: command [{}] already replied; returned content dropped",
                    id
                );
                DispatchOutcome::success(id)
            }
            Ok(Some(reply)) => match bot.say(reply).await {
                Ok(_) => DispatchOutcome::success(id),
                Err(e) => DispatchOutcome::error(e.to_string()).with_command(id),
            },
            Ok(None) => DispatchOutcome::success(id),
            Err(e) => {
                log::error!("dispatch: command [{}] failed: {}", id, e);
                if bot.has_replied() {
                    log::debug!("dispatch: command [{}] already replied; no failure notice", id);
                } else if let Err(notice_err) = bot.say(FAILURE_NOTICE).await {
                    log::warn!("dispatch: failure notice not delivered: {}", notice_err);
                }
                DispatchOutcome::error(e.to_string()).with_command(id)
            }
        }
    }
}

fn panic_message(join: tokio::task::JoinError) -> String {
    if !join.is_panic() {
        return join.to_string();
    }
    let payload = join.into_panic();
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
