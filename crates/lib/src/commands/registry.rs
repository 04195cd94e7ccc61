//! Command registry: definitions kept in priority order, first match wins.

use crate::commands::pattern::CommandPattern;
use crate::dispatch::{BotHandle, Reply};
use crate::error::HandlerError;
use async_trait::async_trait;
use std::sync::Arc;

/// Priority of the catch-all command. Lower numbers are tried first.
pub const CATCH_ALL_PRIORITY: i32 = 1000;

/// Sender of the triggering message, as handlers see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerPerson {
    pub display_name: String,
    pub email: String,
}

/// Normalized (sender, text) pair a handler runs against. `text` is empty, never absent, when unresolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    pub person: TriggerPerson,
    pub text: String,
}

/// A command's behavior. Returning `Some` asks the dispatcher to send it via the bot handle.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn execute(&self, bot: &BotHandle, trigger: &Trigger) -> Result<Option<Reply>, HandlerError>;
}

#[derive(Clone)]
pub struct CommandDefinition {
    pub pattern: CommandPattern,
    pub help_text: String,
    pub priority: i32,
    pub handler: Arc<dyn CommandHandler>,
}

impl CommandDefinition {
    pub fn new(
        pattern: CommandPattern,
        help_text: impl Into<String>,
        priority: i32,
        handler: impl CommandHandler + 'static,
    ) -> Self {
        Self {
            pattern,
            help_text: help_text.into(),
            priority,
            handler: Arc::new(handler),
        }
    }

    /// Pattern identifier for logs and outcomes.
    pub fn id(&self) -> String {
        self.pattern.to_string()
    }
}

impl std::fmt::Debug for CommandDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDefinition")
            .field("pattern", &self.pattern)
            .field("help_text", &self.help_text)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

/// Ordered set of commands. Read-only once the dispatcher holds it.
#[derive(Debug, Default, Clone)]
pub struct CommandRegistry {
    /// Sorted by priority ascending; ties keep registration order.
    commands: Vec<CommandDefinition>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, def: CommandDefinition) {
        let at = self.commands.partition_point(|c| c.priority <= def.priority);
        self.commands.insert(at, def);
    }

    /// All definitions, in match order.
    pub fn all(&self) -> &[CommandDefinition] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// First definition, in priority order, whose pattern matches `text`.
    pub fn find_match(&self, text: &str) -> Option<&CommandDefinition> {
        self.commands.iter().find(|c| c.pattern.matches(text))
    }

    /// Non-empty help texts in priority order, one per line.
    pub fn help_listing(&self) -> String {
        self.commands
            .iter()
            .map(|c| c.help_text.as_str())
            .filter(|h| !h.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
