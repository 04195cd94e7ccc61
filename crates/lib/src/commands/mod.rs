//! Commands: patterns, the priority-ordered registry, and the built-in set.

mod builtin;
mod pattern;
mod registry;

pub use builtin::{default_registry, korean_timestamp, CurrentTime, Fallback, Greeting, Help};
pub use pattern::CommandPattern;
pub use registry::{
    CommandDefinition, CommandHandler, CommandRegistry, Trigger, TriggerPerson,
    CATCH_ALL_PRIORITY,
};
