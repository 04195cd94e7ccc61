//! Built-in commands: greeting, help, current time, and the catch-all.

use crate::commands::pattern::CommandPattern;
use crate::commands::registry::{
    CommandDefinition, CommandHandler, CommandRegistry, Trigger, CATCH_ALL_PRIORITY,
};
use crate::dispatch::{BotHandle, Reply};
use crate::error::HandlerError;
use async_trait::async_trait;
use chrono::{DateTime, Datelike, TimeZone, Timelike};

pub struct Greeting;

#[async_trait]
impl CommandHandler for Greeting {
    async fn execute(&self, _bot: &BotHandle, trigger: &Trigger) -> Result<Option<Reply>, HandlerError> {
        Ok(Some(
            format!(
                "안녕하세요! {}님. 무엇을 도와드릴까요?",
                trigger.person.display_name
            )
            .into(),
        ))
    }
}

/// Lists the help text of every command in the registry the event was dispatched from.
pub struct Help;

#[async_trait]
impl CommandHandler for Help {
    async fn execute(&self, bot: &BotHandle, _trigger: &Trigger) -> Result<Option<Reply>, HandlerError> {
        Ok(Some(
            format!("다음 명령어를 사용할 수 있습니다:\n{}", bot.help_listing()).into(),
        ))
    }
}

pub struct CurrentTime;

#[async_trait]
impl CommandHandler for CurrentTime {
    async fn execute(&self, _bot: &BotHandle, _trigger: &Trigger) -> Result<Option<Reply>, HandlerError> {
        let now = chrono::Local::now();
        Ok(Some(
            format!("현재 시간은 {} 입니다.", korean_timestamp(&now)).into(),
        ))
    }
}

/// Reply for text no other command understood.
pub struct Fallback;

#[async_trait]
impl CommandHandler for Fallback {
    async fn execute(&self, _bot: &BotHandle, trigger: &Trigger) -> Result<Option<Reply>, HandlerError> {
        Ok(Some(
            format!(
                "\"{}\" 명령어를 이해하지 못했습니다. '도움말'을 입력하여 사용 가능한 명령어를 확인하세요.",
                trigger.text
            )
            .into(),
        ))
    }
}

/// `2024. 1. 5. 오후 3:04:05` (ko-KR locale style).
pub fn korean_timestamp<Tz: TimeZone>(t: &DateTime<Tz>) -> String {
    let (pm, hour) = t.hour12();
    format!(
        "{}. {}. {}. {} {}:{:02}:{:02}",
        t.year(),
        t.month(),
        t.day(),
        if pm { "오후" } else { "오전" },
        hour,
        t.minute(),
        t.second()
    )
}

/// Registry with the built-in commands, including the catch-all.
pub fn default_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry.register(CommandDefinition::new(
        CommandPattern::substring("안녕"),
        "**안녕** - 인사하기",
        10,
        Greeting,
    ));
    registry.register(CommandDefinition::new(
        CommandPattern::substring("도움말"),
        "**도움말** - 사용 가능한 명령어 확인",
        5,
        Help,
    ));
    registry.register(CommandDefinition::new(
        CommandPattern::substring("시간"),
        "**시간** - 현재 시간 확인",
        10,
        CurrentTime,
    ));
    registry.register(CommandDefinition::new(
        CommandPattern::any(),
        "",
        CATCH_ALL_PRIORITY,
        Fallback,
    ));
    registry
}
