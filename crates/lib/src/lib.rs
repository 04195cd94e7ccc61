//! Hears core library: Webex webhook dispatch, command registry, REST client,
//! and the HTTP gateway used by the CLI.

pub mod commands;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod gateway;
pub mod init;
pub mod webex;
