//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.hears/config.json`) and environment.
//! Environment variables override file values so deployments can inject secrets.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::webex::WEBEX_API_BASE;

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// HTTP gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Webex bot account and webhook settings.
    #[serde(default)]
    pub webex: WebexConfig,
}

/// Gateway bind, port, and webhook route.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// HTTP port (default 3000). Overridden by PORT env.
    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Bind address (default "127.0.0.1").
    #[serde(default = "default_gateway_bind")]
    pub bind: String,

    /// Route Webex POSTs webhook deliveries to (default "/webex-bot/webhook").
    #[serde(default = "default_webhook_path")]
    pub webhook_path: String,
}

fn default_gateway_port() -> u16 {
    3000
}

fn default_gateway_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_webhook_path() -> String {
    "/webex-bot/webhook".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_gateway_port(),
            bind: default_gateway_bind(),
            webhook_path: default_webhook_path(),
        }
    }
}

/// Webex bot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebexConfig {
    /// Bot access token. Overridden by BOT_ACCESS_TOKEN env when set.
    pub bot_token: Option<String>,
    /// REST base URL. Overridden by WEBEX_API_BASE env when set.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Full public URL Webex should POST deliveries to. Takes precedence over domainName.
    pub webhook_url: Option<String>,
    /// Public domain of this gateway; the webhook URL becomes `https://{domainName}{webhookPath}`. Overridden by DOMAIN_NAME env.
    pub domain_name: Option<String>,
    /// Name of the webhook registration; existing webhooks with this name are replaced on start.
    #[serde(default = "default_webhook_name")]
    pub webhook_name: String,
}

fn default_api_base_url() -> String {
    WEBEX_API_BASE.to_string()
}

fn default_webhook_name() -> String {
    "hears".to_string()
}

impl Default for WebexConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            api_base_url: default_api_base_url(),
            webhook_url: None,
            domain_name: None,
            webhook_name: default_webhook_name(),
        }
    }
}

/// Non-empty, trimmed value of an environment variable.
fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name).ok().and_then(|s| {
        let t = s.trim();
        if t.is_empty() {
            None
        } else {
            Some(t.to_string())
        }
    })
}

fn trimmed(value: Option<&String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Resolve the bot token: env BOT_ACCESS_TOKEN overrides config.
pub fn resolve_bot_token(config: &Config) -> Option<String> {
    env_nonempty("BOT_ACCESS_TOKEN").or_else(|| trimmed(config.webex.bot_token.as_ref()))
}

/// Resolve the REST base URL: env WEBEX_API_BASE overrides config.
pub fn resolve_api_base_url(config: &Config) -> String {
    env_nonempty("WEBEX_API_BASE")
        .or_else(|| trimmed(Some(&config.webex.api_base_url)))
        .unwrap_or_else(default_api_base_url)
}

/// Resolve the public webhook target: explicit webhookUrl, else `https://{domain}{webhookPath}`.
pub fn resolve_webhook_url(config: &Config) -> Option<String> {
    if let Some(url) = trimmed(config.webex.webhook_url.as_ref()) {
        return Some(url);
    }
    let domain = env_nonempty("DOMAIN_NAME").or_else(|| trimmed(config.webex.domain_name.as_ref()))?;
    Some(format!(
        "https://{}{}",
        domain.trim_end_matches('/'),
        normalize_path(&config.gateway.webhook_path)
    ))
}

/// Webhook route with a leading slash.
pub fn normalize_path(path: &str) -> String {
    let p = path.trim();
    if p.starts_with('/') {
        p.to_string()
    } else {
        format!("/{}", p)
    }
}

/// Apply env overrides that replace config values in place (PORT).
pub fn apply_env_overrides(config: &mut Config) {
    if let Some(port) = env_nonempty("PORT") {
        match port.parse::<u16>() {
            Ok(p) => config.gateway.port = p,
            Err(_) => log::warn!("ignoring invalid PORT value: {}", port),
        }
    }
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("HEARS_CONFIG_PATH").map(PathBuf::from).unwrap_or_else(|_| {
        dirs::home_dir()
            .map(|h| h.join(".hears").join("config.json"))
            .unwrap_or_else(|| PathBuf::from("config.json"))
    })
}

/// Load config from the given path (or the default path). Missing file => default config.
/// Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let mut config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    apply_env_overrides(&mut config);
    Ok((config, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_sections_missing() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.gateway.port, 3000);
        assert_eq!(config.gateway.bind, "127.0.0.1");
        assert_eq!(config.gateway.webhook_path, "/webex-bot/webhook");
        assert_eq!(config.webex.api_base_url, "https://webexapis.com/v1");
        assert_eq!(config.webex.webhook_name, "hears");
        assert!(config.webex.bot_token.is_none());
    }

    #[test]
    fn parses_camel_case_keys() {
        let config: Config = serde_json::from_str(
            r#"{"gateway":{"port":8080,"webhookPath":"hook"},"webex":{"botToken":" abc ","webhookUrl":"https://bot.example.com/in"}}"#,
        )
        .unwrap();
        assert_eq!(config.gateway.port, 8080);
        assert_eq!(config.webex.bot_token.as_deref(), Some(" abc "));
        assert_eq!(normalize_path(&config.gateway.webhook_path), "/hook");
        assert_eq!(
            resolve_webhook_url(&config).as_deref(),
            Some("https://bot.example.com/in")
        );
    }

    #[test]
    fn webhook_url_from_domain() {
        let mut config = Config::default();
        config.webex.domain_name = Some("bot.example.com/".to_string());
        if std::env::var("DOMAIN_NAME").is_err() {
            assert_eq!(
                resolve_webhook_url(&config).as_deref(),
                Some("https://bot.example.com/webex-bot/webhook")
            );
        }
    }

    #[test]
    fn no_webhook_url_without_domain() {
        if std::env::var("DOMAIN_NAME").is_err() {
            assert_eq!(resolve_webhook_url(&Config::default()), None);
        }
    }

    #[test]
    fn blank_config_token_is_ignored() {
        let mut config = Config::default();
        config.webex.bot_token = Some("   ".to_string());
        if std::env::var("BOT_ACCESS_TOKEN").is_err() {
            assert_eq!(resolve_bot_token(&config), None);
        }
    }
}
