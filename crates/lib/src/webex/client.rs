//! Webex REST client: message and people reads, message sends, webhook subscriptions.

use crate::error::ApiError;
use crate::webex::api::MessagingApi;
use crate::webex::wire::{
    CreateWebhook, ListResponse, Message, MessageSendResult, OutboundMessage, Person, Webhook,
};
use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;

pub const WEBEX_API_BASE: &str = "https://webexapis.com/v1";

const WEBHOOK_RESOURCE: &str = "messages";
const WEBHOOK_EVENT: &str = "created";

/// Client for the Webex REST API, authenticated with a bot bearer token.
#[derive(Clone)]
pub struct WebexClient {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl WebexClient {
    pub fn new(token: impl Into<String>, base_url: Option<String>) -> Self {
        let base_url = base_url
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| WEBEX_API_BASE.to_string());
        Self {
            base_url,
            token: token.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        let url = endpoint(&self.base_url, segments)?;
        let res = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        decode_response(res).await
    }

    /// GET /webhooks: webhooks registered by this bot.
    pub async fn list_webhooks(&self) -> Result<Vec<Webhook>, ApiError> {
        let list: ListResponse<Webhook> = self.get_json(&["webhooks"]).await?;
        Ok(list.items)
    }

    /// POST /webhooks: subscribe `target_url` to message-created events.
    pub async fn create_webhook(&self, name: &str, target_url: &str) -> Result<Webhook, ApiError> {
        let url = endpoint(&self.base_url, &["webhooks"])?;
        let body = CreateWebhook {
            name,
            target_url,
            resource: WEBHOOK_RESOURCE,
            event: WEBHOOK_EVENT,
        };
        let res = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        decode_response(res).await
    }

    /// DELETE /webhooks/{id}.
    pub async fn delete_webhook(&self, webhook_id: &str) -> Result<(), ApiError> {
        let url = endpoint(&self.base_url, &["webhooks", webhook_id])?;
        let res = self
            .client
            .delete(url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(ApiError::Api(format!("{} {}", status, body)));
        }
        Ok(())
    }

    /// Replace any webhook named `name` with a fresh subscription pointing at `target_url`.
    pub async fn register_webhook(&self, name: &str, target_url: &str) -> Result<Webhook, ApiError> {
        for existing in self.list_webhooks().await? {
            if existing.name == name {
                log::debug!("webex: removing stale webhook {} ({})", existing.id, existing.target_url);
                self.delete_webhook(&existing.id).await?;
            }
        }
        self.create_webhook(name, target_url).await
    }
}

/// `{base}/{segments...}` with each segment percent-encoded, so ids from webhook
/// bodies can't address a different endpoint.
fn endpoint(base_url: &str, segments: &[&str]) -> Result<Url, ApiError> {
    if let Some(bad) = segments.iter().find(|s| s.is_empty() || **s == "." || **s == "..") {
        return Err(ApiError::Api(format!("invalid path segment {:?}", bad)));
    }
    let mut url = Url::parse(base_url)
        .map_err(|e| ApiError::Api(format!("invalid base url {}: {}", base_url, e)))?;
    url.path_segments_mut()
        .map_err(|_| ApiError::Api(format!("base url {} cannot carry a path", base_url)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Map a response to `T`: non-2xx becomes `ApiError::Api`, an empty or `null` body becomes `ApiError::Empty`.
async fn decode_response<T: DeserializeOwned>(res: reqwest::Response) -> Result<T, ApiError> {
    if !res.status().is_success() {
        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        return Err(ApiError::Api(format!("{} {}", status, body)));
    }
    let body = res.text().await?;
    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(ApiError::Empty);
    }
    Ok(serde_json::from_str(trimmed)?)
}

#[async_trait]
impl MessagingApi for WebexClient {
    async fn get_message(&self, message_id: &str) -> Result<Message, ApiError> {
        self.get_json(&["messages", message_id]).await
    }

    async fn get_person(&self, person_id: &str) -> Result<Person, ApiError> {
        self.get_json(&["people", person_id]).await
    }

    async fn get_me(&self) -> Result<Person, ApiError> {
        self.get_json(&["people", "me"]).await
    }

    async fn create_message(
        &self,
        message: &OutboundMessage,
    ) -> Result<MessageSendResult, ApiError> {
        let url = endpoint(&self.base_url, &["messages"])?;
        let res = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .json(message)
            .send()
            .await?;
        decode_response(res).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_appends_segments_to_base_path() {
        let url = endpoint(WEBEX_API_BASE, &["messages", "m1"]).unwrap();
        assert_eq!(url.as_str(), "https://webexapis.com/v1/messages/m1");
        let url = endpoint("http://127.0.0.1:1234", &["people", "me"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:1234/people/me");
    }

    #[test]
    fn endpoint_encodes_ids_from_untrusted_input() {
        let url = endpoint(WEBEX_API_BASE, &["messages", "../webhooks"]).unwrap();
        assert_eq!(url.path(), "/v1/messages/..%2Fwebhooks");
        let url = endpoint(WEBEX_API_BASE, &["people", "p1?max=1#x"]).unwrap();
        assert_eq!(url.path(), "/v1/people/p1%3Fmax=1%23x");
        assert!(url.query().is_none());
    }

    #[test]
    fn endpoint_rejects_dot_segments() {
        assert!(matches!(
            endpoint(WEBEX_API_BASE, &["messages", ".."]),
            Err(ApiError::Api(_))
        ));
        assert!(endpoint(WEBEX_API_BASE, &["messages", ""]).is_err());
    }
}
