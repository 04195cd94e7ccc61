//! Bot identity and self-message filter.
//!
//! The bot's own email is fetched once from `GET /people/me` and cached. It only
//! changes when [`BotIdentity::refresh`] or [`BotIdentity::invalidate`] is called.

use crate::dispatch::resolver::ResolvedMessage;
use crate::error::DetailFetchError;
use crate::webex::MessagingApi;
use std::sync::Arc;
use tokio::sync::RwLock;

/// True when the message was posted by the bot itself. Exact, case-sensitive comparison.
pub fn is_own_message(message: &ResolvedMessage, bot_email: &str) -> bool {
    message.sender_email == bot_email
}

/// Cached bot email, owned by the dispatcher.
pub struct BotIdentity {
    api: Option<Arc<dyn MessagingApi>>,
    email: RwLock<Option<String>>,
}

impl BotIdentity {
    /// Identity fetched lazily from the messaging API on first use.
    pub fn lazy(api: Arc<dyn MessagingApi>) -> Self {
        Self {
            api: Some(api),
            email: RwLock::new(None),
        }
    }

    /// Identity known up front; never fetched.
    pub fn fixed(email: impl Into<String>) -> Self {
        Self {
            api: None,
            email: RwLock::new(Some(email.into())),
        }
    }

    /// Fetch the bot account and replace the cached email.
    pub async fn refresh(&self) -> Result<String, DetailFetchError> {
        let Some(api) = self.api.as_ref() else {
            return self
                .email
                .read()
                .await
                .clone()
                .ok_or(DetailFetchError::IdentityWithoutEmail);
        };
        let me = api.get_me().await.map_err(DetailFetchError::Identity)?;
        let email = me
            .emails
            .into_iter()
            .next()
            .ok_or(DetailFetchError::IdentityWithoutEmail)?;
        *self.email.write().await = Some(email.clone());
        Ok(email)
    }

    /// Drop the cached email so the next [`email`](Self::email) call fetches it again.
    pub async fn invalidate(&self) {
        if self.api.is_some() {
            *self.email.write().await = None;
        }
    }

    /// Cached email, fetching it on first use. `None` when the fetch fails.
    pub async fn email(&self) -> Option<String> {
        let cached = self.email.read().await.clone();
        if cached.is_some() {
            return cached;
        }
        match self.refresh().await {
            Ok(email) => Some(email),
            Err(e) => {
                log::error!("identity: {}", e);
                None
            }
        }
    }
}
