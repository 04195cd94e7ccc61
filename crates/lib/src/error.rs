//! Error taxonomy for the dispatch pipeline.
//!
//! Transport-level failures from the messaging API are [`ApiError`]; the dispatch
//! stages wrap them into the stage-specific errors below so the dispatcher can
//! decide, per stage, whether to surface, contain, or swallow them.

/// Failure talking to the messaging platform's REST API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("webex request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("webex api error: {0}")]
    Api(String),
    #[error("webex api returned no data")]
    Empty,
    #[error("webex response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The resolver could not obtain message, sender, or bot identity details.
#[derive(Debug, thiserror::Error)]
pub enum DetailFetchError {
    #[error("fetching message {id} failed: {source}")]
    Message {
        id: String,
        #[source]
        source: ApiError,
    },
    #[error("fetching person {id} failed: {source}")]
    Person {
        id: String,
        #[source]
        source: ApiError,
    },
    #[error("fetching bot identity failed: {0}")]
    Identity(#[source] ApiError),
    #[error("bot identity has no email address")]
    IdentityWithoutEmail,
}

/// Reply transmission into a room failed.
#[derive(Debug, thiserror::Error)]
#[error("sending message to room {room_id} failed: {source}")]
pub struct SendError {
    pub room_id: String,
    #[source]
    pub source: ApiError,
}

/// A command handler failed while executing.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("{0}")]
    Failed(String),
    #[error(transparent)]
    Send(#[from] SendError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
    #[error("command handler panicked: {0}")]
    Panicked(String),
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// The inbound webhook payload is missing a required identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid webhook data: missing {field}")]
pub struct MalformedEventError {
    pub field: &'static str,
}
