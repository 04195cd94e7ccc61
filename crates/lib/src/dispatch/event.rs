//! Normalized inbound event built from a raw webhook delivery.

use crate::error::MalformedEventError;
use crate::webex::WebhookPayload;

/// Conversation kind the message was posted in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RoomType {
    #[default]
    Direct,
    Group,
}

impl RoomType {
    /// Webex reports `"group"` for spaces and `"direct"` for 1:1 rooms; anything else is treated as direct.
    pub fn from_wire(s: Option<&str>) -> Self {
        match s.map(str::trim) {
            Some(t) if t.eq_ignore_ascii_case("group") => RoomType::Group,
            _ => RoomType::Direct,
        }
    }
}

/// One message-created notification, reduced to the identifiers the dispatcher needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub message_id: String,
    pub person_id: String,
    pub room_id: String,
    pub room_type: RoomType,
}

fn required(value: Option<&String>, field: &'static str) -> Result<String, MalformedEventError> {
    value
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or(MalformedEventError { field })
}

impl TryFrom<&WebhookPayload> for InboundEvent {
    type Error = MalformedEventError;

    fn try_from(payload: &WebhookPayload) -> Result<Self, Self::Error> {
        let data = payload
            .data
            .as_ref()
            .ok_or(MalformedEventError { field: "data" })?;
        Ok(Self {
            message_id: required(data.id.as_ref(), "data.id")?,
            person_id: required(data.person_id.as_ref(), "data.personId")?,
            room_id: required(data.room_id.as_ref(), "data.roomId")?,
            room_type: RoomType::from_wire(data.room_type.as_deref()),
        })
    }
}
