use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::ParticipantId;
use crate::model::id::opaque_id;

opaque_id!(
    /// Globally unique chat message id.
    MessageId
);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatAuthor {
    pub id: ParticipantId,
    #[serde(rename = "userName", alias = "name", default)]
    pub user_name: String,
    #[serde(rename = "imgUrl", alias = "photo", default)]
    pub img_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub text: String,
    #[serde(default)]
    pub time: String,
    #[serde(rename = "user")]
    pub author: ChatAuthor,
}

impl ChatMessage {
    /// Builds a fresh message with a new id, stamped with the current UTC time.
    pub fn compose(author: ChatAuthor, text: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            text: text.into(),
            time: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            author,
        }
    }
}
