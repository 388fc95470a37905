use serde::{Deserialize, Serialize};

use crate::model::id::opaque_id;

opaque_id!(
    /// Opaque participant identifier, unique within a room.
    ParticipantId
);

/// Participant as described on the wire (`users-list` entries, `user-joined`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantInfo {
    #[serde(rename = "userID")]
    pub user_id: ParticipantId,
    #[serde(rename = "userName", default)]
    pub user_name: String,
    #[serde(rename = "imgUrl", default)]
    pub img_url: String,
}

impl ParticipantInfo {
    pub fn new(user_id: impl Into<ParticipantId>) -> Self {
        Self {
            user_id: user_id.into(),
            user_name: String::new(),
            img_url: String::new(),
        }
    }
}
