use serde::{Deserialize, Serialize};

use crate::model::{ChatAuthor, ParticipantId, ParticipantInfo};

/// Who we are in the room. Fixed for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalIdentity {
    pub id: ParticipantId,
    pub display_name: String,
    pub avatar_url: String,
    pub access_credential: Option<String>,
}

impl LocalIdentity {
    pub fn author(&self) -> ChatAuthor {
        ChatAuthor {
            id: self.id.clone(),
            user_name: self.display_name.clone(),
            img_url: self.avatar_url.clone(),
        }
    }

    pub fn info(&self) -> ParticipantInfo {
        ParticipantInfo {
            user_id: self.id.clone(),
            user_name: self.display_name.clone(),
            img_url: self.avatar_url.clone(),
        }
    }
}
