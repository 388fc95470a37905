use huddle_core::{ParticipantId, ParticipantInfo};

use crate::media::RemoteStream;

/// A remote member of the room as the presentation layer sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: ParticipantId,
    pub display_name: String,
    pub avatar_url: String,
    pub audio_enabled: bool,
    pub video_enabled: bool,
    pub pinned: bool,
    /// Set from the peer session when remote tracks arrive, cleared on teardown.
    pub media_stream: Option<RemoteStream>,
}

impl From<ParticipantInfo> for Participant {
    fn from(info: ParticipantInfo) -> Self {
        Self {
            id: info.user_id,
            display_name: info.user_name,
            avatar_url: info.img_url,
            audio_enabled: true,
            video_enabled: true,
            pinned: false,
            media_stream: None,
        }
    }
}
