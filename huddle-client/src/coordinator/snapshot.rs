use huddle_core::{ChatMessage, LocalIdentity};

use crate::media::{LocalMedia, VideoSource};
use crate::peer::PeerSessionSummary;
use crate::roster::Participant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    /// The channel dropped; roster and media are stale until the next snapshot.
    Reconnecting,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LocalMediaState {
    pub audio: bool,
    pub video: bool,
    pub source: VideoSource,
}

impl LocalMediaState {
    pub fn of(media: Option<&LocalMedia>) -> Self {
        match media {
            Some(m) => Self {
                audio: m.audio().is_some(),
                video: m.video().is_some(),
                source: m.source(),
            },
            None => Self::default(),
        }
    }
}

/// Everything the presentation layer renders, published after every event.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomSnapshot {
    pub local: LocalIdentity,
    /// Ordered by join time.
    pub participants: Vec<Participant>,
    pub chat: Vec<ChatMessage>,
    pub status: ConnectionStatus,
    pub screen_sharing: bool,
    pub local_media: LocalMediaState,
    pub sessions: Vec<PeerSessionSummary>,
    /// Last error message pushed by the signaling server.
    pub last_error: Option<String>,
}

impl RoomSnapshot {
    pub fn new(local: LocalIdentity) -> Self {
        Self {
            local,
            participants: Vec::new(),
            chat: Vec::new(),
            status: ConnectionStatus::Connecting,
            screen_sharing: false,
            local_media: LocalMediaState::default(),
            sessions: Vec::new(),
            last_error: None,
        }
    }

    pub fn participant(&self, id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id.as_str() == id)
    }
}
