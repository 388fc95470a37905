use anyhow::Result;
use async_trait::async_trait;
use huddle_core::{IceCandidate, ParticipantId, SessionDescription};
use tokio::sync::mpsc;

use crate::media::{LocalMedia, LocalTrack, SessionEvent, TransportConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackReplacement {
    /// The outbound track was swapped in place.
    Replaced,
    /// The session needs a fresh offer before the new track flows.
    RenegotiationRequired,
}

/// Creates peer media sessions. Everything below this seam belongs to the
/// media engine.
#[async_trait]
pub trait MediaSessionFactory: Send + Sync {
    /// `events` receives the session's callbacks tagged with `remote` and
    /// `generation`.
    async fn create(
        &self,
        remote: ParticipantId,
        generation: u64,
        config: &TransportConfig,
        events: mpsc::Sender<SessionEvent>,
    ) -> Result<Box<dyn MediaSession>>;
}

/// One negotiated media relationship with a single remote participant.
#[async_trait]
pub trait MediaSession: Send + Sync {
    async fn attach_local_media(&self, media: &LocalMedia) -> Result<()>;

    /// Creates an offer and installs it as the local description.
    async fn create_offer(&self) -> Result<SessionDescription>;

    /// Creates an answer and installs it as the local description.
    async fn create_answer(&self) -> Result<SessionDescription>;

    async fn apply_remote_description(&self, description: SessionDescription) -> Result<()>;

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()>;

    /// Drops a pending local offer.
    async fn rollback(&self) -> Result<()>;

    async fn replace_video_track(&self, track: Option<LocalTrack>) -> Result<TrackReplacement>;

    async fn close(&self) -> Result<()>;
}
