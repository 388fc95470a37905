use huddle_core::{IceCandidate, ParticipantId};

/// Non-owning reference to a remote participant's media stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteStream {
    pub stream_id: String,
    pub track_ids: Vec<String>,
}

/// Callbacks of a media session, turned into values.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// A local ICE candidate that has to reach the remote side.
    LocalCandidate(IceCandidate),

    RemoteTrack { stream_id: String, track_id: String },

    Connected,

    /// Transient; the engine may still recover.
    Disconnected,

    Failed,
}

/// A [`MediaEvent`] tagged with the session that produced it. The generation
/// lets the orchestrator drop events from a session it already tore down.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionEvent {
    pub remote: ParticipantId,
    pub generation: u64,
    pub event: MediaEvent,
}
