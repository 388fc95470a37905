use huddle_core::{ParticipantId, ProtocolError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("signaling channel is not connected")]
    Closed,

    #[error("failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: tokio_tungstenite::tungstenite::Error,
    },

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

#[derive(Debug, Error)]
pub enum MediaAcquisitionError {
    #[error("access to local media was denied: {0}")]
    Denied(String),

    #[error("local media is unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum NegotiationError {
    #[error("media session for {remote} failed: {source}")]
    Media {
        remote: ParticipantId,
        #[source]
        source: anyhow::Error,
    },

    #[error("connection to {remote} failed")]
    ConnectionFailed { remote: ParticipantId },
}

impl NegotiationError {
    pub fn remote(&self) -> &ParticipantId {
        match self {
            NegotiationError::Media { remote, .. } => remote,
            NegotiationError::ConnectionFailed { remote } => remote,
        }
    }
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("no participant id given and none could be derived from the access credential")]
    Unresolved,

    #[error("access credential is malformed: {0}")]
    MalformedCredential(String),
}

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error("invalid signaling endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error(transparent)]
    Media(#[from] MediaAcquisitionError),

    #[error("coordinator has stopped")]
    Stopped,
}
