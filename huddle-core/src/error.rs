use thiserror::Error;

/// Failure to turn a wire frame into a [`crate::SignalEnvelope`] (or back).
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("envelope has no \"type\" field")]
    MissingKind,

    #[error("unknown envelope kind \"{0}\"")]
    UnknownKind(String),

    #[error("malformed envelope: {0}")]
    Malformed(#[from] serde_json::Error),
}
