mod chat;
mod id;
mod identity;
mod peer;
mod signaling;

pub use chat::{ChatAuthor, ChatMessage, MessageId};
pub use identity::LocalIdentity;
pub use peer::{ParticipantId, ParticipantInfo};
pub use signaling::{IceCandidate, SdpKind, SessionDescription, SignalEnvelope};
