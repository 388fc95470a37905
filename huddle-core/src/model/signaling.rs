use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;
use crate::model::{ChatMessage, ParticipantId, ParticipantInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SdpKind {
    Offer,
    Pranswer,
    Answer,
    Rollback,
}

/// Session description in the browser's `RTCSessionDescriptionInit` shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescription {
    #[serde(rename = "type")]
    pub kind: SdpKind,
    #[serde(default)]
    pub sdp: String,
}

impl SessionDescription {
    pub fn offer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpKind::Offer,
            sdp: sdp.into(),
        }
    }

    pub fn answer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpKind::Answer,
            sdp: sdp.into(),
        }
    }
}

/// ICE candidate in the browser's `RTCIceCandidateInit` shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidate {
    pub candidate: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdp_mid: Option<String>,
    #[serde(
        rename = "sdpMLineIndex",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub sdp_m_line_index: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username_fragment: Option<String>,
}

/// One message on the room's signaling channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SignalEnvelope {
    /// Full roster, sent once after joining.
    UsersList { users: Vec<ParticipantInfo> },

    UserJoined(ParticipantInfo),

    UserLeft {
        #[serde(rename = "userID")]
        user_id: ParticipantId,
    },

    Offer {
        from: ParticipantId,
        to: ParticipantId,
        offer: SessionDescription,
    },

    Answer {
        from: ParticipantId,
        to: ParticipantId,
        answer: SessionDescription,
    },

    IceCandidate {
        from: ParticipantId,
        to: ParticipantId,
        candidate: IceCandidate,
    },

    ChatMessage { message: ChatMessage },

    /// STUN/TURN urls pushed by the server right after connect.
    #[serde(rename = "iceServers", rename_all = "camelCase")]
    IceServers { ice_servers: Vec<String> },

    /// Server-side rejection, e.g. "Room is full".
    Error { message: String },
}

impl SignalEnvelope {
    const KINDS: [&'static str; 9] = [
        "users-list",
        "user-joined",
        "user-left",
        "offer",
        "answer",
        "ice-candidate",
        "chat-message",
        "iceServers",
        "error",
    ];

    /// Decodes one text frame. Unknown kinds are reported as such instead of
    /// being folded into a generic parse failure.
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        let kind = value
            .get("type")
            .and_then(serde_json::Value::as_str)
            .ok_or(ProtocolError::MissingKind)?;

        if !Self::KINDS.contains(&kind) {
            return Err(ProtocolError::UnknownKind(kind.to_owned()));
        }

        Ok(serde_json::from_value(value)?)
    }

    pub fn encode(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SignalEnvelope::UsersList { .. } => "users-list",
            SignalEnvelope::UserJoined(_) => "user-joined",
            SignalEnvelope::UserLeft { .. } => "user-left",
            SignalEnvelope::Offer { .. } => "offer",
            SignalEnvelope::Answer { .. } => "answer",
            SignalEnvelope::IceCandidate { .. } => "ice-candidate",
            SignalEnvelope::ChatMessage { .. } => "chat-message",
            SignalEnvelope::IceServers { .. } => "iceServers",
            SignalEnvelope::Error { .. } => "error",
        }
    }

    /// The attributed sender of a negotiation message.
    pub fn sender(&self) -> Option<&ParticipantId> {
        match self {
            SignalEnvelope::Offer { from, .. }
            | SignalEnvelope::Answer { from, .. }
            | SignalEnvelope::IceCandidate { from, .. } => Some(from),
            _ => None,
        }
    }

    pub fn recipient(&self) -> Option<&ParticipantId> {
        match self {
            SignalEnvelope::Offer { to, .. }
            | SignalEnvelope::Answer { to, .. }
            | SignalEnvelope::IceCandidate { to, .. } => Some(to),
            _ => None,
        }
    }
}
