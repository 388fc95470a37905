use huddle_core::ParticipantId;
use serde::{Deserialize, Serialize};
use url::Url;

/// Where to reach the room's signaling server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalingEndpoint {
    pub base_url: String,
    pub room_id: String,
    #[serde(default)]
    pub participant_id: Option<ParticipantId>,
    #[serde(default)]
    pub access_token: Option<String>,
}

impl SignalingEndpoint {
    pub fn new(base_url: impl Into<String>, room_id: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            room_id: room_id.into(),
            participant_id: None,
            access_token: None,
        }
    }

    pub fn with_participant(mut self, id: ParticipantId) -> Self {
        self.participant_id = Some(id);
        self
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// `<base>/<room>?userID=<id>&token=<credential>`, query parts only when set.
    pub fn url(&self) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&self.base_url)?;

        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .push(&self.room_id);

        if self.participant_id.is_some() || self.access_token.is_some() {
            let mut query = url.query_pairs_mut();
            if let Some(id) = &self.participant_id {
                query.append_pair("userID", id.as_str());
            }
            if let Some(token) = &self.access_token {
                query.append_pair("token", token);
            }
        }

        Ok(url)
    }
}
