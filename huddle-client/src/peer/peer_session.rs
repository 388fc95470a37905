use anyhow::Result;
use huddle_core::{IceCandidate, ParticipantId, SessionDescription};
use tracing::{debug, warn};

use crate::media::MediaSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NegotiationState {
    Idle,
    /// We sent an offer and wait for the answer.
    Offering,
    /// We answered a remote offer and wait for the media path.
    Answering,
    Connected,
    Closed,
}

/// One negotiation state machine for one remote participant.
pub struct PeerSession {
    remote_id: ParticipantId,
    generation: u64,
    state: NegotiationState,
    connection: Box<dyn MediaSession>,
    remote_description_set: bool,
    pending_candidates: Vec<IceCandidate>,
    /// A track change needs a fresh offer once the current exchange settles.
    renegotiate_on_connect: bool,
}

impl PeerSession {
    pub fn new(remote_id: ParticipantId, generation: u64, connection: Box<dyn MediaSession>) -> Self {
        Self {
            remote_id,
            generation,
            state: NegotiationState::Idle,
            connection,
            remote_description_set: false,
            pending_candidates: Vec::new(),
            renegotiate_on_connect: false,
        }
    }

    pub fn remote_id(&self) -> &ParticipantId {
        &self.remote_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> NegotiationState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: NegotiationState) {
        if self.state != state {
            debug!("Session {} {:?} -> {:?}", self.remote_id, self.state, state);
            self.state = state;
        }
    }

    pub fn connection(&self) -> &dyn MediaSession {
        self.connection.as_ref()
    }

    pub(crate) fn defer_renegotiation(&mut self) {
        self.renegotiate_on_connect = true;
    }

    pub(crate) fn take_deferred_renegotiation(&mut self) -> bool {
        std::mem::take(&mut self.renegotiate_on_connect)
    }

    /// Creates an offer as the local description. A fresh offer invalidates the
    /// remote description until the answer arrives.
    pub(crate) async fn offer(&mut self) -> Result<SessionDescription> {
        let offer = self.connection.create_offer().await?;
        self.remote_description_set = false;
        self.set_state(NegotiationState::Offering);
        Ok(offer)
    }

    /// Applies a remote offer and answers it. A pending local offer is rolled
    /// back first.
    pub(crate) async fn answer(&mut self, offer: SessionDescription) -> Result<SessionDescription> {
        if self.state == NegotiationState::Offering {
            self.connection.rollback().await?;
        }
        self.apply_remote(offer).await?;
        self.connection.create_answer().await
    }

    pub(crate) async fn apply_remote(&mut self, description: SessionDescription) -> Result<()> {
        self.connection.apply_remote_description(description).await?;
        self.remote_description_set = true;
        self.flush_candidates().await
    }

    /// Candidates that arrive before the remote description are held back.
    pub(crate) async fn add_candidate(&mut self, candidate: IceCandidate) -> Result<()> {
        if !self.remote_description_set {
            self.pending_candidates.push(candidate);
            return Ok(());
        }
        self.connection.add_ice_candidate(candidate).await
    }

    async fn flush_candidates(&mut self) -> Result<()> {
        for candidate in std::mem::take(&mut self.pending_candidates) {
            self.connection.add_ice_candidate(candidate).await?;
        }
        Ok(())
    }

    pub(crate) async fn close(self) {
        debug!("Session {} {:?} -> {:?}", self.remote_id, self.state, NegotiationState::Closed);
        if let Err(e) = self.connection.close().await {
            warn!("Failed to close media session for {}: {:?}", self.remote_id, e);
        }
    }
}
