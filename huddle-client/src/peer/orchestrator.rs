use std::collections::HashMap;
use std::sync::Arc;

use huddle_core::{IceCandidate, ParticipantId, SessionDescription, SignalEnvelope};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::error::NegotiationError;
use crate::media::{
    LocalMedia, LocalTrack, MediaEvent, MediaSessionFactory, SessionEvent, TrackReplacement,
    TransportConfig,
};
use crate::peer::{NegotiationState, PeerSession};
use crate::signaling::SignalingTransport;

/// What the roster has to learn from a media session event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerUpdate {
    RemoteTrack {
        remote: ParticipantId,
        stream_id: String,
        track_id: String,
    },
    /// The session failed and was torn down.
    Closed { remote: ParticipantId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerSessionSummary {
    pub remote: ParticipantId,
    pub state: NegotiationState,
}

/// Owns every [`PeerSession`] of the room. Must only be driven from the
/// coordinator's dispatch loop.
pub struct PeerSessionOrchestrator {
    local_id: ParticipantId,
    sessions: HashMap<ParticipantId, PeerSession>,
    factory: Arc<dyn MediaSessionFactory>,
    signaling: Arc<dyn SignalingTransport>,
    transport_config: TransportConfig,
    session_tx: mpsc::Sender<SessionEvent>,
    next_generation: u64,
}

impl PeerSessionOrchestrator {
    pub fn new(
        local_id: ParticipantId,
        factory: Arc<dyn MediaSessionFactory>,
        signaling: Arc<dyn SignalingTransport>,
        transport_config: TransportConfig,
        session_tx: mpsc::Sender<SessionEvent>,
    ) -> Self {
        Self {
            local_id,
            sessions: HashMap::new(),
            factory,
            signaling,
            transport_config,
            session_tx,
            next_generation: 0,
        }
    }

    /// Starts negotiating with `remote` by sending an offer. Returns `false`
    /// without doing anything if a session already exists or `remote` is us.
    pub async fn open(
        &mut self,
        remote: &ParticipantId,
        local_media: Option<&LocalMedia>,
    ) -> Result<bool, NegotiationError> {
        if *remote == self.local_id || self.sessions.contains_key(remote) {
            return Ok(false);
        }

        let mut session = self.establish(remote, local_media).await?;

        let offer = match session.offer().await {
            Ok(offer) => offer,
            Err(source) => {
                session.close().await;
                return Err(NegotiationError::Media {
                    remote: remote.clone(),
                    source,
                });
            }
        };

        info!("Offering to {}", remote);
        self.sessions.insert(remote.clone(), session);
        self.send(SignalEnvelope::Offer {
            from: self.local_id.clone(),
            to: remote.clone(),
            offer,
        })
        .await;
        Ok(true)
    }

    pub async fn handle_offer(
        &mut self,
        from: &ParticipantId,
        offer: SessionDescription,
        local_media: Option<&LocalMedia>,
    ) -> Result<(), NegotiationError> {
        let mut session = match self.sessions.remove(from) {
            Some(session) if session.state() == NegotiationState::Answering => {
                debug!("Ignoring repeated offer from {}", from);
                self.sessions.insert(from.clone(), session);
                return Ok(());
            }
            Some(session)
                if session.state() == NegotiationState::Offering && self.local_id > *from =>
            {
                info!("Offer collision with {}, keeping ours", from);
                self.sessions.insert(from.clone(), session);
                return Ok(());
            }
            Some(session) => {
                if session.state() == NegotiationState::Offering {
                    info!("Offer collision with {}, accepting theirs", from);
                }
                session
            }
            None => self.establish(from, local_media).await?,
        };

        let answer = match session.answer(offer).await {
            Ok(answer) => answer,
            Err(source) => {
                session.close().await;
                return Err(NegotiationError::Media {
                    remote: from.clone(),
                    source,
                });
            }
        };

        if session.state() != NegotiationState::Connected {
            session.set_state(NegotiationState::Answering);
        }
        self.sessions.insert(from.clone(), session);

        self.send(SignalEnvelope::Answer {
            from: self.local_id.clone(),
            to: from.clone(),
            answer,
        })
        .await;
        Ok(())
    }

    pub async fn handle_answer(
        &mut self,
        from: &ParticipantId,
        answer: SessionDescription,
    ) -> Result<(), NegotiationError> {
        let Some(session) = self.sessions.get_mut(from) else {
            debug!("Dropping answer from {} without a session", from);
            return Ok(());
        };
        if session.state() != NegotiationState::Offering {
            debug!(
                "Dropping answer from {} in state {:?}",
                from,
                session.state()
            );
            return Ok(());
        }

        match session.apply_remote(answer).await {
            Ok(()) => self.connected(from).await,
            Err(source) => Err(self.fail(from, source).await),
        }
    }

    pub async fn handle_ice(
        &mut self,
        from: &ParticipantId,
        candidate: IceCandidate,
    ) -> Result<(), NegotiationError> {
        let Some(session) = self.sessions.get_mut(from) else {
            debug!("Dropping ICE candidate from {} without a session", from);
            return Ok(());
        };

        match session.add_candidate(candidate).await {
            Ok(()) => Ok(()),
            Err(source) => Err(self.fail(from, source).await),
        }
    }

    /// Applies a media session callback. Events of sessions that were already
    /// replaced or torn down are dropped.
    pub async fn handle_session_event(&mut self, event: SessionEvent) -> Option<PeerUpdate> {
        let SessionEvent {
            remote,
            generation,
            event,
        } = event;

        let Some(session) = self.sessions.get_mut(&remote) else {
            debug!("Dropping {:?} for closed session {}", event, remote);
            return None;
        };
        if session.generation() != generation {
            debug!(
                "Dropping {:?} from stale session {} (generation {} != {})",
                event,
                remote,
                generation,
                session.generation()
            );
            return None;
        }

        match event {
            MediaEvent::LocalCandidate(candidate) => {
                self.send(SignalEnvelope::IceCandidate {
                    from: self.local_id.clone(),
                    to: remote,
                    candidate,
                })
                .await;
                None
            }

            MediaEvent::RemoteTrack {
                stream_id,
                track_id,
            } => Some(PeerUpdate::RemoteTrack {
                remote,
                stream_id,
                track_id,
            }),

            MediaEvent::Connected => {
                info!("Media connected with {}", remote);
                if session.state() != NegotiationState::Answering {
                    return None;
                }
                match self.connected(&remote).await {
                    Ok(()) => None,
                    Err(e) => {
                        error!("{}", e);
                        Some(PeerUpdate::Closed { remote })
                    }
                }
            }

            MediaEvent::Disconnected => {
                warn!("Media path to {} interrupted", remote);
                None
            }

            MediaEvent::Failed => {
                let err = NegotiationError::ConnectionFailed {
                    remote: remote.clone(),
                };
                error!("{}", err);
                self.close(&remote).await;
                Some(PeerUpdate::Closed { remote })
            }
        }
    }

    /// Swaps the outbound video of every session. A connected session that
    /// cannot swap in place is sent a fresh offer; one still negotiating gets
    /// it once connected. Failing sessions are closed and reported; the others
    /// are unaffected.
    pub async fn replace_video_track(&mut self, track: Option<LocalTrack>) -> Vec<NegotiationError> {
        let mut remotes: Vec<ParticipantId> = self.sessions.keys().cloned().collect();
        remotes.sort();

        let mut errors = Vec::new();

        for remote in remotes {
            let Some(session) = self.sessions.get_mut(&remote) else {
                continue;
            };
            let connected = session.state() == NegotiationState::Connected;

            let outcome = match session.connection().replace_video_track(track.clone()).await {
                Ok(TrackReplacement::Replaced) => Ok(None),
                Ok(TrackReplacement::RenegotiationRequired) if connected => {
                    session.offer().await.map(Some)
                }
                Ok(TrackReplacement::RenegotiationRequired) => {
                    debug!("Renegotiating with {} once connected", remote);
                    session.defer_renegotiation();
                    Ok(None)
                }
                Err(e) => Err(e),
            };

            match outcome {
                Ok(None) => debug!("Updated video track for {}", remote),
                Ok(Some(offer)) => {
                    info!("Renegotiating with {} for new video track", remote);
                    self.send(SignalEnvelope::Offer {
                        from: self.local_id.clone(),
                        to: remote,
                        offer,
                    })
                    .await;
                }
                Err(source) => errors.push(self.fail(&remote, source).await),
            }
        }

        errors
    }

    /// Sessions created after this use the given ICE servers.
    pub fn set_ice_servers(&mut self, ice_servers: Vec<String>) {
        if ice_servers.is_empty() {
            return;
        }
        info!("Using ICE servers {:?}", ice_servers);
        self.transport_config.ice_servers = ice_servers;
    }

    pub async fn close(&mut self, remote: &ParticipantId) -> bool {
        let Some(session) = self.sessions.remove(remote) else {
            return false;
        };
        info!("Closing session with {}", remote);
        session.close().await;
        true
    }

    pub async fn close_all(&mut self) {
        for (_, session) in self.sessions.drain() {
            session.close().await;
        }
    }

    pub fn state_of(&self, remote: &ParticipantId) -> Option<NegotiationState> {
        self.sessions.get(remote).map(|s| s.state())
    }

    pub fn contains(&self, remote: &ParticipantId) -> bool {
        self.sessions.contains_key(remote)
    }

    pub fn summaries(&self) -> Vec<PeerSessionSummary> {
        let mut summaries: Vec<_> = self
            .sessions
            .values()
            .map(|s| PeerSessionSummary {
                remote: s.remote_id().clone(),
                state: s.state(),
            })
            .collect();
        summaries.sort_by(|a, b| a.remote.cmp(&b.remote));
        summaries
    }

    async fn establish(
        &mut self,
        remote: &ParticipantId,
        local_media: Option<&LocalMedia>,
    ) -> Result<PeerSession, NegotiationError> {
        self.next_generation += 1;
        let generation = self.next_generation;

        let connection = self
            .factory
            .create(
                remote.clone(),
                generation,
                &self.transport_config,
                self.session_tx.clone(),
            )
            .await
            .map_err(|source| NegotiationError::Media {
                remote: remote.clone(),
                source,
            })?;

        let session = PeerSession::new(remote.clone(), generation, connection);

        if let Some(media) = local_media {
            if let Err(source) = session.connection().attach_local_media(media).await {
                session.close().await;
                return Err(NegotiationError::Media {
                    remote: remote.clone(),
                    source,
                });
            }
        }

        Ok(session)
    }

    /// Marks the session connected and sends any offer deferred while it was
    /// negotiating.
    async fn connected(&mut self, remote: &ParticipantId) -> Result<(), NegotiationError> {
        let Some(session) = self.sessions.get_mut(remote) else {
            return Ok(());
        };
        session.set_state(NegotiationState::Connected);
        if !session.take_deferred_renegotiation() {
            return Ok(());
        }

        match session.offer().await {
            Ok(offer) => {
                info!("Renegotiating with {} for new video track", remote);
                self.send(SignalEnvelope::Offer {
                    from: self.local_id.clone(),
                    to: remote.clone(),
                    offer,
                })
                .await;
                Ok(())
            }
            Err(source) => Err(self.fail(remote, source).await),
        }
    }

    async fn fail(&mut self, remote: &ParticipantId, source: anyhow::Error) -> NegotiationError {
        self.close(remote).await;
        NegotiationError::Media {
            remote: remote.clone(),
            source,
        }
    }

    async fn send(&self, envelope: SignalEnvelope) {
        let kind = envelope.kind();
        if let Err(e) = self.signaling.send(envelope).await {
            warn!("Failed to send {}: {}", kind, e);
        }
    }
}
