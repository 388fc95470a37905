use std::sync::Arc;

use huddle_core::{LocalIdentity, ParticipantId, SignalEnvelope};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::chat::ChatLedger;
use crate::coordinator::{
    ConnectionStatus, CoordinatorCommand, CoordinatorConfig, CoordinatorHandle, LocalMediaState,
    RoomSnapshot,
};
use crate::error::{CoordinatorError, MediaAcquisitionError, NegotiationError};
use crate::media::{
    LocalMedia, MediaSessionFactory, MediaSource, SessionEvent, TransportConfig, VideoSource,
};
use crate::peer::{PeerSessionOrchestrator, PeerUpdate};
use crate::roster::RosterTracker;
use crate::signaling::{ChannelEvent, SignalingChannel, SignalingTransport};

/// Root of a room session. All state lives on the task running
/// [`Coordinator::run`]; commands, channel events and media callbacks are
/// handled one at a time in arrival order.
pub struct Coordinator {
    identity: LocalIdentity,
    roster: RosterTracker,
    chat: ChatLedger,
    peers: PeerSessionOrchestrator,
    signaling: Arc<dyn SignalingTransport>,
    media_source: Arc<dyn MediaSource>,
    camera: Option<LocalMedia>,
    screen: Option<LocalMedia>,
    /// What new sessions get attached: the camera, or camera audio with the
    /// screen's video while sharing.
    local_media: Option<LocalMedia>,
    status: ConnectionStatus,
    last_error: Option<String>,
    closed: bool,
    command_rx: mpsc::Receiver<CoordinatorCommand>,
    channel_rx: mpsc::Receiver<ChannelEvent>,
    session_rx: mpsc::Receiver<SessionEvent>,
    snapshot_tx: watch::Sender<RoomSnapshot>,
}

impl Coordinator {
    pub fn new(
        identity: LocalIdentity,
        transport: TransportConfig,
        signaling: Arc<dyn SignalingTransport>,
        channel_rx: mpsc::Receiver<ChannelEvent>,
        factory: Arc<dyn MediaSessionFactory>,
        media_source: Arc<dyn MediaSource>,
        event_buffer: usize,
    ) -> (Self, CoordinatorHandle) {
        let (command_tx, command_rx) = mpsc::channel(event_buffer);
        let (session_tx, session_rx) = mpsc::channel(event_buffer);
        let (snapshot_tx, snapshot_rx) = watch::channel(RoomSnapshot::new(identity.clone()));

        let coordinator = Self {
            roster: RosterTracker::new(identity.id.clone()),
            chat: ChatLedger::new(identity.author(), signaling.clone()),
            peers: PeerSessionOrchestrator::new(
                identity.id.clone(),
                factory,
                signaling.clone(),
                transport,
                session_tx,
            ),
            identity,
            signaling,
            media_source,
            camera: None,
            screen: None,
            local_media: None,
            status: ConnectionStatus::Connecting,
            last_error: None,
            closed: false,
            command_rx,
            channel_rx,
            session_rx,
            snapshot_tx,
        };

        (coordinator, CoordinatorHandle::new(command_tx, snapshot_rx))
    }

    /// Resolves the identity, opens the signaling channel and spawns the
    /// dispatch loop.
    pub fn start(
        config: CoordinatorConfig,
        factory: Arc<dyn MediaSessionFactory>,
        media_source: Arc<dyn MediaSource>,
    ) -> Result<CoordinatorHandle, CoordinatorError> {
        let identity = config.identity.resolve()?;

        let mut endpoint = config.endpoint;
        if endpoint.participant_id.is_none() {
            endpoint = endpoint.with_participant(identity.id.clone());
        }
        if let (None, Some(token)) = (&endpoint.access_token, &identity.access_credential) {
            endpoint = endpoint.with_access_token(token.clone());
        }
        let url = endpoint.url()?;

        info!("Joining room {} as {}", endpoint.room_id, identity.id);
        let (channel, channel_rx) = SignalingChannel::open(url, config.retry, config.event_buffer);

        let (coordinator, handle) = Self::new(
            identity,
            config.transport,
            Arc::new(channel),
            channel_rx,
            factory,
            media_source,
            config.event_buffer,
        );
        tokio::spawn(coordinator.run());

        Ok(handle)
    }

    pub async fn run(mut self) {
        info!("Coordinator for {} started", self.identity.id);

        self.acquire_camera().await;
        self.publish();

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(CoordinatorCommand::Shutdown { done }) => {
                        self.shutdown().await;
                        self.publish();
                        let _ = done.send(());
                        break;
                    }
                    Some(c) => self.handle_command(c).await,
                    None => {
                        info!("All handles dropped. Shutting down.");
                        self.shutdown().await;
                        break;
                    }
                },

                evt = self.channel_rx.recv() => match evt {
                    Some(e) => self.handle_channel_event(e).await,
                    None => {
                        warn!("Signaling channel ended");
                        self.shutdown().await;
                        break;
                    }
                },

                Some(evt) = self.session_rx.recv() => self.handle_session_event(evt).await,
            }

            self.publish();
        }

        self.publish();
        info!("Coordinator for {} finished", self.identity.id);
    }

    async fn acquire_camera(&mut self) {
        match self.media_source.acquire(VideoSource::Camera).await {
            Ok(media) => {
                info!("Local media ready: {:?}", media);
                self.local_media = Some(media.clone());
                self.camera = Some(media);
            }
            Err(e) => warn!("Continuing without local media: {}", e),
        }
    }

    async fn handle_command(&mut self, cmd: CoordinatorCommand) {
        match cmd {
            CoordinatorCommand::SendChat { text, reply } => {
                let message = self.chat.send(text).await;
                let _ = reply.send(message);
            }

            CoordinatorCommand::TogglePin { id, reply } => {
                let _ = reply.send(self.roster.toggle_pin(&id));
            }

            CoordinatorCommand::ToggleAudio { id, reply } => {
                let _ = reply.send(self.roster.toggle_audio(&id));
            }

            CoordinatorCommand::ToggleVideo { id, reply } => {
                let _ = reply.send(self.roster.toggle_video(&id));
            }

            CoordinatorCommand::ToggleScreenShare { reply } => {
                let result = self.toggle_screen_share().await;
                let _ = reply.send(result);
            }

            CoordinatorCommand::Shutdown { done } => {
                self.shutdown().await;
                let _ = done.send(());
            }
        }
    }

    async fn handle_channel_event(&mut self, event: ChannelEvent) {
        match event {
            ChannelEvent::Connected => {
                info!("Signaling connected");
                self.status = ConnectionStatus::Connected;
            }

            ChannelEvent::ConnectionLost => {
                warn!("Signaling lost. Closing peer sessions until the next roster snapshot.");
                self.status = ConnectionStatus::Reconnecting;
                self.peers.close_all().await;
                self.roster.clear_all_media();
            }

            ChannelEvent::Envelope(envelope) => self.dispatch(envelope).await,
        }
    }

    async fn dispatch(&mut self, envelope: SignalEnvelope) {
        if envelope.sender() == Some(&self.identity.id) {
            debug!("Discarding own {}", envelope.kind());
            return;
        }
        if let Some(to) = envelope.recipient() {
            if *to != self.identity.id {
                debug!("Discarding {} addressed to {}", envelope.kind(), to);
                return;
            }
        }

        match envelope {
            SignalEnvelope::UsersList { users } => {
                let delta = self.roster.apply_snapshot(users);
                for id in &delta.removed {
                    self.peers.close(id).await;
                }
                for id in self.roster.ids() {
                    self.open_session(&id).await;
                }
            }

            SignalEnvelope::UserJoined(info) => {
                let id = info.user_id.clone();
                if self.roster.apply_join(info) {
                    info!("{} joined", id);
                } else {
                    debug!("Ignoring repeated join of {}", id);
                }
            }

            SignalEnvelope::UserLeft { user_id } => {
                if self.roster.apply_leave(&user_id) {
                    info!("{} left", user_id);
                }
                self.peers.close(&user_id).await;
            }

            SignalEnvelope::Offer { from, offer, .. } => {
                let result = self
                    .peers
                    .handle_offer(&from, offer, self.local_media.as_ref())
                    .await;
                self.report(result);
            }

            SignalEnvelope::Answer { from, answer, .. } => {
                let result = self.peers.handle_answer(&from, answer).await;
                self.report(result);
            }

            SignalEnvelope::IceCandidate {
                from, candidate, ..
            } => {
                let result = self.peers.handle_ice(&from, candidate).await;
                self.report(result);
            }

            SignalEnvelope::ChatMessage { message } => {
                self.chat.append(message);
            }

            SignalEnvelope::IceServers { ice_servers } => self.peers.set_ice_servers(ice_servers),

            SignalEnvelope::Error { message } => {
                warn!("Signaling server error: {}", message);
                self.last_error = Some(message);
            }
        }
    }

    async fn handle_session_event(&mut self, event: SessionEvent) {
        match self.peers.handle_session_event(event).await {
            Some(PeerUpdate::RemoteTrack {
                remote,
                stream_id,
                track_id,
            }) => {
                self.roster.set_media(&remote, stream_id, track_id);
            }
            Some(PeerUpdate::Closed { remote }) => {
                self.roster.clear_media(&remote);
            }
            None => {}
        }
    }

    async fn open_session(&mut self, id: &ParticipantId) {
        let result = self.peers.open(id, self.local_media.as_ref()).await;
        self.report(result.map(|_| ()));
    }

    /// Swaps between camera and screen video on every connected session.
    async fn toggle_screen_share(&mut self) -> Result<bool, MediaAcquisitionError> {
        if let Some(screen) = self.screen.take() {
            info!("Stopping screen share");
            let camera_video = self.camera.as_ref().and_then(|m| m.video().cloned());
            let errors = self.peers.replace_video_track(camera_video).await;
            self.report_all(errors);

            self.local_media = self.camera.clone();
            self.media_source.release(screen).await;
            return Ok(false);
        }

        let screen = self.media_source.acquire(VideoSource::Screen).await?;
        info!("Starting screen share");
        let screen_video = screen.video().cloned();

        self.local_media = Some(match &self.camera {
            Some(camera) => camera.with_video(screen_video.clone(), VideoSource::Screen),
            None => screen.clone(),
        });
        let errors = self.peers.replace_video_track(screen_video).await;
        self.report_all(errors);

        self.screen = Some(screen);
        Ok(true)
    }

    fn report(&mut self, result: Result<(), NegotiationError>) {
        if let Err(e) = result {
            self.report_all(vec![e]);
        }
    }

    fn report_all(&mut self, errors: Vec<NegotiationError>) {
        for e in errors {
            warn!("{}", e);
            self.roster.clear_media(e.remote());
        }
    }

    /// Runs once; later calls do nothing.
    async fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        info!("Leaving room");

        self.peers.close_all().await;
        self.roster.clear_all_media();

        self.local_media = None;
        if let Some(screen) = self.screen.take() {
            self.media_source.release(screen).await;
        }
        if let Some(camera) = self.camera.take() {
            self.media_source.release(camera).await;
        }

        self.signaling.close().await;
        self.status = ConnectionStatus::Closed;
    }

    fn publish(&self) {
        let snapshot = RoomSnapshot {
            local: self.identity.clone(),
            participants: self.roster.participants().to_vec(),
            chat: self.chat.messages().to_vec(),
            status: self.status,
            screen_sharing: self.screen.is_some(),
            local_media: LocalMediaState::of(self.local_media.as_ref()),
            sessions: self.peers.summaries(),
            last_error: self.last_error.clone(),
        };
        self.snapshot_tx.send_replace(snapshot);
    }
}
