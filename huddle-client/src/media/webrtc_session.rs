use std::sync::Arc;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use huddle_core::{IceCandidate, ParticipantId, SdpKind, SessionDescription};
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::rtp_codec::RTPCodecType;
use webrtc::rtp_transceiver::rtp_receiver::RTCRtpReceiver;
use webrtc::rtp_transceiver::rtp_sender::RTCRtpSender;
use webrtc::rtp_transceiver::rtp_transceiver_direction::RTCRtpTransceiverDirection;
use webrtc::rtp_transceiver::{RTCRtpTransceiver, RTCRtpTransceiverInit};
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_remote::TrackRemote;

use crate::media::{
    LocalMedia, LocalTrack, MediaEvent, MediaSession, MediaSessionFactory, SessionEvent,
    TrackReplacement, TransportConfig,
};

/// Builds [`WebRtcSession`]s on top of the `webrtc` crate.
#[derive(Default)]
pub struct WebRtcSessionFactory;

#[async_trait]
impl MediaSessionFactory for WebRtcSessionFactory {
    async fn create(
        &self,
        remote: ParticipantId,
        generation: u64,
        config: &TransportConfig,
        events: mpsc::Sender<SessionEvent>,
    ) -> Result<Box<dyn MediaSession>> {
        let session = WebRtcSession::new(remote, generation, config, events).await?;
        Ok(Box::new(session))
    }
}

pub struct WebRtcSession {
    remote: ParticipantId,
    peer_connection: Arc<RTCPeerConnection>,
    video_sender: Mutex<Option<Arc<RTCRtpSender>>>,
}

impl WebRtcSession {
    pub async fn new(
        remote: ParticipantId,
        generation: u64,
        config: &TransportConfig,
        events: mpsc::Sender<SessionEvent>,
    ) -> Result<Self> {
        let mut m = MediaEngine::default();
        m.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut m)?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        let ice_servers = if config.ice_servers.is_empty() {
            vec![]
        } else {
            vec![RTCIceServer {
                urls: config.ice_servers.clone(),
                ..Default::default()
            }]
        };
        let rtc_config = RTCConfiguration {
            ice_servers,
            ..Default::default()
        };

        let peer_connection = Arc::new(api.new_peer_connection(rtc_config).await?);

        let emitter = EventEmitter {
            remote: remote.clone(),
            generation,
            tx: events,
        };

        let state_emitter = emitter.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let emitter = state_emitter.clone();

                Box::pin(async move {
                    info!("Peer connection state for {}: {:?}", emitter.remote, s);
                    let event = match s {
                        RTCPeerConnectionState::Connected => MediaEvent::Connected,
                        RTCPeerConnectionState::Disconnected => MediaEvent::Disconnected,
                        RTCPeerConnectionState::Failed => MediaEvent::Failed,
                        _ => return,
                    };
                    emitter.emit(event).await;
                })
            },
        ));

        let ice_emitter = emitter.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let emitter = ice_emitter.clone();

            Box::pin(async move {
                let Some(candidate) = c else { return };
                let Ok(init) = candidate.to_json() else {
                    return;
                };
                let candidate = IceCandidate {
                    candidate: init.candidate,
                    sdp_mid: init.sdp_mid,
                    sdp_m_line_index: init.sdp_mline_index,
                    username_fragment: init.username_fragment,
                };
                emitter.emit(MediaEvent::LocalCandidate(candidate)).await;
            })
        }));

        let track_emitter = emitter;
        peer_connection.on_track(Box::new(
            move |track: Arc<TrackRemote>,
                  _receiver: Arc<RTCRtpReceiver>,
                  _transceiver: Arc<RTCRtpTransceiver>| {
                let emitter = track_emitter.clone();

                Box::pin(async move {
                    debug!(
                        "Remote {:?} track {} from {}",
                        track.kind(),
                        track.id(),
                        emitter.remote
                    );
                    emitter
                        .emit(MediaEvent::RemoteTrack {
                            stream_id: track.stream_id(),
                            track_id: track.id(),
                        })
                        .await;
                })
            },
        ));

        Ok(Self {
            remote,
            peer_connection,
            video_sender: Mutex::new(None),
        })
    }

    /// Without a local track of some kind, the offer still has to ask for it.
    async fn ensure_receive_transceivers(&self) -> Result<()> {
        let transceivers = self.peer_connection.get_transceivers().await;

        for kind in [RTPCodecType::Audio, RTPCodecType::Video] {
            if transceivers.iter().any(|t| t.kind() == kind) {
                continue;
            }
            self.peer_connection
                .add_transceiver_from_kind(
                    kind,
                    Some(RTCRtpTransceiverInit {
                        direction: RTCRtpTransceiverDirection::Recvonly,
                        send_encodings: vec![],
                    }),
                )
                .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl MediaSession for WebRtcSession {
    async fn attach_local_media(&self, media: &LocalMedia) -> Result<()> {
        if let Some(audio) = media.audio() {
            self.peer_connection
                .add_track(audio.clone() as Arc<dyn TrackLocal + Send + Sync>)
                .await?;
        }
        if let Some(video) = media.video() {
            let sender = self
                .peer_connection
                .add_track(video.clone() as Arc<dyn TrackLocal + Send + Sync>)
                .await?;
            *self.video_sender.lock().await = Some(sender);
        }
        Ok(())
    }

    async fn create_offer(&self) -> Result<SessionDescription> {
        self.ensure_receive_transceivers().await?;

        let offer = self.peer_connection.create_offer(None).await?;
        self.peer_connection
            .set_local_description(offer.clone())
            .await?;
        Ok(SessionDescription::offer(offer.sdp))
    }

    async fn create_answer(&self) -> Result<SessionDescription> {
        let answer = self.peer_connection.create_answer(None).await?;
        self.peer_connection
            .set_local_description(answer.clone())
            .await?;
        Ok(SessionDescription::answer(answer.sdp))
    }

    async fn apply_remote_description(&self, description: SessionDescription) -> Result<()> {
        let desc = match description.kind {
            SdpKind::Offer => RTCSessionDescription::offer(description.sdp)?,
            SdpKind::Answer => RTCSessionDescription::answer(description.sdp)?,
            SdpKind::Pranswer => RTCSessionDescription::pranswer(description.sdp)?,
            SdpKind::Rollback => bail!("remote rollback is not a description"),
        };
        self.peer_connection.set_remote_description(desc).await?;
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()> {
        let init = RTCIceCandidateInit {
            candidate: candidate.candidate,
            sdp_mid: candidate.sdp_mid,
            sdp_mline_index: candidate.sdp_m_line_index,
            username_fragment: candidate.username_fragment,
        };
        self.peer_connection.add_ice_candidate(init).await?;
        Ok(())
    }

    async fn rollback(&self) -> Result<()> {
        let rollback: RTCSessionDescription =
            serde_json::from_value(serde_json::json!({ "type": "rollback", "sdp": "" }))
                .context("Failed to build rollback description")?;
        self.peer_connection.set_local_description(rollback).await?;
        debug!("Rolled back local offer for {}", self.remote);
        Ok(())
    }

    async fn replace_video_track(&self, track: Option<LocalTrack>) -> Result<TrackReplacement> {
        let track = track.map(|t| t as Arc<dyn TrackLocal + Send + Sync>);
        let mut video_sender = self.video_sender.lock().await;

        if let Some(sender) = video_sender.as_ref() {
            sender.replace_track(track).await?;
            return Ok(TrackReplacement::Replaced);
        }

        let Some(track) = track else {
            return Ok(TrackReplacement::Replaced);
        };
        let sender = self.peer_connection.add_track(track).await?;
        *video_sender = Some(sender);
        Ok(TrackReplacement::RenegotiationRequired)
    }

    async fn close(&self) -> Result<()> {
        self.peer_connection.close().await?;
        Ok(())
    }
}

#[derive(Clone)]
struct EventEmitter {
    remote: ParticipantId,
    generation: u64,
    tx: mpsc::Sender<SessionEvent>,
}

impl EventEmitter {
    async fn emit(&self, event: MediaEvent) {
        let _ = self
            .tx
            .send(SessionEvent {
                remote: self.remote.clone(),
                generation: self.generation,
                event,
            })
            .await;
    }
}
