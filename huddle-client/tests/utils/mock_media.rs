use anyhow::{Result, bail};
use async_trait::async_trait;
use huddle_client::{
    LocalMedia, LocalTrack, MediaEvent, MediaSession, MediaSessionFactory, SessionEvent,
    TrackReplacement, TransportConfig,
};
use huddle_core::{IceCandidate, ParticipantId, SdpKind, SessionDescription};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use webrtc::track::track_local::TrackLocal;

/// One call a coordinator made on a media session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCall {
    Attach { audio: bool, video: bool },
    CreateOffer,
    CreateAnswer,
    ApplyRemote(SdpKind),
    AddIce(String),
    Rollback,
    ReplaceVideo(Option<String>),
    Close,
}

#[derive(Default)]
struct FactoryState {
    calls: Vec<(ParticipantId, SessionCall)>,
    created: Vec<(ParticipantId, TransportConfig)>,
    fail_offers: HashSet<ParticipantId>,
    replacement: Option<TrackReplacement>,
    events: HashMap<ParticipantId, (u64, mpsc::Sender<SessionEvent>)>,
}

/// Scripted media engine. Records every call per remote participant and
/// lets tests inject session callbacks.
#[derive(Clone, Default)]
pub struct MockMediaFactory {
    state: Arc<Mutex<FactoryState>>,
}

impl MockMediaFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offers for `remote` fail from now on.
    pub fn fail_offers_for(&self, remote: &str) {
        self.state.lock().unwrap().fail_offers.insert(remote.into());
    }

    pub fn set_replacement(&self, outcome: TrackReplacement) {
        self.state.lock().unwrap().replacement = Some(outcome);
    }

    pub fn calls_for(&self, remote: &str) -> Vec<SessionCall> {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|(id, _)| id.as_str() == remote)
            .map(|(_, call)| call.clone())
            .collect()
    }

    pub fn total_calls(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }

    pub fn created_for(&self, remote: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .created
            .iter()
            .filter(|(id, _)| id.as_str() == remote)
            .count()
    }

    pub fn last_config(&self) -> Option<TransportConfig> {
        self.state
            .lock()
            .unwrap()
            .created
            .last()
            .map(|(_, config)| config.clone())
    }

    pub fn generation_of(&self, remote: &str) -> Option<u64> {
        self.state
            .lock()
            .unwrap()
            .events
            .get(&ParticipantId::from(remote))
            .map(|(generation, _)| *generation)
    }

    /// Delivers a callback as the newest session for `remote` would.
    pub async fn emit(&self, remote: &str, event: MediaEvent) {
        let generation = self.generation_of(remote).expect("no session was created");
        self.emit_with_generation(remote, generation, event).await;
    }

    pub async fn emit_with_generation(&self, remote: &str, generation: u64, event: MediaEvent) {
        let tx = {
            let state = self.state.lock().unwrap();
            state
                .events
                .get(&ParticipantId::from(remote))
                .map(|(_, tx)| tx.clone())
                .expect("no session was created")
        };
        tx.send(SessionEvent {
            remote: remote.into(),
            generation,
            event,
        })
        .await
        .expect("coordinator stopped");
    }
}

#[async_trait]
impl MediaSessionFactory for MockMediaFactory {
    async fn create(
        &self,
        remote: ParticipantId,
        generation: u64,
        config: &TransportConfig,
        events: mpsc::Sender<SessionEvent>,
    ) -> Result<Box<dyn MediaSession>> {
        let mut state = self.state.lock().unwrap();
        state.created.push((remote.clone(), config.clone()));
        state.events.insert(remote.clone(), (generation, events));

        Ok(Box::new(MockSession {
            remote,
            state: self.state.clone(),
        }))
    }
}

struct MockSession {
    remote: ParticipantId,
    state: Arc<Mutex<FactoryState>>,
}

impl MockSession {
    fn record(&self, call: SessionCall) {
        self.state
            .lock()
            .unwrap()
            .calls
            .push((self.remote.clone(), call));
    }
}

#[async_trait]
impl MediaSession for MockSession {
    async fn attach_local_media(&self, media: &LocalMedia) -> Result<()> {
        self.record(SessionCall::Attach {
            audio: media.audio().is_some(),
            video: media.video().is_some(),
        });
        Ok(())
    }

    async fn create_offer(&self) -> Result<SessionDescription> {
        self.record(SessionCall::CreateOffer);
        if self.state.lock().unwrap().fail_offers.contains(&self.remote) {
            bail!("scripted offer failure");
        }
        Ok(SessionDescription::offer(format!("offer-to-{}", self.remote)))
    }

    async fn create_answer(&self) -> Result<SessionDescription> {
        self.record(SessionCall::CreateAnswer);
        Ok(SessionDescription::answer(format!("answer-to-{}", self.remote)))
    }

    async fn apply_remote_description(&self, description: SessionDescription) -> Result<()> {
        self.record(SessionCall::ApplyRemote(description.kind));
        if description.sdp == "broken" {
            bail!("unparseable description");
        }
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()> {
        self.record(SessionCall::AddIce(candidate.candidate));
        Ok(())
    }

    async fn rollback(&self) -> Result<()> {
        self.record(SessionCall::Rollback);
        Ok(())
    }

    async fn replace_video_track(&self, track: Option<LocalTrack>) -> Result<TrackReplacement> {
        self.record(SessionCall::ReplaceVideo(
            track.map(|t| t.id().to_owned()),
        ));
        let outcome = self.state.lock().unwrap().replacement;
        Ok(outcome.unwrap_or(TrackReplacement::Replaced))
    }

    async fn close(&self) -> Result<()> {
        self.record(SessionCall::Close);
        Ok(())
    }
}
