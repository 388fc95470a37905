use async_trait::async_trait;
use huddle_client::{ChannelError, SignalingTransport};
use huddle_core::{ParticipantId, SessionDescription, SignalEnvelope};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// SignalingTransport that captures every outgoing envelope.
#[derive(Clone)]
pub struct MockSignaling {
    sent: Arc<Mutex<Vec<SignalEnvelope>>>,
    connected: Arc<AtomicBool>,
    closes: Arc<AtomicUsize>,
}

impl MockSignaling {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            connected: Arc::new(AtomicBool::new(true)),
            closes: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// While disconnected every send fails with `ChannelError::Closed`.
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<SignalEnvelope> {
        self.sent.lock().unwrap().clone()
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn offers_to(&self, remote: &str) -> Vec<SessionDescription> {
        self.sent()
            .into_iter()
            .filter_map(|e| match e {
                SignalEnvelope::Offer { to, offer, .. } if to.as_str() == remote => Some(offer),
                _ => None,
            })
            .collect()
    }

    pub fn answers_to(&self, remote: &str) -> Vec<SessionDescription> {
        self.sent()
            .into_iter()
            .filter_map(|e| match e {
                SignalEnvelope::Answer { to, answer, .. } if to.as_str() == remote => Some(answer),
                _ => None,
            })
            .collect()
    }

    pub fn candidates_to(&self, remote: &str) -> usize {
        self.sent()
            .iter()
            .filter(|e| {
                matches!(e, SignalEnvelope::IceCandidate { to, .. } if to.as_str() == remote)
            })
            .count()
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        self.sent().iter().map(|e| e.kind()).collect()
    }

    /// Every addressed envelope must come from `local`.
    pub fn all_from(&self, local: &ParticipantId) -> bool {
        self.sent()
            .iter()
            .all(|e| e.sender().is_none_or(|from| from == local))
    }
}

impl Default for MockSignaling {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SignalingTransport for MockSignaling {
    async fn send(&self, envelope: SignalEnvelope) -> Result<(), ChannelError> {
        tracing::debug!("[MockSignaling] send {}", envelope.kind());

        if !self.connected.load(Ordering::SeqCst) {
            return Err(ChannelError::Closed);
        }
        self.sent.lock().unwrap().push(envelope);
        Ok(())
    }

    async fn close(&self) {
        tracing::debug!("[MockSignaling] close");
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}
