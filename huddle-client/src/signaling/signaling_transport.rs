use async_trait::async_trait;
use huddle_core::SignalEnvelope;

use crate::error::ChannelError;

/// Outbound half of the signaling channel, shared by everything that talks to
/// remote participants.
#[async_trait]
pub trait SignalingTransport: Send + Sync {
    /// Queue an envelope. Fails with [`ChannelError::Closed`] while disconnected.
    async fn send(&self, envelope: SignalEnvelope) -> Result<(), ChannelError>;

    /// Stop the channel. Idempotent; no events are delivered after it returns.
    async fn close(&self);
}
