use huddle_core::SignalEnvelope;

/// Events emitted by a signaling channel, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    /// A (re)connection was established.
    Connected,

    Envelope(SignalEnvelope),

    /// The underlying connection dropped; a reconnect is scheduled.
    ConnectionLost,
}
