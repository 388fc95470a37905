pub const DEFAULT_STUN_ADDR: &str = "stun:stun.l.google.com:19302";

/// Delay between signaling reconnect attempts.
pub const DEFAULT_RECONNECT_INTERVAL_MS: u64 = 3000;
