use serde::{Deserialize, Serialize};

use crate::coordinator::IdentitySource;
use crate::media::TransportConfig;
use crate::signaling::{RetryPolicy, SignalingEndpoint};

pub const DEFAULT_EVENT_BUFFER: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    pub endpoint: SignalingEndpoint,
    #[serde(default)]
    pub identity: IdentitySource,
    #[serde(default)]
    pub transport: TransportConfig,
    #[serde(default)]
    pub retry: RetryPolicy,
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

impl CoordinatorConfig {
    pub fn new(endpoint: SignalingEndpoint, identity: IdentitySource) -> Self {
        Self {
            endpoint,
            identity,
            transport: TransportConfig::default(),
            retry: RetryPolicy::default(),
            event_buffer: DEFAULT_EVENT_BUFFER,
        }
    }
}

fn default_event_buffer() -> usize {
    DEFAULT_EVENT_BUFFER
}
