use huddle_core::utils::DEFAULT_STUN_ADDR;
use serde::{Deserialize, Serialize};

/// ICE configuration handed to every new media session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportConfig {
    pub ice_servers: Vec<String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec![DEFAULT_STUN_ADDR.to_owned()],
        }
    }
}
