mod channel_event;
mod endpoint;
mod retry_policy;
mod signaling_channel;
mod signaling_transport;

pub use channel_event::*;
pub use endpoint::*;
pub use retry_policy::*;
pub use signaling_channel::*;
pub use signaling_transport::*;
