mod local_media;
mod media_event;
mod media_session;
mod media_source;
mod transport_config;
mod webrtc_session;

pub use local_media::*;
pub use media_event::*;
pub use media_session::*;
pub use media_source::*;
pub use transport_config::*;
pub use webrtc_session::*;
