pub mod chat;
pub mod coordinator;
pub mod error;
pub mod media;
pub mod peer;
pub mod roster;
pub mod signaling;

pub use chat::*;
pub use coordinator::*;
pub use error::*;
pub use media::*;
pub use peer::*;
pub use roster::*;
pub use signaling::*;
