mod config;
mod coordinator;
mod coordinator_command;
mod handle;
mod identity;
mod snapshot;

pub use config::*;
pub use coordinator::*;
pub use coordinator_command::*;
pub use handle::*;
pub use identity::*;
pub use snapshot::*;
