mod participant;
mod roster_tracker;

pub use participant::*;
pub use roster_tracker::*;
