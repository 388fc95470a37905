use huddle_core::{ChatMessage, ParticipantId};
use tokio::sync::oneshot;

use crate::error::MediaAcquisitionError;

/// User intents, delivered to the coordinator's dispatch loop.
#[derive(Debug)]
pub enum CoordinatorCommand {
    SendChat {
        text: String,
        reply: oneshot::Sender<ChatMessage>,
    },

    TogglePin {
        id: ParticipantId,
        reply: oneshot::Sender<bool>,
    },

    ToggleAudio {
        id: ParticipantId,
        reply: oneshot::Sender<bool>,
    },

    ToggleVideo {
        id: ParticipantId,
        reply: oneshot::Sender<bool>,
    },

    /// Replies with whether the screen is being shared afterwards.
    ToggleScreenShare {
        reply: oneshot::Sender<Result<bool, MediaAcquisitionError>>,
    },

    Shutdown { done: oneshot::Sender<()> },
}
