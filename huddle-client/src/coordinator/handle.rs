use huddle_core::{ChatMessage, ParticipantId};
use tokio::sync::{mpsc, oneshot, watch};

use crate::coordinator::{CoordinatorCommand, RoomSnapshot};
use crate::error::CoordinatorError;

/// The presentation layer's view of a running coordinator.
#[derive(Clone)]
pub struct CoordinatorHandle {
    commands: mpsc::Sender<CoordinatorCommand>,
    snapshot: watch::Receiver<RoomSnapshot>,
}

impl CoordinatorHandle {
    pub(crate) fn new(
        commands: mpsc::Sender<CoordinatorCommand>,
        snapshot: watch::Receiver<RoomSnapshot>,
    ) -> Self {
        Self { commands, snapshot }
    }

    pub fn snapshot(&self) -> RoomSnapshot {
        self.snapshot.borrow().clone()
    }

    /// A receiver that wakes up on every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<RoomSnapshot> {
        self.snapshot.clone()
    }

    pub async fn send_chat(&self, text: impl Into<String>) -> Result<ChatMessage, CoordinatorError> {
        let text = text.into();
        self.request(|reply| CoordinatorCommand::SendChat { text, reply })
            .await
    }

    pub async fn toggle_pin(&self, id: ParticipantId) -> Result<bool, CoordinatorError> {
        self.request(|reply| CoordinatorCommand::TogglePin { id, reply })
            .await
    }

    pub async fn toggle_audio(&self, id: ParticipantId) -> Result<bool, CoordinatorError> {
        self.request(|reply| CoordinatorCommand::ToggleAudio { id, reply })
            .await
    }

    pub async fn toggle_video(&self, id: ParticipantId) -> Result<bool, CoordinatorError> {
        self.request(|reply| CoordinatorCommand::ToggleVideo { id, reply })
            .await
    }

    pub async fn toggle_screen_share(&self) -> Result<bool, CoordinatorError> {
        let sharing = self
            .request(|reply| CoordinatorCommand::ToggleScreenShare { reply })
            .await??;
        Ok(sharing)
    }

    /// Stops the coordinator and waits until media and the channel are
    /// released. Calling it on a stopped coordinator is a no-op.
    pub async fn shutdown(&self) -> Result<(), CoordinatorError> {
        match self
            .request(|done| CoordinatorCommand::Shutdown { done })
            .await
        {
            Ok(()) | Err(CoordinatorError::Stopped) => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> CoordinatorCommand,
    ) -> Result<T, CoordinatorError> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(command(tx))
            .await
            .map_err(|_| CoordinatorError::Stopped)?;
        rx.await.map_err(|_| CoordinatorError::Stopped)
    }
}
