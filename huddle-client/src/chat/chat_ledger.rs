use std::collections::HashSet;
use std::sync::Arc;

use huddle_core::{ChatAuthor, ChatMessage, MessageId, SignalEnvelope};
use tracing::{debug, warn};

use crate::signaling::SignalingTransport;

/// Ordered chat log of the room, deduplicated by message id.
pub struct ChatLedger {
    author: ChatAuthor,
    messages: Vec<ChatMessage>,
    seen: HashSet<MessageId>,
    signaling: Arc<dyn SignalingTransport>,
}

impl ChatLedger {
    pub fn new(author: ChatAuthor, signaling: Arc<dyn SignalingTransport>) -> Self {
        Self {
            author,
            messages: Vec::new(),
            seen: HashSet::new(),
            signaling,
        }
    }

    /// Returns `true` if the message id was not seen before.
    pub fn append(&mut self, message: ChatMessage) -> bool {
        if !self.seen.insert(message.id.clone()) {
            debug!("Dropping duplicate chat message {}", message.id);
            return false;
        }
        self.messages.push(message);
        true
    }

    /// Appends locally first, then broadcasts. A failed broadcast leaves the
    /// message in the log.
    pub async fn send(&mut self, text: impl Into<String>) -> ChatMessage {
        let message = ChatMessage::compose(self.author.clone(), text);
        self.append(message.clone());

        let envelope = SignalEnvelope::ChatMessage {
            message: message.clone(),
        };
        if let Err(e) = self.signaling.send(envelope).await {
            warn!("Chat message {} not broadcast: {}", message.id, e);
        }
        message
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn contains(&self, id: &MessageId) -> bool {
        self.seen.contains(id)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
