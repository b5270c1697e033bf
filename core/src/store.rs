//! Message Store
//!
//! Ordered, append-only conversation history shared between the submit path
//! and the typing animation task.
//!
//! Every mutation that changes something bumps a revision counter published
//! on a `watch` channel; surfaces subscribe to it to know when to re-render.
//! Mutations that target an unknown or already completed message are silent
//! no-ops, since an animation tick may race with [`MessageStore::clear`].

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::messages::{ChatMessage, MessageId, Sender};

#[derive(Debug, Default)]
struct StoreState {
    messages: Vec<ChatMessage>,
    next_id: u64,
    revision: u64,
}

#[derive(Debug)]
struct Shared {
    state: Mutex<StoreState>,
    changes: watch::Sender<u64>,
}

/// Shared handle to the conversation history
///
/// Cloning is cheap; all clones see the same messages.
#[derive(Clone, Debug)]
pub struct MessageStore {
    shared: Arc<Shared>,
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(StoreState::default()),
                changes,
            }),
        }
    }

    /// Append a complete message
    pub fn append(&self, sender: Sender, text: impl Into<String>) -> MessageId {
        self.push(sender, text.into(), true)
    }

    /// Append an empty message whose text will be revealed later
    pub fn append_pending(&self, sender: Sender) -> MessageId {
        self.push(sender, String::new(), false)
    }

    fn push(&self, sender: Sender, text: String, complete: bool) -> MessageId {
        let (id, revision) = {
            let mut state = self.shared.state.lock();
            state.next_id += 1;
            let id = MessageId(state.next_id);
            state
                .messages
                .push(ChatMessage::new(id, sender, text, complete));
            state.revision += 1;
            (id, state.revision)
        };
        tracing::debug!(%id, ?sender, complete, "Appended message");
        self.shared.changes.send_replace(revision);
        id
    }

    /// Replace the text of an in-progress message
    ///
    /// Returns `false` without touching anything when the id is unknown or
    /// the message is already complete.
    pub fn update_text(&self, id: MessageId, text: impl Into<String>) -> bool {
        let revision = {
            let mut state = self.shared.state.lock();
            let Some(message) = state
                .messages
                .iter_mut()
                .find(|m| m.id == id && !m.complete)
            else {
                return false;
            };
            message.text = text.into();
            state.revision += 1;
            state.revision
        };
        self.shared.changes.send_replace(revision);
        true
    }

    /// Freeze a message; its text is immutable afterwards
    ///
    /// Returns `false` if the id is unknown or the message was already complete.
    pub fn complete(&self, id: MessageId) -> bool {
        let revision = {
            let mut state = self.shared.state.lock();
            let Some(message) = state
                .messages
                .iter_mut()
                .find(|m| m.id == id && !m.complete)
            else {
                return false;
            };
            message.complete = true;
            state.revision += 1;
            state.revision
        };
        tracing::debug!(%id, "Completed message");
        self.shared.changes.send_replace(revision);
        true
    }

    /// Ordered copy of the conversation for rendering
    #[must_use]
    pub fn snapshot(&self) -> Vec<ChatMessage> {
        self.shared.state.lock().messages.clone()
    }

    /// Look up one message
    #[must_use]
    pub fn get(&self, id: MessageId) -> Option<ChatMessage> {
        self.shared
            .state
            .lock()
            .messages
            .iter()
            .find(|m| m.id == id)
            .cloned()
    }

    /// The most recently appended message
    #[must_use]
    pub fn last(&self) -> Option<ChatMessage> {
        self.shared.state.lock().messages.last().cloned()
    }

    /// Number of messages
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.state.lock().messages.len()
    }

    /// Whether the store holds no messages
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current revision (incremented on every effective mutation)
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.shared.state.lock().revision
    }

    /// Observe revisions
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.shared.changes.subscribe()
    }

    /// Drop every message (session teardown)
    ///
    /// Ids keep increasing across a clear, so stale ids never match new
    /// messages.
    pub fn clear(&self) {
        let revision = {
            let mut state = self.shared.state.lock();
            if state.messages.is_empty() {
                return;
            }
            state.messages.clear();
            state.revision += 1;
            state.revision
        };
        tracing::debug!("Cleared message store");
        self.shared.changes.send_replace(revision);
    }
}
