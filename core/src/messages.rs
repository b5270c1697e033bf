//! Widget Messages
//!
//! Conversation data types and the messages the [`ChatWidget`] sends to a
//! rendering surface.
//!
//! # Design Philosophy
//!
//! The widget core owns every piece of state that matters. Surfaces (the
//! terminal UI, a test harness) read the message store and react to
//! `WidgetMessage`s; they never decide what a reply or a document is.
//!
//! [`ChatWidget`]: crate::widget::ChatWidget

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::DocumentHandle;

/// Message identifier
///
/// Assigned by the [`MessageStore`](crate::store::MessageStore) in strictly
/// increasing order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "msg_{}", self.0)
    }
}

/// Who wrote a message
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    /// The person typing into the widget
    User,
    /// The FAQ assistant
    Bot,
}

/// A single conversation turn
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique message ID
    pub id: MessageId,
    /// Message text (grows while the typing animation runs)
    pub text: String,
    /// Who sent this message
    pub sender: Sender,
    /// When the message was created
    pub timestamp: DateTime<Utc>,
    /// Whether the text is final
    pub complete: bool,
}

impl ChatMessage {
    pub(crate) fn new(id: MessageId, sender: Sender, text: String, complete: bool) -> Self {
        Self {
            id,
            text,
            sender,
            timestamp: Utc::now(),
            complete,
        }
    }

    /// Whether the message is still being revealed
    #[must_use]
    pub fn is_animating(&self) -> bool {
        !self.complete
    }
}

/// Conversation-level state machine
///
/// `Idle → AwaitingReply → Animating → Idle` on the happy path,
/// `AwaitingReply → Idle` when the fetch fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversationState {
    /// Ready for a new submission
    #[default]
    Idle,
    /// A reply fetch is outstanding
    AwaitingReply,
    /// The reply is being typed into the store
    Animating,
}

impl ConversationState {
    /// Human-readable description
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Idle => "Ready",
            Self::AwaitingReply => "Waiting for reply...",
            Self::Animating => "Typing...",
        }
    }

    /// Whether new submissions are accepted
    #[must_use]
    pub fn accepts_input(self) -> bool {
        self == Self::Idle
    }
}

/// Notification levels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotifyLevel {
    /// Informational
    Info,
    /// Something went wrong; shown as a destructive toast
    Error,
}

/// Messages from the widget core to a surface
#[derive(Clone, Debug)]
pub enum WidgetMessage {
    /// Conversation state changed
    State {
        /// The new state
        state: ConversationState,
    },

    /// Transient notification (toast)
    Notify {
        /// Notification level
        level: NotifyLevel,
        /// Title (optional)
        title: Option<String>,
        /// Message content
        message: String,
    },

    /// Document generation started or finished
    DocumentGenerating {
        /// Whether a generation is pending
        active: bool,
    },

    /// A new document is available for viewing and download
    DocumentReady {
        /// The generated document
        handle: DocumentHandle,
    },

    /// The widget is shutting down
    Quit,
}

impl WidgetMessage {
    /// The single notice shown for any chat-path failure
    #[must_use]
    pub fn connection_error() -> Self {
        Self::Notify {
            level: NotifyLevel::Error,
            title: Some("Connection Error".to_string()),
            message: "Could not connect to the server. Please try again.".to_string(),
        }
    }

    /// The single notice shown for any document-path failure
    #[must_use]
    pub fn document_error() -> Self {
        Self::Notify {
            level: NotifyLevel::Error,
            title: Some("Document Error".to_string()),
            message: "Could not generate the document. Please try again.".to_string(),
        }
    }

    /// Whether this is an error notification with the given title
    #[must_use]
    pub fn is_error_titled(&self, expected: &str) -> bool {
        matches!(
            self,
            Self::Notify { level: NotifyLevel::Error, title: Some(title), .. } if title == expected
        )
    }
}
