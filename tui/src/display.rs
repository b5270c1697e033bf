//! Display State Types
//!
//! Everything the terminal surface remembers that the widget core does not:
//! which view is showing, the toast on screen, and the last state the core
//! reported.
//!
//! # Design Philosophy
//!
//! The TUI is a thin client. Conversation text always comes from the
//! [`MessageStore`](faqchat_core::MessageStore) snapshot; `DisplayState` only
//! folds in the [`WidgetMessage`]s that the store cannot express.

use std::time::Duration;

use faqchat_core::{ConversationState, DocumentHandle, NotifyLevel, WidgetMessage};

/// How long a toast stays on screen
pub const TOAST_DURATION: Duration = Duration::from_secs(4);

/// Which pane fills the body of the widget
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewMode {
    /// The chat transcript
    #[default]
    Transcript,
    /// The generated document viewer
    Document,
}

/// A notification to display
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayNotification {
    /// Notification level
    pub level: NotifyLevel,
    /// Optional title
    pub title: Option<String>,
    /// Message content
    pub message: String,
    /// Time left on screen
    pub remaining: Duration,
}

impl DisplayNotification {
    /// Fresh toast with the full display duration
    #[must_use]
    pub fn new(level: NotifyLevel, title: Option<String>, message: String) -> Self {
        Self {
            level,
            title,
            message,
            remaining: TOAST_DURATION,
        }
    }

    /// Whether this is a destructive (error) toast
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.level == NotifyLevel::Error
    }
}

/// The full display state for the TUI
#[derive(Debug, Default)]
pub struct DisplayState {
    /// Body pane
    pub view: ViewMode,
    /// Last conversation state reported by the core
    pub conversation_state: ConversationState,
    /// Whether a document generation is pending
    pub generating: bool,
    /// Most recent document, if any
    pub document: Option<DocumentHandle>,
    /// Toast on screen (if any)
    pub notification: Option<DisplayNotification>,
    /// Set once the core has said goodbye
    pub quit: bool,
}

impl DisplayState {
    /// Create a new display state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a `WidgetMessage` to update display state
    pub fn apply_message(&mut self, msg: WidgetMessage) {
        match msg {
            WidgetMessage::State { state } => {
                self.conversation_state = state;
            }
            WidgetMessage::Notify {
                level,
                title,
                message,
            } => {
                self.notification = Some(DisplayNotification::new(level, title, message));
            }
            WidgetMessage::DocumentGenerating { active } => {
                self.generating = active;
            }
            WidgetMessage::DocumentReady { handle } => {
                self.document = Some(handle);
                self.view = ViewMode::Document;
            }
            WidgetMessage::Quit => {
                self.quit = true;
            }
        }
    }

    /// Switch between transcript and document
    ///
    /// Stays on the transcript while there is no document to show.
    pub fn toggle_view(&mut self) {
        self.view = match self.view {
            ViewMode::Transcript if self.document.is_some() => ViewMode::Document,
            _ => ViewMode::Transcript,
        };
    }

    /// Update timers
    pub fn update(&mut self, delta: Duration) {
        if let Some(notification) = &mut self.notification {
            notification.remaining = notification.remaining.saturating_sub(delta);
            if notification.remaining.is_zero() {
                self.notification = None;
            }
        }
    }

    /// Clear the notification
    pub fn clear_notification(&mut self) {
        self.notification = None;
    }

    /// Whether the document viewer is showing
    #[must_use]
    pub fn showing_document(&self) -> bool {
        self.view == ViewMode::Document
    }
}
