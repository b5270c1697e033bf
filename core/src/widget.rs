//! Chat Widget - The Conversation Core
//!
//! `ChatWidget` owns the conversation and runs both asynchronous flows:
//! - the reply exchange (fetch, then typing animation)
//! - document generation (probe, delay, synthesize)
//!
//! # Design Philosophy
//!
//! The widget is surface-agnostic. It communicates through:
//! - `WidgetMessage`: notifications and state changes sent TO the surface
//! - `WidgetEvent`: user actions received FROM the surface
//! - the [`MessageStore`] revision channel, which tells the surface when the
//!   transcript changed
//!
//! Conversation state lives in a `watch` channel. Claiming an exchange is a
//! compare-and-set `Idle → AwaitingReply` on that channel, and only the
//! claimant ever writes `Idle` back (from its guard's `Drop`), so at most one
//! exchange runs at any time.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::{AbortHandle, JoinHandle};

use crate::animator::{AnimationOutcome, TypingAnimator};
use crate::backend::{ChatBackend, FetchError, ProbeBackend};
use crate::config::WidgetConfig;
use crate::document::{DocumentError, DocumentGenerator, DocumentHandle, DocumentId, DocumentSlot};
use crate::events::WidgetEvent;
use crate::fetcher::ReplyFetcher;
use crate::messages::{ConversationState, MessageId, NotifyLevel, Sender, WidgetMessage};
use crate::store::MessageStore;

/// Why a submission was not accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    /// The input was empty or whitespace only
    #[error("message is empty")]
    Empty,
    /// An exchange is already in progress
    #[error("an exchange is already in progress")]
    Busy,
}

/// How an exchange ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeOutcome {
    /// A bot message was appended and animated
    Replied {
        /// The bot message
        id: MessageId,
        /// Result of the animation
        animation: AnimationOutcome,
    },
    /// The fetch failed; nothing was appended
    Failed(FetchError),
}

/// How a document generation ended
#[derive(Debug)]
pub enum DocumentOutcome {
    /// A new document is current
    Ready {
        /// The new document
        id: DocumentId,
        /// The superseded document, if any
        released: Option<DocumentId>,
    },
    /// The generation failed; no document was produced
    Failed(DocumentError),
}

struct Inner<B: ChatBackend + ProbeBackend + 'static> {
    config: WidgetConfig,
    store: MessageStore,
    animator: TypingAnimator,
    fetcher: ReplyFetcher<B>,
    generator: DocumentGenerator<B>,
    documents: DocumentSlot,
    state: watch::Sender<ConversationState>,
    tx: mpsc::Sender<WidgetMessage>,
    tasks: Mutex<Vec<AbortHandle>>,
}

impl<B: ChatBackend + ProbeBackend + 'static> Inner<B> {
    /// Send a message to the surface
    async fn send(&self, msg: WidgetMessage) {
        if let Err(e) = self.tx.send(msg).await {
            tracing::warn!("Failed to send message to surface: {}", e);
        }
    }

    /// Send without waiting (used from synchronous paths, `Drop` and calls
    /// made from the surface's own loop)
    fn emit(&self, msg: WidgetMessage) {
        if let Err(e) = self.tx.try_send(msg) {
            tracing::warn!("Failed to send message to surface: {}", e);
        }
    }

    fn set_state(&self, state: ConversationState) {
        self.state.send_replace(state);
        self.emit(WidgetMessage::State { state });
    }

    fn track(&self, handle: AbortHandle) {
        let mut tasks = self.tasks.lock();
        tasks.retain(|h| !h.is_finished());
        tasks.push(handle);
    }
}

/// Returns the conversation to `Idle` when the exchange ends, however it ends
struct ExchangeGuard<B: ChatBackend + ProbeBackend + 'static> {
    inner: Arc<Inner<B>>,
}

impl<B: ChatBackend + ProbeBackend + 'static> Drop for ExchangeGuard<B> {
    fn drop(&mut self) {
        self.inner.set_state(ConversationState::Idle);
    }
}

/// The chat widget
///
/// Cloning is cheap and every clone drives the same conversation.
pub struct ChatWidget<B: ChatBackend + ProbeBackend + 'static> {
    inner: Arc<Inner<B>>,
}

impl<B: ChatBackend + ProbeBackend + 'static> Clone for ChatWidget<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: ChatBackend + ProbeBackend + 'static> ChatWidget<B> {
    /// Create a widget and seed the welcome message
    pub fn new(backend: B, config: WidgetConfig, tx: mpsc::Sender<WidgetMessage>) -> Self {
        let backend = Arc::new(backend);
        let store = MessageStore::new();
        store.append(Sender::Bot, config.branding.welcome.clone());

        let (state, _) = watch::channel(ConversationState::Idle);

        tracing::info!(
            backend = backend.name(),
            chat = %config.chat_endpoint,
            "Chat widget created"
        );

        Self {
            inner: Arc::new(Inner {
                animator: TypingAnimator::new(config.typing_delay),
                fetcher: ReplyFetcher::new(Arc::clone(&backend), config.request_timeout),
                generator: DocumentGenerator::new(backend, config.generator_settings()),
                documents: DocumentSlot::new(),
                store,
                state,
                tx,
                tasks: Mutex::new(Vec::new()),
                config,
            }),
        }
    }

    /// Current conversation state
    pub fn state(&self) -> ConversationState {
        *self.inner.state.borrow()
    }

    /// Observe conversation state changes
    pub fn subscribe_state(&self) -> watch::Receiver<ConversationState> {
        self.inner.state.subscribe()
    }

    /// The conversation history
    pub fn store(&self) -> &MessageStore {
        &self.inner.store
    }

    /// Whether a document generation is pending
    pub fn is_generating(&self) -> bool {
        self.inner.generator.is_generating()
    }

    /// The current document, if one has been generated
    pub fn document(&self) -> Option<DocumentHandle> {
        self.inner.documents.current()
    }

    /// Configuration in use
    pub fn config(&self) -> &WidgetConfig {
        &self.inner.config
    }

    /// Submit user input
    ///
    /// On acceptance the user message is appended immediately and the
    /// exchange runs on a spawned task.
    ///
    /// # Errors
    ///
    /// [`SubmitRejected::Empty`] for blank input and [`SubmitRejected::Busy`]
    /// while an exchange is in progress; nothing is appended in either case.
    pub fn submit(&self, text: &str) -> Result<JoinHandle<ExchangeOutcome>, SubmitRejected> {
        if text.trim().is_empty() {
            tracing::debug!("Ignoring empty submission");
            return Err(SubmitRejected::Empty);
        }

        let claimed = self.inner.state.send_if_modified(|state| {
            if state.accepts_input() {
                *state = ConversationState::AwaitingReply;
                true
            } else {
                false
            }
        });
        if !claimed {
            tracing::warn!(state = ?self.state(), "Submission rejected: exchange in progress");
            return Err(SubmitRejected::Busy);
        }

        let guard = ExchangeGuard {
            inner: Arc::clone(&self.inner),
        };
        self.inner.store.append(Sender::User, text);
        self.inner.emit(WidgetMessage::State {
            state: ConversationState::AwaitingReply,
        });

        let inner = Arc::clone(&self.inner);
        let text = text.to_string();
        let handle = tokio::spawn(async move {
            let _guard = guard;
            inner.run_exchange(&text).await
        });
        self.inner.track(handle.abort_handle());
        Ok(handle)
    }

    /// Start a document generation
    ///
    /// # Errors
    ///
    /// [`DocumentError::Busy`] while another generation is pending.
    pub fn generate_document(&self) -> Result<JoinHandle<DocumentOutcome>, DocumentError> {
        let pending = self.inner.generator.try_start()?;
        self.inner.emit(WidgetMessage::DocumentGenerating { active: true });

        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            let outcome = match pending.finish().await {
                Ok(document) => {
                    let id = document.id;
                    let released = inner.documents.publish(document.clone());
                    inner.send(WidgetMessage::DocumentReady { handle: document }).await;
                    DocumentOutcome::Ready { id, released }
                }
                Err(e) => {
                    inner.send(WidgetMessage::document_error()).await;
                    DocumentOutcome::Failed(e)
                }
            };
            inner
                .send(WidgetMessage::DocumentGenerating { active: false })
                .await;
            outcome
        });
        self.inner.track(handle.abort_handle());
        Ok(handle)
    }

    /// Save the current document into `directory` (or the configured
    /// download directory)
    ///
    /// # Errors
    ///
    /// [`DocumentError::NoDocument`] before any document exists and
    /// [`DocumentError::Io`] when the file cannot be written.
    pub async fn download_document(&self, directory: Option<&Path>) -> Result<PathBuf, DocumentError> {
        let Some(document) = self.document() else {
            tracing::warn!("Download requested with no document");
            return Err(DocumentError::NoDocument);
        };
        let directory = directory.unwrap_or(self.inner.config.download_dir.as_path());

        // The surface calls this from the loop that drains the channel
        match document.save_to(directory).await {
            Ok(path) => {
                self.inner.emit(WidgetMessage::Notify {
                    level: NotifyLevel::Info,
                    title: Some("Saved".to_string()),
                    message: format!("Saved {}", path.display()),
                });
                Ok(path)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Document download failed");
                self.inner.emit(WidgetMessage::document_error());
                Err(e)
            }
        }
    }

    /// Handle an event from the surface
    ///
    /// Rejected actions are logged and dropped, like a disabled control.
    pub async fn handle_event(&self, event: WidgetEvent) -> anyhow::Result<()> {
        tracing::debug!(kind = event.kind(), "Handling surface event");
        match event {
            WidgetEvent::Submit { content } => {
                if let Err(reason) = self.submit(&content) {
                    tracing::debug!(%reason, "Submit ignored");
                }
            }
            WidgetEvent::GenerateDocument => {
                if let Err(reason) = self.generate_document() {
                    tracing::debug!(%reason, "Generate ignored");
                }
            }
            WidgetEvent::DownloadDocument { directory } => {
                if let Err(reason) = self.download_document(directory.as_deref()).await {
                    tracing::debug!(%reason, "Download failed");
                }
            }
            WidgetEvent::Quit => self.shutdown().await,
        }
        Ok(())
    }

    /// Cancel in-flight work and tell the surface to quit
    pub async fn shutdown(&self) {
        let tasks: Vec<AbortHandle> = std::mem::take(&mut *self.inner.tasks.lock());
        let aborted = tasks.iter().filter(|h| !h.is_finished()).count();
        for task in tasks {
            task.abort();
        }
        tracing::info!(aborted, "Chat widget shutting down");
        self.inner.send(WidgetMessage::Quit).await;
    }
}

impl<B: ChatBackend + ProbeBackend + 'static> Inner<B> {
    async fn run_exchange(&self, text: &str) -> ExchangeOutcome {
        match self.fetcher.send(text).await {
            Ok(reply) => {
                let reply = if reply.is_empty() {
                    tracing::warn!("Chat endpoint returned an empty reply");
                    self.config.branding.fallback_reply.clone()
                } else {
                    reply
                };
                let id = self.store.append_pending(Sender::Bot);
                self.set_state(ConversationState::Animating);
                let animation = self.animator.reveal(&self.store, id, &reply).await;
                tracing::info!(%id, ticks = animation.ticks(), "Exchange complete");
                ExchangeOutcome::Replied { id, animation }
            }
            Err(e) => {
                if e.is_connection_error() {
                    self.send(WidgetMessage::connection_error()).await;
                }
                ExchangeOutcome::Failed(e)
            }
        }
    }
}
