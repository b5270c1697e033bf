//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin display client:
//! - Event loop (keyboard, resize, frame ticks)
//! - `ChatWidget` for everything the conversation does
//! - `DisplayState` for rendering
//!
//! The App:
//! 1. Converts key presses to widget calls
//! 2. Receives `WidgetMessage`s and updates `DisplayState`
//! 3. Watches store revisions to keep the newest message in view, and the
//!    conversation state so a dropped `State` message cannot leave it stale
//! 4. Renders the store snapshot through [`view::render`]

use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::backend::Backend;
use ratatui::Terminal;
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, MissedTickBehavior};

use faqchat_core::{
    ChatBackend, ChatWidget, ConversationState, ProbeBackend, WidgetEvent, WidgetMessage,
};

use crate::display::{DisplayState, ViewMode};
use crate::view::{self, ViewModel};
use crate::widgets::TranscriptState;

/// Target frame interval for the typing indicator and toast timers
pub const FRAME_DURATION: Duration = Duration::from_millis(100);

/// Main application state
pub struct App<B: ChatBackend + ProbeBackend + 'static> {
    // === Core State ===
    /// Is the app still running?
    running: bool,
    /// The conversation
    widget: ChatWidget<B>,
    /// Messages from the widget core
    rx: mpsc::Receiver<WidgetMessage>,
    /// Store revisions
    revisions: watch::Receiver<u64>,
    /// Conversation state, authoritative over `WidgetMessage::State`
    states: watch::Receiver<ConversationState>,

    // === Display ===
    display: DisplayState,
    input_buffer: String,
    transcript: TranscriptState,
    /// Frames drawn on the ticker, drives the typing indicator
    frame: u64,
    last_update: Instant,
}

impl<B: ChatBackend + ProbeBackend + 'static> App<B> {
    /// Create the app around a widget and the receiving end of its channel
    pub fn new(widget: ChatWidget<B>, rx: mpsc::Receiver<WidgetMessage>) -> Self {
        let revisions = widget.store().subscribe();
        let states = widget.subscribe_state();
        Self {
            running: true,
            widget,
            rx,
            revisions,
            states,
            display: DisplayState::new(),
            input_buffer: String::new(),
            transcript: TranscriptState::default(),
            frame: 0,
            last_update: Instant::now(),
        }
    }

    /// Main event loop
    ///
    /// # Errors
    ///
    /// Fails when the terminal cannot be drawn to.
    pub async fn run<T: Backend>(&mut self, terminal: &mut Terminal<T>) -> anyhow::Result<()> {
        let mut event_stream = EventStream::new();
        let mut ticker = tokio::time::interval(FRAME_DURATION);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        // Render initial frame immediately so user sees UI
        self.draw(terminal)?;

        while self.running {
            tokio::select! {
                biased;

                // Terminal events - highest priority
                maybe_event = event_stream.next() => match maybe_event {
                    // Only handle Press events (not Release or Repeat)
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key).await?;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => tracing::warn!("Terminal event error: {}", e),
                    None => self.running = false,
                },

                Some(msg) = self.rx.recv() => self.apply_message(msg),

                changed = self.revisions.changed() => {
                    if changed.is_ok() {
                        self.transcript.scroll_to_bottom();
                    }
                }

                changed = self.states.changed() => {
                    if changed.is_ok() {
                        self.display.conversation_state = *self.states.borrow_and_update();
                    }
                }

                _ = ticker.tick() => {
                    self.frame = self.frame.wrapping_add(1);
                }
            }

            self.process_messages();
            self.update();
            self.draw(terminal)?;
        }

        Ok(())
    }

    /// Handle keyboard input
    ///
    /// # Errors
    ///
    /// Propagates failures from the widget's event handler.
    pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<()> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            // Quit
            KeyCode::Esc => self.quit().await?,
            KeyCode::Char('c') if ctrl => self.quit().await?,

            // Documents
            KeyCode::Char('g') if ctrl => {
                self.widget
                    .handle_event(WidgetEvent::GenerateDocument)
                    .await?;
            }
            KeyCode::Char('s') if ctrl => {
                if self.widget.document().is_some() {
                    self.widget
                        .handle_event(WidgetEvent::DownloadDocument { directory: None })
                        .await?;
                }
            }
            KeyCode::Tab => self.display.toggle_view(),

            // Submit message
            KeyCode::Enter => self.submit(),

            // Typing (disabled while an exchange is running)
            KeyCode::Char(c) if !ctrl => {
                if self.widget.state().accepts_input() {
                    self.input_buffer.push(c);
                }
            }
            KeyCode::Backspace => {
                if self.widget.state().accepts_input() {
                    self.input_buffer.pop();
                }
            }

            // Conversation scrolling
            KeyCode::PageUp => {
                let page = self.transcript.page();
                self.transcript.scroll_up(page);
            }
            KeyCode::PageDown => {
                let page = self.transcript.page();
                self.transcript.scroll_down(page);
            }

            _ => {}
        }
        Ok(())
    }

    fn submit(&mut self) {
        match self.widget.submit(&self.input_buffer) {
            Ok(_exchange) => {
                self.input_buffer.clear();
                self.transcript.scroll_to_bottom();
                self.display.view = ViewMode::Transcript;
            }
            Err(reason) => tracing::debug!(%reason, "Submit ignored"),
        }
    }

    async fn quit(&mut self) -> anyhow::Result<()> {
        self.widget.handle_event(WidgetEvent::Quit).await?;
        self.running = false;
        Ok(())
    }

    fn apply_message(&mut self, msg: WidgetMessage) {
        self.display.apply_message(msg);
        if self.display.quit {
            self.running = false;
        }
    }

    /// Apply every pending message from the widget core
    pub fn process_messages(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            self.apply_message(msg);
        }
        if self.states.has_changed().unwrap_or(false) {
            self.display.conversation_state = *self.states.borrow_and_update();
        }
    }

    /// Advance toast timers by the time since the last update
    pub fn update(&mut self) {
        let now = Instant::now();
        self.display.update(now.duration_since(self.last_update));
        self.last_update = now;
    }

    /// Render one frame
    ///
    /// # Errors
    ///
    /// Fails when the terminal backend cannot be written.
    pub fn draw<T: Backend>(&mut self, terminal: &mut Terminal<T>) -> anyhow::Result<()> {
        let messages = self.widget.store().snapshot();
        let model = ViewModel {
            branding: &self.widget.config().branding,
            messages: &messages,
            state: self.widget.state(),
            input: &self.input_buffer,
            display: &self.display,
            frame: self.frame,
        };
        let transcript = &mut self.transcript;
        terminal.draw(|frame| view::render(frame, &model, transcript))?;
        Ok(())
    }

    /// Is the app still running?
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current input buffer
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input_buffer
    }

    /// Surface-side display state
    #[must_use]
    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    /// Transcript scroll state
    #[must_use]
    pub fn transcript(&self) -> &TranscriptState {
        &self.transcript
    }

    /// The conversation behind this app
    #[must_use]
    pub fn widget(&self) -> &ChatWidget<B> {
        &self.widget
    }
}
