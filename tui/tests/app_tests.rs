//! App Integration Tests
//!
//! Drive `App` with synthetic key presses against a mock backend and render
//! frames into a `TestBackend`, on a paused tokio clock.

use std::time::Duration;

use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;

use faqchat_core::{
    ChatBackend, ChatWidget, ConversationState, FetchError, ProbeBackend, Sender, WidgetConfig,
    WidgetMessage,
};
use faqchat_tui::{App, ViewMode};

// ============================================================================
// Mock Backend
// ============================================================================

struct MockBackend {
    reply: &'static str,
    delay: Duration,
    fail: bool,
}

impl MockBackend {
    fn replying(reply: &'static str) -> Self {
        Self {
            reply,
            delay: Duration::ZERO,
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            reply: "",
            delay: Duration::ZERO,
            fail: true,
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl ChatBackend for MockBackend {
    fn name(&self) -> &str {
        "Mock"
    }

    async fn send_message(&self, _message: &str) -> Result<String, FetchError> {
        tokio::time::sleep(self.delay).await;
        if self.fail {
            return Err(FetchError::Transport("connection refused".to_string()));
        }
        Ok(self.reply.to_string())
    }
}

#[async_trait]
impl ProbeBackend for MockBackend {
    async fn probe(&self) -> Result<(), FetchError> {
        if self.fail {
            return Err(FetchError::Status { status: 500 });
        }
        Ok(())
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn create_app(backend: MockBackend, config: WidgetConfig) -> App<MockBackend> {
    let (tx, rx) = mpsc::channel(100);
    App::new(ChatWidget::new(backend, config, tx), rx)
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

async fn type_text(app: &mut App<MockBackend>, text: &str) {
    for c in text.chars() {
        app.handle_key(key(KeyCode::Char(c))).await.unwrap();
    }
}

fn terminal(width: u16, height: u16) -> Terminal<TestBackend> {
    Terminal::new(TestBackend::new(width, height)).unwrap()
}

fn screen(terminal: &Terminal<TestBackend>) -> String {
    let buffer = terminal.backend().buffer();
    let mut out = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

// ============================================================================
// Rendering
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_initial_frame_shows_header_welcome_and_placeholder() {
    let mut app = create_app(MockBackend::replying("ok"), WidgetConfig::default());
    let mut term = terminal(80, 24);

    app.draw(&mut term).unwrap();
    let text = screen(&term);

    assert!(text.contains("26ideas FAQ Assistant"));
    assert!(text.contains("Ask me anything about our services"));
    assert!(text.contains("https://26ideas.com"));
    assert!(text.contains("Hi! I'm the 26ideas FAQ Assistant."));
    assert!(text.contains("Type your message..."));
    assert!(text.contains("Ready"));
}

#[tokio::test(start_paused = true)]
async fn test_typed_input_replaces_placeholder() {
    let mut app = create_app(MockBackend::replying("ok"), WidgetConfig::default());
    let mut term = terminal(80, 24);

    type_text(&mut app, "pricing?").await;
    app.draw(&mut term).unwrap();
    let text = screen(&term);

    assert!(text.contains("pricing?_"));
    assert!(!text.contains("Type your message..."));
}

// ============================================================================
// Exchange Flow
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_enter_submits_and_clears_input() {
    let backend = MockBackend::replying("We build apps").with_delay(Duration::from_secs(1));
    let mut app = create_app(backend, WidgetConfig::default());
    let mut term = terminal(80, 24);

    type_text(&mut app, "What do you do?").await;
    app.handle_key(key(KeyCode::Enter)).await.unwrap();

    assert_eq!(app.input(), "");
    assert_eq!(app.widget().state(), ConversationState::AwaitingReply);
    let last = app.widget().store().last().unwrap();
    assert_eq!(last.sender, Sender::User);
    assert_eq!(last.text, "What do you do?");

    app.draw(&mut term).unwrap();
    assert!(screen(&term).contains("●"));

    tokio::time::sleep(Duration::from_secs(3)).await;

    assert_eq!(app.widget().state(), ConversationState::Idle);
    let reply = app.widget().store().last().unwrap();
    assert_eq!(reply.sender, Sender::Bot);
    assert_eq!(reply.text, "We build apps");
    assert!(reply.complete);

    app.draw(&mut term).unwrap();
    let text = screen(&term);
    assert!(text.contains("We build apps"));
    assert!(!text.contains("●"));
}

#[tokio::test(start_paused = true)]
async fn test_typing_indicator_stays_while_reply_is_typed() {
    let reply = "Our team designs and ships mobile and web products end to end";
    let mut app = create_app(MockBackend::replying(reply), WidgetConfig::default());
    let mut term = terminal(80, 24);

    type_text(&mut app, "What do you do?").await;
    app.handle_key(key(KeyCode::Enter)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;
    app.process_messages();

    assert_eq!(app.widget().state(), ConversationState::Animating);
    assert_eq!(app.display().conversation_state, ConversationState::Animating);
    assert!(!app.widget().store().last().unwrap().complete);

    app.draw(&mut term).unwrap();
    assert!(screen(&term).contains("●"));
}

#[tokio::test(start_paused = true)]
async fn test_state_follows_widget_when_channel_is_full() {
    let (tx, rx) = mpsc::channel(1);
    tx.try_send(WidgetMessage::State { state: ConversationState::Idle })
        .unwrap();
    let backend = MockBackend::replying("ok").with_delay(Duration::from_secs(1));
    let mut app = App::new(ChatWidget::new(backend, WidgetConfig::default(), tx), rx);

    type_text(&mut app, "hi").await;
    app.handle_key(key(KeyCode::Enter)).await.unwrap();
    app.process_messages();

    assert_eq!(app.display().conversation_state, ConversationState::AwaitingReply);
}

#[tokio::test(start_paused = true)]
async fn test_keystrokes_ignored_while_busy() {
    let backend = MockBackend::replying("ok").with_delay(Duration::from_secs(1));
    let mut app = create_app(backend, WidgetConfig::default());

    type_text(&mut app, "hi").await;
    app.handle_key(key(KeyCode::Enter)).await.unwrap();

    type_text(&mut app, "more").await;
    app.handle_key(key(KeyCode::Enter)).await.unwrap();
    assert_eq!(app.input(), "");
    assert_eq!(app.widget().store().len(), 2);

    tokio::time::sleep(Duration::from_secs(2)).await;
    type_text(&mut app, "again").await;
    assert_eq!(app.input(), "again");
}

#[tokio::test(start_paused = true)]
async fn test_enter_on_blank_input_is_noop() {
    let mut app = create_app(MockBackend::replying("ok"), WidgetConfig::default());

    type_text(&mut app, "   ").await;
    app.handle_key(key(KeyCode::Enter)).await.unwrap();

    assert_eq!(app.input(), "   ");
    assert_eq!(app.widget().state(), ConversationState::Idle);
    assert_eq!(app.widget().store().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_backspace_edits_input() {
    let mut app = create_app(MockBackend::replying("ok"), WidgetConfig::default());

    type_text(&mut app, "hey").await;
    app.handle_key(key(KeyCode::Backspace)).await.unwrap();

    assert_eq!(app.input(), "he");
}

#[tokio::test(start_paused = true)]
async fn test_connection_error_toast_is_shown_then_expires() {
    let mut app = create_app(MockBackend::failing(), WidgetConfig::default());
    let mut term = terminal(80, 24);

    type_text(&mut app, "hello").await;
    app.handle_key(key(KeyCode::Enter)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    app.process_messages();
    app.update();
    app.draw(&mut term).unwrap();
    let text = screen(&term);
    assert!(text.contains("Connection Error"));
    assert_eq!(app.widget().state(), ConversationState::Idle);

    tokio::time::advance(Duration::from_secs(5)).await;
    app.update();
    assert!(app.display().notification.is_none());

    app.draw(&mut term).unwrap();
    assert!(!screen(&term).contains("Connection Error"));
}

// ============================================================================
// Documents
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_ctrl_g_opens_document_viewer_and_tab_returns() {
    let mut app = create_app(MockBackend::replying("ok"), WidgetConfig::default());
    let mut term = terminal(80, 30);

    app.handle_key(ctrl('g')).await.unwrap();
    assert!(app.widget().is_generating());

    tokio::time::sleep(Duration::from_secs(6)).await;
    app.process_messages();

    assert_eq!(app.display().view, ViewMode::Document);
    assert!(!app.display().generating);

    app.draw(&mut term).unwrap();
    let text = screen(&term);
    assert!(text.contains("conversation.pdf"));
    assert!(text.contains("(blank page)"));
    assert!(text.contains("Ctrl+S to download"));

    app.handle_key(key(KeyCode::Tab)).await.unwrap();
    assert_eq!(app.display().view, ViewMode::Transcript);
    app.draw(&mut term).unwrap();
    assert!(screen(&term).contains("Hi! I'm the 26ideas FAQ Assistant."));
}

#[tokio::test(start_paused = true)]
async fn test_ctrl_s_without_document_does_nothing() {
    let mut app = create_app(MockBackend::replying("ok"), WidgetConfig::default());

    app.handle_key(ctrl('s')).await.unwrap();
    app.process_messages();

    assert!(app.display().notification.is_none());
    assert!(app.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_ctrl_s_saves_to_download_dir() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = WidgetConfig::default();
    config.download_dir = dir.path().to_path_buf();
    let mut app = create_app(MockBackend::replying("ok"), config);

    app.handle_key(ctrl('g')).await.unwrap();
    tokio::time::sleep(Duration::from_secs(6)).await;
    app.process_messages();

    app.handle_key(ctrl('s')).await.unwrap();
    app.process_messages();

    let notification = app.display().notification.as_ref().unwrap();
    assert_eq!(notification.title.as_deref(), Some("Saved"));
    assert!(dir.path().join("conversation.pdf").exists());
}

#[tokio::test(start_paused = true)]
async fn test_failed_probe_shows_document_error() {
    let mut app = create_app(MockBackend::failing(), WidgetConfig::default());

    app.handle_key(ctrl('g')).await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    app.process_messages();

    assert_eq!(app.display().view, ViewMode::Transcript);
    let notification = app.display().notification.as_ref().unwrap();
    assert_eq!(notification.title.as_deref(), Some("Document Error"));
}

// ============================================================================
// Scrolling and Quit
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_page_up_scrolls_and_submit_returns_to_bottom() {
    let mut app = create_app(MockBackend::replying("ok"), WidgetConfig::default());
    // narrow and short so the welcome alone overflows the body
    let mut term = terminal(20, 12);

    app.draw(&mut term).unwrap();
    assert!(app.transcript().max_scroll() > 0);

    app.handle_key(key(KeyCode::PageUp)).await.unwrap();
    assert!(app.transcript().scroll_offset > 0);

    app.handle_key(key(KeyCode::PageDown)).await.unwrap();
    app.handle_key(key(KeyCode::PageUp)).await.unwrap();
    type_text(&mut app, "hi").await;
    app.handle_key(key(KeyCode::Enter)).await.unwrap();
    assert_eq!(app.transcript().scroll_offset, 0);
}

#[tokio::test(start_paused = true)]
async fn test_esc_quits() {
    let mut app = create_app(MockBackend::replying("ok"), WidgetConfig::default());
    assert!(app.is_running());

    app.handle_key(key(KeyCode::Esc)).await.unwrap();

    assert!(!app.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_ctrl_c_quits_and_cancels_exchange() {
    let backend = MockBackend::replying("never shown").with_delay(Duration::from_secs(1));
    let mut app = create_app(backend, WidgetConfig::default());

    type_text(&mut app, "hi").await;
    app.handle_key(key(KeyCode::Enter)).await.unwrap();
    app.handle_key(ctrl('c')).await.unwrap();

    assert!(!app.is_running());
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(app.widget().store().len(), 2);
}
