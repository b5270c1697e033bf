//! Transcript Widget
//!
//! A borderless, scrollable list of chat bubbles. User bubbles hug the right
//! edge, assistant bubbles the left, and both wrap at 80% of the width.

use faqchat_core::{ChatMessage, Sender};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::StatefulWidget;
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

use crate::theme;

/// Appended to the message that is still being typed
pub const TYPING_CURSOR: &str = "▌";

/// State for the scrollable transcript
#[derive(Debug, Default, Clone)]
pub struct TranscriptState {
    /// Scroll offset (lines from bottom, 0 = pinned to the latest message)
    pub scroll_offset: usize,
    /// Total laid-out lines at the last render
    pub total_lines: usize,
    /// Visible rows at the last render
    pub viewport: usize,
}

impl TranscriptState {
    /// Largest useful offset
    #[must_use]
    pub fn max_scroll(&self) -> usize {
        self.total_lines.saturating_sub(self.viewport)
    }

    /// Half a screen, never less than one line
    #[must_use]
    pub fn page(&self) -> usize {
        (self.viewport / 2).max(1)
    }

    /// Scroll towards older messages
    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines).min(self.max_scroll());
    }

    /// Scroll towards newer messages
    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    /// Pin to the latest message
    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = 0;
    }
}

/// One laid-out row of the transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BubbleLine {
    /// Columns of blank space before the bubble
    pub indent: u16,
    /// Bubble text including its one-column padding
    pub text: String,
    /// Whose bubble this row belongs to; `None` for the gap between bubbles
    pub sender: Option<Sender>,
}

impl BubbleLine {
    fn gap() -> Self {
        Self {
            indent: 0,
            text: String::new(),
            sender: None,
        }
    }
}

/// Maximum bubble width for a transcript `width` columns wide
#[must_use]
pub fn bubble_width(width: u16) -> usize {
    (usize::from(width) * 4 / 5).max(3)
}

/// Lay out `messages` into rows for a transcript `width` columns wide
#[must_use]
pub fn layout_lines(messages: &[ChatMessage], width: u16) -> Vec<BubbleLine> {
    let max_bubble = bubble_width(width);
    let text_width = max_bubble.saturating_sub(2).max(1);
    let mut lines = Vec::new();

    for (index, message) in messages.iter().enumerate() {
        if index > 0 {
            lines.push(BubbleLine::gap());
        }

        let mut rows: Vec<String> = message
            .text
            .lines()
            .flat_map(|line| {
                if line.is_empty() {
                    vec![String::new()]
                } else {
                    wrap(line, text_width)
                        .into_iter()
                        .map(|cow| cow.to_string())
                        .collect()
                }
            })
            .collect();
        if rows.is_empty() {
            rows.push(String::new());
        }
        if message.is_animating() {
            if let Some(last) = rows.last_mut() {
                if last.width() >= text_width {
                    rows.push(TYPING_CURSOR.to_string());
                } else {
                    last.push_str(TYPING_CURSOR);
                }
            }
        }

        let inner = rows.iter().map(|r| r.width()).max().unwrap_or(0);
        let bubble = inner + 2;
        let indent = match message.sender {
            Sender::User => usize::from(width).saturating_sub(bubble),
            Sender::Bot => 0,
        };
        let indent = u16::try_from(indent).unwrap_or(0);

        for row in rows {
            let pad = inner - row.width();
            lines.push(BubbleLine {
                indent,
                text: format!(" {row}{} ", " ".repeat(pad)),
                sender: Some(message.sender),
            });
        }
    }
    lines
}

/// The conversation as chat bubbles
pub struct Transcript<'a> {
    messages: &'a [ChatMessage],
}

impl<'a> Transcript<'a> {
    /// Transcript over a store snapshot
    #[must_use]
    pub fn new(messages: &'a [ChatMessage]) -> Self {
        Self { messages }
    }
}

impl StatefulWidget for Transcript<'_> {
    type State = TranscriptState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let lines = layout_lines(self.messages, area.width);
        let height = usize::from(area.height);

        state.total_lines = lines.len();
        state.viewport = height;
        state.scroll_offset = state.scroll_offset.min(state.max_scroll());

        let skip = lines.len().saturating_sub(height + state.scroll_offset);
        for (row, line) in lines.iter().skip(skip).take(height).enumerate() {
            let Some(sender) = line.sender else { continue };
            let style = match sender {
                Sender::User => theme::user_bubble(),
                Sender::Bot => theme::bot_bubble(),
            };
            let y = area.y + u16::try_from(row).unwrap_or(u16::MAX);
            buf.set_stringn(
                area.x + line.indent,
                y,
                &line.text,
                usize::from(area.width.saturating_sub(line.indent)),
                style,
            );
        }
    }
}
