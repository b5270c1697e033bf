//! Rendering
//!
//! `render` draws one frame from a [`ViewModel`]. It reads nothing else, so
//! the same model always produces the same screen; only the transcript's
//! scroll bookkeeping is written back.
//!
//! ```text
//! ┌────────────────────────────────────────┐
//! │ 26ideas FAQ Assistant                  │ header
//! │ Ask me anything about our services     │
//! │ https://26ideas.com                    │
//! ├────────────────────────────────────────┤
//! │ ▒ Hi! How can I help? ▒                │ transcript / document
//! │                         ▒ services? ▒  │
//! │ ● • •                                  │ typing indicator
//! │ ┌ Message ───────────────────────────┐ │ input
//! │ └────────────────────────────────────┘ │
//! │  Ready | Enter send | ...              │ status
//! └────────────────────────────────────────┘
//! ```

use chrono::Local;
use faqchat_core::config::Branding;
use faqchat_core::{ChatMessage, ConversationState, DocumentHandle};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use unicode_width::UnicodeWidthChar;

use crate::display::{DisplayNotification, DisplayState};
use crate::theme;
use crate::widgets::{Transcript, TranscriptState, TypingIndicator};

/// Shown in the empty input line
pub const PLACEHOLDER: &str = "Type your message...";

/// Everything a frame depends on
pub struct ViewModel<'a> {
    /// Header text
    pub branding: &'a Branding,
    /// Store snapshot
    pub messages: &'a [ChatMessage],
    /// Conversation state
    pub state: ConversationState,
    /// Current input buffer
    pub input: &'a str,
    /// Surface-side state (view mode, toast, document)
    pub display: &'a DisplayState,
    /// Frame counter for the typing indicator
    pub frame: u64,
}

/// Draw one frame
pub fn render(frame: &mut Frame, model: &ViewModel, transcript: &mut TranscriptState) {
    let [header, body, indicator, input, status] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    render_header(frame, header, model.branding);

    match model.display.document.as_ref() {
        Some(document) if model.display.showing_document() => {
            render_document(frame, body, document, model.display.generating);
        }
        _ => {
            frame.render_stateful_widget(Transcript::new(model.messages), body, transcript);
        }
    }

    if !model.state.accepts_input() {
        frame.render_widget(TypingIndicator::new(model.frame), indicator);
    }

    render_input(frame, input, model.input, model.state);
    render_status(frame, status, model, transcript);

    if let Some(notification) = &model.display.notification {
        render_toast(frame, body, notification);
    }
}

fn render_header(frame: &mut Frame, area: Rect, branding: &Branding) {
    let lines = vec![
        Line::from(Span::styled(format!(" {}", branding.title), theme::title_style())),
        Line::from(Span::styled(
            format!(" {}", branding.subtitle),
            Style::default().fg(theme::BRAND_SKY),
        )),
        Line::from(Span::styled(
            format!(" {}", branding.homepage),
            Style::default()
                .fg(theme::BRAND_SKY)
                .add_modifier(Modifier::UNDERLINED),
        )),
    ];
    let header = Paragraph::new(lines).style(Style::default().bg(theme::BRAND_NAVY));
    frame.render_widget(header, area);
}

/// Tail of `text` that fits in `width` columns
fn visible_tail(text: &str, width: usize) -> &str {
    let mut used = 0;
    let mut start = text.len();
    for (index, ch) in text.char_indices().rev() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        start = index;
    }
    &text[start..]
}

fn render_input(frame: &mut Frame, area: Rect, input: &str, state: ConversationState) {
    let enabled = state.accepts_input();
    let border = if enabled {
        Style::default().fg(theme::BRAND_BLUE)
    } else {
        theme::dim()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(" Message ");

    let width = usize::from(area.width.saturating_sub(3));
    let line = if input.is_empty() {
        Line::from(Span::styled(PLACEHOLDER, theme::dim()))
    } else {
        let style = if enabled { Style::default() } else { theme::dim() };
        let mut spans = vec![Span::styled(visible_tail(input, width), style)];
        if enabled {
            spans.push(Span::styled("_", Style::default().fg(theme::BRAND_BLUE)));
        }
        Line::from(spans)
    };

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_status(frame: &mut Frame, area: Rect, model: &ViewModel, transcript: &TranscriptState) {
    let mut status = format!(" {} | Enter send | Ctrl+G document", model.state.description());
    if model.display.document.is_some() {
        status.push_str(" | Ctrl+S save | Tab view");
    }
    status.push_str(" | PgUp/PgDn scroll | Esc to quit");
    if model.display.generating {
        status.push_str(" | Generating document...");
    }
    if transcript.scroll_offset > 0 && !model.display.showing_document() {
        status.push_str(&format!(" | [+{}]", transcript.scroll_offset));
    }
    frame.render_widget(Paragraph::new(status).style(theme::dim()), area);
}

/// Page outline size for a body `area`, keeping roughly the Letter aspect
/// ratio with cells twice as tall as they are wide
fn page_rect(area: Rect) -> Rect {
    let height = area.height.saturating_sub(4).max(3);
    let width = (u32::from(height) * 2 * 612 / 792)
        .min(u32::from(area.width.saturating_sub(2)));
    let width = u16::try_from(width).unwrap_or(area.width).max(3);
    let x = area.x + area.width.saturating_sub(width) / 2;
    Rect::new(x, area.y, width.min(area.width), height.min(area.height))
}

fn render_document(frame: &mut Frame, area: Rect, document: &DocumentHandle, generating: bool) {
    let page = page_rect(area);
    let outline = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BRAND_BLUE))
        .title(format!(" {} ", document.page_size.name()))
        .style(Style::default().bg(theme::PAGE_WHITE).fg(theme::DIM_GRAY));
    let blank = Paragraph::new("(blank page)")
        .centered()
        .block(outline);
    frame.render_widget(blank, page);

    let pages = if document.page_count == 1 { "page" } else { "pages" };
    let mut info = vec![
        Line::from(vec![
            Span::styled(
                document.filename.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                "  {} bytes  {} {pages}",
                document.len(),
                document.page_count
            )),
        ]),
        Line::from(format!(
            "Created {}",
            document
                .created_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
        )),
        Line::from(Span::styled(
            "Ctrl+S to download | Tab to return to chat",
            theme::dim(),
        )),
    ];
    if generating {
        info.push(Line::from(Span::styled(
            "Generating a new document...",
            Style::default().fg(theme::BRAND_BLUE),
        )));
    }

    let info_area = Rect::new(
        area.x,
        page.y + page.height,
        area.width,
        area.height.saturating_sub(page.height),
    );
    frame.render_widget(Paragraph::new(info).centered(), info_area);
}

fn render_toast(frame: &mut Frame, area: Rect, notification: &DisplayNotification) {
    let width = area.width.saturating_sub(2).min(44);
    if width < 10 || area.height < 4 {
        return;
    }
    let toast = Rect::new(area.x + area.width - width - 1, area.y, width, 4);

    let color = if notification.is_error() {
        theme::ERROR_RED
    } else {
        theme::SUCCESS_GREEN
    };
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));
    if let Some(title) = &notification.title {
        block = block.title(Span::styled(
            format!(" {title} "),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
    }

    frame.render_widget(Clear, toast);
    frame.render_widget(
        Paragraph::new(notification.message.as_str())
            .wrap(Wrap { trim: true })
            .block(block),
        toast,
    );
}
