//! Typing Indicator
//!
//! Three dots in an assistant bubble; the raised dot moves left to right
//! once per frame step, which reads as a bounce at the render rate.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::widgets::Widget;

use crate::theme;

/// Number of dots
pub const DOTS: usize = 3;

/// Three bouncing dots
#[derive(Debug, Clone, Copy)]
pub struct TypingIndicator {
    frame: u64,
}

impl TypingIndicator {
    /// Indicator at animation `frame`
    #[must_use]
    pub fn new(frame: u64) -> Self {
        Self { frame }
    }

    /// Which dot is raised
    #[must_use]
    pub fn raised(&self) -> usize {
        usize::try_from(self.frame % DOTS as u64).unwrap_or(0)
    }
}

impl Widget for TypingIndicator {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 7 || area.height == 0 {
            return;
        }
        let bubble = theme::bot_bubble();
        buf.set_string(area.x, area.y, " ", bubble);
        for dot in 0..DOTS {
            let x = area.x + 1 + u16::try_from(dot * 2).unwrap_or(0);
            let (symbol, style) = if dot == self.raised() {
                (
                    "●",
                    bubble.fg(theme::BRAND_BLUE).add_modifier(Modifier::BOLD),
                )
            } else {
                ("•", bubble.fg(theme::DIM_GRAY))
            };
            buf.set_string(x, area.y, symbol, style);
            buf.set_string(x + 1, area.y, " ", bubble);
        }
    }
}
