//! Theme and Colors
//!
//! The 26ideas palette: a deep navy header, a bright brand blue for the
//! user's bubbles and soft grays for the assistant.

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// Brand Palette
// ============================================================================

/// Header background
pub const BRAND_NAVY: Color = Color::Rgb(15, 23, 42);

/// Primary accent (user bubbles, links)
pub const BRAND_BLUE: Color = Color::Rgb(37, 99, 235);

/// Lighter accent for the subtitle
pub const BRAND_SKY: Color = Color::Rgb(147, 197, 253);

// ============================================================================
// UI Colors
// ============================================================================

/// Assistant bubble background
pub const BOT_BUBBLE: Color = Color::Rgb(241, 245, 249);

/// Assistant bubble text
pub const BOT_TEXT: Color = Color::Rgb(30, 41, 59);

/// User bubble text
pub const USER_TEXT: Color = Color::White;

/// System/dim text
pub const DIM_GRAY: Color = Color::Rgb(100, 116, 139);

/// Error red (destructive toasts)
pub const ERROR_RED: Color = Color::Rgb(220, 38, 38);

/// Success green (informational toasts)
pub const SUCCESS_GREEN: Color = Color::Rgb(22, 163, 74);

/// Page outline in the document viewer
pub const PAGE_WHITE: Color = Color::Rgb(248, 250, 252);

// ============================================================================
// Styles
// ============================================================================

/// Header title
#[must_use]
pub fn title_style() -> Style {
    Style::default()
        .fg(Color::White)
        .bg(BRAND_NAVY)
        .add_modifier(Modifier::BOLD)
}

/// User message bubble
#[must_use]
pub fn user_bubble() -> Style {
    Style::default().fg(USER_TEXT).bg(BRAND_BLUE)
}

/// Assistant message bubble
#[must_use]
pub fn bot_bubble() -> Style {
    Style::default().fg(BOT_TEXT).bg(BOT_BUBBLE)
}

/// Input placeholder and disabled controls
#[must_use]
pub fn dim() -> Style {
    Style::default().fg(DIM_GRAY)
}
