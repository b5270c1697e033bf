//! faqchat TUI - Terminal surface for the 26ideas FAQ Assistant
//!
//! This crate renders a [`faqchat_core::ChatWidget`] in a full-screen
//! terminal UI.
//!
//! # Architecture
//!
//! - **App**: Event loop translating key presses into widget calls
//! - **Display**: View mode, toasts and the last reported state
//! - **View**: Pure rendering of one frame from a `ViewModel`
//! - **Widgets**: Chat bubble transcript and the typing indicator

pub mod app;
pub mod display;
pub mod theme;
pub mod view;
pub mod widgets;

pub use app::App;
pub use display::{DisplayState, ViewMode};
