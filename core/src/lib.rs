//! faqchat Core - Headless Conversation Core for the FAQ Chat Widget
//!
//! This crate provides everything the "26ideas FAQ Assistant" widget does,
//! independent of any UI framework. The terminal surface in `faqchat-tui` is
//! one consumer; the integration tests drive it headless.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Surface (TUI)                         │
//! │        WidgetEvent (up)          WidgetMessage (down)         │
//! │                 store revisions (watch)                       │
//! └───────────────────────────┬──────────────────────────────────┘
//!                             │
//! ┌───────────────────────────┼──────────────────────────────────┐
//! │                      ChatWidget                               │
//! │  ┌──────────────┐  ┌────────────────┐  ┌────────────────────┐ │
//! │  │ MessageStore │◄─┤ TypingAnimator │  │ DocumentGenerator  │ │
//! │  └──────────────┘  └────────────────┘  └─────────┬──────────┘ │
//! │         ▲          ┌────────────────┐            │            │
//! │         └──────────┤  ReplyFetcher  │            │            │
//! │                    └───────┬────────┘            │            │
//! │                            ▼                     ▼            │
//! │                 ChatBackend / ProbeBackend (reqwest)           │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use faqchat_core::{backend::HttpBackend, config::load_config, ChatWidget};
//! use tokio::sync::mpsc;
//!
//! let config = load_config()?;
//! let backend = HttpBackend::from_config(&config)?;
//! let (tx, mut rx) = mpsc::channel(100);
//! let widget = ChatWidget::new(backend, config, tx);
//!
//! let exchange = widget.submit("What services do you offer?")?;
//! exchange.await?;
//! println!("{}", widget.store().last().unwrap().text);
//! ```
//!
//! # Module Overview
//!
//! - [`animator`]: Per-character typing animation
//! - [`backend`]: Chat and probe endpoint traits, HTTP implementation
//! - [`busy`]: Single-flight gating
//! - [`config`]: TOML / environment / CLI configuration
//! - [`document`]: Mock document generation and the PDF writer
//! - [`events`]: Events from surfaces to the widget
//! - [`fetcher`]: Single-flight reply fetching
//! - [`messages`]: Conversation types and widget-to-surface messages
//! - [`store`]: Shared conversation history
//! - [`widget`]: The `ChatWidget` orchestrator
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod animator;
pub mod backend;
pub mod busy;
pub mod config;
pub mod document;
pub mod events;
pub mod fetcher;
pub mod messages;
pub mod store;
pub mod widget;

pub use animator::{AnimationOutcome, TypingAnimator};
pub use backend::{ChatBackend, FetchError, HttpBackend, ProbeBackend};
pub use config::{ConfigError, ConfigOverrides, ConfigSource, WidgetConfig};
pub use document::{DocumentError, DocumentHandle, DocumentId, PageSize};
pub use events::WidgetEvent;
pub use messages::{ChatMessage, ConversationState, MessageId, NotifyLevel, Sender, WidgetMessage};
pub use store::MessageStore;
pub use widget::{ChatWidget, DocumentOutcome, ExchangeOutcome, SubmitRejected};
