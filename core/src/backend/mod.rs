//! Backend Integration
//!
//! Abstracted access to the chat and probe endpoints through two small
//! traits.
//!
//! # Usage
//!
//! ```ignore
//! use faqchat_core::backend::{ChatBackend, HttpBackend};
//!
//! let backend = HttpBackend::from_config(&config)?;
//! let reply = backend.send_message("What do you do?").await?;
//! ```

mod http;
mod traits;

pub use http::{parse_reply, HttpBackend};
pub use traits::{ChatBackend, FetchError, ProbeBackend};
