//! Widget Events
//!
//! Events sent from a surface to the [`ChatWidget`](crate::widget::ChatWidget).
//! Surfaces report what the user did; the widget decides what it means.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Events from a surface to the widget
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WidgetEvent {
    /// The user pressed send
    Submit {
        /// The input text as typed
        content: String,
    },

    /// The user pressed the generate-document control
    GenerateDocument,

    /// The user pressed the download control
    DownloadDocument {
        /// Target directory (configured download directory when `None`)
        directory: Option<PathBuf>,
    },

    /// The user asked to quit
    Quit,
}

impl WidgetEvent {
    /// Short name for logs
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Submit { .. } => "submit",
            Self::GenerateDocument => "generate_document",
            Self::DownloadDocument { .. } => "download_document",
            Self::Quit => "quit",
        }
    }
}
