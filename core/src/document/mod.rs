//! Document Generator
//!
//! Produces the mock "conversation" document behind the generate control.
//!
//! # Sequence
//!
//! ```text
//! try_start()  ── claims the busy flag (second trigger → Busy)
//!     │
//!     ▼
//! probe()      ── failure short-circuits everything below
//!     │
//!     ▼
//! sleep(delay) ── fixed, measured from the probe's return
//!     │
//!     ▼
//! blank PDF    ── DocumentHandle (busy flag released on drop)
//! ```
//!
//! The resulting [`DocumentHandle`] is held in a [`DocumentSlot`]; publishing
//! a new one releases the previous handle.

pub mod pdf;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use thiserror::Error;

use crate::backend::{FetchError, ProbeBackend};
use crate::busy::{BusyFlag, BusyGuard};
pub use pdf::PageSize;

/// Default delay between the probe returning and the document appearing
pub const DEFAULT_DOCUMENT_DELAY: Duration = Duration::from_millis(5000);

/// Default file name offered for download
pub const DEFAULT_FILENAME: &str = "conversation.pdf";

/// Document identifier, increasing per generator
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(pub u64);

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "doc_{}", self.0)
    }
}

/// Errors on the document path
#[derive(Debug, Error)]
pub enum DocumentError {
    /// A generation is already pending
    #[error("a document is already being generated")]
    Busy,

    /// The probe request failed
    #[error("probe failed: {0}")]
    Probe(#[from] FetchError),

    /// Download requested before any document exists
    #[error("no document has been generated yet")]
    NoDocument,

    /// Writing the document to disk failed
    #[error("failed to write {path}: {source}")]
    Io {
        /// Target path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

/// A generated document
///
/// Cloning shares the bytes.
#[derive(Clone, Debug)]
pub struct DocumentHandle {
    /// Identifier
    pub id: DocumentId,
    /// File name used for download
    pub filename: String,
    /// PDF bytes
    pub bytes: Arc<[u8]>,
    /// Number of pages
    pub page_count: usize,
    /// Page dimensions
    pub page_size: PageSize,
    /// When the document was synthesized
    pub created_at: DateTime<Utc>,
}

impl DocumentHandle {
    /// Size in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the document has no bytes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Write the document into `dir` under its file name
    pub async fn save_to(&self, dir: &Path) -> Result<PathBuf, DocumentError> {
        let path = dir.join(&self.filename);
        tokio::fs::write(&path, &self.bytes[..])
            .await
            .map_err(|source| DocumentError::Io {
                path: path.clone(),
                source,
            })?;
        tracing::info!(id = %self.id, path = %path.display(), "Saved document");
        Ok(path)
    }
}

/// Holder of the current document
#[derive(Clone, Debug, Default)]
pub struct DocumentSlot {
    current: Arc<Mutex<Option<DocumentHandle>>>,
}

impl DocumentSlot {
    /// Create an empty slot
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `handle` current, returning the id of the released predecessor
    pub fn publish(&self, handle: DocumentHandle) -> Option<DocumentId> {
        let id = handle.id;
        let released = self.current.lock().replace(handle).map(|old| old.id);
        if let Some(old) = released {
            tracing::debug!(%old, new = %id, "Released superseded document");
        }
        released
    }

    /// The current document
    #[must_use]
    pub fn current(&self) -> Option<DocumentHandle> {
        self.current.lock().clone()
    }

    /// Release the current document
    pub fn clear(&self) -> Option<DocumentId> {
        self.current.lock().take().map(|old| old.id)
    }
}

/// Settings for a [`DocumentGenerator`]
#[derive(Clone, Debug)]
pub struct GeneratorSettings {
    /// Delay after the probe returns
    pub delay: Duration,
    /// Download file name
    pub filename: String,
    /// Page dimensions
    pub page_size: PageSize,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DOCUMENT_DELAY,
            filename: DEFAULT_FILENAME.to_string(),
            page_size: PageSize::default(),
        }
    }
}

/// Single-flight document generator
pub struct DocumentGenerator<P: ProbeBackend> {
    probe: Arc<P>,
    busy: BusyFlag,
    settings: GeneratorSettings,
    next_id: Arc<AtomicU64>,
}

impl<P: ProbeBackend> Clone for DocumentGenerator<P> {
    fn clone(&self) -> Self {
        Self {
            probe: Arc::clone(&self.probe),
            busy: self.busy.clone(),
            settings: self.settings.clone(),
            next_id: Arc::clone(&self.next_id),
        }
    }
}

impl<P: ProbeBackend> DocumentGenerator<P> {
    /// Create a generator over a shared probe backend
    pub fn new(probe: Arc<P>, settings: GeneratorSettings) -> Self {
        Self {
            probe,
            busy: BusyFlag::new(),
            settings,
            next_id: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Whether a generation is pending
    pub fn is_generating(&self) -> bool {
        self.busy.is_busy()
    }

    /// Claim the generator
    ///
    /// Fails with [`DocumentError::Busy`] while another generation is pending.
    pub fn try_start(&self) -> Result<PendingDocument<P>, DocumentError> {
        let guard = self.busy.try_acquire().ok_or_else(|| {
            tracing::warn!("Document generation rejected: already pending");
            DocumentError::Busy
        })?;
        Ok(PendingDocument {
            _guard: guard,
            probe: Arc::clone(&self.probe),
            settings: self.settings.clone(),
            next_id: Arc::clone(&self.next_id),
        })
    }

    /// Claim and run a generation to completion
    pub async fn generate(&self) -> Result<DocumentHandle, DocumentError> {
        self.try_start()?.finish().await
    }
}

/// A claimed generation; the generator stays busy until this is dropped
#[must_use = "the generation is abandoned when dropped"]
pub struct PendingDocument<P: ProbeBackend> {
    _guard: BusyGuard,
    probe: Arc<P>,
    settings: GeneratorSettings,
    next_id: Arc<AtomicU64>,
}

impl<P: ProbeBackend> PendingDocument<P> {
    /// Probe, wait, then synthesize
    pub async fn finish(self) -> Result<DocumentHandle, DocumentError> {
        tracing::info!("Document generation started");

        if let Err(e) = self.probe.probe().await {
            tracing::warn!(error = %e, "Document probe failed");
            return Err(e.into());
        }

        tokio::time::sleep(self.settings.delay).await;

        let id = DocumentId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let bytes = pdf::blank_document(self.settings.page_size);
        let handle = DocumentHandle {
            id,
            filename: self.settings.filename.clone(),
            bytes: Arc::from(bytes),
            page_count: 1,
            page_size: self.settings.page_size,
            created_at: Utc::now(),
        };

        tracing::info!(%id, size = handle.len(), "Document ready");
        Ok(handle)
    }
}
