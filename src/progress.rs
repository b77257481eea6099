//! Progress reporting for long-running operations.
//!
//! Fetching a multi-year conversation or downloading its media takes
//! minutes, so the fetcher and the archive writer push [`Progress`] updates
//! through a caller-supplied callback. The CLI installs a stderr printer;
//! library users pass [`no_progress`] when they don't care.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use vkpack::progress::{Progress, ProgressCallback};
//!
//! let callback: ProgressCallback = Arc::new(|progress| {
//!     if let Some(pct) = progress.percentage() {
//!         eprintln!("{:.1}%", pct);
//!     }
//! });
//!
//! callback(Progress::items(150, Some(600)));
//! ```

use std::sync::Arc;

/// A progress snapshot for a fetch or download step.
///
/// Counts either items (messages, files) or bytes within one file;
/// whichever dimension is unused stays zero/`None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Progress {
    /// Items (messages or files) processed so far.
    pub items_processed: usize,

    /// Total items, if known up front.
    pub total_items: Option<usize>,

    /// Bytes written so far (downloads only).
    pub bytes_processed: u64,

    /// Total bytes, if the server sent a length.
    pub total_bytes: Option<u64>,
}

impl Progress {
    /// A snapshot counting items.
    pub fn items(processed: usize, total: Option<usize>) -> Self {
        Self {
            items_processed: processed,
            total_items: total,
            ..Self::default()
        }
    }

    /// A snapshot counting bytes within one download.
    pub fn bytes(processed: u64, total: Option<u64>) -> Self {
        Self {
            bytes_processed: processed,
            total_bytes: total,
            ..Self::default()
        }
    }

    /// Item progress as a percentage (0.0 - 100.0), if the total is known.
    pub fn percentage(&self) -> Option<f64> {
        self.total_items.map(|total| {
            if total == 0 {
                100.0
            } else {
                (self.items_processed as f64 / total as f64) * 100.0
            }
        })
    }

    /// Byte progress as a percentage (0.0 - 100.0), if the total is known.
    pub fn bytes_percentage(&self) -> Option<f64> {
        self.total_bytes.map(|total| {
            if total == 0 {
                100.0
            } else {
                (self.bytes_processed as f64 / total as f64) * 100.0
            }
        })
    }
}

/// Callback type for receiving progress updates.
pub type ProgressCallback = Arc<dyn Fn(Progress) + Send + Sync>;

/// Creates a no-op progress callback.
pub fn no_progress() -> ProgressCallback {
    Arc::new(|_| {})
}

/// Creates a progress callback that prints item counts to stderr.
pub fn stderr_progress(label: &'static str) -> ProgressCallback {
    Arc::new(move |progress| match progress.total_items {
        Some(total) => eprintln!("{}: {}/{}", label, progress.items_processed, total),
        None => eprintln!("{}: {}", label, progress.items_processed),
    })
}
