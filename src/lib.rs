//! # vkpack
//!
//! A Rust library and CLI for exporting private-message history from the
//! VK API into several output forms: raw structured dump, plain text
//! transcript, media link lists, a browsable HTML page, or a full folder
//! archive with downloaded media.
//!
//! ## Overview
//!
//! The pipeline has four stages:
//!
//! 1. **Fetch** — [`history::History`] pulls the complete conversation in
//!    batched, rate-limited pages through a [`api::Transport`]
//! 2. **Normalize** — [`attachment`] flattens the nested attachment/forward
//!    schema into a closed set of record types
//! 3. **Render** — [`render::text`] and [`render::html`] derive the
//!    transcript or template-ready structures
//! 4. **Write** — [`archive`] lays out the folder structure and streams
//!    media to disk
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vkpack::api::HttpTransport;
//! use vkpack::history::{History, Peer};
//! use vkpack::progress::no_progress;
//! use vkpack::render::text::{transcript, TranscriptOptions};
//!
//! fn main() -> vkpack::Result<()> {
//!     let history = History::new(HttpTransport::new("my-token"));
//!     let messages = history.fetch_all(&Peer::user("durov"), &no_progress())?;
//!     let participants = history.participants(&messages)?;
//!
//!     for line in transcript(&messages, &participants, &TranscriptOptions::new())? {
//!         println!("{line}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`api`] — [`Transport`](api::Transport) seam + the blocking HTTP client
//! - [`history`] — paginated history fetcher and participant resolution
//! - [`message`] — raw wire types ([`Message`], [`message::Participants`])
//! - [`attachment`] — the normalizer and its canonical records
//! - [`render`] — text transcript, HTML-data records, HTML template
//! - [`archive`] — folder archive writer with idempotent downloads
//! - [`download`] — [`Downloader`](download::Downloader) seam for media
//! - [`throttle`] — injectable fixed-delay rate limiter
//! - [`progress`] — callback-based progress reporting
//! - [`config`] — endpoint and pagination settings
//! - [`error`] — unified error types ([`VkpackError`], [`Result`])
//! - [`cli`] — clap argument types (feature `cli`)

pub mod api;
pub mod archive;
pub mod attachment;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod history;
pub mod message;
pub mod progress;
pub mod render;
pub mod throttle;

// Re-export the main types at the crate root for convenience
pub use error::{Result, VkpackError};
pub use message::Message;

/// Convenient re-exports for common usage.
///
/// Import everything you need with a single line:
///
/// ```rust
/// use vkpack::prelude::*;
/// ```
pub mod prelude {
    // Core message type
    pub use crate::Message;

    // Error types
    pub use crate::error::{Result, VkpackError};

    // Wire + participant types
    pub use crate::message::{Participants, User};

    // Normalized attachments
    pub use crate::attachment::{audio_links, normalize, normalize_all, photo_links, Attachment};

    // Fetching
    pub use crate::api::{HttpTransport, Transport};
    pub use crate::history::{History, Peer};
    pub use crate::throttle::Throttle;

    // Rendering
    pub use crate::render::html::{dialogue, DialogueEntry};
    pub use crate::render::text::{transcript, TranscriptOptions};

    // Archiving
    pub use crate::archive::{make, ArchiveStats};
    pub use crate::download::{Downloader, HttpDownloader};

    // Progress
    pub use crate::progress::{no_progress, Progress, ProgressCallback};
}
