//! Conversation renderers.
//!
//! Two sibling transforms over a fetched message list, both built on the
//! attachment normalizer:
//!
//! - [`text`] — plain-text transcript, one line per top-level message
//! - [`html`] — structured dialogue records for the HTML template
//! - [`template`] — the HTML document writer consuming those records
//!
//! Renderers never mutate the source messages; they derive new immutable
//! structures. A message lacking attachments or forwards omits those
//! fields entirely — absent and empty are treated as equivalent.

pub mod html;
pub mod template;
pub mod text;

use chrono::DateTime;

/// Formats a unix timestamp as `YYYY-MM-DD HH:MM:SS` (UTC).
///
/// Out-of-range timestamps fall back to the raw number rather than
/// panicking; the feed has been known to carry garbage dates.
pub(crate) fn format_ts(ts: i64) -> String {
    DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| ts.to_string())
}
