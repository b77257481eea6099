//! Plain-text transcript rendering.
//!
//! One line per top-level message:
//!
//! ```text
//! 2014-01-01 12:00:00 Ivan Petrov: hello
//!     >2013-12-30 09:00:00 Anna Orlova: forwarded thing [photo: http://...]
//! ```
//!
//! Forwarded messages become indented, `>`-prefixed continuation lines of
//! their parent; attachments become a bracketed, comma-joined list of
//! short summaries.

use crate::attachment::{normalize_all, Attachment};
use crate::error::{Result, VkpackError};
use crate::message::{Message, Participants, RawAttachment};

use super::format_ts;

/// Caller-supplied display options for [`transcript`].
#[derive(Debug, Clone, Copy)]
pub struct TranscriptOptions<'a> {
    /// Display name for outgoing messages; participant lookup when absent.
    pub user_name: Option<&'a str>,

    /// Display name for incoming messages; participant lookup when absent.
    pub peer_name: Option<&'a str>,

    /// Omit the leading timestamp when `false`.
    pub with_date: bool,
}

impl<'a> TranscriptOptions<'a> {
    /// Default options: no fixed names, timestamps on.
    pub fn new() -> Self {
        Self {
            user_name: None,
            peer_name: None,
            with_date: true,
        }
    }

    #[must_use]
    pub fn with_user_name(mut self, name: &'a str) -> Self {
        self.user_name = Some(name);
        self
    }

    #[must_use]
    pub fn with_peer_name(mut self, name: &'a str) -> Self {
        self.peer_name = Some(name);
        self
    }

    #[must_use]
    pub fn with_date(mut self, enabled: bool) -> Self {
        self.with_date = enabled;
        self
    }
}

impl Default for TranscriptOptions<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders a conversation as dialogue lines, one per top-level message.
pub fn transcript(
    msgs: &[Message],
    participants: &Participants,
    options: &TranscriptOptions<'_>,
) -> Result<Vec<String>> {
    msgs.iter()
        .map(|msg| {
            let speaker = top_speaker(msg, participants, options)?;
            render_message(msg, participants, &speaker, options.with_date)
        })
        .collect()
}

/// Comma-joined short descriptions of a message's attachments.
///
/// The input list must be non-empty; calling this for a message without
/// attachments is a programming error, not a runtime condition.
pub fn attachment_summaries(attachments: &[RawAttachment]) -> String {
    assert!(
        !attachments.is_empty(),
        "attachment summary requested for an empty list"
    );
    join_summaries(&normalize_all(attachments))
}

fn render_message(
    msg: &Message,
    participants: &Participants,
    speaker: &str,
    with_date: bool,
) -> Result<String> {
    let mut line = String::new();
    if with_date {
        line.push_str(&format_ts(msg.date));
        line.push(' ');
    }
    line.push_str(speaker);
    line.push_str(": ");
    line.push_str(&msg.body);

    for fwd in msg.forwarded() {
        let fwd_speaker = forwarded_speaker(fwd, participants)?;
        line.push_str("\n    >");
        line.push_str(&render_message(fwd, participants, &fwd_speaker, with_date)?);
    }

    if !msg.attachments().is_empty() {
        line.push_str(" [");
        line.push_str(&attachment_summaries(msg.attachments()));
        line.push(']');
    }

    Ok(line)
}

fn top_speaker(
    msg: &Message,
    participants: &Participants,
    options: &TranscriptOptions<'_>,
) -> Result<String> {
    let named = if msg.is_outgoing() {
        options.user_name
    } else {
        options.peer_name
    };
    match named {
        Some(name) => Ok(name.to_string()),
        None => sender_name(msg, msg.from_id, participants),
    }
}

fn forwarded_speaker(msg: &Message, participants: &Participants) -> Result<String> {
    if msg.is_outgoing() {
        Ok("out".to_string())
    } else {
        sender_name(msg, msg.uid, participants)
    }
}

fn sender_name(msg: &Message, id: Option<i64>, participants: &Participants) -> Result<String> {
    match id {
        Some(id) => participants.full_name(id),
        None => Err(VkpackError::unexpected(
            "messages.getHistory",
            format!("message {:?} carries no sender id", msg.mid),
        )),
    }
}

fn join_summaries(attachments: &[Attachment]) -> String {
    attachments
        .iter()
        .map(summary)
        .collect::<Vec<_>>()
        .join(", ")
}

fn summary(attachment: &Attachment) -> String {
    match attachment {
        Attachment::Photo(photo) => format!("photo: {}", text_or_empty(&photo.biggest)),
        Attachment::Audio(audio) => format!(
            "audio: {} - {}",
            text_or_empty(&audio.artist),
            text_or_empty(&audio.title)
        ),
        Attachment::Sticker(sticker) => {
            format!("sticker: {}", sticker.preview().unwrap_or_default())
        }
        Attachment::Doc(doc) => format!(
            "doc: {} {}",
            text_or_empty(&doc.title),
            text_or_empty(&doc.url)
        ),
        Attachment::Video(video) => format!("video: {}", text_or_empty(&video.title)),
        Attachment::Link(link) => format!(
            "link: {}({})",
            text_or_empty(&link.title),
            text_or_empty(&link.url)
        ),
        Attachment::Wall(wall) => {
            let text = text_or_empty(&wall.text);
            if wall.attachments.is_empty() {
                format!("wall: {text}")
            } else {
                format!("wall: {text} [{}]", join_summaries(&wall.attachments))
            }
        }
    }
}

fn text_or_empty(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}
