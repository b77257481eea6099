//! Structured dialogue records for the HTML template.
//!
//! [`dialogue`] flattens a message list into [`DialogueEntry`] values —
//! formatted date, cleaned body, resolved speaker, normalized attachments
//! and recursive forwards. It never generates markup itself; that is
//! [`super::template`]'s job.

use serde::Serialize;

use crate::attachment::{normalize_all, Attachment};
use crate::error::{Result, VkpackError};
use crate::message::{Message, Participants};

use super::format_ts;

/// One rendered message, ready for templating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DialogueEntry {
    /// `YYYY-MM-DD HH:MM:SS` in UTC.
    pub date: String,

    /// Body text with literal `<br>` markup converted to newlines.
    pub body: String,

    /// Forwarded sub-entries; `None` when the message forwards nothing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forwarded: Option<Vec<DialogueEntry>>,

    /// Normalized attachments; `None` when the message carries none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Attachment>>,

    /// Resolved speaker display name (`"out"` for outgoing forwards).
    pub user: String,

    /// Direction flag.
    pub is_out: bool,
}

/// Renders a conversation into template-ready records, one per top-level
/// message.
pub fn dialogue(msgs: &[Message], participants: &Participants) -> Result<Vec<DialogueEntry>> {
    msgs.iter()
        .map(|msg| {
            let user = sender_name(msg, msg.from_id, participants)?;
            entry(msg, participants, user)
        })
        .collect()
}

fn entry(msg: &Message, participants: &Participants, user: String) -> Result<DialogueEntry> {
    let forwarded = match msg.forwarded() {
        [] => None,
        fwd => Some(
            fwd.iter()
                .map(|inner| {
                    let user = if inner.is_outgoing() {
                        "out".to_string()
                    } else {
                        sender_name(inner, inner.uid, participants)?
                    };
                    entry(inner, participants, user)
                })
                .collect::<Result<Vec<_>>>()?,
        ),
    };

    let attachments = match msg.attachments() {
        [] => None,
        raw => Some(normalize_all(raw)),
    };

    Ok(DialogueEntry {
        date: format_ts(msg.date),
        body: msg.body.replace("<br>", "\n"),
        forwarded,
        attachments,
        user,
        is_out: msg.is_outgoing(),
    })
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
