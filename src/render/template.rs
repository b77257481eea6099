//! Self-contained HTML document generation.
//!
//! Takes the structured records from [`super::html`] and writes
//! `<peer_id>.html`: a standalone page with the transcript, inline
//! attachment previews, and link lists for downloaded media. All dynamic
//! text goes through [`escape`].

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::attachment::{Attachment, Audio, Photo};
use crate::error::Result;
use crate::message::{Message, Participants};

use super::html::{dialogue, DialogueEntry};

const STYLE: &str = "\
body { font-family: sans-serif; max-width: 48em; margin: 0 auto; padding: 1em; background: #f5f5f5; }
h1, h2 { color: #45688e; }
.message { background: #fff; border-radius: 6px; padding: .5em .8em; margin: .4em 0; }
.message.out { background: #e7f0f8; }
.meta { font-size: .8em; color: #777; }
.meta .user { font-weight: bold; color: #45688e; margin-right: .6em; }
.body { white-space: pre-wrap; }
.forwarded { border-left: 3px solid #c5d0db; margin: .4em 0 0 .6em; padding-left: .6em; }
.attachment { margin: .3em 0; }
img.photo { max-width: 100%; border-radius: 4px; }
img.sticker { max-width: 128px; }
blockquote.wall { border-left: 3px solid #45688e; margin: .3em 0; padding-left: .6em; color: #444; }
.restricted { color: #999; font-style: italic; }
ul.media { list-style: none; padding: 0; }
";

/// Renders the conversation to `<dir>/<peer_id>.html` and returns the
/// written path.
pub fn render(
    dir: &Path,
    peer_id: &str,
    msgs: &[Message],
    participants: &Participants,
    audios: &[Audio],
    photos: &[Photo],
) -> Result<PathBuf> {
    let entries = dialogue(msgs, participants)?;
    let html = document(peer_id, &entries, participants, audios, photos);

    let path = dir.join(format!("{peer_id}.html"));
    fs::write(&path, html)?;
    debug!(path = %path.display(), "wrote HTML transcript");
    Ok(path)
}

/// Builds the complete document as a string.
pub fn document(
    peer_id: &str,
    entries: &[DialogueEntry],
    participants: &Participants,
    audios: &[Audio],
    photos: &[Photo],
) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Conversation {peer}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <h1>Conversation {peer}</h1>\n",
        peer = escape(peer_id)
    );

    let mut names: Vec<String> = participants.iter().map(|user| user.full_name()).collect();
    names.sort();
    if !names.is_empty() {
        let _ = write!(
            out,
            "<p class=\"participants\">Participants: {}</p>\n",
            escape(&names.join(", "))
        );
    }

    for entry in entries {
        push_entry(&mut out, entry);
    }

    push_media_sections(&mut out, audios, photos);

    out.push_str("</body>\n</html>\n");
    out
}

fn push_entry(out: &mut String, entry: &DialogueEntry) {
    let mut classes = String::from("message");
    if entry.is_out {
        classes.push_str(" out");
    }

    let _ = write!(
        out,
        "<div class=\"{classes}\">\n<div class=\"meta\"><span class=\"user\">{user}</span>\
         <span class=\"date\">{date}</span></div>\n",
        user = escape(&entry.user),
        date = escape(&entry.date),
    );

    if !entry.body.is_empty() {
        let _ = write!(out, "<div class=\"body\">{}</div>\n", escape(&entry.body));
    }

    for attachment in entry.attachments.as_deref().unwrap_or_default() {
        push_attachment(out, attachment);
    }

    if let Some(forwarded) = &entry.forwarded {
        out.push_str("<div class=\"forwarded\">\n");
        for inner in forwarded {
            push_entry(out, inner);
        }
        out.push_str("</div>\n");
    }

    out.push_str("</div>\n");
}

fn push_attachment(out: &mut String, attachment: &Attachment) {
    out.push_str("<div class=\"attachment\">");
    match attachment {
        Attachment::Photo(photo) => {
            if let Some(url) = &photo.biggest {
                let _ = write!(
                    out,
                    "<a href=\"{url}\"><img class=\"photo\" src=\"{url}\" alt=\"photo\"></a>",
                    url = escape(url)
                );
            }
        }
        Attachment::Audio(audio) => {
            let label = format!(
                "{} - {}",
                audio.artist.as_deref().unwrap_or_default(),
                audio.title.as_deref().unwrap_or_default()
            );
            match &audio.url {
                Some(url) => {
                    let _ = write!(
                        out,
                        "{}<br><audio controls src=\"{}\"></audio>",
                        escape(&label),
                        escape(url)
                    );
                }
                None => {
                    let _ = write!(
                        out,
                        "<span class=\"restricted\">{} (unavailable)</span>",
                        escape(&label)
                    );
                }
            }
        }
        Attachment::Sticker(sticker) => {
            if let Some(url) = sticker.preview() {
                let _ = write!(
                    out,
                    "<img class=\"sticker\" src=\"{}\" alt=\"sticker\">",
                    escape(url)
                );
            }
        }
        Attachment::Doc(doc) => {
            let title = doc.title.as_deref().unwrap_or("document");
            match &doc.url {
                Some(url) => {
                    let _ = write!(
                        out,
                        "doc: <a href=\"{}\">{}</a>",
                        escape(url),
                        escape(title)
                    );
                }
                None => {
                    let _ = write!(out, "doc: {}", escape(title));
                }
            }
        }
        Attachment::Video(video) => {
            let _ = write!(
                out,
                "video: {}",
                escape(video.title.as_deref().unwrap_or_default())
            );
            if let Some(image) = &video.image {
                let _ = write!(out, "<br><img class=\"photo\" src=\"{}\" alt=\"video\">", escape(image));
            }
        }
        Attachment::Link(link) => {
            let title = link.title.as_deref().unwrap_or_default();
            match &link.url {
                Some(url) => {
                    let _ = write!(
                        out,
                        "link: <a href=\"{}\">{}</a>",
                        escape(url),
                        escape(title)
                    );
                }
                None => {
                    let _ = write!(out, "link: {}", escape(title));
                }
            }
        }
        Attachment::Wall(wall) => {
            out.push_str("<blockquote class=\"wall\">");
            let _ = write!(
                out,
                "{}",
                escape(wall.text.as_deref().unwrap_or_default())
            );
            for inner in &wall.attachments {
                push_attachment(out, inner);
            }
            out.push_str("</blockquote>");
        }
    }
    out.push_str("</div>\n");
}

fn push_media_sections(out: &mut String, audios: &[Audio], photos: &[Photo]) {
    if !audios.is_empty() {
        out.push_str("<h2>Audio</h2>\n<ul class=\"media\">\n");
        for audio in audios {
            let label = format!(
                "{} - {}",
                audio.artist.as_deref().unwrap_or_default(),
                audio.title.as_deref().unwrap_or_default()
            );
            match &audio.url {
                Some(url) => {
                    let _ = write!(
                        out,
                        "<li><a href=\"{}\">{}</a></li>\n",
                        escape(url),
                        escape(&label)
                    );
                }
                None => {
                    let _ = write!(
                        out,
                        "<li><span class=\"restricted\">{}</span></li>\n",
                        escape(&label)
                    );
                }
            }
        }
        out.push_str("</ul>\n");
    }

    if !photos.is_empty() {
        out.push_str("<h2>Photos</h2>\n<ul class=\"media\">\n");
        for photo in photos {
            if let Some(url) = &photo.biggest {
                let _ = write!(
                    out,
                    "<li><a href=\"{url}\">{url}</a></li>\n",
                    url = escape(url)
                );
            }
        }
        out.push_str("</ul>\n");
    }
}

/// Escapes text for safe interpolation into HTML.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
