//! Attachment normalization.
//!
//! The feed distinguishes attachment kinds with a string tag and a payload
//! object keyed by the same name. This module flattens that into a closed
//! [`Attachment`] sum type with one variant per recognized kind, dispatched
//! by exhaustive `match` — adding or removing a kind is a compile-checked
//! change. Unrecognized kinds are silently dropped, never an error.
//!
//! Everything here is purely functional: no I/O, no failure modes. Wall
//! posts recursively normalize their nested attachments with the same
//! rules.

use serde::Serialize;

use crate::message::{
    Message, RawAttachment, RawAudio, RawDoc, RawLink, RawPhoto, RawSticker, RawVideo, RawWall,
};

/// A normalized attachment: exactly the seven kinds the exporter renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Attachment {
    Photo(Photo),
    Audio(Audio),
    Sticker(Sticker),
    Doc(Doc),
    Video(Video),
    Link(Link),
    Wall(Wall),
}

impl Attachment {
    /// The wire tag this variant corresponds to.
    pub fn kind(&self) -> &'static str {
        match self {
            Attachment::Photo(_) => "photo",
            Attachment::Audio(_) => "audio",
            Attachment::Sticker(_) => "sticker",
            Attachment::Doc(_) => "doc",
            Attachment::Video(_) => "video",
            Attachment::Link(_) => "link",
            Attachment::Wall(_) => "wall",
        }
    }
}

/// Normalized photo: the six resolution URLs plus the derived `biggest`.
///
/// `biggest` is the first non-null URL in priority order
/// xxxbig > xxbig > xbig > big > src > small. It is `None` only when all
/// six are absent; in practice the feed guarantees at least one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Photo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src_small: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src_big: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src_xbig: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src_xxbig: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src_xxxbig: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biggest: Option<String>,
}

impl Photo {
    /// Builds the record from the wire payload, deriving `biggest`.
    pub fn from_raw(raw: &RawPhoto) -> Self {
        let biggest = [
            &raw.src_xxxbig,
            &raw.src_xxbig,
            &raw.src_xbig,
            &raw.src_big,
            &raw.src,
            &raw.src_small,
        ]
        .into_iter()
        .find_map(|url| url.clone());

        Self {
            src: raw.src.clone(),
            src_small: raw.src_small.clone(),
            src_big: raw.src_big.clone(),
            src_xbig: raw.src_xbig.clone(),
            src_xxbig: raw.src_xxbig.clone(),
            src_xxxbig: raw.src_xxxbig.clone(),
            biggest,
        }
    }
}

/// Normalized audio record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Audio {
    /// Artist name; the wire carries it as `artist` or the older
    /// `performer`, checked in that order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// The rights holder blocked playback for this track.
    pub content_restricted: bool,

    /// Stream URL; absent when playback is blocked or the file was removed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Audio {
    pub fn from_raw(raw: &RawAudio) -> Self {
        Self {
            artist: raw.artist.clone().or_else(|| raw.performer.clone()),
            title: raw.title.clone(),
            content_restricted: raw.content_restricted.is_some(),
            url: raw.url.clone(),
        }
    }
}

/// Normalized sticker: preview URLs by pixel size.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Sticker {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_128: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_256: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_352: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_512: Option<String>,
}

impl Sticker {
    pub fn from_raw(raw: &RawSticker) -> Self {
        Self {
            photo_64: raw.photo_64.clone(),
            photo_128: raw.photo_128.clone(),
            photo_256: raw.photo_256.clone(),
            photo_352: raw.photo_352.clone(),
            photo_512: raw.photo_512.clone(),
        }
    }

    /// Preferred preview: 256px, falling back to larger then smaller sizes.
    pub fn preview(&self) -> Option<&str> {
        self.photo_256
            .as_deref()
            .or(self.photo_352.as_deref())
            .or(self.photo_512.as_deref())
            .or(self.photo_128.as_deref())
            .or(self.photo_64.as_deref())
    }
}

/// Normalized document record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Doc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Doc {
    pub fn from_raw(raw: &RawDoc) -> Self {
        Self {
            size: raw.size,
            title: raw.title.clone(),
            ext: raw.ext.clone(),
            url: raw.url.clone(),
        }
    }
}

/// Normalized video record (thumbnail + title only).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Video {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Video {
    pub fn from_raw(raw: &RawVideo) -> Self {
        Self {
            image: raw.image.clone(),
            title: raw.title.clone(),
        }
    }
}

/// Normalized shared link.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Link {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Link {
    pub fn from_raw(raw: &RawLink) -> Self {
        Self {
            title: raw.title.clone(),
            url: raw.url.clone(),
        }
    }
}

/// Normalized wall post: free text plus recursively normalized children.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Wall {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl Wall {
    pub fn from_raw(raw: &RawWall) -> Self {
        Self {
            text: raw.text.clone(),
            attachments: normalize_all(raw.attachments.as_deref().unwrap_or_default()),
        }
    }
}

/// Converts one raw attachment into its canonical record.
///
/// Returns `None` for unrecognized kind tags, and for recognized tags whose
/// payload object is missing — both are dropped, not errors, so the
/// normalizer stays total.
pub fn normalize(raw: &RawAttachment) -> Option<Attachment> {
    match raw.kind.as_str() {
        "photo" => raw.photo.as_ref().map(Photo::from_raw).map(Attachment::Photo),
        "audio" => raw.audio.as_ref().map(Audio::from_raw).map(Attachment::Audio),
        "sticker" => raw
            .sticker
            .as_ref()
            .map(Sticker::from_raw)
            .map(Attachment::Sticker),
        "doc" => raw.doc.as_ref().map(Doc::from_raw).map(Attachment::Doc),
        "video" => raw.video.as_ref().map(Video::from_raw).map(Attachment::Video),
        "link" => raw.link.as_ref().map(Link::from_raw).map(Attachment::Link),
        "wall" => raw.wall.as_ref().map(Wall::from_raw).map(Attachment::Wall),
        _ => None,
    }
}

/// Normalizes a mixed attachment list, preserving input order and dropping
/// unrecognized kinds.
pub fn normalize_all(raws: &[RawAttachment]) -> Vec<Attachment> {
    raws.iter().filter_map(normalize).collect()
}

/// Walks `msgs` and every forwarded sub-message, yielding raw attachments
/// in encounter order.
fn raw_attachments(msgs: &[Message]) -> Vec<&RawAttachment> {
    fn walk<'a>(msg: &'a Message, out: &mut Vec<&'a RawAttachment>) {
        out.extend(msg.attachments());
        for fwd in msg.forwarded() {
            walk(fwd, out);
        }
    }

    let mut out = Vec::new();
    for msg in msgs {
        walk(msg, &mut out);
    }
    out
}

/// All photo records in a message list, including forwarded messages.
pub fn photo_links(msgs: &[Message]) -> Vec<Photo> {
    raw_attachments(msgs)
        .into_iter()
        .filter(|raw| raw.kind == "photo")
        .filter_map(|raw| raw.photo.as_ref())
        .map(Photo::from_raw)
        .collect()
}

/// All audio records in a message list, including forwarded messages.
///
/// Records without a stream URL are included; callers that need playable
/// links filter on [`Audio::url`].
pub fn audio_links(msgs: &[Message]) -> Vec<Audio> {
    raw_attachments(msgs)
        .into_iter()
        .filter(|raw| raw.kind == "audio")
        .filter_map(|raw| raw.audio.as_ref())
        .map(Audio::from_raw)
        .collect()
}
