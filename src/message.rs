//! Raw wire types for the legacy VK message schema.
//!
//! Everything in this module mirrors what the API actually sends — it is
//! consumed, not owned. Fields vkpack doesn't know about are preserved
//! through `#[serde(flatten)]` so the raw JSON dump round-trips without
//! loss. Normalized shapes live in [`crate::attachment`].
//!
//! # Absent vs. empty
//!
//! The feed omits `attachments` and `fwd_messages` entirely when a message
//! has none; these stay `Option<Vec<_>>` and are never materialized as
//! empty vectors. Downstream code treats absent and empty alike.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, VkpackError};

/// One message as the history endpoint returns it.
///
/// Identifiers are the legacy ones: `uid` is the conversation partner's id,
/// `from_id` the actual sender, `out` a 0/1 direction flag. Forwarded
/// messages nest recursively under `fwd_messages`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mid: Option<u64>,

    /// Unix timestamp (seconds).
    pub date: i64,

    /// Message text. May contain literal `<br>` markup for line breaks.
    #[serde(default)]
    pub body: String,

    /// Conversation partner id (the peer for direct dialogs; the original
    /// sender for forwarded messages).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<i64>,

    /// Sender id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_id: Option<i64>,

    /// Direction flag: 1 when the access-token owner sent the message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out: Option<i64>,

    /// Attachments, absent when the message carries none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<RawAttachment>>,

    /// Forwarded messages, absent when the message carries none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fwd_messages: Option<Vec<Message>>,

    /// Originating group-chat id for messages forwarded out of a chat.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<i64>,

    /// Wire fields vkpack doesn't interpret, kept for the raw dump.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Message {
    /// Returns `true` when the access-token owner sent this message.
    pub fn is_outgoing(&self) -> bool {
        matches!(self.out, Some(flag) if flag != 0)
    }

    /// Attachments as a slice, treating absent as empty.
    pub fn attachments(&self) -> &[RawAttachment] {
        self.attachments.as_deref().unwrap_or_default()
    }

    /// Forwarded messages as a slice, treating absent as empty.
    pub fn forwarded(&self) -> &[Message] {
        self.fwd_messages.as_deref().unwrap_or_default()
    }
}

/// One attachment as the feed sends it: a string tag plus a payload object
/// keyed by the same name. Exactly one payload is populated for recognized
/// kinds; unrecognized kinds carry their payload in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAttachment {
    /// Kind tag (`photo`, `audio`, `sticker`, `doc`, `video`, `link`,
    /// `wall`, or something newer we drop).
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<RawPhoto>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<RawAudio>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sticker: Option<RawSticker>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<RawDoc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<RawVideo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<RawLink>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wall: Option<RawWall>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Photo payload: up to six resolution URLs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPhoto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_small: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_big: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_xbig: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_xxbig: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_xxxbig: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Audio payload. `url` is absent when the rights holder disabled
/// streaming; `content_restricted` is a bare presence marker on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAudio {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_restricted: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Sticker payload: preview images by pixel size.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSticker {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_64: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_128: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_256: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_352: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_512: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Document payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Video payload. The feed only exposes a thumbnail and a title here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawVideo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Shared-link payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawLink {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Wall-post payload: free text plus a nested attachment list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawWall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<RawAttachment>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One user profile as `users.get` returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Numeric user id.
    pub uid: i64,

    pub first_name: String,

    pub last_name: String,

    /// Short address (vk.com/<screen_name>), absent for some accounts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_name: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// `"<first> <last>"`, the display form every renderer uses.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Resolved profiles for every user appearing in an export run.
///
/// Built once by [`crate::history::History::participants`], read-only
/// afterward. Lookup misses mean the resolution pass skipped an id the
/// messages reference, which is a hard error for the renderers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Participants {
    users: HashMap<i64, User>,
}

impl Participants {
    /// Creates an empty participant map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a resolved profile, keyed by its `uid`.
    pub fn insert(&mut self, user: User) {
        self.users.insert(user.uid, user);
    }

    /// Looks up a profile.
    pub fn get(&self, id: i64) -> Option<&User> {
        self.users.get(&id)
    }

    /// Looks up a profile, failing with
    /// [`VkpackError::UnknownParticipant`] on a miss.
    pub fn require(&self, id: i64) -> Result<&User> {
        self.get(id).ok_or(VkpackError::UnknownParticipant(id))
    }

    /// Full display name for a participant.
    pub fn full_name(&self, id: i64) -> Result<String> {
        self.require(id).map(User::full_name)
    }

    /// Number of resolved participants.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Iterates over resolved profiles in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }
}

impl FromIterator<User> for Participants {
    fn from_iter<I: IntoIterator<Item = User>>(iter: I) -> Self {
        let mut participants = Self::new();
        for user in iter {
            participants.insert(user);
        }
        participants
    }
}
