//! Paginated, rate-limited retrieval of full conversation histories.
//!
//! [`History`] wraps a [`Transport`] and walks a conversation oldest-first
//! in batched pages until the server signals exhaustion. There is no
//! retry logic and no checkpointing: runs are manually re-invoked and
//! idempotent at the level of "fetch everything again", so any transport
//! or decoding error simply propagates and aborts.
//!
//! # Example
//!
//! ```rust,no_run
//! use vkpack::api::HttpTransport;
//! use vkpack::history::{History, Peer};
//! use vkpack::progress::no_progress;
//!
//! # fn main() -> vkpack::Result<()> {
//! let history = History::new(HttpTransport::new("token"));
//! let messages = history.fetch_all(&Peer::user("durov"), &no_progress())?;
//! let participants = history.participants(&messages)?;
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde_json::Value;
use tracing::debug;

use crate::api::script::{self, HistoryTarget};
use crate::api::Transport;
use crate::config::FetchConfig;
use crate::error::{Result, VkpackError};
use crate::message::{Message, Participants, User};
use crate::progress::{Progress, ProgressCallback};
use crate::throttle::Throttle;

/// The conversation to export, before id resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Peer {
    /// A direct dialog, addressed by numeric id or screen name.
    User(String),
    /// A named group chat, addressed by chat id (used as-is, no lookup).
    Chat(i64),
}

impl Peer {
    /// A direct-dialog peer.
    pub fn user(id: impl Into<String>) -> Self {
        Peer::User(id.into())
    }

    /// A group-chat peer.
    pub fn chat(id: i64) -> Self {
        Peer::Chat(id)
    }
}

/// Fetches message history and participant profiles through a transport.
///
/// The throttle is injected so tests can pass [`Throttle::none`]; the
/// default honors the one-call-per-second service limit.
pub struct History<T: Transport> {
    api: T,
    throttle: Throttle,
    config: FetchConfig,
}

impl<T: Transport> History<T> {
    /// Creates a fetcher with the standard throttle and fetch settings.
    pub fn new(api: T) -> Self {
        Self {
            api,
            throttle: Throttle::standard(),
            config: FetchConfig::default(),
        }
    }

    /// Replaces the rate limiter.
    #[must_use]
    pub fn with_throttle(mut self, throttle: Throttle) -> Self {
        self.throttle = throttle;
        self
    }

    /// Replaces the fetch configuration.
    #[must_use]
    pub fn with_config(mut self, config: FetchConfig) -> Self {
        self.config = config;
        self
    }

    /// Resolves one user profile by id or screen name.
    ///
    /// Throttled: the service counts profile lookups against the same
    /// rate limit as everything else.
    pub fn user(&self, id: &str) -> Result<User> {
        self.throttle.pause();
        let response = self.api.call(
            "users.get",
            &[
                ("user_ids", id.to_string()),
                ("fields", "name,screen_name".to_string()),
            ],
        )?;

        let users = response
            .as_array()
            .ok_or_else(|| VkpackError::unexpected("users.get", "expected an array"))?;
        let first = users
            .first()
            .ok_or_else(|| VkpackError::unexpected("users.get", "empty user list"))?;
        Ok(serde_json::from_value(first.clone())?)
    }

    /// Resolves a [`Peer`] to the id the history endpoint expects.
    fn resolve(&self, peer: &Peer) -> Result<HistoryTarget> {
        match peer {
            Peer::User(id) => Ok(HistoryTarget::User(self.user(id)?.uid)),
            Peer::Chat(id) => Ok(HistoryTarget::Chat(*id)),
        }
    }

    /// Zero-count history probe returning the conversation's total message
    /// count. Used only to size progress reporting, never to decide
    /// termination.
    fn total_count(&self, target: HistoryTarget) -> Result<u64> {
        let response = self.api.call(
            "messages.getHistory",
            &[
                (target.id_key(), target.id().to_string()),
                ("count", "0".to_string()),
            ],
        )?;

        response
            .as_array()
            .and_then(|items| items.first())
            .and_then(Value::as_u64)
            .ok_or_else(|| {
                VkpackError::unexpected("messages.getHistory", "count probe missing total")
            })
    }

    /// Fetches the complete history of a conversation, oldest to newest.
    ///
    /// Pages are pulled in batched `execute` calls
    /// ([`FetchConfig::pages_per_batch`] pages of [`FetchConfig::page_size`]
    /// each), with one throttle pause per batch. The server appends integer
    /// sentinels to the flattened result once pages run dry; the loop stops
    /// on a trailing sentinel and every sentinel is stripped from the
    /// returned list.
    pub fn fetch_all(&self, peer: &Peer, progress: &ProgressCallback) -> Result<Vec<Message>> {
        let target = self.resolve(peer)?;
        let total = self.total_count(target)?;
        debug!(total, ?target, "fetching history");
        progress(Progress::items(0, Some(total as usize)));

        let mut raw: Vec<Value> = Vec::new();
        let mut fetched = 0usize;
        let mut offset = 0u64;
        loop {
            let code = script::history_batch(
                target,
                offset,
                self.config.pages_per_batch,
                self.config.page_size,
            );
            let bulk = self.api.execute(&code)?;
            self.throttle.pause();

            let items = bulk
                .as_array()
                .ok_or_else(|| VkpackError::unexpected("execute", "expected an array"))?;
            let exhausted = items.last().map_or(true, is_sentinel);

            fetched += items.iter().filter(|item| !is_sentinel(item)).count();
            raw.extend(items.iter().cloned());
            progress(Progress::items(fetched, Some(total as usize)));

            if exhausted {
                break;
            }
            offset += self.config.batch_span();
        }

        raw.into_iter()
            .filter(|item| !is_sentinel(item))
            .map(|item| serde_json::from_value(item).map_err(VkpackError::from))
            .collect()
    }

    /// Resolves every user appearing in `msgs`: each message's `uid` and
    /// `from_id`, plus the `uid` of every forwarded sub-message at any
    /// depth.
    ///
    /// One throttled `users.get` per deduplicated id — no batching, which
    /// is slow on large group chats but inside the rate limit.
    pub fn participants(&self, msgs: &[Message]) -> Result<Participants> {
        let mut ids = BTreeSet::new();
        for msg in msgs {
            ids.extend(msg.uid);
            ids.extend(msg.from_id);
            collect_forwarded_ids(msg, &mut ids);
        }
        debug!(count = ids.len(), "resolving participants");

        ids.into_iter()
            .map(|id| self.user(&id.to_string()))
            .collect()
    }

    /// Fetches the full history of a user dialog and writes the raw
    /// message array to `<first> <last> (<today's date>).json` under `dir`.
    ///
    /// Returns the path of the written file.
    pub fn save_json(
        &self,
        dir: &Path,
        peer: &str,
        progress: &ProgressCallback,
    ) -> Result<PathBuf> {
        let user = self.user(peer)?;
        let messages = self.fetch_all(&Peer::user(user.uid.to_string()), progress)?;

        let filename = format!(
            "{} {} ({}).json",
            user.first_name,
            user.last_name,
            Local::now().date_naive()
        );
        let path = dir.join(filename);
        fs::write(&path, serde_json::to_string(&messages)?)?;
        Ok(path)
    }
}

/// Integer elements in a flattened history bulk are per-page counts the
/// script concatenation leaks through; a trailing one means no more pages.
fn is_sentinel(value: &Value) -> bool {
    value.is_i64() || value.is_u64()
}

fn collect_forwarded_ids(msg: &Message, ids: &mut BTreeSet<i64>) {
    for fwd in msg.forwarded() {
        ids.extend(fwd.uid);
        collect_forwarded_ids(fwd, ids);
    }
}
