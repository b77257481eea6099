//! VKScript builder for batched history fetches.
//!
//! One `execute` call may contain up to 25 API calls; folding 20 history
//! pages into one script turns 20 round trips into one. The server
//! concatenates the page results into a single flattened array, appending
//! an integer count element per exhausted page — the fetcher treats any
//! integer element as a no-more-pages sentinel.

/// A resolved conversation target: direct dialog or group chat.
///
/// The two differ only in which id parameter the history endpoint expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryTarget {
    /// Direct user-to-user dialog, addressed by numeric user id.
    User(i64),
    /// Named group chat, addressed by chat id.
    Chat(i64),
}

impl HistoryTarget {
    /// Name of the id parameter for `messages.getHistory`.
    pub fn id_key(&self) -> &'static str {
        match self {
            HistoryTarget::User(_) => "user_id",
            HistoryTarget::Chat(_) => "chat_id",
        }
    }

    /// The numeric id itself.
    pub fn id(&self) -> i64 {
        match self {
            HistoryTarget::User(id) | HistoryTarget::Chat(id) => *id,
        }
    }
}

/// Builds the script for one batched history call.
///
/// Produces `pages` ascending `messages.getHistory` pages of `page_size`
/// starting at `offset`, requested in reverse (oldest-first) mode and
/// concatenated with `+`:
///
/// ```text
/// return API.messages.getHistory({"offset": 0, "count": 200, "user_id": 1, "rev": 1})+...;
/// ```
pub fn history_batch(target: HistoryTarget, offset: u64, pages: u64, page_size: u64) -> String {
    let calls: Vec<String> = (0..pages)
        .map(|page| {
            format!(
                r#"API.messages.getHistory({{"offset": {offset}, "count": {count}, "{id_key}": {id}, "rev": 1}})"#,
                offset = offset + page * page_size,
                count = page_size,
                id_key = target.id_key(),
                id = target.id(),
            )
        })
        .collect();

    format!("return {};", calls.join("+"))
}
