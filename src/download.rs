//! Streaming HTTP downloads for archive media.
//!
//! The archive writer talks to a [`Downloader`] rather than an HTTP client
//! directly, so tests substitute an in-memory fake and count what actually
//! gets transferred.

use std::io::Read;

use crate::error::Result;

/// An opened download: the URL after redirects plus a streaming body.
///
/// The final URL matters because photo filenames are taken from its last
/// path segment; dropping the value without reading `body` costs nothing
/// but the request itself.
pub struct Download {
    /// URL the request resolved to after redirects.
    pub final_url: String,

    /// `Content-Length`, when the server sent one.
    pub content_length: Option<u64>,

    /// The response body, read lazily.
    pub body: Box<dyn Read>,
}

/// A blocking resource fetcher.
pub trait Downloader {
    /// Issues a GET and returns the opened download.
    ///
    /// Non-success statuses are errors; redirects are followed.
    fn get(&self, url: &str) -> Result<Download>;
}

/// The real thing, over a blocking reqwest client.
#[derive(Default)]
pub struct HttpDownloader {
    client: reqwest::blocking::Client,
}

impl HttpDownloader {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Downloader for HttpDownloader {
    fn get(&self, url: &str) -> Result<Download> {
        let response = self.client.get(url).send()?.error_for_status()?;
        Ok(Download {
            final_url: response.url().to_string(),
            content_length: response.content_length(),
            body: Box::new(response),
        })
    }
}
