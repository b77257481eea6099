//! Configuration types for the API client and the history fetcher.
//!
//! Two knob sets exist: [`ApiConfig`] points the transport at an endpoint
//! (overridable so tests can target a local server), and [`FetchConfig`]
//! shapes the paginated history fetch.
//!
//! # Example
//!
//! ```rust
//! use vkpack::config::FetchConfig;
//!
//! let config = FetchConfig::new().with_page_size(100).with_pages_per_batch(10);
//! assert_eq!(config.batch_span(), 1000);
//! ```

use serde::{Deserialize, Serialize};

/// Default VK API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.vk.com/method";

/// API version the legacy message schema (src_* photo fields, `uid`
/// sender ids) belongs to.
pub const DEFAULT_API_VERSION: &str = "3.0";

/// Configuration for the HTTP transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the API, without a trailing slash (default: VK's).
    pub base_url: String,

    /// Value of the `v` request parameter.
    pub version: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            version: DEFAULT_API_VERSION.to_string(),
        }
    }
}

impl ApiConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL (no trailing slash).
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the API version parameter.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }
}

/// Configuration for paginated history fetching.
///
/// The server pages history in chunks of [`page_size`](Self::page_size);
/// to cut round trips, [`pages_per_batch`](Self::pages_per_batch) pages are
/// folded into a single scripted `execute` call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Messages requested per history page (server maximum: 200).
    pub page_size: u64,

    /// History pages folded into one batched `execute` call (maximum: 25
    /// API calls per script; 20 leaves headroom).
    pub pages_per_batch: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            page_size: 200,
            pages_per_batch: 20,
        }
    }
}

impl FetchConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size.
    #[must_use]
    pub fn with_page_size(mut self, size: u64) -> Self {
        self.page_size = size;
        self
    }

    /// Sets how many pages go into one batched call.
    #[must_use]
    pub fn with_pages_per_batch(mut self, pages: u64) -> Self {
        self.pages_per_batch = pages;
        self
    }

    /// Total messages covered by one batched call.
    pub fn batch_span(&self) -> u64 {
        self.page_size * self.pages_per_batch
    }
}
