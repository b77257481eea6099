//! Unified error types for vkpack.
//!
//! This module provides a single [`VkpackError`] enum that covers all error
//! cases in the library: transport failures, VK API errors, malformed
//! payloads, and local filesystem problems.
//!
//! # Error Handling Philosophy
//!
//! There is no retry policy and no partial-result recovery: a run either
//! fully succeeds or stops at the first failure, leaving already-written
//! files in place. Every error therefore carries enough context to tell the
//! user *where* the run stopped.

use std::io;

use thiserror::Error;

/// A specialized [`Result`] type for vkpack operations.
///
/// # Example
///
/// ```rust
/// use vkpack::error::Result;
/// use vkpack::Message;
///
/// fn my_function() -> Result<Vec<Message>> {
///     // ... operations that may fail
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, VkpackError>;

/// The error type for all vkpack operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VkpackError {
    /// An I/O error occurred.
    ///
    /// This typically happens when:
    /// - The output directory can't be created
    /// - Permission denied
    /// - Disk is full (when writing the archive)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A transport-level HTTP failure (connect, timeout, TLS, bad status).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing/serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The VK API returned an error envelope instead of a response.
    #[error("VK API error {code}: {message}")]
    Api {
        /// VK error code (e.g. 5 = invalid token, 6 = rate limited)
        code: i64,
        /// VK error description
        message: String,
    },

    /// The remote payload didn't have the expected shape.
    ///
    /// This occurs when a response is missing an expected key, an array
    /// comes back empty, or an element has the wrong type.
    #[error("Unexpected response from {method}: {message}")]
    UnexpectedResponse {
        /// API method whose response was malformed
        method: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// A message referenced a sender that participant resolution missed.
    #[error("Unknown participant id {0}")]
    UnknownParticipant(i64),
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl VkpackError {
    /// Creates a VK API error from an error envelope.
    pub fn api(code: i64, message: impl Into<String>) -> Self {
        VkpackError::Api {
            code,
            message: message.into(),
        }
    }

    /// Creates an unexpected-response error for an API method.
    pub fn unexpected(method: &'static str, message: impl Into<String>) -> Self {
        VkpackError::UnexpectedResponse {
            method,
            message: message.into(),
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, VkpackError::Io(_))
    }

    /// Returns `true` if this is a VK API error envelope.
    pub fn is_api(&self) -> bool {
        matches!(self, VkpackError::Api { .. })
    }

    /// Returns `true` if this is a malformed-payload error.
    pub fn is_unexpected_response(&self) -> bool {
        matches!(self, VkpackError::UnexpectedResponse { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================
