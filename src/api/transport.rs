//! The wire seam: a [`Transport`] trait and its blocking HTTP
//! implementation.
//!
//! The fetcher only ever talks to a `Transport`, so tests substitute an
//! in-memory fake and never touch the network.

use serde_json::Value;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::{Result, VkpackError};

/// A synchronous connection to the remote API.
pub trait Transport {
    /// Invokes one API method with the given query parameters and returns
    /// the unwrapped `response` payload.
    fn call(&self, method: &'static str, params: &[(&str, String)]) -> Result<Value>;

    /// Runs a VKScript via the `execute` endpoint.
    fn execute(&self, code: &str) -> Result<Value> {
        self.call("execute", &[("code", code.to_string())])
    }
}

// Blanket impl so `History` can hold either an owned transport or a
// borrowed one.
impl<T: Transport + ?Sized> Transport for &T {
    fn call(&self, method: &'static str, params: &[(&str, String)]) -> Result<Value> {
        (**self).call(method, params)
    }

    fn execute(&self, code: &str) -> Result<Value> {
        (**self).execute(code)
    }
}

/// Blocking HTTP transport over the real API.
///
/// Every call is a GET to `{base_url}/{method}` carrying the bearer token
/// and version as query parameters. Calls are issued one at a time and
/// awaited before the next step proceeds; there is no connection-level
/// retry.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    token: String,
    config: ApiConfig,
}

impl HttpTransport {
    /// Creates a transport against the default endpoint.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_config(token, ApiConfig::default())
    }

    /// Creates a transport against a custom endpoint (tests, proxies).
    pub fn with_config(token: impl Into<String>, config: ApiConfig) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            token: token.into(),
            config,
        }
    }
}

impl Transport for HttpTransport {
    fn call(&self, method: &'static str, params: &[(&str, String)]) -> Result<Value> {
        let url = format!("{}/{}", self.config.base_url, method);
        debug!(method, "calling API");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("access_token", self.token.as_str()),
                ("v", self.config.version.as_str()),
            ])
            .query(params)
            .send()?
            .error_for_status()?;

        let envelope: Value = response.json()?;
        unwrap_envelope(method, envelope)
    }
}

/// Peels the `{"response": ...}` / `{"error": ...}` envelope off an API
/// reply.
fn unwrap_envelope(method: &'static str, envelope: Value) -> Result<Value> {
    if let Some(error) = envelope.get("error") {
        let code = error.get("error_code").and_then(Value::as_i64).unwrap_or(-1);
        let message = error
            .get("error_msg")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string();
        return Err(VkpackError::api(code, message));
    }

    match envelope {
        Value::Object(mut object) => object
            .remove("response")
            .ok_or_else(|| VkpackError::unexpected(method, "missing 'response' key")),
        other => Err(VkpackError::unexpected(
            method,
            format!("expected an object envelope, got {other}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_response() {
        let value = unwrap_envelope("users.get", json!({"response": [1, 2, 3]})).unwrap();
        assert_eq!(value, json!([1, 2, 3]));
    }

    #[test]
    fn test_unwrap_error_envelope() {
        let err = unwrap_envelope(
            "execute",
            json!({"error": {"error_code": 6, "error_msg": "Too many requests per second"}}),
        )
        .unwrap_err();

        match err {
            VkpackError::Api { code, message } => {
                assert_eq!(code, 6);
                assert!(message.contains("Too many requests"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_unwrap_missing_response_key() {
        let err = unwrap_envelope("users.get", json!({"unexpected": 1})).unwrap_err();
        assert!(err.is_unexpected_response());
    }

    #[test]
    fn test_unwrap_non_object_envelope() {
        let err = unwrap_envelope("users.get", json!([1, 2])).unwrap_err();
        assert!(err.is_unexpected_response());
    }

    #[test]
    fn test_error_envelope_with_missing_fields() {
        let err = unwrap_envelope("execute", json!({"error": {}})).unwrap_err();
        match err {
            VkpackError::Api { code, message } => {
                assert_eq!(code, -1);
                assert_eq!(message, "unknown error");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}
