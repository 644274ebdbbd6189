//! Glossa HTTP Client
//!
//! A small, typed HTTP client for the content-generation backend.
//!
//! The backend exposes four endpoints: session creation, task submission,
//! task listing and result retrieval. Every non-2xx answer is reported as
//! [`ClientError::ApiError`]; no structured error body is expected.
//!
//! # Example
//!
//! ```no_run
//! use glossa_client::BackendClient;
//! use glossa_core::domain::task::TaskRequest;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = BackendClient::new("http://127.0.0.1:8000");
//!
//!     let session = client.create_session().await?;
//!     let task_id = client
//!         .submit_task(&session.session_id, &TaskRequest::new("Hindi", "noun", "groq", 10))
//!         .await?;
//!
//!     let snapshot = client.get_results(&session.session_id, &task_id).await?;
//!     println!("{} item(s) so far", snapshot.count);
//!     Ok(())
//! }
//! ```

pub mod error;
mod results;
mod sessions;
mod tasks;

pub use error::{ClientError, Result};

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

/// Default backend location
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// HTTP client for the generation backend
#[derive(Debug, Clone)]
pub struct BackendClient {
    /// Base URL of the backend (e.g., "http://127.0.0.1:8000")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl BackendClient {
    /// Create a new backend client
    ///
    /// # Example
    /// ```
    /// use glossa_client::BackendClient;
    ///
    /// let client = BackendClient::new("http://127.0.0.1:8000");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new backend client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the backend
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build an endpoint URL from path segments
    ///
    /// Segments are percent-encoded, so opaque identifiers can be passed
    /// through unchanged.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            ClientError::InvalidRequest(format!("Invalid base URL '{}': {}", self.base_url, e))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                ClientError::InvalidRequest(format!(
                    "Base URL '{}' cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Check the status code and deserialize the JSON body
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}

/// Reject blank identifiers before they reach the wire
fn require_id(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ClientError::InvalidRequest(format!("{} must not be empty", name)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = BackendClient::new("http://127.0.0.1:8000");
        assert_eq!(client.base_url(), "http://127.0.0.1:8000");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = BackendClient::new("http://127.0.0.1:8000/");
        assert_eq!(client.base_url(), "http://127.0.0.1:8000");
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = BackendClient::new("http://127.0.0.1:8000");
        let url = client.endpoint(&["tasks", "a b/c"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/tasks/a%20b%2Fc");
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = BackendClient::new("http://example.com/api/");
        let url = client.endpoint(&["session"]).unwrap();
        assert_eq!(url.as_str(), "http://example.com/api/session");
    }

    #[test]
    fn test_endpoint_rejects_bad_base() {
        let client = BackendClient::new("not a url");
        assert!(matches!(
            client.endpoint(&["session"]),
            Err(ClientError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_require_id() {
        assert!(require_id("session_id", "abc").is_ok());
        assert!(require_id("session_id", "  ").is_err());
    }
}
