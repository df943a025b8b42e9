//! jobdeck HTTP Client
//!
//! A small, type-safe HTTP client for the job server API.
//!
//! The client is pure transport: one method per endpoint, no retries and no
//! state. Controllers talk to it through the [`JobGateway`] trait so they can
//! be driven by a scripted gateway in tests.
//!
//! # Example
//!
//! ```no_run
//! use jobdeck_client::JobDeckClient;
//!
//! #[tokio::main]
//! async fn main() -> jobdeck_client::Result<()> {
//!     let client = JobDeckClient::new("http://localhost:8080");
//!
//!     let status = client.job_status().await?;
//!     println!("running: {} ({})", status.running, status.activity);
//!     Ok(())
//! }
//! ```

pub mod error;
mod gateway;
mod jobs;
mod schedules;

#[cfg(test)]
mod stub;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use gateway::JobGateway;

use jobdeck_core::dto::schedule::ErrorBody;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

/// HTTP client for the job server API
///
/// Endpoints are grouped into:
/// - Job control (status, result, start, stop, version)
/// - Schedule management (list, create, update, delete, report)
#[derive(Debug, Clone)]
pub struct JobDeckClient {
    /// Base URL of the job server (e.g., "http://localhost:8080")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl JobDeckClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the job server (e.g., "http://localhost:8080")
    ///
    /// # Example
    /// ```
    /// use jobdeck_client::JobDeckClient;
    ///
    /// let client = JobDeckClient::new("http://localhost:8080");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the job server
    /// * `client` - A configured reqwest Client
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the job server
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            return Err(Self::rejection(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response that returns no content (e.g., DELETE operations)
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        Ok(())
    }

    /// Build an API error from a non-success response
    ///
    /// Prefers the `error` field of a JSON body so validation messages reach
    /// the operator verbatim.
    async fn rejection(response: reqwest::Response) -> ClientError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        let message = match serde_json::from_str::<ErrorBody>(&body) {
            Ok(parsed) => parsed.error,
            Err(_) if body.trim().is_empty() => "Unknown error".to_string(),
            Err(_) => body.trim().to_string(),
        };

        debug!("Request rejected with status {}: {}", status, message);
        ClientError::api_error(status, message)
    }
}
