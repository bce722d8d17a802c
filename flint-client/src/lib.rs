//! Flint HTTP Client
//!
//! A typed client for the slice of the GitHub Actions REST API that
//! workflow dispatching needs: listing workflow definitions, submitting a
//! `workflow_dispatch` trigger, and reading back the runs it creates.
//!
//! The interesting part lives in [`dispatcher`]: the dispatch endpoint
//! returns no run id, so triggering a workflow and then watching it finish
//! requires correlating the dispatch to the run it queued.
//!
//! # Example
//!
//! ```no_run
//! use flint_client::{DispatchSpec, Dispatcher, GithubClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = GithubClient::new(std::env::var("GITHUB_TOKEN")?);
//!
//!     let outcome = Dispatcher::new(&client)
//!         .run(&DispatchSpec {
//!             owner: "acme".to_string(),
//!             repo: "widgets".to_string(),
//!             workflow: "build".to_string(),
//!             git_ref: "main".to_string(),
//!             inputs: None,
//!             wait: true,
//!         })
//!         .await?;
//!
//!     println!("{outcome:?}");
//!     Ok(())
//! }
//! ```

pub mod dispatcher;
pub mod error;
pub mod poll;
mod runs;
mod workflows;

// Re-export commonly used types
pub use dispatcher::{DispatchError, DispatchOutcome, DispatchSpec, Dispatcher};
pub use error::{ClientError, Result};
pub use poll::{PollError, PollPolicy, poll};

use reqwest::header;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

/// Public API endpoint; override with [`GithubClient::with_base_url`] for
/// GitHub Enterprise installations or tests.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// HTTP client for the GitHub Actions API
///
/// Holds the token and base URL and applies the headers the API requires
/// on every request. Endpoint methods are grouped by resource:
/// - Workflow definitions (list, find) in `workflows`
/// - Runs (dispatch, list queued, get) in `runs`
#[derive(Debug, Clone)]
pub struct GithubClient {
    /// Base URL of the API (e.g., "https://api.github.com")
    base_url: String,
    /// Token sent as a bearer credential on every request
    token: String,
    /// HTTP client instance
    client: Client,
}

impl GithubClient {
    /// Create a client against the public API
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_API_URL, token)
    }

    /// Create a client against a specific API base URL
    ///
    /// # Arguments
    /// * `base_url` - The API root (e.g., "https://github.example.com/api/v3")
    /// * `token` - The token to authenticate with
    pub fn with_base_url(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            client: Client::new(),
        }
    }

    /// Get the base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Request Builders
    // =============================================================================

    fn get(&self, url: &str) -> RequestBuilder {
        self.authenticated(self.client.get(url))
    }

    fn post(&self, url: &str) -> RequestBuilder {
        self.authenticated(self.client.post(url))
    }

    /// Attach the headers the API requires on every call
    fn authenticated(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token))
            .header(header::ACCEPT, "application/vnd.github+json")
            .header(
                header::USER_AGENT,
                concat!("flint/", env!("CARGO_PKG_VERSION")),
            )
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// Checks the status code and returns an appropriate error if the
    /// request failed, or deserializes the response body if successful.
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

    /// Handle an API response that carries no body (e.g., the dispatch
    /// endpoint's 204 acknowledgement)
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_defaults_to_public_api() {
        let client = GithubClient::new("token");
        assert_eq!(client.base_url(), DEFAULT_API_URL);
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = GithubClient::with_base_url("https://github.example.com/api/v3/", "token");
        assert_eq!(client.base_url(), "https://github.example.com/api/v3");
    }
}
