//! JSON Fetching
//!
//! Fetch-and-parse access to JSON endpoints through a common trait, so the
//! GitHub client can run against the live API or an in-memory route table.
//!
//! # Available Fetchers
//!
//! - [`HttpJsonFetcher`]: `GET` over HTTP with reqwest (default)
//! - [`StaticJsonFetcher`]: fixed URL-to-document routes, records every call
//!
//! # Usage
//!
//! ```ignore
//! use primer_core::fetch::{HttpJsonFetcher, JsonFetcher};
//!
//! let fetcher = HttpJsonFetcher::from_config(&GithubConfig::default())?;
//! let org = fetcher.get_json("https://api.github.com/orgs/google").await?;
//! ```

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use thiserror::Error;

use crate::config::GithubConfig;

/// Errors from fetching a JSON document
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client could not be built
    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Transport failure, or the body was not valid JSON
    #[error("Request to {url} failed: {source}")]
    Request {
        /// The requested URL
        url: String,
        /// The underlying reqwest error
        source: reqwest::Error,
    },

    /// The server answered with a non-success status
    #[error("{url} returned {status}: {body}")]
    Status {
        /// The requested URL
        url: String,
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// No document is registered for the URL
    #[error("No route for {url}")]
    NotFound {
        /// The requested URL
        url: String,
    },
}

/// JSON fetcher trait
///
/// Implement this trait to serve JSON documents from a new source.
#[async_trait]
pub trait JsonFetcher: Send + Sync {
    /// Fetcher name, for logging
    fn name(&self) -> &str;

    /// Fetch `url` and parse the body as JSON
    async fn get_json(&self, url: &str) -> Result<Value, FetchError>;
}

// ============================================================================
// HTTP
// ============================================================================

/// HTTP fetcher backed by reqwest
#[derive(Clone, Debug)]
pub struct HttpJsonFetcher {
    /// HTTP client
    http_client: reqwest::Client,
}

impl HttpJsonFetcher {
    /// Wrap an existing reqwest client
    #[must_use]
    pub fn from_client(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }

    /// Build a client with the configured timeout and user agent
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if reqwest cannot build the client.
    pub fn from_config(config: &GithubConfig) -> Result<Self, FetchError> {
        Self::new(config.timeout, &config.user_agent)
    }

    /// Build a client with an explicit timeout and user agent
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if reqwest cannot build the client.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { http_client })
    }
}

#[async_trait]
impl JsonFetcher for HttpJsonFetcher {
    fn name(&self) -> &'static str {
        "HTTP"
    }

    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        tracing::debug!(url, "GET");

        let response = self
            .http_client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        // Check for HTTP errors
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(url, status, "Request rejected");
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
                body,
            });
        }

        response.json().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })
    }
}

/// Fetch `url` with a default [`HttpJsonFetcher`]
///
/// # Errors
///
/// See [`HttpJsonFetcher::get_json`].
pub async fn get_json(url: &str) -> Result<Value, FetchError> {
    HttpJsonFetcher::from_config(&GithubConfig::default())?
        .get_json(url)
        .await
}

// ============================================================================
// Static routes
// ============================================================================

/// Fetcher that serves documents from an in-memory route table
///
/// Every request is recorded, including requests for unknown URLs, so callers
/// can check how often and in what order URLs were fetched.
#[derive(Debug, Default)]
pub struct StaticJsonFetcher {
    /// URL to document
    routes: HashMap<String, Value>,
    /// Requested URLs, in order
    calls: Mutex<Vec<String>>,
}

impl StaticJsonFetcher {
    /// Create a fetcher with no routes
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document for `url`
    #[must_use]
    pub fn with_route(mut self, url: impl Into<String>, document: Value) -> Self {
        self.routes.insert(url.into(), document);
        self
    }

    /// All requested URLs, in request order
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// How many times `url` was requested
    #[must_use]
    pub fn call_count(&self, url: &str) -> usize {
        self.calls.lock().iter().filter(|c| *c == url).count()
    }
}

#[async_trait]
impl JsonFetcher for StaticJsonFetcher {
    fn name(&self) -> &'static str {
        "Static"
    }

    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        self.calls.lock().push(url.to_string());

        self.routes
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                url: url.to_string(),
            })
    }
}
