//! GitHub Organization Client
//!
//! Read-only access to an organization's public repositories through the
//! GitHub REST API.
//!
//! The organization document and the repository list are each fetched at
//! most once per client and cached for the client's lifetime:
//!
//! ```text
//! org() ──► GET {api}/orgs/{org}          (memoized)
//!   │
//!   └─ repos_url
//!        │
//! repos_payload() ──► GET {repos_url}     (memoized)
//!        │
//! public_repos(license) ──► names, optionally filtered by license key
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use primer_core::github::GithubOrgClient;
//!
//! let client = GithubOrgClient::from_config("google", &GithubConfig::default())?;
//! let apache = client.public_repos(Some("apache-2.0")).await?;
//! ```

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::config::{GithubConfig, DEFAULT_API_BASE_URL};
use crate::fetch::{FetchError, HttpJsonFetcher, JsonFetcher};
use crate::memo::Memoized;
use crate::nested::{access_nested_map, LookupError};

/// Path from a repository document to its license key
const LICENSE_KEY_PATH: [&str; 2] = ["license", "key"];

/// Errors from the organization client
#[derive(Debug, Error)]
pub enum ClientError {
    /// The document could not be fetched
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A required field is missing from a document
    #[error("Missing field in GitHub payload: {0}")]
    Lookup(#[from] LookupError),

    /// A document has the wrong shape
    #[error("Unexpected payload from {url}: expected {expected}")]
    UnexpectedPayload {
        /// Where the document came from
        url: String,
        /// What was expected instead
        expected: &'static str,
    },
}

/// Client for one GitHub organization
pub struct GithubOrgClient<F: JsonFetcher> {
    /// Organization login
    org_name: String,
    /// API base URL, without trailing slash
    api_base_url: String,
    /// Document source
    fetcher: Arc<F>,
    /// Cached organization document
    org: Memoized<Value>,
    /// Cached repository list
    repos: Memoized<Vec<Value>>,
}

impl GithubOrgClient<HttpJsonFetcher> {
    /// Create a client that talks to the configured GitHub API over HTTP
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the HTTP client cannot be built.
    pub fn from_config(
        org_name: impl Into<String>,
        config: &GithubConfig,
    ) -> Result<Self, FetchError> {
        let fetcher = HttpJsonFetcher::from_config(config)?;
        Ok(Self::new(org_name, fetcher).with_api_base(config.api_base_url.clone()))
    }
}

impl<F: JsonFetcher> GithubOrgClient<F> {
    /// Create a client for `org_name` against the public GitHub API
    pub fn new(org_name: impl Into<String>, fetcher: F) -> Self {
        Self::with_shared_fetcher(org_name, Arc::new(fetcher))
    }

    /// Create a client that shares its fetcher with other owners
    pub fn with_shared_fetcher(org_name: impl Into<String>, fetcher: Arc<F>) -> Self {
        Self {
            org_name: org_name.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            fetcher,
            org: Memoized::new(),
            repos: Memoized::new(),
        }
    }

    /// Use a different API base URL (a mirror or a local test server)
    #[must_use]
    pub fn with_api_base(mut self, api_base_url: impl Into<String>) -> Self {
        self.api_base_url = api_base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Organization login this client was created for
    #[must_use]
    pub fn org_name(&self) -> &str {
        &self.org_name
    }

    /// The document source
    #[must_use]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// URL of the organization document
    #[must_use]
    pub fn org_url(&self) -> String {
        format!("{}/orgs/{}", self.api_base_url, self.org_name)
    }

    /// The organization document, fetched on first use
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Fetch`] if the document cannot be fetched.
    pub async fn org(&self) -> Result<&Value, ClientError> {
        self.org
            .get_or_try_init(|| async {
                let url = self.org_url();
                tracing::debug!(
                    org = %self.org_name,
                    fetcher = self.fetcher.name(),
                    "Fetching organization"
                );
                self.fetcher.get_json(&url).await.map_err(ClientError::from)
            })
            .await
    }

    /// The organization's `repos_url`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Lookup`] if the organization document has no
    /// `repos_url`, and [`ClientError::UnexpectedPayload`] if it is not a
    /// string.
    pub async fn public_repos_url(&self) -> Result<String, ClientError> {
        let org = self.org().await?;
        access_nested_map(org, &["repos_url"])?
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ClientError::UnexpectedPayload {
                url: self.org_url(),
                expected: "a string repos_url",
            })
    }

    /// The organization's repository documents, fetched on first use
    ///
    /// # Errors
    ///
    /// Fails if the organization document or the repository list cannot be
    /// fetched, or if the list is not a JSON array.
    pub async fn repos_payload(&self) -> Result<&[Value], ClientError> {
        let repos = self
            .repos
            .get_or_try_init(|| async {
                let url = self.public_repos_url().await?;
                tracing::debug!(org = %self.org_name, url = %url, "Fetching repositories");
                let payload = self.fetcher.get_json(&url).await?;
                match payload {
                    Value::Array(repos) => Ok(repos),
                    _ => Err(ClientError::UnexpectedPayload {
                        url,
                        expected: "an array of repositories",
                    }),
                }
            })
            .await?;
        Ok(repos.as_slice())
    }

    /// Names of the organization's public repositories, in payload order
    ///
    /// With `license`, only repositories whose license key matches are kept.
    /// Entries without a string `name` are skipped.
    ///
    /// # Errors
    ///
    /// See [`Self::repos_payload`].
    pub async fn public_repos(&self, license: Option<&str>) -> Result<Vec<String>, ClientError> {
        let cached = self.repos.is_initialized();
        let repos = self.repos_payload().await?;

        let names: Vec<String> = repos
            .iter()
            .filter(|repo| license.map_or(true, |key| Self::has_license(repo, key)))
            .filter_map(|repo| repo.get("name").and_then(Value::as_str))
            .map(str::to_string)
            .collect();

        tracing::info!(
            org = %self.org_name,
            license = license.unwrap_or("any"),
            total = repos.len(),
            matched = names.len(),
            cached,
            "Listed public repositories"
        );
        Ok(names)
    }

    /// Whether `repo.license.key` equals `license_key`
    ///
    /// A repository without a license (missing or `null`) has no match.
    #[must_use]
    pub fn has_license(repo: &Value, license_key: &str) -> bool {
        access_nested_map(repo, &LICENSE_KEY_PATH)
            .map(|key| key.as_str() == Some(license_key))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::StaticJsonFetcher;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    type Client = GithubOrgClient<StaticJsonFetcher>;

    #[tokio::test]
    async fn test_org() {
        for (org, payload) in [("google", json!({"google": true})), ("abc", json!({"abc": true}))] {
            let url = format!("https://api.github.com/orgs/{org}");
            let fetcher = StaticJsonFetcher::new().with_route(url.clone(), payload.clone());
            let client = Client::new(org, fetcher);

            assert_eq!(client.org().await.unwrap(), &payload);
            assert_eq!(client.org().await.unwrap(), &payload);
            assert_eq!(client.fetcher().calls(), vec![url]);
        }
    }

    #[tokio::test]
    async fn test_public_repos_url() {
        let fetcher = StaticJsonFetcher::new().with_route(
            "https://api.github.com/orgs/google",
            json!({"repos_url": "https://api.github.com/orgs/google/repos"}),
        );
        let client = Client::new("google", fetcher);

        assert_eq!(
            client.public_repos_url().await.unwrap(),
            "https://api.github.com/orgs/google/repos"
        );
    }

    #[tokio::test]
    async fn test_public_repos_url_missing() {
        let fetcher =
            StaticJsonFetcher::new().with_route("https://api.github.com/orgs/google", json!({}));
        let client = Client::new("google", fetcher);

        let err = client.public_repos_url().await.unwrap_err();
        assert!(matches!(err, ClientError::Lookup(ref e) if e.key() == "repos_url"));
    }

    #[tokio::test]
    async fn test_public_repos_url_not_a_string() {
        let fetcher = StaticJsonFetcher::new()
            .with_route("https://api.github.com/orgs/google", json!({"repos_url": 7}));
        let client = Client::new("google", fetcher);

        let err = client.public_repos_url().await.unwrap_err();
        assert!(matches!(err, ClientError::UnexpectedPayload { .. }));
    }

    #[tokio::test]
    async fn test_public_repos() {
        let repos_url = "https://api.github.com/orgs/google/repos";
        let fetcher = StaticJsonFetcher::new()
            .with_route(
                "https://api.github.com/orgs/google",
                json!({"repos_url": repos_url}),
            )
            .with_route(
                repos_url,
                json!([
                    {"id": 335_035_109, "name": "ssh-chat", "private": false, "forks": 18},
                    {"id": 335_035_110, "name": "kubernetes", "private": false, "forks": 20},
                ]),
            );
        let client = Client::new("google", fetcher);

        assert_eq!(
            client.public_repos(None).await.unwrap(),
            vec!["ssh-chat", "kubernetes"]
        );
        // Second listing is served from the cache
        assert!(client.repos.is_initialized());
        client.public_repos(None).await.unwrap();
        assert_eq!(client.fetcher().call_count(repos_url), 1);
        assert_eq!(client.fetcher().calls().len(), 2);
    }

    #[tokio::test]
    async fn test_repos_payload_must_be_array() {
        let fetcher = StaticJsonFetcher::new()
            .with_route(
                "https://api.github.com/orgs/google",
                json!({"repos_url": "https://api.github.com/orgs/google/repos"}),
            )
            .with_route(
                "https://api.github.com/orgs/google/repos",
                json!({"message": "Not Found"}),
            );
        let client = Client::new("google", fetcher);

        let err = client.public_repos(None).await.unwrap_err();
        assert!(matches!(err, ClientError::UnexpectedPayload { .. }));
    }

    #[tokio::test]
    async fn test_fetch_failure_is_not_cached() {
        let client = Client::new("google", StaticJsonFetcher::new());

        assert!(matches!(
            client.org().await.unwrap_err(),
            ClientError::Fetch(FetchError::NotFound { .. })
        ));
        assert!(client.org().await.is_err());
        assert_eq!(client.fetcher().calls().len(), 2);
    }

    #[test]
    fn test_has_license() {
        let cases = [
            (json!({"license": {"key": "bsd-3-clause"}}), "bsd-3-clause", true),
            (json!({"license": {"key": "apache-2.0"}}), "bsd-3-clause", false),
            (json!({"license": null}), "apache-2.0", false),
            (json!({"name": "unlicensed"}), "apache-2.0", false),
        ];

        for (repo, key, expected) in cases {
            assert_eq!(Client::has_license(&repo, key), expected, "{repo} / {key}");
        }
    }

    #[test]
    fn test_org_url_with_custom_base() {
        let client = Client::new("rust-lang", StaticJsonFetcher::new())
            .with_api_base("http://localhost:8080/");
        assert_eq!(client.org_url(), "http://localhost:8080/orgs/rust-lang");
        assert_eq!(client.org_name(), "rust-lang");
    }
}
