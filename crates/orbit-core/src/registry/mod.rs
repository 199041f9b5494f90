//! Upstream repository access: root listing and lock-artifact fetches.
/// GitHub contents API client.
pub mod github;

pub use github::GitHubSource;

use std::time::Duration;

use async_trait::async_trait;
use orbit_schema::RepositoryEntry;
use reqwest::header;
use thiserror::Error;

use crate::repo::GitHubRepo;

/// `Accept` value for the GitHub v3 REST API.
pub const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// Failures talking to the upstream host.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Transport-level failure (connect, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The call did not finish inside its budget and was dropped.
    #[error("{operation} timed out after {budget:?}")]
    Timeout {
        /// Which call timed out.
        operation: &'static str,
        /// Budget that was exceeded.
        budget: Duration,
    },

    /// Upstream answered with a non-success status.
    #[error("GitHub API error: {status} for {url}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Requested URL.
        url: String,
        /// Response body, as returned.
        body: String,
    },

    /// Upstream answered with a body that is not the expected JSON.
    #[error("Unexpected response body: {0}")]
    Json(#[from] serde_json::Error),

    /// The configured base URL cannot carry a path.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The credential contains bytes not allowed in a header.
    #[error("Invalid header value: {0}")]
    Header(#[from] header::InvalidHeaderValue),
}

/// A remote repository that can list its root and serve per-entry files.
#[async_trait]
pub trait RepositorySource: Send + Sync {
    /// List the top-level entries of `repo`.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, timeouts and non-success responses.
    async fn list_entries(&self, repo: &GitHubRepo) -> Result<Vec<RepositoryEntry>, RegistryError>;

    /// Fetch the raw lock artifact of one entry.
    ///
    /// Returns `Ok(None)` when upstream answers with a non-success status;
    /// a missing lock artifact is an ordinary rejection, not a failure.
    ///
    /// # Errors
    ///
    /// Fails on transport errors and timeouts.
    async fn fetch_lock_artifact(
        &self,
        repo: &GitHubRepo,
        entry: &str,
    ) -> Result<Option<String>, RegistryError>;
}

/// Build a GitHub client carrying the service headers and optional credential.
///
/// # Errors
///
/// Returns an error if the token is not a valid header value or the client
/// cannot be initialized.
pub fn build_github_client(token: Option<&str>) -> Result<reqwest::Client, RegistryError> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::USER_AGENT,
        header::HeaderValue::from_static(crate::USER_AGENT),
    );
    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static(GITHUB_ACCEPT),
    );

    if let Some(t) = token {
        let mut value = header::HeaderValue::from_str(&format!("Bearer {t}"))?;
        value.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, value);
    }

    Ok(reqwest::Client::builder()
        .default_headers(headers)
        .build()?)
}
