//! Discovery configuration, built once at startup and passed by reference.

use std::time::Duration;

use thiserror::Error;

use crate::repo::GitHubRepo;

/// Public GitHub REST endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Budget for each upstream call (listing and every lock fetch).
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(3000);

/// Upper bound on simultaneous lock-artifact fetches.
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 4;

/// Errors raised while building a [`DiscoveryConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The repository identifier is set but not `owner/repo`.
    #[error("Invalid repository identifier: {0}")]
    InvalidRepository(String),

    /// A fan-out bound of zero would never fetch anything.
    #[error("max_concurrent_fetches must be at least 1")]
    ZeroConcurrency,
}

/// Read-only settings for one discovery run.
///
/// `repository == None` is the "disabled" state: discovery returns nothing
/// and never touches the network.
#[derive(Clone)]
pub struct DiscoveryConfig {
    /// Repository holding one directory per package.
    pub repository: Option<GitHubRepo>,
    /// Optional bearer credential for the upstream host.
    pub token: Option<String>,
    /// Upstream REST base URL.
    pub api_url: String,
    /// Budget for the root listing call.
    pub list_timeout: Duration,
    /// Budget for each lock-artifact fetch.
    pub fetch_timeout: Duration,
    /// Upper bound on simultaneous lock-artifact fetches.
    pub max_concurrent_fetches: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            repository: None,
            token: None,
            api_url: DEFAULT_API_URL.to_string(),
            list_timeout: DEFAULT_REQUEST_TIMEOUT,
            fetch_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
        }
    }
}

impl DiscoveryConfig {
    /// Build a config from raw repository and token values.
    ///
    /// Empty or whitespace-only values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRepository`] if a repository is given but
    /// is not in `owner/repo` form.
    pub fn from_parts(repository: Option<&str>, token: Option<&str>) -> Result<Self, ConfigError> {
        let repository = non_empty(repository)
            .map(GitHubRepo::new)
            .transpose()
            .map_err(ConfigError::InvalidRepository)?;

        Ok(Self {
            repository,
            token: non_empty(token).map(str::to_string),
            ..Self::default()
        })
    }

    /// Override the upstream base URL.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Override the listing and per-entry fetch budgets.
    pub fn with_timeouts(mut self, list: Duration, fetch: Duration) -> Self {
        self.list_timeout = list;
        self.fetch_timeout = fetch;
        self
    }

    /// Override the fetch fan-out bound.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroConcurrency`] for `0`.
    pub fn with_max_concurrent_fetches(mut self, max: usize) -> Result<Self, ConfigError> {
        if max == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        self.max_concurrent_fetches = max;
        Ok(self)
    }

    /// Whether a repository is configured.
    pub fn is_enabled(&self) -> bool {
        self.repository.is_some()
    }
}

// Hand-written so the credential never reaches logs.
impl std::fmt::Debug for DiscoveryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscoveryConfig")
            .field("repository", &self.repository)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("api_url", &self.api_url)
            .field("list_timeout", &self.list_timeout)
            .field("fetch_timeout", &self.fetch_timeout)
            .field("max_concurrent_fetches", &self.max_concurrent_fetches)
            .finish()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_repository_is_disabled() {
        let config = DiscoveryConfig::from_parts(None, None).unwrap();
        assert!(!config.is_enabled());

        let config = DiscoveryConfig::from_parts(Some("   "), Some("")).unwrap();
        assert!(!config.is_enabled());
        assert!(config.token.is_none());
    }

    #[test]
    fn test_defaults() {
        let config = DiscoveryConfig::from_parts(Some("orbit-os/packages"), Some("t0k")).unwrap();
        assert!(config.is_enabled());
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.list_timeout, Duration::from_millis(3000));
        assert_eq!(config.fetch_timeout, Duration::from_millis(3000));
        assert_eq!(config.max_concurrent_fetches, 4);
    }

    #[test]
    fn test_invalid_repository() {
        let err = DiscoveryConfig::from_parts(Some("just-a-name"), None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRepository(_)));
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let result = DiscoveryConfig::default().with_max_concurrent_fetches(0);
        assert!(matches!(result, Err(ConfigError::ZeroConcurrency)));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = DiscoveryConfig::from_parts(Some("a/b"), Some("ghp_secret")).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("ghp_secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
