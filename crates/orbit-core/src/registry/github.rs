use std::time::Duration;

use async_trait::async_trait;
use orbit_schema::{LOCK_FILE_NAME, RepositoryEntry};
use reqwest::{Client, StatusCode, Url};

use super::{RegistryError, RepositorySource, build_github_client};
use crate::config::DiscoveryConfig;
use crate::repo::GitHubRepo;

/// GitHub contents API backed [`RepositorySource`].
///
/// Every call runs under its own timer. When the timer fires the request
/// future is dropped, which closes the underlying connection.
#[derive(Debug, Clone)]
pub struct GitHubSource {
    client: Client,
    api_url: Url,
    list_timeout: Duration,
    fetch_timeout: Duration,
}

impl GitHubSource {
    /// Create a source from the discovery configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `api_url` is not a usable base URL or the HTTP
    /// client cannot be built.
    pub fn new(config: &DiscoveryConfig) -> Result<Self, RegistryError> {
        let api_url = Url::parse(&config.api_url)
            .map_err(|e| RegistryError::InvalidUrl(format!("{}: {e}", config.api_url)))?;
        if api_url.cannot_be_a_base() {
            return Err(RegistryError::InvalidUrl(config.api_url.clone()));
        }

        Ok(Self {
            client: build_github_client(config.token.as_deref())?,
            api_url,
            list_timeout: config.list_timeout,
            fetch_timeout: config.fetch_timeout,
        })
    }

    /// `{api}/repos/{owner}/{repo}/contents[/{tail}...]`, each segment escaped.
    fn contents_url(&self, repo: &GitHubRepo, tail: &[&str]) -> Result<Url, RegistryError> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|()| RegistryError::InvalidUrl(self.api_url.to_string()))?
            .pop_if_empty()
            .extend(["repos", repo.owner(), repo.name(), "contents"])
            .extend(tail);
        Ok(url)
    }

    /// GET `url` and read the whole body, all inside `budget`.
    async fn get_within(
        &self,
        url: Url,
        budget: Duration,
        operation: &'static str,
    ) -> Result<(StatusCode, String), RegistryError> {
        let request = async {
            let resp = self.client.get(url).send().await?;
            let status = resp.status();
            let body = resp.text().await?;
            Ok::<_, reqwest::Error>((status, body))
        };

        match tokio::time::timeout(budget, request).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(RegistryError::Timeout { operation, budget }),
        }
    }
}

#[async_trait]
impl RepositorySource for GitHubSource {
    async fn list_entries(&self, repo: &GitHubRepo) -> Result<Vec<RepositoryEntry>, RegistryError> {
        let url = self.contents_url(repo, &[])?;
        tracing::debug!(%url, "listing repository root");

        let (status, body) = self
            .get_within(url.clone(), self.list_timeout, "repository listing")
            .await?;

        if !status.is_success() {
            return Err(RegistryError::Status {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    async fn fetch_lock_artifact(
        &self,
        repo: &GitHubRepo,
        entry: &str,
    ) -> Result<Option<String>, RegistryError> {
        let url = self.contents_url(repo, &[entry, LOCK_FILE_NAME])?;

        let (status, body) = self
            .get_within(url, self.fetch_timeout, "lock artifact fetch")
            .await?;

        if !status.is_success() {
            tracing::debug!(
                entry,
                status = status.as_u16(),
                response = %body,
                "no {LOCK_FILE_NAME} found"
            );
            return Ok(None);
        }

        Ok(Some(body))
    }
}
