//! HTTP surface: the approved-packages query and a health probe.

pub mod health;
pub mod packages;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use orbit_core::{DiscoveryConfig, RepositorySource};

/// Route serving the approved-package list.
pub const APPROVED_PACKAGES_PATH: &str = "/api/packages/approved";

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<DiscoveryConfig>,
    pub source: Arc<dyn RepositorySource>,
}

impl AppState {
    pub fn new(config: DiscoveryConfig, source: Arc<dyn RepositorySource>) -> Self {
        Self {
            config: Arc::new(config),
            source,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Build the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            APPROVED_PACKAGES_PATH,
            get(packages::approved).fallback(packages::method_not_allowed),
        )
        .route("/healthz", get(health::handler))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use orbit_core::{GitHubRepo, RegistryError};
    use orbit_schema::{EntryKind, RepositoryEntry};
    use serde_json::{Value, json};
    use std::time::Duration;
    use tower::ServiceExt;

    /// Lists `pkg-a` (signed) and `pkg-b` (self-signed), or fails to list.
    struct StubSource {
        reachable: bool,
    }

    #[async_trait]
    impl RepositorySource for StubSource {
        async fn list_entries(
            &self,
            _repo: &GitHubRepo,
        ) -> Result<Vec<RepositoryEntry>, RegistryError> {
            if !self.reachable {
                return Err(RegistryError::Timeout {
                    operation: "repository listing",
                    budget: Duration::from_millis(3000),
                });
            }
            Ok(vec![
                RepositoryEntry::new("pkg-a", EntryKind::Directory),
                RepositoryEntry::new("pkg-b", EntryKind::Directory),
            ])
        }

        async fn fetch_lock_artifact(
            &self,
            _repo: &GitHubRepo,
            entry: &str,
        ) -> Result<Option<String>, RegistryError> {
            let signature = if entry == "pkg-a" { "orbit-signed" } else { "self-signed" };
            let inner = json!({
                "manifest": { "name": entry },
                "signature": signature,
                "downloadUrl": format!("https://cdn.example.com/{entry}.zip"),
            });
            Ok(Some(
                json!({ "content": STANDARD.encode(inner.to_string()) }).to_string(),
            ))
        }
    }

    fn app(repo: Option<&str>, reachable: bool) -> Router {
        let config = DiscoveryConfig::from_parts(repo, None).unwrap();
        router(AppState::new(config, Arc::new(StubSource { reachable })))
    }

    async fn send(app: Router, method: &str, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_returns_only_approved_packages() {
        let (status, body) = send(
            app(Some("orbit-os/packages"), true),
            "GET",
            APPROVED_PACKAGES_PATH,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([{
                "id": "pkg-a",
                "manifest": { "name": "pkg-a" },
                "signature": "orbit-signed",
                "downloadUrl": "https://cdn.example.com/pkg-a.zip",
            }])
        );
    }

    #[tokio::test]
    async fn test_response_is_not_cacheable() {
        let response = app(None, true)
            .oneshot(
                Request::builder()
                    .uri(APPROVED_PACKAGES_PATH)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "no-store"
        );
    }

    #[tokio::test]
    async fn test_unconfigured_repository_is_empty_success() {
        let (status, body) = send(app(None, true), "GET", APPROVED_PACKAGES_PATH).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_empty_success() {
        let (status, body) = send(
            app(Some("orbit-os/packages"), false),
            "GET",
            APPROVED_PACKAGES_PATH,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_other_methods_are_rejected() {
        for method in ["POST", "PUT", "DELETE"] {
            let (status, body) = send(app(None, true), method, APPROVED_PACKAGES_PATH).await;

            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method}");
            assert_eq!(body, json!({ "error": "Method not allowed" }));
        }
    }

    #[tokio::test]
    async fn test_health_reports_configuration() {
        let (status, body) = send(app(None, true), "GET", "/healthz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok", "repository_configured": false }));

        let (_, body) = send(app(Some("a/b"), true), "GET", "/healthz").await;
        assert_eq!(body["repository_configured"], true);
    }
}
