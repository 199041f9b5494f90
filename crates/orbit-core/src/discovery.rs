//! Approved-package discovery.
//!
//! One listing call, then a bounded fan-out of per-entry verifications:
//! fetch the lock artifact, decode it, run the trust gate. Each entry is
//! isolated: whatever happens to one entry is recorded on the report and the
//! rest carry on. A failed listing is caught once, at the outermost boundary,
//! and turns into an empty report with an error diagnostic.

use futures::stream::{self, StreamExt};
use orbit_schema::{ApprovedPackage, RepositoryEntry};
use serde::Serialize;

use crate::config::DiscoveryConfig;
use crate::decode::{DecodeError, decode_lock_artifact};
use crate::registry::{RegistryError, RepositorySource};
use crate::repo::GitHubRepo;

/// How much a diagnostic matters to an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Expected outcome, e.g. an unsigned package.
    Info,
    /// An entry was dropped for an anomalous reason.
    Warning,
    /// The upstream host could not be reached or refused a call.
    Error,
}

/// One thing that went other than "accepted" during a discovery run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Entry the diagnostic is about; `None` for run-level problems.
    pub entry: Option<String>,
    /// How much it matters.
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
}

impl Diagnostic {
    fn new(entry: Option<&str>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            entry: entry.map(str::to_string),
            severity,
            message: message.into(),
        }
    }
}

/// Result of a discovery run: approved packages in listing order plus
/// everything that was dropped along the way.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiscoveryReport {
    /// Approved packages, in the order the listing returned them.
    pub packages: Vec<ApprovedPackage>,
    /// Why the other entries (or the whole run) produced nothing.
    pub diagnostics: Vec<Diagnostic>,
}

impl DiscoveryReport {
    fn empty_with(diagnostic: Diagnostic) -> Self {
        Self {
            packages: Vec::new(),
            diagnostics: vec![diagnostic],
        }
    }

    /// Drop the diagnostics and keep the packages.
    pub fn into_packages(self) -> Vec<ApprovedPackage> {
        self.packages
    }

    /// Whether any diagnostic at [`Severity::Error`] was recorded.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    fn record(&mut self, entry: &str, outcome: EntryOutcome) {
        match outcome {
            EntryOutcome::Accepted(pkg) => {
                tracing::info!(entry, "added package");
                self.packages.push(pkg);
            }
            EntryOutcome::Missing => {
                tracing::warn!(entry, "no lock artifact; skipping");
                self.diagnostics.push(Diagnostic::new(
                    Some(entry),
                    Severity::Warning,
                    "lock artifact not found",
                ));
            }
            EntryOutcome::Rejected { signature } => {
                tracing::info!(entry, %signature, "package not signed properly");
                self.diagnostics.push(Diagnostic::new(
                    Some(entry),
                    Severity::Info,
                    format!("untrusted signature {signature:?}"),
                ));
            }
            EntryOutcome::DecodeFailed(e) => {
                tracing::warn!(entry, error = %e, "malformed lock artifact");
                self.diagnostics
                    .push(Diagnostic::new(Some(entry), Severity::Warning, e.to_string()));
            }
            EntryOutcome::FetchFailed(e) => {
                tracing::error!(entry, error = %e, "failed to process package");
                self.diagnostics
                    .push(Diagnostic::new(Some(entry), Severity::Error, e.to_string()));
            }
        }
    }
}

/// Terminal state of one directory entry.
#[derive(Debug)]
pub enum EntryOutcome {
    /// Signature matched; the package is approved.
    Accepted(ApprovedPackage),
    /// Upstream had no lock artifact for the entry.
    Missing,
    /// Decoded fine but carries another signature.
    Rejected {
        /// The signature that was found.
        signature: String,
    },
    /// The lock artifact was malformed.
    DecodeFailed(DecodeError),
    /// The fetch failed at the transport level or timed out.
    FetchFailed(RegistryError),
}

/// Run the fetch → decode → gate sequence for one entry.
///
/// Never fails: every way out is an [`EntryOutcome`].
pub async fn verify_entry<S>(source: &S, repo: &GitHubRepo, entry: &str) -> EntryOutcome
where
    S: RepositorySource + ?Sized,
{
    tracing::debug!(entry, "processing package directory");

    let raw = match source.fetch_lock_artifact(repo, entry).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return EntryOutcome::Missing,
        Err(e) => return EntryOutcome::FetchFailed(e),
    };

    let manifest = match decode_lock_artifact(&raw) {
        Ok(manifest) => manifest,
        Err(e) => return EntryOutcome::DecodeFailed(e),
    };
    tracing::debug!(entry, ?manifest, "decoded lock artifact");

    match ApprovedPackage::approve(entry, manifest) {
        Ok(pkg) => EntryOutcome::Accepted(pkg),
        Err(untrusted) => EntryOutcome::Rejected {
            signature: untrusted.signature,
        },
    }
}

/// Discover the approved packages of the configured repository.
///
/// Never fails. With no repository configured it returns an empty report
/// without any network call; if the listing fails it returns an empty report
/// carrying one error diagnostic.
pub async fn discover_approved_packages<S>(source: &S, config: &DiscoveryConfig) -> DiscoveryReport
where
    S: RepositorySource + ?Sized,
{
    let Some(repo) = &config.repository else {
        tracing::info!("no package repository configured; returning empty package list");
        return DiscoveryReport::empty_with(Diagnostic::new(
            None,
            Severity::Info,
            "package repository not configured",
        ));
    };

    match discover_in(source, repo, config.max_concurrent_fetches).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(repository = %repo, error = %e, "error fetching approved packages");
            DiscoveryReport::empty_with(Diagnostic::new(None, Severity::Error, e.to_string()))
        }
    }
}

async fn discover_in<S>(
    source: &S,
    repo: &GitHubRepo,
    max_concurrent: usize,
) -> Result<DiscoveryReport, RegistryError>
where
    S: RepositorySource + ?Sized,
{
    tracing::info!(repository = %repo, "fetching packages");

    let entries = source.list_entries(repo).await?;
    let names: Vec<String> = entries
        .into_iter()
        .filter(RepositoryEntry::is_directory)
        .map(|e| e.name)
        .collect();
    tracing::info!(?names, "found package directories");

    // `buffered` yields in input order, so the report keeps listing order
    // whatever order the fetches complete in.
    let outcomes: Vec<(String, EntryOutcome)> = stream::iter(names)
        .map(move |name| async move {
            let outcome = verify_entry(source, repo, &name).await;
            (name, outcome)
        })
        .buffered(max_concurrent.max(1))
        .collect()
        .await;

    let mut report = DiscoveryReport::default();
    for (name, outcome) in outcomes {
        report.record(&name, outcome);
    }

    tracing::info!(
        approved = report.packages.len(),
        dropped = report.diagnostics.len(),
        "discovery finished"
    );
    Ok(report)
}
