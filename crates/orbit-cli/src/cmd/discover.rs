//! Discover command

use std::io::Write;

use anyhow::{Context, Result};
use orbit_core::{DiscoveryConfig, GitHubSource, discover_approved_packages};

/// Run discovery once and write JSON to stdout.
///
/// Like the HTTP route, this succeeds even when upstream is unreachable;
/// `--report` shows why the list came back short.
pub async fn discover(config: &DiscoveryConfig, full_report: bool) -> Result<()> {
    let source = GitHubSource::new(config).context("Failed to build GitHub client")?;
    let report = discover_approved_packages(&source, config).await;

    let mut stdout = std::io::stdout().lock();
    if full_report {
        serde_json::to_writer_pretty(&mut stdout, &report)?;
    } else {
        serde_json::to_writer_pretty(&mut stdout, &report.packages)?;
    }
    writeln!(stdout)?;

    Ok(())
}
