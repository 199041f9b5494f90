//! orbit - approved-package discovery
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
//!
//! Serves the list of packages in a GitHub repository whose
//! `orbit.lock.json` carries the trust marker, or prints it once.
//!
//! # Configuration
//!
//! Every flag falls back to the environment:
//!
//! ```text
//! ORBIT_PACKAGES_REPO   owner/repo to discover from (unset = disabled)
//! GITHUB_TOKEN          optional bearer credential
//! ORBIT_API_URL         upstream base URL (default https://api.github.com)
//! ORBIT_BIND            listen address for `orbit serve`
//! RUST_LOG              log filter (default info)
//! ```

pub mod cmd;
pub mod http;

use std::net::SocketAddr;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use orbit_core::config::{
    ConfigError, DEFAULT_API_URL, DEFAULT_MAX_CONCURRENT_FETCHES, DiscoveryConfig,
};

#[derive(Debug, Parser)]
#[command(name = "orbit")]
#[command(author, version, about = "orbit - approved-package discovery")]
pub struct Cli {
    #[command(flatten)]
    pub discovery: DiscoveryArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where to discover from and how patient to be.
#[derive(Debug, Args)]
pub struct DiscoveryArgs {
    /// Repository holding one directory per package (owner/repo)
    #[arg(long, env = "ORBIT_PACKAGES_REPO", global = true)]
    pub repo: Option<String>,

    /// Bearer token for the GitHub API
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// GitHub API base URL
    #[arg(long, env = "ORBIT_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,

    /// Budget for the repository listing call, in milliseconds
    #[arg(long, default_value_t = 3000, global = true)]
    pub list_timeout_ms: u64,

    /// Budget for each lock artifact fetch, in milliseconds
    #[arg(long, default_value_t = 3000, global = true)]
    pub fetch_timeout_ms: u64,

    /// Maximum number of lock artifacts fetched at once
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENT_FETCHES, global = true)]
    pub max_concurrent_fetches: usize,
}

impl DiscoveryArgs {
    /// Build the discovery configuration these arguments describe.
    pub fn to_config(&self) -> Result<DiscoveryConfig, ConfigError> {
        DiscoveryConfig::from_parts(self.repo.as_deref(), self.token.as_deref())?
            .with_api_url(&self.api_url)
            .with_timeouts(
                Duration::from_millis(self.list_timeout_ms),
                Duration::from_millis(self.fetch_timeout_ms),
            )
            .with_max_concurrent_fetches(self.max_concurrent_fetches)
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Serve the approved-packages query over HTTP
    Serve {
        /// Address to listen on
        #[arg(long, env = "ORBIT_BIND", default_value = "127.0.0.1:3000")]
        bind: SocketAddr,
    },
    /// Run discovery once and print the approved packages as JSON
    Discover {
        /// Print the full report, diagnostics included
        #[arg(long)]
        report: bool,
    },
}
