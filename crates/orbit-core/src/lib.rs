//! Core library for Orbit: discovers the packages published in a GitHub
//! repository and keeps only those whose lock artifact carries the trust
//! marker.
//!
//! # Pipeline
//!
//! ```text
//! discovery::discover_approved_packages
//!   └─ RepositorySource::list_entries            (one call, time-bounded)
//!        └─ per directory entry, bounded fan-out:
//!             RepositorySource::fetch_lock_artifact  (time-bounded)
//!             decode::decode_lock_artifact
//!             ApprovedPackage::approve (trust gate)
//! ```
//!
//! Nothing in the pipeline returns an error to its caller. Failures are
//! logged and recorded as [`discovery::Diagnostic`] values on the report.

pub mod config;
pub mod connection;
pub mod decode;
pub mod discovery;
pub mod gate;
pub mod registry;
pub mod repo;

pub use config::{ConfigError, DiscoveryConfig};
pub use discovery::{DiscoveryReport, discover_approved_packages};
pub use registry::{GitHubSource, RegistryError, RepositorySource};
pub use repo::GitHubRepo;

/// User Agent string for upstream requests
pub const USER_AGENT: &str = concat!("orbit/", env!("CARGO_PKG_VERSION"));
