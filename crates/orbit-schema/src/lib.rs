//! Shared types and wire format for Orbit package discovery.
//!
//! These types are produced by `orbit-core` and serialized verbatim by the
//! `orbit` binary, so their serde representation is the public contract.

pub mod types;

// Re-exports
pub use types::*;

/// The only signature value the trust gate accepts.
pub const TRUST_MARKER: &str = "orbit-signed";

/// Well-known file carrying trust metadata inside each package directory.
pub const LOCK_FILE_NAME: &str = "orbit.lock.json";
