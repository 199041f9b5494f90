//! Entries, trust manifests and approved packages.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of a top-level repository entry as reported by the contents listing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory; the only kind that can hold a package.
    #[serde(rename = "dir")]
    Directory,
    /// Anything else the host reports (`symlink`, `submodule`, ...).
    #[serde(other)]
    Other,
}

/// One item of the repository root listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepositoryEntry {
    /// Entry name, used as the package id when accepted.
    pub name: String,

    /// Entry kind (`type` on the wire).
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl RepositoryEntry {
    /// Create an entry from its name and kind.
    pub fn new(name: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Whether this entry is a package candidate.
    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Trust data decoded from a package's lock artifact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrustManifest {
    /// Opaque package descriptor, passed through untouched.
    pub manifest: Value,

    /// Signature marker compared against [`crate::TRUST_MARKER`].
    pub signature: String,

    /// Where the package payload can be downloaded from.
    pub download_url: String,
}

impl TrustManifest {
    /// Whether the signature is exactly [`crate::TRUST_MARKER`].
    pub fn is_trusted(&self) -> bool {
        self.signature == crate::TRUST_MARKER
    }
}

/// A package whose lock artifact passed the trust gate.
///
/// Fields are private so an instance can only come from [`ApprovedPackage::approve`],
/// which refuses any manifest that does not carry the trust marker.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApprovedPackage {
    id: String,
    manifest: Value,
    signature: String,
    download_url: String,
}

impl ApprovedPackage {
    /// Approve the package named `id` if its manifest carries the trust marker.
    ///
    /// # Errors
    ///
    /// Hands the manifest back unchanged when its signature is anything else.
    pub fn approve(id: impl Into<String>, candidate: TrustManifest) -> Result<Self, TrustManifest> {
        if !candidate.is_trusted() {
            return Err(candidate);
        }
        Ok(Self {
            id: id.into(),
            manifest: candidate.manifest,
            signature: candidate.signature,
            download_url: candidate.download_url,
        })
    }

    /// Package id (the directory name in the repository).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Opaque package descriptor.
    pub fn manifest(&self) -> &Value {
        &self.manifest
    }

    /// Signature marker the package was approved with.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Download location for the package payload.
    pub fn download_url(&self) -> &str {
        &self.download_url
    }
}
