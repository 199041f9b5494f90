//! The `owner/repo` coordinate of the package repository.

use std::fmt;
use std::str::FromStr;

/// Package repository on the GitHub host, split into its two path segments.
///
/// ```
/// use orbit_core::repo::GitHubRepo;
///
/// let repo: GitHubRepo = " orbit-os/packages ".parse().unwrap();
/// assert_eq!((repo.owner(), repo.name()), ("orbit-os", "packages"));
/// assert_eq!(repo.to_string(), "orbit-os/packages");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GitHubRepo {
    owner: String,
    name: String,
}

impl GitHubRepo {
    /// Parse `owner/repo`, ignoring surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Describes the input when it has no slash, more than one slash, or an
    /// empty side.
    pub fn new(raw: &str) -> Result<Self, String> {
        let raw = raw.trim();
        match raw.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(format!("expected 'owner/repo', got '{raw}'")),
        }
    }

    /// Account or organization that owns the repository.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name under [`Self::owner`].
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for GitHubRepo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for GitHubRepo {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
