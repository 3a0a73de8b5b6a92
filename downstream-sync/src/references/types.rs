//! Upstream and downstream pull request references.

use serde::Serialize;
use std::fmt;

/// Repository holding the upstream pull requests.
pub const UPSTREAM_REPOSITORY: &str = "GoogleCloudPlatform/magic-modules";

/// The upstream pull request that downstream pull requests were generated from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpstreamReference {
    /// Repository full name in "owner/name" format.
    pub repository: String,

    /// Pull request number.
    pub number: u64,
}

impl UpstreamReference {
    /// Creates a reference to a pull request in [`UPSTREAM_REPOSITORY`].
    #[must_use]
    pub fn new(number: u64) -> Self {
        Self::in_repository(UPSTREAM_REPOSITORY, number)
    }

    /// Creates a reference to a pull request in another upstream repository.
    #[must_use]
    pub fn in_repository(repository: impl Into<String>, number: u64) -> Self {
        Self {
            repository: repository.into(),
            number,
        }
    }
}

impl fmt::Display for UpstreamReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.repository, self.number)
    }
}

/// A generated pull request, parsed from a `depends:` line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DownstreamReference {
    /// Repository full name in "owner/name" format.
    pub repository: String,

    /// Pull request number.
    pub number: u64,
}

impl DownstreamReference {
    /// Creates a new reference.
    #[must_use]
    pub fn new(repository: impl Into<String>, number: u64) -> Self {
        Self {
            repository: repository.into(),
            number,
        }
    }

    /// Canonical GitHub URL of the pull request.
    ///
    /// References only come from `github.com` URLs, so this is the URL the
    /// reference was parsed from, minus any suffix.
    #[must_use]
    pub fn url(&self) -> String {
        format!(
            "https://{}/{}/pull/{}",
            super::GITHUB_HOST,
            self.repository,
            self.number
        )
    }
}

impl fmt::Display for DownstreamReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.repository, self.number)
    }
}
