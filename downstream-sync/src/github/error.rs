//! GitHub API error types.

use thiserror::Error;

/// Errors returned by a [`PullRequestApi`](super::PullRequestApi).
#[derive(Debug, Error)]
pub enum ApiError {
    /// GitHub API error.
    #[error("GitHub API error: {0}")]
    GitHubError(#[from] octocrab::Error),

    /// The pull request does not exist or is not visible to the token.
    #[error("Pull request {repository}#{number} not found")]
    NotFound { repository: String, number: u64 },

    /// Repository name is not in "owner/name" format.
    #[error("Invalid repository name '{repository}', expected 'owner/name'")]
    InvalidRepository { repository: String },

    /// Any other failure reported by an API implementation.
    #[error("{0}")]
    Other(String),
}

impl ApiError {
    /// Whether this error means the requested resource does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::GitHubError(e) => is_not_found_status(github_status(e)),
            _ => false,
        }
    }
}

/// HTTP status GitHub answers with for a missing resource.
const NOT_FOUND_STATUS: u16 = 404;

/// HTTP status of an error response from GitHub, if the error is one.
pub(crate) fn github_status(error: &octocrab::Error) -> Option<u16> {
    match error {
        octocrab::Error::GitHub { source, .. } => Some(source.status_code.as_u16()),
        _ => None,
    }
}

/// Whether a response status means the resource does not exist.
pub(crate) fn is_not_found_status(status: Option<u16>) -> bool {
    status == Some(NOT_FOUND_STATUS)
}
