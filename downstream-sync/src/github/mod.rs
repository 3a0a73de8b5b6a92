//! Access to pull requests on the hosting platform.
//!
//! Everything that touches the network goes through [`PullRequestApi`], which
//! is passed explicitly to the resolver and the sync operations. The real
//! implementation is [`GitHubClient`]; tests substitute fakes and mocks.

mod client;
mod error;
mod rate_limit;

pub use client::GitHubClient;
pub use error::ApiError;
pub use rate_limit::{check_core_rate_limit, ensure_core_rate_limit, RateLimitInfo};

use async_trait::async_trait;
use serde::Serialize;

/// Open/closed state of a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrState {
    /// Pull request is open.
    Open,
    /// Pull request is closed, merged or not.
    Closed,
}

/// The parts of a pull request the sync needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestInfo {
    /// Repository full name in "owner/name" format.
    pub repository: String,

    /// Pull request number.
    pub number: u64,

    /// Description text, empty when unset.
    pub body: String,

    /// Label names.
    pub labels: Vec<String>,

    /// Open/closed state.
    pub state: PrState,

    /// Whether the pull request has been merged.
    pub merged: bool,

    /// Browser URL of the pull request.
    pub html_url: String,
}

impl PullRequestInfo {
    /// Whether the pull request still blocks the upstream: open and not merged.
    ///
    /// A pull request closed without merging counts as resolved.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        !self.merged && self.state == PrState::Open
    }
}

/// Pull request operations used by the sync.
///
/// Repositories are passed in "owner/name" format.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PullRequestApi: Send + Sync {
    /// Fetches a single pull request.
    async fn get_pull_request(
        &self,
        repository: &str,
        number: u64,
    ) -> Result<PullRequestInfo, ApiError>;

    /// Lists the bodies of all issue comments on a pull request, oldest first.
    async fn list_comment_bodies(
        &self,
        repository: &str,
        number: u64,
    ) -> Result<Vec<String>, ApiError>;

    /// Replaces the description of a pull request.
    async fn update_body(&self, repository: &str, number: u64, body: &str)
        -> Result<(), ApiError>;

    /// Replaces the full label set of a pull request.
    async fn replace_labels(
        &self,
        repository: &str,
        number: u64,
        labels: &[String],
    ) -> Result<(), ApiError>;

    /// Lists the numbers of all open pull requests in a repository.
    async fn list_open_pull_requests(&self, repository: &str) -> Result<Vec<u64>, ApiError>;

    /// Downloads a pull request as a patch in `git format-patch` form.
    async fn get_patch(&self, repository: &str, number: u64) -> Result<String, ApiError>;
}

/// Splits "owner/name" into its two halves.
///
/// # Errors
///
/// Returns [`ApiError::InvalidRepository`] for anything else.
pub fn split_repository(repository: &str) -> Result<(&str, &str), ApiError> {
    match repository.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok((owner, name))
        }
        _ => Err(ApiError::InvalidRepository {
            repository: repository.to_string(),
        }),
    }
}
