//! [`PullRequestApi`] implementation backed by octocrab.

use super::error::{github_status, is_not_found_status};
use super::rate_limit::ensure_core_rate_limit;
use super::{split_repository, ApiError, PrState, PullRequestApi, PullRequestInfo};
use async_trait::async_trait;
use octocrab::models::IssueState;
use octocrab::{params, Octocrab};
use tracing::debug;

/// Results per page for list calls.
const RESULTS_PER_PAGE: u8 = 100;

/// GitHub REST client.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    octocrab: Octocrab,
}

impl GitHubClient {
    /// Builds an authenticated client from a personal access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(token: impl Into<String>) -> Result<Self, octocrab::Error> {
        let octocrab = Octocrab::builder().personal_token(token.into()).build()?;
        Ok(Self { octocrab })
    }

    /// Wraps an already configured octocrab instance.
    #[must_use]
    pub fn from_octocrab(octocrab: Octocrab) -> Self {
        Self { octocrab }
    }
}

/// Turns a 404 response from GitHub into [`ApiError::NotFound`].
///
/// Only the response status decides; error text is never inspected.
fn classify(error: octocrab::Error, repository: &str, number: u64) -> ApiError {
    if is_not_found_status(github_status(&error)) {
        ApiError::NotFound {
            repository: repository.to_string(),
            number,
        }
    } else {
        ApiError::GitHubError(error)
    }
}

#[async_trait]
impl PullRequestApi for GitHubClient {
    async fn get_pull_request(
        &self,
        repository: &str,
        number: u64,
    ) -> Result<PullRequestInfo, ApiError> {
        let (owner, name) = split_repository(repository)?;
        debug!(repo = %repository, number, "Fetching pull request");

        ensure_core_rate_limit(&self.octocrab).await?;
        let pr = self
            .octocrab
            .pulls(owner, name)
            .get(number)
            .await
            .map_err(|e| classify(e, repository, number))?;

        let state = match pr.state {
            Some(IssueState::Closed) => PrState::Closed,
            _ => PrState::Open,
        };
        let html_url = pr
            .html_url
            .as_ref()
            .map(|u| u.to_string())
            .unwrap_or_else(|| format!("https://github.com/{repository}/pull/{number}"));

        Ok(PullRequestInfo {
            repository: repository.to_string(),
            number: pr.number,
            body: pr.body.unwrap_or_default(),
            labels: pr
                .labels
                .unwrap_or_default()
                .into_iter()
                .map(|label| label.name)
                .collect(),
            state,
            merged: pr.merged.unwrap_or(false) || pr.merged_at.is_some(),
            html_url,
        })
    }

    async fn list_comment_bodies(
        &self,
        repository: &str,
        number: u64,
    ) -> Result<Vec<String>, ApiError> {
        let (owner, name) = split_repository(repository)?;
        debug!(repo = %repository, number, "Listing issue comments");

        ensure_core_rate_limit(&self.octocrab).await?;
        let page = self
            .octocrab
            .issues(owner, name)
            .list_comments(number)
            .per_page(RESULTS_PER_PAGE)
            .send()
            .await
            .map_err(|e| classify(e, repository, number))?;
        let comments = self.octocrab.all_pages(page).await?;

        Ok(comments
            .into_iter()
            .map(|comment| comment.body.unwrap_or_default())
            .collect())
    }

    async fn update_body(
        &self,
        repository: &str,
        number: u64,
        body: &str,
    ) -> Result<(), ApiError> {
        let (owner, name) = split_repository(repository)?;

        ensure_core_rate_limit(&self.octocrab).await?;
        self.octocrab
            .pulls(owner, name)
            .update(number)
            .body(body)
            .send()
            .await
            .map_err(|e| classify(e, repository, number))?;
        Ok(())
    }

    async fn replace_labels(
        &self,
        repository: &str,
        number: u64,
        labels: &[String],
    ) -> Result<(), ApiError> {
        let (owner, name) = split_repository(repository)?;

        ensure_core_rate_limit(&self.octocrab).await?;
        self.octocrab
            .issues(owner, name)
            .replace_all_labels(number, labels)
            .await
            .map_err(|e| classify(e, repository, number))?;
        Ok(())
    }

    async fn list_open_pull_requests(&self, repository: &str) -> Result<Vec<u64>, ApiError> {
        let (owner, name) = split_repository(repository)?;
        debug!(repo = %repository, "Listing open pull requests");

        ensure_core_rate_limit(&self.octocrab).await?;
        let page = self
            .octocrab
            .pulls(owner, name)
            .list()
            .state(params::State::Open)
            .per_page(RESULTS_PER_PAGE)
            .send()
            .await?;
        let pulls = self.octocrab.all_pages(page).await?;

        Ok(pulls.into_iter().map(|pr| pr.number).collect())
    }

    async fn get_patch(&self, repository: &str, number: u64) -> Result<String, ApiError> {
        let (owner, name) = split_repository(repository)?;

        ensure_core_rate_limit(&self.octocrab).await?;
        self.octocrab
            .pulls(owner, name)
            .get_patch(number)
            .await
            .map_err(|e| classify(e, repository, number))
    }
}
