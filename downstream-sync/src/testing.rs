//! In-memory [`PullRequestApi`] used by unit tests.

use crate::github::{ApiError, PrState, PullRequestApi, PullRequestInfo};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

type Key = (String, u64);

fn key(repository: &str, number: u64) -> Key {
    (repository.to_string(), number)
}

/// Fake GitHub holding pull requests, comments and patches in memory.
///
/// Writes are applied to the stored pull requests and recorded in order.
#[derive(Default)]
pub(crate) struct FakeGitHub {
    pulls: Mutex<HashMap<Key, PullRequestInfo>>,
    comments: HashMap<Key, Vec<String>>,
    patches: HashMap<Key, String>,
    broken: HashSet<Key>,
    broken_body_updates: HashSet<Key>,
    writes: Mutex<Vec<String>>,
}

impl FakeGitHub {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_pull(self, pull: PullRequestInfo) -> Self {
        self.pulls
            .lock()
            .unwrap()
            .insert(key(&pull.repository, pull.number), pull);
        self
    }

    pub(crate) fn with_comments(mut self, repository: &str, number: u64, comments: &[&str]) -> Self {
        self.comments.insert(
            key(repository, number),
            comments.iter().map(|c| c.to_string()).collect(),
        );
        self
    }

    pub(crate) fn with_patch(mut self, repository: &str, number: u64, patch: &str) -> Self {
        self.patches.insert(key(repository, number), patch.to_string());
        self
    }

    /// Every call touching this pull request fails with a remote error.
    pub(crate) fn with_broken_pull(mut self, repository: &str, number: u64) -> Self {
        self.broken.insert(key(repository, number));
        self
    }

    /// Body updates on this pull request fail; other calls succeed.
    pub(crate) fn with_broken_body_update(mut self, repository: &str, number: u64) -> Self {
        self.broken_body_updates.insert(key(repository, number));
        self
    }

    pub(crate) fn pull(&self, repository: &str, number: u64) -> PullRequestInfo {
        self.pulls.lock().unwrap()[&key(repository, number)].clone()
    }

    pub(crate) fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }

    fn check(&self, repository: &str, number: u64) -> Result<(), ApiError> {
        if self.broken.contains(&key(repository, number)) {
            return Err(ApiError::Other(format!("{repository}#{number}: bad gateway")));
        }
        Ok(())
    }

    fn not_found(repository: &str, number: u64) -> ApiError {
        ApiError::NotFound {
            repository: repository.to_string(),
            number,
        }
    }
}

/// Builds an open, unmerged pull request.
pub(crate) fn open_pull(repository: &str, number: u64, body: &str, labels: &[&str]) -> PullRequestInfo {
    PullRequestInfo {
        repository: repository.to_string(),
        number,
        body: body.to_string(),
        labels: labels.iter().map(|l| l.to_string()).collect(),
        state: PrState::Open,
        merged: false,
        html_url: format!("https://github.com/{repository}/pull/{number}"),
    }
}

#[async_trait]
impl PullRequestApi for FakeGitHub {
    async fn get_pull_request(
        &self,
        repository: &str,
        number: u64,
    ) -> Result<PullRequestInfo, ApiError> {
        self.check(repository, number)?;
        self.pulls
            .lock()
            .unwrap()
            .get(&key(repository, number))
            .cloned()
            .ok_or_else(|| Self::not_found(repository, number))
    }

    async fn list_comment_bodies(
        &self,
        repository: &str,
        number: u64,
    ) -> Result<Vec<String>, ApiError> {
        self.check(repository, number)?;
        if !self.pulls.lock().unwrap().contains_key(&key(repository, number)) {
            return Err(Self::not_found(repository, number));
        }
        Ok(self
            .comments
            .get(&key(repository, number))
            .cloned()
            .unwrap_or_default())
    }

    async fn update_body(
        &self,
        repository: &str,
        number: u64,
        body: &str,
    ) -> Result<(), ApiError> {
        self.check(repository, number)?;
        if self.broken_body_updates.contains(&key(repository, number)) {
            return Err(ApiError::Other("body update rejected".to_string()));
        }
        let mut pulls = self.pulls.lock().unwrap();
        let pull = pulls
            .get_mut(&key(repository, number))
            .ok_or_else(|| Self::not_found(repository, number))?;
        pull.body = body.to_string();
        self.writes
            .lock()
            .unwrap()
            .push(format!("body {repository}#{number}"));
        Ok(())
    }

    async fn replace_labels(
        &self,
        repository: &str,
        number: u64,
        labels: &[String],
    ) -> Result<(), ApiError> {
        self.check(repository, number)?;
        let mut pulls = self.pulls.lock().unwrap();
        let pull = pulls
            .get_mut(&key(repository, number))
            .ok_or_else(|| Self::not_found(repository, number))?;
        pull.labels = labels.to_vec();
        self.writes
            .lock()
            .unwrap()
            .push(format!("labels {repository}#{number}"));
        Ok(())
    }

    async fn list_open_pull_requests(&self, repository: &str) -> Result<Vec<u64>, ApiError> {
        let mut numbers: Vec<u64> = self
            .pulls
            .lock()
            .unwrap()
            .values()
            .filter(|pull| pull.repository == repository && pull.state == PrState::Open)
            .map(|pull| pull.number)
            .collect();
        numbers.sort_unstable();
        Ok(numbers)
    }

    async fn get_patch(&self, repository: &str, number: u64) -> Result<String, ApiError> {
        self.check(repository, number)?;
        self.patches
            .get(&key(repository, number))
            .cloned()
            .ok_or_else(|| Self::not_found(repository, number))
    }
}
