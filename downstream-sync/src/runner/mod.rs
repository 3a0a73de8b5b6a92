//! Orchestrates downstream sync runs.
//!
//! A [`Runner`] owns the API handle for the lifetime of one invocation and
//! exposes one method per command. The changelog sync is split into a
//! read-only [`Runner::prepare_changelog`] step and a writing
//! [`Runner::apply_changelog`] step, so callers can show the upstream
//! metadata before anything downstream changes.

mod config;
mod error;

pub use config::RunnerConfig;
pub use error::RunnerError;

use crate::downstream::{grouped_downstreams, list_downstream_urls};
use crate::github::{GitHubClient, PullRequestApi};
use crate::patches::{download_merged_patches, PatchReport};
use crate::references::{DownstreamGroups, UpstreamReference};
use crate::summary::SyncSummary;
use crate::sync::{
    apply_changelog, find_unmerged_downstreams, read_upstream_metadata, ChangelogMetadata,
    SyncOptions,
};
use std::path::Path;
use tracing::{info, warn};

/// Everything read from GitHub before a changelog sync writes anything.
#[derive(Debug, Clone)]
pub struct ChangelogPlan {
    /// The upstream pull request.
    pub upstream: UpstreamReference,

    /// Metadata that every allowed downstream will carry.
    pub metadata: ChangelogMetadata,

    /// Downstream pull requests, grouped by repository.
    pub groups: DownstreamGroups,
}

/// Runs sync commands against one API handle.
pub struct Runner<A: PullRequestApi = GitHubClient> {
    config: RunnerConfig,
    api: A,
}

impl Runner<GitHubClient> {
    /// Builds a runner talking to GitHub with the configured token.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let api = GitHubClient::new(config.token())?;
        Ok(Self { config, api })
    }
}

impl<A: PullRequestApi> Runner<A> {
    /// Builds a runner on top of any [`PullRequestApi`].
    pub fn with_api(config: RunnerConfig, api: A) -> Self {
        Self { config, api }
    }

    /// Returns the run configuration.
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Reference to pull request `number` in the configured upstream repository.
    pub fn upstream(&self, number: u64) -> UpstreamReference {
        UpstreamReference::in_repository(self.config.upstream_repository(), number)
    }

    /// Validates the configuration, then reads the upstream metadata and
    /// resolves the downstreams. Nothing is written.
    pub async fn prepare_changelog(&self, number: u64) -> Result<ChangelogPlan, RunnerError> {
        self.config.validate_for_changelog()?;

        let upstream = self.upstream(number);
        info!(upstream = %upstream, "Reading upstream changelog metadata");
        let metadata =
            read_upstream_metadata(&self.api, &upstream, self.config.label_prefix()).await?;
        info!(
            release_note = %metadata.release_note,
            labels = ?metadata.labels,
            "Upstream changelog metadata"
        );
        if metadata.is_empty() {
            warn!("Upstream pull request has no release note or changelog labels");
        }

        let groups = grouped_downstreams(&self.api, &upstream).await?;
        info!(repositories = groups.len(), "Resolved downstream pull requests");

        Ok(ChangelogPlan {
            upstream,
            metadata,
            groups,
        })
    }

    /// Writes the planned metadata to every allowed downstream.
    pub async fn apply_changelog(&self, plan: &ChangelogPlan) -> SyncSummary {
        let options = SyncOptions::new(self.config.allowed_repositories().iter().cloned())
            .with_label_prefix(self.config.label_prefix())
            .with_dry_run(self.config.dry_run());

        let results = apply_changelog(&self.api, &plan.groups, &plan.metadata, &options).await;
        SyncSummary::from_results(plan.metadata.clone(), self.config.dry_run(), &results)
    }

    /// Returns the URLs of downstream pull requests that are still open.
    pub async fn ensure_merged(&self, number: u64) -> Result<Vec<String>, RunnerError> {
        let upstream = self.upstream(number);
        let unmerged = find_unmerged_downstreams(&self.api, &upstream).await?;
        if unmerged.is_empty() {
            info!(upstream = %upstream, "All downstream pull requests are merged or closed");
        }
        Ok(unmerged)
    }

    /// Returns every downstream URL referenced from the upstream pull request.
    pub async fn list_downstreams(&self, number: u64) -> Result<Vec<String>, RunnerError> {
        Ok(list_downstream_urls(&self.api, &self.upstream(number)).await?)
    }

    /// Saves the patches of merged downstreams of all open upstream pull requests.
    pub async fn download_patches(&self, output_dir: &Path) -> Result<PatchReport, RunnerError> {
        Ok(download_merged_patches(&self.api, self.config.upstream_repository(), output_dir).await?)
    }
}
