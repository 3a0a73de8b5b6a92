#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod changelog;
pub mod config;
pub mod downstream;
pub mod github;
pub mod patches;
pub mod references;
pub mod runner;
pub mod summary;
pub mod sync;

#[cfg(test)]
mod testing;

pub use changelog::{
    extract_release_note, filter_labels_by_prefix, format_release_note, replace_prefixed_labels,
    replace_release_note, CHANGELOG_LABEL_PREFIX, RELEASE_NOTE_TAG,
};
pub use config::{read_pr_number, resolve_token, ConfigError, Settings};
pub use downstream::{grouped_downstreams, list_downstream_urls};
pub use github::{ApiError, GitHubClient, PrState, PullRequestApi, PullRequestInfo};
pub use patches::{download_merged_patches, PatchError, PatchReport};
pub use references::{
    find_downstream_urls, parse_pr_url, DownstreamGroups, DownstreamReference,
    UpstreamReference, UPSTREAM_REPOSITORY,
};
pub use runner::{ChangelogPlan, Runner, RunnerConfig, RunnerError};
pub use summary::{FailedDownstream, SyncSummary};
pub use sync::{
    find_unmerged_downstreams, read_upstream_metadata, sync_changelog, ChangelogMetadata,
    SyncOptions, SyncResult, SyncStatus,
};
