//! Changelog propagation and merge checks for downstream pull requests.
//!
//! The upstream pull request is the source of truth. Its release note and
//! changelog labels overwrite those on every allowed downstream, including
//! when the upstream has none, in which case the downstream metadata is
//! cleared.

mod metadata;
mod status;

pub use metadata::{read_upstream_metadata, ChangelogMetadata};
pub use status::{SyncResult, SyncStatus};

use crate::changelog::{replace_prefixed_labels, replace_release_note, CHANGELOG_LABEL_PREFIX};
use crate::downstream::grouped_downstreams;
use crate::github::{ApiError, PullRequestApi};
use crate::references::{DownstreamGroups, DownstreamReference, UpstreamReference};
use std::collections::BTreeSet;
use tracing::{debug, error, info, info_span, warn, Instrument};

/// Reason recorded for downstreams in repositories outside the allow-list.
pub const NOT_ALLOWED_REASON: &str = "not in allow-list";

/// Reason recorded for downstreams that no longer exist.
pub const NOT_FOUND_REASON: &str = "pull request not found";

/// Reason recorded for every allowed downstream in dry-run mode.
pub const DRY_RUN_REASON: &str = "dry run";

/// Settings for a changelog sync.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Repositories that may receive metadata, in "owner/name" format.
    pub allowed_repositories: BTreeSet<String>,

    /// Prefix identifying changelog labels.
    pub label_prefix: String,

    /// Compute changes without writing them.
    pub dry_run: bool,
}

impl SyncOptions {
    /// Creates options for the given allow-list with the default label prefix.
    pub fn new<I, S>(allowed_repositories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_repositories: allowed_repositories.into_iter().map(Into::into).collect(),
            label_prefix: CHANGELOG_LABEL_PREFIX.to_string(),
            dry_run: false,
        }
    }

    /// Sets a custom label prefix.
    #[must_use]
    pub fn with_label_prefix(mut self, label_prefix: impl Into<String>) -> Self {
        self.label_prefix = label_prefix.into();
        self
    }

    /// Enables or disables dry-run mode.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Whether `repository` may receive metadata.
    #[must_use]
    pub fn is_allowed(&self, repository: &str) -> bool {
        self.allowed_repositories.contains(repository)
    }
}

/// Copies the upstream release note and changelog labels onto every
/// downstream pull request.
///
/// Downstreams are visited repository by repository in discovery order. A
/// failure on one downstream is recorded and the rest are still attempted.
///
/// # Errors
///
/// Returns [`ApiError`] only when the upstream pull request or its comments
/// cannot be read.
pub async fn sync_changelog(
    api: &dyn PullRequestApi,
    upstream: &UpstreamReference,
    options: &SyncOptions,
) -> Result<Vec<SyncResult>, ApiError> {
    let span = info_span!("sync_changelog", upstream = %upstream);

    async {
        let metadata = read_upstream_metadata(api, upstream, &options.label_prefix).await?;
        info!(
            release_note = %metadata.release_note,
            labels = ?metadata.labels,
            "Read upstream changelog metadata"
        );
        if metadata.is_empty() {
            info!("Upstream has no release note or labels, clearing downstream metadata");
        }

        let groups = grouped_downstreams(api, upstream).await?;
        Ok(apply_changelog(api, &groups, &metadata, options).await)
    }
    .instrument(span)
    .await
}

/// Applies already-read metadata to already-resolved downstreams.
pub async fn apply_changelog(
    api: &dyn PullRequestApi,
    groups: &DownstreamGroups,
    metadata: &ChangelogMetadata,
    options: &SyncOptions,
) -> Vec<SyncResult> {
    let mut results = Vec::new();

    for group in groups {
        let allowed = options.is_allowed(&group.repository);
        if !allowed {
            debug!(repo = %group.repository, "Skipping repository outside allow-list");
        }

        for reference in &group.references {
            let status = if allowed {
                apply_to_downstream(api, reference, metadata, options).await
            } else {
                SyncStatus::skipped(NOT_ALLOWED_REASON)
            };
            results.push(SyncResult {
                reference: reference.clone(),
                status,
            });
        }
    }

    results
}

async fn apply_to_downstream(
    api: &dyn PullRequestApi,
    reference: &DownstreamReference,
    metadata: &ChangelogMetadata,
    options: &SyncOptions,
) -> SyncStatus {
    let span = info_span!("apply_changelog", downstream = %reference);

    async {
        let pull = match api
            .get_pull_request(&reference.repository, reference.number)
            .await
        {
            Ok(pull) => pull,
            Err(e) if e.is_not_found() => {
                warn!("Downstream pull request not found, skipping");
                return SyncStatus::skipped(NOT_FOUND_REASON);
            }
            Err(e) => {
                error!(error = %e, "Failed to fetch downstream pull request");
                return SyncStatus::Failed {
                    error: format!("failed to fetch pull request: {e}"),
                };
            }
        };

        let body = replace_release_note(&pull.body, &metadata.release_note);
        let labels = replace_prefixed_labels(&pull.labels, &metadata.labels, &options.label_prefix);

        if options.dry_run {
            info!(
                url = %pull.html_url,
                body_changed = body != pull.body,
                labels = ?labels,
                "[DRY RUN] Would set changelog metadata"
            );
            return SyncStatus::skipped(DRY_RUN_REASON);
        }

        info!(url = %pull.html_url, "Setting changelog metadata");
        let mut errors = Vec::new();

        if let Err(e) = api
            .update_body(&reference.repository, reference.number, &body)
            .await
        {
            error!(error = %e, "Failed to update release note");
            errors.push(format!("release note update failed: {e}"));
        }

        if let Err(e) = api
            .replace_labels(&reference.repository, reference.number, &labels)
            .await
        {
            error!(error = %e, "Failed to replace labels");
            errors.push(format!("label update failed: {e}"));
        }

        if errors.is_empty() {
            SyncStatus::Updated { url: pull.html_url }
        } else {
            SyncStatus::Failed {
                error: errors.join("; "),
            }
        }
    }
    .instrument(span)
    .await
}

/// Returns the URLs of downstream pull requests that are still open.
///
/// Every downstream is checked regardless of the allow-list. Merged and
/// closed pull requests are resolved. Downstreams that no longer exist are
/// skipped. A downstream whose state cannot be read is reported as unmerged
/// under its canonical URL, since it cannot be shown to be merged.
///
/// # Errors
///
/// Returns [`ApiError`] when the upstream comments cannot be read.
pub async fn find_unmerged_downstreams(
    api: &dyn PullRequestApi,
    upstream: &UpstreamReference,
) -> Result<Vec<String>, ApiError> {
    let span = info_span!("find_unmerged_downstreams", upstream = %upstream);

    async {
        let groups = grouped_downstreams(api, upstream).await?;
        let mut unmerged = Vec::new();

        for reference in groups.references() {
            match api
                .get_pull_request(&reference.repository, reference.number)
                .await
            {
                Ok(pull) if pull.is_pending() => {
                    info!(url = %pull.html_url, "Downstream pull request is not merged");
                    unmerged.push(pull.html_url);
                }
                Ok(pull) => {
                    debug!(url = %pull.html_url, merged = pull.merged, "Downstream resolved");
                }
                Err(e) if e.is_not_found() => {
                    warn!(downstream = %reference, "Downstream pull request not found, skipping");
                }
                Err(e) => {
                    error!(
                        downstream = %reference,
                        error = %e,
                        "Failed to check downstream, counting it as unmerged"
                    );
                    unmerged.push(reference.url());
                }
            }
        }

        Ok(unmerged)
    }
    .instrument(span)
    .await
}
