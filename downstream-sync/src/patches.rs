//! Download of merged downstream patches.
//!
//! For every open upstream pull request, the patches of downstream pull
//! requests that have already merged are saved as
//! `<output>/<owner>/<repo>/<number>.patch`. Patches already on disk are
//! never downloaded again.

use crate::downstream::grouped_downstreams;
use crate::github::{ApiError, PullRequestApi};
use crate::references::{DownstreamReference, UpstreamReference};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, info_span, warn, Instrument};

/// Errors that abort a patch download run.
#[derive(Debug, Error)]
pub enum PatchError {
    /// Listing open upstream pull requests failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Writing a patch to disk failed.
    #[error("Failed to write patch '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A pull request whose patch could not be obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchFailure {
    /// Upstream or downstream pull request, as "owner/name#number".
    pub target: String,

    /// Error message.
    pub error: String,
}

/// Outcome of a patch download run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PatchReport {
    /// Patches written during this run.
    pub downloaded: Vec<PathBuf>,

    /// Patches that were already on disk.
    pub existing: Vec<PathBuf>,

    /// Pull requests that could not be processed.
    pub failures: Vec<PatchFailure>,
}

impl PatchReport {
    /// Returns true if any pull request could not be processed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    fn fail(&mut self, target: impl ToString, error: &ApiError) {
        self.failures.push(PatchFailure {
            target: target.to_string(),
            error: error.to_string(),
        });
    }
}

/// Location of the patch file for a downstream pull request.
#[must_use]
pub fn patch_path(output_dir: &Path, reference: &DownstreamReference) -> PathBuf {
    output_dir
        .join(&reference.repository)
        .join(format!("{}.patch", reference.number))
}

/// Downloads the patches of every merged downstream of every open upstream
/// pull request in `upstream_repository`.
///
/// # Errors
///
/// Returns [`PatchError`] if the open pull requests cannot be listed or a
/// patch cannot be written. Failures on individual pull requests are
/// recorded in the report instead.
pub async fn download_merged_patches(
    api: &dyn PullRequestApi,
    upstream_repository: &str,
    output_dir: &Path,
) -> Result<PatchReport, PatchError> {
    let span = info_span!(
        "download_merged_patches",
        upstream = %upstream_repository,
        output = %output_dir.display()
    );

    async {
        let mut report = PatchReport::default();
        let open = api.list_open_pull_requests(upstream_repository).await?;
        info!(count = open.len(), "Found open upstream pull requests");

        for number in open {
            let upstream = UpstreamReference::in_repository(upstream_repository, number);
            info!(upstream = %upstream, "Downloading patches for upstream pull request");

            let groups = match grouped_downstreams(api, &upstream).await {
                Ok(groups) => groups,
                Err(e) => {
                    warn!(upstream = %upstream, error = %e, "Failed to resolve downstreams");
                    report.fail(&upstream, &e);
                    continue;
                }
            };

            for reference in groups.references() {
                download_if_merged(api, reference, output_dir, &mut report).await?;
            }
        }

        info!(
            downloaded = report.downloaded.len(),
            existing = report.existing.len(),
            failed = report.failures.len(),
            "Patch download complete"
        );
        Ok(report)
    }
    .instrument(span)
    .await
}

async fn download_if_merged(
    api: &dyn PullRequestApi,
    reference: &DownstreamReference,
    output_dir: &Path,
    report: &mut PatchReport,
) -> Result<(), PatchError> {
    let path = patch_path(output_dir, reference);
    if path.exists() {
        debug!(path = %path.display(), "Patch already downloaded");
        report.existing.push(path);
        return Ok(());
    }

    let pull = match api
        .get_pull_request(&reference.repository, reference.number)
        .await
    {
        Ok(pull) => pull,
        Err(e) => {
            warn!(downstream = %reference, error = %e, "Failed to fetch downstream");
            report.fail(reference, &e);
            return Ok(());
        }
    };

    if !pull.merged {
        debug!(downstream = %reference, "Downstream not merged, skipping");
        return Ok(());
    }

    let patch = match api.get_patch(&reference.repository, reference.number).await {
        Ok(patch) => patch,
        Err(e) => {
            warn!(downstream = %reference, error = %e, "Failed to download patch");
            report.fail(reference, &e);
            return Ok(());
        }
    };

    write_patch(&path, &patch).await?;
    info!(path = %path.display(), "Saved patch");
    report.downloaded.push(path);
    Ok(())
}

async fn write_patch(path: &Path, patch: &str) -> Result<(), PatchError> {
    let io_error = |source| PatchError::IoError {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
    }
    tokio::fs::write(path, patch).await.map_err(io_error)
}
