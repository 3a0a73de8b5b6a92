//! Changelog metadata read from the upstream pull request.

use crate::changelog::{extract_release_note, filter_labels_by_prefix};
use crate::github::{ApiError, PullRequestApi};
use crate::references::UpstreamReference;
use serde::Serialize;

/// Release note and changelog labels that downstreams must carry.
///
/// Empty values are meaningful: they clear the downstream metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangelogMetadata {
    /// Trimmed release note text, empty when the upstream has none.
    pub release_note: String,

    /// Normalised changelog labels.
    pub labels: Vec<String>,
}

impl ChangelogMetadata {
    /// Extracts the metadata from a pull request body and label set.
    #[must_use]
    pub fn from_pull_request<S: AsRef<str>>(body: &str, labels: &[S], prefix: &str) -> Self {
        Self {
            release_note: extract_release_note(body),
            labels: filter_labels_by_prefix(labels, prefix),
        }
    }

    /// Whether the upstream carries neither a release note nor labels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.release_note.is_empty() && self.labels.is_empty()
    }
}

/// Fetches the upstream pull request and extracts its changelog metadata.
///
/// # Errors
///
/// Returns [`ApiError`] if the upstream pull request cannot be fetched.
pub async fn read_upstream_metadata(
    api: &dyn PullRequestApi,
    upstream: &UpstreamReference,
    label_prefix: &str,
) -> Result<ChangelogMetadata, ApiError> {
    let pull = api
        .get_pull_request(&upstream.repository, upstream.number)
        .await?;
    Ok(ChangelogMetadata::from_pull_request(
        &pull.body,
        &pull.labels,
        label_prefix,
    ))
}
