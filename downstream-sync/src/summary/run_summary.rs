//! Sync run summary.

use crate::sync::{ChangelogMetadata, SyncResult, SyncStatus};
use serde::Serialize;

/// A downstream pull request that could not be synced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedDownstream {
    /// Pull request URL.
    pub url: String,

    /// Error message.
    pub error: String,
}

/// Summary of a complete changelog sync.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncSummary {
    /// Metadata read from the upstream pull request.
    pub metadata: ChangelogMetadata,

    /// Number of downstream pull requests updated.
    pub updated: usize,

    /// Number of downstream pull requests skipped (allow-list, missing, dry run).
    pub skipped: usize,

    /// Downstream pull requests that failed to update.
    pub failed: Vec<FailedDownstream>,

    /// Whether this was a dry run.
    pub dry_run: bool,
}

impl SyncSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new(metadata: ChangelogMetadata, dry_run: bool) -> Self {
        Self {
            metadata,
            dry_run,
            ..Default::default()
        }
    }

    /// Builds a summary from a list of results.
    #[must_use]
    pub fn from_results(metadata: ChangelogMetadata, dry_run: bool, results: &[SyncResult]) -> Self {
        let mut summary = Self::new(metadata, dry_run);
        for result in results {
            summary.record_result(result);
        }
        summary
    }

    /// Updates the summary with a sync result.
    pub fn record_result(&mut self, result: &SyncResult) {
        match &result.status {
            SyncStatus::Updated { .. } => self.updated += 1,
            SyncStatus::Skipped { .. } => self.skipped += 1,
            SyncStatus::Failed { error } => self.failed.push(FailedDownstream {
                url: result.reference.url(),
                error: error.clone(),
            }),
        }
    }

    /// Returns true if any downstream failed to update.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Renders the summary as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
