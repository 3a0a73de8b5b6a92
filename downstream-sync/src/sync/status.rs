//! Per-downstream sync outcomes.

use crate::references::DownstreamReference;
use serde::Serialize;

/// Outcome of syncing one downstream pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncStatus {
    /// Release note and labels were written.
    Updated {
        /// Pull request URL.
        url: String,
    },

    /// Nothing was written.
    Skipped {
        /// Reason for skipping.
        reason: String,
    },

    /// At least one write failed.
    Failed {
        /// Error message.
        error: String,
    },
}

impl SyncStatus {
    /// Returns the status as a string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Updated { .. } => "updated",
            Self::Skipped { .. } => "skipped",
            Self::Failed { .. } => "failed",
        }
    }

    pub(crate) fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }
}

/// A downstream pull request together with what happened to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncResult {
    /// The downstream pull request.
    pub reference: DownstreamReference,

    /// What happened.
    #[serde(flatten)]
    pub status: SyncStatus,
}

impl SyncResult {
    /// Whether a write to this downstream failed.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self.status, SyncStatus::Failed { .. })
    }
}
