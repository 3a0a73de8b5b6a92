//! Runner error types.

/// Errors that abort a run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Configuration and input loading errors.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// Upstream pull request could not be read.
    #[error(transparent)]
    Api(#[from] crate::github::ApiError),

    /// Patch download aborted.
    #[error(transparent)]
    Patch(#[from] crate::patches::PatchError),

    /// GitHub API client initialization errors.
    #[error(transparent)]
    Octocrab(#[from] octocrab::Error),
}
