//! Runner configuration.

use crate::changelog::CHANGELOG_LABEL_PREFIX;
use crate::config::{is_repository_name, ConfigError, Settings};
use crate::references::UPSTREAM_REPOSITORY;
use std::collections::BTreeSet;

/// Configuration for a downstream sync run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// GitHub token used for API calls.
    token: String,
    /// Repository holding the upstream pull requests.
    upstream_repository: String,
    /// Prefix identifying changelog labels.
    label_prefix: String,
    /// Repositories allowed to receive changelog metadata.
    allowed_repositories: BTreeSet<String>,
    /// Whether to preview changes without writing them.
    dry_run: bool,
}

impl RunnerConfig {
    /// Creates a configuration with default upstream repository and label prefix.
    pub fn new(token: String) -> Self {
        Self {
            token,
            upstream_repository: UPSTREAM_REPOSITORY.to_string(),
            label_prefix: CHANGELOG_LABEL_PREFIX.to_string(),
            allowed_repositories: BTreeSet::new(),
            dry_run: false,
        }
    }

    /// Takes upstream repository, label prefix and allow-list from a settings file.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.upstream_repository = settings.upstream_repository;
        self.label_prefix = settings.label_prefix;
        self.allowed_repositories = settings.allowed_repositories.into_iter().collect();
        self
    }

    /// Sets the upstream repository.
    pub fn with_upstream_repository(mut self, upstream_repository: impl Into<String>) -> Self {
        self.upstream_repository = upstream_repository.into();
        self
    }

    /// Replaces the allow-list.
    pub fn with_allowed_repositories<I, S>(mut self, repositories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_repositories = repositories.into_iter().map(Into::into).collect();
        self
    }

    /// Sets dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Returns the configured GitHub token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the upstream repository.
    pub fn upstream_repository(&self) -> &str {
        &self.upstream_repository
    }

    /// Returns the changelog label prefix.
    pub fn label_prefix(&self) -> &str {
        &self.label_prefix
    }

    /// Returns the allow-list.
    pub fn allowed_repositories(&self) -> &BTreeSet<String> {
        &self.allowed_repositories
    }

    /// Returns whether dry-run mode is enabled.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Checks that a changelog sync can run with this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] when the allow-list is empty
    /// or holds a malformed repository name.
    pub fn validate_for_changelog(&self) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::ValidationError {
            path: "--repos".to_string(),
            message,
        };

        if self.allowed_repositories.is_empty() {
            return Err(invalid(
                "at least one downstream repository must be allowed".to_string(),
            ));
        }
        if let Some(bad) = self
            .allowed_repositories
            .iter()
            .find(|repo| !is_repository_name(repo))
        {
            return Err(invalid(format!(
                "repository '{bad}' is not in 'owner/name' format"
            )));
        }
        if !is_repository_name(&self.upstream_repository) {
            return Err(invalid(format!(
                "upstream repository '{}' is not in 'owner/name' format",
                self.upstream_repository
            )));
        }
        Ok(())
    }
}
