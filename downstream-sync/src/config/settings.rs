//! Settings file deserialization.

use crate::changelog::CHANGELOG_LABEL_PREFIX;
use crate::config::ConfigError;
use crate::references::UPSTREAM_REPOSITORY;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Parsed contents of a settings TOML file.
///
/// ```toml
/// upstream-repository = "GoogleCloudPlatform/magic-modules"
/// label-prefix = "changelog: "
/// allowed-repositories = [
///     "terraform-providers/terraform-provider-google",
///     "terraform-providers/terraform-provider-google-beta",
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Settings {
    /// Repository holding the upstream pull requests.
    #[serde(default = "default_upstream_repository")]
    pub upstream_repository: String,

    /// Prefix identifying changelog labels.
    #[serde(default = "default_label_prefix")]
    pub label_prefix: String,

    /// Repositories whose downstream pull requests receive changelog metadata.
    #[serde(default)]
    pub allowed_repositories: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            upstream_repository: default_upstream_repository(),
            label_prefix: default_label_prefix(),
            allowed_repositories: Vec::new(),
        }
    }
}

pub(crate) fn default_upstream_repository() -> String {
    UPSTREAM_REPOSITORY.to_string()
}

pub(crate) fn default_label_prefix() -> String {
    CHANGELOG_LABEL_PREFIX.to_string()
}

impl Settings {
    /// Loads and validates settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, parsed or validated.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "Loading settings");

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;
        let settings: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlError {
            path: path.display().to_string(),
            source: e,
        })?;

        settings.validate(path)?;
        Ok(settings)
    }

    /// Validates repository names and the label prefix.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] on the first invalid field.
    pub fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::ValidationError {
            path: path.display().to_string(),
            message,
        };

        if !is_repository_name(&self.upstream_repository) {
            return Err(invalid(format!(
                "upstream-repository '{}' is not in 'owner/name' format",
                self.upstream_repository
            )));
        }

        if self.label_prefix.trim().is_empty() {
            return Err(invalid("label-prefix must not be empty".to_string()));
        }

        if let Some(bad) = self
            .allowed_repositories
            .iter()
            .find(|repo| !is_repository_name(repo))
        {
            return Err(invalid(format!(
                "allowed repository '{bad}' is not in 'owner/name' format"
            )));
        }

        Ok(())
    }
}

/// Whether `name` looks like "owner/name".
pub(crate) fn is_repository_name(name: &str) -> bool {
    let mut parts = name.split('/');
    let valid_part = |part: Option<&str>| {
        part.is_some_and(|p| {
            !p.is_empty()
                && p.chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        })
    };
    valid_part(parts.next()) && valid_part(parts.next()) && parts.next().is_none()
}
