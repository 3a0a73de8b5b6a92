//! Configuration and run inputs.
//!
//! This module handles the settings file, the pull request id file that
//! bootstraps a run, and GitHub token resolution. Everything here fails
//! before any network call is made.

mod error;
mod settings;

pub use error::ConfigError;
pub use settings::Settings;

pub(crate) use settings::is_repository_name;

use std::path::Path;
use tracing::debug;

/// Environment variables checked for a GitHub token, in order.
pub const TOKEN_ENV_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// Reads the upstream pull request number from an id file.
///
/// The file holds a single decimal number; surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file cannot be read or does not hold a
/// number.
pub fn read_pr_number(path: &Path) -> Result<u64, ConfigError> {
    debug!(path = %path.display(), "Reading pull request id file");

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.display().to_string(),
        source: e,
    })?;

    let trimmed = content.trim();
    trimmed.parse().map_err(|_| ConfigError::InvalidPrNumber {
        path: path.display().to_string(),
        content: trimmed.to_string(),
    })
}

/// Picks the GitHub token to use.
///
/// An explicit non-blank token wins, then the first non-blank variable in
/// [`TOKEN_ENV_VARS`].
///
/// # Errors
///
/// Returns [`ConfigError::MissingToken`] when no token is available.
pub fn resolve_token(explicit: Option<String>) -> Result<String, ConfigError> {
    explicit
        .into_iter()
        .chain(
            TOKEN_ENV_VARS
                .iter()
                .filter_map(|name| std::env::var(name).ok()),
        )
        .map(|token| token.trim().to_string())
        .find(|token| !token.is_empty())
        .ok_or(ConfigError::MissingToken)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn reads_pr_number_with_whitespace() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".id");
        fs::write(&path, "  1234\n").unwrap();

        assert_eq!(read_pr_number(&path).unwrap(), 1234);
    }

    #[test]
    fn rejects_non_numeric_id_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".id");
        fs::write(&path, "abc").unwrap();

        let result = read_pr_number(&path);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidPrNumber { ref content, .. }) if content == "abc"
        ));
    }

    #[test]
    fn missing_id_file() {
        let temp = TempDir::new().unwrap();
        let result = read_pr_number(&temp.path().join("missing"));
        assert!(matches!(result, Err(ConfigError::IoError { .. })));
    }

    #[test]
    fn explicit_token_wins() {
        temp_env::with_vars([("GITHUB_TOKEN", Some("env")), ("GH_TOKEN", None)], || {
            assert_eq!(resolve_token(Some("flag".to_string())).unwrap(), "flag");
        });
    }

    #[test]
    fn falls_back_to_gh_token() {
        temp_env::with_vars(
            [("GITHUB_TOKEN", Some("  ")), ("GH_TOKEN", Some("legacy"))],
            || {
                assert_eq!(resolve_token(None).unwrap(), "legacy");
            },
        );
    }

    #[test]
    fn missing_token() {
        temp_env::with_vars_unset(["GITHUB_TOKEN", "GH_TOKEN"], || {
            assert!(matches!(
                resolve_token(Some(String::new())),
                Err(ConfigError::MissingToken)
            ));
        });
    }
}
