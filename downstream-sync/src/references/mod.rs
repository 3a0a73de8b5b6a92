//! Downstream pull request references.
//!
//! The code generator leaves one comment line per generated pull request on
//! the upstream pull request, in the form
//! `depends: https://github.com/<owner>/<repo>/pull/<number>`. This module
//! recognises those lines and turns the URLs into typed references. Only
//! `https://github.com` pull request URLs are recognised.

mod groups;
mod types;

pub use groups::{DownstreamGroup, DownstreamGroups};
pub use types::{DownstreamReference, UpstreamReference, UPSTREAM_REPOSITORY};

use url::Url;

/// Token that starts a downstream reference line in a comment.
pub const DOWNSTREAM_SENTINEL: &str = "depends: ";

/// Host serving downstream pull requests.
pub const GITHUB_HOST: &str = "github.com";

/// Returns the URL following [`DOWNSTREAM_SENTINEL`] on every line of
/// `comment_body` that starts with it, in order of appearance.
///
/// The sentinel must sit at the very start of the line and is matched
/// case-sensitively. Only the first whitespace-delimited token after it is
/// taken, and only when it is an `https://github.com/` URL.
#[must_use]
pub fn find_downstream_urls(comment_body: &str) -> Vec<String> {
    comment_body
        .lines()
        .filter_map(|line| line.strip_prefix(DOWNSTREAM_SENTINEL))
        .filter_map(|rest| rest.split_whitespace().next())
        .filter(|token| parse_github_url(token).is_some())
        .map(str::to_string)
        .collect()
}

fn parse_github_url(url: &str) -> Option<Url> {
    let parsed = Url::parse(url.trim()).ok()?;
    (parsed.scheme() == "https" && parsed.host_str() == Some(GITHUB_HOST)).then_some(parsed)
}

/// Parses a pull request URL of the form
/// `https://github.com/<owner>/<repo>/pull/<number>`.
///
/// Returns `None` for anything else, including pull request number 0. A
/// trailing slash, query string or fragment is tolerated.
#[must_use]
pub fn parse_pr_url(url: &str) -> Option<DownstreamReference> {
    let parsed = parse_github_url(url)?;

    let mut segments = parsed.path_segments()?.filter(|s| !s.is_empty());
    let owner = segments.next()?;
    let repo = segments.next()?;
    let kind = segments.next()?;
    let number = segments.next()?;
    if segments.next().is_some() || kind != "pull" {
        return None;
    }

    if !is_name_segment(owner) || !is_name_segment(repo) {
        return None;
    }
    if !number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let number: u64 = number.parse().ok()?;
    if number == 0 {
        return None;
    }

    Some(DownstreamReference::new(format!("{owner}/{repo}"), number))
}

/// Whether `segment` is a plausible owner or repository name.
fn is_name_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}
