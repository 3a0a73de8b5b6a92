//! Resolution of the downstream pull requests generated from an upstream one.

use crate::github::{ApiError, PullRequestApi};
use crate::references::{find_downstream_urls, parse_pr_url, DownstreamGroups, UpstreamReference};
use tracing::{debug, info, info_span, Instrument};

/// Lists every downstream URL referenced from the upstream pull request's
/// comments.
///
/// URLs keep comment order, then line order within a comment. Duplicates
/// are kept.
///
/// # Errors
///
/// Returns [`ApiError`] if the comments cannot be fetched.
pub async fn list_downstream_urls(
    api: &dyn PullRequestApi,
    upstream: &UpstreamReference,
) -> Result<Vec<String>, ApiError> {
    let span = info_span!("list_downstream_urls", upstream = %upstream);

    async {
        let comments = api
            .list_comment_bodies(&upstream.repository, upstream.number)
            .await?;
        debug!(count = comments.len(), "Fetched upstream comments");

        let urls: Vec<String> = comments
            .iter()
            .flat_map(|body| find_downstream_urls(body))
            .collect();

        info!(count = urls.len(), "Found downstream references");
        Ok(urls)
    }
    .instrument(span)
    .await
}

/// Resolves the upstream pull request's downstreams, grouped by repository.
///
/// URLs that are not pull request URLs are dropped.
///
/// # Errors
///
/// Returns [`ApiError`] if the comments cannot be fetched.
pub async fn grouped_downstreams(
    api: &dyn PullRequestApi,
    upstream: &UpstreamReference,
) -> Result<DownstreamGroups, ApiError> {
    let urls = list_downstream_urls(api, upstream).await?;
    Ok(group_urls(&urls))
}

/// Parses and groups downstream URLs.
#[must_use]
pub fn group_urls<S: AsRef<str>>(urls: &[S]) -> DownstreamGroups {
    urls.iter()
        .filter_map(|url| {
            let url = url.as_ref();
            let parsed = parse_pr_url(url);
            if parsed.is_none() {
                debug!(url = %url, "Ignoring unparsable downstream URL");
            }
            parsed
        })
        .collect()
}
