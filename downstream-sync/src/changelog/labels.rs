//! Changelog label selection and replacement.

/// Prefix shared by every changelog-relevant label.
pub const CHANGELOG_LABEL_PREFIX: &str = "changelog: ";

/// Returns the changelog-relevant labels from `labels`.
///
/// A label is kept when it starts with `prefix` and the remainder is not
/// blank. Kept labels are normalised to `prefix` followed by the trimmed
/// remainder, so `"changelog:  bug "` becomes `"changelog: bug"`.
#[must_use]
pub fn filter_labels_by_prefix<S: AsRef<str>>(labels: &[S], prefix: &str) -> Vec<String> {
    labels
        .iter()
        .filter_map(|label| label.as_ref().strip_prefix(prefix))
        .map(str::trim)
        .filter(|suffix| !suffix.is_empty())
        .map(|suffix| format!("{prefix}{suffix}"))
        .collect()
}

/// Swaps every `prefix` label in `existing` for `replacements`.
///
/// Labels without the prefix keep their relative order and come first;
/// `replacements` are appended as given, without de-duplication.
#[must_use]
pub fn replace_prefixed_labels<S: AsRef<str>, R: AsRef<str>>(
    existing: &[S],
    replacements: &[R],
    prefix: &str,
) -> Vec<String> {
    existing
        .iter()
        .map(|label| label.as_ref())
        .filter(|label| !label.starts_with(prefix))
        .chain(replacements.iter().map(|label| label.as_ref()))
        .map(str::to_string)
        .collect()
}
