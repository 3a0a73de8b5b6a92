//! Changelog metadata carried in pull request descriptions and labels.
//!
//! Two pieces of metadata travel from the upstream pull request to its
//! downstreams: a fenced `releasenote` block inside the description and the
//! set of labels starting with [`CHANGELOG_LABEL_PREFIX`].

mod labels;
mod release_note;

pub use labels::{filter_labels_by_prefix, replace_prefixed_labels, CHANGELOG_LABEL_PREFIX};
pub use release_note::{
    extract_release_note, format_release_note, replace_release_note, RELEASE_NOTE_TAG,
};
