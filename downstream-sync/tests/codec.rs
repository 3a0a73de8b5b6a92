//! Behaviour of the text codec and reference parser through the public API.

use downstream_sync::{
    extract_release_note, filter_labels_by_prefix, find_downstream_urls, parse_pr_url,
    replace_prefixed_labels, replace_release_note, DownstreamGroups, CHANGELOG_LABEL_PREFIX,
};

const UPSTREAM_BODY: &str = "\
Adds `mtu` to networks.

```releasenote
`google_compute_network`: added `mtu` field
```

Some other text.
";

const DOWNSTREAM_BODY: &str = "\
This is an automated downstream of an upstream change.

```releasenote
stale note
```
";

#[test]
fn upstream_note_replaces_downstream_note() {
    let note = extract_release_note(UPSTREAM_BODY);
    let updated = replace_release_note(DOWNSTREAM_BODY, &note);

    assert_eq!(extract_release_note(&updated), note);
    assert!(!updated.contains("stale note"));
    assert!(updated.starts_with("This is an automated downstream of an upstream change.\n"));
    assert_eq!(replace_release_note(&updated, &note), updated);
}

#[test]
fn empty_upstream_note_clears_downstream_note() {
    let updated = replace_release_note(DOWNSTREAM_BODY, &extract_release_note("no note here"));

    assert_eq!(extract_release_note(&updated), "");
    assert!(!updated.contains("```releasenote"));
}

#[test]
fn changelog_labels_are_overwritten() {
    let upstream = ["changelog: bug", "size/M", "changelog:  "];
    let downstream = ["changelog: enhancement", "downstream-generated", "changelog: note"];

    let wanted = filter_labels_by_prefix(&upstream, CHANGELOG_LABEL_PREFIX);
    let updated = replace_prefixed_labels(&downstream, &wanted, CHANGELOG_LABEL_PREFIX);

    assert_eq!(updated, vec!["downstream-generated", "changelog: bug"]);
}

#[test]
fn comment_references_group_by_repository() {
    let comment = "\
Generated downstreams:
depends: https://github.com/terraform-providers/terraform-provider-google/pull/10
depends: https://github.com/terraform-providers/terraform-provider-google-beta/pull/20
depends: https://github.com/terraform-providers/terraform-provider-google/pull/11
depends: not-a-url
depends: https://github.com/terraform-providers/terraform-provider-google/issues/12
  depends: https://github.com/indented/ignored/pull/1
";

    let urls = find_downstream_urls(comment);
    assert_eq!(urls.len(), 4);
    assert!(urls.iter().all(|url| url.starts_with("https://github.com/")));

    let groups: DownstreamGroups = urls.iter().filter_map(|url| parse_pr_url(url)).collect();
    assert_eq!(
        groups.repositories(),
        vec![
            "terraform-providers/terraform-provider-google",
            "terraform-providers/terraform-provider-google-beta",
        ]
    );
    let google = groups
        .get("terraform-providers/terraform-provider-google")
        .unwrap();
    assert_eq!(
        google.iter().map(|r| r.number).collect::<Vec<_>>(),
        vec![10, 11]
    );
}
