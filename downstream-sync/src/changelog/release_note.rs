//! Fenced release note block codec.
//!
//! A release note is a fenced code block tagged [`RELEASE_NOTE_TAG`]:
//!
//! ~~~text
//! ```releasenote
//! Fixed a crash when the bucket had no lifecycle rules.
//! ```
//! ~~~
//!
//! The grammar is line based. A block opens on a line that is exactly
//! ```` ```releasenote ```` and closes on the next line that is exactly
//! ```` ``` ````; whitespace around either fence is ignored. Fences of any
//! other length or tag never open or close a block, and backticks in the
//! middle of a content line are plain content.

use std::ops::Range;

/// Language tag that marks a fenced code block as a release note.
pub const RELEASE_NOTE_TAG: &str = "releasenote";

const FENCE: &str = "```";

/// Location of a release note fence inside a body.
#[derive(Debug, Clone, PartialEq, Eq)]
struct BlockSpan {
    /// Byte offset where the opening fence line starts.
    start: usize,
    /// Byte offset just past the last line belonging to the span.
    end: usize,
    /// Content between the fences, `None` when the block never closes.
    content: Option<Range<usize>>,
}

fn is_opening_fence(line: &str) -> bool {
    line.trim()
        .strip_prefix(FENCE)
        .is_some_and(|tag| tag == RELEASE_NOTE_TAG)
}

fn is_closing_fence(line: &str) -> bool {
    line.trim() == FENCE
}

/// Scans `body` for release note blocks.
///
/// Closed blocks span from the opening fence line through the closing fence
/// line, terminators included. An opening fence that is never closed yields
/// a span covering only that fence line.
fn scan_blocks(body: &str) -> Vec<BlockSpan> {
    let mut blocks = Vec::new();
    // (fence line start, content start)
    let mut open: Option<(usize, usize)> = None;
    let mut offset = 0;

    for line in body.split_inclusive('\n') {
        let next = offset + line.len();
        match open {
            None if is_opening_fence(line) => open = Some((offset, next)),
            Some((start, content_start)) if is_closing_fence(line) => {
                blocks.push(BlockSpan {
                    start,
                    end: next,
                    content: Some(content_start..offset),
                });
                open = None;
            }
            _ => {}
        }
        offset = next;
    }

    if let Some((start, content_start)) = open {
        blocks.push(BlockSpan {
            start,
            end: content_start,
            content: None,
        });
    }

    blocks
}

/// Returns the trimmed text of the first release note block in `body`.
///
/// Yields an empty string when there is no closed block or the first block
/// is empty.
#[must_use]
pub fn extract_release_note(body: &str) -> String {
    scan_blocks(body)
        .into_iter()
        .find_map(|block| block.content)
        .map(|content| body[content].trim().to_string())
        .unwrap_or_default()
}

/// Renders `note` as a release note block, including the trailing newline.
#[must_use]
pub fn format_release_note(note: &str) -> String {
    format!("{FENCE}{RELEASE_NOTE_TAG}\n{}\n{FENCE}\n", note.trim())
}

/// Replaces every release note block in `body` with `new_note`.
///
/// All existing blocks are removed, along with any dangling opening fence.
/// Every other line is kept byte for byte. When `new_note` is not blank a
/// single block is appended at the end, separated from the preceding text
/// by one blank line. A blank `new_note` only removes.
#[must_use]
pub fn replace_release_note(body: &str, new_note: &str) -> String {
    let mut edited = String::with_capacity(body.len() + new_note.len() + 32);
    let mut cursor = 0;
    for block in scan_blocks(body) {
        edited.push_str(&body[cursor..block.start]);
        cursor = block.end;
    }
    edited.push_str(&body[cursor..]);

    let note = new_note.trim();
    if note.is_empty() {
        return edited;
    }

    if !edited.is_empty() {
        if !edited.ends_with('\n') {
            edited.push('\n');
        }
        if !ends_with_blank_line(&edited) {
            edited.push('\n');
        }
    }
    edited.push_str(&format_release_note(note));
    edited
}

/// Whether the last line of newline-terminated `text` is blank.
fn ends_with_blank_line(text: &str) -> bool {
    text.strip_suffix('\n')
        .and_then(|rest| rest.rsplit('\n').next())
        .is_some_and(|line| line.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_blocks(body: &str) -> usize {
        body.lines().filter(|line| is_opening_fence(line)).count()
    }

    #[test]
    fn extract_returns_empty_without_block() {
        assert_eq!(extract_release_note("releasenote text not found"), "");
        assert_eq!(extract_release_note(""), "");
    }

    #[test]
    fn extract_returns_empty_for_empty_block() {
        let body = "\n  Empty release note:\n  ```releasenote\n  ```\n";
        assert_eq!(extract_release_note(body), "");
    }

    #[test]
    fn extract_ignores_untagged_block() {
        let body = "Random code block\n```\nThis is not a release note\n```\n";
        assert_eq!(extract_release_note(body), "");
    }

    #[test]
    fn extract_uses_first_block_even_when_empty() {
        let body = "```releasenote\n```\n\n```\nThis is not a release note\n```\n";
        assert_eq!(extract_release_note(body), "");

        let body = "```releasenote\nfirst\n```\n```releasenote\nsecond\n```\n";
        assert_eq!(extract_release_note(body), "first");
    }

    #[test]
    fn extract_skips_other_languages() {
        let body = "\
Empty code block with non-empty release note:

```invalid
```

```releasenote
This is a release note
```
";
        assert_eq!(extract_release_note(body), "This is a release note");
    }

    #[test]
    fn extract_tolerates_indentation() {
        let body = "```releasenote\n        This is a release note\n        ```\n        ";
        assert_eq!(extract_release_note(body), "This is a release note");
    }

    #[test]
    fn extract_keeps_multiline_content() {
        let body = "intro\n```releasenote\n`google_compute_network`: added field\n\nsecond paragraph\n```\n";
        assert_eq!(
            extract_release_note(body),
            "`google_compute_network`: added field\n\nsecond paragraph"
        );
    }

    #[test]
    fn extract_is_not_fooled_by_similar_fences() {
        let body = "````releasenote\nnot a note\n````\n";
        assert_eq!(extract_release_note(body), "");

        let body = "```releasenotes\nnot a note\n```\n";
        assert_eq!(extract_release_note(body), "");

        let body = "```releasenote\nuse ```inline``` here\n````\nstill note\n```\n";
        assert_eq!(
            extract_release_note(body),
            "use ```inline``` here\n````\nstill note"
        );
    }

    #[test]
    fn extract_handles_unterminated_block() {
        assert_eq!(extract_release_note("```releasenote\nno closing fence"), "");
        assert_eq!(extract_release_note("```releasenote"), "");
    }

    #[test]
    fn extract_handles_crlf_line_endings() {
        let body = "text\r\n```releasenote\r\nWindows note\r\n```\r\n";
        assert_eq!(extract_release_note(body), "Windows note");
    }

    #[test]
    fn replace_swaps_all_blocks_for_one() {
        let body = "\
All of the blocks below should be replaced

```releasenote
This should be replaced
```

More text

```releasenote
```

```test
```
";
        let replaced = replace_release_note(body, "The release note was replaced");

        assert!(replaced.contains("```releasenote\nThe release note was replaced\n```\n"));
        assert_eq!(count_blocks(&replaced), 1);
        assert!(!replaced.contains("This should be replaced"));
        assert!(replaced.contains("All of the blocks below should be replaced\n"));
        assert!(replaced.contains("More text\n"));
        assert!(replaced.contains("```test\n```\n"));
    }

    #[test]
    fn replace_appends_after_blank_line() {
        let replaced = replace_release_note("PR description\n", "Fixes bug");
        assert_eq!(
            replaced,
            "PR description\n\n```releasenote\nFixes bug\n```\n"
        );

        let replaced = replace_release_note("PR description", "Fixes bug");
        assert_eq!(
            replaced,
            "PR description\n\n```releasenote\nFixes bug\n```\n"
        );
    }

    #[test]
    fn replace_on_empty_body_writes_only_block() {
        assert_eq!(
            replace_release_note("", "  Fixes bug \n"),
            "```releasenote\nFixes bug\n```\n"
        );
    }

    #[test]
    fn replace_with_empty_note_removes_block() {
        let body = "PR description\n```releasenote\nChanges to downstream\n```\n";
        assert_eq!(replace_release_note(body, ""), "PR description\n");
        assert_eq!(replace_release_note(body, "  \n "), "PR description\n");
    }

    #[test]
    fn replace_preserves_surrounding_text_verbatim() {
        let body = "head\r\n\n```releasenote\nold\n```\ntail without newline";
        assert_eq!(
            replace_release_note(body, ""),
            "head\r\n\ntail without newline"
        );
    }

    #[test]
    fn replace_removes_dangling_opening_fence() {
        let body = "intro\n```releasenote\nnever closed\n";
        let replaced = replace_release_note(body, "new note");
        assert_eq!(
            replaced,
            "intro\nnever closed\n\n```releasenote\nnew note\n```\n"
        );
        assert_eq!(extract_release_note(&replaced), "new note");
    }

    #[test]
    fn removal_is_idempotent() {
        let body = "a\n```releasenote\nx\n```\nb\n```releasenote\ny\n```\n";
        let once = replace_release_note(body, "");
        assert_eq!(count_blocks(&once), 0);
        assert_eq!(replace_release_note(&once, ""), once);
    }

    #[test]
    fn repeated_replacement_is_a_fixed_point() {
        for body in ["", "text", "text\n", "text\n\n", "```releasenote\nold\n```\n"] {
            let once = replace_release_note(body, "note");
            assert_eq!(replace_release_note(&once, "note"), once, "body: {body:?}");
        }
    }

    #[test]
    fn replaced_note_round_trips_through_extract() {
        let bodies = [
            "",
            "plain description",
            "```go\nfmt.Println()\n```\n",
            "```releasenote\nold\n```\n```releasenote\nolder\n```",
            "```releasenote\nunterminated",
        ];
        for body in bodies {
            let replaced = replace_release_note(body, "  New note\nsecond line  ");
            assert_eq!(
                extract_release_note(&replaced),
                "New note\nsecond line",
                "body: {body:?}"
            );
        }
    }
}
