use gitscope_core::{DiffHunk, DiffLine, DiffLineKind};

/// Parse one file's unified-diff text into addressable hunks.
///
/// Accepts the conventional `---`/`+++`/`@@` format as emitted by git for a
/// single file. Anything before the first `@@` header (the `diff --git`
/// command line, `index` lines, file headers, mode lines) is skipped, as is
/// the `\ No newline at end of file` marker. A malformed `@@` header loses
/// only that hunk; parsing continues with the rest of the patch.
///
/// Each returned line carries its 1-based position: additions in the new
/// version, deletions in the old version, context lines in both.
///
/// # Examples
///
/// ```
/// use gitscope_patch::parse_patch;
///
/// let patch = "\
/// --- a/greeting.txt
/// +++ b/greeting.txt
/// @@ -1,2 +1,3 @@
///  hello
/// +there
///  world
/// ";
/// let hunks = parse_patch(patch);
/// assert_eq!(hunks.len(), 1);
/// assert_eq!(hunks[0].lines.len(), 3);
/// assert_eq!(hunks[0].lines[1].new_line, Some(2));
/// assert!(parse_patch("").is_empty());
/// ```
pub fn parse_patch(input: &str) -> Vec<DiffHunk> {
    let mut hunks: Vec<DiffHunk> = Vec::new();
    let mut current: Option<DiffHunk> = None;
    let mut old_line: u32 = 0;
    let mut new_line: u32 = 0;

    for line in input.lines() {
        if line.starts_with("@@") {
            // A header that does not parse is dropped without closing the
            // open hunk; only the unparseable region is lost.
            let Some((old_start, old_lines, new_start, new_lines)) = parse_hunk_header(line)
            else {
                continue;
            };
            if let Some(hunk) = current.take() {
                hunks.push(hunk);
            }
            current = Some(DiffHunk {
                old_start,
                old_lines,
                new_start,
                new_lines,
                header: line.to_string(),
                lines: Vec::new(),
            });
            old_line = old_start;
            new_line = new_start;
            continue;
        }

        // File headers and other preamble before the first hunk.
        let Some(hunk) = current.as_mut() else {
            continue;
        };

        if line.is_empty() {
            // An entirely empty line inside a hunk body is a context line
            // whose content is empty.
            hunk.lines.push(DiffLine {
                kind: DiffLineKind::Context,
                content: String::new(),
                old_line: Some(old_line),
                new_line: Some(new_line),
            });
            old_line += 1;
            new_line += 1;
            continue;
        }

        match line.as_bytes()[0] {
            b'+' => {
                hunk.lines.push(DiffLine {
                    kind: DiffLineKind::Addition,
                    content: line[1..].to_string(),
                    old_line: None,
                    new_line: Some(new_line),
                });
                new_line += 1;
            }
            b'-' => {
                hunk.lines.push(DiffLine {
                    kind: DiffLineKind::Deletion,
                    content: line[1..].to_string(),
                    old_line: Some(old_line),
                    new_line: None,
                });
                old_line += 1;
            }
            b' ' => {
                hunk.lines.push(DiffLine {
                    kind: DiffLineKind::Context,
                    content: line[1..].to_string(),
                    old_line: Some(old_line),
                    new_line: Some(new_line),
                });
                old_line += 1;
                new_line += 1;
            }
            // `\ No newline at end of file` and any other marker carries no
            // addressable content.
            _ => {}
        }
    }

    if let Some(hunk) = current.take() {
        hunks.push(hunk);
    }
    hunks
}

/// Parse a `@@ -O[,OL] +N[,NL] @@ ...` header.
///
/// Returns `None` on any malformation; the caller skips the line.
fn parse_hunk_header(line: &str) -> Option<(u32, u32, u32, u32)> {
    let rest = line.strip_prefix("@@ ")?;
    let end = rest.find(" @@")?;
    let mut ranges = rest[..end].split(' ');
    let old = ranges.next()?.strip_prefix('-')?;
    let new = ranges.next()?.strip_prefix('+')?;
    if ranges.next().is_some() {
        return None;
    }
    let (old_start, old_lines) = parse_range(old)?;
    let (new_start, new_lines) = parse_range(new)?;
    Some((old_start, old_lines, new_start, new_lines))
}

// A count omitted from the range means a single line, per the unified-diff
// convention.
fn parse_range(range: &str) -> Option<(u32, u32)> {
    match range.split_once(',') {
        Some((start, count)) => Some((start.parse().ok()?, count.parse().ok()?)),
        None => Some((range.parse().ok()?, 1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_no_hunks() {
        assert!(parse_patch("").is_empty());
    }

    #[test]
    fn header_with_counts() {
        let hunks = parse_patch("@@ -10,3 +12,5 @@ fn main()\n");
        assert_eq!(hunks.len(), 1);
        assert_eq!(hunks[0].old_start, 10);
        assert_eq!(hunks[0].old_lines, 3);
        assert_eq!(hunks[0].new_start, 12);
        assert_eq!(hunks[0].new_lines, 5);
        assert_eq!(hunks[0].header, "@@ -10,3 +12,5 @@ fn main()");
    }

    #[test]
    fn header_with_omitted_counts() {
        let hunks = parse_patch("@@ -1 +1 @@\n-old\n+new\n");
        assert_eq!(hunks.len(), 1);
        assert_eq!(hunks[0].old_lines, 1);
        assert_eq!(hunks[0].new_lines, 1);
    }

    #[test]
    fn malformed_header_is_skipped() {
        let patch = "\
@@ -1,2 +1,2 @@
 kept
-before
+after
@@ garbage @@
@@ -10,1 +10,1 @@
-x
+y
";
        let hunks = parse_patch(patch);
        assert_eq!(hunks.len(), 2);
        assert_eq!(hunks[0].lines.len(), 3);
        assert_eq!(hunks[1].old_start, 10);
        assert_eq!(hunks[1].lines.len(), 2);
    }

    #[test]
    fn preamble_before_first_hunk_is_skipped() {
        let patch = "\
diff --git a/f.rs b/f.rs
index abc1234..def5678 100644
--- a/f.rs
+++ b/f.rs
@@ -1 +1,2 @@
 line1
+line2
";
        let hunks = parse_patch(patch);
        assert_eq!(hunks.len(), 1);
        assert_eq!(hunks[0].lines.len(), 2);
    }

    #[test]
    fn line_numbers_advance_per_kind() {
        let patch = "\
@@ -10,4 +10,5 @@
 ctx one
 ctx two
-gone
+new one
+new two
 ctx three
";
        let hunks = parse_patch(patch);
        let lines = &hunks[0].lines;

        assert_eq!(lines[0].kind, DiffLineKind::Context);
        assert_eq!(lines[0].old_line, Some(10));
        assert_eq!(lines[0].new_line, Some(10));
        assert_eq!(lines[1].old_line, Some(11));
        assert_eq!(lines[1].new_line, Some(11));

        // The deletion sits after two context advances in the old file.
        assert_eq!(lines[2].kind, DiffLineKind::Deletion);
        assert_eq!(lines[2].old_line, Some(12));
        assert_eq!(lines[2].new_line, None);

        assert_eq!(lines[3].kind, DiffLineKind::Addition);
        assert_eq!(lines[3].new_line, Some(12));
        assert_eq!(lines[3].old_line, None);
        assert_eq!(lines[4].new_line, Some(13));

        // Context after mixed changes resumes with both counters advanced.
        assert_eq!(lines[5].old_line, Some(13));
        assert_eq!(lines[5].new_line, Some(14));
    }

    #[test]
    fn addition_numbers_strictly_increase() {
        let patch = "@@ -5,0 +6,3 @@\n+a\n+b\n+c\n";
        let hunks = parse_patch(patch);
        let numbers: Vec<u32> = hunks[0]
            .lines
            .iter()
            .filter_map(|l| l.new_line)
            .collect();
        assert_eq!(numbers, vec![6, 7, 8]);
        assert!(hunks[0].lines.iter().all(|l| l.old_line.is_none()));
    }

    #[test]
    fn no_newline_marker_is_skipped() {
        let patch = "\
@@ -1 +1 @@
-old
\\ No newline at end of file
+new
\\ No newline at end of file
";
        let hunks = parse_patch(patch);
        assert_eq!(hunks[0].lines.len(), 2);
        assert_eq!(hunks[0].lines[0].content, "old");
        assert_eq!(hunks[0].lines[1].content, "new");
    }

    #[test]
    fn empty_line_is_context_with_empty_content() {
        let patch = "@@ -1,3 +1,3 @@\n a\n\n b\n";
        let hunks = parse_patch(patch);
        let middle = &hunks[0].lines[1];
        assert_eq!(middle.kind, DiffLineKind::Context);
        assert_eq!(middle.content, "");
        assert_eq!(middle.old_line, Some(2));
        assert_eq!(middle.new_line, Some(2));
        assert_eq!(hunks[0].lines[2].old_line, Some(3));
    }

    #[test]
    fn marker_is_stripped_from_content() {
        let patch = "@@ -1,1 +1,2 @@\n keep\n+added line\n";
        let hunks = parse_patch(patch);
        assert_eq!(hunks[0].lines[0].content, "keep");
        assert_eq!(hunks[0].lines[1].content, "added line");
    }

    #[test]
    fn multiple_hunks_keep_independent_counters() {
        let patch = "\
@@ -1,2 +1,2 @@
-a
+b
 c
@@ -40,2 +40,3 @@
 d
+e
 f
";
        let hunks = parse_patch(patch);
        assert_eq!(hunks.len(), 2);
        assert_eq!(hunks[1].lines[0].old_line, Some(40));
        assert_eq!(hunks[1].lines[1].new_line, Some(41));
        assert_eq!(hunks[1].lines[2].old_line, Some(41));
        assert_eq!(hunks[1].lines[2].new_line, Some(42));
    }

    #[test]
    fn classified_lines_match_body_line_count() {
        let patch = "\
--- a/f
+++ b/f
@@ -1,3 +1,4 @@
 one
+two
 three
 four
@@ -9,2 +10,1 @@
-nine
\\ No newline at end of file
 ten
";
        let hunks = parse_patch(patch);
        let classified: usize = hunks.iter().map(|h| h.lines.len()).sum();
        // Everything except the two file headers, two @@ headers, and the
        // no-newline marker.
        assert_eq!(classified, 6);
    }

    #[test]
    fn round_trip_reproduces_hunk_body() {
        let body = " fn main() {\n-    old();\n+    new();\n+    extra();\n }\n";
        let patch = format!("@@ -1,3 +1,4 @@\n{body}");
        let hunks = parse_patch(&patch);
        let rebuilt: String = hunks[0]
            .lines
            .iter()
            .map(|l| format!("{}{}\n", l.kind.marker(), l.content))
            .collect();
        assert_eq!(rebuilt, body);
    }

    #[test]
    fn header_variants_reject_cleanly() {
        assert!(parse_hunk_header("@@ garbage @@").is_none());
        assert!(parse_hunk_header("@@ -1,2 @@").is_none());
        assert!(parse_hunk_header("@@ -1,2 +3,4 extra @@").is_none());
        assert!(parse_hunk_header("@@ +1,2 -3,4 @@").is_none());
        assert!(parse_hunk_header("@@ -a,b +c,d @@").is_none());
        assert!(parse_hunk_header("@@-1,2 +3,4@@").is_none());
        assert_eq!(
            parse_hunk_header("@@ -10,3 +12,5 @@ impl Display"),
            Some((10, 3, 12, 5))
        );
    }
}
