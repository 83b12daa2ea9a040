// line-range edit application: merged text for approval, tagged segments for display

use crate::model::{Edit, Segment, SegmentKind, ViewMode};

/// Convert a 1-based line number into a 0-based index, clamping anything below 1 to 0.
pub fn normalize_line(line: i64) -> usize {
    usize::try_from(line.saturating_sub(1)).unwrap_or(0)
}

/// Split a document on `\n`, keeping a trailing empty line and any `\r`
/// so that joining the result with `\n` reproduces the input exactly.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n').collect()
}

/// Edits sorted ascending by normalized start. The sort is stable, so edits
/// sharing a start keep their supplied order.
fn sorted_by_start(edits: &[Edit]) -> Vec<&Edit> {
    let mut sorted: Vec<&Edit> = edits.iter().collect();
    sorted.sort_by_key(|edit| normalize_line(edit.start));
    sorted
}

/// Apply every edit to `original` and return the merged text.
///
/// Edits are spliced from the highest start down so that each range is still
/// expressed in original-document indices when it is applied. Overlapping
/// ranges are not detected.
pub fn merge_edits(original: &str, edits: &[Edit]) -> String {
    let mut lines = split_lines(original);

    for edit in sorted_by_start(edits).into_iter().rev() {
        let start = normalize_line(edit.start);
        let end = normalize_line(edit.end);

        // start > end removes nothing and only inserts
        let remove = (end + 1).saturating_sub(start);
        let at = start.min(lines.len());
        let until = at.saturating_add(remove).min(lines.len());

        lines.splice(at..until, std::iter::once(edit.replacement.as_str()));
    }

    lines.join("\n")
}

/// Partition `original` into display segments for the given pane.
///
/// In [`ViewMode::Current`] each edited range is emitted as `Removed` with the
/// original lines; in [`ViewMode::Proposed`] it is emitted as `Added` holding
/// the replacement as a single entry. Multi-line replacements are not re-split
/// here, so the two panes can differ in line count for the same edit.
pub fn segment_edits<'a>(original: &'a str, edits: &'a [Edit], mode: ViewMode) -> Vec<Segment<'a>> {
    let lines = split_lines(original);

    if edits.is_empty() {
        return vec![Segment::new(SegmentKind::Unchanged, lines)];
    }

    let mut segments = Vec::new();
    let mut cursor = 0usize;

    for edit in sorted_by_start(edits) {
        let start = normalize_line(edit.start);
        let end = normalize_line(edit.end);

        if start > cursor {
            segments.push(Segment::new(
                SegmentKind::Unchanged,
                slice(&lines, cursor, start).to_vec(),
            ));
        }

        match mode {
            ViewMode::Current => segments.push(Segment::new(
                SegmentKind::Removed,
                slice(&lines, start, end.saturating_add(1)).to_vec(),
            )),
            ViewMode::Proposed => segments.push(Segment::new(
                SegmentKind::Added,
                vec![edit.replacement.as_str()],
            )),
        }

        cursor = end.saturating_add(1);
    }

    if cursor < lines.len() {
        segments.push(Segment::new(
            SegmentKind::Unchanged,
            lines[cursor..].to_vec(),
        ));
    }

    segments
}

/// Bounds-clamped slice; an inverted or out-of-range window yields nothing.
fn slice<'s, 'a>(lines: &'s [&'a str], from: usize, to: usize) -> &'s [&'a str] {
    let to = to.min(lines.len());
    let from = from.min(to);
    &lines[from..to]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> &'static str {
        "A\nB\nC\nD"
    }

    #[test]
    fn test_normalize_line() {
        assert_eq!(normalize_line(1), 0);
        assert_eq!(normalize_line(0), 0);
        assert_eq!(normalize_line(-5), 0);
        assert_eq!(normalize_line(10), 9);
        assert_eq!(normalize_line(i64::MIN), 0);
    }

    #[test]
    fn test_merge_without_edits_is_identity() {
        assert_eq!(merge_edits(doc(), &[]), doc());
        assert_eq!(merge_edits("a\r\nb\n", &[]), "a\r\nb\n");
        assert_eq!(merge_edits("", &[]), "");
    }

    #[test]
    fn test_merge_single_range() {
        let edits = vec![Edit::new(2, 3, "X")];
        assert_eq!(merge_edits(doc(), &edits), "A\nX\nD");
    }

    #[test]
    fn test_merge_descending_application() {
        // supplied out of order on purpose
        let edits = vec![Edit::new(3, 4, "W"), Edit::new(1, 1, "Z")];
        assert_eq!(merge_edits(doc(), &edits), "Z\nB\nW");
    }

    #[test]
    fn test_merge_multiline_replacement_is_spliced_verbatim() {
        let edits = vec![Edit::new(2, 2, "B1\nB2")];
        assert_eq!(merge_edits(doc(), &edits), "A\nB1\nB2\nC\nD");
    }

    #[test]
    fn test_merge_inverted_range_inserts() {
        let edits = vec![Edit::new(3, 1, "I")];
        assert_eq!(merge_edits(doc(), &edits), "A\nB\nI\nC\nD");
    }

    #[test]
    fn test_merge_start_past_end_appends() {
        let edits = vec![Edit::new(10, 12, "tail")];
        assert_eq!(merge_edits(doc(), &edits), "A\nB\nC\nD\ntail");
    }

    #[test]
    fn test_merge_range_running_past_end_truncates() {
        let edits = vec![Edit::new(3, 99, "end")];
        assert_eq!(merge_edits(doc(), &edits), "A\nB\nend");
    }

    #[test]
    fn test_merge_zero_start_is_clamped() {
        let edits = vec![Edit::new(0, 1, "first")];
        assert_eq!(merge_edits(doc(), &edits), "first\nB\nC\nD");
    }

    #[test]
    fn test_segment_without_edits() {
        for mode in [ViewMode::Current, ViewMode::Proposed] {
            let segments = segment_edits(doc(), &[], mode);
            assert_eq!(segments.len(), 1);
            assert_eq!(segments[0].kind, SegmentKind::Unchanged);
            assert_eq!(segments[0].lines, vec!["A", "B", "C", "D"]);
        }
    }

    #[test]
    fn test_segment_current_mode() {
        let edits = vec![Edit::new(2, 3, "X")];
        let segments = segment_edits(doc(), &edits, ViewMode::Current);
        assert_eq!(
            segments,
            vec![
                Segment::new(SegmentKind::Unchanged, vec!["A"]),
                Segment::new(SegmentKind::Removed, vec!["B", "C"]),
                Segment::new(SegmentKind::Unchanged, vec!["D"]),
            ]
        );
    }

    #[test]
    fn test_segment_proposed_mode() {
        let edits = vec![Edit::new(2, 3, "X")];
        let segments = segment_edits(doc(), &edits, ViewMode::Proposed);
        assert_eq!(
            segments,
            vec![
                Segment::new(SegmentKind::Unchanged, vec!["A"]),
                Segment::new(SegmentKind::Added, vec!["X"]),
                Segment::new(SegmentKind::Unchanged, vec!["D"]),
            ]
        );
    }

    #[test]
    fn test_segment_adjacent_edits_have_no_gap() {
        let edits = vec![Edit::new(3, 4, "W"), Edit::new(1, 2, "Z")];
        let segments = segment_edits(doc(), &edits, ViewMode::Current);
        let kinds: Vec<SegmentKind> = segments.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![SegmentKind::Removed, SegmentKind::Removed]);
        assert_eq!(segments[0].lines, vec!["A", "B"]);
        assert_eq!(segments[1].lines, vec!["C", "D"]);
    }

    #[test]
    fn test_segment_current_partitions_document() {
        let edits = vec![Edit::new(5, 6, "x"), Edit::new(2, 2, "y")];
        let text = "1\n2\n3\n4\n5\n6\n7";
        let segments = segment_edits(text, &edits, ViewMode::Current);
        let rebuilt: Vec<&str> = segments.iter().flat_map(|s| s.lines.clone()).collect();
        assert_eq!(rebuilt.join("\n"), text);
    }

    #[test]
    fn test_segment_proposed_keeps_multiline_replacement_whole() {
        let edits = vec![Edit::new(2, 2, "B1\nB2")];
        let segments = segment_edits(doc(), &edits, ViewMode::Proposed);
        assert_eq!(segments[1].lines, vec!["B1\nB2"]);
        assert_eq!(segments[1].content(), "B1\nB2");
    }

    #[test]
    fn test_segment_edit_past_end_yields_empty_removed() {
        let edits = vec![Edit::new(9, 10, "late")];
        let segments = segment_edits(doc(), &edits, ViewMode::Current);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].lines, vec!["A", "B", "C", "D"]);
        assert_eq!(segments[1].kind, SegmentKind::Removed);
        assert!(segments[1].lines.is_empty());
    }
}
