//! Active-line filtering for captured command output and config files.

/// Comment marker used when the caller does not supply one.
pub const DEFAULT_COMMENT_MARKER: &str = "#";

/// Returns the active lines of `lines`.
///
/// Each line is cut at the first occurrence of `marker` (default
/// [`DEFAULT_COMMENT_MARKER`]), trimmed, and dropped when nothing remains.
/// Passing `Some("----")` turns dash rule lines into blanks so they disappear
/// along with the comments.
///
/// # Examples
///
/// ```
/// use hostfacts_core::filter_active_lines;
///
/// let raw = ["# header", "", "  key: value  ", "other: x # trailing"];
/// assert_eq!(filter_active_lines(&raw, None), vec!["key: value", "other: x"]);
///
/// let table = ["Name  Pid", "---------", "brick 42"];
/// assert_eq!(filter_active_lines(&table, Some("----")), vec!["Name  Pid", "brick 42"]);
/// ```
pub fn filter_active_lines<'a, S>(lines: &'a [S], marker: Option<&str>) -> Vec<&'a str>
where
    S: AsRef<str>,
{
    let marker = marker.unwrap_or(DEFAULT_COMMENT_MARKER);
    lines
        .iter()
        .filter_map(|line| {
            let line = line.as_ref();
            let active = match line.find(marker) {
                Some(idx) => &line[..idx],
                None => line,
            };
            let active = active.trim();
            (!active.is_empty()).then_some(active)
        })
        .collect()
}

/// Splits raw captured content into lines, normalizing `\r\n` endings.
pub fn split_lines(content: &str) -> Vec<&str> {
    content.lines().collect()
}
