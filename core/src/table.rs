//! Fixed-width table parsing.
//!
//! Many tools print tables whose columns line up under a header row but have
//! no explicit separator, and whose cells may themselves contain spaces
//! (`Brick 10.0.0.1:/data`). Column boundaries are therefore taken from the
//! character offset at which each header label starts, and every data row is
//! sliced at those offsets.
//!
//! ```
//! use hostfacts_core::{FixedTableOptions, parse_fixed_table};
//!
//! let lines = [
//!     "Gluster process         TCP Port  Online  Pid",
//!     "Brick 10.0.0.1:/data    49152     Y       811",
//! ];
//! let options = FixedTableOptions::new()
//!     .rename("Gluster process", "Gluster_process")
//!     .rename("TCP Port", "TCP_Port");
//! let rows = parse_fixed_table(&lines, &options).unwrap();
//! assert_eq!(rows[0]["Gluster_process"], "Brick 10.0.0.1:/data");
//! assert_eq!(rows[0]["TCP_Port"], "49152");
//! assert_eq!(rows[0]["Pid"], "811");
//! ```

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{ParseError, Result};

/// One parsed table row: column name to trimmed cell text.
pub type TableRow = BTreeMap<String, String>;

/// Knobs for [`parse_fixed_table`].
///
/// Built with the chained methods; the default parses the first line as the
/// header and every following line as a row.
#[derive(Debug, Clone, Default)]
pub struct FixedTableOptions<'a> {
    /// `(old, new)` label substitutions. `old` may contain spaces, which is
    /// how multi-word labels become one column.
    pub header_renames: Vec<(&'a str, &'a str)>,
    /// The header is the first line containing all of these substrings.
    /// Empty means the first line.
    pub heading_markers: Vec<&'a str>,
    /// Rows stop before the first line (after the header) containing any of
    /// these substrings.
    pub trailing_markers: Vec<&'a str>,
    /// Fail with [`ParseError::EmptyTable`] instead of returning no rows.
    pub require_rows: bool,
}

impl<'a> FixedTableOptions<'a> {
    /// Creates options with no renames or markers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Names the column printed as `old` (which may span spaces) `new`.
    pub fn rename(mut self, old: &'a str, new: &'a str) -> Self {
        self.header_renames.push((old, new));
        self
    }

    /// Adds a substring that identifies the header line.
    pub fn heading(mut self, marker: &'a str) -> Self {
        self.heading_markers.push(marker);
        self
    }

    /// Adds a substring that ends the table body.
    pub fn trailing(mut self, marker: &'a str) -> Self {
        self.trailing_markers.push(marker);
        self
    }

    /// Requires at least one data row.
    pub fn require_rows(mut self) -> Self {
        self.require_rows = true;
        self
    }
}

/// Parses a fixed-width table out of `lines`.
///
/// Lines before the header are skipped. When a heading marker is configured
/// but no line matches, the table is considered absent and no rows are
/// returned (or [`ParseError::EmptyTable`] if rows are required). Rows shorter
/// than a column's offset yield empty cells; the last column takes the rest of
/// the line.
///
/// # Errors
///
/// Returns [`ParseError::EmptyTable`] when `require_rows` is set and the table
/// has no data rows.
pub fn parse_fixed_table<S>(lines: &[S], options: &FixedTableOptions<'_>) -> Result<Vec<TableRow>>
where
    S: AsRef<str>,
{
    let Some(heading_idx) = find_heading(lines, &options.heading_markers) else {
        debug!(markers = ?options.heading_markers, "no fixed-width table heading found");
        return empty_table(options);
    };

    let body_end = lines
        .iter()
        .enumerate()
        .skip(heading_idx + 1)
        .find(|(_, line)| {
            let line = line.as_ref();
            options.trailing_markers.iter().any(|m| line.contains(m))
        })
        .map_or(lines.len(), |(idx, _)| idx);

    let columns = column_offsets(lines[heading_idx].as_ref(), &options.header_renames);
    if columns.is_empty() {
        return empty_table(options);
    }

    let rows = lines[heading_idx + 1..body_end]
        .iter()
        .map(|line| slice_row(line.as_ref(), &columns))
        .collect::<Vec<_>>();

    debug!(
        columns = columns.len(),
        rows = rows.len(),
        "parsed fixed-width table"
    );

    if rows.is_empty() && options.require_rows {
        return Err(ParseError::EmptyTable);
    }
    Ok(rows)
}

fn empty_table(options: &FixedTableOptions<'_>) -> Result<Vec<TableRow>> {
    if options.require_rows {
        Err(ParseError::EmptyTable)
    } else {
        Ok(Vec::new())
    }
}

fn find_heading<S: AsRef<str>>(lines: &[S], markers: &[&str]) -> Option<usize> {
    if markers.is_empty() {
        return (!lines.is_empty()).then_some(0);
    }
    lines.iter().position(|line| {
        let line = line.as_ref();
        markers.iter().all(|m| line.contains(m))
    })
}

/// Returns `(label, start)` pairs with `start` counted in characters.
///
/// Offsets come from the header as printed. A renamed label keeps the offset
/// of the text it replaces, so renames may change the label length.
fn column_offsets(header: &str, renames: &[(&str, &str)]) -> Vec<(String, usize)> {
    let mut out = Vec::new();
    let mut offset = 0;
    let mut rest = header;
    while let Some(ch) = rest.chars().next() {
        let renamed = renames
            .iter()
            .find(|(old, _)| !old.is_empty() && rest.starts_with(old));
        let (label, consumed) = match renamed {
            Some((old, new)) => (Some(new.to_string()), *old),
            None if ch.is_whitespace() => (None, &rest[..ch.len_utf8()]),
            None => {
                let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
                (Some(rest[..end].to_string()), &rest[..end])
            }
        };
        if let Some(label) = label {
            out.push((label, offset));
        }
        offset += consumed.chars().count();
        rest = &rest[consumed.len()..];
    }
    out
}

fn slice_row(line: &str, columns: &[(String, usize)]) -> TableRow {
    let chars = line.chars().collect::<Vec<_>>();
    let cell = |start: usize, end: usize| -> String {
        let start = start.min(chars.len());
        let end = end.min(chars.len());
        chars[start..end].iter().collect::<String>().trim().to_string()
    };

    columns
        .iter()
        .enumerate()
        .map(|(idx, (label, start))| {
            let end = columns.get(idx + 1).map_or(chars.len(), |(_, next)| *next);
            (label.clone(), cell(*start, end))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PS_TABLE: [&str; 3] = [
        "USER       PID %CPU COMMAND",
        "root         1  0.0 /usr/lib/systemd/systemd --switched-root",
        "nobody     812  1.5 dnsmasq",
    ];

    #[test]
    fn test_first_line_is_header_by_default() {
        let rows = parse_fixed_table(&PS_TABLE, &FixedTableOptions::new()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["USER"], "root");
        assert_eq!(rows[0]["PID"], "1");
        assert_eq!(rows[0]["COMMAND"], "/usr/lib/systemd/systemd --switched-root");
        assert_eq!(rows[1]["%CPU"], "1.5");
    }

    #[test]
    fn test_heading_marker_skips_preamble() {
        let lines = ["Status of volume: v", "Name   Value", "a      1"];
        let rows = parse_fixed_table(&lines, &FixedTableOptions::new().heading("Name")).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Value"], "1");
    }

    #[test]
    fn test_trailing_marker_stops_rows() {
        let lines = ["Name   Value", "a      1", "Task Status of x", "b      2"];
        let options = FixedTableOptions::new().trailing("Task Status");
        let rows = parse_fixed_table(&lines, &options).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Name"], "a");
    }

    #[test]
    fn test_missing_heading_yields_no_rows() {
        let lines = ["Volume v is not started"];
        let options = FixedTableOptions::new().heading("Gluster process");
        assert!(parse_fixed_table(&lines, &options).unwrap().is_empty());
    }

    #[test]
    fn test_require_rows_fails_on_empty_body() {
        let lines = ["Name   Value"];
        let options = FixedTableOptions::new().require_rows();
        assert!(matches!(
            parse_fixed_table(&lines, &options),
            Err(ParseError::EmptyTable)
        ));
    }

    #[test]
    fn test_short_rows_get_empty_cells() {
        let lines = ["Name   Value  Extra", "a"];
        let rows = parse_fixed_table(&lines, &FixedTableOptions::new()).unwrap();
        assert_eq!(rows[0]["Name"], "a");
        assert_eq!(rows[0]["Value"], "");
        assert_eq!(rows[0]["Extra"], "");
    }

    #[test]
    fn test_offsets_count_characters_not_bytes() {
        let lines = ["Näme   Value", "ü      1"];
        let rows = parse_fixed_table(&lines, &FixedTableOptions::new()).unwrap();
        assert_eq!(rows[0]["Näme"], "ü");
        assert_eq!(rows[0]["Value"], "1");
    }

    #[test]
    fn test_rename_to_longer_label_keeps_boundaries() {
        let lines = [
            "USER       PID %CPU COMMAND",
            "root         1  0.0 /usr/lib/systemd/systemd",
        ];
        let options = FixedTableOptions::new()
            .rename("PID", "Process_ID")
            .rename("%CPU", "CPU");
        let rows = parse_fixed_table(&lines, &options).unwrap();
        assert_eq!(rows[0]["USER"], "root");
        assert_eq!(rows[0]["Process_ID"], "1");
        assert_eq!(rows[0]["CPU"], "0.0");
        assert_eq!(rows[0]["COMMAND"], "/usr/lib/systemd/systemd");
    }

    #[test]
    fn test_multi_word_rename_is_one_column() {
        let lines = ["Gluster process   TCP Port", "Brick h:/b        49152"];
        let options = FixedTableOptions::new()
            .rename("Gluster process", "Gluster_process")
            .rename("TCP Port", "TCP_Port");
        let rows = parse_fixed_table(&lines, &options).unwrap();
        assert_eq!(rows[0].len(), 2);
        assert_eq!(rows[0]["Gluster_process"], "Brick h:/b");
        assert_eq!(rows[0]["TCP_Port"], "49152");
    }
}
