//! `gluster volume status` parsing.

use std::collections::BTreeMap;
use std::ops::Index;

use hostfacts_core::{
    FactParser, FixedTableOptions, ParseError, Result, SectionMap, TableRow, filter_active_lines,
    parse_fixed_table,
};
use serde::Serialize;
use tracing::debug;

/// Prefix of the line that opens each volume's section.
const SECTION_PREFIX: &str = "Status of volume";
/// Rule lines between the table header and its rows.
const RULE_MARKER: &str = "----";

/// Process description, e.g. `Brick 10.0.0.1:/data`.
pub const PROCESS_COLUMN: &str = "Gluster_process";
/// TCP port, or `N/A`.
pub const TCP_PORT_COLUMN: &str = "TCP_Port";
/// RDMA port, or `N/A`.
pub const RDMA_PORT_COLUMN: &str = "RDMA_Port";
/// `Y` or `N`.
pub const ONLINE_COLUMN: &str = "Online";
/// Process id, or `N/A`.
pub const PID_COLUMN: &str = "Pid";
/// Derived for bricks: the host part of the process column.
pub const IP_COLUMN: &str = "IP";
/// Derived for bricks: the path after the first `:`.
pub const DIRECTORY_COLUMN: &str = "Directory";
/// Derived for self-heal daemons: the last word of the process column.
pub const HOST_COLUMN: &str = "Host";

fn table_options() -> FixedTableOptions<'static> {
    FixedTableOptions::new()
        .heading("Gluster process")
        .rename("Gluster process", PROCESS_COLUMN)
        .rename("TCP Port", TCP_PORT_COLUMN)
        .rename("RDMA Port", RDMA_PORT_COLUMN)
        .trailing("Task Status")
}

/// What a status row describes, derived from its process column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessKind {
    /// `Brick HOST:/path`
    Brick,
    /// `Self-heal Daemon on HOST`
    SelfHealDaemon,
    /// NFS servers, quota daemons and anything else.
    Other,
}

/// One process line of a volume status table.
///
/// Holds every table column as text plus the derived `IP`/`Directory`
/// (bricks) or `Host` (self-heal daemons) columns. The typed accessors read
/// from the same map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProcessRow {
    fields: BTreeMap<String, String>,
}

impl ProcessRow {
    /// Builds a row from a parsed table row, adding the derived columns.
    pub fn from_table_row(mut fields: TableRow) -> Self {
        let process = fields.get(PROCESS_COLUMN).cloned().unwrap_or_default();
        if process.starts_with("Brick") {
            match process.split_once(':') {
                Some((location, directory)) => {
                    if let Some(ip) = location.split_whitespace().last() {
                        fields.insert(IP_COLUMN.to_string(), ip.to_string());
                    }
                    fields.insert(DIRECTORY_COLUMN.to_string(), directory.trim().to_string());
                }
                None => debug!(process = %process, "brick row without host:path separator"),
            }
        } else if process.starts_with("Self-heal") {
            if let Some(host) = process.split_whitespace().last() {
                fields.insert(HOST_COLUMN.to_string(), host.to_string());
            }
        }
        Self { fields }
    }

    /// Returns a column's value.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Every column of the row, derived ones included.
    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    /// The `Gluster_process` column, empty when absent.
    pub fn process(&self) -> &str {
        self.get(PROCESS_COLUMN).unwrap_or_default()
    }

    /// Classifies the row by its process column.
    pub fn kind(&self) -> ProcessKind {
        let process = self.process();
        if process.starts_with("Brick") {
            ProcessKind::Brick
        } else if process.starts_with("Self-heal") {
            ProcessKind::SelfHealDaemon
        } else {
            ProcessKind::Other
        }
    }

    /// Brick host address.
    pub fn ip(&self) -> Option<&str> {
        self.get(IP_COLUMN)
    }

    /// Brick directory.
    pub fn directory(&self) -> Option<&str> {
        self.get(DIRECTORY_COLUMN)
    }

    /// Host a self-heal daemon runs on.
    pub fn host(&self) -> Option<&str> {
        self.get(HOST_COLUMN)
    }

    /// `true` when the `Online` column is `Y`.
    pub fn online(&self) -> bool {
        self.get(ONLINE_COLUMN) == Some("Y")
    }

    /// Numeric pid, `None` for `N/A`.
    pub fn pid(&self) -> Option<u32> {
        self.number(PID_COLUMN)
    }

    /// TCP port, `None` for `N/A`.
    pub fn tcp_port(&self) -> Option<u32> {
        self.number(TCP_PORT_COLUMN)
    }

    /// RDMA port, `None` for `N/A`.
    pub fn rdma_port(&self) -> Option<u32> {
        self.number(RDMA_PORT_COLUMN)
    }

    fn number(&self, column: &str) -> Option<u32> {
        self.get(column)?.parse().ok()
    }
}

impl Index<&str> for ProcessRow {
    type Output = str;

    fn index(&self, column: &str) -> &str {
        self.fields[column].as_str()
    }
}

/// Parsed `gluster volume status` output: volume name to process rows.
///
/// Sample input:
///
/// ```text
/// Status of volume: test_vol
/// Gluster process                             TCP Port  RDMA Port  Online  Pid
/// ------------------------------------------------------------------------------
/// Brick 172.17.18.42:/home/brick              49152     0          Y       26685
/// Self-heal Daemon on localhost               N/A       N/A        Y       7805
///
/// Task Status of Volume test_vol
/// ------------------------------------------------------------------------------
/// There are no active volume tasks
/// ```
///
/// # Examples
///
/// ```
/// use hostfacts_core::FactParser;
/// use hostfacts_parsers::gluster::VolumeStatus;
///
/// let raw = "\
/// Status of volume: test_vol
/// Gluster process                             TCP Port  RDMA Port  Online  Pid
/// ------------------------------------------------------------------------------
/// Brick 172.17.18.42:/home/brick              49152     0          Y       26685
/// ";
/// let status = VolumeStatus::parse_str(raw).unwrap();
/// let brick = &status["test_vol"][0];
/// assert_eq!(brick.ip(), Some("172.17.18.42"));
/// assert_eq!(brick.pid(), Some(26685));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VolumeStatus {
    volumes: SectionMap<Vec<ProcessRow>>,
}

impl VolumeStatus {
    /// Looks up a volume's process rows.
    pub fn get(&self, volume: &str) -> Option<&[ProcessRow]> {
        self.volumes.get(volume).map(Vec::as_slice)
    }

    /// Returns `true` if the volume has a status section.
    pub fn contains(&self, volume: &str) -> bool {
        self.volumes.contains(volume)
    }

    /// Volume names in output order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.volumes.names()
    }

    /// `(volume, rows)` pairs in output order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ProcessRow])> {
        self.volumes
            .iter()
            .map(|(name, rows)| (name, rows.as_slice()))
    }

    /// Returns the number of volumes.
    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    /// Returns `true` if no volume was parsed.
    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    /// Processes reported offline, with the volume they belong to.
    pub fn offline_processes(&self) -> impl Iterator<Item = (&str, &ProcessRow)> {
        self.iter()
            .flat_map(|(name, rows)| rows.iter().map(move |row| (name, row)))
            .filter(|(_, row)| !row.online())
    }
}

impl Index<&str> for VolumeStatus {
    type Output = [ProcessRow];

    fn index(&self, volume: &str) -> &[ProcessRow] {
        self.volumes[volume].as_slice()
    }
}

impl FactParser for VolumeStatus {
    const SPEC: &'static str = "gluster_v_status";

    fn parse_lines<S: AsRef<str>>(lines: &[S]) -> Result<Self> {
        let active = filter_active_lines(lines, Some(RULE_MARKER));
        let headers = active
            .iter()
            .enumerate()
            .filter(|(_, line)| line.starts_with(SECTION_PREFIX))
            .map(|(idx, _)| idx)
            .collect::<Vec<_>>();

        let options = table_options();
        let mut volumes = SectionMap::new();
        for (n, &start) in headers.iter().enumerate() {
            let end = headers.get(n + 1).copied().unwrap_or(active.len());
            let section = &active[start..end];

            let Some((_, name)) = section[0].split_once(':') else {
                return Err(ParseError::MissingDelimiter {
                    delimiter: ':',
                    line: section[0].to_string(),
                });
            };
            let rows = parse_fixed_table(section, &options)?
                .into_iter()
                .map(ProcessRow::from_table_row)
                .collect::<Vec<_>>();
            debug!(volume = name.trim(), rows = rows.len(), "parsed volume status section");
            volumes.insert(name.trim(), rows);
        }

        if volumes.is_empty() {
            return Err(ParseError::NoData {
                what: "gluster volume status",
            });
        }
        Ok(Self { volumes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(process: &str, online: &str, pid: &str) -> ProcessRow {
        let fields = [
            (PROCESS_COLUMN, process),
            (TCP_PORT_COLUMN, "N/A"),
            (RDMA_PORT_COLUMN, "N/A"),
            (ONLINE_COLUMN, online),
            (PID_COLUMN, pid),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        ProcessRow::from_table_row(fields)
    }

    #[test]
    fn test_brick_row_is_split_into_ip_and_directory() {
        let brick = row("Brick 172.17.18.42:/home/brick", "Y", "26685");
        assert_eq!(brick.kind(), ProcessKind::Brick);
        assert_eq!(brick.ip(), Some("172.17.18.42"));
        assert_eq!(brick.directory(), Some("/home/brick"));
        assert!(brick.host().is_none());
    }

    #[test]
    fn test_self_heal_row_gets_host() {
        let shd = row("Self-heal Daemon on 172.17.18.44", "Y", "33400");
        assert_eq!(shd.kind(), ProcessKind::SelfHealDaemon);
        assert_eq!(shd.host(), Some("172.17.18.44"));
        assert!(shd.ip().is_none());
    }

    #[test]
    fn test_other_rows_are_left_alone() {
        let nfs = row("NFS Server on localhost", "N", "N/A");
        assert_eq!(nfs.kind(), ProcessKind::Other);
        assert_eq!(nfs.fields().len(), 5);
        assert!(!nfs.online());
        assert_eq!(nfs.pid(), None);
        assert_eq!(nfs.tcp_port(), None);
    }

    #[test]
    fn test_brick_without_separator_has_no_derived_columns() {
        let odd = row("Brick localhost", "Y", "1");
        assert_eq!(odd.kind(), ProcessKind::Brick);
        assert!(odd.ip().is_none());
        assert!(odd.directory().is_none());
    }

    #[test]
    fn test_header_without_colon_fails() {
        let err = VolumeStatus::parse_str("Status of volume test_vol\n").unwrap_err();
        assert!(matches!(err, ParseError::MissingDelimiter { .. }));
    }

    #[test]
    fn test_no_headers_fails() {
        let err = VolumeStatus::parse_str("Volume test_vol is not started\n").unwrap_err();
        assert!(matches!(err, ParseError::NoData { .. }));
    }

    #[test]
    fn test_section_without_table_is_empty() {
        let status =
            VolumeStatus::parse_str("Status of volume: idle\nVolume idle is not started\n").unwrap();
        assert!(status.contains("idle"));
        assert!(status["idle"].is_empty());
    }
}
