//! `gluster volume info` parsing.

use std::collections::BTreeMap;

use hostfacts_core::{FactParser, ParseError, Result, SectionMap, filter_active_lines};
use serde::Serialize;

/// Key whose value starts a new volume block.
const VOLUME_NAME_KEY: &str = "Volume Name";

/// Attributes of one volume, exactly as labelled in the command output.
pub type VolumeRecord = BTreeMap<String, String>;

/// Parsed `gluster volume info` output, keyed by volume name.
///
/// Sample input:
///
/// ```text
/// Volume Name: test_vol
/// Type: Replicate
/// Volume ID: 2c32ed8d-5a07-4a76-a73a-123859556974
/// Status: Started
/// Number of Bricks: 1 x 3 = 3
/// Transport-type: tcp
/// Bricks:
/// Brick1: 172.17.18.42:/home/brick
/// Brick2: 172.17.18.43:/home/brick
/// Brick3: 172.17.18.44:/home/brick
/// ```
///
/// # Examples
///
/// ```
/// use hostfacts_core::FactParser;
/// use hostfacts_parsers::gluster::VolumeInfo;
///
/// let info = VolumeInfo::parse_str("Volume Name: test_vol\nType: Replicate\n").unwrap();
/// assert_eq!(info["test_vol"]["Type"], "Replicate");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VolumeInfo {
    volumes: SectionMap<VolumeRecord>,
}

impl VolumeInfo {
    /// Looks up a volume's attributes.
    pub fn get(&self, volume: &str) -> Option<&VolumeRecord> {
        self.volumes.get(volume)
    }

    /// Returns `true` if the volume was listed.
    pub fn contains(&self, volume: &str) -> bool {
        self.volumes.contains(volume)
    }

    /// Volume names in output order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.volumes.names()
    }

    /// `(volume, attributes)` pairs in output order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &VolumeRecord)> {
        self.volumes.iter()
    }

    /// Returns the number of volumes.
    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    /// Returns `true` if no volume was parsed.
    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    /// Returns the `BrickN` entries of a volume ordered by `N`.
    pub fn bricks(&self, volume: &str) -> Vec<&str> {
        let Some(record) = self.volumes.get(volume) else {
            return Vec::new();
        };
        let mut bricks = record
            .iter()
            .filter_map(|(key, value)| {
                let n = key.strip_prefix("Brick")?.parse::<u32>().ok()?;
                Some((n, value.as_str()))
            })
            .collect::<Vec<_>>();
        bricks.sort_by_key(|(n, _)| *n);
        bricks.into_iter().map(|(_, value)| value).collect()
    }
}

impl std::ops::Index<&str> for VolumeInfo {
    type Output = VolumeRecord;

    fn index(&self, volume: &str) -> &VolumeRecord {
        &self.volumes[volume]
    }
}

impl FactParser for VolumeInfo {
    const SPEC: &'static str = "gluster_v_info";

    fn parse_lines<S: AsRef<str>>(lines: &[S]) -> Result<Self> {
        let mut volumes = SectionMap::new();
        let mut name: Option<String> = None;
        let mut record = VolumeRecord::new();

        for line in filter_active_lines(lines, None) {
            let Some((key, value)) = line.split_once(':') else {
                return Err(ParseError::MissingDelimiter {
                    delimiter: ':',
                    line: line.to_string(),
                });
            };
            let key = key.trim();
            let value = value.trim_start();

            if key == VOLUME_NAME_KEY {
                if let Some(finished) = name.replace(value.to_string()) {
                    volumes.insert(finished, std::mem::take(&mut record));
                }
                continue;
            }
            record.insert(key.to_string(), value.to_string());
        }

        if let Some(last) = name {
            volumes.insert(last, record);
        }
        if volumes.is_empty() {
            return Err(ParseError::NoData {
                what: "gluster volume info",
            });
        }
        Ok(Self { volumes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_VOLUMES: &str = "\
Volume Name: test_vol
Type: Replicate
Status: Started
Brick10: 10.0.0.10:/b
Brick2: 10.0.0.2:/b

Volume Name: logs
Type: Distribute
Options Reconfigured:
performance.readdir-ahead: on
";

    #[test]
    fn test_volumes_in_output_order() {
        let info = VolumeInfo::parse_str(TWO_VOLUMES).unwrap();
        assert_eq!(info.names().collect::<Vec<_>>(), vec!["test_vol", "logs"]);
        assert_eq!(info["logs"]["Type"], "Distribute");
        assert_eq!(info["logs"]["Options Reconfigured"], "");
        assert_eq!(info["logs"]["performance.readdir-ahead"], "on");
        assert!(!info["test_vol"].contains_key("performance.readdir-ahead"));
    }

    #[test]
    fn test_value_keeps_inner_colons() {
        let info = VolumeInfo::parse_str("Volume Name: v\nBrick1: host:/path:odd\n").unwrap();
        assert_eq!(info["v"]["Brick1"], "host:/path:odd");
    }

    #[test]
    fn test_bricks_sorted_numerically() {
        let info = VolumeInfo::parse_str(TWO_VOLUMES).unwrap();
        assert_eq!(info.bricks("test_vol"), vec!["10.0.0.2:/b", "10.0.0.10:/b"]);
        assert!(info.bricks("missing").is_empty());
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let info = VolumeInfo::parse_str("Volume Name: v\nStatus: Created\nStatus: Started\n")
            .unwrap();
        assert_eq!(info["v"]["Status"], "Started");
    }

    #[test]
    fn test_volume_without_attributes_is_kept() {
        let info = VolumeInfo::parse_str("Volume Name: a\nVolume Name: b\n").unwrap();
        assert_eq!(info.len(), 2);
        assert!(info["b"].is_empty());
    }

    #[test]
    fn test_line_without_colon_fails() {
        let err = VolumeInfo::parse_str("Volume Name: v\nNo volumes present\n").unwrap_err();
        assert!(matches!(
            err,
            ParseError::MissingDelimiter { delimiter: ':', ref line } if line == "No volumes present"
        ));
    }

    #[test]
    fn test_attributes_without_volume_name_fail() {
        let err = VolumeInfo::parse_str("Type: Replicate\n").unwrap_err();
        assert!(matches!(err, ParseError::NoData { .. }));
    }
}
