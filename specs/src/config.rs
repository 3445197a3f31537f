//! Collection configuration.
//!
//! A YAML file that adjusts the builtin registry for one archive layout and
//! limits which specs are collected.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! allowlist:
//!   - gluster_v_info
//!   - gluster_v_status
//! exclude:
//!   - ps_aux
//! specs:
//!   gluster_v_info:
//!     kind: simple
//!     path: sos_commands/gluster/gluster_volume_info
//! ```

use std::collections::BTreeMap;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::registry::SpecRegistry;
use crate::source::SpecSource;

/// Registry adjustments and collection filters.
///
/// # Examples
///
/// ```
/// use hostfacts_specs::{CollectionConfig, SpecRegistry, SpecSource};
///
/// let mut config = CollectionConfig::default();
/// config.exclude.push("ps_aux".into());
/// config.specs.insert(
///     "gluster_v_info".into(),
///     SpecSource::simple("sos_commands/gluster/gluster_volume_info"),
/// );
///
/// let registry = config.apply(SpecRegistry::builtin());
/// assert!(!registry.contains("ps_aux"));
/// assert_eq!(
///     registry.get("gluster_v_info"),
///     Some(&SpecSource::simple("sos_commands/gluster/gluster_volume_info")),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Configuration format version (e.g., `"1.0"`).
    pub version: String,
    /// Specs to collect (empty = every registered spec).
    #[serde(default)]
    pub allowlist: Vec<String>,
    /// Specs to drop from the registry entirely.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Entries added to, or replacing those in, the base registry.
    #[serde(default)]
    pub specs: BTreeMap<String, SpecSource>,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            allowlist: Vec::new(),
            exclude: Vec::new(),
            specs: BTreeMap::new(),
        }
    }
}

impl CollectionConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::SpecError::IoError) if the file cannot be
    /// read, or [`YamlError`](crate::SpecError::YamlError) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::SpecError::IoError) if the file cannot be
    /// written, or [`YamlError`](crate::SpecError::YamlError) if
    /// serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Returns `true` if `spec` is in the exclusion list.
    pub fn is_excluded(&self, spec: &str) -> bool {
        self.exclude.iter().any(|s| s == spec)
    }

    /// Returns `true` if `spec` should be collected.
    ///
    /// An empty allowlist allows everything not excluded. Exclusions always
    /// win.
    pub fn is_allowed(&self, spec: &str) -> bool {
        if self.is_excluded(spec) {
            return false;
        }
        self.allowlist.is_empty() || self.allowlist.iter().any(|s| s == spec)
    }

    /// Builds a new registry from `base` with the overrides applied and the
    /// excluded specs removed.
    pub fn apply(&self, base: &SpecRegistry) -> SpecRegistry {
        let mut registry = base.clone();
        for (name, source) in &self.specs {
            registry.insert(name.clone(), source.clone());
        }
        for name in &self.exclude {
            registry.remove(name);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_yaml() -> &'static str {
        r#"
version: "1.0"
allowlist:
  - gluster_v_info
  - gluster_v_status
exclude:
  - gluster_v_status
specs:
  gluster_v_info: {kind: simple, path: sos_commands/gluster/gluster_volume_info}
  custom_glob: {kind: glob, pattern: "custom/*.out", ignore: "skip"}
"#
    }

    #[test]
    fn test_deserialize_complete() {
        let config: CollectionConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.allowlist, vec!["gluster_v_info", "gluster_v_status"]);
        assert_eq!(config.exclude, vec!["gluster_v_status"]);
        assert_eq!(config.specs.len(), 2);
    }

    #[test]
    fn test_deserialize_minimal() {
        let config: CollectionConfig = serde_yaml::from_str("version: \"1.0\"\n").unwrap();
        assert!(config.allowlist.is_empty());
        assert!(config.exclude.is_empty());
        assert!(config.specs.is_empty());
    }

    #[test]
    fn test_is_allowed_honors_exclusions() {
        let config: CollectionConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        assert!(config.is_allowed("gluster_v_info"));
        assert!(!config.is_allowed("gluster_v_status"));
        assert!(!config.is_allowed("uptime"));
        assert!(CollectionConfig::default().is_allowed("uptime"));
    }

    #[test]
    fn test_apply_overrides_and_removes() {
        let config: CollectionConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        let registry = config.apply(SpecRegistry::builtin());

        assert!(!registry.contains("gluster_v_status"));
        assert!(registry.contains("custom_glob"));
        assert_eq!(
            registry.get("gluster_v_info"),
            Some(&SpecSource::simple("sos_commands/gluster/gluster_volume_info"))
        );
        assert_eq!(registry.len(), SpecRegistry::builtin().len());
        assert!(SpecRegistry::builtin().contains("gluster_v_status"));
    }

    #[test]
    fn test_load_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("collection.yml");

        let original: CollectionConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        original.save(&path).unwrap();

        let loaded = CollectionConfig::load(&path).unwrap();
        assert_eq!(loaded, original);
    }
}
