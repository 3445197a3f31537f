//! The spec registry: symbolic spec names to [`SpecSource`]s.
//!
//! A registry is built once (from the embedded archive table, a YAML file, or
//! a [`CollectionConfig`](crate::CollectionConfig) applied on top of either)
//! and is read-only afterwards. Resolution walks an extracted archive
//! directory and returns the files collected for a spec.
//!
//! ```no_run
//! use hostfacts_specs::SpecRegistry;
//!
//! let registry = SpecRegistry::builtin();
//! let files = registry.collect("gluster_v_info", "/tmp/insights-host-20240115").unwrap();
//! println!("{}", files[0].content);
//! ```

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use thiserror::Error;
use tracing::debug;

use crate::error::{Result, SpecError};
use crate::source::{SpecSource, compile_ignore, glob_files};

/// The archive layout shipped with the crate.
const BUILTIN_TABLE: &str = include_str!("../data/insights_archive.yaml");

/// Longest `head` chain followed before giving up.
const MAX_HEAD_DEPTH: usize = 16;

/// Structural problems reported by [`SpecRegistry::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryIssue {
    /// A `head` entry points at a spec that does not exist.
    #[error("spec '{spec}' takes the head of unknown spec '{target}'")]
    DanglingHead { spec: String, target: String },
    /// Following `head` entries loops back on itself.
    #[error("head chain starting at '{0}' is cyclic")]
    HeadCycle(String),
    /// A glob ignore expression does not compile.
    #[error("spec '{spec}' has an invalid ignore expression: {reason}")]
    InvalidIgnore { spec: String, reason: String },
    /// A `first_of` entry lists no alternatives.
    #[error("spec '{0}' has no alternatives")]
    EmptyFirstOf(String),
    /// A path or pattern is empty or escapes the archive root.
    #[error("spec '{spec}' has an invalid path: '{path}'")]
    InvalidPath { spec: String, path: String },
}

/// One file collected for a spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedFile {
    /// Spec the file was collected for.
    pub spec: String,
    /// Absolute location inside the archive.
    pub path: PathBuf,
    /// File content (invalid UTF-8 is replaced).
    pub content: String,
}

/// Named specs with O(log n) lookup and sorted iteration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecRegistry {
    specs: BTreeMap<String, SpecSource>,
}

static BUILTIN: LazyLock<SpecRegistry> = LazyLock::new(|| {
    SpecRegistry::from_yaml_str(BUILTIN_TABLE).expect("embedded spec table must parse")
});

impl SpecRegistry {
    /// The archive layout shipped with the crate, parsed on first use.
    pub fn builtin() -> &'static SpecRegistry {
        &BUILTIN
    }

    /// Parses a registry from a YAML map of spec name to source.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::YamlError`] if the YAML is malformed.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let specs = serde_yaml::from_str(yaml)?;
        Ok(Self { specs })
    }

    /// Loads a registry YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::IoError`] if the file cannot be read, or
    /// [`SpecError::YamlError`] if parsing fails.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
    }

    /// Serializes the registry back to YAML.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::YamlError`] if serialization fails.
    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.specs)?)
    }

    /// Looks up the source of a spec.
    pub fn get(&self, name: &str) -> Option<&SpecSource> {
        self.specs.get(name)
    }

    /// Returns `true` if the spec is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.specs.contains_key(name)
    }

    /// Spec names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.specs.keys().map(String::as_str)
    }

    /// `(name, source)` pairs sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SpecSource)> {
        self.specs.iter().map(|(name, source)| (name.as_str(), source))
    }

    /// Returns the number of registered specs.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Returns `true` if no spec is registered.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub(crate) fn insert(&mut self, name: String, source: SpecSource) {
        self.specs.insert(name, source);
    }

    pub(crate) fn remove(&mut self, name: &str) {
        self.specs.remove(name);
    }

    /// Checks the registry for broken references and patterns.
    ///
    /// An empty result means every entry can be resolved.
    pub fn validate(&self) -> Vec<RegistryIssue> {
        let mut issues = Vec::new();
        for (name, source) in &self.specs {
            self.validate_source(name, source, &mut issues);
            if matches!(source, SpecSource::Head { .. }) && self.head_chain_is_cyclic(name) {
                issues.push(RegistryIssue::HeadCycle(name.clone()));
            }
        }
        issues
    }

    fn validate_source(&self, name: &str, source: &SpecSource, issues: &mut Vec<RegistryIssue>) {
        match source {
            SpecSource::Simple { path } => check_path(name, path, issues),
            SpecSource::Glob { pattern, ignore } => {
                check_path(name, pattern, issues);
                if let Some(ignore) = ignore {
                    if let Err(err) = compile_ignore(ignore) {
                        issues.push(RegistryIssue::InvalidIgnore {
                            spec: name.to_string(),
                            reason: err.to_string(),
                        });
                    }
                }
            }
            SpecSource::FirstOf { sources } => {
                if sources.is_empty() {
                    issues.push(RegistryIssue::EmptyFirstOf(name.to_string()));
                }
                for inner in sources {
                    self.validate_source(name, inner, issues);
                }
            }
            SpecSource::Head { of } => {
                if !self.contains(of) {
                    issues.push(RegistryIssue::DanglingHead {
                        spec: name.to_string(),
                        target: of.clone(),
                    });
                }
            }
        }
    }

    fn head_chain_is_cyclic(&self, start: &str) -> bool {
        let mut seen = HashSet::new();
        let mut current = start;
        while let Some(SpecSource::Head { of }) = self.specs.get(current) {
            if !seen.insert(current) {
                return true;
            }
            current = of.as_str();
        }
        false
    }

    /// Returns the files collected for `name` under `root`.
    ///
    /// # Errors
    ///
    /// - [`SpecError::UnknownSpec`] if `name` (or a `head` target) is not
    ///   registered.
    /// - [`SpecError::NotCollected`] if no file matches.
    /// - [`SpecError::InvalidPattern`] for a bad glob or ignore expression.
    /// - [`SpecError::InvalidRegistry`] for a `head` chain that does not end.
    /// - [`SpecError::IoError`] if a directory cannot be listed.
    pub fn resolve(&self, name: &str, root: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let root = root.as_ref();
        let source = self
            .get(name)
            .ok_or_else(|| SpecError::UnknownSpec(name.to_string()))?;
        let paths = self.resolve_source(source, root, 0)?;
        debug!(spec = name, files = paths.len(), "resolved spec");
        if paths.is_empty() {
            return Err(SpecError::NotCollected(name.to_string()));
        }
        Ok(paths)
    }

    fn resolve_source(
        &self,
        source: &SpecSource,
        root: &Path,
        depth: usize,
    ) -> Result<Vec<PathBuf>> {
        match source {
            SpecSource::Simple { path } => {
                let full = root.join(path);
                Ok(if full.is_file() { vec![full] } else { Vec::new() })
            }
            SpecSource::Glob { pattern, ignore } => {
                let ignore = ignore.as_deref().map(compile_ignore).transpose()?;
                let files = glob_files(root, pattern)?;
                Ok(files
                    .into_iter()
                    .filter(|path| match &ignore {
                        Some(re) => !re.is_match(&relative_display(root, path)),
                        None => true,
                    })
                    .collect())
            }
            SpecSource::FirstOf { sources } => {
                for alternative in sources {
                    let paths = self.resolve_source(alternative, root, depth)?;
                    if !paths.is_empty() {
                        return Ok(paths);
                    }
                }
                Ok(Vec::new())
            }
            SpecSource::Head { of } => {
                if depth >= MAX_HEAD_DEPTH {
                    return Err(SpecError::InvalidRegistry(format!(
                        "head chain through '{of}' is longer than {MAX_HEAD_DEPTH}"
                    )));
                }
                let target = self
                    .get(of)
                    .ok_or_else(|| SpecError::UnknownSpec(of.clone()))?;
                let mut paths = self.resolve_source(target, root, depth + 1)?;
                paths.truncate(1);
                Ok(paths)
            }
        }
    }

    /// Resolves `name` and reads every collected file.
    ///
    /// # Errors
    ///
    /// Everything [`resolve`](Self::resolve) returns, plus
    /// [`SpecError::IoError`] if a file cannot be read.
    pub fn collect(&self, name: &str, root: impl AsRef<Path>) -> Result<Vec<CollectedFile>> {
        self.resolve(name, root)?
            .into_iter()
            .map(|path| {
                let bytes = fs::read(&path)?;
                Ok(CollectedFile {
                    spec: name.to_string(),
                    content: String::from_utf8_lossy(&bytes).into_owned(),
                    path,
                })
            })
            .collect()
    }
}

fn check_path(spec: &str, path: &str, issues: &mut Vec<RegistryIssue>) {
    let escapes = Path::new(path).is_absolute() || path.split('/').any(|c| c == "..");
    if path.trim().is_empty() || escapes {
        issues.push(RegistryIssue::InvalidPath {
            spec: spec.to_string(),
            path: path.to_string(),
        });
    }
}

fn relative_display(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
