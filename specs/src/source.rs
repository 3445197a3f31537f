//! Where a spec's data comes from inside an archive.

use std::path::{Path, PathBuf};

use glob::{GlobError, MatchOptions, Pattern};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SpecError};

/// How a spec is located relative to the archive root.
///
/// Serialized with a `kind` tag, so a registry entry reads
/// `{kind: simple, path: insights_commands/uptime}`.
///
/// # Examples
///
/// ```
/// use hostfacts_specs::SpecSource;
///
/// let hostname = SpecSource::first_of(vec![
///     SpecSource::simple("insights_commands/hostname_-f"),
///     SpecSource::simple("insights_commands/hostname"),
/// ]);
/// let yaml = serde_yaml::to_string(&hostname).unwrap();
/// assert!(yaml.contains("kind: first_of"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpecSource {
    /// A single file.
    Simple {
        /// Path relative to the archive root.
        path: String,
    },
    /// Every file matching a glob pattern.
    Glob {
        /// Glob relative to the archive root. `*`, `?` and `[...]` are
        /// supported within a path component.
        pattern: String,
        /// Regex; matching files (by root-relative path) are skipped.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ignore: Option<String>,
    },
    /// The first alternative that was collected.
    FirstOf {
        /// Alternatives in priority order.
        sources: Vec<SpecSource>,
    },
    /// The first file collected for another spec.
    Head {
        /// Name of the spec to take the first file from.
        of: String,
    },
}

impl SpecSource {
    /// A single file at `path`.
    pub fn simple(path: impl Into<String>) -> Self {
        Self::Simple { path: path.into() }
    }

    /// Every file matching `pattern`.
    pub fn glob(pattern: impl Into<String>) -> Self {
        Self::Glob {
            pattern: pattern.into(),
            ignore: None,
        }
    }

    /// Files matching `pattern` except those matching the `ignore` regex.
    pub fn glob_ignoring(pattern: impl Into<String>, ignore: impl Into<String>) -> Self {
        Self::Glob {
            pattern: pattern.into(),
            ignore: Some(ignore.into()),
        }
    }

    /// The first of `sources` that yields a file.
    pub fn first_of(sources: Vec<SpecSource>) -> Self {
        Self::FirstOf { sources }
    }

    /// The first file of spec `of`.
    pub fn head(of: impl Into<String>) -> Self {
        Self::Head { of: of.into() }
    }

    /// Returns `true` if this source can yield more than one file.
    pub fn is_multi_output(&self) -> bool {
        match self {
            Self::Glob { .. } => true,
            Self::FirstOf { sources } => sources.iter().any(Self::is_multi_output),
            Self::Simple { .. } | Self::Head { .. } => false,
        }
    }
}

/// Compiles a glob ignore expression.
pub(crate) fn compile_ignore(ignore: &str) -> Result<Regex> {
    Regex::new(ignore).map_err(|err| SpecError::InvalidPattern {
        pattern: ignore.to_string(),
        reason: err.to_string(),
    })
}

/// Returns the files under `root` matching `pattern`, sorted.
///
/// Wildcards never match a leading `.`, so hidden entries are only found by
/// patterns that spell the dot out.
pub(crate) fn glob_files(root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let full = format!(
        "{}/{}",
        Pattern::escape(&root.to_string_lossy()),
        pattern.trim_start_matches('/')
    );
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };
    let paths = glob::glob_with(&full, options).map_err(|err| SpecError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: err.to_string(),
    })?;

    let mut files = Vec::new();
    for entry in paths {
        let path = entry.map_err(GlobError::into_error)?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
