//! Error types for spec registry operations.
//!
//! Covers loading registries and configuration, resolving specs against an
//! archive directory, and reading the collected files.

use thiserror::Error;

/// Errors that can occur while loading or resolving specs.
#[derive(Debug, Error)]
pub enum SpecError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The registry has no entry with this name.
    #[error("unknown spec: {0}")]
    UnknownSpec(String),

    /// The spec is known but nothing was collected for it in the archive.
    #[error("spec '{0}' was not collected")]
    NotCollected(String),

    /// A glob pattern or ignore expression does not compile.
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The registry is structurally broken (see [`RegistryIssue`](crate::RegistryIssue)).
    #[error("invalid registry: {0}")]
    InvalidRegistry(String),
}

/// Convenience alias for results with [`SpecError`].
pub type Result<T> = std::result::Result<T, SpecError>;
