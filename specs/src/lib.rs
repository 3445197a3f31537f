//! Spec registry for host archives.
//!
//! A *spec* is a named piece of collected data: the output of a command or
//! the content of a file, captured into an archive directory by a collection
//! client. This crate maps spec names to their location in the archive and
//! reads them back.
//!
//! - [`SpecSource`]: how a spec is located: one file, a glob, the first of
//!   several alternatives, or the first file of another spec.
//! - [`SpecRegistry`]: the read-only name → source table, with
//!   [`SpecRegistry::builtin`] holding the standard archive layout.
//! - [`CollectionConfig`]: YAML overrides, exclusions and an allowlist.
//!
//! # Quick start
//!
//! ```no_run
//! use hostfacts_specs::{CollectionConfig, SpecRegistry};
//!
//! let config = CollectionConfig::load("collection.yml").unwrap();
//! let registry = config.apply(SpecRegistry::builtin());
//! assert!(registry.validate().is_empty());
//!
//! for file in registry.collect("gluster_v_status", "/var/tmp/archive").unwrap() {
//!     println!("{}: {} bytes", file.path.display(), file.content.len());
//! }
//! ```

mod config;
mod error;
mod registry;
mod source;

pub use config::CollectionConfig;
pub use error::{Result, SpecError};
pub use registry::{CollectedFile, RegistryIssue, SpecRegistry};
pub use source::SpecSource;
