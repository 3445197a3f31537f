//! Shared building blocks for host fact parsers.
//!
//! Captured command output and config files are mostly line-oriented text.
//! This crate holds the pieces every parser needs:
//!
//! - [`filter_active_lines`]: drop blank and comment lines.
//! - [`parse_fixed_table`]: split column-aligned tables into rows, using
//!   [`FixedTableOptions`] for header renames and section bounds.
//! - [`SectionMap`]: ordered named records with lookup and iteration.
//! - [`FactParser`]: the trait binding a parser to the spec it consumes.
//! - [`ParseError`]: the single failure type, including "no data".
//!
//! # Example
//!
//! ```
//! use hostfacts_core::*;
//!
//! let raw = "\
//! Name      State
//! ----------------
//! web       running
//! db        stopped
//! ";
//! let lines = split_lines(raw);
//! let active = filter_active_lines(&lines, Some("----"));
//! assert_eq!(active.len(), 3);
//!
//! let rows = parse_fixed_table(&active, &FixedTableOptions::new()).unwrap();
//! let by_name: SectionMap<_> = rows
//!     .into_iter()
//!     .map(|row| (row["Name"].clone(), row["State"].clone()))
//!     .collect();
//! assert_eq!(by_name["db"], "stopped");
//! ```

mod error;
mod lines;
mod parser;
mod section;
mod table;

pub use error::{ParseError, Result};
pub use lines::{DEFAULT_COMMENT_MARKER, filter_active_lines, split_lines};
pub use parser::FactParser;
pub use section::SectionMap;
pub use table::{FixedTableOptions, TableRow, parse_fixed_table};
