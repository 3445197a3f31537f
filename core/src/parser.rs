//! The trait implemented by every content parser.

use crate::error::Result;
use crate::lines::split_lines;

/// A parser that turns the content of one collected spec into facts.
///
/// Implementors only provide [`parse_lines`](FactParser::parse_lines);
/// [`parse_str`](FactParser::parse_str) handles raw captured text.
pub trait FactParser: Sized {
    /// Registry name of the spec this parser consumes (e.g. `gluster_v_info`).
    const SPEC: &'static str;

    /// Parses already-split content lines.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`](crate::ParseError) when the content is
    /// malformed or yields no data.
    fn parse_lines<S: AsRef<str>>(lines: &[S]) -> Result<Self>;

    /// Parses raw captured content.
    ///
    /// # Errors
    ///
    /// Same as [`parse_lines`](FactParser::parse_lines).
    fn parse_str(content: &str) -> Result<Self> {
        Self::parse_lines(&split_lines(content))
    }
}
